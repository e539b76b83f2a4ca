use askama::Template;
use axum::extract::{RawQuery, State};
use axum::response::Html;
use tracing::debug;

use crate::error::{AppResult, RenderHtml};
use crate::filters::{format_money, format_money_opt, format_number};
use crate::handlers::params::{filter_query_string, DashboardQuery};
use crate::models::selection::{MAX_TOP_N, MIN_TOP_N};
use crate::services::charts::DashboardCharts;
use crate::services::dashboard::{build_dashboard, Dashboard};
use crate::state::AppState;
use crate::VERSION;

/// An entry of a `<select>` element.
pub struct SelectOption {
    pub value: String,
    pub selected: bool,
}

pub struct BudgetView {
    pub bar_percent: String,
    pub summary: String,
    pub over_budget: bool,
}

pub struct StatisticsRow {
    pub category: String,
    pub count: usize,
    pub mean: String,
    pub std: String,
    pub min: String,
    pub q25: String,
    pub median: String,
    pub q75: String,
    pub max: String,
}

#[derive(Template)]
#[template(path = "pages/dashboard.html")]
pub struct DashboardTemplate {
    pub title: String,
    pub version: &'static str,
    pub user_id: String,
    pub min_date: String,
    pub max_date: String,
    pub from_date: String,
    pub to_date: String,
    pub date_label: String,
    pub categories: Vec<SelectOption>,
    pub payees: Vec<SelectOption>,
    pub budget_categories: Vec<SelectOption>,
    pub budget_amount: String,
    pub budget_category: String,
    pub budget: Option<BudgetView>,
    pub download_url: String,
    pub total: String,
    pub average: String,
    pub count: usize,
    pub period1_from: String,
    pub period1_to: String,
    pub period2_from: String,
    pub period2_to: String,
    pub top_n: usize,
    pub min_top_n: usize,
    pub max_top_n: usize,
    pub statistics: Vec<StatisticsRow>,
    pub charts: DashboardCharts,
}

impl DashboardTemplate {
    fn from_dashboard(dashboard: &Dashboard, currency_symbol: &str) -> Self {
        let selection = &dashboard.selection;
        let filter = &selection.filter;
        let budget_category = selection
            .budget
            .as_ref()
            .map(|b| b.category.clone())
            .unwrap_or_default();

        let budget = dashboard.budget.as_ref().map(|status| BudgetView {
            bar_percent: format!("{:.1}", status.bar_percent),
            summary: status.summary.clone(),
            over_budget: status.progress_percent > 100.0,
        });

        let statistics = dashboard
            .statistics
            .iter()
            .map(|s| StatisticsRow {
                category: s.category.clone(),
                count: s.count,
                mean: format_number(Some(s.mean)),
                std: format_number(s.std),
                min: format_number(Some(s.min)),
                q25: format_number(Some(s.q25)),
                median: format_number(Some(s.median)),
                q75: format_number(Some(s.q75)),
                max: format_number(Some(s.max)),
            })
            .collect();

        Self {
            title: "Comprehensive Expense Analysis Dashboard".into(),
            version: VERSION,
            user_id: dashboard.user.to_string(),
            min_date: dashboard.selectable_range.from_iso(),
            max_date: dashboard.selectable_range.to_iso(),
            from_date: filter.date_range.from_iso(),
            to_date: filter.date_range.to_iso(),
            date_label: filter.date_range.display_label(),
            categories: select_options(&dashboard.available_categories, |v| {
                filter.categories.contains(v)
            }),
            payees: select_options(&dashboard.available_payees, |v| filter.payees.contains(v)),
            budget_categories: select_options(&dashboard.available_categories, |v| {
                *v == budget_category
            }),
            budget_amount: selection
                .budget
                .as_ref()
                .map(|b| format!("{:.2}", b.amount))
                .unwrap_or_else(|| "0.00".into()),
            budget_category,
            budget,
            download_url: format!(
                "/download.csv?{}",
                filter_query_string(&dashboard.user, filter)
            ),
            total: format_money(dashboard.overview.total, currency_symbol),
            average: format_money_opt(dashboard.overview.average, currency_symbol),
            count: dashboard.overview.count,
            period1_from: selection.period1.from_iso(),
            period1_to: selection.period1.to_iso(),
            period2_from: selection.period2.from_iso(),
            period2_to: selection.period2.to_iso(),
            top_n: selection.top_n,
            min_top_n: MIN_TOP_N,
            max_top_n: MAX_TOP_N,
            statistics,
            charts: DashboardCharts::from_dashboard(dashboard),
        }
    }
}

fn select_options(values: &[String], is_selected: impl Fn(&String) -> bool) -> Vec<SelectOption> {
    values
        .iter()
        .map(|value| SelectOption {
            value: value.clone(),
            selected: is_selected(value),
        })
        .collect()
}

pub async fn index(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> AppResult<Html<String>> {
    let query = DashboardQuery::parse(raw.as_deref())?;
    let user = query.user_id()?;
    debug!(user = %user, "Loading dashboard");

    let table = state.expenses_for(&user).await?;
    let selection = query.resolve(&table);
    let dashboard = build_dashboard(&table, selection, &state.config.currency_symbol);

    debug!(
        user = %user,
        transaction_count = dashboard.overview.count,
        total = dashboard.overview.total,
        "Dashboard data loaded"
    );

    DashboardTemplate::from_dashboard(&dashboard, &state.config.currency_symbol).render_html()
}
