use serde::Serialize;

use crate::date_utils::DateRange;
use crate::models::{DashboardSelection, Expense, UserId};
use crate::models::selection::TOP_PAYEES;
use crate::services::analytics::{
    self, BudgetStatus, CategoryBreakdown, CategoryStatistics, DailySpending,
    MonthlyCategoryMatrix, OverviewMetrics, PayeeTotal, PeriodComparison, WeekdayAverage,
};
use crate::services::table::ExpenseTable;

/// Every view of the dashboard for one selection.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub user: UserId,
    pub selection: DashboardSelection,
    pub selectable_range: DateRange,
    pub available_categories: Vec<String>,
    pub available_payees: Vec<String>,
    pub overview: OverviewMetrics,
    pub budget: Option<BudgetStatus>,
    pub daily: Vec<DailySpending>,
    pub categories: Vec<CategoryBreakdown>,
    pub monthly: MonthlyCategoryMatrix,
    pub weekdays: Vec<WeekdayAverage>,
    pub period_comparison: Vec<PeriodComparison>,
    pub top_expenses: Vec<Expense>,
    pub top_payees: Vec<PayeeTotal>,
    pub statistics: Vec<CategoryStatistics>,
}

/// Recompute the whole dashboard from the cached table.
///
/// The filtered view is rebuilt on each call and dropped afterwards. The
/// period comparison reads the unfiltered table.
pub fn build_dashboard(
    table: &ExpenseTable,
    selection: DashboardSelection,
    currency_symbol: &str,
) -> Dashboard {
    let filtered = table.filter(&selection.filter);
    tracing::debug!(
        user = %table.user(),
        total = table.len(),
        filtered = filtered.len(),
        "Recomputing dashboard"
    );

    let budget = selection
        .budget
        .as_ref()
        .and_then(|budget| analytics::budget_status(&filtered, budget, currency_symbol));

    Dashboard {
        user: table.user().clone(),
        selectable_range: table.selectable_range(),
        available_categories: table.categories(),
        available_payees: table.payees(),
        overview: OverviewMetrics::from_expenses(&filtered),
        budget,
        daily: analytics::spending_by_day(&filtered),
        categories: analytics::spending_by_category(&filtered),
        monthly: analytics::monthly_by_category(&filtered),
        weekdays: analytics::average_by_weekday(&filtered),
        period_comparison: analytics::compare_periods(
            table.records(),
            &selection.period1,
            &selection.period2,
        ),
        top_expenses: analytics::top_expenses(&filtered, selection.top_n),
        top_payees: analytics::top_payees(&filtered, TOP_PAYEES),
        statistics: analytics::statistics_by_category(&filtered),
        selection,
    }
}
