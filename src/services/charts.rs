//! ECharts configurations for the dashboard views.
//!
//! Each chart is produced as an option object that the page hands straight
//! to `echarts.setOption`.

use serde::Serialize;
use serde_json::{json, Value};

use crate::services::dashboard::Dashboard;

/// A chart with its HTML container id and ECharts option JSON.
#[derive(Debug, Clone, Serialize)]
pub struct Chart {
    pub id: &'static str,
    pub options: String,
}

impl Chart {
    fn new(id: &'static str, options: Value) -> Self {
        Self {
            id,
            options: script_safe_json(&options),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardCharts {
    pub daily: Chart,
    pub cumulative: Chart,
    pub category_pie: Chart,
    pub category_bar: Chart,
    pub category_treemap: Chart,
    pub monthly: Chart,
    pub weekday: Chart,
    pub comparison: Chart,
    pub top_expenses: Chart,
    pub top_payees: Chart,
}

impl DashboardCharts {
    pub fn from_dashboard(dashboard: &Dashboard) -> Self {
        Self {
            daily: Chart::new("daily-expenses", daily_options(dashboard)),
            cumulative: Chart::new("cumulative-expenses", cumulative_options(dashboard)),
            category_pie: Chart::new("category-pie", category_pie_options(dashboard)),
            category_bar: Chart::new("category-bar", category_bar_options(dashboard)),
            category_treemap: Chart::new("category-treemap", category_treemap_options(dashboard)),
            monthly: Chart::new("monthly-by-category", monthly_options(dashboard)),
            weekday: Chart::new("weekday-averages", weekday_options(dashboard)),
            comparison: Chart::new("period-comparison", comparison_options(dashboard)),
            top_expenses: Chart::new("top-expenses", top_expenses_options(dashboard)),
            top_payees: Chart::new("top-payees", top_payees_options(dashboard)),
        }
    }
}

/// Serialise JSON for embedding inside a `<script>` element.
///
/// `<`, `>` and `&` only ever occur inside string literals, where their
/// `\uXXXX` escapes decode to the same text, so no label can open or close
/// markup in the surrounding page.
fn script_safe_json(value: &Value) -> String {
    value
        .to_string()
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

fn title(text: &str) -> Value {
    json!({ "text": text, "left": "center" })
}

fn daily_options(dashboard: &Dashboard) -> Value {
    let points: Vec<Value> = dashboard
        .daily
        .iter()
        .map(|d| json!([d.date.format("%Y-%m-%d").to_string(), d.amount]))
        .collect();
    json!({
        "title": title("Daily Expenses Over Time"),
        "tooltip": { "trigger": "axis" },
        "xAxis": { "type": "time" },
        "yAxis": { "type": "value", "name": "amount" },
        "series": [{ "type": "line", "name": "amount", "data": points }]
    })
}

fn cumulative_options(dashboard: &Dashboard) -> Value {
    let points: Vec<Value> = dashboard
        .daily
        .iter()
        .map(|d| json!([d.date.format("%Y-%m-%d").to_string(), d.cumulative]))
        .collect();
    json!({
        "title": title("Cumulative Expenses Over Time"),
        "tooltip": { "trigger": "axis" },
        "xAxis": { "type": "time" },
        "yAxis": { "type": "value", "name": "cumulative_amount" },
        "series": [{ "type": "line", "name": "cumulative_amount", "data": points }]
    })
}

fn category_pie_options(dashboard: &Dashboard) -> Value {
    let data: Vec<Value> = dashboard
        .categories
        .iter()
        .map(|c| json!({ "name": c.category, "value": c.total }))
        .collect();
    json!({
        "title": title("Expenses by Category"),
        "tooltip": { "trigger": "item", "formatter": "{b}: {c} ({d}%)" },
        "legend": { "bottom": 0 },
        "series": [{ "type": "pie", "radius": "60%", "data": data }]
    })
}

fn category_bar_options(dashboard: &Dashboard) -> Value {
    let names: Vec<&str> = dashboard
        .categories
        .iter()
        .map(|c| c.category.as_str())
        .collect();
    let totals: Vec<f64> = dashboard.categories.iter().map(|c| c.total).collect();
    json!({
        "title": title("Total Expenses by Category"),
        "tooltip": { "trigger": "axis" },
        "xAxis": { "type": "category", "data": names },
        "yAxis": { "type": "value", "name": "amount" },
        "series": [{ "type": "bar", "name": "amount", "data": totals }]
    })
}

fn category_treemap_options(dashboard: &Dashboard) -> Value {
    let data: Vec<Value> = dashboard
        .categories
        .iter()
        .map(|c| json!({ "name": c.category, "value": c.total }))
        .collect();
    json!({
        "title": title("Expense Treemap"),
        "tooltip": { "trigger": "item" },
        "series": [{ "type": "treemap", "roam": false, "data": data }]
    })
}

fn monthly_options(dashboard: &Dashboard) -> Value {
    let matrix = &dashboard.monthly;
    let series: Vec<Value> = matrix
        .categories
        .iter()
        .enumerate()
        .map(|(index, category)| {
            let column: Vec<Option<f64>> = matrix.values.iter().map(|row| row[index]).collect();
            json!({ "type": "bar", "stack": "month", "name": category, "data": column })
        })
        .collect();
    json!({
        "title": title("Monthly Expenses by Category"),
        "tooltip": { "trigger": "axis" },
        "legend": { "bottom": 0 },
        "xAxis": { "type": "category", "name": "Month", "data": matrix.months },
        "yAxis": { "type": "value", "name": "Amount" },
        "series": series
    })
}

fn weekday_options(dashboard: &Dashboard) -> Value {
    let names: Vec<&str> = dashboard.weekdays.iter().map(|w| w.weekday).collect();
    let averages: Vec<Option<f64>> = dashboard.weekdays.iter().map(|w| w.average).collect();
    json!({
        "title": title("Average Expense by Day of Week"),
        "tooltip": { "trigger": "axis" },
        "xAxis": { "type": "category", "data": names },
        "yAxis": { "type": "value", "name": "amount" },
        "series": [{ "type": "bar", "name": "amount", "data": averages }]
    })
}

fn comparison_options(dashboard: &Dashboard) -> Value {
    let rows = &dashboard.period_comparison;
    let names: Vec<&str> = rows.iter().map(|r| r.category.as_str()).collect();
    let period1: Vec<Option<f64>> = rows.iter().map(|r| r.period1).collect();
    let period2: Vec<Option<f64>> = rows.iter().map(|r| r.period2).collect();
    json!({
        "title": title("Expense Comparison by Category"),
        "tooltip": { "trigger": "axis" },
        "legend": { "bottom": 0 },
        "xAxis": { "type": "category", "name": "categoryName", "data": names },
        "yAxis": { "type": "value" },
        "series": [
            { "type": "bar", "name": "Period 1", "data": period1 },
            { "type": "bar", "name": "Period 2", "data": period2 }
        ]
    })
}

fn top_expenses_options(dashboard: &Dashboard) -> Value {
    // Horizontal bars read top to bottom, so the largest goes last.
    let payees: Vec<&str> = dashboard
        .top_expenses
        .iter()
        .rev()
        .map(|e| e.paid_to.as_str())
        .collect();
    let amounts: Vec<f64> = dashboard.top_expenses.iter().rev().map(|e| e.amount).collect();
    json!({
        "title": title(&format!("Top {} Individual Expenses", dashboard.selection.top_n)),
        "tooltip": { "trigger": "axis" },
        "xAxis": { "type": "value", "name": "amount" },
        "yAxis": { "type": "category", "name": "paidTo", "data": payees },
        "series": [{ "type": "bar", "name": "amount", "data": amounts }]
    })
}

fn top_payees_options(dashboard: &Dashboard) -> Value {
    let names: Vec<&str> = dashboard.top_payees.iter().map(|p| p.payee.as_str()).collect();
    let totals: Vec<f64> = dashboard.top_payees.iter().map(|p| p.total).collect();
    json!({
        "title": title("Top 10 Payees"),
        "tooltip": { "trigger": "axis" },
        "xAxis": { "type": "category", "data": names },
        "yAxis": { "type": "value", "name": "amount" },
        "series": [{ "type": "bar", "name": "amount", "data": totals }]
    })
}
