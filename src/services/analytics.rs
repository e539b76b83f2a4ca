//! Summary tables derived from a set of expenses.
//!
//! Every function here is pure: it reads the records it is given and returns
//! a small, ready-to-chart table.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::date_utils::{month_key, weekday_name, DateRange, WEEKDAYS};
use crate::filters::{format_money, format_percent};
use crate::models::{BudgetSelection, Expense};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewMetrics {
    pub total: f64,
    /// Mean amount per transaction; absent when nothing matches.
    pub average: Option<f64>,
    pub count: usize,
}

impl OverviewMetrics {
    pub fn from_expenses(expenses: &[&Expense]) -> Self {
        let total = sum(expenses.iter().copied());
        let count = expenses.len();
        Self {
            total,
            average: (count > 0).then(|| total / count as f64),
            count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStatus {
    pub category: String,
    pub budget: f64,
    pub spent: f64,
    /// Spend relative to the budget, may exceed 100.
    pub progress_percent: f64,
    /// `progress_percent` limited to `0..=100` for a progress bar.
    pub bar_percent: f64,
    pub summary: String,
}

/// Spend against a budget for one category.
///
/// Returns `None` when no positive budget is set.
pub fn budget_status(
    expenses: &[&Expense],
    budget: &BudgetSelection,
    currency_symbol: &str,
) -> Option<BudgetStatus> {
    if budget.amount <= 0.0 {
        return None;
    }

    let spent = sum(
        expenses
            .iter()
            .copied()
            .filter(|e| e.category_name == budget.category),
    );
    let progress_percent = spent / budget.amount * 100.0;

    Some(BudgetStatus {
        category: budget.category.clone(),
        budget: budget.amount,
        spent,
        progress_percent,
        bar_percent: progress_percent.clamp(0.0, 100.0),
        summary: format!(
            "Spent {} out of {} ({})",
            format_money(spent, currency_symbol),
            format_money(budget.amount, currency_symbol),
            format_percent(progress_percent)
        ),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySpending {
    pub date: NaiveDate,
    pub amount: f64,
    /// Running total up to and including `date`.
    pub cumulative: f64,
}

/// Totals per calendar day in date order, with a running cumulative sum.
pub fn spending_by_day(expenses: &[&Expense]) -> Vec<DailySpending> {
    let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for expense in expenses {
        *daily.entry(expense.day()).or_insert(0.0) += expense.amount;
    }

    let mut running = 0.0;
    daily
        .into_iter()
        .map(|(date, amount)| {
            running += amount;
            DailySpending {
                date,
                amount,
                cumulative: running,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub category: String,
    pub total: f64,
    pub percentage: f64,
    pub transaction_count: usize,
}

/// Totals per category, largest first.
pub fn spending_by_category(expenses: &[&Expense]) -> Vec<CategoryBreakdown> {
    let mut category_data: HashMap<&str, (f64, usize)> = HashMap::new();
    for expense in expenses {
        let entry = category_data
            .entry(expense.category_name.as_str())
            .or_insert((0.0, 0));
        entry.0 += expense.amount;
        entry.1 += 1;
    }

    let total: f64 = category_data.values().map(|(total, _)| total).sum();

    let mut result: Vec<CategoryBreakdown> = category_data
        .into_iter()
        .map(|(category, (category_total, transaction_count))| CategoryBreakdown {
            category: category.to_string(),
            total: category_total,
            percentage: if total != 0.0 {
                category_total / total * 100.0
            } else {
                0.0
            },
            transaction_count,
        })
        .collect();

    result.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });
    result
}

/// Month × category totals. Rows follow `months`, columns follow
/// `categories`; a cell is absent when the category has no spend that month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyCategoryMatrix {
    pub months: Vec<String>,
    pub categories: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl MonthlyCategoryMatrix {
    pub fn column(&self, category: &str) -> Option<Vec<Option<f64>>> {
        let index = self.categories.iter().position(|c| c == category)?;
        Some(self.values.iter().map(|row| row[index]).collect())
    }
}

pub fn monthly_by_category(expenses: &[&Expense]) -> MonthlyCategoryMatrix {
    let mut cells: BTreeMap<(String, &str), f64> = BTreeMap::new();
    let mut months = std::collections::BTreeSet::new();
    let mut categories = std::collections::BTreeSet::new();

    for expense in expenses {
        let month = month_key(expense.day());
        months.insert(month.clone());
        categories.insert(expense.category_name.as_str());
        *cells
            .entry((month, expense.category_name.as_str()))
            .or_insert(0.0) += expense.amount;
    }

    let months: Vec<String> = months.into_iter().collect();
    let categories: Vec<String> = categories.into_iter().map(str::to_string).collect();
    let values = months
        .iter()
        .map(|month| {
            categories
                .iter()
                .map(|category| cells.get(&(month.clone(), category.as_str())).copied())
                .collect()
        })
        .collect();

    MonthlyCategoryMatrix {
        months,
        categories,
        values,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayAverage {
    pub weekday: &'static str,
    /// Mean transaction amount on this weekday; absent without data.
    pub average: Option<f64>,
}

/// Mean amount per weekday, always seven entries Monday to Sunday.
pub fn average_by_weekday(expenses: &[&Expense]) -> Vec<WeekdayAverage> {
    let mut buckets: HashMap<chrono::Weekday, (f64, usize)> = HashMap::new();
    for expense in expenses {
        let entry = buckets.entry(expense.day().weekday()).or_insert((0.0, 0));
        entry.0 += expense.amount;
        entry.1 += 1;
    }

    WEEKDAYS
        .iter()
        .map(|weekday| WeekdayAverage {
            weekday: weekday_name(*weekday),
            average: buckets
                .get(weekday)
                .map(|(total, count)| total / *count as f64),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodComparison {
    pub category: String,
    pub period1: Option<f64>,
    pub period2: Option<f64>,
}

/// Per-category totals over two independent date windows, outer-joined on
/// category.
///
/// Callers pass the unfiltered records; the comparison is not narrowed by
/// the category or payee filters.
pub fn compare_periods(
    expenses: &[Expense],
    period1: &DateRange,
    period2: &DateRange,
) -> Vec<PeriodComparison> {
    let mut rows: BTreeMap<&str, (Option<f64>, Option<f64>)> = BTreeMap::new();

    for expense in expenses {
        let day = expense.day();
        if period1.contains(day) {
            let slot = &mut rows.entry(expense.category_name.as_str()).or_default().0;
            *slot = Some(slot.unwrap_or(0.0) + expense.amount);
        }
        if period2.contains(day) {
            let slot = &mut rows.entry(expense.category_name.as_str()).or_default().1;
            *slot = Some(slot.unwrap_or(0.0) + expense.amount);
        }
    }

    rows.into_iter()
        .map(|(category, (period1, period2))| PeriodComparison {
            category: category.to_string(),
            period1,
            period2,
        })
        .collect()
}

/// The `n` largest individual expenses, largest first. Ties keep their
/// original order.
pub fn top_expenses(expenses: &[&Expense], n: usize) -> Vec<Expense> {
    let mut ranked: Vec<&Expense> = expenses.to_vec();
    ranked.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    ranked.into_iter().take(n).cloned().collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayeeTotal {
    pub payee: String,
    pub total: f64,
}

/// Payees ranked by total spend, at most `limit` of them.
pub fn top_payees(expenses: &[&Expense], limit: usize) -> Vec<PayeeTotal> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for expense in expenses {
        *totals.entry(expense.paid_to.as_str()).or_insert(0.0) += expense.amount;
    }

    let mut result: Vec<PayeeTotal> = totals
        .into_iter()
        .map(|(payee, total)| PayeeTotal {
            payee: payee.to_string(),
            total,
        })
        .collect();
    result.sort_by(|a, b| b.total.total_cmp(&a.total).then_with(|| a.payee.cmp(&b.payee)));
    result.truncate(limit);
    result
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStatistics {
    pub category: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; absent for a single transaction.
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Descriptive statistics of the amounts in each category, categories in
/// ascending order.
pub fn statistics_by_category(expenses: &[&Expense]) -> Vec<CategoryStatistics> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for expense in expenses {
        groups
            .entry(expense.category_name.as_str())
            .or_default()
            .push(expense.amount);
    }

    groups
        .into_iter()
        .map(|(category, mut amounts)| {
            amounts.sort_by(f64::total_cmp);
            let count = amounts.len();
            let mean = amounts.iter().sum::<f64>() / count as f64;
            let std = (count > 1).then(|| {
                let squares: f64 = amounts.iter().map(|a| (a - mean).powi(2)).sum();
                (squares / (count - 1) as f64).sqrt()
            });
            CategoryStatistics {
                category: category.to_string(),
                count,
                mean,
                std,
                min: amounts[0],
                q25: quantile(&amounts, 0.25),
                median: quantile(&amounts, 0.5),
                q75: quantile(&amounts, 0.75),
                max: amounts[count - 1],
            }
        })
        .collect()
}

/// Linear-interpolated quantile of an ascending, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (position - lower as f64)
}

fn sum<'a>(expenses: impl Iterator<Item = &'a Expense>) -> f64 {
    expenses.map(|e| e.amount).sum()
}
