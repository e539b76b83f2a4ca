use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::date_utils::DateRange;

pub const DEFAULT_TOP_N: usize = 10;
pub const MIN_TOP_N: usize = 5;
pub const MAX_TOP_N: usize = 20;
pub const TOP_PAYEES: usize = 10;

/// The predicates that narrow the expense table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSelection {
    pub date_range: DateRange,
    /// Empty means every category.
    pub categories: BTreeSet<String>,
    /// Empty means every payee.
    pub payees: BTreeSet<String>,
}

impl FilterSelection {
    pub fn all(date_range: DateRange) -> Self {
        Self {
            date_range,
            categories: BTreeSet::new(),
            payees: BTreeSet::new(),
        }
    }

    pub fn matches(&self, day: NaiveDate, category: &str, payee: &str) -> bool {
        self.date_range.contains(day)
            && (self.categories.is_empty() || self.categories.contains(category))
            && (self.payees.is_empty() || self.payees.contains(payee))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetSelection {
    pub category: String,
    pub amount: f64,
}

/// Everything the dashboard reads on a re-run: filters plus widget-local
/// parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSelection {
    pub filter: FilterSelection,
    pub budget: Option<BudgetSelection>,
    pub period1: DateRange,
    pub period2: DateRange,
    pub top_n: usize,
}

pub fn clamp_top_n(n: usize) -> usize {
    n.clamp(MIN_TOP_N, MAX_TOP_N)
}
