use chrono::NaiveDate;

use crate::date_utils::{parse_timestamp, DateRange};
use crate::error::{AppError, AppResult};
use crate::models::{
    Expense, FilterSelection, RawDate, RawExpense, UserId, UNCATEGORIZED, UNKNOWN_PAYEE,
};

/// The normalised expenses of one user.
///
/// Built once per user and shared read-only by every request afterwards.
#[derive(Debug, Clone)]
pub struct ExpenseTable {
    user: UserId,
    records: Vec<Expense>,
    min_date: NaiveDate,
    max_date: NaiveDate,
}

impl ExpenseTable {
    /// Normalise fetched records.
    ///
    /// Every date must parse, otherwise the whole load fails. Records in
    /// `excluded_category` are dropped. An empty result is an error, not an
    /// empty dashboard.
    pub fn from_raw(
        user: UserId,
        raw: Vec<RawExpense>,
        excluded_category: &str,
    ) -> AppResult<Self> {
        if raw.is_empty() {
            return Err(AppError::NoData);
        }

        let mut records = Vec::with_capacity(raw.len());
        for expense in raw {
            let date = match &expense.date {
                RawDate::Timestamp(ts) => *ts,
                RawDate::Text(text) => parse_timestamp(text).ok_or_else(|| {
                    AppError::MalformedRecord(format!(
                        "record {} has an unparsable date {:?}",
                        expense.id, text
                    ))
                })?,
                RawDate::Missing => {
                    return Err(AppError::MalformedRecord(format!(
                        "record {} has no date",
                        expense.id
                    )))
                }
            };

            let category_name = expense
                .category_name
                .unwrap_or_else(|| UNCATEGORIZED.to_string());
            if category_name == excluded_category {
                continue;
            }

            records.push(Expense {
                id: expense.id,
                user: user.clone(),
                date,
                amount: expense.amount,
                category_name,
                paid_to: expense.paid_to.unwrap_or_else(|| UNKNOWN_PAYEE.to_string()),
            });
        }

        Self::from_records(user, records)
    }

    /// Wrap already normalised records.
    pub fn from_records(user: UserId, records: Vec<Expense>) -> AppResult<Self> {
        let min_date = records.iter().map(Expense::day).min();
        let max_date = records.iter().map(Expense::day).max();
        match (min_date, max_date) {
            (Some(min_date), Some(max_date)) => Ok(Self {
                user,
                records,
                min_date,
                max_date,
            }),
            _ => Err(AppError::NoData),
        }
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    pub fn records(&self) -> &[Expense] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest calendar day present in the data.
    pub fn data_range(&self) -> DateRange {
        DateRange::from_dates(self.min_date, self.max_date)
    }

    /// Range offered by the date filter, see [`DateRange::selectable`].
    pub fn selectable_range(&self) -> DateRange {
        DateRange::selectable(self.min_date, self.max_date)
    }

    /// Distinct categories in order of first appearance.
    pub fn categories(&self) -> Vec<String> {
        distinct(self.records.iter().map(|e| e.category_name.as_str()))
    }

    /// Distinct payees in order of first appearance.
    pub fn payees(&self) -> Vec<String> {
        distinct(self.records.iter().map(|e| e.paid_to.as_str()))
    }

    /// The records matching every predicate of `selection`.
    pub fn filter(&self, selection: &FilterSelection) -> Vec<&Expense> {
        self.records
            .iter()
            .filter(|e| selection.matches(e.day(), &e.category_name, &e.paid_to))
            .collect()
    }

    /// The records whose day falls inside `range`, ignoring every other
    /// filter.
    pub fn within(&self, range: &DateRange) -> Vec<&Expense> {
        self.records
            .iter()
            .filter(|e| range.contains(e.day()))
            .collect()
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}
