use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::models::UserId;

/// Fallback label for records stored without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";
/// Fallback label for records stored without a payee.
pub const UNKNOWN_PAYEE: &str = "Unknown";

/// The date field of a record as it came out of the store.
#[derive(Debug, Clone, PartialEq)]
pub enum RawDate {
    /// Already a timestamp (e.g. a native BSON datetime).
    Timestamp(NaiveDateTime),
    /// Free text that still has to be parsed.
    Text(String),
    Missing,
}

/// A record as fetched, before normalisation.
#[derive(Debug, Clone)]
pub struct RawExpense {
    pub id: String,
    pub date: RawDate,
    pub amount: f64,
    pub category_name: Option<String>,
    pub paid_to: Option<String>,
}

/// A single normalised transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub user: UserId,
    pub date: NaiveDateTime,
    pub amount: f64,
    pub category_name: String,
    pub paid_to: String,
}

impl Expense {
    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }
}
