use std::collections::BTreeSet;

use crate::date_utils::{parse_date, DateRange};
use crate::error::{AppError, AppResult};
use crate::models::selection::{clamp_top_n, DEFAULT_TOP_N};
use crate::models::{BudgetSelection, DashboardSelection, FilterSelection, UserId};
use crate::services::table::ExpenseTable;

/// Length in days of the default comparison windows.
pub const DEFAULT_PERIOD_DAYS: i64 = 30;

/// The raw dashboard query string.
///
/// `category` and `payee` may repeat, which is why this is parsed from
/// key/value pairs instead of a flat struct.
#[derive(Debug, Default, Clone)]
pub struct DashboardQuery {
    pub user_id: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub categories: Vec<String>,
    pub payees: Vec<String>,
    pub budget_category: Option<String>,
    pub budget_amount: Option<String>,
    pub period1_from: Option<String>,
    pub period1_to: Option<String>,
    pub period2_from: Option<String>,
    pub period2_to: Option<String>,
    pub top_n: Option<String>,
}

impl DashboardQuery {
    pub fn parse(raw: Option<&str>) -> AppResult<Self> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw.unwrap_or(""))
            .map_err(|e| AppError::Validation(format!("Malformed query string: {e}")))?;

        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "user_id" => &mut query.user_id,
                "from_date" => &mut query.from_date,
                "to_date" => &mut query.to_date,
                "budget_category" => &mut query.budget_category,
                "budget_amount" => &mut query.budget_amount,
                "period1_from" => &mut query.period1_from,
                "period1_to" => &mut query.period1_to,
                "period2_from" => &mut query.period2_from,
                "period2_to" => &mut query.period2_to,
                "top_n" => &mut query.top_n,
                "category" => {
                    push_non_empty(&mut query.categories, value);
                    continue;
                }
                "payee" => {
                    push_non_empty(&mut query.payees, value);
                    continue;
                }
                _ => continue,
            };
            // First occurrence wins; empty form fields count as absent.
            if slot.is_none() && !value.is_empty() {
                *slot = Some(value);
            }
        }
        Ok(query)
    }

    pub fn user_id(&self) -> AppResult<UserId> {
        UserId::from_param(self.user_id.as_deref())
    }

    /// Fill in defaults from the data and bring every widget value into its
    /// allowed range.
    pub fn resolve(&self, table: &ExpenseTable) -> DashboardSelection {
        let bounds = table.selectable_range();
        let data = table.data_range();

        let date_range = resolve_range(
            self.from_date.as_deref(),
            self.to_date.as_deref(),
            bounds,
        )
        .clamp_to(&bounds);

        let filter = FilterSelection {
            date_range,
            categories: self.categories.iter().cloned().collect::<BTreeSet<_>>(),
            payees: self.payees.iter().cloned().collect::<BTreeSet<_>>(),
        };

        let categories = table.categories();
        let budget = match self.budget_category.as_ref() {
            Some(category) if categories.contains(category) => Some(category.clone()),
            _ => categories.first().cloned(),
        }
        .map(|category| BudgetSelection {
            category,
            amount: self
                .budget_amount
                .as_deref()
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite() && *v >= 0.0)
                .unwrap_or(0.0),
        });

        let period1 = resolve_range(
            self.period1_from.as_deref(),
            self.period1_to.as_deref(),
            DateRange::starting_at(data.from, DEFAULT_PERIOD_DAYS),
        );
        let period2 = resolve_range(
            self.period2_from.as_deref(),
            self.period2_to.as_deref(),
            DateRange::ending_at(data.to, DEFAULT_PERIOD_DAYS),
        );

        let top_n = self
            .top_n
            .as_deref()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .map(clamp_top_n)
            .unwrap_or(DEFAULT_TOP_N);

        DashboardSelection {
            filter,
            budget,
            period1,
            period2,
            top_n,
        }
    }
}

fn push_non_empty(values: &mut Vec<String>, value: String) {
    if !value.is_empty() && !values.contains(&value) {
        values.push(value);
    }
}

/// Parse a `from`/`to` pair, falling back to `default` for missing or
/// unparsable ends. Reversed ends are swapped.
fn resolve_range(from: Option<&str>, to: Option<&str>, default: DateRange) -> DateRange {
    let from = from.and_then(parse_date).unwrap_or(default.from);
    let to = to.and_then(parse_date).unwrap_or(default.to);
    if from <= to {
        DateRange::from_dates(from, to)
    } else {
        DateRange::from_dates(to, from)
    }
}

/// Query string that reproduces the user and filter selection, used for the
/// CSV download link.
pub fn filter_query_string(user: &UserId, filter: &FilterSelection) -> String {
    let mut parts = vec![
        format!("user_id={}", user),
        format!("from_date={}", filter.date_range.from_iso()),
        format!("to_date={}", filter.date_range.to_iso()),
    ];
    parts.extend(
        filter
            .categories
            .iter()
            .map(|c| format!("category={}", urlencoding::encode(c))),
    );
    parts.extend(
        filter
            .payees
            .iter()
            .map(|p| format!("payee={}", urlencoding::encode(p))),
    );
    parts.join("&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EXCLUDED_CATEGORY;
    use crate::models::{RawDate, RawExpense};
    use chrono::NaiveDate;

    const USER: &str = "65a1f0c2b3d4e5f601234567";

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn table() -> ExpenseTable {
        let rows = [
            ("2024-01-01", 10.0, "Food", "Cafe"),
            ("2024-02-15", 20.0, "Rent & Bills", "Landlord"),
            ("2024-03-31", 5.0, "Transport", "Metro"),
        ];
        let raw = rows
            .iter()
            .enumerate()
            .map(|(i, (date, amount, category, payee))| RawExpense {
                id: i.to_string(),
                date: RawDate::Text(date.to_string()),
                amount: *amount,
                category_name: Some(category.to_string()),
                paid_to: Some(payee.to_string()),
            })
            .collect();
        ExpenseTable::from_raw(UserId::parse(USER).unwrap(), raw, EXCLUDED_CATEGORY).unwrap()
    }

    #[test]
    fn test_parse_repeated_keys() {
        let query = DashboardQuery::parse(Some(
            "user_id=65a1f0c2b3d4e5f601234567&category=Food&category=Rent+%26+Bills&payee=Cafe&category=",
        ))
        .unwrap();
        assert_eq!(query.user_id.as_deref(), Some(USER));
        assert_eq!(query.categories, vec!["Food", "Rent & Bills"]);
        assert_eq!(query.payees, vec!["Cafe"]);
    }

    #[test]
    fn test_missing_user_id() {
        let query = DashboardQuery::parse(None).unwrap();
        assert!(matches!(query.user_id(), Err(AppError::MissingUserId)));

        let query = DashboardQuery::parse(Some("user_id=")).unwrap();
        assert!(matches!(query.user_id(), Err(AppError::MissingUserId)));
    }

    #[test]
    fn test_defaults() {
        let table = table();
        let selection = DashboardQuery::default().resolve(&table);

        assert_eq!(
            selection.filter.date_range,
            DateRange::from_dates(day(2024, 1, 1), day(2024, 3, 31))
        );
        assert!(selection.filter.categories.is_empty());
        assert_eq!(selection.budget.as_ref().unwrap().category, "Food");
        assert_eq!(selection.budget.as_ref().unwrap().amount, 0.0);
        assert_eq!(
            selection.period1,
            DateRange::from_dates(day(2024, 1, 1), day(2024, 1, 31))
        );
        assert_eq!(
            selection.period2,
            DateRange::from_dates(day(2024, 3, 1), day(2024, 3, 31))
        );
        assert_eq!(selection.top_n, DEFAULT_TOP_N);
    }

    #[test]
    fn test_date_range_is_clamped_and_bad_values_fall_back() {
        let table = table();
        let query = DashboardQuery {
            from_date: Some("2020-01-01".into()),
            to_date: Some("not-a-date".into()),
            ..Default::default()
        };
        let selection = query.resolve(&table);
        assert_eq!(
            selection.filter.date_range,
            DateRange::from_dates(day(2024, 1, 1), day(2024, 3, 31))
        );
    }

    #[test]
    fn test_top_n_is_clamped() {
        let table = table();
        for (raw, expected) in [("1", 5), ("7", 7), ("50", 20), ("x", DEFAULT_TOP_N)] {
            let query = DashboardQuery {
                top_n: Some(raw.into()),
                ..Default::default()
            };
            assert_eq!(query.resolve(&table).top_n, expected, "top_n={raw}");
        }
    }

    #[test]
    fn test_budget_selection() {
        let table = table();
        let query = DashboardQuery {
            budget_category: Some("Transport".into()),
            budget_amount: Some("250.5".into()),
            ..Default::default()
        };
        let budget = query.resolve(&table).budget.unwrap();
        assert_eq!(budget.category, "Transport");
        assert_eq!(budget.amount, 250.5);

        let query = DashboardQuery {
            budget_category: Some("Holidays".into()),
            budget_amount: Some("-3".into()),
            ..Default::default()
        };
        let budget = query.resolve(&table).budget.unwrap();
        assert_eq!(budget.category, "Food");
        assert_eq!(budget.amount, 0.0);
    }

    #[test]
    fn test_reversed_period_is_swapped() {
        let table = table();
        let query = DashboardQuery {
            period1_from: Some("2024-02-10".into()),
            period1_to: Some("2024-02-01".into()),
            ..Default::default()
        };
        assert_eq!(
            query.resolve(&table).period1,
            DateRange::from_dates(day(2024, 2, 1), day(2024, 2, 10))
        );
    }

    #[test]
    fn test_filter_query_string_round_trips() {
        let table = table();
        let query = DashboardQuery {
            categories: vec!["Rent & Bills".into()],
            payees: vec!["Landlord".into()],
            ..Default::default()
        };
        let selection = query.resolve(&table);
        let user = UserId::parse(USER).unwrap();
        let qs = filter_query_string(&user, &selection.filter);

        let parsed = DashboardQuery::parse(Some(&qs)).unwrap();
        assert_eq!(parsed.user_id.as_deref(), Some(USER));
        assert_eq!(parsed.categories, vec!["Rent & Bills"]);
        assert_eq!(parsed.payees, vec!["Landlord"]);
        assert_eq!(parsed.from_date.as_deref(), Some("2024-01-01"));
        assert_eq!(parsed.to_date.as_deref(), Some("2024-03-31"));
    }
}
