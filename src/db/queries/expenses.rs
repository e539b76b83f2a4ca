use rusqlite::{params, Connection};
use tracing::debug;

use crate::models::{RawDate, RawExpense, UserId};

/// All records belonging to `user`, in storage order.
pub fn list_expenses_for_user(
    conn: &Connection,
    user: &UserId,
) -> rusqlite::Result<Vec<RawExpense>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, amount, category_name, paid_to
         FROM expenses
         WHERE user = ?
         ORDER BY id",
    )?;

    let rows = stmt.query_map(params![user.as_str()], |row| {
        let date: Option<String> = row.get(1)?;
        Ok(RawExpense {
            id: row.get::<_, i64>(0)?.to_string(),
            date: date.map(RawDate::Text).unwrap_or(RawDate::Missing),
            amount: row.get(2)?,
            category_name: row.get(3)?,
            paid_to: row.get(4)?,
        })
    })?;

    let expenses = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    debug!(user = %user, count = expenses.len(), "Loaded expenses from SQLite");
    Ok(expenses)
}
