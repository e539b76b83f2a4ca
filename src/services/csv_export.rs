use crate::date_utils::format_timestamp;
use crate::error::{AppError, AppResult};
use crate::models::Expense;

pub const CSV_FILE_NAME: &str = "filtered_expenses.csv";

const HEADER: [&str; 6] = ["id", "user", "date", "amount", "categoryName", "paidTo"];

/// Serialise expenses as UTF-8 CSV with a header row, one line per record.
pub fn write_csv(expenses: &[&Expense]) -> AppResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(HEADER)?;
    for expense in expenses {
        let date = format_timestamp(&expense.date);
        let amount = expense.amount.to_string();
        writer.write_record([
            expense.id.as_str(),
            expense.user.as_str(),
            date.as_str(),
            amount.as_str(),
            expense.category_name.as_str(),
            expense.paid_to.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Io(e.into_error()))
}
