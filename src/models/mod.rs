pub mod expense;
pub mod selection;
pub mod user_id;

pub use expense::{Expense, RawDate, RawExpense, UNCATEGORIZED, UNKNOWN_PAYEE};
pub use selection::{BudgetSelection, DashboardSelection, FilterSelection};
pub use user_id::UserId;
