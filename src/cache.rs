use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::AppResult;
use crate::models::UserId;
use crate::services::table::ExpenseTable;
use crate::store::ExpenseStore;

/// Normalised expense tables memoised per user for the life of the process.
///
/// Entries are never invalidated; the dashboard is read-only. A failed or
/// empty fetch is not cached.
#[derive(Default)]
pub struct AppCache {
    tables: RwLock<HashMap<UserId, Arc<ExpenseTable>>>,
}

impl AppCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user: &UserId) -> Option<Arc<ExpenseTable>> {
        let guard = self.tables.read().ok()?;
        guard.get(user).cloned()
    }

    fn set(&self, table: Arc<ExpenseTable>) {
        if let Ok(mut guard) = self.tables.write() {
            guard.insert(table.user().clone(), table);
        }
    }

    pub fn len(&self) -> usize {
        self.tables.read().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The table for `user`, fetching and normalising it on first access.
    pub async fn load_expenses(
        &self,
        store: &ExpenseStore,
        user: &UserId,
        excluded_category: &str,
    ) -> AppResult<Arc<ExpenseTable>> {
        if let Some(cached) = self.get(user) {
            tracing::trace!(user = %user, "Expense table cache hit");
            return Ok(cached);
        }

        tracing::debug!(user = %user, backend = store.backend_name(), "Expense table cache miss");
        let raw = store.find_by_user(user).await?;
        let table = Arc::new(ExpenseTable::from_raw(user.clone(), raw, excluded_category)?);
        self.set(table.clone());
        Ok(table)
    }
}
