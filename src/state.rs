use std::sync::Arc;

use crate::cache::AppCache;
use crate::config::Config;
use crate::error::AppResult;
use crate::models::UserId;
use crate::services::table::ExpenseTable;
use crate::store::ExpenseStore;

#[derive(Clone)]
pub struct AppState {
    pub store: ExpenseStore,
    pub config: Arc<Config>,
    pub cache: Arc<AppCache>,
}

impl AppState {
    /// The cached, normalised expenses of `user`.
    pub async fn expenses_for(&self, user: &UserId) -> AppResult<Arc<ExpenseTable>> {
        self.cache
            .load_expenses(&self.store, user, &self.config.excluded_category)
            .await
    }
}
