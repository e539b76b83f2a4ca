//! Where expense records come from.
//!
//! The hosted document store is the production source. A SQLite mirror with
//! the same shape backs local development and the test suite.

pub mod mongo;

pub use mongo::MongoStore;

use crate::config::StoreConfig;
use crate::db::queries::expenses;
use crate::db::{create_pool, migrations, DbPool};
use crate::error::AppResult;
use crate::models::{RawExpense, UserId};

#[derive(Clone)]
pub enum ExpenseStore {
    Mongo(MongoStore),
    Sqlite(DbPool),
}

impl ExpenseStore {
    pub fn from_config(config: &StoreConfig) -> AppResult<Self> {
        match config {
            StoreConfig::Mongo(mongo) => Ok(Self::Mongo(MongoStore::new(mongo.clone()))),
            StoreConfig::Sqlite {
                database_path,
                migrations_path,
            } => {
                let pool = create_pool(database_path)?;
                {
                    let conn = pool.get()?;
                    migrations::run_migrations(&conn, migrations_path)?;
                }
                Ok(Self::Sqlite(pool))
            }
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Mongo(_) => "mongodb",
            Self::Sqlite(_) => "sqlite",
        }
    }

    /// Every stored record whose `user` equals `user`. No paging, projection
    /// or sorting is pushed down.
    pub async fn find_by_user(&self, user: &UserId) -> AppResult<Vec<RawExpense>> {
        match self {
            Self::Mongo(store) => store.find_by_user(user).await,
            Self::Sqlite(pool) => {
                let conn = pool.get()?;
                Ok(expenses::list_expenses_for_user(&conn, user)?)
            }
        }
    }
}
