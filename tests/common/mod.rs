//! Shared test utilities for integration tests.
//!
//! This module provides a `TestClient` that drives the full router against an
//! in-memory SQLite expense store. Methods are intentionally broad to support
//! various test scenarios across different test files.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use effintrak::cache::AppCache;
use effintrak::config::{Config, StoreConfig, EXCLUDED_CATEGORY};
use effintrak::db::{create_in_memory_pool, migrations, DbPool};
use effintrak::server;
use effintrak::state::AppState;
use effintrak::store::ExpenseStore;
use rusqlite::params;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower::ServiceExt;

pub const ALICE: &str = "65a1f0c2b3d4e5f601234567";
pub const BOB: &str = "65a1f0c2b3d4e5f60123abcd";
pub const NOBODY: &str = "000000000000000000000000";

/// A test client that issues requests against the application.
pub struct TestClient {
    state: AppState,
    pool: DbPool,
}

impl TestClient {
    /// Create a new test client with a fresh, empty in-memory store.
    pub fn new() -> Self {
        let pool = create_in_memory_pool().expect("Failed to create in-memory pool");
        {
            let conn = pool.get().expect("Failed to get connection");
            migrations::run_migrations(&conn, Path::new("migrations"))
                .expect("Failed to run migrations");
        }

        let config = Config {
            host: "127.0.0.1".into(),
            port: 8501,
            store: StoreConfig::Sqlite {
                database_path: PathBuf::from(":memory:"),
                migrations_path: PathBuf::from("migrations"),
            },
            excluded_category: EXCLUDED_CATEGORY.into(),
            currency_symbol: "$".into(),
        };

        let state = AppState {
            store: ExpenseStore::Sqlite(pool.clone()),
            config: Arc::new(config),
            cache: Arc::new(AppCache::new()),
        };

        Self { state, pool }
    }

    /// A client whose store already holds [`sample_expenses`] for `ALICE`
    /// and a couple of records for `BOB`.
    pub fn with_sample_data() -> Self {
        let client = Self::new();
        for (date, amount, category, payee) in sample_expenses() {
            client.insert_expense(ALICE, date, amount, Some(category), Some(payee));
        }
        client.insert_expense(BOB, "2024-05-01 12:00:00", 42.0, Some("Books"), Some("Library"));
        client.insert_expense(BOB, "2024-05-02 12:00:00", 8.0, Some("Food"), Some("Cafe"));
        client
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Get the full router, including the error page middleware.
    pub fn router(&self) -> Router {
        server::router(self.state.clone())
    }

    /// Insert one raw record straight into the store.
    pub fn insert_expense(
        &self,
        user: &str,
        date: &str,
        amount: f64,
        category: Option<&str>,
        payee: Option<&str>,
    ) {
        let conn = self.pool.get().expect("Failed to get connection");
        conn.execute(
            "INSERT INTO expenses (user, date, amount, category_name, paid_to)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![user, date, amount, category, payee],
        )
        .expect("Failed to insert expense");
    }

    /// Make a GET request and return the raw response.
    pub async fn get_response(&self, uri: &str) -> Response<Body> {
        self.router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    /// Make a GET request and return status and body.
    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let response = self.get_response(uri).await;
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&body).to_string())
    }

    /// Get JSON from an endpoint and parse it.
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        uri: &str,
    ) -> (StatusCode, Option<T>) {
        let (status, body) = self.get(uri).await;
        let parsed = serde_json::from_str(&body).ok();
        (status, parsed)
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Alice's records: three months, four categories, one excluded record.
pub fn sample_expenses() -> Vec<(&'static str, f64, &'static str, &'static str)> {
    vec![
        ("2024-01-01 09:15:00", 12.50, "Food", "Cafe"),
        ("2024-01-02 19:00:00", 80.00, "Groceries", "Supermarket"),
        ("2024-01-06 11:30:00", 5.00, "Transport", "Metro"),
        ("2024-01-15 08:00:00", 1200.00, EXCLUDED_CATEGORY, "Landlord"),
        ("2024-01-20 13:45:00", 30.00, "Food", "Bistro"),
        ("2024-02-03 10:00:00", 64.25, "Groceries", "Supermarket"),
        ("2024-02-14 20:30:00", 95.00, "Food", "Bistro"),
        ("2024-02-20 07:50:00", 5.00, "Transport", "Metro"),
        ("2024-03-01 18:10:00", 150.00, "Shopping", "Outlet"),
        ("2024-03-09 12:00:00", 18.75, "Food", "Cafe"),
        ("2024-03-30 16:20:00", 72.40, "Groceries", "Supermarket"),
    ]
}
