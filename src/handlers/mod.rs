pub mod api;
pub mod dashboard;
pub mod export;
pub mod params;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        // Pages
        .route("/", get(dashboard::index))
        // Export
        .route("/download.csv", get(export::download_csv))
        // API (JSON for every view)
        .route("/api/dashboard", get(api::dashboard))
        // Health check
        .route("/health", get(health))
}

async fn health() -> &'static str {
    "OK"
}
