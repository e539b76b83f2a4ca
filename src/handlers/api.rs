use axum::extract::{RawQuery, State};
use axum::response::Json;

use crate::error::AppResult;
use crate::handlers::params::DashboardQuery;
use crate::services::dashboard::{build_dashboard, Dashboard};
use crate::state::AppState;

/// Every dashboard view as JSON, for the same query string the page accepts.
pub async fn dashboard(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> AppResult<Json<Dashboard>> {
    let query = DashboardQuery::parse(raw.as_deref())?;
    let user = query.user_id()?;

    let table = state.expenses_for(&user).await?;
    let selection = query.resolve(&table);

    Ok(Json(build_dashboard(
        &table,
        selection,
        &state.config.currency_symbol,
    )))
}
