use axum::extract::{RawQuery, State};
use axum::http::header;
use axum::response::IntoResponse;

use crate::error::AppResult;
use crate::handlers::params::DashboardQuery;
use crate::services::csv_export::{write_csv, CSV_FILE_NAME};
use crate::state::AppState;

/// The currently filtered expenses as a CSV attachment.
pub async fn download_csv(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> AppResult<impl IntoResponse> {
    let query = DashboardQuery::parse(raw.as_deref())?;
    let user = query.user_id()?;

    let table = state.expenses_for(&user).await?;
    let selection = query.resolve(&table);
    let filtered = table.filter(&selection.filter);

    tracing::info!(user = %user, rows = filtered.len(), "Exporting filtered expenses");
    let body = write_csv(&filtered)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{CSV_FILE_NAME}\""),
            ),
        ],
        body,
    ))
}
