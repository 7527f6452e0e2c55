use crate::transport::http::error::ApiError;
use crate::transport::http::types::{ApiResponse, AppState};
use axum::extract::State;

#[utoipa::path(
    post,
    path = "/export",
    responses(
        (status = 200, description = "Snapshot written to the seed file", content_type = "text/plain", body = String),
        (status = 405, description = "Method not allowed", body = ApiResponse),
        (status = 500, description = "Read or write failure", body = ApiResponse)
    )
)]
pub async fn export_handler(State(state): State<AppState>) -> Result<String, ApiError> {
    let report = state.seeder.export().await?;
    Ok(format!(
        "Backup saved to {} ({} products)",
        report.path.display(),
        report.written
    ))
}
