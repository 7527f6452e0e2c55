use crate::domain::dashboard::DashboardSummary;
use crate::transport::http::error::ApiError;
use crate::transport::http::render::render_dashboard;
use crate::transport::http::types::{ApiResponse, AppState};
use axum::extract::State;
use axum::response::Html;
use tracing::warn;

#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Rendered dashboard", content_type = "text/html", body = String),
        (status = 500, description = "Store error", body = ApiResponse)
    )
)]
pub async fn dashboard_handler(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let listing = state.store.find_all().await?;
    if listing.skipped > 0 {
        warn!(skipped = listing.skipped, "dashboard left out undecodable documents");
    }
    let summary = DashboardSummary::from_products(&listing.products);
    Ok(Html(render_dashboard(&summary)))
}
