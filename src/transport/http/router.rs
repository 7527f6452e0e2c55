use crate::domain::product::{Product, ProductFields};
use crate::transport::http::error::method_not_allowed;
use crate::transport::http::handlers::{dashboard, export, health, products};
use crate::transport::http::types::{ApiResponse, AppState, InsertResult, MessageResponse};
use axum::routing::{get, post};
use axum::Router;
use std::path::Path;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        products::list_products_handler,
        products::create_product_handler,
        products::update_product_handler,
        products::delete_product_handler,
        dashboard::dashboard_handler,
        export::export_handler
    ),
    components(schemas(ApiResponse, Product, ProductFields, InsertResult, MessageResponse))
)]
pub struct ApiDoc;

/// Builds the full HTTP surface. `static_dir` holds `index.html` and the assets under `/static`.
pub fn create_router(app_state: AppState, static_dir: impl AsRef<Path>) -> Router {
    let static_dir = static_dir.as_ref();
    Router::new()
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(static_dir))
        .route("/health", get(health::healthcheck_handler))
        .route("/dashboard", get(dashboard::dashboard_handler))
        .route(
            "/products",
            get(products::list_products_handler)
                .post(products::create_product_handler)
                .put(products::update_product_handler)
                .delete(products::delete_product_handler)
                .fallback(method_not_allowed),
        )
        .route("/export", post(export::export_handler).fallback(method_not_allowed))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
