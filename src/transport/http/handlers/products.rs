use crate::domain::product::{Product, ProductFields, ProductId};
use crate::transport::http::error::ApiError;
use crate::transport::http::types::{
    ApiResponse, AppState, IdQuery, InsertResult, MessageResponse, SKIPPED_RECORDS_HEADER,
};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::{info, warn};

fn parse_id(query: &IdQuery) -> Result<ProductId, ApiError> {
    let raw = query.id.as_deref().ok_or(ApiError::MissingId)?;
    if raw.trim().is_empty() {
        return Err(ApiError::MissingId);
    }
    Ok(raw.parse()?)
}

#[utoipa::path(
    get,
    path = "/products",
    responses(
        (status = 200, description = "All products (empty array when none)", body = Vec<Product>),
        (status = 500, description = "Store error", body = ApiResponse)
    )
)]
pub async fn list_products_handler(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let listing = state.store.find_all().await?;
    if listing.skipped > 0 {
        warn!(skipped = listing.skipped, "listing left out undecodable documents");
    }
    Ok((
        [(SKIPPED_RECORDS_HEADER, listing.skipped.to_string())],
        Json(listing.products),
    ))
}

#[utoipa::path(
    post,
    path = "/products",
    request_body = ProductFields,
    responses(
        (status = 201, description = "Product created", body = InsertResult),
        (status = 400, description = "Invalid JSON body", body = ApiResponse),
        (status = 500, description = "Store error", body = ApiResponse)
    )
)]
pub async fn create_product_handler(
    State(state): State<AppState>,
    body: Result<Json<ProductFields>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(fields) = body?;
    let id = state.store.insert(Product::from(fields)).await?;
    info!(%id, "product created");
    Ok((
        StatusCode::CREATED,
        Json(InsertResult {
            inserted_id: id.to_hex(),
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/products",
    params(IdQuery),
    request_body = ProductFields,
    responses(
        (status = 200, description = "Product updated", body = MessageResponse),
        (status = 400, description = "Missing/invalid id or invalid JSON body", body = ApiResponse),
        (status = 404, description = "No product with that id", body = ApiResponse),
        (status = 500, description = "Store error", body = ApiResponse)
    )
)]
pub async fn update_product_handler(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
    body: Result<Json<ProductFields>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Query(query) = query?;
    let id = parse_id(&query)?;
    let Json(fields) = body?;
    if !state.store.update_by_id(id, fields).await? {
        return Err(ApiError::NotFound(id));
    }
    info!(%id, "product updated");
    Ok(Json(MessageResponse::new("product updated")))
}

#[utoipa::path(
    delete,
    path = "/products",
    params(IdQuery),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 400, description = "Missing/invalid id or malformed query", body = ApiResponse),
        (status = 404, description = "No product with that id", body = ApiResponse),
        (status = 500, description = "Store error", body = ApiResponse)
    )
)]
pub async fn delete_product_handler(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Query(query) = query?;
    let id = parse_id(&query)?;
    if !state.store.delete_by_id(id).await? {
        return Err(ApiError::NotFound(id));
    }
    info!(%id, "product deleted");
    Ok(Json(MessageResponse::new("product deleted")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_parameter_rules() {
        let q = |id: Option<&str>| IdQuery {
            id: id.map(str::to_string),
        };
        assert!(matches!(parse_id(&q(None)), Err(ApiError::MissingId)));
        assert!(matches!(parse_id(&q(Some(""))), Err(ApiError::MissingId)));
        assert!(matches!(parse_id(&q(Some("xyz"))), Err(ApiError::InvalidId(_))));
        assert!(parse_id(&q(Some("65f1c2a9e4b0a1b2c3d4e5f6"))).is_ok());
    }
}
