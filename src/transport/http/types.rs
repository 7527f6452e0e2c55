use crate::app::seed_service::SeedService;
use crate::storage::ProductStore;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

/// Handler context. Owns the store adapter; no other shared state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProductStore>,
    pub seeder: Arc<SeedService>,
}

impl AppState {
    pub fn new(store: Arc<dyn ProductStore>, seeder: SeedService) -> Self {
        Self {
            store,
            seeder: Arc::new(seeder),
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: JsonValue) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// `?id=<hex>` on update and delete.
#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IdQuery {
    /// 24-character hex product id.
    pub id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct InsertResult {
    pub inserted_id: String,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response header carrying the number of documents left out of a listing.
pub const SKIPPED_RECORDS_HEADER: &str = "x-skipped-records";
