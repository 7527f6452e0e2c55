//! Product store adapter: one document collection of products.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryProductStore;
pub use postgres::PostgresProductStore;

use crate::domain::product::{Product, ProductFields, ProductId};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

/// Default per-operation deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store operation '{op}' timed out after {after:?}")]
    Timeout { op: &'static str, after: Duration },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("document mapping failed: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("product id {0} is already in use")]
    DuplicateId(ProductId),
    #[error("invalid collection name '{0}'")]
    InvalidCollection(String),
}

/// Result of reading the whole collection.
///
/// Documents that cannot be mapped to a [`Product`] are left out and counted in `skipped`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductListing {
    pub products: Vec<Product>,
    pub skipped: usize,
}

/// Contract for any backend holding the product collection.
///
/// Every operation is bounded by the backend's deadline and fails with
/// [`StoreError`] rather than blocking indefinitely.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products in store order. Never fails on an empty collection.
    async fn find_all(&self) -> Result<ProductListing, StoreError>;

    /// Persists `product` under a freshly minted id, overwriting any id it carries.
    async fn insert(&self, product: Product) -> Result<ProductId, StoreError>;

    /// Bulk insert. Records that already carry an id keep it; others get a fresh one.
    /// An empty batch is a no-op. A carried id that repeats within the batch or is
    /// already stored fails the whole batch and nothing is written.
    async fn insert_many(&self, products: Vec<Product>) -> Result<Vec<ProductId>, StoreError>;

    /// Replaces name, price and stock. Returns `false` if no product has that id.
    async fn update_by_id(&self, id: ProductId, fields: ProductFields) -> Result<bool, StoreError>;

    /// Returns `false` if no product has that id.
    async fn delete_by_id(&self, id: ProductId) -> Result<bool, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;
}

/// Runs `fut` under `after`, mapping an elapsed deadline to [`StoreError::Timeout`].
pub async fn with_deadline<T, F>(op: &'static str, after: Duration, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    tokio::time::timeout(after, fut)
        .await
        .map_err(|_| StoreError::Timeout { op, after })?
}

/// Collection names are interpolated into SQL, so only plain identifiers are accepted.
pub fn validate_ident(ident: &str) -> bool {
    let mut chars = ident.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    ident.len() <= 63 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
