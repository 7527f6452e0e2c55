//! Product collection persisted in PostgreSQL as JSONB documents.

use super::{validate_ident, with_deadline, ProductListing, ProductStore, StoreError};
use crate::domain::product::{Product, ProductFields, ProductId};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::collections::HashSet;
use std::time::Duration;

/// A document collection backed by a table `<collection>(seq, id, document)`.
///
/// `seq` only fixes the listing order; the product id is the `id` column.
#[derive(Clone)]
pub struct PostgresProductStore {
    pool: PgPool,
    collection: String,
    timeout: Duration,
}

impl PostgresProductStore {
    /// Connects and makes sure the collection table exists.
    pub async fn connect(
        database_url: &str,
        collection: &str,
        max_connections: u32,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = with_deadline("connect", timeout, async {
            Ok::<_, StoreError>(PgPoolOptions::new()
                .max_connections(max_connections)
                .acquire_timeout(timeout)
                .connect(database_url)
                .await?)
        })
        .await?;
        let store = Self::new_with_pool(pool, collection, timeout)?;
        store.ensure_collection().await?;
        Ok(store)
    }

    pub fn new_with_pool(pool: PgPool, collection: &str, timeout: Duration) -> Result<Self, StoreError> {
        if !validate_ident(collection) {
            return Err(StoreError::InvalidCollection(collection.to_string()));
        }
        Ok(Self {
            pool,
            collection: collection.to_string(),
            timeout,
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub async fn ensure_collection(&self) -> Result<(), StoreError> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                seq BIGSERIAL,
                id TEXT PRIMARY KEY,
                document JSONB NOT NULL
            )",
            self.collection
        );
        with_deadline("ensure_collection", self.timeout, async {
            sqlx::query(&sql).execute(&self.pool).await?;
            Ok::<_, StoreError>(())
        })
        .await
    }

    fn document(product: &Product) -> Result<JsonValue, StoreError> {
        Ok(serde_json::to_value(product.fields())?)
    }

    fn decode_row(row: &sqlx::postgres::PgRow) -> Option<Product> {
        let id: String = row.try_get("id").ok()?;
        let document: JsonValue = row.try_get("document").ok()?;
        let id: ProductId = id.parse().ok()?;
        let fields: ProductFields = serde_json::from_value(document).ok()?;
        Some(Product::from(fields).with_id(id))
    }
}

#[async_trait]
impl ProductStore for PostgresProductStore {
    async fn find_all(&self) -> Result<ProductListing, StoreError> {
        let sql = format!("SELECT id, document FROM {} ORDER BY seq", self.collection);
        with_deadline("find_all", self.timeout, async {
            let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
            let mut listing = ProductListing {
                products: Vec::with_capacity(rows.len()),
                skipped: 0,
            };
            for row in &rows {
                match Self::decode_row(row) {
                    Some(product) => listing.products.push(product),
                    None => listing.skipped += 1,
                }
            }
            Ok::<_, StoreError>(listing)
        })
        .await
    }

    async fn insert(&self, product: Product) -> Result<ProductId, StoreError> {
        let id = ProductId::generate();
        let document = Self::document(&product)?;
        let sql = format!("INSERT INTO {} (id, document) VALUES ($1, $2)", self.collection);
        with_deadline("insert", self.timeout, async {
            sqlx::query(&sql)
                .bind(id.to_hex())
                .bind(document)
                .execute(&self.pool)
                .await?;
            Ok::<_, StoreError>(id)
        })
        .await
    }

    async fn insert_many(&self, products: Vec<Product>) -> Result<Vec<ProductId>, StoreError> {
        if products.is_empty() {
            return Ok(Vec::new());
        }
        let mut seen = HashSet::with_capacity(products.len());
        let mut batch = Vec::with_capacity(products.len());
        for product in &products {
            let id = product.id.unwrap_or_else(ProductId::generate);
            if !seen.insert(id) {
                return Err(StoreError::DuplicateId(id));
            }
            batch.push((id, Self::document(product)?));
        }
        let sql = format!("INSERT INTO {} (id, document) VALUES ($1, $2)", self.collection);

        with_deadline("insert_many", self.timeout, async {
            let mut tx = self.pool.begin().await?;
            for (id, document) in &batch {
                sqlx::query(&sql)
                    .bind(id.to_hex())
                    .bind(document)
                    .execute(tx.as_mut())
                    .await
                    .map_err(|e| {
                        if matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation()) {
                            StoreError::DuplicateId(*id)
                        } else {
                            StoreError::Database(e)
                        }
                    })?;
            }
            tx.commit().await?;
            Ok::<_, StoreError>(batch.iter().map(|(id, _)| *id).collect::<Vec<_>>())
        })
        .await
    }

    async fn update_by_id(&self, id: ProductId, fields: ProductFields) -> Result<bool, StoreError> {
        let document = serde_json::to_value(&fields)?;
        let sql = format!("UPDATE {} SET document = $2 WHERE id = $1", self.collection);
        with_deadline("update_by_id", self.timeout, async {
            let result = sqlx::query(&sql)
                .bind(id.to_hex())
                .bind(document)
                .execute(&self.pool)
                .await?;
            Ok::<_, StoreError>(result.rows_affected() > 0)
        })
        .await
    }

    async fn delete_by_id(&self, id: ProductId) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.collection);
        with_deadline("delete_by_id", self.timeout, async {
            let result = sqlx::query(&sql).bind(id.to_hex()).execute(&self.pool).await?;
            Ok::<_, StoreError>(result.rows_affected() > 0)
        })
        .await
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let sql = format!("SELECT COUNT(*) AS n FROM {}", self.collection);
        with_deadline("count", self.timeout, async {
            let row = sqlx::query(&sql).fetch_one(&self.pool).await?;
            let n: i64 = row.try_get("n")?;
            Ok::<_, StoreError>(n.max(0) as u64)
        })
        .await
    }
}
