//! In-process product collection, used for tests and `STORE_BACKEND=memory`.

use super::{ProductListing, ProductStore, StoreError};
use crate::domain::product::{Product, ProductFields, ProductId};
use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::RwLock;

/// Keeps products in insertion order. Every stored product has `id: Some(..)`.
#[derive(Default)]
pub struct InMemoryProductStore {
    products: RwLock<Vec<Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `products`. Missing ids are minted; an id already
    /// taken by an earlier product is replaced with a fresh one.
    pub fn with_products(products: Vec<Product>) -> Self {
        let mut seen = HashSet::new();
        let products = products
            .into_iter()
            .map(|p| {
                let id = match p.id {
                    Some(id) if seen.insert(id) => id,
                    _ => {
                        let id = ProductId::generate();
                        seen.insert(id);
                        id
                    }
                };
                p.with_id(id)
            })
            .collect();
        Self {
            products: RwLock::new(products),
        }
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn find_all(&self) -> Result<ProductListing, StoreError> {
        Ok(ProductListing {
            products: self.products.read().await.clone(),
            skipped: 0,
        })
    }

    async fn insert(&self, product: Product) -> Result<ProductId, StoreError> {
        let id = ProductId::generate();
        self.products.write().await.push(product.with_id(id));
        Ok(id)
    }

    async fn insert_many(&self, products: Vec<Product>) -> Result<Vec<ProductId>, StoreError> {
        if products.is_empty() {
            return Ok(Vec::new());
        }
        let mut guard = self.products.write().await;
        let mut taken: HashSet<ProductId> = guard.iter().filter_map(|p| p.id).collect();

        // Validate the whole batch before writing so a conflict leaves the store untouched.
        let mut batch = Vec::with_capacity(products.len());
        for product in products {
            let id = product.id.unwrap_or_else(ProductId::generate);
            if !taken.insert(id) {
                return Err(StoreError::DuplicateId(id));
            }
            batch.push(product.with_id(id));
        }

        let ids = batch.iter().filter_map(|p| p.id).collect();
        guard.extend(batch);
        Ok(ids)
    }

    async fn update_by_id(&self, id: ProductId, fields: ProductFields) -> Result<bool, StoreError> {
        let mut guard = self.products.write().await;
        match guard.iter_mut().find(|p| p.id == Some(id)) {
            Some(product) => {
                product.apply(fields);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_id(&self, id: ProductId) -> Result<bool, StoreError> {
        let mut guard = self.products.write().await;
        let before = guard.len();
        guard.retain(|p| p.id != Some(id));
        Ok(guard.len() != before)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.products.read().await.len() as u64)
    }
}
