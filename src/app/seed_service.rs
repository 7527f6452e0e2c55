//! Seed and export of the product collection.
//!
//! One JSON file serves two purposes:
//! 1.  On startup it bootstraps an empty store (`seed_if_empty`).
//! 2.  On demand it receives a full snapshot of the store (`export`).
//!
//! Once the store holds data the file is only a mirror; seeding never touches a
//! non-empty store.

use crate::domain::product::Product;
use crate::storage::{ProductStore, StoreError};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("malformed seed file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to serialize products: {0}")]
    Serialize(serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store already had this many products; nothing was loaded.
    AlreadyPopulated(u64),
    /// The store was empty and there was no seed file to load.
    NoSeedFile,
    /// This many products were loaded from the seed file.
    Seeded(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub path: PathBuf,
    pub written: usize,
    /// Documents the store could not decode and therefore left out of the snapshot.
    pub skipped: usize,
}

pub struct SeedService {
    store: Arc<dyn ProductStore>,
    seed_path: PathBuf,
}

impl SeedService {
    pub fn new(store: Arc<dyn ProductStore>, seed_path: impl Into<PathBuf>) -> Self {
        Self {
            store,
            seed_path: seed_path.into(),
        }
    }

    pub fn seed_path(&self) -> &Path {
        &self.seed_path
    }

    /// Loads the seed file into the store if, and only if, the store is empty.
    pub async fn seed_if_empty(&self) -> Result<SeedOutcome, SeedError> {
        let existing = self.store.count().await?;
        if existing > 0 {
            return Ok(SeedOutcome::AlreadyPopulated(existing));
        }

        let products = match self.read_seed_file().await? {
            Some(products) => products,
            None => return Ok(SeedOutcome::NoSeedFile),
        };

        let inserted = self.store.insert_many(products).await?;
        Ok(SeedOutcome::Seeded(inserted.len()))
    }

    /// Startup entry point: runs [`seed_if_empty`](Self::seed_if_empty) and logs the
    /// outcome. Failures are logged and never abort startup.
    pub async fn seed_on_startup(&self) -> Option<SeedOutcome> {
        match self.seed_if_empty().await {
            Ok(outcome) => {
                match &outcome {
                    SeedOutcome::AlreadyPopulated(n) => {
                        info!(products = n, "store already populated, skipping seed")
                    }
                    SeedOutcome::NoSeedFile => info!(
                        path = %self.seed_path.display(),
                        "store empty and no seed file found, starting with empty inventory"
                    ),
                    SeedOutcome::Seeded(n) => info!(
                        products = n,
                        path = %self.seed_path.display(),
                        "seeded store from file"
                    ),
                }
                Some(outcome)
            }
            Err(e) => {
                error!(error = %e, "seeding aborted");
                None
            }
        }
    }

    /// Parses the seed file. `Ok(None)` when the file does not exist.
    pub async fn read_seed_file(&self) -> Result<Option<Vec<Product>>, SeedError> {
        let data = match tokio::fs::read(&self.seed_path).await {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SeedError::Read {
                    path: self.seed_path.clone(),
                    source,
                })
            }
        };
        let products = serde_json::from_slice(&data).map_err(|source| SeedError::Parse {
            path: self.seed_path.clone(),
            source,
        })?;
        Ok(Some(products))
    }

    /// Overwrites the seed file with a pretty-printed snapshot of the whole store.
    pub async fn export(&self) -> Result<ExportReport, SeedError> {
        let listing = self.store.find_all().await?;
        if listing.skipped > 0 {
            warn!(skipped = listing.skipped, "export left out undecodable documents");
        }

        let data = serde_json::to_vec_pretty(&listing.products).map_err(SeedError::Serialize)?;

        if let Some(parent) = self.seed_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| SeedError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        tokio::fs::write(&self.seed_path, data)
            .await
            .map_err(|source| SeedError::Write {
                path: self.seed_path.clone(),
                source,
            })?;

        info!(
            path = %self.seed_path.display(),
            products = listing.products.len(),
            "backup written"
        );
        Ok(ExportReport {
            path: self.seed_path.clone(),
            written: listing.products.len(),
            skipped: listing.skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryProductStore;

    fn service(store: Arc<dyn ProductStore>, dir: &tempfile::TempDir) -> SeedService {
        SeedService::new(store, dir.path().join("seeds").join("products.json"))
    }

    #[tokio::test]
    async fn missing_file_leaves_store_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(InMemoryProductStore::new());
        let seeder = service(store.clone(), &dir);

        assert_eq!(seeder.seed_if_empty().await.unwrap(), SeedOutcome::NoSeedFile);
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn populated_store_is_not_reseeded() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(InMemoryProductStore::with_products(vec![Product::new("a", 1.0, 1)]));
        let seeder = service(store.clone(), &dir);
        std::fs::create_dir_all(seeder.seed_path().parent().unwrap()).unwrap();
        std::fs::write(seeder.seed_path(), r#"[{"name":"b","price":2.0,"stock":2}]"#).unwrap();

        assert_eq!(
            seeder.seed_if_empty().await.unwrap(),
            SeedOutcome::AlreadyPopulated(1)
        );
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn malformed_file_aborts_without_inserting() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(InMemoryProductStore::new());
        let seeder = service(store.clone(), &dir);
        std::fs::create_dir_all(seeder.seed_path().parent().unwrap()).unwrap();
        std::fs::write(seeder.seed_path(), "[{\"name\": ").unwrap();

        assert!(matches!(
            seeder.seed_if_empty().await,
            Err(SeedError::Parse { .. })
        ));
        assert_eq!(seeder.seed_on_startup().await, None);
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn repeated_ids_in_file_abort_without_inserting() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(InMemoryProductStore::new());
        let seeder = service(store.clone(), &dir);
        std::fs::create_dir_all(seeder.seed_path().parent().unwrap()).unwrap();
        std::fs::write(
            seeder.seed_path(),
            r#"[
                {"id":"65f1c2a9e4b0a1b2c3d4e5f6","name":"a","price":1.0,"stock":1},
                {"id":"65f1c2a9e4b0a1b2c3d4e5f6","name":"b","price":2.0,"stock":2}
            ]"#,
        )
        .unwrap();

        assert!(matches!(
            seeder.seed_if_empty().await,
            Err(SeedError::Store(StoreError::DuplicateId(_)))
        ));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn empty_store_exports_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let seeder = service(Arc::new(InMemoryProductStore::new()), &dir);

        let report = seeder.export().await.unwrap();
        assert_eq!(report.written, 0);
        assert_eq!(std::fs::read_to_string(seeder.seed_path()).unwrap(), "[]");
    }

    #[tokio::test]
    async fn export_then_seed_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let source = Arc::new(InMemoryProductStore::with_products(vec![
            Product::new("Lamp", 12.5, 3),
            Product::new("Desk", 150.0, 1),
        ]));
        let report = service(source.clone(), &dir).export().await.unwrap();
        assert_eq!(report.written, 2);

        let text = std::fs::read_to_string(&report.path).unwrap();
        assert!(text.contains("\n  {\n    \"id\": "), "expected 2-space indentation: {text}");

        let target = Arc::new(InMemoryProductStore::new());
        let outcome = service(target.clone(), &dir).seed_if_empty().await.unwrap();
        assert_eq!(outcome, SeedOutcome::Seeded(2));
        assert_eq!(
            target.find_all().await.unwrap().products,
            source.find_all().await.unwrap().products
        );
    }
}
