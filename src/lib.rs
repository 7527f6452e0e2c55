pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::seed_service::{SeedError, SeedOutcome, SeedService};
pub use domain::{DashboardSummary, Product, ProductFields, ProductId};
pub use infra::Config;
pub use storage::{InMemoryProductStore, PostgresProductStore, ProductStore, StoreError};
