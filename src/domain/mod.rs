//! Domain types for the inventory: products and the dashboard aggregation.

pub mod dashboard;
pub mod product;

pub use dashboard::DashboardSummary;
pub use product::{InvalidProductId, Product, ProductFields, ProductId};
