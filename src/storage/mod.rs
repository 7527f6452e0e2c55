pub mod products;

pub use products::{
    InMemoryProductStore, PostgresProductStore, ProductListing, ProductStore, StoreError,
};
