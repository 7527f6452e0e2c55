//! Postgres adapter test. Runs against `DATABASE_URL` and is skipped when it is not set.
//!
//! Each run works in its own throwaway collection and drops it afterwards.

use inventory_service::{PostgresProductStore, Product, ProductFields, ProductId, ProductStore, StoreError};
use std::collections::HashSet;
use std::time::Duration;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_postgres_store() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        println!("DATABASE_URL not set, skipping postgres store test");
        return Ok(());
    };

    let collection = format!("products_test_{}", ProductId::generate());
    let store =
        PostgresProductStore::connect(&database_url, &collection, 2, Duration::from_secs(10)).await?;

    assert_eq!(store.count().await?, 0);
    assert!(store.find_all().await?.products.is_empty());
    assert!(store.insert_many(Vec::new()).await?.is_empty());

    let mut ids = HashSet::new();
    for i in 0..5 {
        ids.insert(store.insert(Product::new(format!("p{i}"), i as f64, i)).await?);
    }
    assert_eq!(ids.len(), 5);

    let kept = ProductId::generate();
    let seeded = store
        .insert_many(vec![
            Product::new("seeded", 9.5, 4).with_id(kept),
            Product::new("fresh", 1.0, 1),
        ])
        .await?;
    assert_eq!(seeded[0], kept);
    assert_eq!(store.count().await?, 7);

    // Repeated ids, in the batch or against stored rows, reject the whole batch.
    let repeated = ProductId::generate();
    let result = store
        .insert_many(vec![
            Product::new("x", 1.0, 1).with_id(repeated),
            Product::new("y", 1.0, 1).with_id(repeated),
        ])
        .await;
    assert!(matches!(result, Err(StoreError::DuplicateId(id)) if id == repeated));
    let result = store
        .insert_many(vec![
            Product::new("z", 1.0, 1),
            Product::new("clash", 1.0, 1).with_id(kept),
        ])
        .await;
    assert!(matches!(result, Err(StoreError::DuplicateId(id)) if id == kept));
    assert_eq!(store.count().await?, 7);

    let target = *ids.iter().next().unwrap();
    let fields = ProductFields {
        name: "renamed".into(),
        price: 42.0,
        stock: 2,
    };
    assert!(store.update_by_id(target, fields.clone()).await?);
    assert!(!store.update_by_id(ProductId::generate(), fields.clone()).await?);

    let listing = store.find_all().await?;
    assert_eq!(listing.skipped, 0);
    let updated = listing.products.iter().find(|p| p.id == Some(target)).unwrap();
    assert_eq!(updated.fields(), fields);
    assert_eq!(listing.products.len(), 7);

    // A document the adapter cannot map is skipped and counted, not fatal.
    sqlx::query(&format!(
        "INSERT INTO {} (id, document) VALUES ('garbage', '{{\"name\": 1}}')",
        collection
    ))
    .execute(store.pool())
    .await?;
    let listing = store.find_all().await?;
    assert_eq!(listing.skipped, 1);
    assert_eq!(listing.products.len(), 7);

    assert!(store.delete_by_id(target).await?);
    assert!(!store.delete_by_id(target).await?);
    assert!(store
        .find_all()
        .await?
        .products
        .iter()
        .all(|p| p.id != Some(target)));

    sqlx::query(&format!("DROP TABLE {}", collection))
        .execute(store.pool())
        .await?;
    Ok(())
}
