use inventory_service::infra::{Config, StoreBackend};
use inventory_service::{PostgresProductStore, ProductStore, SeedService};
use std::sync::Arc;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight\n\
         \n\
         Requires env vars:\n\
           DATABASE_URL\n\
         Optional:\n\
           PRODUCTS_COLLECTION, SEED_FILE, STORE_TIMEOUT_SECS, DB_MAX_CONNECTIONS\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    let config = Config::from_env()?;
    if config.backend != StoreBackend::Postgres {
        return Err(anyhow::anyhow!("preflight only checks the postgres backend"));
    }

    println!("> Preflight:");
    println!("  PRODUCTS_COLLECTION={}", config.collection);
    println!("  SEED_FILE={}", config.seed_file.display());
    println!("  STORE_TIMEOUT={:?}", config.store_timeout);

    let store = PostgresProductStore::connect(
        config.require_database_url()?,
        &config.collection,
        config.max_connections,
        config.store_timeout,
    )
    .await
    .map_err(|e| anyhow::anyhow!("Store unreachable: {}", e))?;
    println!("  Database reachable, collection '{}' ready.", store.collection());

    let count = store.count().await?;
    println!("  Products stored: {}", count);

    let seeder = SeedService::new(Arc::new(store), &config.seed_file);
    match seeder.read_seed_file().await {
        Ok(Some(products)) => println!("  Seed file parses ({} products).", products.len()),
        Ok(None) => println!("  No seed file; an empty store will start empty."),
        Err(e) => eprintln!("  Warning: {}", e),
    }

    println!("> Preflight OK.");
    Ok(())
}
