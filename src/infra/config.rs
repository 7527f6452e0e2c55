//! Centralized configuration (environment variables + defaults).

use anyhow::{anyhow, Context};
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(anyhow!("unknown store backend '{other}' (expected postgres or memory)")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub backend: StoreBackend,
    /// Required for the postgres backend.
    pub database_url: Option<String>,
    pub collection: String,
    pub bind_addr: String,
    pub seed_file: PathBuf,
    pub static_dir: PathBuf,
    pub store_timeout: Duration,
    pub max_connections: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let backend: StoreBackend = try_load("STORE_BACKEND", "postgres")?;
        let database_url = env::var("DATABASE_URL").ok().filter(|v| !v.trim().is_empty());
        if backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(anyhow!("DATABASE_URL must be set"));
        }

        let timeout_secs: u64 = try_load("STORE_TIMEOUT_SECS", "5")?;

        Ok(Self {
            backend,
            database_url,
            collection: try_load("PRODUCTS_COLLECTION", "products")?,
            bind_addr: try_load("BIND_ADDR", "0.0.0.0:8080")?,
            seed_file: try_load("SEED_FILE", "./seeds/products.json")?,
            static_dir: try_load("STATIC_DIR", "./static")?,
            store_timeout: Duration::from_secs(timeout_secs.max(1)),
            max_connections: try_load::<u32>("DB_MAX_CONNECTIONS", "5")?.max(1),
        })
    }

    /// The connection string, or an error when it was never configured.
    pub fn require_database_url(&self) -> anyhow::Result<&str> {
        self.database_url
            .as_deref()
            .ok_or_else(|| anyhow!("DATABASE_URL must be set"))
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> anyhow::Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    raw.parse::<T>()
        .map_err(|e| anyhow!("{e}"))
        .with_context(|| format!("invalid value for {key}: '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_names() {
        assert_eq!("postgres".parse::<StoreBackend>().unwrap(), StoreBackend::Postgres);
        assert_eq!(" Memory ".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert!("mongo".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn defaults_apply_for_unset_keys() {
        let port: u16 = try_load("INVENTORY_TEST_SURELY_UNSET_PORT", "8080").unwrap();
        assert_eq!(port, 8080);
        assert!(try_load::<u16>("INVENTORY_TEST_SURELY_UNSET_PORT", "not-a-port").is_err());
    }
}
