// src/bin/api_server.rs

use anyhow::Context;
use inventory_service::infra::{telemetry, Config, StoreBackend};
use inventory_service::transport;
use inventory_service::{InMemoryProductStore, PostgresProductStore, ProductStore, SeedService};
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn ProductStore>> {
    match config.backend {
        StoreBackend::Postgres => {
            let store = PostgresProductStore::connect(
                config.require_database_url()?,
                &config.collection,
                config.max_connections,
                config.store_timeout,
            )
            .await
            .context("failed to connect to the product store")?;
            info!(collection = store.collection(), "connected to postgres");
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            warn!("using in-memory store; data is lost on shutdown");
            Ok(Arc::new(InMemoryProductStore::new()))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();

    let config = Config::from_env()?;

    info!("Initializing product store...");
    let store = build_store(&config).await?;

    let seeder = SeedService::new(store.clone(), &config.seed_file);
    seeder.seed_on_startup().await;

    let app_state = transport::http::AppState::new(store, seeder);

    info!("Starting API server...");
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    let app = transport::http::create_router(app_state, &config.static_dir)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!("API server listening on http://{}", config.bind_addr);
    info!("Swagger UI available at /swagger-ui");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
