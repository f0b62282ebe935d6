// src/main.rs
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum_server::Handle;
use dotenvy::dotenv;
use http::HeaderValue;
use tokio::signal;
use tracing::info;

use poll_api::config::{Config, StoreKind};
use poll_api::error::ConfigError;
use poll_api::state::AppState;
use poll_api::store::{MemoryStore, PgStore, PollStore};
use poll_api::{db, routes, telemetry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok(); // Load environment variables from .env file
    telemetry::init_logging();

    let config = Config::from_env()?;

    let store: Arc<dyn PollStore> = match config.store {
        StoreKind::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or(ConfigError::Missing { key: "DATABASE_URL" })?;
            let pool = db::create_pool(database_url, config.max_connections).await?;

            if config.run_migrations {
                db::run_migrations(&pool).await?;
            }

            Arc::new(PgStore::new(pool, config.track_vote_count))
        }
        StoreKind::Memory => {
            info!("Using in-memory store with demo data");
            Arc::new(MemoryStore::with_demo_data(config.track_vote_count).await?)
        }
    };

    let allowed_origin = config
        .cors_allowed_origin
        .as_deref()
        .map(HeaderValue::from_str)
        .transpose()?;

    let state = AppState::new(store).with_strict_http_status(config.strict_http_status);
    let app = routes::create_routes(state).layer(routes::cors_layer(allowed_origin.as_ref()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let handle = Handle::new();
    tokio::spawn(shutdown_signal(handle.clone()));

    info!("Server running on {addr}");
    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal(handle: Handle) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
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

    info!("Shutdown signal received, draining connections");
    handle.graceful_shutdown(Some(Duration::from_secs(10)));
}
