use std::{sync::Arc, time::Duration};

use anyhow::Context;
use product_api::{
    build_app,
    infrastructure::{database::DatabaseManager, logger::Logger},
    AppConfig, PgProductRepository,
};
use tokio::{net::TcpListener, signal};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load_from_env().context("failed to load application config")?;
    let _log_guard = Logger::init(&config.logging).context("failed to initialize logging")?;

    info!("Starting product API...");
    let profiles = config.active_profiles();
    if !profiles.is_empty() {
        info!("Active profiles: {}", profiles.join(","));
    }

    let database = DatabaseManager::connect(&config.datasource)
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {}", e);
            e
        })?;
    let version = database.server_version().await?;
    info!("Connection to database succeeded, version: {}", version);

    if config.datasource.create_schema {
        database.ensure_schema().await?;
    }

    let repository = PgProductRepository::new(database.get_pool().clone());
    let app = build_app(Arc::new(repository), &config)?;

    let listener = TcpListener::bind((config.server.host.as_str(), config.server.port))
        .await
        .with_context(|| {
            format!(
                "failed to bind {}:{}",
                config.server.host, config.server.port
            )
        })?;
    info!("🚀 Product API running on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down server");
    let deadline = Duration::from_secs(config.server.shutdown_timeout_seconds);
    if tokio::time::timeout(deadline, database.close()).await.is_err() {
        warn!("Database pool did not close within {:?}", deadline);
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
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
