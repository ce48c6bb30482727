use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use describer_api::config::{RecordStoreKind, ServerConfig};
use describer_api::router::build_app_router;
use describer_api::sessions::SessionRegistry;
use describer_api::state::AppState;
use describer_core::collection::DEFAULT_TARGET_FIELD;
use describer_db::{MemoryRecordStore, PgRecordStore, RecordStore};
use describer_storage::StorageConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "describer_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env().context("Invalid server configuration")?;
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let storage_config = StorageConfig::from_env().context("Invalid storage configuration")?;
    tracing::info!(backend = storage_config.backend_type().name(), "Loaded storage configuration");

    // --- Record store ---
    let store = build_record_store(&config).await?;

    // --- Profile storage ---
    let storage = storage_config.build().await;

    // --- App state ---
    let state = AppState {
        store,
        storage,
        sessions: Arc::new(SessionRegistry::new()),
        config: Arc::new(config.clone()),
    };
    let sessions = Arc::clone(&state.sessions);

    let app = build_app_router(state, &config);

    // --- Start server ---
    let host = config
        .host
        .parse()
        .with_context(|| format!("Invalid HOST address '{}'", config.host))?;
    let addr = SocketAddr::new(host, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    let open = sessions.count().await;
    if open > 0 {
        tracing::warn!(open, "Unsubmitted labeling sessions dropped at shutdown");
    }
    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Connect the configured record store. PostgreSQL is health-checked and
/// migrated before use.
async fn build_record_store(config: &ServerConfig) -> anyhow::Result<Arc<dyn RecordStore>> {
    match config.record_store {
        RecordStoreKind::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set")?;

            let pool = describer_db::create_pool(database_url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Database connection pool created");

            describer_db::health_check(&pool)
                .await
                .context("Database health check failed")?;
            tracing::info!("Database health check passed");

            describer_db::run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");

            Ok(Arc::new(PgRecordStore::new(pool)))
        }
        RecordStoreKind::Memory => {
            tracing::warn!("Using in-memory record store; submissions are lost on restart");
            Ok(Arc::new(MemoryRecordStore::seeded(
                DEFAULT_TARGET_FIELD,
                std::iter::empty::<&str>(),
            )))
        }
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
