use service_core::observability::{init_metrics, init_tracing};
use station_service::config::{StationConfig, StorageBackend};
use station_service::services::{
    AccountRepository, JwtService, MemoryStore, MongoDb, StationRepository,
};
use station_service::{build_router, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

type Repositories = (Arc<dyn StationRepository>, Arc<dyn AccountRepository>);

async fn connect_storage(config: &StationConfig) -> std::io::Result<Repositories> {
    match config.storage.backend {
        StorageBackend::Memory => {
            let store = match &config.storage.seed_path {
                Some(path) => MemoryStore::from_seed_file(path).map_err(|e| {
                    tracing::error!("Failed to load storage seed from {}: {}", path, e);
                    std::io::Error::other(format!("Storage seed error: {}", e))
                })?,
                None => MemoryStore::new(),
            };
            tracing::info!("Using in-memory storage");

            let store = Arc::new(store);
            let stations: Arc<dyn StationRepository> = store.clone();
            let accounts: Arc<dyn AccountRepository> = store;
            Ok((stations, accounts))
        }
        StorageBackend::Mongodb => {
            let mongo = config.storage.mongodb.as_ref().ok_or_else(|| {
                std::io::Error::other("MONGODB_URI is required for the mongodb backend")
            })?;

            let db = MongoDb::connect(&mongo.uri, &mongo.database)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to connect to MongoDB: {}", e);
                    std::io::Error::other(format!("Database connection error: {}", e))
                })?;

            db.initialize_indexes().await.map_err(|e| {
                tracing::error!("Failed to initialize database indexes: {}", e);
                std::io::Error::other(format!("Database initialization error: {}", e))
            })?;

            let db = Arc::new(db);
            let stations: Arc<dyn StationRepository> = db.clone();
            let accounts: Arc<dyn AccountRepository> = db;
            Ok((stations, accounts))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = StationConfig::from_env().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing(
        &config.service_name,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    );

    init_metrics().map_err(|e| {
        tracing::error!("Failed to initialize metrics: {}", e);
        std::io::Error::other(format!("Metrics error: {}", e))
    })?;

    let jwt = JwtService::new(&config.jwt).map_err(|e| {
        tracing::error!("Failed to initialize JWT service: {}", e);
        std::io::Error::other(format!("JWT error: {}", e))
    })?;

    let (stations, accounts) = connect_storage(&config).await?;

    let addr = config.common.bind_address();
    let state = AppState {
        config,
        jwt,
        stations,
        accounts,
    };

    let app = build_router(state);

    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        tracing::error!("Failed to bind to {}: {}", addr, e);
        e
    })?;
    tracing::info!("station-service listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("station-service stopped");
    Ok(())
}
