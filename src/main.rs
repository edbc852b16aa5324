//! LRU TTL Cache - A bounded key-value cache server
//!
//! Provides LRU eviction and lazy TTL expiration behind an HTTP API.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lru_ttl_cache::api::create_router;
use lru_ttl_cache::{AppState, BackendKind, CacheEngine, Config};

/// Main entry point for the cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the configured storage backend and the engine around it
/// 4. Create Axum router with all endpoints
/// 5. Start HTTP server on configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lru_ttl_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting LRU TTL cache server");

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        "Configuration loaded: capacity={}, backend={}, default_ttl={:?}, port={}",
        config.capacity, config.backend, config.default_ttl, config.server_port
    );

    let engine = build_engine(&config)
        .await
        .context("Failed to initialize cache engine")?;
    info!("Cache engine initialized with {} backend", engine.backend_name());

    let app = create_router(AppState::new(engine));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Builds the engine over the configured storage strategy.
async fn build_engine(config: &Config) -> lru_ttl_cache::Result<CacheEngine> {
    let engine = match config.backend {
        BackendKind::Local => CacheEngine::local(config.capacity)?,
        BackendKind::Redis => connect_redis(config).await?,
    };
    Ok(engine.with_default_ttl(config.default_ttl()))
}

#[cfg(feature = "redis")]
async fn connect_redis(config: &Config) -> lru_ttl_cache::Result<CacheEngine> {
    use lru_ttl_cache::cache::{RedisOptions, RedisStore};

    let store = RedisStore::connect(RedisOptions {
        url: config.redis_url.clone(),
        prefix: config.redis_prefix.clone(),
        capacity: config.capacity,
        refresh_ttl: config.default_ttl(),
    })
    .await?;
    CacheEngine::new(Box::new(store))
}

#[cfg(not(feature = "redis"))]
async fn connect_redis(_config: &Config) -> lru_ttl_cache::Result<CacheEngine> {
    Err(lru_ttl_cache::CacheError::Configuration(
        "CACHE_BACKEND=redis requires the `redis` feature".to_string(),
    ))
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
