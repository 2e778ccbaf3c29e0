//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use reveal_cache::{MemoryKv, RedisKv, RedisPool, RedisPoolConfig};
use reveal_common::{AppConfig, AppError, TokenService};
use reveal_core::{AtomicKv, RandomIdGenerator};
use reveal_service::{LogFeedbackSink, ServiceContext};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::apply_middleware;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let router = create_router().merge(health_routes());
    let router = apply_middleware(
        router,
        &state.config().cors,
        state.config().app.env.is_production(),
    );
    router.with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    // Choose the store backend. Production requires Redis (enforced at
    // config load); development without REDIS_URL runs on the in-memory
    // store, which does not share state across instances.
    let kv: Arc<dyn AtomicKv> = match RedisPoolConfig::from_config(&config.redis) {
        Some(pool_config) => {
            info!("Connecting to Redis...");
            let pool = RedisPool::new(pool_config)?;
            info!("Redis pool ready");
            Arc::new(RedisKv::new(pool))
        }
        None => {
            warn!("No REDIS_URL configured, using the in-memory store");
            Arc::new(MemoryKv::new())
        }
    };

    let tokens = Arc::new(TokenService::new(&config.jwt.secret));

    let context = ServiceContext::new(
        kv,
        tokens,
        Arc::new(RandomIdGenerator),
        Arc::new(LogFeedbackSink),
    );

    Ok(AppState::new(context, config))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {}", e)))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.api.port));

    // Create app state
    let state = create_app_state(config).await?;

    // Build application
    let app = create_app(state);

    // Run server
    run_server(app, addr).await
}
