//! DeepfakeSense Backend Server
//!
//! Single-binary backend for the DeepfakeSense platform.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    DEEPFAKESENSE SERVER                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────┐  ┌─────────────────────────┐ │
//! │  │  API      │  │  Session  │  │  Detection Pipeline     │ │
//! │  │  Gateway  │  │  Auth     │  │  (Mock Verdict          │ │
//! │  │  (Axum)   │  │  (Tokens) │  │   Provider)             │ │
//! │  └─────┬─────┘  └─────┬─────┘  └────────────┬────────────┘ │
//! │        └──────────────┼──────────────────────┘              │
//! │                       ▼                                     │
//! │              ┌─────────────────┐                           │
//! │              │ In-Memory State │                           │
//! │              └─────────────────┘                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every verdict is produced by a mock provider behind the
//! `VerdictProvider` trait; swapping in a real inference service touches
//! only that seam.

mod config;
mod error;
mod handlers;
mod logic;
mod middleware;
mod models;
mod state;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};
pub use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deepfakesense_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("DeepfakeSense server starting (env: {})", config.environment);
    tracing::info!(
        "Analysis delay: {}ms, timeout: {}ms",
        config.analysis_delay_ms,
        config.analysis_timeout_ms
    );

    // Build application state (seeds the demo accounts)
    let state = AppState::new(config.clone());

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/auth/login", post(handlers::auth::login))
        .route("/api/v1/auth/signup", post(handlers::auth::signup))
        .route("/api/v1/plans", get(handlers::plans::list))
        .route("/api/v1/regions", get(handlers::regions::list));

    // Session routes (bearer token auth)
    let session_routes = Router::new()
        .route("/api/v1/auth/logout", post(handlers::auth::logout))

        // Detection pipeline
        .route("/api/v1/detect", post(handlers::detect::submit))
        .route("/api/v1/detect", get(handlers::detect::status))
        .route("/api/v1/detect/cancel", post(handlers::detect::cancel))
        .route("/api/v1/detect/reset", post(handlers::detect::reset))

        // Dashboard
        .route("/api/v1/dashboard/stats", get(handlers::dashboard::stats))
        .route("/api/v1/dashboard/history", get(handlers::dashboard::history))

        // Profile & preferences
        .route("/api/v1/profile", get(handlers::profile::get))
        .route("/api/v1/profile", put(handlers::profile::update))
        .route("/api/v1/preferences", put(handlers::profile::update_preferences))

        // Assistant
        .route("/api/v1/assistant/message", post(handlers::assistant::send_message))
        .route("/api/v1/assistant/messages", get(handlers::assistant::list_messages))
        .route("/api/v1/assistant/messages", delete(handlers::assistant::clear_messages))

        // Admin
        .route("/api/v1/admin/overview", get(handlers::admin::overview))

        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_session,
        ));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
