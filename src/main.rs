//! peerpay - Peer-to-peer payment backend API
//!
//! Moves money between registered accounts. Every transfer is validated,
//! cleared through an external authorization service, persisted, and
//! announced to both parties through a notification service.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod api;
pub mod authorizer;
mod config;
mod db;
pub mod domain;
mod error;
pub mod handlers;
pub mod notifier;
pub mod repository;

pub use config::Config;
pub use error::{AppError, AppResult};

use api::AppState;
use authorizer::HttpAuthorizer;
use handlers::{TransferHandler, UserHandler};
use notifier::{HttpNotifier, NotificationDispatcher};
use repository::{PgTransferRepository, PgUserRepository};

/// Initialize tracing/logging
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "peerpay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the application router
fn build_router(pool: PgPool, config: &Config) -> anyhow::Result<Router> {
    let users = Arc::new(PgUserRepository::new(pool.clone()));
    let transfers = Arc::new(PgTransferRepository::new(pool));

    let authorizer = HttpAuthorizer::new(config.authorizer_url.clone(), config.http_timeout)?;
    let notifier = HttpNotifier::new(config.notifier_url.clone(), config.http_timeout)?;

    let state = AppState {
        user_handler: Arc::new(UserHandler::new(users.clone())),
        transfer_handler: Arc::new(TransferHandler::new(
            users,
            transfers,
            Arc::new(authorizer),
            NotificationDispatcher::new(Arc::new(notifier)),
        )),
    };

    let router = Router::new()
        // Health check
        .route("/health", axum::routing::get(health_check))
        .merge(api::create_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    Ok(router)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing();

    // Load configuration
    let config = Config::from_env()?;
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("Starting peerpay server");
    tracing::info!("Connecting to database...");

    // Create database pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;

    // Verify database schema
    if !db::check_schema(&pool).await? {
        tracing::error!("Database schema is not complete. Please run migrations.");
        return Err(anyhow::anyhow!("Database schema incomplete"));
    }

    tracing::info!("Database connected successfully");
    tracing::info!(url = %config.authorizer_url, "Authorization gate configured");
    tracing::info!(url = %config.notifier_url, "Notification service configured");
    tracing::info!("Listening on http://{}", addr);

    // Build router and start server
    let app = build_router(pool.clone(), &config)?;

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Cleanup
    tracing::info!("Server shutting down...");
    pool.close().await;
    tracing::info!("Database connections closed. Goodbye!");

    Ok(())
}

/// Shutdown signal handler for graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}
