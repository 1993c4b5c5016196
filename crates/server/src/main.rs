//! clara-server: virtual medical-assistant HTTP server binary entrypoint.

use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clara_server::config::Config;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    // Load configuration
    let config = Config::from_env();

    // Create database pool; the server keeps running without one
    let pool = match &config.database_url {
        Some(url) => match clara_server::db::create_pool(url).await {
            Ok(pool) => {
                match clara_server::db::init_schema(&pool).await {
                    Ok(()) => tracing::info!("Database schema ready"),
                    Err(e) => tracing::error!(
                        error = ?e,
                        "Schema bootstrap failed; store operations will retry per request"
                    ),
                }
                Some(pool)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to create database pool");
                tracing::warn!("Continuing without database");
                None
            }
        },
        None => {
            tracing::warn!("DATABASE_URL not set, continuing without database");
            None
        }
    };

    // Log startup info
    if config.openai_api_key.is_some() {
        tracing::info!("OpenAI API key configured, chat generation enabled");
    } else {
        tracing::warn!("OPENAI_API_KEY not set, chat generation disabled");
    }
    tracing::info!(environment = %config.environment, "Environment");

    // Build application
    let app = clara_server::build_app(pool, &config);

    // Start server
    let addr: SocketAddr = config.bind_address.parse().expect("Invalid bind address");
    tracing::info!("Starting Clara server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    tracing::info!("Server shutdown complete");
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    use tokio::signal;

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
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
