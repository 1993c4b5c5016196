//! clara-server library crate
//!
//! Exposes `build_app` and `config` for integration tests.
//! The actual binary entrypoint is in `main.rs`.

pub mod ai;
pub mod config;
pub mod db;
mod error;
mod middleware;
mod routes;

use axum::{Router, middleware as axum_mw, routing::get};
use deadpool_postgres::Pool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use ai::OpenAiClient;
use config::Config;
use error::AppError;

/// Shared application state: the store handle and the completion gateway.
///
/// Either may be absent — a missing database URL degrades the process to a
/// no-database mode, and a missing OpenAI credential disables chat
/// generation. Store-backed endpoints then fail per request instead of
/// refusing to start.
#[derive(Clone)]
pub struct AppState {
    pub db: Option<Pool>,
    pub ai: Option<OpenAiClient>,
    pub environment: String,
}

impl AppState {
    /// The store handle, or a configuration failure in no-database mode
    fn pool(&self) -> Result<&Pool, AppError> {
        self.db
            .as_ref()
            .ok_or_else(|| AppError::Internal("Base de datos no configurada".to_string()))
    }
}

/// Build the full application router with all routes and middleware.
///
/// Extracted from `main()` so integration tests can construct the app
/// without binding to a TCP port.
pub fn build_app(db: Option<Pool>, config: &Config) -> Router {
    // Create OpenAI gateway (None if OPENAI_API_KEY not set)
    let ai: Option<OpenAiClient> = config
        .openai_api_key
        .as_ref()
        .map(|key| OpenAiClient::new(key.clone()));

    let state = AppState {
        db,
        ai,
        environment: config.environment.clone(),
    };

    // Build CORS layer
    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Build application
    Router::new()
        .route("/", get(routes::status::root))
        .route("/health", get(routes::health::check))
        .nest("/chat", routes::chat_routes())
        .with_state(state)
        .layer(axum_mw::from_fn(middleware::audit_middleware))
        .layer(axum_mw::from_fn(middleware::request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
