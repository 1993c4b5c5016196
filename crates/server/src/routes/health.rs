//! Health check endpoint

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    server: &'static str,
    database: &'static str,
    openai: &'static str,
    timestamp: DateTime<Utc>,
}

/// GET /health - Report per-service health, 200 when everything is OK else 503
pub async fn check(State(state): State<AppState>) -> impl IntoResponse {
    let database = match &state.db {
        Some(pool) => match pool.get().await {
            Ok(client) => match client.query_one("SELECT 1", &[]).await {
                Ok(_) => "OK",
                Err(e) => {
                    tracing::error!(error = %e, "Health check query failed");
                    "ERROR"
                }
            },
            Err(e) => {
                tracing::error!(error = %e, "Health check pool error");
                "ERROR"
            }
        },
        None => "ERROR",
    };

    let openai = if state.ai.is_some() { "OK" } else { "ERROR" };

    let status = if database == "OK" && openai == "OK" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            server: "OK",
            database,
            openai,
            timestamp: Utc::now(),
        }),
    )
}
