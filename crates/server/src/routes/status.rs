//! Root status endpoint

use axum::{Json, extract::State, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;

/// Connectivity summary for the status route
#[derive(Serialize)]
pub struct StatusResponse {
    message: &'static str,
    status: &'static str,
    database: DatabaseStatus,
    environment: String,
    timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct DatabaseStatus {
    status: &'static str,
    connected: bool,
}

/// GET / - Status and connectivity summary
pub async fn root(State(state): State<AppState>) -> impl IntoResponse {
    let database = match &state.db {
        Some(pool) => match pool.get().await {
            Ok(_) => DatabaseStatus {
                status: "conectado",
                connected: true,
            },
            Err(_) => DatabaseStatus {
                status: "desconectado",
                connected: false,
            },
        },
        None => DatabaseStatus {
            status: "no configurada",
            connected: false,
        },
    };

    Json(StatusResponse {
        message: "API de la Dra. Clara funcionando correctamente",
        status: if state.ai.is_some() {
            "OpenAI configurado"
        } else {
            "OpenAI no configurado"
        },
        database,
        environment: state.environment.clone(),
        timestamp: Utc::now(),
    })
}
