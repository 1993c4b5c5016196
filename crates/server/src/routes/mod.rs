mod chat;
pub mod health;
pub mod status;

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;

/// Build the `/chat` routes
pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(chat::generate))
        .route("/history", get(chat::history))
        .route("/register", post(chat::register))
        .route("/find/{patient_id}", get(chat::find_patient))
        .route("/patient/{session_id}", get(chat::patient_by_session))
}
