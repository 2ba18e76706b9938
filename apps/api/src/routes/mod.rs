pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::chat::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session lifecycle
        .route("/api/v1/cv", post(handlers::upload_cv))
        .route("/api/v1/sessions/:id/reset", post(handlers::reset_session))
        .route("/api/v1/system/reset", post(handlers::reset_system))
        // Chat
        .route("/api/v1/chat", post(handlers::chat))
        .with_state(state)
}
