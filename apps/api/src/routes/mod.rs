pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::deck::handlers;
use crate::errors::AppError;
use crate::state::AppState;

async fn not_implemented() -> Result<(), AppError> {
    Err(AppError::NotImplemented)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/generate", post(handlers::handle_generate))
        .route(
            "/api/v1/download/:presentation_id",
            get(handlers::handle_download),
        )
        // Deck metadata retrieval and listing arrive with persistent storage
        .route("/api/v1/presentation/:presentation_id", get(not_implemented))
        .route("/api/v1/presentations", get(not_implemented))
        .with_state(state)
}
