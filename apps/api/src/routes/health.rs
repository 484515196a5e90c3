use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Reports service version and which collaborators are configured.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let configured = |on: bool| if on { "configured" } else { "not configured" };

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "edudeck-api",
        "environment": state.config.environment,
        "services": {
            "llm": "configured",
            "photo_search": configured(state.selector.photo_search_configured()),
            "diagram_generator": configured(state.selector.diagram_generator_configured()),
        }
    }))
}
