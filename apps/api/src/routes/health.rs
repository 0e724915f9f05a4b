use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

const SERVICE: &str = "JobAssist AI API";

/// GET /
/// Service banner with the backend chosen for each component.
pub async fn root_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": SERVICE,
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "components": {
            "database": state.repo.name(),
            "file_storage": state.files.name(),
            "vector_search": state.vector_store.is_ready(),
            "ai_generation": state.advisor.has_model()
        }
    }))
}

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "vector_search": state.vector_store.is_ready(),
        "ai_generation": state.advisor.has_model()
    }))
}
