pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::matching::handlers as matching;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

/// Upload size cap for resume files.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const MAX_OWNER_ID_LEN: usize = 128;

/// `?clerk_user_id=` on owner-scoped endpoints.
#[derive(Deserialize)]
pub struct OwnerQuery {
    pub clerk_user_id: String,
}

impl OwnerQuery {
    pub fn owner_id(&self) -> Result<&str, AppError> {
        validate_owner_id(&self.clerk_user_id)
    }
}

/// Owner ids end up in storage keys, so only `[A-Za-z0-9_-]` is accepted.
pub fn validate_owner_id(raw: &str) -> Result<&str, AppError> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(AppError::Validation("clerk_user_id is required".to_string()));
    }
    if id.len() > MAX_OWNER_ID_LEN
        || !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(AppError::Validation("clerk_user_id is invalid".to_string()));
    }
    Ok(id)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Resumes
        .route("/api/v1/resumes/upload", post(resumes::handle_upload))
        .route("/api/v1/resumes", get(resumes::handle_list_resumes))
        .route("/api/v1/resumes/", get(resumes::handle_list_resumes))
        .route(
            "/api/v1/resumes/:resume_id",
            delete(resumes::handle_delete_resume),
        )
        // Matching
        .route("/api/v1/match", post(matching::handle_match))
        .route("/api/v1/match/", post(matching::handle_match))
        .route("/api/v1/match/history", get(matching::handle_match_history))
        .route(
            "/api/v1/match/:match_id/feedback",
            post(matching::handle_feedback),
        )
        .route(
            "/api/v1/contacts/:match_id",
            get(matching::handle_get_contacts),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
