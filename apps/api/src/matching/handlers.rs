use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::pipeline::{get_contacts, run_match, submit_feedback, MatchRequest, MatchResponse};
use crate::models::job_match::{Contact, JobMatchRow};
use crate::routes::OwnerQuery;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct FeedbackRequest {
    #[serde(alias = "feedback")]
    pub score: i16,
}

/// POST /api/v1/match?clerk_user_id=
pub async fn handle_match(
    State(state): State<AppState>,
    Query(params): Query<OwnerQuery>,
    Json(req): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    let response = run_match(
        state.repo.as_ref(),
        &state.vector_store,
        &state.advisor,
        params.owner_id()?,
        req,
    )
    .await?;
    Ok(Json(response))
}

/// GET /api/v1/match/history?clerk_user_id=
pub async fn handle_match_history(
    State(state): State<AppState>,
    Query(params): Query<OwnerQuery>,
) -> Result<Json<Vec<JobMatchRow>>, AppError> {
    let matches = state.repo.list_job_matches(params.owner_id()?).await?;
    Ok(Json(matches))
}

/// GET /api/v1/contacts/:match_id?clerk_user_id=
pub async fn handle_get_contacts(
    State(state): State<AppState>,
    Path(match_id): Path<Uuid>,
    Query(params): Query<OwnerQuery>,
) -> Result<Json<Vec<Contact>>, AppError> {
    let contacts = get_contacts(state.repo.as_ref(), match_id, params.owner_id()?).await?;
    Ok(Json(contacts))
}

/// POST /api/v1/match/:match_id/feedback?clerk_user_id=
pub async fn handle_feedback(
    State(state): State<AppState>,
    Path(match_id): Path<Uuid>,
    Query(params): Query<OwnerQuery>,
    Json(req): Json<FeedbackRequest>,
) -> Result<Json<Value>, AppError> {
    submit_feedback(state.repo.as_ref(), match_id, params.owner_id()?, req.score).await?;
    Ok(Json(json!({ "message": "Feedback submitted successfully" })))
}
