use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::resumes::service::{delete_resume, upload_resume, UploadedFile};
use crate::routes::{validate_owner_id, OwnerQuery};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ResumeResponse {
    pub id: Uuid,
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    /// Whether the resume takes part in semantic search.
    pub indexed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ResumeRow> for ResumeResponse {
    fn from(row: ResumeRow) -> Self {
        Self {
            id: row.id,
            file_name: row.file_name,
            file_path: row.file_path,
            file_size: row.file_size,
            indexed: row.embedding_id.is_some(),
            created_at: row.created_at,
        }
    }
}

#[derive(Deserialize)]
pub struct UploadQuery {
    pub clerk_user_id: Option<String>,
}

/// POST /api/v1/resumes/upload
/// Multipart fields: `file` (or `resume`) and `clerk_user_id`. The owner may
/// also come from the query string; the form field wins.
pub async fn handle_upload(
    State(state): State<AppState>,
    Query(params): Query<UploadQuery>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ResumeResponse>), AppError> {
    let mut owner_id: Option<String> = params.clerk_user_id;
    let mut upload: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" | "resume" => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::Validation("File name is required".to_string()))?;
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| AppError::Validation("Invalid file".to_string()))?;
                upload = Some(UploadedFile { file_name, bytes });
            }
            "clerk_user_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| AppError::Validation("Invalid clerk_user_id".to_string()))?;
                owner_id = Some(text);
            }
            _ => {}
        }
    }

    let owner_id = owner_id
        .ok_or_else(|| AppError::Validation("clerk_user_id is required".to_string()))?;
    let owner_id = validate_owner_id(&owner_id)?;
    let upload = upload.ok_or_else(|| AppError::Validation("file is required".to_string()))?;

    let resume = upload_resume(
        state.repo.as_ref(),
        state.files.as_ref(),
        &state.vector_store,
        owner_id,
        upload,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(resume.into())))
}

/// GET /api/v1/resumes?clerk_user_id=
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Query(params): Query<OwnerQuery>,
) -> Result<Json<Vec<ResumeResponse>>, AppError> {
    let resumes = state.repo.list_resumes(params.owner_id()?).await?;
    Ok(Json(resumes.into_iter().map(ResumeResponse::from).collect()))
}

/// DELETE /api/v1/resumes/:id?clerk_user_id=
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Query(params): Query<OwnerQuery>,
) -> Result<StatusCode, AppError> {
    delete_resume(
        state.repo.as_ref(),
        &state.vector_store,
        params.owner_id()?,
        resume_id,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
