use bytes::Bytes;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{NewResume, ResumeRow};
use crate::repository::Repository;
use crate::resumes::extract::{extract_text, DocumentKind};
use crate::resumes::storage::FileStore;
use crate::search::vector_store::{ResumeMetadata, StoreOutcome, VectorStore};

/// A file received from a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Stores the file, extracts its text, indexes it and records the resume.
///
/// Extraction and indexing problems never fail the upload; the resume is
/// recorded with empty text or without an `embedding_id`.
pub async fn upload_resume(
    repo: &dyn Repository,
    files: &dyn FileStore,
    vector_store: &VectorStore,
    owner_id: &str,
    upload: UploadedFile,
) -> Result<ResumeRow, AppError> {
    let kind = DocumentKind::from_file_name(&upload.file_name).ok_or_else(|| {
        AppError::Validation("Only PDF and Word documents are allowed".to_string())
    })?;

    // 1. Persist the raw bytes
    let stored = files
        .put(owner_id, &upload.file_name, upload.bytes.clone())
        .await?;

    // 2. Extract text off the async runtime
    let bytes = upload.bytes;
    let content_text = match tokio::task::spawn_blocking(move || extract_text(kind, &bytes)).await
    {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            error!("Error extracting text from {}: {e}", upload.file_name);
            String::new()
        }
        Err(e) => {
            error!("Text extraction task for {} failed: {e}", upload.file_name);
            String::new()
        }
    };

    // 3. Index for semantic search
    let embedding_id = if content_text.trim().is_empty() {
        warn!("No text extracted from {}; skipping vector indexing", upload.file_name);
        None
    } else {
        let metadata = ResumeMetadata {
            owner_id: owner_id.to_string(),
            file_name: upload.file_name.clone(),
            file_path: stored.location.clone(),
        };
        let outcome = vector_store.store(&content_text, metadata).await;
        if let StoreOutcome::Degraded { reason, .. } = &outcome {
            warn!(
                "Resume {} not indexed (placeholder id {}): {reason}",
                upload.file_name,
                outcome.id()
            );
        }
        outcome.stored_id()
    };

    // 4. Record, dropping the vector if the row cannot be written
    let resume = match repo
        .insert_resume(NewResume {
            owner_id: owner_id.to_string(),
            file_name: upload.file_name,
            file_path: stored.location,
            file_size: stored.size,
            content_text,
            embedding_id,
        })
        .await
    {
        Ok(resume) => resume,
        Err(e) => {
            if let Some(id) = embedding_id {
                vector_store.delete(id).await;
            }
            return Err(e);
        }
    };

    info!(
        "Uploaded resume {} for owner {} (indexed: {})",
        resume.id,
        owner_id,
        resume.embedding_id.is_some()
    );
    Ok(resume)
}

/// Deletes the owner's resume, its job matches and its vector.
///
/// The stored file is kept.
pub async fn delete_resume(
    repo: &dyn Repository,
    vector_store: &VectorStore,
    owner_id: &str,
    resume_id: Uuid,
) -> Result<(), AppError> {
    let resume = repo
        .delete_resume(resume_id, owner_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Resume not found".to_string()))?;

    if let Some(embedding_id) = resume.embedding_id {
        vector_store.delete(embedding_id).await;
    }

    info!("Deleted resume {resume_id} for owner {owner_id}");
    Ok(())
}
