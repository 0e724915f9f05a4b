//! Persistence for resumes and job matches.
//!
//! `AppState` holds an `Arc<dyn Repository>`: Postgres when `DATABASE_URL` is
//! set, otherwise the in-memory store.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job_match::{JobMatchRow, NewJobMatch};
use crate::models::resume::{NewResume, ResumeRow};

pub mod memory;
pub mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

#[async_trait]
pub trait Repository: Send + Sync {
    async fn insert_resume(&self, resume: NewResume) -> Result<ResumeRow, AppError>;

    /// The owner's resumes, newest first.
    async fn list_resumes(&self, owner_id: &str) -> Result<Vec<ResumeRow>, AppError>;

    /// Removes the resume and the job matches built on it. `None` when the
    /// owner has no resume with this id.
    async fn delete_resume(&self, id: Uuid, owner_id: &str)
        -> Result<Option<ResumeRow>, AppError>;

    /// Fails with `Validation` unless `resume_id` names a resume of the same owner.
    async fn insert_job_match(&self, job_match: NewJobMatch) -> Result<JobMatchRow, AppError>;

    /// The owner's job matches, newest first.
    async fn list_job_matches(&self, owner_id: &str) -> Result<Vec<JobMatchRow>, AppError>;

    async fn get_job_match(
        &self,
        id: Uuid,
        owner_id: &str,
    ) -> Result<Option<JobMatchRow>, AppError>;

    /// Returns false when no match with this id belongs to the owner.
    async fn set_feedback(&self, id: Uuid, owner_id: &str, score: i16) -> Result<bool, AppError>;

    fn name(&self) -> &'static str;
}

pub(crate) fn foreign_resume_error(resume_id: Uuid) -> AppError {
    AppError::Validation(format!("Resume {resume_id} does not belong to this user"))
}
