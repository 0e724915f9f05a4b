use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job_match::{JobMatchRow, NewJobMatch};
use crate::models::resume::{NewResume, ResumeRow};
use crate::repository::{foreign_resume_error, Repository};

/// Process-local repository for demo mode and tests. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryRepository {
    resumes: RwLock<Vec<ResumeRow>>,
    job_matches: RwLock<Vec<JobMatchRow>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn insert_resume(&self, resume: NewResume) -> Result<ResumeRow, AppError> {
        let row = ResumeRow {
            id: Uuid::new_v4(),
            owner_id: resume.owner_id,
            file_name: resume.file_name,
            file_path: resume.file_path,
            file_size: resume.file_size,
            content_text: resume.content_text,
            embedding_id: resume.embedding_id,
            created_at: Utc::now(),
        };
        self.resumes.write().await.push(row.clone());
        Ok(row)
    }

    async fn list_resumes(&self, owner_id: &str) -> Result<Vec<ResumeRow>, AppError> {
        // insertion order is creation order, so reverse for newest first
        Ok(self
            .resumes
            .read()
            .await
            .iter()
            .rev()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn delete_resume(
        &self,
        id: Uuid,
        owner_id: &str,
    ) -> Result<Option<ResumeRow>, AppError> {
        let mut resumes = self.resumes.write().await;
        let Some(pos) = resumes
            .iter()
            .position(|r| r.id == id && r.owner_id == owner_id)
        else {
            return Ok(None);
        };
        let removed = resumes.remove(pos);
        self.job_matches
            .write()
            .await
            .retain(|m| m.resume_id != removed.id);
        Ok(Some(removed))
    }

    async fn insert_job_match(&self, job_match: NewJobMatch) -> Result<JobMatchRow, AppError> {
        let owned = self
            .resumes
            .read()
            .await
            .iter()
            .any(|r| r.id == job_match.resume_id && r.owner_id == job_match.owner_id);
        if !owned {
            return Err(foreign_resume_error(job_match.resume_id));
        }

        let row = JobMatchRow {
            id: Uuid::new_v4(),
            owner_id: job_match.owner_id,
            resume_id: job_match.resume_id,
            job_description: job_match.job_description,
            job_title: job_match.job_title,
            match_score: job_match.match_score,
            gap_analysis: Json(job_match.gap_analysis),
            contacts: Json(job_match.contacts),
            email_draft: job_match.email_draft,
            feedback_score: None,
            created_at: Utc::now(),
        };
        self.job_matches.write().await.push(row.clone());
        Ok(row)
    }

    async fn list_job_matches(&self, owner_id: &str) -> Result<Vec<JobMatchRow>, AppError> {
        Ok(self
            .job_matches
            .read()
            .await
            .iter()
            .rev()
            .filter(|m| m.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn get_job_match(
        &self,
        id: Uuid,
        owner_id: &str,
    ) -> Result<Option<JobMatchRow>, AppError> {
        Ok(self
            .job_matches
            .read()
            .await
            .iter()
            .find(|m| m.id == id && m.owner_id == owner_id)
            .cloned())
    }

    async fn set_feedback(&self, id: Uuid, owner_id: &str, score: i16) -> Result<bool, AppError> {
        let mut matches = self.job_matches.write().await;
        match matches
            .iter_mut()
            .find(|m| m.id == id && m.owner_id == owner_id)
        {
            Some(m) => {
                m.feedback_score = Some(score);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
