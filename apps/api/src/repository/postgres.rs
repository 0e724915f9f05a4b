use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job_match::{JobMatchRow, NewJobMatch};
use crate::models::resume::{NewResume, ResumeRow};
use crate::repository::{foreign_resume_error, Repository};

const SCHEMA: [&str; 5] = [
    r#"
    CREATE TABLE IF NOT EXISTS resumes (
        id           UUID PRIMARY KEY,
        owner_id     TEXT NOT NULL,
        file_name    TEXT NOT NULL,
        file_path    TEXT NOT NULL,
        file_size    BIGINT NOT NULL,
        content_text TEXT NOT NULL DEFAULT '',
        embedding_id UUID,
        created_at   TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_resumes_owner_created ON resumes (owner_id, created_at DESC)",
    r#"
    CREATE TABLE IF NOT EXISTS job_matches (
        id              UUID PRIMARY KEY,
        owner_id        TEXT NOT NULL,
        resume_id       UUID NOT NULL REFERENCES resumes (id) ON DELETE CASCADE,
        job_description TEXT NOT NULL,
        job_title       TEXT,
        match_score     DOUBLE PRECISION NOT NULL,
        gap_analysis    JSONB NOT NULL DEFAULT '[]',
        contacts        JSONB NOT NULL DEFAULT '[]',
        email_draft     TEXT NOT NULL,
        feedback_score  SMALLINT CHECK (feedback_score IN (-1, 1)),
        created_at      TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_job_matches_owner_created ON job_matches (owner_id, created_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_job_matches_score ON job_matches (match_score)",
];

#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the tables and indexes if they do not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Database schema ready");
        Ok(())
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn insert_resume(&self, resume: NewResume) -> Result<ResumeRow, AppError> {
        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            INSERT INTO resumes
                (id, owner_id, file_name, file_path, file_size, content_text, embedding_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&resume.owner_id)
        .bind(&resume.file_name)
        .bind(&resume.file_path)
        .bind(resume.file_size)
        .bind(&resume.content_text)
        .bind(resume.embedding_id)
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted resume {} for owner {}", row.id, row.owner_id);
        Ok(row)
    }

    async fn list_resumes(&self, owner_id: &str) -> Result<Vec<ResumeRow>, AppError> {
        Ok(sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn delete_resume(
        &self,
        id: Uuid,
        owner_id: &str,
    ) -> Result<Option<ResumeRow>, AppError> {
        // job_matches rows go with it through ON DELETE CASCADE
        Ok(sqlx::query_as::<_, ResumeRow>(
            "DELETE FROM resumes WHERE id = $1 AND owner_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn insert_job_match(&self, job_match: NewJobMatch) -> Result<JobMatchRow, AppError> {
        // The EXISTS guard keeps a match from pointing at another owner's resume.
        let row = sqlx::query_as::<_, JobMatchRow>(
            r#"
            INSERT INTO job_matches
                (id, owner_id, resume_id, job_description, job_title,
                 match_score, gap_analysis, contacts, email_draft)
            SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9
            WHERE EXISTS (SELECT 1 FROM resumes WHERE id = $3 AND owner_id = $2)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&job_match.owner_id)
        .bind(job_match.resume_id)
        .bind(&job_match.job_description)
        .bind(&job_match.job_title)
        .bind(job_match.match_score)
        .bind(Json(&job_match.gap_analysis))
        .bind(Json(&job_match.contacts))
        .bind(&job_match.email_draft)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| foreign_resume_error(job_match.resume_id))
    }

    async fn list_job_matches(&self, owner_id: &str) -> Result<Vec<JobMatchRow>, AppError> {
        Ok(sqlx::query_as::<_, JobMatchRow>(
            "SELECT * FROM job_matches WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_job_match(
        &self,
        id: Uuid,
        owner_id: &str,
    ) -> Result<Option<JobMatchRow>, AppError> {
        Ok(sqlx::query_as::<_, JobMatchRow>(
            "SELECT * FROM job_matches WHERE id = $1 AND owner_id = $2",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn set_feedback(&self, id: Uuid, owner_id: &str, score: i16) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE job_matches SET feedback_score = $1 WHERE id = $2 AND owner_id = $3",
        )
        .bind(score)
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
