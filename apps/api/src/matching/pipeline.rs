//! Job match pipeline: pick the best resume, advise, persist.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::advisor::fallback::{detect_role, truncate_chars};
use crate::advisor::Advisor;
use crate::errors::AppError;
use crate::matching::contacts::suggested_contacts;
use crate::models::job_match::{Contact, NewJobMatch};
use crate::models::resume::ResumeRow;
use crate::repository::Repository;
use crate::search::keywords::{extract_keywords, keyword_matches, keyword_overlap_ratio};
use crate::search::rerank::combined_score;
use crate::search::vector_store::VectorStore;

/// Number of search results considered when picking the best resume.
pub const SEARCH_LIMIT: usize = 5;
/// Resume text returned in the match summary, in chars.
pub const SNIPPET_CHARS: usize = 500;

#[derive(Debug, Clone, Deserialize)]
pub struct MatchRequest {
    pub job_description: String,
    #[serde(default)]
    pub personal_story: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BestResume {
    pub id: Uuid,
    pub file_name: String,
    pub file_path: String,
    pub content: String,
    pub score: f64,
    pub keyword_matches: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchResponse {
    pub match_id: Uuid,
    pub best_resume: BestResume,
    pub gap_analysis: Vec<String>,
    pub contacts: Vec<Contact>,
    pub email_draft: String,
}

struct Selection<'a> {
    resume: &'a ResumeRow,
    score: f64,
    keyword_matches: Vec<String>,
}

pub async fn run_match(
    repo: &dyn Repository,
    vector_store: &VectorStore,
    advisor: &Advisor,
    owner_id: &str,
    request: MatchRequest,
) -> Result<MatchResponse, AppError> {
    let job_description = request.job_description.trim();
    if job_description.is_empty() {
        return Err(AppError::Validation(
            "job_description must not be empty".to_string(),
        ));
    }

    let resumes = repo.list_resumes(owner_id).await?;
    if resumes.is_empty() {
        return Err(AppError::Validation("No resumes uploaded".to_string()));
    }

    let hits = vector_store
        .search(job_description, owner_id, SEARCH_LIMIT)
        .await;
    let selection = hits
        .iter()
        .find_map(|hit| {
            resumes
                .iter()
                .find(|r| r.embedding_id == Some(hit.id))
                .map(|resume| Selection {
                    resume,
                    score: hit.score,
                    keyword_matches: hit.keyword_matches.clone(),
                })
        })
        .or_else(|| {
            warn!("No usable search hit for owner {owner_id}; ranking resumes by keywords");
            best_by_keywords(&resumes, job_description)
        })
        .ok_or_else(|| AppError::Validation("No resumes uploaded".to_string()))?;

    let resume = selection.resume;
    let gap_analysis = advisor
        .generate_gap_analysis(&resume.content_text, job_description)
        .await;
    let email_draft = advisor
        .generate_email(job_description, &resume.content_text, &request.personal_story)
        .await;
    let contacts = suggested_contacts();

    let job_match = repo
        .insert_job_match(NewJobMatch {
            owner_id: owner_id.to_string(),
            resume_id: resume.id,
            job_description: job_description.to_string(),
            job_title: detect_role(job_description),
            match_score: selection.score,
            gap_analysis: gap_analysis.clone(),
            contacts: contacts.clone(),
            email_draft: email_draft.clone(),
        })
        .await?;

    info!(
        "Created job match {} for owner {} (resume {}, score {:.3})",
        job_match.id, owner_id, resume.id, selection.score
    );

    Ok(MatchResponse {
        match_id: job_match.id,
        best_resume: BestResume {
            id: resume.id,
            file_name: resume.file_name.clone(),
            file_path: resume.file_path.clone(),
            content: truncate_chars(&resume.content_text, SNIPPET_CHARS).to_string(),
            score: selection.score,
            keyword_matches: selection.keyword_matches,
        },
        gap_analysis,
        contacts,
        email_draft,
    })
}

/// Keyword-only ranking; ties keep the earliest resume in `resumes`.
fn best_by_keywords<'a>(resumes: &'a [ResumeRow], job_description: &str) -> Option<Selection<'a>> {
    let job_keywords = extract_keywords(job_description);

    resumes
        .iter()
        .map(|resume| {
            let resume_keywords = extract_keywords(&resume.content_text);
            Selection {
                resume,
                score: combined_score(0.0, keyword_overlap_ratio(&job_keywords, &resume_keywords)),
                keyword_matches: keyword_matches(&job_keywords, &resume_keywords),
            }
        })
        .reduce(|best, next| if next.score > best.score { next } else { best })
}

pub async fn get_contacts(
    repo: &dyn Repository,
    match_id: Uuid,
    owner_id: &str,
) -> Result<Vec<Contact>, AppError> {
    repo.get_job_match(match_id, owner_id)
        .await?
        .map(|m| m.contacts.0)
        .ok_or_else(|| AppError::NotFound("Job match not found".to_string()))
}

/// Records thumbs up (1) or thumbs down (-1) on a match.
pub async fn submit_feedback(
    repo: &dyn Repository,
    match_id: Uuid,
    owner_id: &str,
    score: i16,
) -> Result<(), AppError> {
    if score != 1 && score != -1 {
        return Err(AppError::Validation(
            "score must be 1 or -1".to_string(),
        ));
    }

    if !repo.set_feedback(match_id, owner_id, score).await? {
        return Err(AppError::NotFound("Job match not found".to_string()));
    }

    info!("Recorded feedback {score} for match {match_id}");
    Ok(())
}
