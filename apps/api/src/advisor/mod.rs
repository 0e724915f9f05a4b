//! Advisor: gap analysis and outreach email drafting.
//!
//! Each call makes at most one model request. No model, a failed request or
//! an unusable reply all land on the deterministic fallback.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::advisor::fallback::{
    fallback_email, fallback_gap_analysis, parse_suggestions, truncate_chars,
};
use crate::advisor::prompts::{
    EMAIL_JD_CHARS, EMAIL_PROMPT_TEMPLATE, EMAIL_RESUME_CHARS, GAP_ANALYSIS_PROMPT_TEMPLATE,
    GAP_JD_CHARS, GAP_RESUME_CHARS,
};
use crate::llm_client::prompts::CAREER_COACH_SYSTEM;
use crate::llm_client::ChatModel;
use crate::search::keywords::extract_all_keywords;

pub mod fallback;
pub mod prompts;

/// Model replies this short (in chars) are not accepted as an email draft.
const MIN_EMAIL_CHARS: usize = 50;

#[derive(Clone)]
pub struct Advisor {
    model: Option<Arc<dyn ChatModel>>,
}

impl Advisor {
    pub fn new(model: Option<Arc<dyn ChatModel>>) -> Self {
        if model.is_none() {
            info!("No chat model configured; advisor will use fallback templates");
        }
        Self { model }
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Up to 8 improvement suggestions for the resume against the job description.
    pub async fn generate_gap_analysis(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Vec<String> {
        let fallback = || {
            fallback_gap_analysis(
                &extract_all_keywords(resume_text),
                &extract_all_keywords(job_description),
            )
        };

        let Some(model) = &self.model else {
            return fallback();
        };

        let prompt = GAP_ANALYSIS_PROMPT_TEMPLATE
            .replace(
                "{job_description}",
                truncate_chars(job_description, GAP_JD_CHARS),
            )
            .replace(
                "{resume_content}",
                truncate_chars(resume_text, GAP_RESUME_CHARS),
            );

        match model.complete(&prompt, CAREER_COACH_SYSTEM).await {
            Ok(reply) => {
                let suggestions = parse_suggestions(&reply);
                if suggestions.is_empty() {
                    warn!("Gap analysis reply had no usable suggestions; using fallback");
                    fallback()
                } else {
                    suggestions
                }
            }
            Err(e) => {
                error!("Error generating gap analysis: {e}");
                fallback()
            }
        }
    }

    /// An outreach email draft, always with a subject line when it comes from the fallback.
    pub async fn generate_email(
        &self,
        job_description: &str,
        resume_text: &str,
        personal_story: &str,
    ) -> String {
        let Some(model) = &self.model else {
            return fallback_email(job_description, personal_story);
        };

        let prompt = EMAIL_PROMPT_TEMPLATE
            .replace(
                "{job_description}",
                truncate_chars(job_description, EMAIL_JD_CHARS),
            )
            .replace(
                "{resume_content}",
                truncate_chars(resume_text, EMAIL_RESUME_CHARS),
            )
            .replace("{personal_story}", personal_story);

        match model.complete(&prompt, CAREER_COACH_SYSTEM).await {
            Ok(reply) if reply.chars().count() > MIN_EMAIL_CHARS => reply,
            Ok(_) => {
                warn!("Email draft reply too short; using fallback");
                fallback_email(job_description, personal_story)
            }
            Err(e) => {
                error!("Error generating email draft: {e}");
                fallback_email(job_description, personal_story)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::llm_client::LlmError;

    /// Chat model returning a fixed reply and recording prompts.
    pub struct ScriptedModel {
        pub reply: Result<String, ()>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        pub fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(vec![]),
            }
        }

        pub fn failing() -> Self {
            Self {
                reply: Err(()),
                prompts: Mutex::new(vec![]),
            }
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn complete(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(()) => Err(LlmError::Api {
                    status: 503,
                    message: "unavailable".to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_no_model_gap_analysis_is_fallback() {
        let advisor = Advisor::new(None);
        let suggestions = advisor
            .generate_gap_analysis("", "Looking for a Python and Docker engineer")
            .await;

        assert!((1..=8).contains(&suggestions.len()));
        assert!(suggestions.iter().all(|s| !s.is_empty()));
        assert!(suggestions[0].starts_with("Consider adding these relevant skills:"));
        assert!(suggestions[0].contains("python") || suggestions[0].contains("docker"));
    }

    #[tokio::test]
    async fn test_fallback_sees_skills_past_keyword_cap() {
        let advisor = Advisor::new(None);
        let resume = "Python JavaScript TypeScript React Vue Angular Java Rust PHP Ruby \
                      SQL MySQL PostgreSQL MongoDB Redis Elasticsearch AWS Azure GCP Kubernetes \
                      Jenkins Docker";
        assert!(extract_all_keywords(resume).len() > crate::search::keywords::MAX_KEYWORDS);

        let suggestions = advisor
            .generate_gap_analysis(resume, "Looking for a Docker engineer")
            .await;

        assert_eq!(suggestions.len(), 6);
        assert!(suggestions.iter().all(|s| !s.contains("docker")));
    }

    #[tokio::test]
    async fn test_no_model_email_has_subject() {
        let advisor = Advisor::new(None);
        let email = advisor
            .generate_email("Senior data analyst", "resume", "")
            .await;
        assert!(!email.is_empty());
        assert!(email.contains("Subject:"));
        assert!(email.contains("Analyst Position"));
    }

    #[tokio::test]
    async fn test_model_suggestions_are_parsed() {
        let model = Arc::new(ScriptedModel::replying(
            "Here are suggestions:\n1. Add Kubernetes deployment experience\n2. Quantify latency wins",
        ));
        let advisor = Advisor::new(Some(model.clone()));

        let suggestions = advisor.generate_gap_analysis("resume", "jd").await;

        assert_eq!(
            suggestions,
            vec![
                "Here are suggestions:",
                "Add Kubernetes deployment experience",
                "Quantify latency wins",
            ]
        );
    }

    #[tokio::test]
    async fn test_prompt_truncates_inputs() {
        let model = Arc::new(ScriptedModel::failing());
        let advisor = Advisor::new(Some(model.clone()));
        let long_jd = "j".repeat(5000);
        let long_resume = "r".repeat(5000);

        advisor.generate_gap_analysis(&long_resume, &long_jd).await;
        advisor.generate_email(&long_jd, &long_resume, "story").await;

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].contains(&"j".repeat(GAP_JD_CHARS)));
        assert!(!prompts[0].contains(&"j".repeat(GAP_JD_CHARS + 1)));
        assert!(!prompts[0].contains(&"r".repeat(GAP_RESUME_CHARS + 1)));
        assert!(!prompts[1].contains(&"j".repeat(EMAIL_JD_CHARS + 1)));
        assert!(prompts[1].contains(&"r".repeat(EMAIL_RESUME_CHARS)));
        assert!(!prompts[1].contains(&"r".repeat(EMAIL_RESUME_CHARS + 1)));
        assert!(prompts[1].contains("Personal Context: story"));
    }

    #[tokio::test]
    async fn test_model_failure_falls_back() {
        let advisor = Advisor::new(Some(Arc::new(ScriptedModel::failing())));

        let suggestions = advisor.generate_gap_analysis("python", "python role").await;
        assert_eq!(suggestions.len(), 6);

        let email = advisor.generate_email("manager role", "", "").await;
        assert!(email.starts_with("Subject: Application for Manager Position"));
    }

    #[tokio::test]
    async fn test_unusable_replies_fall_back() {
        let advisor = Advisor::new(Some(Arc::new(ScriptedModel::replying("# Heading\nok"))));

        let suggestions = advisor.generate_gap_analysis("", "").await;
        assert_eq!(suggestions.len(), 6);

        let email = advisor.generate_email("engineer", "", "").await;
        assert!(email.contains("Subject:"));
    }

    #[tokio::test]
    async fn test_long_model_email_returned_verbatim() {
        let draft = "Subject: Hello\n\nDear [Hiring Manager], I would love to join your platform team.";
        let advisor = Advisor::new(Some(Arc::new(ScriptedModel::replying(draft))));
        assert_eq!(advisor.generate_email("jd", "cv", "").await, draft);
    }
}
