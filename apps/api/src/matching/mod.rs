//! Matching a job description against a user's resumes.

pub mod contacts;
pub mod handlers;
pub mod pipeline;
