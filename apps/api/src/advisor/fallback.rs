//! Deterministic fallbacks and reply parsing for the advisor.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Upper bound on parsed model suggestions.
pub const MAX_SUGGESTIONS: usize = 8;
/// Upper bound on fallback suggestions, including the missing-skills hint.
pub const MAX_FALLBACK_SUGGESTIONS: usize = 6;
/// Missing skills named in the fallback hint.
const MAX_MISSING_SKILLS: usize = 3;
/// Lines this short (in chars) are dropped from model suggestions.
const MIN_SUGGESTION_CHARS: usize = 10;

static ENUMERATION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d.\-•*]+\s*").expect("marker pattern is valid"));

static ROLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(engineer|developer|manager|analyst|designer)").expect("role pattern is valid")
});

const GENERIC_SUGGESTIONS: [&str; 6] = [
    "Add specific metrics and quantifiable achievements to demonstrate impact",
    "Include more industry-specific keywords from the job description",
    "Highlight relevant technical skills and technologies",
    "Emphasize leadership and collaboration experiences",
    "Add relevant certifications or professional development",
    "Include specific project examples that match the role requirements",
];

/// Splits a model reply into clean suggestion lines.
///
/// Strips leading enumeration markers, drops short lines and markdown headings.
pub fn parse_suggestions(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| ENUMERATION_MARKER.replace(line.trim(), "").into_owned())
        .filter(|line| line.chars().count() > MIN_SUGGESTION_CHARS && !line.starts_with('#'))
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Generic suggestions, prefixed with a hint naming skills the job asks for
/// that the resume lacks.
pub fn fallback_gap_analysis(resume_keywords: &[String], job_keywords: &[String]) -> Vec<String> {
    let present: HashSet<&str> = resume_keywords.iter().map(String::as_str).collect();
    let missing: Vec<&str> = job_keywords
        .iter()
        .map(String::as_str)
        .filter(|k| !present.contains(k))
        .take(MAX_MISSING_SKILLS)
        .collect();

    let mut suggestions = Vec::with_capacity(GENERIC_SUGGESTIONS.len() + 1);
    if !missing.is_empty() {
        suggestions.push(format!(
            "Consider adding these relevant skills: {}",
            missing.join(", ")
        ));
    }
    suggestions.extend(GENERIC_SUGGESTIONS.iter().map(|s| s.to_string()));
    suggestions.truncate(MAX_FALLBACK_SUGGESTIONS);
    suggestions
}

/// First role word in the job description, lower-cased.
pub fn detect_role(job_description: &str) -> Option<String> {
    ROLE.find(&job_description.to_lowercase())
        .map(|m| m.as_str().to_string())
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Letter template with the detected role and the optional personal story.
pub fn fallback_email(job_description: &str, personal_story: &str) -> String {
    let role = detect_role(job_description).unwrap_or_else(|| "position".to_string());
    let title = title_case(&role);

    let story = personal_story.trim();
    let personal_touch = if story.is_empty() {
        String::new()
    } else {
        format!("\n\n{story}\n")
    };

    format!(
        "Subject: Application for {title} Position - Excited to Contribute

Dear Hiring Manager,

I hope this email finds you well. I'm writing to express my strong interest in the {role} position at your company.

After reviewing the job description, I'm excited about the opportunity to contribute my skills and experience to your team. My background aligns well with your requirements, particularly in areas of technical development and problem-solving.{personal_touch}
I would love to discuss how my experience and enthusiasm can benefit your organization. Would you be available for a brief conversation this week to explore this opportunity further?

Thank you for your time and consideration. I look forward to hearing from you.

Best regards,
[Your Name]
[Your Phone Number]
[Your Email]"
    )
}

/// The first `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
