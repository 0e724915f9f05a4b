// All LLM prompt constants for the Advisor module.

/// Characters of job description and resume sent for gap analysis.
pub const GAP_JD_CHARS: usize = 2000;
pub const GAP_RESUME_CHARS: usize = 2000;

/// Characters of job description and resume sent for email drafting.
pub const EMAIL_JD_CHARS: usize = 1500;
pub const EMAIL_RESUME_CHARS: usize = 1000;

/// Gap analysis prompt. Replace `{job_description}` and `{resume_content}`.
pub const GAP_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze this resume against the job description and provide specific, actionable improvement suggestions.

Job Description:
{job_description}

Resume Content:
{resume_content}

Provide 6-8 specific suggestions focusing on:
1. Missing technical skills or technologies
2. Relevant experience that should be highlighted
3. Keywords that should be added
4. Quantifiable achievements that could be improved
5. Industry-specific terminology to include
6. Certifications or training that would help

Format each suggestion as a clear, actionable bullet point.
Be specific and avoid generic advice."#;

/// Outreach email prompt.
/// Replace: {job_description}, {resume_content}, {personal_story}
pub const EMAIL_PROMPT_TEMPLATE: &str = r#"Write a professional, personalized outreach email for this job application.

Job Description:
{job_description}

Candidate Background:
{resume_content}

Personal Context: {personal_story}

Requirements:
- Keep under 200 words
- Professional but warm and conversational tone
- Include specific skills/experiences that match the role
- Mention genuine interest in the company/role
- Include clear call to action
- Use [Hiring Manager] as placeholder for name
- Include subject line

Make it feel personal and authentic, not templated."#;
