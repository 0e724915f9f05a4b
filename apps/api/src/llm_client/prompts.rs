// Shared prompt constants.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt used for every advisor call.
pub const CAREER_COACH_SYSTEM: &str = "You are an expert career coach and resume advisor.";
