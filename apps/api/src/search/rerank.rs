//! Hybrid re-ranking: vector similarity blended with keyword overlap.

use crate::search::keywords::{extract_keywords, keyword_matches, keyword_overlap_ratio};
use crate::search::vector_store::SearchResult;

pub const VECTOR_WEIGHT: f64 = 0.7;
pub const KEYWORD_WEIGHT: f64 = 0.3;

/// `0.7 * vector_score + 0.3 * keyword_ratio`.
///
/// Not clamped: the result lies in [0,1] only when both inputs do.
pub fn combined_score(vector_score: f64, keyword_ratio: f64) -> f64 {
    VECTOR_WEIGHT * vector_score + KEYWORD_WEIGHT * keyword_ratio
}

/// Rescores results against the query's keywords, sorts descending and truncates.
///
/// On entry each `score` holds the raw vector similarity. Ties keep input order.
pub fn rerank(mut results: Vec<SearchResult>, query_text: &str, limit: usize) -> Vec<SearchResult> {
    let query_keywords = extract_keywords(query_text);

    for result in &mut results {
        let ratio = keyword_overlap_ratio(&query_keywords, &result.keywords);
        result.score = combined_score(result.score, ratio);
        result.keyword_matches = keyword_matches(&query_keywords, &result.keywords);
    }

    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results.truncate(limit);
    results
}
