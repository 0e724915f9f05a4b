//! Keyword extraction over a fixed catalog of technical and soft-skill phrases.
//!
//! Output order follows catalog scan order (pattern by pattern, then by
//! position in the text), not the order terms appear in the input.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Upper bound on the number of terms returned by `extract_keywords`.
pub const MAX_KEYWORDS: usize = 20;

const CATALOG: &[&str] = &[
    // Technical skills
    r"\b(?:python|javascript|typescript|react|vue|angular|node\.js|java|c\+\+|c#|go|rust|php|ruby)\b",
    r"\b(?:sql|mysql|postgresql|mongodb|redis|elasticsearch)\b",
    r"\b(?:aws|azure|gcp|docker|kubernetes|jenkins|git|github)\b",
    r"\b(?:html|css|sass|bootstrap|tailwind)\b",
    r"\b(?:rest|graphql|api|microservices|serverless)\b",
    r"\b(?:machine learning|ml|ai|data science|analytics)\b",
    r"\b(?:agile|scrum|devops|ci/cd|tdd|testing)\b",
    r"\b(?:frontend|backend|full[- ]?stack)\b",
    // Soft skills
    r"\b(?:leadership|management|communication|collaboration)\b",
    r"\b(?:problem[- ]solving|analytical|creative|innovative)\b",
    r"\b(?:project management|team lead|mentoring)\b",
];

static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    CATALOG
        .iter()
        .map(|p| Regex::new(&format!("(?i){p}")).expect("keyword catalog pattern is valid"))
        .collect()
});

/// Extracts recognized skill terms from free text.
///
/// Terms are lower-cased and de-duplicated, at most `MAX_KEYWORDS` of them.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let mut keywords = extract_all_keywords(text);
    keywords.truncate(MAX_KEYWORDS);
    keywords
}

/// Same as `extract_keywords` without the cap. Used for skill-gap checks,
/// where a term past the cap still counts as present.
pub fn extract_all_keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut seen = HashSet::new();
    let mut keywords = Vec::new();

    for pattern in PATTERNS.iter() {
        for m in pattern.find_iter(&lowered) {
            let term = m.as_str().to_string();
            if seen.insert(term.clone()) {
                keywords.push(term);
            }
        }
    }

    keywords
}

/// Fraction of the query keywords also present in the candidate keywords.
///
/// Both sides are treated as sets. Returns 0.0 when either side is empty.
pub fn keyword_overlap_ratio(query: &[String], candidate: &[String]) -> f64 {
    let query: HashSet<&str> = query.iter().map(String::as_str).collect();
    let candidate: HashSet<&str> = candidate.iter().map(String::as_str).collect();

    if query.is_empty() || candidate.is_empty() {
        return 0.0;
    }

    let overlap = query.intersection(&candidate).count();
    overlap as f64 / query.len() as f64
}

/// Query keywords present in the candidate, in query order.
pub fn keyword_matches(query: &[String], candidate: &[String]) -> Vec<String> {
    let candidate: HashSet<&str> = candidate.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    query
        .iter()
        .filter(|k| candidate.contains(k.as_str()) && seen.insert(k.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kws(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_text_yields_no_keywords() {
        assert!(extract_keywords("").is_empty());
        assert!(extract_keywords("   \n\t").is_empty());
    }

    #[test]
    fn test_matching_is_case_insensitive_and_lowercased() {
        let keywords = extract_keywords("Senior PYTHON engineer with Docker and AWS");
        assert_eq!(keywords, kws(&["python", "docker", "aws"]));
    }

    #[test]
    fn test_order_follows_catalog_not_input() {
        // "leadership" is in a later catalog group than "react", even though it appears first.
        let keywords = extract_keywords("Leadership experience and React");
        assert_eq!(keywords, kws(&["react", "leadership"]));
    }

    #[test]
    fn test_duplicates_are_removed() {
        let keywords = extract_keywords("rust Rust RUST and more rust");
        assert_eq!(keywords, kws(&["rust"]));
    }

    #[test]
    fn test_multi_word_and_punctuated_terms() {
        let keywords =
            extract_keywords("Machine learning, Node.js, CI/CD, full-stack and problem solving");
        assert!(keywords.contains(&"machine learning".to_string()));
        assert!(keywords.contains(&"node.js".to_string()));
        assert!(keywords.contains(&"ci/cd".to_string()));
        assert!(keywords.contains(&"full-stack".to_string()));
        assert!(keywords.contains(&"problem solving".to_string()));
    }

    #[test]
    fn test_word_boundaries_prevent_partial_matches() {
        // "go" must not match inside "google", "java" must not match inside "javascript".
        let keywords = extract_keywords("google javascript");
        assert_eq!(keywords, kws(&["javascript"]));
    }

    #[test]
    fn test_output_is_capped() {
        let text = "python javascript typescript react vue angular java rust php ruby \
                    sql mysql postgresql mongodb redis elasticsearch aws azure gcp docker \
                    kubernetes jenkins git github html css";
        assert_eq!(extract_keywords(text).len(), MAX_KEYWORDS);

        let all = extract_all_keywords(text);
        assert_eq!(all.len(), 26);
        assert_eq!(&all[..MAX_KEYWORDS], extract_keywords(text).as_slice());
        assert_eq!(all.last().map(String::as_str), Some("css"));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let texts = [
            "",
            "Looking for a Python and Docker engineer",
            "React frontend role with GraphQL, agile, mentoring and team lead duties",
        ];
        for text in texts {
            assert_eq!(extract_keywords(text), extract_keywords(text));
        }
    }

    #[test]
    fn test_overlap_ratio_is_fraction_of_query() {
        let query = kws(&["python", "docker", "aws", "sql"]);
        let candidate = kws(&["python", "sql", "react"]);
        assert!((keyword_overlap_ratio(&query, &candidate) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_overlap_ratio_zero_when_either_side_empty() {
        assert_eq!(keyword_overlap_ratio(&[], &kws(&["python"])), 0.0);
        assert_eq!(keyword_overlap_ratio(&kws(&["python"]), &[]), 0.0);
        assert_eq!(keyword_overlap_ratio(&[], &[]), 0.0);
    }

    #[test]
    fn test_overlap_ratio_bounded() {
        let cases = [
            (kws(&["a", "b"]), kws(&["a", "b", "c"])),
            (kws(&["a", "a", "b"]), kws(&["a"])),
            (kws(&["x"]), kws(&["y"])),
        ];
        for (q, c) in cases {
            let ratio = keyword_overlap_ratio(&q, &c);
            assert!((0.0..=1.0).contains(&ratio), "ratio out of range: {ratio}");
        }
    }

    #[test]
    fn test_keyword_matches_keep_query_order() {
        let query = kws(&["react", "python", "docker"]);
        let candidate = kws(&["docker", "react"]);
        assert_eq!(keyword_matches(&query, &candidate), kws(&["react", "docker"]));
    }
}
