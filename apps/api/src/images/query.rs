//! Photo-search query composition.
//!
//! A composed query is topic + title + the slide's own hint (skipping pieces
//! already contained in the topic) plus a domain suffix that steers stock
//! search toward charts or anatomy plates instead of generic classroom
//! photography.

/// Tokens ignored when extracting the primary keyword. Mostly glue words,
/// plus the suffix vocabulary this module appends itself.
const STOPWORDS: &[&str] = &[
    "the",
    "and",
    "of",
    "for",
    "in",
    "to",
    "a",
    "an",
    "on",
    "with",
    "introduction",
    "overview",
    "diagram",
    "illustration",
    "education",
    "system",
    "process",
];

/// Keyword groups that select a domain-specific query suffix. Checked in
/// order; first hit wins.
const CHART_TERMS: &[&str] = &["regression", "statistics", "machine learning"];
const DIGESTIVE_TERMS: &[&str] = &[
    "digestive",
    "stomach",
    "intestine",
    "esophagus",
    "pancreas",
    "liver",
];
const HEART_TERMS: &[&str] = &["heart", "circulatory", "cardio"];
const BRAIN_TERMS: &[&str] = &["brain", "nervous system"];

/// Builds the free-text photo query for one slide.
pub fn compose_query(topic: &str, title: &str, hint: Option<&str>) -> String {
    let topic = topic.trim();
    let title = title.trim();
    let hint = hint.map(str::trim).unwrap_or("");

    let topic_lower = topic.to_lowercase();
    let mut pieces: Vec<&str> = Vec::new();

    if !topic.is_empty() {
        pieces.push(topic);
    }

    if !title.is_empty() && !topic_lower.contains(&title.to_lowercase()) {
        pieces.push(title);
    }

    if !hint.is_empty() && !topic_lower.contains(&hint.to_lowercase()) {
        pieces.push(hint);
    }

    pieces.push(domain_suffix(&format!("{topic} {title}").to_lowercase()));

    pieces.join(" ").trim().to_string()
}

fn domain_suffix(text: &str) -> &'static str {
    let contains_any = |terms: &[&str]| terms.iter().any(|t| text.contains(t));

    if contains_any(CHART_TERMS) {
        "regression line data chart scatter plot"
    } else if contains_any(DIGESTIVE_TERMS) {
        "digestive system anatomy medical illustration"
    } else if contains_any(HEART_TERMS) {
        "heart anatomy circulatory system medical diagram"
    } else if contains_any(BRAIN_TERMS) {
        "brain anatomy neuron diagram"
    } else {
        "education diagram illustration"
    }
}

/// Extracts the single strongest ranking hint from a query: the longest
/// purely-alphabetic token that is not a stopword. Ties keep the earliest
/// token (stable sort), so identical queries always yield the same hint.
pub fn extract_primary_keyword(text: &str) -> Option<String> {
    let lowered = text.to_lowercase().replace('/', " ");

    let mut tokens: Vec<&str> = lowered
        .split_whitespace()
        .filter(|t| !t.is_empty() && t.chars().all(char::is_alphabetic))
        .filter(|t| !STOPWORDS.contains(t))
        .collect();

    if tokens.is_empty() {
        return None;
    }

    tokens.sort_by(|a, b| b.len().cmp(&a.len()));
    Some(tokens[0].to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_joins_topic_title_and_hint() {
        let query = compose_query("Ancient Rome", "The Republic", Some("roman senate"));
        assert_eq!(
            query,
            "Ancient Rome The Republic roman senate education diagram illustration"
        );
    }

    #[test]
    fn test_compose_skips_title_contained_in_topic() {
        let query = compose_query("Photosynthesis for Class 10", "photosynthesis", None);
        assert_eq!(
            query,
            "Photosynthesis for Class 10 education diagram illustration"
        );
    }

    #[test]
    fn test_compose_skips_hint_contained_in_topic() {
        let query = compose_query("The Solar System", "Planets", Some("solar system"));
        assert!(!query.contains("Planets solar system"));
        assert!(query.starts_with("The Solar System Planets"));
    }

    #[test]
    fn test_chart_suffix_for_statistics_topics() {
        let query = compose_query("Linear Regression", "Fitting a line", None);
        assert!(query.ends_with("regression line data chart scatter plot"));
    }

    #[test]
    fn test_anatomy_suffixes() {
        assert!(compose_query("The Digestive System", "Stomach", None)
            .ends_with("digestive system anatomy medical illustration"));
        assert!(compose_query("The Human Heart", "Chambers", None)
            .ends_with("heart anatomy circulatory system medical diagram"));
        assert!(compose_query("The Brain", "Neurons", None)
            .ends_with("brain anatomy neuron diagram"));
    }

    #[test]
    fn test_default_suffix_when_no_group_matches() {
        let query = compose_query("French Revolution", "Causes", None);
        assert!(query.ends_with("education diagram illustration"));
    }

    #[test]
    fn test_primary_keyword_is_longest_non_stopword() {
        assert_eq!(
            extract_primary_keyword("introduction to photosynthesis for plants"),
            Some("photosynthesis".to_string())
        );
    }

    #[test]
    fn test_primary_keyword_ignores_numeric_tokens() {
        assert_eq!(
            extract_primary_keyword("class 10 biology"),
            Some("biology".to_string())
        );
    }

    #[test]
    fn test_primary_keyword_splits_on_slash() {
        assert_eq!(
            extract_primary_keyword("velocity/acceleration basics"),
            Some("acceleration".to_string())
        );
    }

    #[test]
    fn test_primary_keyword_none_when_all_stopwords() {
        assert_eq!(extract_primary_keyword("the of and in"), None);
        assert_eq!(extract_primary_keyword(""), None);
    }

    #[test]
    fn test_primary_keyword_tie_is_deterministic() {
        // "water" and "cycle" tie on nothing — "water" is longest; check a real tie
        assert_eq!(
            extract_primary_keyword("acids bases salts"),
            Some("acids".to_string())
        );
    }
}
