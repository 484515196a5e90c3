//! Candidate scoring for photo-search results.
//!
//! Stock searches for school topics surface a lot of posed classroom and
//! portrait photography. The score pushes diagrams, charts and anatomy
//! plates up, hard-penalizes people-centric descriptions, and nudges
//! landscape frames that fit the slide's image band.

use serde::Deserialize;

use crate::images::UsedImageSet;

/// Description words that mark a candidate as diagram-like.
const DIAGRAM_WORDS: &[&str] = &[
    "diagram",
    "graph",
    "chart",
    "plot",
    "equation",
    "formula",
    "data",
    "analytics",
    "statistics",
    "regression",
    "anatomy",
    "organ",
    "medical",
    "biology",
    "microscope",
    "infographic",
    "illustration",
    "concept map",
    "x-ray",
];

/// Description words that mark a candidate as people/classroom stock
/// photography, filtered hard.
const PERSON_WORDS: &[&str] = &[
    "person",
    "people",
    "man",
    "woman",
    "boy",
    "girl",
    "child",
    "children",
    "students",
    "student",
    "teacher",
    "portrait",
    "face",
    "selfie",
    "classroom",
    "class room",
    "meeting",
    "team",
    "group of people",
    "adhd",
    "mental",
    "psychology",
    "therapy",
    "counseling",
];

const DIAGRAM_BONUS: i32 = 4;
const PRIMARY_HINT_BONUS: i32 = 3;
const PERSON_PENALTY: i32 = -4;
const LANDSCAPE_BONUS: i32 = 1;

/// Size variants offered for one photo, largest preferred.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhotoVariants {
    pub large: Option<String>,
    pub medium: Option<String>,
    pub original: Option<String>,
}

/// One photo-search result.
#[derive(Debug, Clone)]
pub struct PhotoCandidate {
    /// Free-text description (alt text) supplied by the search service.
    pub description: String,
    pub src: PhotoVariants,
    pub width: u32,
    pub height: u32,
}

impl PhotoCandidate {
    /// The reference to embed, preferring the large variant.
    pub fn best_url(&self) -> Option<&str> {
        self.src
            .large
            .as_deref()
            .or(self.src.medium.as_deref())
            .or(self.src.original.as_deref())
    }
}

/// Scores a single candidate against the query's primary keyword.
pub fn score_candidate(candidate: &PhotoCandidate, primary_hint: Option<&str>) -> i32 {
    let description = candidate.description.to_lowercase();
    let mut score = 0;

    if DIAGRAM_WORDS.iter().any(|w| description.contains(w)) {
        score += DIAGRAM_BONUS;
    }

    if let Some(hint) = primary_hint {
        if !hint.is_empty() && description.contains(hint) {
            score += PRIMARY_HINT_BONUS;
        }
    }

    if PERSON_WORDS.iter().any(|w| description.contains(w)) {
        score += PERSON_PENALTY;
    }

    if candidate.width > 0 && candidate.height > 0 && candidate.width > candidate.height {
        score += LANDSCAPE_BONUS;
    }

    score
}

/// Ranks candidates and picks one deterministically.
///
/// Candidates without any usable URL are dropped. The rest are sorted by
/// score, descending and stable, so equal scores keep the service's order.
/// Already-used URLs are filtered out unless that would leave nothing; the
/// final pick is `slide_index % len`, which varies the choice across slides
/// without randomness.
pub fn pick_best(
    candidates: &[PhotoCandidate],
    primary_hint: Option<&str>,
    used: &UsedImageSet,
    slide_index: usize,
) -> Option<String> {
    let mut scored: Vec<(i32, &str)> = candidates
        .iter()
        .filter_map(|c| c.best_url().map(|url| (score_candidate(c, primary_hint), url)))
        .collect();

    if scored.is_empty() {
        return None;
    }

    scored.sort_by(|a, b| b.0.cmp(&a.0));

    let fresh: Vec<(i32, &str)> = scored
        .iter()
        .copied()
        .filter(|(_, url)| !used.contains(url))
        .collect();
    if !fresh.is_empty() {
        scored = fresh;
    }

    let (_, chosen) = scored[slide_index % scored.len()];
    Some(chosen.to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_candidate(description: &str, url: &str, width: u32, height: u32) -> PhotoCandidate {
        PhotoCandidate {
            description: description.to_string(),
            src: PhotoVariants {
                large: Some(url.to_string()),
                medium: None,
                original: None,
            },
            width,
            height,
        }
    }

    #[test]
    fn test_diagram_word_scores_plus_four() {
        let c = make_candidate("heart anatomy poster", "u", 0, 0);
        assert_eq!(score_candidate(&c, None), 4);
    }

    #[test]
    fn test_person_word_scores_minus_four() {
        let c = make_candidate("smiling teacher at a whiteboard", "u", 0, 0);
        assert_eq!(score_candidate(&c, None), -4);
    }

    #[test]
    fn test_primary_hint_scores_plus_three() {
        let c = make_candidate("green photosynthesis leaf", "u", 0, 0);
        assert_eq!(score_candidate(&c, Some("photosynthesis")), 3);
    }

    #[test]
    fn test_landscape_scores_plus_one() {
        let c = make_candidate("plain background", "u", 1600, 900);
        assert_eq!(score_candidate(&c, None), 1);
        let portrait = make_candidate("plain background", "u", 900, 1600);
        assert_eq!(score_candidate(&portrait, None), 0);
    }

    #[test]
    fn test_scores_combine() {
        // diagram (+4) + hint (+3) + landscape (+1) + person (-4) = 4
        let c = make_candidate("regression chart shown to students", "u", 1600, 900);
        assert_eq!(score_candidate(&c, Some("regression")), 4);
    }

    #[test]
    fn test_pick_best_prefers_highest_score() {
        let candidates = vec![
            make_candidate("person in a meeting", "https://img/person", 1600, 900),
            make_candidate("circuit diagram", "https://img/diagram", 1600, 900),
        ];
        let used = UsedImageSet::default();
        assert_eq!(
            pick_best(&candidates, None, &used, 0),
            Some("https://img/diagram".to_string())
        );
    }

    #[test]
    fn test_pick_best_varies_with_slide_index() {
        let candidates = vec![
            make_candidate("circuit diagram one", "https://img/a", 1600, 900),
            make_candidate("circuit diagram two", "https://img/b", 1600, 900),
        ];
        let used = UsedImageSet::default();
        let first = pick_best(&candidates, None, &used, 0).unwrap();
        let second = pick_best(&candidates, None, &used, 1).unwrap();
        assert_ne!(first, second, "index should rotate through equal scores");
        // Same index, same inputs -> same pick
        assert_eq!(pick_best(&candidates, None, &used, 0).unwrap(), first);
    }

    #[test]
    fn test_pick_best_skips_used_urls() {
        let candidates = vec![
            make_candidate("circuit diagram", "https://img/used", 1600, 900),
            make_candidate("plain photo", "https://img/fresh", 1600, 900),
        ];
        let mut used = UsedImageSet::default();
        used.insert("https://img/used");
        assert_eq!(
            pick_best(&candidates, None, &used, 0),
            Some("https://img/fresh".to_string())
        );
    }

    #[test]
    fn test_pick_best_falls_back_when_everything_used() {
        let candidates = vec![make_candidate("circuit diagram", "https://img/only", 1600, 900)];
        let mut used = UsedImageSet::default();
        used.insert("https://img/only");
        assert_eq!(
            pick_best(&candidates, None, &used, 3),
            Some("https://img/only".to_string()),
            "exhausted candidates fall back to the full scored list"
        );
    }

    #[test]
    fn test_pick_best_empty_input() {
        assert_eq!(pick_best(&[], None, &UsedImageSet::default(), 0), None);
    }

    #[test]
    fn test_candidates_without_urls_are_dropped() {
        let no_url = PhotoCandidate {
            description: "circuit diagram".to_string(),
            src: PhotoVariants::default(),
            width: 1600,
            height: 900,
        };
        assert_eq!(pick_best(&[no_url], None, &UsedImageSet::default(), 0), None);
    }

    #[test]
    fn test_best_url_prefers_large_then_medium_then_original() {
        let mut c = make_candidate("x", "large", 0, 0);
        c.src.medium = Some("medium".to_string());
        c.src.original = Some("original".to_string());
        assert_eq!(c.best_url(), Some("large"));
        c.src.large = None;
        assert_eq!(c.best_url(), Some("medium"));
        c.src.medium = None;
        assert_eq!(c.best_url(), Some("original"));
    }
}
