//! Overflow-safe bullet preparation.
//!
//! The slide canvas is fixed, so text must be bounded before it reaches the
//! document writer. The pass is pure and deterministic:
//!
//! 1. normalize `content` to trimmed, non-empty strings
//! 2. truncate each bullet at a whitespace boundary inside the char budget
//! 3. cap the bullet count, merging the overflow into one trailing bullet
//! 4. synthesize a fallback bullet for empty non-title slides
//!
//! Truncation keeps the result (ellipsis included) within the budget, which
//! makes the rule idempotent: a truncated bullet passes through unchanged.

use crate::models::request::Language;
use crate::models::slide::{SlideContent, SlideType};

const ELLIPSIS: &str = "...";
/// Prefix of the merged overflow bullet.
pub const MERGED_PREFIX: &str = "Further details: ";

/// Per-language text budgets. Bilingual decks carry two scripts per line,
/// so they get fewer, shorter bullets at a smaller size.
#[derive(Debug, Clone, Copy)]
pub struct BulletRules {
    pub max_bullets: usize,
    pub max_chars: usize,
    pub font_size_pt: u32,
}

impl BulletRules {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::Bilingual => Self {
                max_bullets: 4,
                max_chars: 160,
                font_size_pt: 16,
            },
            Language::English | Language::Hindi => Self {
                max_bullets: 5,
                max_chars: 200,
                font_size_pt: 18,
            },
        }
    }
}

/// Truncates a bullet to at most `max_chars` characters, cutting at the last
/// whitespace boundary inside the budget and appending an ellipsis.
/// Strings already inside the budget pass through trimmed but unchanged.
pub fn truncate_bullet(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }

    let budget = max_chars.saturating_sub(ELLIPSIS.chars().count());
    let cut: String = trimmed.chars().take(budget).collect();

    let cut = match cut.rfind(' ') {
        Some(pos) => cut[..pos].trim_end().to_string(),
        None => cut,
    };

    format!("{cut}{ELLIPSIS}")
}

/// Runs the full preparation pass for one slide.
pub fn prepare_bullets(slide: &SlideContent, topic: &str, rules: &BulletRules) -> Vec<String> {
    let mut cleaned: Vec<String> = slide
        .content
        .iter()
        .map(|b| b.trim())
        .filter(|b| !b.is_empty())
        .map(|b| truncate_bullet(b, rules.max_chars))
        .collect();

    if cleaned.len() > rules.max_bullets {
        let tail = cleaned.split_off(rules.max_bullets - 1);
        let merged = truncate_bullet(&tail.join("; "), rules.max_chars);
        cleaned.push(format!("{MERGED_PREFIX}{merged}"));
    }

    if cleaned.is_empty() && slide.slide_type != SlideType::Title {
        let subject = if slide.title.trim().is_empty() {
            topic
        } else {
            slide.title.trim()
        };
        cleaned.push(format!("Key ideas about {subject}."));
    }

    cleaned
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: BulletRules = BulletRules {
        max_bullets: 5,
        max_chars: 200,
        font_size_pt: 18,
    };

    fn make_slide(slide_type: SlideType, bullets: &[&str]) -> SlideContent {
        let mut slide = SlideContent::new(slide_type, "Evaporation");
        slide.content = bullets.iter().map(|s| s.to_string()).collect();
        slide
    }

    // ── truncate_bullet ─────────────────────────────────────────────────────

    #[test]
    fn test_short_bullet_unchanged() {
        assert_eq!(truncate_bullet("Water rises as vapor", 200), "Water rises as vapor");
    }

    #[test]
    fn test_long_bullet_cut_at_whitespace_with_ellipsis() {
        let long = "word ".repeat(60); // 300 chars
        let out = truncate_bullet(&long, 200);
        assert!(out.ends_with("..."));
        assert!(out.chars().count() <= 200);
        assert!(
            out.trim_end_matches("...").ends_with("word"),
            "cut must land on a word boundary, got {out:?}"
        );
        assert!(out.chars().count() <= long.chars().count());
    }

    #[test]
    fn test_truncation_is_idempotent() {
        let long = "alpha beta gamma delta ".repeat(20);
        let once = truncate_bullet(&long, 160);
        let twice = truncate_bullet(&once, 160);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unbroken_token_is_hard_cut() {
        let solid = "x".repeat(250);
        let out = truncate_bullet(&solid, 200);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 200);
    }

    #[test]
    fn test_multibyte_text_counts_chars_not_bytes() {
        let hindi = "जलचक्र ".repeat(60);
        let out = truncate_bullet(&hindi, 160);
        assert!(out.chars().count() <= 160);
        assert!(out.ends_with("..."));
    }

    // ── prepare_bullets ─────────────────────────────────────────────────────

    #[test]
    fn test_normalization_drops_blank_entries() {
        let slide = make_slide(SlideType::Content, &["  first  ", "", "   ", "second"]);
        assert_eq!(prepare_bullets(&slide, "topic", &RULES), vec!["first", "second"]);
    }

    #[test]
    fn test_seven_long_bullets_collapse_to_five() {
        let long = "detail ".repeat(36).trim_end().to_string(); // 250 chars
        let bullets: Vec<&str> = (0..7).map(|_| long.as_str()).collect();
        let slide = make_slide(SlideType::Content, &bullets);

        let out = prepare_bullets(&slide, "topic", &RULES);

        assert_eq!(out.len(), 5);
        for bullet in &out[..4] {
            assert!(bullet.chars().count() <= 200);
            assert!(bullet.ends_with("..."));
        }
        let last = &out[4];
        assert!(last.starts_with(MERGED_PREFIX));
        let merged_part = &last[MERGED_PREFIX.len()..];
        assert!(merged_part.chars().count() <= 200);
        assert!(merged_part.ends_with("..."));
    }

    #[test]
    fn test_exactly_max_bullets_not_merged() {
        let slide = make_slide(SlideType::Content, &["a", "b", "c", "d", "e"]);
        let out = prepare_bullets(&slide, "topic", &RULES);
        assert_eq!(out.len(), 5);
        assert!(!out[4].starts_with(MERGED_PREFIX));
    }

    #[test]
    fn test_merge_joins_with_semicolons() {
        let slide = make_slide(SlideType::Content, &["a", "b", "c", "d", "e", "f", "g"]);
        let out = prepare_bullets(&slide, "topic", &RULES);
        assert_eq!(out.len(), 5);
        assert_eq!(out[..4], ["a", "b", "c", "d"]);
        assert_eq!(out[4], "Further details: e; f; g");
    }

    #[test]
    fn test_empty_content_slide_gets_fallback_bullet() {
        let slide = make_slide(SlideType::Content, &[]);
        let out = prepare_bullets(&slide, "The water cycle", &RULES);
        assert_eq!(out, vec!["Key ideas about Evaporation."]);
    }

    #[test]
    fn test_fallback_uses_topic_when_title_blank() {
        let mut slide = make_slide(SlideType::Summary, &[]);
        slide.title = "  ".to_string();
        let out = prepare_bullets(&slide, "The water cycle", &RULES);
        assert_eq!(out, vec!["Key ideas about The water cycle."]);
    }

    #[test]
    fn test_title_slide_gets_no_fallback_bullet() {
        let slide = make_slide(SlideType::Title, &[]);
        assert!(prepare_bullets(&slide, "topic", &RULES).is_empty());
    }

    #[test]
    fn test_bilingual_rules_tighten_budgets() {
        let rules = BulletRules::for_language(Language::Bilingual);
        assert_eq!(rules.max_bullets, 4);
        assert_eq!(rules.max_chars, 160);
        assert_eq!(rules.font_size_pt, 16);

        let english = BulletRules::for_language(Language::English);
        assert_eq!(english.max_bullets, 5);
        assert_eq!(english.max_chars, 200);
        assert_eq!(english.font_size_pt, 18);
    }
}
