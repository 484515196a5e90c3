//! Request model for deck generation, plus the five request enums.
//!
//! A `GenerationRequest` is immutable once deserialized: the pipeline owns it
//! for the duration of one generation and echoes it back as `Deck::metadata`.

use serde::{Deserialize, Serialize};

/// Who the deck is for. Drives prompt wording only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudienceLevel {
    Elementary,
    Middle,
    High,
    College,
    Professional,
}

/// Overall presentation register. Also selects the slide color palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationStyle {
    Academic,
    Storytelling,
    Interactive,
    Technical,
    Visual,
}

/// Content language. Bilingual decks get tighter text budgets in layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Hindi,
    Bilingual,
}

/// Requested color theme. Accepted on the wire for forward compatibility;
/// palettes are currently derived from `PresentationStyle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    Blue,
    Purple,
    Green,
    Orange,
}

/// Bounds enforced by `GenerationRequest::validate`.
pub const MIN_TOPIC_CHARS: usize = 5;
pub const MIN_SLIDES: u8 = 3;
pub const MAX_SLIDES: u8 = 15;

/// The caller's deck specification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub topic: String,
    #[serde(default = "default_audience")]
    pub audience_level: AudienceLevel,
    #[serde(default = "default_num_slides")]
    pub num_slides: u8,
    #[serde(default = "default_style")]
    pub presentation_style: PresentationStyle,
    #[serde(default = "default_language")]
    pub language: Language,
    #[serde(default)]
    pub include_quiz: bool,
    #[serde(default)]
    pub speaker_notes: bool,
    #[serde(default = "default_theme")]
    pub color_theme: ColorTheme,
}

fn default_audience() -> AudienceLevel {
    AudienceLevel::Middle
}

fn default_num_slides() -> u8 {
    6
}

fn default_style() -> PresentationStyle {
    PresentationStyle::Academic
}

fn default_language() -> Language {
    Language::English
}

fn default_theme() -> ColorTheme {
    ColorTheme::Purple
}

impl GenerationRequest {
    /// Checks the synchronous preconditions: trimmed topic length and slide
    /// count bounds. Returns a caller-facing message on failure.
    pub fn validate(&self) -> Result<(), String> {
        if self.topic.trim().chars().count() < MIN_TOPIC_CHARS {
            return Err(format!(
                "Topic must be at least {MIN_TOPIC_CHARS} characters long"
            ));
        }

        if self.num_slides < MIN_SLIDES || self.num_slides > MAX_SLIDES {
            return Err(format!(
                "Number of slides must be between {MIN_SLIDES} and {MAX_SLIDES}"
            ));
        }

        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_request(topic: &str, num_slides: u8) -> GenerationRequest {
        GenerationRequest {
            topic: topic.to_string(),
            audience_level: AudienceLevel::Middle,
            num_slides,
            presentation_style: PresentationStyle::Academic,
            language: Language::English,
            include_quiz: false,
            speaker_notes: false,
            color_theme: ColorTheme::Purple,
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(make_request("Photosynthesis for Class 10", 6).validate().is_ok());
    }

    #[test]
    fn test_short_topic_rejected() {
        let err = make_request("CPU", 6).validate().unwrap_err();
        assert!(err.contains("at least 5 characters"));
    }

    #[test]
    fn test_whitespace_padding_does_not_satisfy_topic_length() {
        assert!(make_request("  ab  ", 6).validate().is_err());
    }

    #[test]
    fn test_slide_count_bounds() {
        assert!(make_request("Photosynthesis", 2).validate().is_err());
        assert!(make_request("Photosynthesis", 3).validate().is_ok());
        assert!(make_request("Photosynthesis", 15).validate().is_ok());
        assert!(make_request("Photosynthesis", 16).validate().is_err());
    }

    #[test]
    fn test_defaults_applied_on_deserialization() {
        let request: GenerationRequest =
            serde_json::from_str(r#"{"topic": "The water cycle"}"#).unwrap();
        assert_eq!(request.audience_level, AudienceLevel::Middle);
        assert_eq!(request.num_slides, 6);
        assert_eq!(request.presentation_style, PresentationStyle::Academic);
        assert_eq!(request.language, Language::English);
        assert!(!request.include_quiz);
        assert!(!request.speaker_notes);
        assert_eq!(request.color_theme, ColorTheme::Purple);
    }

    #[test]
    fn test_enums_use_lowercase_wire_values() {
        let json = serde_json::json!({
            "topic": "Linear regression basics",
            "audience_level": "college",
            "presentation_style": "technical",
            "language": "bilingual",
            "color_theme": "green"
        });
        let request: GenerationRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.audience_level, AudienceLevel::College);
        assert_eq!(request.presentation_style, PresentationStyle::Technical);
        assert_eq!(request.language, Language::Bilingual);
        assert_eq!(request.color_theme, ColorTheme::Green);
    }
}
