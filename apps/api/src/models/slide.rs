//! Slide and deck models shared across the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::request::GenerationRequest;

/// The slide archetypes the content generator may emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideType {
    Title,
    Content,
    Quiz,
    Summary,
    ImageHeavy,
}

/// Unknown or mis-cased type strings from the LLM fall back to `Content`
/// rather than failing the whole response.
impl<'de> Deserialize<'de> for SlideType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.to_ascii_lowercase().as_str() {
            "title" => SlideType::Title,
            "quiz" => SlideType::Quiz,
            "summary" => SlideType::Summary,
            "image_heavy" => SlideType::ImageHeavy,
            _ => SlideType::Content,
        })
    }
}

/// One slide as produced by the content generator.
///
/// `image_url` starts empty and is written exactly once by the image
/// selector; the layout engine reads the finished record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideContent {
    #[serde(rename = "type")]
    pub slide_type: SlideType,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    /// Bullet texts. The LLM sometimes returns a single string instead of a
    /// list; both shapes normalize to a sequence here.
    #[serde(default, deserialize_with = "string_or_seq")]
    pub content: Vec<String>,
    #[serde(default)]
    pub image_query: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub speaker_notes: Option<String>,
    #[serde(default = "default_layout")]
    pub layout: String,
}

fn default_layout() -> String {
    "default".to_string()
}

fn string_or_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrSeq {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<StringOrSeq>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(StringOrSeq::One(s)) => vec![s],
        Some(StringOrSeq::Many(items)) => items,
    })
}

impl SlideContent {
    /// A bare slide of the given type with no bullets attached yet.
    pub fn new(slide_type: SlideType, title: impl Into<String>) -> Self {
        Self {
            slide_type,
            title: title.into(),
            subtitle: None,
            content: Vec::new(),
            image_query: None,
            image_url: None,
            speaker_notes: None,
            layout: default_layout(),
        }
    }
}

/// The finished artifact metadata returned by one generation run.
///
/// Invariant: `total_slides == slides.len()` and both equal the requested
/// slide count — the content stage pads or truncates before images/layout run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    pub presentation_id: String,
    pub metadata: GenerationRequest,
    pub slides: Vec<SlideContent>,
    pub total_slides: usize,
    pub created_at: DateTime<Utc>,
    /// Wall-clock generation duration in seconds.
    pub generation_time: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_accepts_list() {
        let slide: SlideContent = serde_json::from_str(
            r#"{"type": "content", "title": "Roots", "content": ["a", "b"]}"#,
        )
        .unwrap();
        assert_eq!(slide.content, vec!["a", "b"]);
    }

    #[test]
    fn test_content_accepts_bare_string() {
        let slide: SlideContent =
            serde_json::from_str(r#"{"type": "content", "title": "Roots", "content": "just one"}"#)
                .unwrap();
        assert_eq!(slide.content, vec!["just one"]);
    }

    #[test]
    fn test_content_null_or_missing_becomes_empty() {
        let missing: SlideContent =
            serde_json::from_str(r#"{"type": "title", "title": "Roots"}"#).unwrap();
        assert!(missing.content.is_empty());

        let null: SlideContent =
            serde_json::from_str(r#"{"type": "title", "title": "Roots", "content": null}"#)
                .unwrap();
        assert!(null.content.is_empty());
    }

    #[test]
    fn test_unknown_slide_type_falls_back_to_content() {
        let slide: SlideContent =
            serde_json::from_str(r#"{"type": "interpretive_dance", "title": "Roots"}"#).unwrap();
        assert_eq!(slide.slide_type, SlideType::Content);
    }

    #[test]
    fn test_image_heavy_uses_snake_case() {
        let slide: SlideContent =
            serde_json::from_str(r#"{"type": "image_heavy", "title": "Roots"}"#).unwrap();
        assert_eq!(slide.slide_type, SlideType::ImageHeavy);
        assert_eq!(
            serde_json::to_value(slide.slide_type).unwrap(),
            serde_json::json!("image_heavy")
        );
    }

    #[test]
    fn test_layout_defaults_to_default_tag() {
        let slide: SlideContent =
            serde_json::from_str(r#"{"type": "summary", "title": "Wrap up"}"#).unwrap();
        assert_eq!(slide.layout, "default");
    }
}
