//! Content generation — the first pipeline stage.
//!
//! `ContentGenerator` is a trait so the orchestrator can be exercised with
//! mock generators in tests; the production impl drives the LLM client and
//! normalizes whatever comes back. The caller (deck::pipeline) substitutes
//! `template_slides` when this stage errors — content generation failures
//! must never abort a deck.

pub mod prompts;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::request::GenerationRequest;
use crate::models::slide::{SlideContent, SlideType};

use prompts::{build_generation_prompt, GENERATION_SYSTEM};

/// Produces the ordered slide sequence for a request.
///
/// Implementations must return exactly `request.num_slides` slides; use
/// `finalize_slides` to enforce the count on model output.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<SlideContent>, AppError>;
}

/// Envelope shape the generation prompt asks the model to return.
#[derive(Debug, Deserialize)]
struct SlideEnvelope {
    #[serde(default)]
    slides: Vec<SlideContent>,
}

/// LLM-backed content generator.
pub struct LlmContentGenerator {
    llm: LlmClient,
}

impl LlmContentGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ContentGenerator for LlmContentGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<SlideContent>, AppError> {
        let prompt = build_generation_prompt(request);

        let envelope: SlideEnvelope = self
            .llm
            .call_json(&prompt, GENERATION_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Slide generation call failed: {e}")))?;

        if envelope.slides.is_empty() {
            return Err(AppError::Llm(
                "Slide generation returned an empty slide list".to_string(),
            ));
        }

        Ok(finalize_slides(envelope.slides, request))
    }
}

/// Post-processes parsed model output into a sequence the rest of the
/// pipeline can rely on:
/// - empty titles fall back to the topic
/// - a missing image query falls back to the topic
/// - speaker notes are dropped unless the request asked for them
/// - the slide count is forced to exactly `request.num_slides`
pub fn finalize_slides(
    mut slides: Vec<SlideContent>,
    request: &GenerationRequest,
) -> Vec<SlideContent> {
    for slide in &mut slides {
        if slide.title.trim().is_empty() {
            slide.title = request.topic.clone();
        }
        if slide
            .image_query
            .as_deref()
            .map(str::trim)
            .unwrap_or("")
            .is_empty()
        {
            slide.image_query = Some(request.topic.clone());
        }
        if !request.speaker_notes {
            slide.speaker_notes = None;
        }
    }

    let requested = request.num_slides as usize;
    if slides.len() > requested {
        warn!(
            "Content stage returned {} slides for a {}-slide request; truncating",
            slides.len(),
            requested
        );
        slides.truncate(requested);
    } else if slides.len() < requested {
        warn!(
            "Content stage returned {} slides for a {}-slide request; padding",
            slides.len(),
            requested
        );
        let mut index = slides.len();
        while slides.len() < requested {
            slides.push(template_content_slide(&request.topic, index));
            index += 1;
        }
    }

    slides
}

/// Deterministic fallback deck used when content generation fails outright:
/// a title slide followed by generic numbered "Key Idea" slides.
pub fn template_slides(request: &GenerationRequest) -> Vec<SlideContent> {
    let mut slides = Vec::with_capacity(request.num_slides as usize);

    let mut title = SlideContent::new(SlideType::Title, request.topic.clone());
    title.image_query = Some(request.topic.clone());
    slides.push(title);

    for i in 1..request.num_slides as usize {
        slides.push(template_content_slide(&request.topic, i));
    }

    slides
}

fn template_content_slide(topic: &str, index: usize) -> SlideContent {
    let mut slide = SlideContent::new(SlideType::Content, format!("{topic} – Key Idea {index}"));
    slide.content = vec![
        format!("Important concept {index}"),
        format!("Explanation {index}"),
        format!("Example {index}"),
    ];
    slide.image_query = Some(topic.to_string());
    slide
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::request::{AudienceLevel, ColorTheme, Language, PresentationStyle};

    fn make_request(num_slides: u8, speaker_notes: bool) -> GenerationRequest {
        GenerationRequest {
            topic: "The water cycle".to_string(),
            audience_level: AudienceLevel::Middle,
            num_slides,
            presentation_style: PresentationStyle::Academic,
            language: Language::English,
            include_quiz: false,
            speaker_notes,
            color_theme: ColorTheme::Purple,
        }
    }

    fn make_slide(title: &str) -> SlideContent {
        let mut slide = SlideContent::new(SlideType::Content, title);
        slide.content = vec!["One point".to_string()];
        slide.speaker_notes = Some("notes".to_string());
        slide
    }

    #[test]
    fn test_envelope_parses_model_shaped_json() {
        let raw = r#"{
            "slides": [
                {
                    "type": "title",
                    "title": "The Water Cycle",
                    "subtitle": "From oceans to clouds",
                    "content": [],
                    "image_query": "water cycle diagram",
                    "speaker_notes": "Introduce the topic."
                },
                {
                    "type": "content",
                    "title": "Evaporation",
                    "content": "Water rises as vapor"
                }
            ]
        }"#;
        let envelope: SlideEnvelope = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.slides.len(), 2);
        assert_eq!(envelope.slides[0].slide_type, SlideType::Title);
        assert_eq!(envelope.slides[1].content, vec!["Water rises as vapor"]);
    }

    #[test]
    fn test_finalize_truncates_surplus_slides() {
        let slides: Vec<_> = (0..8).map(|i| make_slide(&format!("S{i}"))).collect();
        let out = finalize_slides(slides, &make_request(5, true));
        assert_eq!(out.len(), 5);
        assert_eq!(out[4].title, "S4");
    }

    #[test]
    fn test_finalize_pads_shortfall_with_template_slides() {
        let slides = vec![make_slide("Intro"), make_slide("Middle")];
        let out = finalize_slides(slides, &make_request(4, true));
        assert_eq!(out.len(), 4);
        assert!(out[2].title.contains("Key Idea 2"));
        assert!(out[3].title.contains("Key Idea 3"));
    }

    #[test]
    fn test_finalize_strips_notes_when_not_requested() {
        let out = finalize_slides(vec![make_slide("Intro")], &make_request(1, false));
        assert!(out[0].speaker_notes.is_none());
    }

    #[test]
    fn test_finalize_keeps_notes_when_requested() {
        let out = finalize_slides(vec![make_slide("Intro")], &make_request(1, true));
        assert_eq!(out[0].speaker_notes.as_deref(), Some("notes"));
    }

    #[test]
    fn test_finalize_defaults_blank_title_and_query_to_topic() {
        let mut slide = make_slide("  ");
        slide.image_query = Some("   ".to_string());
        let out = finalize_slides(vec![slide], &make_request(1, true));
        assert_eq!(out[0].title, "The water cycle");
        assert_eq!(out[0].image_query.as_deref(), Some("The water cycle"));
    }

    #[test]
    fn test_template_slides_shape() {
        let request = make_request(6, false);
        let slides = template_slides(&request);

        assert_eq!(slides.len(), 6);
        assert_eq!(slides[0].slide_type, SlideType::Title);
        assert!(slides[0].content.is_empty());

        for (i, slide) in slides.iter().enumerate().skip(1) {
            assert_eq!(slide.slide_type, SlideType::Content);
            assert_eq!(slide.title, format!("The water cycle – Key Idea {i}"));
            assert_eq!(slide.content.len(), 3);
        }
    }

    #[test]
    fn test_template_slides_minimum_count() {
        let slides = template_slides(&make_request(3, false));
        assert_eq!(slides.len(), 3);
    }
}
