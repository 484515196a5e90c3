//! Prompt templates for slide-content generation.

use crate::models::request::{AudienceLevel, GenerationRequest, PresentationStyle};

pub const GENERATION_SYSTEM: &str = "You are an expert teacher and presentation designer. \
You create clear, structured, engaging slide decks for students.";

/// Filled by `build_generation_prompt`. The JSON example is part of the
/// template, so placeholders are substituted with `replace`, not `format!`.
const GENERATION_PROMPT_TEMPLATE: &str = r#"You are an expert educator who designs high-quality presentation slides.

TASK:
Generate EXACTLY {num_slides} slides about: "{topic}"

REQUIREMENTS:
- Write all content in {language}.
- Each slide must have 4-6 rich bullet points (not short phrases).
- Bullets must be explanatory, clear, and teaching-oriented.
- Every slide must include one relevant short English "image_query".
- Speaker notes must be 2-3 sentences if requested.

SLIDE STRUCTURE:
1. TITLE slide
2. Overview / introduction
3. Core concept slides
4. Real-world examples / applications
5. {quiz_line}
6. Summary slide

ALLOWED SLIDE TYPES:
"title", "content", "summary", "quiz", "image_heavy"

FORMAT (VERY IMPORTANT):
Return ONLY this JSON (no markdown fences):

{
  "slides": [
    {
      "type": "content",
      "title": "...",
      "subtitle": null,
      "content": ["bullet 1", "bullet 2", "bullet 3", "bullet 4"],
      "image_query": "educational photo of ...",
      "speaker_notes": "2-3 sentence explanation."
    }
  ]
}

Make the content deeply informative, well-structured, and {style_desc}, age-appropriate for {audience_desc}."#;

fn audience_description(level: AudienceLevel) -> &'static str {
    match level {
        AudienceLevel::Elementary => "children studying in grades 1-5",
        AudienceLevel::Middle => "students in grades 6-8",
        AudienceLevel::High => "class 9-12 students",
        AudienceLevel::College => "undergraduate learners",
        AudienceLevel::Professional => "industry professionals",
    }
}

fn style_description(style: PresentationStyle) -> &'static str {
    match style {
        PresentationStyle::Academic => "structured, clear, textbook-oriented",
        PresentationStyle::Storytelling => "narrative with relatable scenarios and examples",
        PresentationStyle::Interactive => "engaging, question-based, activity-driven",
        PresentationStyle::Technical => "precise, systematic, process-focused",
        PresentationStyle::Visual => "minimal text, diagram-friendly, visual-oriented",
    }
}

pub fn build_generation_prompt(request: &GenerationRequest) -> String {
    let quiz_line = if request.include_quiz {
        "Quiz slide"
    } else {
        "Optional quiz slide only if meaningful"
    };

    let language = serde_json::to_value(request.language)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| "english".to_string());

    GENERATION_PROMPT_TEMPLATE
        .replace("{num_slides}", &request.num_slides.to_string())
        .replace("{topic}", &request.topic)
        .replace("{language}", &language)
        .replace("{quiz_line}", quiz_line)
        .replace("{style_desc}", style_description(request.presentation_style))
        .replace("{audience_desc}", audience_description(request.audience_level))
}
