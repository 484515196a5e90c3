//! Diagram generation via an images-generation API.
//!
//! Optional collaborator — the selector works without it and the prompt is
//! tuned for flat, text-free educational figures that sit well next to a
//! bullet column.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::images::DiagramGenerator;
use crate::models::slide::SlideType;

const IMAGES_API_URL: &str = "https://api.openai.com/v1/images/generations";
const IMAGE_SIZE: &str = "1024x1024";

/// Builds the diagram prompt for a slide, with a composition hint per
/// slide type.
pub fn build_diagram_prompt(topic: &str, slide_title: &str, slide_type: SlideType) -> String {
    let base = if !topic.trim().is_empty() {
        topic.trim()
    } else if !slide_title.trim().is_empty() {
        slide_title.trim()
    } else {
        "educational concept"
    };

    let type_hint = match slide_type {
        SlideType::Title => "overview concept illustration",
        SlideType::Summary => "summary infographic with simple visual metaphor",
        SlideType::Quiz => "clean quiz iconography without text",
        SlideType::Content | SlideType::ImageHeavy => "process or relationship diagram",
    };

    format!(
        "Flat, clean educational diagram about '{base}'. \
         Show the key idea visually, with arrows or simple shapes. \
         No human faces, no classroom photos. \
         White or light background, high contrast, suitable for a PowerPoint slide. \
         Style: minimal, vector-like illustration. {type_hint}."
    )
}

/// Diagram client for OpenAI-compatible image generation endpoints.
#[derive(Clone)]
pub struct OpenAiImageClient {
    client: Client,
    api_key: String,
    model: String,
}

impl OpenAiImageClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            model,
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    n: u8,
}

#[derive(Debug, Deserialize)]
struct GenerateImageResponse {
    #[serde(default)]
    data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    #[serde(default)]
    url: Option<String>,
}

#[async_trait]
impl DiagramGenerator for OpenAiImageClient {
    async fn generate(&self, prompt: &str) -> Result<String, AppError> {
        let request = GenerateImageRequest {
            model: &self.model,
            prompt,
            size: IMAGE_SIZE,
            n: 1,
        };

        let response = self
            .client
            .post(IMAGES_API_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Image generation request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Image generation returned status {status}: {body}"
            )));
        }

        let body: GenerateImageResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Image generation parse failed: {e}")))?;

        body.data
            .into_iter()
            .find_map(|item| item.url)
            .ok_or_else(|| {
                AppError::Upstream("Image generation returned no image URL".to_string())
            })
    }
}
