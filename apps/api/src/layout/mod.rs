//! Layout engine — the third pipeline stage.
//!
//! Consumes the finished slide sequence read-only and produces the .pptx
//! package bytes. Image bytes come in through the `ImageFetcher` seam;
//! the CPU-bound XML/zip assembly runs inside `tokio::task::spawn_blocking`
//! so the async executor stays unblocked.

pub mod bullets;
pub mod geometry;
pub mod pptx;
pub mod theme;

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tracing::warn;

use crate::errors::AppError;
use crate::models::request::GenerationRequest;
use crate::models::slide::SlideContent;

use bullets::{prepare_bullets, BulletRules};
use geometry::text_band;
use pptx::{build_pptx, EmbeddedImage, RenderedSlide};
use theme::Theme;

/// Fetches raw image bytes for embedding.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Bytes, AppError>;
}

/// Production fetcher over HTTP with a hard per-image timeout.
#[derive(Clone)]
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(12))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

impl Default for HttpImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, AppError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Image download failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "Image download returned status {status}"
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| AppError::Upstream(format!("Image download body failed: {e}")))
    }
}

/// Deterministic document layout over a fixed widescreen canvas.
pub struct LayoutEngine {
    fetcher: Arc<dyn ImageFetcher>,
}

impl LayoutEngine {
    pub fn new(fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Renders the deck to .pptx bytes.
    ///
    /// Image failures (download, format, decode) blank that slide's image
    /// region and never abort the deck.
    pub async fn render(
        &self,
        request: &GenerationRequest,
        slides: &[SlideContent],
    ) -> Result<Vec<u8>, AppError> {
        let theme = Theme::for_style(request.presentation_style);
        let rules = BulletRules::for_language(request.language);

        let mut rendered = Vec::with_capacity(slides.len());
        for slide in slides {
            let image = match slide.image_url.as_deref() {
                Some(url) => self.fetch_embedded(url).await,
                None => None,
            };

            let bullets = prepare_bullets(slide, &request.topic, &rules);
            let band = text_band(slide.slide_type, !slide.content.is_empty(), bullets.len());

            let title = if slide.title.trim().is_empty() {
                request.topic.clone()
            } else {
                slide.title.clone()
            };

            rendered.push(RenderedSlide {
                title,
                bullets,
                band,
                image,
            });
        }

        let font_size = rules.font_size_pt;
        let bytes = tokio::task::spawn_blocking(move || build_pptx(&theme, font_size, &rendered))
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("spawn_blocking failed in pptx assembly: {e}"))
            })?
            .map_err(AppError::Internal)?;

        Ok(bytes)
    }

    async fn fetch_embedded(&self, url: &str) -> Option<EmbeddedImage> {
        let bytes = match self.fetcher.fetch(url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Image fetch failed for '{url}': {e}; leaving region blank");
                return None;
            }
        };

        match decode_image(&bytes) {
            Some(image) => Some(image),
            None => {
                warn!("Unsupported or undecodable image at '{url}'; leaving region blank");
                None
            }
        }
    }
}

/// Sniffs format and dimensions. Only PNG and JPEG are embeddable; anything
/// else is rejected so the package never carries media a viewer may refuse.
fn decode_image(bytes: &[u8]) -> Option<EmbeddedImage> {
    let format = image::guess_format(bytes).ok()?;

    let extension = match format {
        image::ImageFormat::Png => "png",
        image::ImageFormat::Jpeg => "jpg",
        _ => return None,
    };

    let (width_px, height_px) = image::ImageReader::with_format(Cursor::new(bytes), format)
        .into_dimensions()
        .ok()?;

    Some(EmbeddedImage {
        data: bytes.to_vec(),
        extension,
        width_px,
        height_px,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
