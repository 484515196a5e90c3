//! Deck generation pipeline.
//!
//! Flow: validate → content generation (template fallback) → sequential
//! per-slide image selection → layout/serialization → artifact store.
//!
//! Once validation passes, only an artifact-write failure can abort the run;
//! every upstream failure degrades to a deterministic fallback so a deck is
//! always produced.

use std::time::Instant;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::content::{template_slides, ContentGenerator};
use crate::errors::AppError;
use crate::images::{ImageSelector, UsedImageSet};
use crate::layout::LayoutEngine;
use crate::models::request::GenerationRequest;
use crate::models::slide::Deck;
use crate::store::ArtifactStore;

/// Presentation ids: `pres_` + the first 12 hex digits of a v4 UUID.
pub fn new_presentation_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("pres_{}", &hex[..12])
}

/// Runs one full generation and persists the resulting package.
pub async fn generate_deck(
    content: &dyn ContentGenerator,
    selector: &ImageSelector,
    layout: &LayoutEngine,
    store: &ArtifactStore,
    request: GenerationRequest,
) -> Result<Deck, AppError> {
    request.validate().map_err(AppError::Validation)?;

    let started = Instant::now();

    // Step 1: slide content. Upstream failure substitutes the template deck.
    let mut slides = match content.generate(&request).await {
        Ok(slides) => slides,
        Err(e) => {
            warn!("Content generation failed ({e}); using template fallback deck");
            template_slides(&request)
        }
    };
    info!(
        "Content stage produced {} slides for topic '{}'",
        slides.len(),
        request.topic
    );

    // Step 2: image selection, strictly sequential — later picks depend on
    // the used set grown by earlier picks, and the index-based choice must
    // stay reproducible.
    let mut used = UsedImageSet::new();
    for (index, slide) in slides.iter_mut().enumerate() {
        let url = selector
            .select_for_slide(
                &request.topic,
                slide,
                index,
                request.language,
                request.presentation_style,
                &mut used,
            )
            .await;
        slide.image_url = Some(url);
    }
    info!("Image stage attached {} distinct references", used.len());

    // Step 3: layout + serialization.
    let presentation_id = new_presentation_id();
    let bytes = layout.render(&request, &slides).await?;

    // Step 4: persist. A write failure here is fatal for the run.
    store.put(&presentation_id, &bytes)?;

    let generation_time = started.elapsed().as_secs_f64();
    let total_slides = slides.len();
    info!("Generated deck {presentation_id} ({total_slides} slides) in {generation_time:.2}s");

    Ok(Deck {
        presentation_id,
        metadata: request,
        slides,
        total_slides,
        created_at: Utc::now(),
        generation_time,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
