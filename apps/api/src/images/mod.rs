//! Hybrid image selection — the second pipeline stage.
//!
//! Per slide, an ordered strategy chain is evaluated with early accept:
//! 1. generated diagram, when the slide needs one and a generator is wired
//! 2. ranked photo search
//! 3. generated diagram as a late fallback, when step 1 was skipped
//! 4. deterministic placeholder derived from a hash of the query text
//!
//! Every collaborator failure is caught here and degrades to the next step;
//! a slide always ends up with at least the placeholder reference.

pub mod diagram;
pub mod pexels;
pub mod query;
pub mod ranking;

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::models::request::{Language, PresentationStyle};
use crate::models::slide::SlideContent;

use diagram::build_diagram_prompt;
use query::{compose_query, extract_primary_keyword};
use ranking::{pick_best, PhotoCandidate};

// ────────────────────────────────────────────────────────────────────────────
// Collaborator seams
// ────────────────────────────────────────────────────────────────────────────

/// Stock-photo search collaborator.
#[async_trait]
pub trait PhotoSearch: Send + Sync {
    async fn search(
        &self,
        query: &str,
        orientation: &str,
        per_page: u8,
    ) -> Result<Vec<PhotoCandidate>, AppError>;
}

/// Optional diagram-generation collaborator.
#[async_trait]
pub trait DiagramGenerator: Send + Sync {
    /// Returns a single image reference for the prompt.
    async fn generate(&self, prompt: &str) -> Result<String, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Strategy mode & used-image tracking
// ────────────────────────────────────────────────────────────────────────────

/// Which image sources the selector may engage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageStrategy {
    #[default]
    Hybrid,
    PhotoOnly,
    DiagramOnly,
}

impl ImageStrategy {
    /// Parses the `IMAGE_STRATEGY` env value; unknown values keep hybrid.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "hybrid" => ImageStrategy::Hybrid,
            "photo" | "photos" | "pexels" => ImageStrategy::PhotoOnly,
            "diagram" | "diagrams" | "openai" => ImageStrategy::DiagramOnly,
            other => {
                warn!("Unknown IMAGE_STRATEGY '{other}', defaulting to hybrid");
                ImageStrategy::Hybrid
            }
        }
    }

    fn allows_photos(self) -> bool {
        matches!(self, ImageStrategy::Hybrid | ImageStrategy::PhotoOnly)
    }

    fn allows_diagrams(self) -> bool {
        matches!(self, ImageStrategy::Hybrid | ImageStrategy::DiagramOnly)
    }
}

/// Image references already handed out during one generation run.
/// Scoped to a single deck; grows monotonically, never shared across decks.
#[derive(Debug, Default)]
pub struct UsedImageSet(HashSet<String>);

impl UsedImageSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>) {
        self.0.insert(url.into());
    }

    pub fn contains(&self, url: &str) -> bool {
        self.0.contains(url)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Diagram-needed decision
// ────────────────────────────────────────────────────────────────────────────

/// Topic/title fragments that mark a slide as diagram-heavy: STEM, anatomy
/// and CS vocabulary where a clean generated figure beats stock photos.
/// Substring match, so "operating system" topics hit via "os" too.
const DIAGRAM_TOPIC_TERMS: &[&str] = &[
    "regression",
    "linear regression",
    "logistic regression",
    "machine learning",
    "neural network",
    "algorithm",
    "data structure",
    "statistics",
    "probability",
    "graph theory",
    "function",
    "equation",
    "calculus",
    "derivative",
    "integral",
    "matrix",
    "vector",
    "physics",
    "chemistry",
    "digestive",
    "stomach",
    "intestine",
    "esophagus",
    "heart",
    "circulatory",
    "respiratory",
    "lungs",
    "brain",
    "nervous system",
    "kidney",
    "liver",
    "orbit",
    "solar system",
    "circuit",
    "transistor",
    "os",
    "operating system",
    "computer architecture",
];

/// True when the slide's subject calls for a diagram-style image.
pub fn needs_diagram(topic: &str, title: &str, style: PresentationStyle) -> bool {
    let text = format!("{topic} {title}").to_lowercase();

    if DIAGRAM_TOPIC_TERMS.iter().any(|term| text.contains(term)) {
        return true;
    }

    matches!(style, PresentationStyle::Technical)
}

// ────────────────────────────────────────────────────────────────────────────
// Placeholder reference
// ────────────────────────────────────────────────────────────────────────────

/// Deterministic but varied placeholder reference: a pure function of the
/// normalized query text, so identical queries reproduce the same image.
pub fn placeholder_reference(query: &str) -> String {
    let base = query.trim().to_lowercase();
    let base = if base.is_empty() { "lesson".to_string() } else { base };

    let digest = Sha256::digest(base.as_bytes());
    let mut hex = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        hex.push_str(&format!("{byte:02x}"));
    }

    format!("https://picsum.photos/seed/{base}-{hex}/1600/900")
}

// ────────────────────────────────────────────────────────────────────────────
// Selector
// ────────────────────────────────────────────────────────────────────────────

/// Per-slide image selection over the configured sources.
///
/// One long-lived instance is constructed at startup and injected into the
/// pipeline; all state that varies per deck travels in the `UsedImageSet`.
pub struct ImageSelector {
    strategy: ImageStrategy,
    photos: Option<Arc<dyn PhotoSearch>>,
    diagrams: Option<Arc<dyn DiagramGenerator>>,
}

impl ImageSelector {
    pub fn new(
        strategy: ImageStrategy,
        photos: Option<Arc<dyn PhotoSearch>>,
        diagrams: Option<Arc<dyn DiagramGenerator>>,
    ) -> Self {
        Self {
            strategy,
            photos,
            diagrams,
        }
    }

    pub fn photo_search_configured(&self) -> bool {
        self.photos.is_some()
    }

    pub fn diagram_generator_configured(&self) -> bool {
        self.diagrams.is_some()
    }

    /// Picks one image reference for the slide. Total: the placeholder step
    /// guarantees a reference even when every collaborator fails. The
    /// accepted reference is recorded in `used` before returning.
    pub async fn select_for_slide(
        &self,
        topic: &str,
        slide: &SlideContent,
        slide_index: usize,
        language: Language,
        style: PresentationStyle,
        used: &mut UsedImageSet,
    ) -> String {
        let topic_text = topic.trim();
        let title = slide.title.trim();
        let wants_diagram = needs_diagram(topic_text, title, style);

        debug!(
            slide_index,
            ?language,
            wants_diagram,
            "selecting image for slide '{title}'"
        );

        // Step 1: generated diagram when the subject needs one.
        if wants_diagram && self.strategy.allows_diagrams() {
            if let Some(url) = self.try_diagram(topic_text, title, slide, used).await {
                used.insert(url.clone());
                return url;
            }
        }

        // Step 2: ranked photo search.
        let query = compose_query(topic_text, title, slide.image_query.as_deref());
        if self.strategy.allows_photos() {
            if let Some(url) = self.try_photos(&query, slide_index, used).await {
                used.insert(url.clone());
                return url;
            }
        }

        // Step 3: late diagram fallback, only when step 1 was skipped.
        if !wants_diagram && self.strategy.allows_diagrams() {
            if let Some(url) = self.try_diagram(topic_text, title, slide, used).await {
                used.insert(url.clone());
                return url;
            }
        }

        // Step 4: deterministic placeholder.
        let seed = if !topic_text.is_empty() {
            topic_text
        } else if !title.is_empty() {
            title
        } else {
            "education"
        };
        let url = placeholder_reference(seed);
        used.insert(url.clone());
        url
    }

    /// Explicit bare-query search entry point for ad hoc lookups.
    /// Runs the same search/rank path as per-slide selection, without
    /// repetition tracking.
    pub async fn search_photo(&self, query: &str) -> Option<String> {
        let photos = self.photos.as_ref()?;

        match photos.search(query, "landscape", 10).await {
            Ok(candidates) => pick_best(
                &candidates,
                extract_primary_keyword(query).as_deref(),
                &UsedImageSet::new(),
                0,
            ),
            Err(e) => {
                warn!("Photo search failed for query '{query}': {e}");
                None
            }
        }
    }

    async fn try_diagram(
        &self,
        topic: &str,
        title: &str,
        slide: &SlideContent,
        used: &UsedImageSet,
    ) -> Option<String> {
        let diagrams = self.diagrams.as_ref()?;
        let prompt = build_diagram_prompt(topic, title, slide.slide_type);

        match diagrams.generate(&prompt).await {
            Ok(url) if !used.contains(&url) => Some(url),
            Ok(url) => {
                debug!("Generated diagram already used in this deck: {url}");
                None
            }
            Err(e) => {
                warn!("Diagram generation failed: {e}");
                None
            }
        }
    }

    async fn try_photos(
        &self,
        query: &str,
        slide_index: usize,
        used: &UsedImageSet,
    ) -> Option<String> {
        let photos = self.photos.as_ref()?;

        match photos.search(query, "landscape", 20).await {
            Ok(candidates) => {
                let primary = extract_primary_keyword(query);
                pick_best(&candidates, primary.as_deref(), used, slide_index)
            }
            Err(e) => {
                warn!("Photo search failed for query '{query}': {e}");
                None
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
