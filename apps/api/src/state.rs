use std::sync::Arc;

use crate::config::Config;
use crate::content::ContentGenerator;
use crate::images::ImageSelector;
use crate::layout::LayoutEngine;
use crate::store::ArtifactStore;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// One long-lived instance per collaborator, constructed at startup and
/// injected — no hidden module-level mutable state anywhere in the pipeline.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Content generator seam. Production: `LlmContentGenerator`.
    pub content: Arc<dyn ContentGenerator>,
    pub selector: Arc<ImageSelector>,
    pub layout: Arc<LayoutEngine>,
    pub store: Arc<ArtifactStore>,
}
