mod config;
mod content;
mod deck;
mod errors;
mod images;
mod layout;
mod llm_client;
mod models;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::content::LlmContentGenerator;
use crate::images::diagram::OpenAiImageClient;
use crate::images::pexels::PexelsClient;
use crate::images::{DiagramGenerator, ImageSelector, PhotoSearch};
use crate::layout::{HttpImageFetcher, LayoutEngine};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::ArtifactStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting EduDeck API v{}", env!("CARGO_PKG_VERSION"));

    // Content generator (LLM-backed)
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);
    let content = Arc::new(LlmContentGenerator::new(llm));

    // Image sources — both optional; the selector degrades to placeholders
    let photos: Option<Arc<dyn PhotoSearch>> = config
        .pexels_api_key
        .clone()
        .map(|key| Arc::new(PexelsClient::new(key)) as Arc<dyn PhotoSearch>);
    info!(
        "Photo search: {}",
        if photos.is_some() { "configured" } else { "disabled" }
    );

    let diagrams: Option<Arc<dyn DiagramGenerator>> = config.image_api_key.clone().map(|key| {
        Arc::new(OpenAiImageClient::new(key, config.image_model.clone()))
            as Arc<dyn DiagramGenerator>
    });
    info!(
        "Diagram generation: {} (strategy: {:?})",
        if diagrams.is_some() { "configured" } else { "disabled" },
        config.image_strategy
    );

    let selector = Arc::new(ImageSelector::new(config.image_strategy, photos, diagrams));

    // Layout engine + artifact store
    let layout = Arc::new(LayoutEngine::new(Arc::new(HttpImageFetcher::new())));
    let store = Arc::new(ArtifactStore::new(&config.artifacts_dir)?);

    // Build app state
    let state = AppState {
        config: config.clone(),
        content,
        selector,
        layout,
        store,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
