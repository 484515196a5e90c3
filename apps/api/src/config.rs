use anyhow::{Context, Result};

use crate::images::ImageStrategy;

/// The sample value shipped in `.env.example` — treated the same as an
/// unset key so a copied template never sends authorized requests.
const PEXELS_PLACEHOLDER_KEY: &str = "your_pexels_api_key_here";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    /// Pexels key for photo search. `None` disables the photo source and
    /// the selector degrades to diagrams/placeholders.
    pub pexels_api_key: Option<String>,
    /// Key for the diagram-generation API. `None` disables diagrams.
    pub image_api_key: Option<String>,
    pub image_model: String,
    pub image_strategy: ImageStrategy,
    /// Directory where finished .pptx artifacts are persisted.
    pub artifacts_dir: String,
    pub environment: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let pexels_api_key = optional_env("PEXELS_API_KEY")
            .filter(|key| key != PEXELS_PLACEHOLDER_KEY);

        let image_strategy = optional_env("IMAGE_STRATEGY")
            .map(|raw| ImageStrategy::parse(&raw))
            .unwrap_or_default();

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            pexels_api_key,
            image_api_key: optional_env("OPENAI_IMAGE_API_KEY"),
            image_model: optional_env("OPENAI_IMAGE_MODEL")
                .unwrap_or_else(|| "gpt-image-1".to_string()),
            image_strategy,
            artifacts_dir: optional_env("ARTIFACTS_DIR")
                .unwrap_or_else(|| "generated_decks".to_string()),
            environment: optional_env("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}
