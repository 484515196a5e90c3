//! Pexels-backed photo search.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::AppError;
use crate::images::ranking::{PhotoCandidate, PhotoVariants};
use crate::images::PhotoSearch;

const PEXELS_SEARCH_URL: &str = "https://api.pexels.com/v1/search";

/// Stock-photo search client over the Pexels REST API.
#[derive(Clone)]
pub struct PexelsClient {
    client: Client,
    api_key: String,
}

impl PexelsClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    photos: Vec<PexelsPhoto>,
}

#[derive(Debug, Deserialize)]
struct PexelsPhoto {
    #[serde(default)]
    alt: Option<String>,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    src: PhotoVariants,
}

#[async_trait]
impl PhotoSearch for PexelsClient {
    async fn search(
        &self,
        query: &str,
        orientation: &str,
        per_page: u8,
    ) -> Result<Vec<PhotoCandidate>, AppError> {
        let response = self
            .client
            .get(PEXELS_SEARCH_URL)
            .header("Authorization", &self.api_key)
            .query(&[
                ("query", query),
                ("orientation", orientation),
                ("per_page", &per_page.to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Pexels request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "Pexels returned status {status} for query '{query}'"
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Pexels response parse failed: {e}")))?;

        Ok(body
            .photos
            .into_iter()
            .map(|p| PhotoCandidate {
                description: p.alt.unwrap_or_default(),
                src: p.src,
                width: p.width,
                height: p.height,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_parses_pexels_shape() {
        let raw = r#"{
            "page": 1,
            "per_page": 2,
            "photos": [
                {
                    "id": 12345,
                    "width": 1600,
                    "height": 900,
                    "alt": "heart anatomy diagram",
                    "src": {
                        "original": "https://images.pexels.com/1/original.jpg",
                        "large": "https://images.pexels.com/1/large.jpg",
                        "medium": "https://images.pexels.com/1/medium.jpg"
                    }
                },
                {
                    "id": 67890,
                    "width": 800,
                    "height": 1200,
                    "alt": null,
                    "src": {}
                }
            ]
        }"#;

        let parsed: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.photos.len(), 2);
        assert_eq!(parsed.photos[0].alt.as_deref(), Some("heart anatomy diagram"));
        assert_eq!(
            parsed.photos[0].src.large.as_deref(),
            Some("https://images.pexels.com/1/large.jpg")
        );
        assert!(parsed.photos[1].alt.is_none());
        assert!(parsed.photos[1].src.large.is_none());
    }

    #[test]
    fn test_empty_photos_list_parses() {
        let parsed: SearchResponse = serde_json::from_str(r#"{"photos": []}"#).unwrap();
        assert!(parsed.photos.is_empty());
        let parsed: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.photos.is_empty());
    }
}
