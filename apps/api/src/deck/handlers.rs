//! Axum route handlers for the Deck API.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::deck::pipeline::generate_deck;
use crate::errors::AppError;
use crate::models::request::GenerationRequest;
use crate::models::slide::Deck;
use crate::state::AppState;
use crate::store::{ArtifactStore, PPTX_CONTENT_TYPE};

/// POST /api/v1/generate
///
/// Full generation pipeline: content → images → layout → stored artifact.
/// Returns the deck metadata with 201; the binary is fetched separately
/// via the download endpoint.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerationRequest>,
) -> Result<(StatusCode, Json<Deck>), AppError> {
    let deck = generate_deck(
        state.content.as_ref(),
        &state.selector,
        &state.layout,
        &state.store,
        request,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(deck)))
}

/// GET /api/v1/download/:presentation_id
///
/// Streams the stored .pptx back with the presentation MIME type.
/// 404 when the id has no stored artifact.
pub async fn handle_download(
    State(state): State<AppState>,
    Path(presentation_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = state.store.get(&presentation_id)?;
    let filename = ArtifactStore::filename(&presentation_id);

    Ok((
        [
            (header::CONTENT_TYPE, PPTX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}
