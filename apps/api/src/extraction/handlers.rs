//! Axum route handlers for the Extraction API.

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::errors::AppError;
use crate::extraction::extractor::extract;
use crate::extraction::upload::read_image_upload;
use crate::models::certificate::ExtractedRecord;
use crate::state::AppState;

/// POST /api/v1/extract
///
/// Multipart body with a `file` part (PNG or JPEG). Returns the normalized record.
pub async fn handle_extract(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractedRecord>, AppError> {
    let image = read_image_upload(multipart).await?;
    let record = extract(state.llm.as_ref(), &image.bytes, image.mime_type).await?;
    Ok(Json(record))
}
