//! Axum route handlers for the Letters API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::letters::generator::generate_letter;
use crate::letters::institutions::{InstitutionProfile, INSTITUTIONS};
use crate::models::certificate::CertificateFields;
use crate::models::letter::GeneratedLetter;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateLetterRequest {
    pub fields: CertificateFields,
    pub institution: String,
}

/// GET /api/v1/institutions
pub async fn handle_list_institutions() -> Json<&'static [InstitutionProfile]> {
    Json(&INSTITUTIONS[..])
}

/// POST /api/v1/letters
///
/// Unknown institutions are not rejected; they get the Bank/Financial profile.
pub async fn handle_generate_letter(
    State(state): State<AppState>,
    Json(request): Json<GenerateLetterRequest>,
) -> Result<Json<GeneratedLetter>, AppError> {
    let letter = generate_letter(state.llm.as_ref(), &request.fields, &request.institution).await?;
    Ok(Json(letter))
}
