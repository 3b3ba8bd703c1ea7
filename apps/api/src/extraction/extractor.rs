//! Certificate extractor: sends the image to the vision model and normalizes the reply
//! onto the fixed field taxonomy.

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::extraction::prompts::{
    EXTRACTION_MAX_TOKENS, EXTRACTION_PROMPT, EXTRACTION_TEMPERATURE,
};
use crate::llm_client::{
    strip_json_fences, CompletionRequest, CompletionService, ImageAttachment, LlmError,
};
use crate::models::certificate::{CertificateFields, ConfidenceScores, ExtractedRecord};

/// MIME types the extractor accepts.
pub const SUPPORTED_MIME_TYPES: &[&str] = &["image/png", "image/jpeg"];

const UNKNOWN_STATE: &str = "Unknown";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported image: {0}")]
    UnsupportedImage(String),

    #[error("Failed to parse model response as JSON: {0}")]
    MalformedResponse(String),

    #[error("{0}")]
    Service(#[from] LlmError),
}

impl ExtractionError {
    /// Error taxonomy tag shown to API clients.
    pub fn tag(&self) -> &'static str {
        match self {
            ExtractionError::UnsupportedImage(_) => "UnsupportedImage",
            ExtractionError::MalformedResponse(_) => "MalformedResponse",
            ExtractionError::Service(_) => "ServiceError",
        }
    }
}

/// Reads a certificate image with the hosted vision model.
///
/// Exactly one model call per invocation, none if the input is rejected up front.
pub async fn extract(
    llm: &dyn CompletionService,
    image_bytes: &[u8],
    mime_type: &str,
) -> Result<ExtractedRecord, ExtractionError> {
    if image_bytes.is_empty() {
        return Err(ExtractionError::UnsupportedImage(
            "image is empty".to_string(),
        ));
    }
    if !SUPPORTED_MIME_TYPES.contains(&mime_type) {
        return Err(ExtractionError::UnsupportedImage(format!(
            "'{mime_type}' is not one of {}",
            SUPPORTED_MIME_TYPES.join(", ")
        )));
    }

    info!(
        "Extracting certificate fields ({} bytes, {mime_type})",
        image_bytes.len()
    );

    let reply = llm
        .complete(CompletionRequest {
            prompt: EXTRACTION_PROMPT,
            image: Some(ImageAttachment {
                bytes: image_bytes,
                mime_type,
            }),
            max_tokens: EXTRACTION_MAX_TOKENS,
            temperature: EXTRACTION_TEMPERATURE,
        })
        .await
        .map_err(|e| {
            warn!("Extraction call failed: {e}");
            ExtractionError::Service(e)
        })?;

    let record = parse_extraction_reply(&reply)?;
    info!("Extraction complete: state_detected={}", record.state_detected);
    Ok(record)
}

/// Parses the model's reply into an `ExtractedRecord`.
///
/// Code fences are stripped first. Keys outside the taxonomy are ignored and
/// missing ones are defaulted, so a partial reply still yields a complete record.
pub fn parse_extraction_reply(reply: &str) -> Result<ExtractedRecord, ExtractionError> {
    let value: Value = serde_json::from_str(strip_json_fences(reply)).map_err(|e| {
        warn!("Extraction reply is not valid JSON: {e}");
        ExtractionError::MalformedResponse(e.to_string())
    })?;

    let object = value.as_object().ok_or_else(|| {
        ExtractionError::MalformedResponse(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        ))
    })?;

    let empty = serde_json::Map::new();
    let fields = object
        .get("fields")
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    let confidence = object
        .get("confidence")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let state_detected = object
        .get("state_detected")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(UNKNOWN_STATE)
        .to_string();

    let format_notes = object
        .get("format_notes")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(ExtractedRecord {
        state_detected,
        fields: CertificateFields::from_json_map(fields),
        confidence: ConfidenceScores::from_json_map(confidence),
        format_notes,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
