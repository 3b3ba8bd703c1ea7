use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::extractor::ExtractionError;
use crate::extraction::upload::UploadError;
use crate::letters::generator::GenerationError;

/// A workflow failure message together with its taxonomy tag
/// (`UnsupportedImage`, `MalformedResponse` or `ServiceError`).
#[derive(Debug, Error)]
#[error("{message}")]
pub struct Tagged {
    pub kind: &'static str,
    pub message: String,
}

/// Application-level error type for the JSON API.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Model failures carry the service's own message; nothing is masked.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    UnsupportedImage(Tagged),

    #[error("{0}")]
    MalformedResponse(Tagged),

    #[error("{0}")]
    Service(Tagged),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, kind, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", None, msg.clone()),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", None, msg.clone())
            }
            AppError::UnsupportedImage(t) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                Some(t.kind),
                t.message.clone(),
            ),
            AppError::MalformedResponse(t) => {
                tracing::warn!("Malformed model response: {}", t.message);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "MALFORMED_RESPONSE",
                    Some(t.kind),
                    t.message.clone(),
                )
            }
            AppError::Service(t) => {
                tracing::error!("Model service error: {}", t.message);
                (
                    StatusCode::BAD_GATEWAY,
                    "SERVICE_ERROR",
                    Some(t.kind),
                    t.message.clone(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    None,
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(kind) = kind {
            error["kind"] = json!(kind);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        let tagged = Tagged {
            kind: err.tag(),
            message: err.to_string(),
        };
        match err {
            ExtractionError::UnsupportedImage(_) => AppError::UnsupportedImage(tagged),
            ExtractionError::MalformedResponse(_) => AppError::MalformedResponse(tagged),
            ExtractionError::Service(_) => AppError::Service(tagged),
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        AppError::Service(Tagged {
            kind: err.tag(),
            message: err.to_string(),
        })
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::UnsupportedType(_) => AppError::UnsupportedImage(Tagged {
                kind: "UnsupportedImage",
                message: err.to_string(),
            }),
            _ => AppError::Validation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;

    #[test]
    fn test_extraction_errors_map_to_codes() {
        let malformed: AppError =
            ExtractionError::MalformedResponse("expected value at line 1".into()).into();
        assert_eq!(
            malformed.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );

        let service: AppError = ExtractionError::Service(LlmError::MissingApiKey).into();
        assert!(matches!(
            service,
            AppError::Service(ref t) if t.kind == "ServiceError" && t.message.contains("OPENAI_API_KEY")
        ));
        assert_eq!(service.into_response().status(), StatusCode::BAD_GATEWAY);

        let unsupported: AppError =
            ExtractionError::UnsupportedImage("image is empty".into()).into();
        assert_eq!(unsupported.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upload_error_is_validation() {
        let err: AppError = UploadError::MissingFile.into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    async fn error_body(err: AppError) -> serde_json::Value {
        let bytes = axum::body::to_bytes(err.into_response().into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_body_carries_taxonomy_kind() {
        let body = error_body(ExtractionError::MalformedResponse("eof".into()).into()).await;
        assert_eq!(body["error"]["code"], "MALFORMED_RESPONSE");
        assert_eq!(body["error"]["kind"], "MalformedResponse");

        let body = error_body(GenerationError::Service(LlmError::EmptyContent).into()).await;
        assert_eq!(body["error"]["kind"], "ServiceError");
        assert_eq!(body["error"]["message"], "LLM returned empty content");

        let body = error_body(UploadError::UnsupportedType("cert.gif".into()).into()).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["kind"], "UnsupportedImage");

        let body = error_body(AppError::NotFound("No letter has been generated".into())).await;
        assert!(body["error"].get("kind").is_none());
    }
}
