//! Certificate image uploads from multipart forms.

use axum::extract::{multipart::MultipartError, Multipart};
use bytes::Bytes;
use thiserror::Error;

/// Multipart field carrying the certificate image.
pub const UPLOAD_FIELD: &str = "file";

/// An accepted certificate image, held for the rest of the session.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    /// Canonical MIME type: `image/png` or `image/jpeg`.
    pub mime_type: &'static str,
    pub bytes: Bytes,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file was uploaded")]
    MissingFile,

    #[error("The uploaded file is empty")]
    Empty,

    #[error("Unsupported file '{0}'. Upload a PNG or JPEG image.")]
    UnsupportedType(String),

    #[error("Could not read upload: {0}")]
    Multipart(#[from] MultipartError),
}

/// Reads the `file` part of a multipart body.
pub async fn read_image_upload(mut multipart: Multipart) -> Result<UploadedImage, UploadError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;
        return accept_image(file_name, content_type.as_deref(), bytes);
    }
    Err(UploadError::MissingFile)
}

/// Validates one uploaded file and settles its MIME type.
pub fn accept_image(
    file_name: String,
    content_type: Option<&str>,
    bytes: Bytes,
) -> Result<UploadedImage, UploadError> {
    if bytes.is_empty() {
        // Browsers submit an empty, unnamed part when no file was chosen.
        return Err(if file_name.is_empty() {
            UploadError::MissingFile
        } else {
            UploadError::Empty
        });
    }

    let mime_type = resolve_mime_type(content_type, &file_name).ok_or_else(|| {
        UploadError::UnsupportedType(if file_name.is_empty() {
            content_type.unwrap_or("unknown").to_string()
        } else {
            file_name.clone()
        })
    })?;

    Ok(UploadedImage {
        file_name: if file_name.is_empty() {
            "certificate".to_string()
        } else {
            file_name
        },
        mime_type,
        bytes,
    })
}

/// Declared content type first, then the file extension (`png`, `jpg`, `jpeg`).
pub fn resolve_mime_type(content_type: Option<&str>, file_name: &str) -> Option<&'static str> {
    let declared = content_type
        .map(|ct| ct.split(';').next().unwrap_or_default().trim().to_ascii_lowercase());

    match declared.as_deref() {
        Some("image/png") => return Some("image/png"),
        Some("image/jpeg" | "image/jpg" | "image/pjpeg") => return Some("image/jpeg"),
        _ => {}
    }

    let extension = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_content_type_wins() {
        assert_eq!(resolve_mime_type(Some("image/png"), "scan.bin"), Some("image/png"));
        assert_eq!(resolve_mime_type(Some("IMAGE/JPG"), "scan"), Some("image/jpeg"));
    }

    #[test]
    fn test_extension_fallback() {
        assert_eq!(
            resolve_mime_type(Some("application/octet-stream"), "cert.JPEG"),
            Some("image/jpeg")
        );
        assert_eq!(resolve_mime_type(None, "cert.png"), Some("image/png"));
        assert_eq!(resolve_mime_type(None, "cert.gif"), None);
        assert_eq!(resolve_mime_type(None, "cert"), None);
    }

    #[test]
    fn test_accept_image_rejects_unsupported_files() {
        let err = accept_image(
            "cert.pdf".to_string(),
            Some("application/pdf"),
            Bytes::from_static(b"%PDF"),
        )
        .unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedType(ref name) if name == "cert.pdf"));
    }

    #[test]
    fn test_accept_image_empty_parts() {
        let err = accept_image(String::new(), None, Bytes::new()).unwrap_err();
        assert!(matches!(err, UploadError::MissingFile));

        let err = accept_image("cert.png".to_string(), Some("image/png"), Bytes::new()).unwrap_err();
        assert!(matches!(err, UploadError::Empty));
    }

    #[test]
    fn test_accept_image_keeps_bytes() {
        let image = accept_image(
            "cert.jpg".to_string(),
            Some("image/jpeg"),
            Bytes::from_static(b"\xFF\xD8\xFF"),
        )
        .unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.file_name, "cert.jpg");
        assert_eq!(image.bytes.len(), 3);
    }
}
