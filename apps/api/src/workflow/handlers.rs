//! Axum route handlers for the interactive workflow.
//!
//! Every POST ends in a 303 back to `/`. Failures never produce an error page:
//! they become a flash message and the workflow state is left as it was.

use std::collections::HashMap;

use axum::{
    extract::{Multipart, State},
    http::header,
    response::{Html, Redirect, Response},
    Form,
};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::extraction::extractor::extract;
use crate::extraction::upload::read_image_upload;
use crate::letters::generator::generate_letter;
use crate::letters::institutions::find_profile;
use crate::models::certificate::{CertificateFields, FieldName};
use crate::models::letter::{DownloadBundle, BUNDLE_FILE_NAME};
use crate::state::AppState;
use crate::workflow::render::render_page;
use crate::workflow::session::{Phase, Session};
use crate::workflow::store::CurrentSession;

const INSTITUTION_FIELD: &str = "institution";

/// 303 See Other, so the browser follows up with a GET.
fn back_to_page() -> Redirect {
    Redirect::to("/")
}

fn log_transition(session: &Session, before: Phase) {
    let after = session.state.phase();
    if after != before {
        info!("Session {}: {before:?} -> {after:?}", session.id);
    }
}

/// GET /
pub async fn handle_page(current: CurrentSession) -> Response {
    let page = {
        let mut session = current.session.lock().await;
        let flash = session.take_flash();
        render_page(&session, flash.as_ref())
    };
    current.respond(Html(page))
}

/// POST /upload
pub async fn handle_upload(current: CurrentSession, multipart: Multipart) -> Response {
    let upload = read_image_upload(multipart).await;

    let mut session = current.session.lock().await;
    match upload {
        Ok(image) => {
            info!(
                "Session {}: uploaded {} ({} bytes)",
                session.id,
                image.mime_type,
                image.bytes.len()
            );
            let before = session.state.phase();
            session.state.upload(image);
            log_transition(&session, before);
            session.flash_success("Certificate uploaded.");
        }
        Err(e) => {
            warn!("Session {}: upload rejected: {e}", session.id);
            session.flash_error(e.to_string());
        }
    }
    drop(session);

    current.respond(back_to_page())
}

/// GET /image
pub async fn handle_image(current: CurrentSession) -> Result<Response, AppError> {
    let session = current.session.lock().await;
    let image = session
        .state
        .image()
        .ok_or_else(|| AppError::NotFound("No certificate has been uploaded".to_string()))?;

    Ok(current.respond((
        [
            (header::CONTENT_TYPE, image.mime_type),
            (header::CACHE_CONTROL, "no-store"),
        ],
        image.bytes.clone(),
    )))
}

/// POST /extract
///
/// Holds the session lock across the model call so a second click waits for the first.
pub async fn handle_extract(State(state): State<AppState>, current: CurrentSession) -> Response {
    let mut session = current.session.lock().await;
    let before = session.state.phase();

    match session.state.image().cloned() {
        None => session.flash_error("Upload a death certificate image first."),
        Some(image) => {
            match extract(state.llm.as_ref(), &image.bytes, image.mime_type).await {
                Ok(record) => match session.state.record_extraction(record) {
                    Ok(()) => {
                        info!("Session {}: extraction complete", session.id);
                        session.flash_success("Extraction complete!");
                    }
                    Err(e) => session.flash_error(e.to_string()),
                },
                Err(e) => {
                    warn!("Session {}: extraction failed: {e}", session.id);
                    session.flash_error(format!("Extraction failed: {e}"));
                }
            }
        }
    }
    log_transition(&session, before);
    drop(session);

    current.respond(back_to_page())
}

/// POST /fields
pub async fn handle_save_fields(
    current: CurrentSession,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let mut session = current.session.lock().await;
    let before = session.state.phase();
    if apply_review_form(&mut session, &form) {
        session.flash_success("Edits saved.");
    }
    log_transition(&session, before);
    drop(session);

    current.respond(back_to_page())
}

/// POST /generate
///
/// Saves the submitted edits first, so the letter is always written from what the user sees.
pub async fn handle_generate(
    State(state): State<AppState>,
    current: CurrentSession,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let mut session = current.session.lock().await;
    let before = session.state.phase();

    if apply_review_form(&mut session, &form) {
        let fields = session.state.review().map(|r| r.edited.clone());
        if let Some(fields) = fields {
            let institution = session.institution.clone();
            match generate_letter(state.llm.as_ref(), &fields, &institution).await {
                Ok(letter) => match session.state.record_letter(letter) {
                    Ok(()) => {
                        info!("Session {}: letter generated for {institution}", session.id);
                        session.flash_success("Document generated!");
                    }
                    Err(e) => session.flash_error(e.to_string()),
                },
                Err(e) => {
                    warn!("Session {}: letter generation failed: {e}", session.id);
                    session.flash_error(e.to_string());
                }
            }
        }
    }
    log_transition(&session, before);
    drop(session);

    current.respond(back_to_page())
}

/// Applies the review form: institution selection plus field edits.
///
/// Fields missing from the form keep their current value. Returns `false` (with a
/// flash set) when there is nothing to edit yet.
fn apply_review_form(session: &mut Session, form: &HashMap<String, String>) -> bool {
    if let Some(institution) = form.get(INSTITUTION_FIELD) {
        if find_profile(institution).is_some() {
            session.institution = institution.clone();
        } else {
            warn!(
                "Session {}: ignoring unknown institution '{institution}'",
                session.id
            );
        }
    }

    let Some(current) = session.state.review().map(|r| r.edited.clone()) else {
        session.flash_error("Extract the certificate data first.");
        return false;
    };

    let edited = CertificateFields::from_lookup(|key| {
        form.get(key)
            .cloned()
            .or_else(|| FieldName::from_key(key).map(|f| current.get(f).to_string()))
    });

    match session.state.edit_fields(edited) {
        Ok(invalidated) => {
            if invalidated {
                info!(
                    "Session {}: edits changed the fields, previous letter discarded",
                    session.id
                );
            }
            true
        }
        Err(e) => {
            session.flash_error(e.to_string());
            false
        }
    }
}

/// GET /download/letter
pub async fn handle_download_letter(current: CurrentSession) -> Result<Response, AppError> {
    let session = current.session.lock().await;
    let letter = session
        .state
        .letter()
        .ok_or_else(|| AppError::NotFound("No letter has been generated".to_string()))?;

    let disposition = format!("attachment; filename=\"{}\"", letter.file_name());
    Ok(current.respond(
        (
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            letter.content.clone(),
        ),
    ))
}

/// GET /download/bundle
pub async fn handle_download_bundle(current: CurrentSession) -> Result<Response, AppError> {
    let session = current.session.lock().await;
    let (review, letter) = session
        .state
        .review()
        .zip(session.state.letter())
        .ok_or_else(|| AppError::NotFound("No letter has been generated".to_string()))?;

    let json = DownloadBundle::new(letter, &review.edited)
        .to_pretty_json()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize bundle: {e}")))?;

    Ok(current.respond((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{BUNDLE_FILE_NAME}\""),
            ),
        ],
        json,
    )))
}

/// POST /reset
pub async fn handle_reset(current: CurrentSession) -> Response {
    let mut session = current.session.lock().await;
    let before = session.state.phase();
    session.state.reset();
    info!("Session {}: reset", session.id);
    log_transition(&session, before);
    drop(session);

    current.respond(back_to_page())
}
