pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::extraction::handlers as extraction_api;
use crate::letters::handlers as letters_api;
use crate::state::AppState;
use crate::workflow::handlers as workflow;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Interactive workflow
        .route("/", get(workflow::handle_page))
        .route("/upload", post(workflow::handle_upload))
        .route("/image", get(workflow::handle_image))
        .route("/extract", post(workflow::handle_extract))
        .route("/fields", post(workflow::handle_save_fields))
        .route("/generate", post(workflow::handle_generate))
        .route("/download/letter", get(workflow::handle_download_letter))
        .route("/download/bundle", get(workflow::handle_download_bundle))
        .route("/reset", post(workflow::handle_reset))
        // JSON API
        .route(
            "/api/v1/institutions",
            get(letters_api::handle_list_institutions),
        )
        .route("/api/v1/extract", post(extraction_api::handle_extract))
        .route("/api/v1/letters", post(letters_api::handle_generate_letter))
        // Upload size is the hosting environment's call, not ours.
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}
