use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionService;
use crate::workflow::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The hosted model. `LlmClient` in production, a scripted fake in tests.
    pub llm: Arc<dyn CompletionService>,
    /// In-memory workflow sessions, keyed by the session cookie.
    pub sessions: SessionStore,
    pub config: Config,
}
