use std::sync::Arc;

use crate::config::Config;
use crate::knowledge::{DocumentIngestor, KnowledgeStore};
use crate::llm_client::LanguageBackend;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub knowledge: Arc<dyn KnowledgeStore>,
    pub ingestor: DocumentIngestor,
    /// `None` when ANTHROPIC_API_KEY is not configured; chat then answers in
    /// offline mode (top snippet, clearly marked).
    pub llm: Option<Arc<dyn LanguageBackend>>,
    pub config: Config,
}
