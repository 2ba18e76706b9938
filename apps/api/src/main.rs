mod chat;
mod config;
mod errors;
mod extract;
mod knowledge;
mod llm_client;
mod routes;
mod session;
mod state;
#[cfg(test)]
mod testing;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::knowledge::{DocumentIngestor, HttpKnowledgeStore, KnowledgeStore};
use crate::llm_client::{LanguageBackend, LlmClient};
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting admissions API v{}", env!("CARGO_PKG_VERSION"));

    // Knowledge store client + ingestor
    let knowledge: Arc<dyn KnowledgeStore> =
        Arc::new(HttpKnowledgeStore::new(config.knowledge_store_url.clone()));
    let ingestor = DocumentIngestor::new(knowledge.clone());
    info!("Knowledge store client ready ({})", config.knowledge_store_url);

    // LLM backend; without a key every answer falls back to raw snippets
    let llm: Option<Arc<dyn LanguageBackend>> = match &config.anthropic_api_key {
        Some(key) => {
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(Arc::new(LlmClient::new(key.clone())))
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; running in offline mode");
            None
        }
    };

    // One-time policy corpus ingestion, best-effort
    ingest_policy_document(&ingestor, &config.policy_doc_path).await;

    let state = AppState {
        sessions: Arc::new(SessionStore::new()),
        knowledge,
        ingestor,
        llm,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Loads the configured policy document and feeds it to the knowledge store.
/// Every failure path only warns: the service starts with an empty corpus
/// and degrades at answer time instead of refusing to boot.
async fn ingest_policy_document(ingestor: &DocumentIngestor, configured_path: &str) {
    let path = Path::new(configured_path);
    if !path.exists() {
        warn!(
            "Policy document {} not found; starting with an empty corpus",
            path.display()
        );
        return;
    }

    // .docx in production; plain text is handy in development.
    let text = if extract::has_docx_extension(configured_path) {
        match extract::load_document_text(path) {
            Ok(text) => text,
            Err(e) => {
                warn!("Could not extract policy document {}: {e}", path.display());
                return;
            }
        }
    } else {
        match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!("Could not read policy document {}: {e}", path.display());
                return;
            }
        }
    };

    ingestor.ingest(configured_path, &text).await;
}
