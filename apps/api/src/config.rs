use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// Every setting has a default or is optional: the service must come up in a
/// credential-less environment (no LLM key, no reachable knowledge store) and
/// degrade instead of refusing to start.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the knowledge store sidecar (ingest/search/prune API).
    pub knowledge_store_url: String,
    /// Anthropic API key. `None` means offline mode: chat answers fall back
    /// to the best-ranked snippet instead of a model completion.
    pub anthropic_api_key: Option<String>,
    /// Path to the policy document ingested once at startup (.docx or plain text).
    pub policy_doc_path: String,
    /// Default number of snippets retrieved per chat turn.
    pub retrieve_top_k: usize,
    /// Mirror uploaded CV text into the shared knowledge store. Off by
    /// default: the store is shared across sessions, so ingested CVs could
    /// surface in other applicants' answers. Enable only for single-tenant
    /// deployments.
    pub ingest_uploaded_cvs: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            knowledge_store_url: env_or("KNOWLEDGE_STORE_URL", "http://127.0.0.1:8000"),
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            policy_doc_path: env_or("POLICY_DOC_PATH", "HSG-MBA-application-requirements.docx"),
            retrieve_top_k: env_or("RETRIEVE_TOP_K", "6")
                .parse::<usize>()
                .context("RETRIEVE_TOP_K must be a positive integer")?,
            ingest_uploaded_cvs: matches!(
                env_or("INGEST_UPLOADED_CVS", "false").to_lowercase().as_str(),
                "1" | "true" | "yes"
            ),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
