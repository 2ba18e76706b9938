#![allow(dead_code)]

//! Document ingestion: feeds extracted text into the knowledge store.
//!
//! Ingestion is always best-effort. A down or slow store must never stop the
//! service from starting or an upload from succeeding, so failures are
//! reported in the outcome and logged, not propagated.

use std::sync::Arc;

use tracing::{info, warn};

use super::KnowledgeStore;

/// What happened to a single document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The store accepted the text and kicked off indexing.
    Indexed,
    /// Nothing to index; the store was never called.
    SkippedEmpty,
    /// The store rejected the text or could not be reached. Carries the
    /// error category for logs.
    Failed(String),
}

impl IngestOutcome {
    pub fn is_indexed(&self) -> bool {
        matches!(self, Self::Indexed)
    }
}

#[derive(Clone)]
pub struct DocumentIngestor {
    store: Arc<dyn KnowledgeStore>,
}

impl DocumentIngestor {
    pub fn new(store: Arc<dyn KnowledgeStore>) -> Self {
        Self { store }
    }

    /// Sends one document's text to the store. `source` is a label for logs
    /// only (file name, "uploaded CV", ...).
    pub async fn ingest(&self, source: &str, text: &str) -> IngestOutcome {
        if text.trim().is_empty() {
            warn!("Skipping ingestion of '{source}': no extractable text");
            return IngestOutcome::SkippedEmpty;
        }

        match self.store.add(text).await {
            Ok(()) => {
                info!("Ingested '{source}' ({} chars)", text.len());
                IngestOutcome::Indexed
            }
            Err(e) => {
                warn!("Failed to ingest '{source}': {e}");
                IngestOutcome::Failed(e.kind().to_string())
            }
        }
    }
}
