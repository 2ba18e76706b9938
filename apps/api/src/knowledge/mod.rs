//! Knowledge store client.
//!
//! The retrieval backend is a separate HTTP service that owns the policy
//! corpus. This module defines the wire shapes, the error taxonomy, and the
//! `KnowledgeStore` trait the rest of the app depends on; the production
//! implementation lives in [`http_store`].

pub mod http_store;
pub mod ingest;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

pub use http_store::HttpKnowledgeStore;
pub use ingest::DocumentIngestor;

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Error)]
pub enum KnowledgeError {
    #[error("knowledge store unreachable: {0}")]
    Unreachable(String),

    #[error("knowledge store timed out")]
    Timeout,

    #[error("knowledge store returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("knowledge store response not understood: {0}")]
    Malformed(String),
}

impl KnowledgeError {
    /// Short lowercase category used in degraded-mode answer notes and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unreachable(_) => "unreachable",
            Self::Timeout => "timeout",
            Self::Api { .. } => "store error",
            Self::Malformed(_) => "bad response",
        }
    }

    /// Classifies a transport-level failure from the HTTP client.
    pub fn from_request_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Unreachable(err.to_string())
        } else {
            Self::Malformed(err.to_string())
        }
    }
}

// ─── Wire shapes ─────────────────────────────────────────────────────────────

/// One search hit as the store sent it. The store's result schema is not
/// pinned down, so this is deliberately loose; snippet normalization decides
/// what text to show.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawResult {
    Text(String),
    Record(serde_json::Map<String, Value>),
    Other(Value),
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Everything the app asks of the retrieval backend.
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Adds a document's text to the corpus and triggers indexing.
    async fn add(&self, text: &str) -> Result<(), KnowledgeError>;

    /// Runs a semantic search, returning at most `top_k` raw hits.
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<RawResult>, KnowledgeError>;

    /// Deletes the entire corpus.
    async fn prune(&self) -> Result<(), KnowledgeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_result_parses_plain_string() {
        let raw: RawResult = serde_json::from_str(r#""Minimum GMAT is 600.""#).unwrap();
        assert!(matches!(raw, RawResult::Text(ref s) if s == "Minimum GMAT is 600."));
    }

    #[test]
    fn test_raw_result_parses_object_record() {
        let raw: RawResult =
            serde_json::from_str(r#"{"text": "Deadline is May 31.", "score": 0.92}"#).unwrap();
        match raw {
            RawResult::Record(map) => {
                assert_eq!(map["text"], "Deadline is May 31.");
            }
            other => panic!("expected Record, got {other:?}"),
        }
    }

    #[test]
    fn test_raw_result_parses_non_object_non_string() {
        let raw: RawResult = serde_json::from_str("[1, 2, 3]").unwrap();
        assert!(matches!(raw, RawResult::Other(Value::Array(_))));
    }

    #[test]
    fn test_raw_result_null_is_other() {
        let raw: RawResult = serde_json::from_str("null").unwrap();
        assert!(matches!(raw, RawResult::Other(Value::Null)));
    }

    #[test]
    fn test_mixed_result_list_parses() {
        let raws: Vec<RawResult> =
            serde_json::from_str(r#"["plain", {"text": "rec"}, 42, null]"#).unwrap();
        assert_eq!(raws.len(), 4);
        assert!(matches!(raws[0], RawResult::Text(_)));
        assert!(matches!(raws[1], RawResult::Record(_)));
        assert!(matches!(raws[2], RawResult::Other(_)));
        assert!(matches!(raws[3], RawResult::Other(Value::Null)));
    }

    #[test]
    fn test_error_kinds_are_stable() {
        assert_eq!(KnowledgeError::Unreachable("x".into()).kind(), "unreachable");
        assert_eq!(KnowledgeError::Timeout.kind(), "timeout");
        assert_eq!(
            KnowledgeError::Api {
                status: 500,
                message: "boom".into()
            }
            .kind(),
            "store error"
        );
        assert_eq!(KnowledgeError::Malformed("x".into()).kind(), "bad response");
    }
}
