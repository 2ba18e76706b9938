//! HTTP implementation of [`KnowledgeStore`].
//!
//! Speaks a small JSON protocol to the retrieval backend:
//!   POST {base}/add     {"text": "..."}                 -> 2xx
//!   POST {base}/search  {"query": "...", "top_k": N}    -> {"results": [...]}
//!   POST {base}/prune   (empty body)                    -> 2xx

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{KnowledgeError, KnowledgeStore, RawResult};

/// Search and prune are interactive; keep the wait short.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);
/// Adding a document triggers indexing on the store side, which can run for
/// minutes on large files.
const ADD_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(180);
/// Upper bound on how much of an error body we carry into logs and errors.
const ERROR_BODY_LIMIT: usize = 300;

#[derive(Debug, Serialize)]
struct AddRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    top_k: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<RawResult>,
}

pub struct HttpKnowledgeStore {
    client: Client,
    base_url: String,
}

impl HttpKnowledgeStore {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, KnowledgeError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(KnowledgeError::Api {
            status: status.as_u16(),
            message: truncate(&body, ERROR_BODY_LIMIT),
        })
    }
}

#[async_trait::async_trait]
impl KnowledgeStore for HttpKnowledgeStore {
    async fn add(&self, text: &str) -> Result<(), KnowledgeError> {
        debug!("Adding document to knowledge store ({} chars)", text.len());
        let response = self
            .client
            .post(self.endpoint("add"))
            .timeout(ADD_TIMEOUT)
            .json(&AddRequest { text })
            .send()
            .await
            .map_err(KnowledgeError::from_request_error)?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<RawResult>, KnowledgeError> {
        let response = self
            .client
            .post(self.endpoint("search"))
            .json(&SearchRequest { query, top_k })
            .send()
            .await
            .map_err(KnowledgeError::from_request_error)?;

        let response = Self::check_status(response).await?;
        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| KnowledgeError::Malformed(e.to_string()))?;

        debug!("Search returned {} raw results", parsed.results.len());
        Ok(parsed.results)
    }

    async fn prune(&self) -> Result<(), KnowledgeError> {
        let response = self
            .client
            .post(self.endpoint("prune"))
            .send()
            .await
            .map_err(KnowledgeError::from_request_error)?;

        Self::check_status(response).await?;
        Ok(())
    }
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let cut: String = text.chars().take(limit).collect();
        format!("{cut}…")
    }
}
