//! Shared test fixtures: scripted collaborator fakes, .docx builders, and
//! app-state construction. Compiled for tests only.

use std::io::{Cursor, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::config::Config;
use crate::knowledge::{DocumentIngestor, KnowledgeError, KnowledgeStore, RawResult};
use crate::llm_client::{ChatMessage, LanguageBackend, LlmError};
use crate::session::SessionStore;
use crate::state::AppState;

// ─── Fake knowledge store ────────────────────────────────────────────────────

/// In-memory [`KnowledgeStore`] with scripted results and failures, plus
/// counters so tests can assert what was (not) called.
#[derive(Default)]
pub struct FakeKnowledgeStore {
    results: Vec<RawResult>,
    add_error: Option<KnowledgeError>,
    search_error: Option<KnowledgeError>,
    prune_error: Option<KnowledgeError>,
    added: Mutex<Vec<String>>,
    search_calls: AtomicUsize,
    prune_calls: AtomicUsize,
    last_top_k: Mutex<Option<usize>>,
}

impl FakeKnowledgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the search results from raw JSON values, exercising the same
    /// untagged deserialization the HTTP client performs.
    pub fn with_results(mut self, values: Vec<Value>) -> Self {
        self.results = values
            .into_iter()
            .map(|v| serde_json::from_value(v).expect("value not representable as RawResult"))
            .collect();
        self
    }

    pub fn with_add_error(mut self, error: KnowledgeError) -> Self {
        self.add_error = Some(error);
        self
    }

    pub fn with_search_error(mut self, error: KnowledgeError) -> Self {
        self.search_error = Some(error);
        self
    }

    pub fn with_prune_error(mut self, error: KnowledgeError) -> Self {
        self.prune_error = Some(error);
        self
    }

    pub fn added(&self) -> Vec<String> {
        self.added.lock().unwrap().clone()
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn prune_calls(&self) -> usize {
        self.prune_calls.load(Ordering::SeqCst)
    }

    pub fn last_top_k(&self) -> Option<usize> {
        *self.last_top_k.lock().unwrap()
    }
}

#[async_trait]
impl KnowledgeStore for FakeKnowledgeStore {
    async fn add(&self, text: &str) -> Result<(), KnowledgeError> {
        if let Some(e) = &self.add_error {
            return Err(e.clone());
        }
        self.added.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn search(&self, _query: &str, top_k: usize) -> Result<Vec<RawResult>, KnowledgeError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_top_k.lock().unwrap() = Some(top_k);
        if let Some(e) = &self.search_error {
            return Err(e.clone());
        }
        Ok(self.results.clone())
    }

    async fn prune(&self) -> Result<(), KnowledgeError> {
        self.prune_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(e) = &self.prune_error {
            return Err(e.clone());
        }
        Ok(())
    }
}

// ─── Fake language backend ───────────────────────────────────────────────────

enum Script {
    Reply(String),
    Fail(String),
}

/// Scripted [`LanguageBackend`] that records the prompt it was given.
pub struct FakeBackend {
    script: Script,
    seen: Mutex<Vec<ChatMessage>>,
}

impl FakeBackend {
    pub fn replying(answer: &str) -> Self {
        Self {
            script: Script::Reply(answer.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            script: Script::Fail(message.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Messages of the most recent `complete` call; empty if never called.
    pub fn seen_messages(&self) -> Vec<ChatMessage> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageBackend for FakeBackend {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        *self.seen.lock().unwrap() = messages.to_vec();
        match &self.script {
            Script::Reply(answer) => Ok(answer.clone()),
            Script::Fail(message) => Err(LlmError::Api {
                status: 500,
                message: message.clone(),
            }),
        }
    }
}

// ─── Document fixtures ───────────────────────────────────────────────────────

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="xml" ContentType="application/xml"/>
</Types>"#;

/// Builds a minimal valid .docx from one `<w:t>` run per paragraph.
/// Paragraph text is embedded as-is, so callers escape XML entities
/// themselves when they need them.
pub fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );
    docx_from_xml(&xml)
}

/// Builds a .docx around a caller-supplied `word/document.xml`.
pub fn docx_from_xml(document_xml: &str) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);

    writer.start_file("[Content_Types].xml", options).unwrap();
    writer.write_all(CONTENT_TYPES_XML.as_bytes()).unwrap();
    writer.start_file("word/document.xml", options).unwrap();
    writer.write_all(document_xml.as_bytes()).unwrap();

    writer.finish().unwrap().into_inner()
}

/// Encodes one file as a `multipart/form-data` body. Returns the content-type
/// header value (with boundary) and the body bytes.
pub fn multipart_file(field: &str, filename: &str, bytes: &[u8]) -> (String, Vec<u8>) {
    let boundary = "----fixture-boundary-83c1d9";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(
        b"Content-Type: application/vnd.openxmlformats-officedocument.wordprocessingml.document\r\n\r\n",
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}

// ─── App state ───────────────────────────────────────────────────────────────

pub fn test_config() -> Config {
    Config {
        knowledge_store_url: "http://127.0.0.1:8000".to_string(),
        anthropic_api_key: None,
        policy_doc_path: "policy.docx".to_string(),
        retrieve_top_k: 6,
        ingest_uploaded_cvs: false,
        port: 0,
        rust_log: "debug".to_string(),
    }
}

/// Full [`AppState`] over fakes. Pass `None` for `backend` to exercise
/// offline mode.
pub fn test_state(
    knowledge: Arc<FakeKnowledgeStore>,
    backend: Option<Arc<FakeBackend>>,
) -> AppState {
    AppState {
        sessions: Arc::new(SessionStore::new()),
        knowledge: knowledge.clone(),
        ingestor: DocumentIngestor::new(knowledge),
        llm: backend.map(|b| b as Arc<dyn LanguageBackend>),
        config: test_config(),
    }
}

/// Like [`test_state`] but with uploaded-CV ingestion switched on.
pub fn test_state_with_cv_ingest(knowledge: Arc<FakeKnowledgeStore>) -> AppState {
    let mut state = test_state(knowledge, None);
    state.config.ingest_uploaded_cvs = true;
    state
}
