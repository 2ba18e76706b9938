//! HTTP handlers for the chat surface: CV upload, chat turns, and the two
//! reset operations. Wiring into the router happens in `routes`.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::chat::{run_turn, Snippet};
use crate::errors::AppError;
use crate::extract;
use crate::state::AppState;

/// Upper bound on requested snippet count; requests above it are clamped,
/// not rejected.
pub const MAX_TOP_K: usize = 25;

#[derive(Debug, Serialize)]
pub struct UploadCvResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session_id: Uuid,
    pub message: String,
    #[serde(default)]
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
    pub snippets: Vec<Snippet>,
    pub session_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub ok: bool,
    pub message: String,
}

/// POST /api/v1/cv — accepts a .docx CV, extracts its text, opens a session.
pub async fn upload_cv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadCvResponse>, AppError> {
    let mut file: Option<(String, bytes::Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        file = Some((filename, data));
        break;
    }

    let (filename, data) =
        file.ok_or_else(|| AppError::Validation("Multipart field 'file' is required".to_string()))?;

    if filename.is_empty() {
        return Err(AppError::Validation(
            "Uploaded file has no filename".to_string(),
        ));
    }
    if !extract::has_docx_extension(&filename) {
        return Err(AppError::UnsupportedFileType(format!(
            "Only .docx files are accepted, got '{filename}'"
        )));
    }
    if data.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }

    let cv_text = extract::extract_docx_text(&data)
        .map_err(|e| AppError::UnprocessableEntity(format!("Could not read document: {e}")))?;
    if cv_text.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "The document contains no extractable text".to_string(),
        ));
    }

    let session_id = state.sessions.create(cv_text.clone());
    info!(
        "CV '{filename}' accepted as session {session_id} ({} chars)",
        cv_text.len()
    );

    // Off by default: uploaded CVs land in the shared corpus, visible to
    // retrieval from every session.
    if state.config.ingest_uploaded_cvs {
        let ingestor = state.ingestor.clone();
        tokio::spawn(async move {
            ingestor.ingest("uploaded CV", &cv_text).await;
        });
    }

    Ok(Json(UploadCvResponse { session_id }))
}

/// POST /api/v1/chat — one retrieval-augmented question/answer turn.
pub async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = payload.message.trim().to_string();
    if message.is_empty() {
        return Err(AppError::Validation(
            "Message must not be empty".to_string(),
        ));
    }
    let top_k = payload
        .top_k
        .unwrap_or(state.config.retrieve_top_k)
        .clamp(1, MAX_TOP_K);

    let outcome = run_turn(
        &state.sessions,
        state.knowledge.as_ref(),
        state.llm.as_deref(),
        payload.session_id,
        &message,
        top_k,
    )
    .await?;

    Ok(Json(ChatResponse {
        answer: outcome.answer,
        snippets: outcome.snippets,
        session_id: payload.session_id,
    }))
}

/// POST /api/v1/sessions/:id/reset — drops one session. Idempotent.
pub async fn reset_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Json<ResetResponse> {
    let removed = state.sessions.remove(session_id);
    let message = if removed {
        format!("Session {session_id} reset.")
    } else {
        format!("Session {session_id} was not active; nothing to reset.")
    };
    Json(ResetResponse { ok: true, message })
}

/// POST /api/v1/system/reset — drops every session, then prunes the
/// knowledge store. Sessions go first so a prune failure can never leave
/// answerable sessions pointing at a half-cleared corpus.
pub async fn reset_system(State(state): State<AppState>) -> Result<Json<ResetResponse>, AppError> {
    let cleared = state.sessions.clear();
    info!("System reset: {cleared} sessions dropped, pruning knowledge store");

    state
        .knowledge
        .prune()
        .await
        .map_err(|e| AppError::Knowledge(e.to_string()))?;

    Ok(Json(ResetResponse {
        ok: true,
        message: "System reset completed.".to_string(),
    }))
}
