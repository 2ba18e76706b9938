//! Chat turn orchestration.
//!
//! `run_turn` is the whole request/response cycle for one question: resolve
//! the session, summarize its CV, retrieve policy snippets, compose the
//! prompt, answer, append the exchange. Collaborator failures degrade where
//! the contract allows it; only an unknown session and a configured backend
//! failing mid-answer surface as errors.
//!
//! Locking: the session snapshot is taken before any await and the atomic
//! append happens after all awaits, so no store lock is ever held across a
//! suspension point.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::chat::{composer, prompts, snippets, summarizer, Snippet};
use crate::errors::AppError;
use crate::knowledge::KnowledgeStore;
use crate::llm_client::LanguageBackend;
use crate::session::SessionStore;

/// What a successful turn hands back to the HTTP layer.
#[derive(Debug)]
pub struct TurnOutcome {
    pub answer: String,
    pub snippets: Vec<Snippet>,
}

pub async fn run_turn(
    sessions: &SessionStore,
    knowledge: &dyn KnowledgeStore,
    backend: Option<&dyn LanguageBackend>,
    session_id: Uuid,
    message: &str,
    top_k: usize,
) -> Result<TurnOutcome, AppError> {
    let session = sessions
        .get(session_id)
        .ok_or(AppError::SessionNotFound(session_id))?;

    // Summarized fresh every turn; the session only stores the raw CV.
    let cv_summary = summarizer::summarize(&session.cv_text);

    let snippet_texts = match knowledge.search(message, top_k).await {
        Ok(raw) => {
            let texts = snippets::normalize(&raw, top_k);
            debug!(
                "Session {session_id}: {} snippets after normalizing {} results",
                texts.len(),
                raw.len()
            );
            texts
        }
        Err(e) => {
            // Degrade, don't fail: the turn continues with a marker snippet
            // in place of results.
            warn!("Session {session_id}: retrieval failed ({e}), continuing degraded");
            vec![format!("(retrieval failed: {})", e.kind())]
        }
    };

    let answer = match backend {
        Some(backend) => {
            let messages = composer::compose(message, &cv_summary, &snippet_texts);
            backend
                .complete(&messages)
                .await
                .map_err(|e| AppError::Llm(e.to_string()))?
        }
        None => offline_answer(&snippet_texts),
    };

    // A reset may have raced us while we were awaiting; the exchange must
    // not be resurrected into a dead session.
    if !sessions.append_exchange(session_id, message, &answer) {
        return Err(AppError::SessionNotFound(session_id));
    }

    Ok(TurnOutcome {
        answer,
        snippets: snippets::with_ordinals(&snippet_texts),
    })
}

/// Without a backend the best we can do is surface the top-ranked snippet,
/// clearly marked as such.
fn offline_answer(snippet_texts: &[String]) -> String {
    match snippet_texts.first() {
        Some(best) => format!("{}\n\n[1] {best}", prompts::OFFLINE_NOTICE),
        None => format!(
            "{}\n\n{}",
            prompts::OFFLINE_NOTICE,
            prompts::NO_SNIPPET_AVAILABLE
        ),
    }
}
