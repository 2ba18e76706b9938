// All prompt constants for the chat pipeline. Interpolation happens in the
// composer; templates here never reach the wire unreplaced.

/// System prompt for every chat turn. The model must stay inside the
/// provided material and cite snippets by bracketed number.
pub const CHAT_SYSTEM: &str = "You are an admissions assistant for a full-time MBA program. \
    Answer questions using ONLY the applicant's CV summary and the numbered \
    policy snippets provided with each question. \
    If the provided material does not contain the answer, say so explicitly; \
    do NOT guess or rely on outside knowledge. \
    When a snippet supports your answer, cite it by its bracketed number, e.g. [2].";

/// Chat prompt template.
/// Replace: {cv_summary}, {snippets}, {question}
pub const CHAT_PROMPT_TEMPLATE: &str = r#"APPLICANT CV SUMMARY:
{cv_summary}

POLICY SNIPPETS (numbered, cite by number):
{snippets}

QUESTION:
{question}

Answer in 2-4 sentences, grounded in the material above."#;

/// Placeholder for the snippet block when retrieval returned nothing usable.
pub const NO_SNIPPETS_MARKER: &str = "(none)";

/// First line of every answer produced without a language backend.
pub const OFFLINE_NOTICE: &str =
    "No language backend is configured; here is the closest policy excerpt instead of a generated answer.";

/// Offline-mode marker when there is no snippet to show either.
pub const NO_SNIPPET_AVAILABLE: &str = "(no snippet available)";
