//! Prompt composition.
//!
//! One chat turn becomes exactly two messages: the fixed system instruction
//! and a user message interpolating CV summary, numbered snippets, and the
//! verbatim question. Snippet `[i]` in the prompt is `snippets[i-1]`, the
//! same numbering the response payload carries.

use crate::chat::prompts::{CHAT_PROMPT_TEMPLATE, CHAT_SYSTEM, NO_SNIPPETS_MARKER};
use crate::llm_client::ChatMessage;

/// Builds the two-message prompt for one question.
pub fn compose(question: &str, cv_summary: &str, snippets: &[String]) -> Vec<ChatMessage> {
    let snippet_block = format_snippet_block(snippets);
    let user = fill_template(
        CHAT_PROMPT_TEMPLATE,
        &[
            ("{cv_summary}", cv_summary),
            ("{snippets}", &snippet_block),
            ("{question}", question),
        ],
    );

    vec![ChatMessage::system(CHAT_SYSTEM), ChatMessage::user(user)]
}

/// Fills `template` in one left-to-right pass. `fields` must be listed in
/// template order; filled values are never rescanned, so placeholder-like
/// text inside a CV summary or question survives verbatim.
fn fill_template(template: &str, fields: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    for &(token, value) in fields {
        if let Some((head, tail)) = rest.split_once(token) {
            out.push_str(head);
            out.push_str(value);
            rest = tail;
        }
    }
    out.push_str(rest);
    out
}

/// Renders the numbered snippet block, or the `(none)` marker when retrieval
/// produced nothing usable.
fn format_snippet_block(snippets: &[String]) -> String {
    if snippets.is_empty() {
        return NO_SNIPPETS_MARKER.to_string();
    }
    snippets
        .iter()
        .enumerate()
        .map(|(i, text)| format!("[{}] {}", i + 1, text))
        .collect::<Vec<_>>()
        .join("\n")
}
