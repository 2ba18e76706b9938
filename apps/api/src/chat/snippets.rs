//! Snippet normalization.
//!
//! The knowledge store returns whatever its result schema happens to be;
//! this module turns that into the uniform snippet list the composer and the
//! chat response share. Retrieval order is the store's ranking and is
//! preserved exactly.

use serde::Serialize;
use serde_json::Value;

use crate::knowledge::RawResult;

/// Hard cap per snippet. Keeps one oversized policy paragraph from crowding
/// everything else out of the prompt.
pub const MAX_SNIPPET_CHARS: usize = 600;

/// A snippet as cited in prompts and returned to the client. `ordinal` is
/// 1-based and matches the `[i]` citations in the composed prompt.
#[derive(Debug, Clone, Serialize)]
pub struct Snippet {
    pub ordinal: usize,
    pub text: String,
}

/// Flattens raw retrieval results into at most `limit` clean snippet texts.
///
/// Per result, the text is taken from the first of: the string itself, the
/// object's `"text"` field, the object's `"content"` field, the value's own
/// JSON rendering. Null and whitespace-only results are dropped. Kept texts
/// are trimmed and truncated to [`MAX_SNIPPET_CHARS`].
pub fn normalize(raw: &[RawResult], limit: usize) -> Vec<String> {
    let mut snippets = Vec::new();
    for result in raw {
        if snippets.len() == limit {
            break;
        }
        let Some(text) = extract_text(result) else {
            continue;
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            continue;
        }
        snippets.push(truncate_chars(trimmed, MAX_SNIPPET_CHARS));
    }
    snippets
}

/// Pairs each snippet text with its 1-based ordinal for the response payload.
pub fn with_ordinals(texts: &[String]) -> Vec<Snippet> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| Snippet {
            ordinal: i + 1,
            text: text.clone(),
        })
        .collect()
}

fn extract_text(result: &RawResult) -> Option<String> {
    match result {
        RawResult::Text(s) => Some(s.clone()),
        RawResult::Record(map) => {
            if let Some(Value::String(s)) = map.get("text") {
                return Some(s.clone());
            }
            if let Some(Value::String(s)) = map.get("content") {
                return Some(s.clone());
            }
            serde_json::to_string(map).ok()
        }
        RawResult::Other(Value::Null) => None,
        RawResult::Other(value) => serde_json::to_string(value).ok(),
    }
}

fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        text.chars().take(limit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> RawResult {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_plain_strings_pass_through_trimmed() {
        let results = vec![raw(r#""  Minimum GMAT is 600.  ""#)];
        assert_eq!(normalize(&results, 5), vec!["Minimum GMAT is 600."]);
    }

    #[test]
    fn test_record_text_field_wins_over_content() {
        let results = vec![raw(r#"{"text": "from text", "content": "from content"}"#)];
        assert_eq!(normalize(&results, 5), vec!["from text"]);
    }

    #[test]
    fn test_record_without_text_uses_content() {
        let results = vec![raw(r#"{"content": "from content", "score": 1.5}"#)];
        assert_eq!(normalize(&results, 5), vec!["from content"]);
    }

    #[test]
    fn test_non_string_text_field_is_skipped_over() {
        // "text" holds a number, "content" a string; content wins.
        let results = vec![raw(r#"{"text": 42, "content": "usable"}"#)];
        assert_eq!(normalize(&results, 5), vec!["usable"]);
    }

    #[test]
    fn test_record_without_known_fields_renders_as_json() {
        let results = vec![raw(r#"{"score": 0.9}"#)];
        assert_eq!(normalize(&results, 5), vec![r#"{"score":0.9}"#]);
    }

    #[test]
    fn test_scalar_results_render_as_json() {
        let results = vec![raw("42"), raw("[1,2]")];
        assert_eq!(normalize(&results, 5), vec!["42", "[1,2]"]);
    }

    #[test]
    fn test_null_and_blank_results_are_dropped() {
        let results = vec![
            raw("null"),
            raw(r#""   ""#),
            raw(r#"{"text": "  "}"#),
            raw(r#""kept""#),
        ];
        assert_eq!(normalize(&results, 5), vec!["kept"]);
    }

    #[test]
    fn test_limit_caps_output_after_filtering() {
        let results = vec![raw("null"), raw(r#""a""#), raw(r#""b""#), raw(r#""c""#)];
        assert_eq!(normalize(&results, 2), vec!["a", "b"]);
    }

    #[test]
    fn test_order_is_preserved() {
        let results = vec![raw(r#""first""#), raw(r#""second""#), raw(r#""third""#)];
        assert_eq!(normalize(&results, 5), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_long_snippets_are_truncated_at_char_boundary() {
        let long = format!(r#""{}""#, "é".repeat(700));
        let results = vec![raw(&long)];
        let normalized = normalize(&results, 5);
        assert_eq!(normalized[0].chars().count(), MAX_SNIPPET_CHARS);
    }

    #[test]
    fn test_with_ordinals_is_one_based_and_ordered() {
        let texts = vec!["a".to_string(), "b".to_string()];
        let snippets = with_ordinals(&texts);
        assert_eq!(snippets[0].ordinal, 1);
        assert_eq!(snippets[0].text, "a");
        assert_eq!(snippets[1].ordinal, 2);
        assert_eq!(snippets[1].text, "b");
    }

    #[test]
    fn test_snippet_serializes_with_ordinal_and_text() {
        let snippet = Snippet {
            ordinal: 3,
            text: "policy".to_string(),
        };
        let json = serde_json::to_value(&snippet).unwrap();
        assert_eq!(json["ordinal"], 3);
        assert_eq!(json["text"], "policy");
    }
}
