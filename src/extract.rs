//! Best-effort JSON extraction from model replies
//!
//! Language models wrap their JSON in prose, markdown fences, or trailing
//! commentary. Rather than a greedy first-`{`-to-last-`}` match (which a stray
//! brace in the commentary breaks), this scans forward from the first `{`
//! tracking brace depth, skipping braces inside string literals, and returns
//! the first balanced object. Still best-effort: if the model emits several
//! JSON fragments, the first one wins.

use serde::de::DeserializeOwned;
use tracing::debug;

/// Extract the first balanced JSON object substring, if any.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Extract and parse the first JSON object in `text` as a `T`.
///
/// Returns `None` when no balanced object exists or it does not match the
/// schema; callers substitute their documented fallback in that case.
pub fn parse_json_reply<T: DeserializeOwned>(text: &str) -> Option<T> {
    let candidate = extract_json_object(text)?;
    match serde_json::from_str(candidate) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Model reply contained JSON that failed schema parse: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Toy {
        score: f64,
        label: String,
    }

    #[test]
    fn extracts_object_embedded_in_prose() {
        let text = "Here is my analysis:\n{\"score\": 72.5, \"label\": \"ok\"}\nLet me know.";
        assert_eq!(
            extract_json_object(text),
            Some("{\"score\": 72.5, \"label\": \"ok\"}")
        );
    }

    #[test]
    fn handles_nested_objects() {
        let text = "{\"outer\": {\"inner\": {\"deep\": 1}}} trailing";
        assert_eq!(
            extract_json_object(text),
            Some("{\"outer\": {\"inner\": {\"deep\": 1}}}")
        );
    }

    #[test]
    fn ignores_braces_inside_strings() {
        let text = "{\"label\": \"curly } brace { inside\", \"score\": 1}";
        assert_eq!(extract_json_object(text), Some(text));
    }

    #[test]
    fn first_fragment_wins() {
        let text = "{\"score\": 1, \"label\": \"a\"} and also {\"score\": 2, \"label\": \"b\"}";
        let parsed: Toy = parse_json_reply(text).unwrap();
        assert_eq!(parsed.score, 1.0);
        assert_eq!(parsed.label, "a");
    }

    #[test]
    fn stray_trailing_brace_does_not_break_extraction() {
        let text = "{\"score\": 3, \"label\": \"c\"}\n\nNote: use {braces} carefully }";
        let parsed: Toy = parse_json_reply(text).unwrap();
        assert_eq!(parsed.score, 3.0);
    }

    #[test]
    fn no_json_yields_none() {
        assert_eq!(extract_json_object("no structured data here"), None);
        assert!(parse_json_reply::<Toy>("nothing to see").is_none());
    }

    #[test]
    fn unbalanced_json_yields_none() {
        assert_eq!(extract_json_object("{\"score\": 1, \"label\": \"a\""), None);
    }

    #[test]
    fn schema_mismatch_yields_none() {
        assert!(parse_json_reply::<Toy>("{\"wrong\": true}").is_none());
    }
}
