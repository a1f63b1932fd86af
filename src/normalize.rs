//! Repairs raw model output into a JSON value.
//!
//! Models wrap JSON in markdown fences or chatty prose despite instructions.
//! We strip fences, then keep everything from the first `{` to the last `}`.

use crate::error::PipelineError;
use log::debug;
use serde_json::Value;

/// Strip code fences and surrounding prose, then parse the enclosed object.
///
/// # Errors
/// `ParseError` carrying the raw text when no `{...}` span exists or the span
/// is not valid JSON.
pub fn normalize_response(raw: &str) -> Result<Value, PipelineError> {
    let unfenced = strip_code_fences(raw);

    let start = unfenced.find('{');
    let end = unfenced.rfind('}');
    let json = match (start, end) {
        (Some(start), Some(end)) if start < end => &unfenced[start..=end],
        _ => {
            return Err(PipelineError::parse(
                "no JSON object found in model response",
                raw,
            ))
        }
    };

    if json.len() != unfenced.trim().len() {
        debug!(
            "Discarded {} chars of text around the JSON payload",
            unfenced.trim().len() - json.len()
        );
    }

    serde_json::from_str(json).map_err(|e| PipelineError::parse(e.to_string(), raw))
}

fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "")
        .replace("```JSON", "")
        .replace("```", "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_json() {
        let value = normalize_response(r#"{"name":"Pasta"}"#).unwrap();
        assert_eq!(value, json!({"name": "Pasta"}));
    }

    #[test]
    fn test_fenced_with_prose_matches_clean() {
        let clean = r#"{"name":"Pasta","recipeIngredient":["pasta","salt"]}"#;
        let wrapped = format!(
            "Sure! Here is the recipe you asked for:\n```json\n{}\n```\nLet me know if you need anything else.",
            clean
        );

        assert_eq!(
            normalize_response(clean).unwrap(),
            normalize_response(&wrapped).unwrap()
        );
    }

    #[test]
    fn test_bare_fence_without_language() {
        let value = normalize_response("```\n{\"name\": \"Soup\"}\n```").unwrap();
        assert_eq!(value["name"], "Soup");
    }

    #[test]
    fn test_nested_braces_kept() {
        let value =
            normalize_response(r#"Result: {"name":"A","image":{"url":"https://x/y.jpg"}} done"#)
                .unwrap();
        assert_eq!(value["image"]["url"], "https://x/y.jpg");
    }

    #[test]
    fn test_no_object() {
        let err = normalize_response("I could not find a recipe here.").unwrap_err();
        match err {
            PipelineError::ParseError { raw, .. } => {
                assert_eq!(raw, "I could not find a recipe here.")
            }
            other => panic!("expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_reversed_braces() {
        assert!(matches!(
            normalize_response("} oops {"),
            Err(PipelineError::ParseError { .. })
        ));
    }

    #[test]
    fn test_invalid_json_keeps_raw() {
        let raw = "```json\n{\"name\": \"Pasta\",}\n```";
        match normalize_response(raw).unwrap_err() {
            PipelineError::ParseError { raw: kept, .. } => assert_eq!(kept, raw),
            other => panic!("expected ParseError, got {:?}", other),
        }
    }
}
