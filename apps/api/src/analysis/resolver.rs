//! Response Resolver — turns raw model text into the canonical `AnalysisResult`.
//!
//! Every field is read independently and falls back to its default when absent or
//! of the wrong type, so schema drift never rejects the whole record. The only hard
//! failure is text that contains no JSON object at all.

use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::analysis::schema::{
    AnalysisResult, ScoreCard, FIELD_IMPROVED_AD, FIELD_ISSUES, FIELD_SCORE, FIELD_STRENGTHS,
    FIELD_SUGGESTIONS, FIELD_SUMMARY, SCORE_ATTRACTIVENESS, SCORE_CLARITY, SCORE_OVERALL,
    SCORE_SOCIAL_MEDIA, SCORE_STRUCTURE,
};
use crate::llm_client::RawModelOutput;

#[derive(Debug, Error)]
pub enum ResolveError {
    /// Carries the original text for logging; it is never sent to the caller.
    #[error("model output is not a JSON object")]
    Unparsable { raw: String },
}

pub fn resolve(output: &RawModelOutput) -> Result<AnalysisResult, ResolveError> {
    let object = parse_object(&output.text).ok_or_else(|| ResolveError::Unparsable {
        raw: output.text.clone(),
    })?;

    Ok(AnalysisResult {
        summary: string_field(&object, FIELD_SUMMARY),
        strengths: string_list_field(&object, FIELD_STRENGTHS),
        issues: string_list_field(&object, FIELD_ISSUES),
        suggestions: string_list_field(&object, FIELD_SUGGESTIONS),
        improved_ad: string_field(&object, FIELD_IMPROVED_AD),
        score: object
            .get(FIELD_SCORE)
            .and_then(Value::as_object)
            .map(score_card),
    })
}

/// Parses the text as a JSON object: as-is, then without code fences, then the
/// outermost `{ ... }` span.
fn parse_object(text: &str) -> Option<Map<String, Value>> {
    let stripped = strip_json_fences(text);
    [Some(text.trim()), Some(stripped), outer_braces(stripped)]
        .into_iter()
        .flatten()
        .find_map(|candidate| match serde_json::from_str::<Value>(candidate) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        })
}

fn outer_braces(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(inner) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    let inner = inner.trim_start();
    inner.strip_suffix("```").map(str::trim).unwrap_or(inner)
}

fn string_field(object: &Map<String, Value>, key: &str) -> String {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_default()
}

fn string_list_field(object: &Map<String, Value>, key: &str) -> Vec<String> {
    object
        .get(key)
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|item| item.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

fn score_card(score: &Map<String, Value>) -> ScoreCard {
    let number = |key: &str| match score.get(key) {
        Some(Value::Number(n)) => Some(n.clone()),
        _ => None,
    };
    ScoreCard {
        overall: number(SCORE_OVERALL),
        clarity: number(SCORE_CLARITY),
        attractiveness: number(SCORE_ATTRACTIVENESS),
        structure: number(SCORE_STRUCTURE),
        social_media_effectiveness: number(SCORE_SOCIAL_MEDIA),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(text: &str) -> RawModelOutput {
        RawModelOutput {
            text: text.to_string(),
        }
    }

    fn full_output() -> Value {
        json!({
            "summary": "Clear role, weak benefits.",
            "strengths": ["Concrete tasks", "Salary range given"],
            "issues": ["No remote policy"],
            "suggestions": ["Add a hook in the first line"],
            "improvedAd": "Junior Accountant (m/w/d) ...",
            "score": {
                "overall": 64.0,
                "clarity": 70.0,
                "attractiveness": 55.0,
                "structure": 68.0,
                "social_media_effectiveness": 40.0
            }
        })
    }

    #[test]
    fn test_complete_output_round_trips() {
        let value = full_output();
        let result = resolve(&raw(&value.to_string())).unwrap();
        assert_eq!(serde_json::to_value(&result).unwrap(), value);
    }

    #[test]
    fn test_integer_scores_round_trip_unchanged() {
        let value = json!({
            "summary": "Solid ad.",
            "strengths": ["Benefits listed"],
            "issues": [],
            "suggestions": ["Shorten the intro"],
            "improvedAd": "Backend Developer (m/w/d) ...",
            "score": {
                "overall": 64,
                "clarity": 70,
                "attractiveness": 55,
                "structure": 68,
                "social_media_effectiveness": 40
            }
        });
        let result = resolve(&raw(&value.to_string())).unwrap();
        assert_eq!(serde_json::to_value(&result).unwrap(), value);
        assert_eq!(result.score.unwrap().overall, Some(Number::from(64)));
    }

    #[test]
    fn test_missing_strengths_and_clarity_default() {
        let mut value = full_output();
        value.as_object_mut().unwrap().remove("strengths");
        value["score"].as_object_mut().unwrap().remove("clarity");

        let result = resolve(&raw(&value.to_string())).unwrap();
        assert!(result.strengths.is_empty());
        let score = result.score.as_ref().unwrap();
        assert_eq!(score.clarity, None);
        assert_eq!(score.overall, Number::from_f64(64.0));
        assert_eq!(score.social_media_effectiveness, Number::from_f64(40.0));
        assert_eq!(result.summary, "Clear role, weak benefits.");
        assert_eq!(result.issues, vec!["No remote policy"]);
        assert_eq!(result.improved_ad, "Junior Accountant (m/w/d) ...");
    }

    #[test]
    fn test_empty_object_yields_all_defaults() {
        let result = resolve(&raw("{}")).unwrap();
        assert_eq!(result, AnalysisResult::default());
    }

    #[test]
    fn test_prose_without_braces_is_unparsable() {
        let err = resolve(&raw("I'm sorry, I can't analyze this advertisement.")).unwrap_err();
        let ResolveError::Unparsable { raw } = err;
        assert!(raw.contains("I'm sorry"));
    }

    #[test]
    fn test_broken_json_is_unparsable() {
        assert!(resolve(&raw(r#"{"summary": "cut off"#)).is_err());
        assert!(resolve(&raw("")).is_err());
    }

    #[test]
    fn test_non_object_json_is_unparsable() {
        assert!(resolve(&raw("[1, 2, 3]")).is_err());
        assert!(resolve(&raw("\"just a string\"")).is_err());
        assert!(resolve(&raw("42")).is_err());
    }

    #[test]
    fn test_fenced_json_is_accepted() {
        let text = "```json\n{\"summary\": \"fenced\"}\n```";
        assert_eq!(resolve(&raw(text)).unwrap().summary, "fenced");

        let text = "```\n{\"summary\": \"bare fence\"}\n```";
        assert_eq!(resolve(&raw(text)).unwrap().summary, "bare fence");
    }

    #[test]
    fn test_object_embedded_in_prose_is_salvaged() {
        let text = "Here is the analysis:\n{\"summary\": \"salvaged\", \"issues\": [\"x\"]}\nHope this helps!";
        let result = resolve(&raw(text)).unwrap();
        assert_eq!(result.summary, "salvaged");
        assert_eq!(result.issues, vec!["x"]);
    }

    #[test]
    fn test_wrong_types_fall_back_per_field() {
        let text = json!({
            "summary": 12,
            "strengths": "should be a list",
            "issues": ["kept", 3, null, "also kept"],
            "suggestions": null,
            "improvedAd": "still fine"
        })
        .to_string();
        let result = resolve(&raw(&text)).unwrap();
        assert_eq!(result.summary, "");
        assert!(result.strengths.is_empty());
        assert_eq!(result.issues, vec!["kept", "also kept"]);
        assert!(result.suggestions.is_empty());
        assert_eq!(result.improved_ad, "still fine");
        assert_eq!(result.score, None);
    }

    #[test]
    fn test_score_null_or_non_object_is_none() {
        let result = resolve(&raw(r#"{"score": null}"#)).unwrap();
        assert_eq!(result.score, None);
        let result = resolve(&raw(r#"{"score": 80}"#)).unwrap();
        assert_eq!(result.score, None);
    }

    #[test]
    fn test_partial_score_object_is_kept() {
        let text = r#"{"score": {"overall": 75, "clarity": "high", "structure": null}}"#;
        let score = resolve(&raw(text)).unwrap().score.unwrap();
        assert_eq!(score.overall, Some(Number::from(75)));
        assert_eq!(score.clarity, None);
        assert_eq!(score.attractiveness, None);
        assert_eq!(score.structure, None);
        assert_eq!(score.social_media_effectiveness, None);
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let text = r#"{"summary": "s", "confidence": 0.9, "score": {"overall": 50, "tone": 10}}"#;
        let result = resolve(&raw(text)).unwrap();
        assert_eq!(result.summary, "s");
        assert_eq!(result.score.unwrap().overall, Some(Number::from(50)));
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }
}
