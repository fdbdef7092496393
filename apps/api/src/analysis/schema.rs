//! Schema Contract: the canonical analysis record and its machine-checkable schema.
//!
//! Field names live here once and are shared by the prompt builder (prose schema),
//! the model invoker (strict JSON schema) and the response resolver.

use serde::{Deserialize, Serialize};
use serde_json::{json, Number, Value};

/// Name under which the strict schema is registered with the provider.
pub const SCHEMA_NAME: &str = "job_ad_analysis";

pub const FIELD_SUMMARY: &str = "summary";
pub const FIELD_STRENGTHS: &str = "strengths";
pub const FIELD_ISSUES: &str = "issues";
pub const FIELD_SUGGESTIONS: &str = "suggestions";
pub const FIELD_IMPROVED_AD: &str = "improvedAd";
pub const FIELD_SCORE: &str = "score";

pub const SCORE_OVERALL: &str = "overall";
pub const SCORE_CLARITY: &str = "clarity";
pub const SCORE_ATTRACTIVENESS: &str = "attractiveness";
pub const SCORE_STRUCTURE: &str = "structure";
pub const SCORE_SOCIAL_MEDIA: &str = "social_media_effectiveness";

pub const SCORE_FIELDS: &[&str] = &[
    SCORE_OVERALL,
    SCORE_CLARITY,
    SCORE_ATTRACTIVENESS,
    SCORE_STRUCTURE,
    SCORE_SOCIAL_MEDIA,
];

/// The canonical analysis record. Every field is always serialized;
/// unresolvable values are empty, never omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: String,
    pub strengths: Vec<String>,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
    pub improved_ad: String,
    pub score: Option<ScoreCard>,
}

/// 0–100 quality scores. Each one is independently optional.
/// Kept as `Number` so `64` stays `64` and `64.5` stays `64.5` on the way out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub overall: Option<Number>,
    pub clarity: Option<Number>,
    pub attractiveness: Option<Number>,
    pub structure: Option<Number>,
    pub social_media_effectiveness: Option<Number>,
}

/// Strict-mode JSON schema: every property required, no additional properties,
/// nullability expressed through `["<type>", "null"]`.
pub fn strict_json_schema() -> Value {
    let score_properties: serde_json::Map<String, Value> = SCORE_FIELDS
        .iter()
        .map(|name| {
            (
                name.to_string(),
                json!({ "type": ["number", "null"], "minimum": 0, "maximum": 100 }),
            )
        })
        .collect();

    let string_list = json!({ "type": "array", "items": { "type": "string" } });

    json!({
        "type": "object",
        "properties": {
            FIELD_SUMMARY: { "type": "string" },
            FIELD_STRENGTHS: string_list,
            FIELD_ISSUES: string_list,
            FIELD_SUGGESTIONS: string_list,
            FIELD_IMPROVED_AD: { "type": "string" },
            FIELD_SCORE: {
                "type": ["object", "null"],
                "properties": score_properties,
                "required": SCORE_FIELDS,
                "additionalProperties": false
            }
        },
        "required": [
            FIELD_SUMMARY,
            FIELD_STRENGTHS,
            FIELD_ISSUES,
            FIELD_SUGGESTIONS,
            FIELD_IMPROVED_AD,
            FIELD_SCORE
        ],
        "additionalProperties": false
    })
}
