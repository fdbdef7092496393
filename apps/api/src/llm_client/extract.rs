//! Locates the generated text inside a provider reply.
//!
//! Providers place the text in different spots depending on API flavour
//! (chat completions, responses API, parsed structured output). Each strategy
//! below is a pure function over the reply JSON; they are tried in order and the
//! first one yielding non-empty text wins.

use serde_json::Value;

type Strategy = fn(&Value) -> Option<String>;

const STRATEGIES: &[Strategy] = &[
    top_level_output_text,
    responses_output_content,
    chat_message_content,
    chat_message_parsed,
];

/// Returns the first non-empty text found by the extraction strategies.
pub fn extract_output_text(reply: &Value) -> Option<String> {
    STRATEGIES
        .iter()
        .filter_map(|strategy| strategy(reply))
        .find(|text| !text.trim().is_empty())
}

fn top_level_output_text(reply: &Value) -> Option<String> {
    reply.get("output_text")?.as_str().map(String::from)
}

/// Responses API: `output[].content[]` blocks with a `text` field.
fn responses_output_content(reply: &Value) -> Option<String> {
    let text: String = reply
        .get("output")?
        .as_array()?
        .iter()
        .filter_map(|item| item.get("content").and_then(Value::as_array))
        .flatten()
        .filter(|block| {
            block
                .get("type")
                .and_then(Value::as_str)
                .map_or(true, |t| t == "output_text" || t == "text")
        })
        .filter_map(|block| block.get("text").and_then(Value::as_str))
        .collect();
    Some(text)
}

fn chat_message_content(reply: &Value) -> Option<String> {
    reply
        .pointer("/choices/0/message/content")?
        .as_str()
        .map(String::from)
}

/// Some SDK-style proxies return the already-parsed object instead of a string.
fn chat_message_parsed(reply: &Value) -> Option<String> {
    let parsed = reply.pointer("/choices/0/message/parsed")?;
    if parsed.is_null() {
        return None;
    }
    serde_json::to_string(parsed).ok()
}
