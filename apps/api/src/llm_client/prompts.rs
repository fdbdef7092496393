// Shared prompt fragments. Feature modules keep their own prompts.rs and reuse these.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_INSTRUCTION: &str = "You MUST respond with a single valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Opening and closing markers around untrusted content in user messages.
pub const CONTENT_BEGIN: &str = "<<<BEGIN CONTENT>>>";
pub const CONTENT_END: &str = "<<<END CONTENT>>>";
