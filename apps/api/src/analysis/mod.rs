// Job advertisement analysis pipeline.
// Implements: input normalization, prompt building, schema contract, response resolution.
// All model calls go through llm_client — no direct provider calls here.

pub mod handlers;
pub mod input;
pub mod pipeline;
pub mod prompts;
pub mod resolver;
pub mod schema;
