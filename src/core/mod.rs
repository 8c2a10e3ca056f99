//! Structured generation pipeline.
//!
//! This module contains:
//! - Response: typed answer shapes, the single source of each schema
//! - Schema: derived declarations and post-hoc validation
//! - Prompt: instruction + schema composition per artifact kind
//! - Generator: invoke → parse → validate → materialize

pub mod generator;
pub mod prompt;
pub mod response;
pub mod schema;

// Re-export commonly used types
pub use generator::{parse_json, ContentGenerator, ModelSelection};
pub use prompt::{compose_post_prompt, compose_script_prompt, PromptSpec, HOOK_TEMPLATES};
pub use response::{CarouselResponse, PostResponse, ScriptResponse};
pub use schema::ResponseSchema;
