//! Answer shapes requested from the generative service.
//!
//! These structs are both the declared output schema (via `JsonSchema`) and
//! the decoding target (via `Deserialize`). Fields the client fills in
//! locally, such as identity, status and timestamps, are not part of them.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{PostSlide, Segment, ThemeSuggestion};

/// A short-video script as answered by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScriptResponse {
    pub title: String,
    pub hook: Segment,

    /// Retention blocks in recording order
    #[schemars(length(min = 1))]
    pub development: Vec<Segment>,

    pub cta: Segment,
    pub tips: Vec<String>,
    pub reach_tips: Vec<String>,
    pub next_themes: Vec<ThemeSuggestion>,
    pub duration_seconds: u32,
}

/// A single-image post as answered by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub title: String,
    pub caption: String,
    pub hashtags: Vec<String>,
    pub music_suggestions: Vec<String>,
    pub next_image_tips: Vec<String>,
}

/// A carousel: the post fields plus its numbered slides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CarouselResponse {
    #[serde(flatten)]
    pub post: PostResponse,

    #[schemars(length(min = 1, max = 10))]
    pub slides: Vec<PostSlide>,
}
