//! Structured generation client.
//!
//! Every call follows the same three stages: invoke the backend, parse the
//! text as JSON, validate it against the declared schema. Only a response
//! that passes all three is materialized into an artifact; nothing partial
//! is ever returned and nothing is persisted here. Saving the result is a
//! separate, explicit call on the library store.

use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::adapters::{BackendError, GenerationRequest, GenerativeBackend};
use crate::config::GeminiSettings;
use crate::domain::{
    ArtifactId, ContentStatus, ImageAttachment, PostArtifact, PostSlide, Profile, ScriptArtifact,
    ScriptLength,
};
use crate::error::GenerationError;

use super::prompt::{compose_post_prompt, compose_script_prompt, PromptSpec};
use super::response::{CarouselResponse, PostResponse, ScriptResponse};

/// Which model serves which artifact kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelection {
    pub script_model: String,
    pub post_model: String,
}

impl From<&GeminiSettings> for ModelSelection {
    fn from(settings: &GeminiSettings) -> Self {
        Self {
            script_model: settings.script_model.clone(),
            post_model: settings.post_model.clone(),
        }
    }
}

/// Turns user intent into validated artifacts via a generative backend
pub struct ContentGenerator {
    backend: Arc<dyn GenerativeBackend>,
    models: ModelSelection,
}

impl ContentGenerator {
    /// Create a generator over any backend
    pub fn new(backend: Arc<dyn GenerativeBackend>, models: ModelSelection) -> Self {
        Self { backend, models }
    }

    /// Generate a short-video script for a topic
    #[instrument(skip(self, topic, profile), fields(backend = %self.backend.name()))]
    pub async fn generate_script(
        &self,
        topic: &str,
        profile: &Profile,
        length: ScriptLength,
    ) -> Result<ScriptArtifact, GenerationError> {
        let spec = compose_script_prompt(topic, profile, length)?;
        let value = self
            .invoke(&spec, &self.models.script_model, Vec::new())
            .await?;
        let response: ScriptResponse = decode(value)?;

        let script = ScriptArtifact {
            id: ArtifactId::generate(),
            title: response.title,
            hook: response.hook,
            development_blocks: response.development,
            closing_cta: response.cta,
            recording_tips: response.tips,
            reach_tips: response.reach_tips,
            next_themes: response.next_themes,
            duration_seconds: response.duration_seconds,
            requested_length: length,
            status: ContentStatus::Ready,
            is_used: false,
            created_at: Utc::now(),
        };

        info!(
            id = %script.id,
            blocks = script.development_blocks.len(),
            duration = script.duration_seconds,
            "Script generated"
        );
        Ok(script)
    }

    /// Generate a single-image post or a carousel from a set of images
    #[instrument(
        skip(self, images, profile, user_context),
        fields(backend = %self.backend.name(), images = images.len())
    )]
    pub async fn generate_from_images(
        &self,
        images: &[ImageAttachment],
        profile: &Profile,
        user_context: &str,
        is_carousel: bool,
    ) -> Result<PostArtifact, GenerationError> {
        let spec = compose_post_prompt(images, profile, user_context, is_carousel)?;
        let mut value = self
            .invoke(&spec, &self.models.post_model, images.to_vec())
            .await?;

        if !is_carousel {
            if let Some(discarded) = value.as_object_mut().and_then(|o| o.remove("slides")) {
                debug!(?discarded, "Discarding slides returned for a single post");
            }
        }

        let (response, slides) = if is_carousel {
            let carousel: CarouselResponse = decode(value)?;
            (carousel.post, order_slides(carousel.slides)?)
        } else {
            (decode::<PostResponse>(value)?, Vec::new())
        };

        let post = PostArtifact {
            id: ArtifactId::generate(),
            title: response.title,
            primary_image: images[0].clone(),
            all_images: images.to_vec(),
            is_carousel,
            slides,
            caption: response.caption,
            hashtags: response.hashtags,
            music_suggestions: response.music_suggestions,
            next_image_tips: response.next_image_tips,
            status: ContentStatus::Ready,
            is_used: false,
            created_at: Utc::now(),
        };

        info!(id = %post.id, slides = post.slides.len(), "Post generated");
        Ok(post)
    }

    /// Invoke, parse and validate; returns the conforming JSON value
    async fn invoke(
        &self,
        spec: &PromptSpec,
        model: &str,
        images: Vec<ImageAttachment>,
    ) -> Result<Value, GenerationError> {
        let request = GenerationRequest {
            model: model.to_string(),
            prompt: spec.instruction.clone(),
            images,
            response_schema: spec.schema.as_json().clone(),
        };

        debug!(%model, kind = %spec.kind, "Requesting structured generation");

        let text = self.backend.generate(&request).await.map_err(|e| {
            let backend = e.downcast_ref::<BackendError>();
            let status = backend.and_then(|b| b.status);
            warn!(error = %e, ?status, "Generative service call failed");
            if backend.is_some_and(|b| !b.is_transient()) {
                GenerationError::Rejected(format!("{:#}", e))
            } else {
                GenerationError::ServiceUnavailable(format!("{:#}", e))
            }
        })?;

        let value = parse_json(&text)?;

        let violations = spec.schema.validate(&value);
        if !violations.is_empty() {
            warn!(fields = ?violations, "Generated content violates schema");
            return Err(GenerationError::SchemaViolation { fields: violations });
        }

        Ok(value)
    }
}

/// Parse response text, unwrapping a Markdown code fence if present
pub fn parse_json(text: &str) -> Result<Value, GenerationError> {
    let body = strip_code_fence(text.trim());
    serde_json::from_str(body).map_err(|e| {
        warn!(error = %e, length = text.len(), "Generated content is not JSON");
        GenerationError::MalformedResponse(e.to_string())
    })
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string (e.g. "json") on the opening line
    let rest = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, GenerationError> {
    serde_json::from_value(value).map_err(|e| GenerationError::violation(format!("response ({})", e)))
}

/// Sort slides by number and require the numbers to be exactly 1..=n
fn order_slides(mut slides: Vec<PostSlide>) -> Result<Vec<PostSlide>, GenerationError> {
    if slides.is_empty() {
        return Err(GenerationError::violation("slides"));
    }

    slides.sort_by_key(|s| s.slide_number);

    let contiguous = slides
        .iter()
        .enumerate()
        .all(|(i, s)| s.slide_number as usize == i + 1);
    if !contiguous {
        let numbers: Vec<u32> = slides.iter().map(|s| s.slide_number).collect();
        warn!(?numbers, "Slide numbers are not a 1..n sequence");
        return Err(GenerationError::violation("slides"));
    }

    Ok(slides)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slide(n: u32) -> PostSlide {
        PostSlide {
            slide_number: n,
            text: format!("slide {}", n),
            visual_advice: String::new(),
        }
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_json_rejects_prose() {
        let err = parse_json("Claro! Aqui está o roteiro.").unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(_)));
        assert!(parse_json("```json\n{\"title\": \"x\"}\n```").is_ok());
    }

    #[test]
    fn test_order_slides_sorts_out_of_order_input() {
        let ordered = order_slides(vec![slide(3), slide(1), slide(2)]).unwrap();
        let numbers: Vec<u32> = ordered.iter().map(|s| s.slide_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_order_slides_rejects_gaps_duplicates_and_empty() {
        assert!(order_slides(vec![slide(1), slide(3)]).is_err());
        assert!(order_slides(vec![slide(1), slide(1)]).is_err());
        assert!(order_slides(vec![slide(2)]).is_err());
        assert!(order_slides(Vec::new()).is_err());
    }
}
