//! Gemini REST adapter.
//!
//! Endpoint: POST {api_base}/models/{model}:generateContent
//! Auth: `x-goog-api-key` header

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{BackendError, GenerationRequest, GenerativeBackend};
use crate::config::GeminiSettings;

/// Gemini API client
pub struct GeminiBackend {
    api_key: String,
    api_base: String,
    client: reqwest::Client,
}

/// Response envelope from generateContent
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Error body returned with non-2xx statuses
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl GeminiBackend {
    /// Create a new client
    pub fn new(api_key: String, api_base: String) -> Self {
        Self {
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Create from resolved settings; fails when no API key is configured
    pub fn from_settings(settings: &GeminiSettings) -> Result<Self> {
        let api_key = settings
            .api_key
            .clone()
            .context("GEMINI_API_KEY (or API_KEY) environment variable required")?;
        Ok(Self::new(api_key, settings.api_base.clone()))
    }

    /// Build API URL
    fn api_url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.api_base, model)
    }

    /// Build the JSON request body: images first, then the instruction
    fn request_body(request: &GenerationRequest) -> Value {
        let mut parts: Vec<Value> = request
            .images
            .iter()
            .map(|image| {
                json!({
                    "inlineData": {
                        "mimeType": image.mime_type,
                        "data": image.data,
                    }
                })
            })
            .collect();
        parts.push(json!({ "text": request.prompt }));

        json!({
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseJsonSchema": request.response_schema,
            }
        })
    }

    /// Concatenate the text parts of the first candidate
    fn extract_text(envelope: GenerateContentResponse) -> Result<String> {
        if let Some(reason) = envelope.prompt_feedback.and_then(|f| f.block_reason) {
            anyhow::bail!("Gemini blocked the prompt: {}", reason);
        }

        let candidate = envelope
            .candidates
            .into_iter()
            .next()
            .context("Gemini returned no candidates")?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            anyhow::bail!(
                "Gemini returned an empty candidate (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            );
        }

        Ok(text)
    }
}

#[async_trait]
impl GenerativeBackend for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let url = self.api_url(&request.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::request_body(request))
            .send()
            .await
            .context("Failed to reach Gemini")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(envelope) => format!(
                    "{} {}",
                    envelope.error.status.unwrap_or_default(),
                    envelope.error.message
                ),
                Err(_) => body,
            };
            return Err(BackendError::new(
                Some(status.as_u16()),
                format!("Gemini error ({}): {}", status, detail.trim()),
            )
            .into());
        }

        let envelope: GenerateContentResponse = response
            .json()
            .await
            .context("Failed to parse Gemini response envelope")?;

        Self::extract_text(envelope)
    }
}
