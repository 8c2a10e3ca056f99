//! Image-based social posts (single image or carousel).

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::artifact::{ArtifactId, ContentStatus};

/// Maximum number of images (and slides) in a carousel
pub const MAX_CAROUSEL_IMAGES: usize = 10;

/// An image carried inline as a base64 payload plus its MIME type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAttachment {
    pub mime_type: String,

    /// Base64 payload without any `data:` URL prefix
    pub data: String,
}

impl ImageAttachment {
    /// Encode raw image bytes
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Parse a `data:<mime>;base64,<payload>` URL
    pub fn from_data_url(url: &str) -> Option<Self> {
        let rest = url.strip_prefix("data:")?;
        let (header, payload) = rest.split_once(',')?;
        let mime_type = header.strip_suffix(";base64")?;

        if mime_type.is_empty() || payload.is_empty() {
            return None;
        }

        Some(Self {
            mime_type: mime_type.to_string(),
            data: payload.to_string(),
        })
    }

    /// Render back to a `data:` URL for display surfaces
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Guess an image MIME type from a file extension
    pub fn mime_from_extension(ext: &str) -> Option<&'static str> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some("image/jpeg"),
            "png" => Some("image/png"),
            "webp" => Some("image/webp"),
            "gif" => Some("image/gif"),
            "heic" => Some("image/heic"),
            _ => None,
        }
    }
}

/// One slide of a carousel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostSlide {
    /// 1-indexed, matches the slide's position
    #[schemars(range(min = 1, max = 10))]
    pub slide_number: u32,
    pub text: String,
    pub visual_advice: String,
}

/// A complete, validated social post.
///
/// `caption` and `hashtags` are stored exactly as generated. Sanitizing them
/// for a particular publishing surface is the caller's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostArtifact {
    pub id: ArtifactId,
    pub title: String,

    /// Always the first input image
    pub primary_image: ImageAttachment,
    pub all_images: Vec<ImageAttachment>,
    pub is_carousel: bool,

    /// Non-empty iff `is_carousel`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slides: Vec<PostSlide>,

    pub caption: String,
    pub hashtags: Vec<String>,
    pub music_suggestions: Vec<String>,
    pub next_image_tips: Vec<String>,
    pub status: ContentStatus,
    pub is_used: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_encodes_base64() {
        let image = ImageAttachment::from_bytes("image/png", b"hello");
        assert_eq!(image.data, "aGVsbG8=");
        assert_eq!(image.to_data_url(), "data:image/png;base64,aGVsbG8=");
    }

    #[test]
    fn test_from_data_url_strips_prefix() {
        let image = ImageAttachment::from_data_url("data:image/jpeg;base64,AAAA").unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.data, "AAAA");

        assert!(ImageAttachment::from_data_url("AAAA").is_none());
        assert!(ImageAttachment::from_data_url("data:image/jpeg,AAAA").is_none());
        assert!(ImageAttachment::from_data_url("data:;base64,AAAA").is_none());
    }

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(ImageAttachment::mime_from_extension("JPG"), Some("image/jpeg"));
        assert_eq!(ImageAttachment::mime_from_extension("png"), Some("image/png"));
        assert_eq!(ImageAttachment::mime_from_extension("txt"), None);
    }
}
