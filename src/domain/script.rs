//! Short-video script artifacts.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::artifact::{ArtifactId, ContentStatus};

/// One beat of a script: what is said and what is shown while saying it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Segment {
    /// Line spoken to camera
    #[serde(rename = "text")]
    pub spoken_line: String,

    /// What the creator does on screen meanwhile
    #[serde(rename = "action")]
    pub visual_action: String,
}

impl Segment {
    pub fn new(spoken_line: impl Into<String>, visual_action: impl Into<String>) -> Self {
        Self {
            spoken_line: spoken_line.into(),
            visual_action: visual_action.into(),
        }
    }
}

/// A follow-up topic suggested by the generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ThemeSuggestion {
    pub title: String,
    pub reasoning: String,
}

/// Target length of a script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScriptLength {
    #[serde(rename = "Curto")]
    Short,

    #[serde(rename = "Médio")]
    Medium,

    #[serde(rename = "Longo")]
    Long,
}

impl ScriptLength {
    /// Pacing guidance handed to the generator
    pub fn description(&self) -> &'static str {
        match self {
            ScriptLength::Short => "menos de 30 segundos, extremamente direto e impactante",
            ScriptLength::Medium => "45-60 segundos, equilíbrio entre valor e detalhamento",
            ScriptLength::Long => {
                "mais de 90 segundos, narrativa profunda com ganchos de alta retenção emocional"
            }
        }
    }
}

impl std::fmt::Display for ScriptLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptLength::Short => write!(f, "Curto"),
            ScriptLength::Medium => write!(f, "Médio"),
            ScriptLength::Long => write!(f, "Longo"),
        }
    }
}

impl std::str::FromStr for ScriptLength {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "short" | "curto" => Ok(ScriptLength::Short),
            "medium" | "médio" | "medio" => Ok(ScriptLength::Medium),
            "long" | "longo" => Ok(ScriptLength::Long),
            _ => anyhow::bail!("Unknown script length: {}", s),
        }
    }
}

/// A complete, validated short-video script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptArtifact {
    pub id: ArtifactId,
    pub title: String,
    pub hook: Segment,

    /// Ordered beats; position k is rendered as "Bloco #k+1"
    pub development_blocks: Vec<Segment>,

    #[serde(rename = "closingCTA")]
    pub closing_cta: Segment,

    /// Usually 4 entries, but any count is accepted
    pub recording_tips: Vec<String>,
    pub reach_tips: Vec<String>,
    pub next_themes: Vec<ThemeSuggestion>,
    pub duration_seconds: u32,
    pub requested_length: ScriptLength,
    pub status: ContentStatus,
    pub is_used: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_parses_both_languages() {
        assert_eq!("short".parse::<ScriptLength>().unwrap(), ScriptLength::Short);
        assert_eq!("Médio".parse::<ScriptLength>().unwrap(), ScriptLength::Medium);
        assert_eq!("LONGO".parse::<ScriptLength>().unwrap(), ScriptLength::Long);
        assert!("epic".parse::<ScriptLength>().is_err());
    }

    #[test]
    fn test_segment_uses_generator_field_names() {
        let segment: Segment =
            serde_json::from_str(r#"{"text": "Pare tudo!", "action": "Olhar fixo"}"#).unwrap();
        assert_eq!(segment.spoken_line, "Pare tudo!");
        assert_eq!(segment.visual_action, "Olhar fixo");
    }
}
