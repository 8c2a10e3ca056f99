//! Creator profile collected by the onboarding flow.

use serde::{Deserialize, Serialize};

/// The creator's positioning, used to steer every generation request.
///
/// Owned by the caller; the generation pipeline only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,

    /// Content niche (e.g. "Produtividade")
    pub niche: String,

    /// What the creator wants from their content (e.g. "Construir autoridade")
    pub objective: String,

    /// Voice and tone the scripts should adopt
    #[serde(alias = "tone")]
    pub tone_description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default)]
    pub onboarding_completed: bool,
}

impl Profile {
    /// Create a profile with the fields generation depends on.
    ///
    /// The profile starts out with onboarding not yet completed.
    pub fn new(
        name: impl Into<String>,
        niche: impl Into<String>,
        objective: impl Into<String>,
        tone_description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            niche: niche.into(),
            objective: objective.into(),
            tone_description: tone_description.into(),
            email: None,
            onboarding_completed: false,
        }
    }

    /// Mark the onboarding flow as finished
    pub fn onboarded(mut self) -> Self {
        self.onboarding_completed = true;
        self
    }

    /// Set the contact email
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}
