use serde::{Deserialize, Serialize};

use super::AiError;

/// Text/vision model client abstraction (allows mocking).
pub trait LlmClient: Send + Sync {
    /// Single-turn text generation.
    fn generate(&self, model: &str, prompt: &str, system: Option<&str>)
        -> Result<String, AiError>;

    /// Single-turn chat with base64-encoded images attached to the user message.
    fn chat_with_images(
        &self,
        model: &str,
        prompt: &str,
        images: &[String],
        system: Option<&str>,
    ) -> Result<String, AiError>;

    fn list_models(&self) -> Result<Vec<String>, AiError>;

    fn is_model_available(&self, model: &str) -> Result<bool, AiError> {
        Ok(self
            .list_models()?
            .iter()
            .any(|installed| model_matches(installed, model)))
    }
}

/// `medgemma` matches `medgemma:4b`; `med` does not.
pub fn model_matches(installed: &str, wanted: &str) -> bool {
    match installed.strip_prefix(wanted) {
        Some("") => true,
        Some(tag) => tag.starts_with(':') && !wanted.contains(':'),
        None => false,
    }
}

/// Result of recognising a medication package from a photo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationIdentification {
    #[serde(default)]
    pub name: String,
    /// Package-insert style summary (indications, dosage, precautions).
    #[serde(default)]
    pub description: String,
}
