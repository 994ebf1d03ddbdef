//! Inbound request payloads and shape validation.
//!
//! Handlers accept untyped JSON and run it through [`validate_chat`] or
//! [`validate_generation`] before anything downstream sees it. Validation
//! never calls the provider; a failure maps to a 400 with a short
//! machine-checkable error code.

use serde::Deserialize;

use super::message::Message;
use crate::{Result, SkvaderError};

/// Language the client wants generated text in.
///
/// The wire format is the boolean `isEnglish`; the default language of the
/// game is Swedish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    Swedish,
    English,
}

impl Language {
    pub fn from_is_english(is_english: bool) -> Self {
        if is_english {
            Language::English
        } else {
            Language::Swedish
        }
    }

    /// Name of the language as spelled out in prompt instructions.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Swedish => "Swedish",
            Language::English => "English",
        }
    }
}

/// Raw `/chat` payload.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
}

/// Raw `/clues` and `/facts` payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateParams {
    #[serde(default)]
    pub animal_name: Option<String>,
    #[serde(default)]
    pub scientific_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_english: bool,
}

/// A validated generation request — the only input the orchestrator accepts
/// for `/clues` and `/facts`.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Subject name as the client sent it (trimmed). Never empty.
    pub animal_name: String,
    pub scientific_name: Option<String>,
    pub description: Option<String>,
    pub language: Language,
}

/// Validate a `/chat` payload.
///
/// The payload must contain an ordered sequence of role-tagged message
/// objects; anything else is `"messages required"`.
pub fn validate_chat(payload: serde_json::Value) -> Result<Vec<Message>> {
    let request: ChatRequest = serde_json::from_value(payload)
        .map_err(|_| SkvaderError::Validation("messages required"))?;
    Ok(request.messages)
}

/// Validate a `/clues` or `/facts` payload.
///
/// The payload must contain a non-empty string `animalName`; anything else
/// is `"animalName required"`. The secondary identifier, description and
/// language selector are optional.
pub fn validate_generation(payload: serde_json::Value) -> Result<GenerationRequest> {
    let params: GenerateParams = serde_json::from_value(payload)
        .map_err(|_| SkvaderError::Validation("animalName required"))?;

    let animal_name = params
        .animal_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or(SkvaderError::Validation("animalName required"))?
        .to_string();

    Ok(GenerationRequest {
        animal_name,
        scientific_name: params.scientific_name.filter(|s| !s.trim().is_empty()),
        description: params.description,
        language: Language::from_is_english(params.is_english),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chat_requires_message_array() {
        assert!(validate_chat(json!({"messages": []})).is_ok());
        assert!(validate_chat(json!({})).is_err());
        assert!(validate_chat(json!({"messages": "hello"})).is_err());
    }

    #[test]
    fn chat_parses_role_tagged_messages() {
        let messages = validate_chat(json!({
            "messages": [
                {"role": "system", "content": "be brief"},
                {"role": "user", "content": "hi"},
            ]
        }))
        .unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].content, "hi");
    }

    #[test]
    fn generation_requires_animal_name() {
        for payload in [
            json!({}),
            json!({"animalName": ""}),
            json!({"animalName": "   "}),
            json!({"animalName": 42}),
        ] {
            let err = validate_generation(payload).unwrap_err();
            assert_eq!(err.to_string(), "animalName required");
        }
    }

    #[test]
    fn generation_defaults_are_applied() {
        let request = validate_generation(json!({"animalName": "lo"})).unwrap();
        assert_eq!(request.animal_name, "lo");
        assert_eq!(request.scientific_name, None);
        assert_eq!(request.description, None);
        assert_eq!(request.language, Language::Swedish);
    }

    #[test]
    fn generation_honours_is_english() {
        let request =
            validate_generation(json!({"animalName": "lo", "isEnglish": true})).unwrap();
        assert_eq!(request.language, Language::English);
    }

    #[test]
    fn generation_trims_animal_name() {
        let request = validate_generation(json!({"animalName": "  iller "})).unwrap();
        assert_eq!(request.animal_name, "iller");
    }
}
