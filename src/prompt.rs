//! Prompt construction for the generation endpoints.
//!
//! Builders are pure functions of the validated request, so an identical
//! request always produces an identical instruction set. The clue
//! instructions carry the one hard rule of the game: the animal's name — in
//! any form — must never appear in a clue.

use crate::types::{GenerationRequest, Language, Message};

/// Sampling temperature for `/chat` passthrough.
pub const CHAT_TEMPERATURE: f32 = 0.7;

/// Sampling temperature for clue generation.
pub const CLUES_TEMPERATURE: f32 = 0.5;

/// Output cap for clue generation.
pub const CLUES_MAX_TOKENS: u32 = 400;

/// Sampling temperature for fact generation.
pub const FACTS_TEMPERATURE: f32 = 0.6;

/// Output cap for fact generation.
pub const FACTS_MAX_TOKENS: u32 = 300;

/// Build the system + user instruction pair for clue generation.
pub fn clue_messages(request: &GenerationRequest) -> Vec<Message> {
    let language_line = format!("- Language: {}", request.language.as_str());
    let system = [
        "You write 5 clues for a Swedish wildlife guessing game.",
        "Rules:",
        "- Output STRICT JSON matching this schema: {\"clues\": [\"string\", \"string\", \"string\", \"string\", \"string\"]}",
        "- Clues 1→5 go from hardest to easiest",
        language_line.as_str(),
        "- NEVER reveal the animal name directly in any clue",
        "- NEVER say \"it is called\", \"its name is\", \"in Swedish it is\", etc.",
        "- NEVER mention the Swedish name, common name, or scientific name",
        "- Focus on physical characteristics, habitat, behavior, diet, size, etc.",
        "- Clue 5 can be more specific but still avoid the exact name",
        "- Make clues educational and interesting about the animal",
    ]
    .join("\n");

    let user = format!(
        "Create 5 clues for this animal (do NOT mention its name):\n\
         - Swedish Name: {}\n\
         - Scientific Name: {}\n\
         - Description: {}\n\
         \n\
         Write clues about its appearance, habitat, behavior, diet, size, etc.\n\
         Make them educational and progressively easier.\n\
         \n\
         Good examples:\n\
         - \"This animal has a thick winter coat\"\n\
         - \"It lives in forests and hunts at night\"\n\
         - \"It has sharp claws and excellent hearing\"\n\
         \n\
         Bad examples (NEVER do this):\n\
         - \"In Swedish it's called iller\"\n\
         - \"Its name is...\"\n\
         - \"It is known as...\"\n\
         \n\
         Return ONLY a JSON array of 5 strings.",
        request.animal_name,
        request.scientific_name.as_deref().unwrap_or("Unknown"),
        request.description.as_deref().unwrap_or("No description"),
    );

    vec![Message::system(system), Message::user(user)]
}

/// Build the system + user instruction pair for fact generation.
///
/// Unlike clues, facts are shown after the round is over, so naming the
/// animal is encouraged.
pub fn fact_messages(request: &GenerationRequest) -> Vec<Message> {
    let language_line = format!("- Language: {}", request.language.as_str());
    let system = [
        "You generate 3-5 interesting and verifiable facts about a specific animal for a wildlife guessing game result screen.",
        "Rules:",
        "- Output STRICT JSON matching this schema: {\"facts\": [\"string\", \"string\", \"string\", ...]}",
        language_line.as_str(),
        "- Facts should be interesting, concise, and educational.",
        "- You CAN and SHOULD mention the animal's name.",
        "- Focus on unique characteristics, behavior, habitat, conservation status, or surprising details.",
        "- Avoid generic statements.",
    ]
    .join("\n");

    let user = format!(
        "Generate 3-5 interesting facts about this animal:\n\
         - Name: {}\n\
         - Scientific Name: {}\n\
         - Description: {}\n\
         \n\
         Return ONLY a JSON array of 3-5 strings.",
        request.animal_name,
        request.scientific_name.as_deref().unwrap_or("Unknown"),
        request.description.as_deref().unwrap_or("No description"),
    );

    vec![Message::system(system), Message::user(user)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(language: Language) -> GenerationRequest {
        GenerationRequest {
            animal_name: "iller".to_string(),
            scientific_name: Some("Mustela putorius".to_string()),
            description: None,
            language,
        }
    }

    #[test]
    fn clue_messages_are_system_then_user() {
        let messages = clue_messages(&request(Language::Swedish));
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, crate::types::Role::System);
        assert_eq!(messages[1].role, crate::types::Role::User);
    }

    #[test]
    fn clue_system_carries_language_and_name_ban() {
        let messages = clue_messages(&request(Language::English));
        let system = &messages[0].content;
        assert!(system.contains("Language: English"));
        assert!(system.contains("NEVER reveal the animal name"));
    }

    #[test]
    fn clue_user_carries_subject_fields() {
        let messages = clue_messages(&request(Language::Swedish));
        let user = &messages[1].content;
        assert!(user.contains("iller"));
        assert!(user.contains("Mustela putorius"));
        assert!(user.contains("No description"));
    }

    #[test]
    fn fact_system_permits_the_name() {
        let messages = fact_messages(&request(Language::Swedish));
        assert!(messages[0].content.contains("CAN and SHOULD mention"));
        assert!(messages[0].content.contains("Language: Swedish"));
    }

    #[test]
    fn identical_requests_build_identical_prompts() {
        let a = clue_messages(&request(Language::Swedish));
        let b = clue_messages(&request(Language::Swedish));
        assert_eq!(a[0].content, b[0].content);
        assert_eq!(a[1].content, b[1].content);
    }
}
