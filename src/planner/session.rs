//! A single-language conversation with the remote planner.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::itinerary::response_schema;
use crate::llm::{Content, GenerateRequest, GenerationConfig};
use crate::prefs::Language;

/// MIME type the planner always asks for.
const RESPONSE_MIME_TYPE: &str = "application/json";

/// Build the fixed system instruction for `language`.
#[must_use]
pub fn system_instruction(language: Language) -> String {
    format!(
        "You are Vayama, an expert travel assistant. Your goal is to create detailed, helpful, and budget-conscious travel plans.\n\
         - First, have a brief, friendly conversation to understand the user's needs. Ask clarifying questions if needed.\n\
         - Once you have enough information, respond with a complete travel itinerary.\n\
         - You MUST respond in {language}.\n\
         - When generating a travel plan, you MUST respond with only a JSON object that strictly follows this schema: {schema}. \
         Do not add any conversational text or markdown formatting around the JSON object.\n\
         - If the user's request is not for a travel plan, have a normal conversation without returning JSON.",
        schema = response_schema()
    )
}

/// Conversation state replayed to the stateless endpoint on every turn.
///
/// A session is bound to one language for its whole life.
#[derive(Debug, Clone)]
pub struct ChatSession {
    id: Uuid,
    language: Language,
    system_instruction: String,
    response_schema: serde_json::Value,
    history: Vec<Content>,
    created_at: DateTime<Utc>,
}

impl ChatSession {
    /// Start an empty session for `language`.
    #[must_use]
    pub fn new(language: Language) -> Self {
        Self {
            id: Uuid::new_v4(),
            language,
            system_instruction: system_instruction(language),
            response_schema: response_schema(),
            history: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    #[must_use]
    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    /// Completed turns, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Content] {
        &self.history
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Request that sends `user_text` after the recorded history.
    pub(crate) fn request(&self, user_text: &str) -> GenerateRequest {
        let mut contents = Vec::with_capacity(self.history.len() + 1);
        contents.extend(self.history.iter().cloned());
        contents.push(Content::user(user_text));

        GenerateRequest {
            system_instruction: Content::instruction(self.system_instruction.clone()),
            contents,
            generation_config: GenerationConfig {
                response_mime_type: RESPONSE_MIME_TYPE.to_string(),
                response_schema: self.response_schema.clone(),
            },
        }
    }

    /// Record a completed exchange.
    pub(crate) fn record(&mut self, user_text: &str, reply: &str) {
        self.history.push(Content::user(user_text));
        self.history.push(Content::model(reply));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Role;

    #[test]
    fn test_instruction_names_language_and_schema() {
        let text = system_instruction(Language::NigerianPidgin);
        assert!(text.contains("You MUST respond in Nigerian Pidgin."));
        assert!(text.contains(r#""booking_type""#));
        assert!(text.contains(r#""required":["day","title","activities"]"#));
    }

    #[test]
    fn test_request_replays_history_then_new_turn() {
        let mut session = ChatSession::new(Language::English);
        session.record("Plan me a weekend in Bo", "How many people?");

        let req = session.request("Two");
        assert_eq!(req.contents.len(), 3);
        assert_eq!(req.contents[0].role, Some(Role::User));
        assert_eq!(req.contents[1].role, Some(Role::Model));
        assert_eq!(req.contents[2].text(), "Two");
        assert_eq!(req.generation_config.response_mime_type, "application/json");
        assert!(req.system_instruction.role.is_none());
    }
}
