//! Itinerary planner chat.
//!
//! [`PlannerChat`] owns at most one [`ChatSession`] and forwards user turns to
//! an [`LlmDriver`]. A failed call drops the session, so the next call starts
//! from an empty history.

mod session;

pub use session::{ChatSession, system_instruction};

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::llm::{LlmDriver, LlmError};
use crate::prefs::Language;

/// A turn that did not produce a model reply.
#[derive(Debug, thiserror::Error)]
#[error("planner turn failed: {reason}")]
pub struct ChatFailure {
    #[source]
    reason: LlmError,
}

impl ChatFailure {
    /// Message shown to the user in place of a reply.
    pub const APOLOGY: &'static str =
        "I'm sorry, I encountered an error. Let's try again. What kind of trip are you thinking of?";

    #[must_use]
    pub fn apology(&self) -> &'static str {
        Self::APOLOGY
    }

    /// Underlying driver error.
    #[must_use]
    pub fn reason(&self) -> &LlmError {
        &self.reason
    }
}

/// Chat handle bound to one driver.
pub struct PlannerChat {
    driver: Arc<dyn LlmDriver>,
    session: Option<ChatSession>,
}

impl std::fmt::Debug for PlannerChat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlannerChat")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl PlannerChat {
    #[must_use]
    pub fn new(driver: Arc<dyn LlmDriver>) -> Self {
        Self {
            driver,
            session: None,
        }
    }

    /// The live session, creating one for `language` if needed.
    ///
    /// A live session bound to another language is replaced.
    pub fn ensure_session(&mut self, language: Language) -> &ChatSession {
        if let Some(current) = self.session.as_ref().filter(|s| s.language() != language) {
            debug!(
                session_id = %current.id(),
                from = %current.language(),
                to = %language,
                "Language changed, discarding planner session"
            );
            self.session = None;
        }

        self.session.get_or_insert_with(|| {
            let session = ChatSession::new(language);
            info!(
                name: "planner.session.created",
                session_id = %session.id(),
                language = %language,
                "Planner session created"
            );
            session
        })
    }

    /// Drop the live session, if any.
    pub fn reset(&mut self) {
        if let Some(session) = self.session.take() {
            debug!(session_id = %session.id(), "Planner session reset");
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&ChatSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn session_id(&self) -> Option<Uuid> {
        self.session.as_ref().map(ChatSession::id)
    }

    /// Send `user_text` as the next turn and return the raw reply.
    ///
    /// # Errors
    ///
    /// Returns [`ChatFailure`] if the driver fails. The session is discarded.
    pub async fn send(&mut self, user_text: &str, language: Language) -> Result<String, ChatFailure> {
        let request = self.ensure_session(language).request(user_text);

        match self.driver.generate(request).await {
            Ok(reply) => {
                if let Some(session) = self.session.as_mut() {
                    session.record(user_text, &reply);
                }
                Ok(reply)
            }
            Err(reason) => {
                warn!(
                    name: "planner.send.failed",
                    session_id = ?self.session_id(),
                    error = %reason,
                    "Planner call failed, discarding session"
                );
                self.session = None;
                Err(ChatFailure { reason })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::scripted::ScriptedDriver;

    #[test]
    fn test_ensure_session_is_idempotent_per_language() {
        let mut chat = PlannerChat::new(ScriptedDriver::new(vec![]));
        let first = chat.ensure_session(Language::English).id();
        assert_eq!(chat.ensure_session(Language::English).id(), first);

        let krio = chat.ensure_session(Language::Krio);
        assert_ne!(krio.id(), first);
        assert_eq!(krio.language(), Language::Krio);
    }

    #[test]
    fn test_reset_drops_session() {
        let mut chat = PlannerChat::new(ScriptedDriver::new(vec![]));
        chat.ensure_session(Language::French);
        chat.reset();
        assert!(chat.session().is_none());
        chat.reset();
    }

    #[tokio::test]
    async fn test_successful_turns_accumulate_history() {
        let driver = ScriptedDriver::new(vec![
            Ok("Where would you like to go?".to_string()),
            Ok("Sure, tell me more!".to_string()),
        ]);
        let mut chat = PlannerChat::new(Arc::clone(&driver) as Arc<dyn LlmDriver>);

        chat.send("Hi", Language::English).await.unwrap();
        let reply = chat.send("Bo", Language::English).await.unwrap();
        assert_eq!(reply, "Sure, tell me more!");

        let requests = driver.requests();
        assert_eq!(requests[0].contents.len(), 1);
        assert_eq!(requests[1].contents.len(), 3);
        assert_eq!(chat.session().unwrap().history().len(), 4);
    }

    #[tokio::test]
    async fn test_failure_discards_session_and_next_send_starts_fresh() {
        let driver = ScriptedDriver::new(vec![
            Ok("Tell me more.".to_string()),
            Err(LlmError::Blocked("SAFETY".to_string())),
            Ok("Fresh start".to_string()),
        ]);
        let mut chat = PlannerChat::new(Arc::clone(&driver) as Arc<dyn LlmDriver>);

        chat.send("Plan a trip", Language::English).await.unwrap();
        let before = chat.session_id().unwrap();

        let failure = chat.send("Bo", Language::English).await.unwrap_err();
        assert_eq!(failure.apology(), ChatFailure::APOLOGY);
        assert!(matches!(failure.reason(), LlmError::Blocked(_)));
        assert!(chat.session().is_none());

        chat.send("Bo again", Language::English).await.unwrap();
        assert_ne!(chat.session_id().unwrap(), before);
        assert_eq!(driver.requests()[2].contents.len(), 1);
    }

    #[tokio::test]
    async fn test_language_change_before_send_uses_new_session() {
        let driver = ScriptedDriver::new(vec![Ok("a".to_string()), Ok("b".to_string())]);
        let mut chat = PlannerChat::new(Arc::clone(&driver) as Arc<dyn LlmDriver>);

        chat.send("hello", Language::English).await.unwrap();
        let english = chat.session_id().unwrap();
        chat.send("bonjour", Language::French).await.unwrap();
        assert_ne!(chat.session_id().unwrap(), english);

        let requests = driver.requests();
        assert_eq!(requests[1].contents.len(), 1);
        assert!(
            requests[1].system_instruction.text().contains("You MUST respond in French.")
        );
    }
}
