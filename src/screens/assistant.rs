//! AI travel assistant: the conversation log and its planner.
//!
//! The log lives as long as the screen is mounted. A submitted message
//! becomes a [`PendingTurn`] that the caller runs without holding any shell
//! lock; its [`TurnOutcome`] is applied afterwards, and only to the mount
//! that produced it.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;

use crate::itinerary::{AssistantReply, ItineraryPlan, PLAN_CAPTION, classify_reply};
use crate::llm::LlmDriver;
use crate::planner::{ChatFailure, PlannerChat};
use crate::prefs::Language;
use crate::screens::booking::BookingRequest;

pub const INTRO_GREETING: &str = "Hello! I'm your Vayama AI travel assistant. How can I help you plan your next trip today? For example, say \"Plan me a 3-day budget trip in Freetown under 500k Le.\"";

#[must_use]
pub fn language_greeting(language: Language) -> String {
    format!("Hello! My language is now set to {language}. How can I help you plan your trip?")
}

static NEXT_MOUNT_ID: AtomicU64 = AtomicU64::new(1);

fn next_mount_id() -> u64 {
    NEXT_MOUNT_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

/// One entry of the conversation log. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub itinerary: Option<ItineraryPlan>,
}

/// Which greeting opens a freshly mounted log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Greeting {
    Intro,
    LanguageSet,
}

/// A submitted message waiting for the planner.
pub struct PendingTurn {
    mount_id: u64,
    text: String,
    language: Language,
    planner: Arc<Mutex<PlannerChat>>,
}

impl fmt::Debug for PendingTurn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingTurn")
            .field("mount_id", &self.mount_id)
            .field("text", &self.text)
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl PendingTurn {
    #[must_use]
    pub fn mount_id(&self) -> u64 {
        self.mount_id
    }

    /// Call the planner. Always resolves.
    pub async fn run(self) -> TurnOutcome {
        let mut planner = self.planner.lock().await;
        let result = planner.send(&self.text, self.language).await;
        TurnOutcome {
            mount_id: self.mount_id,
            result,
        }
    }
}

/// Result of a [`PendingTurn`], tagged with the mount it belongs to.
#[derive(Debug)]
pub struct TurnOutcome {
    mount_id: u64,
    result: Result<String, ChatFailure>,
}

impl TurnOutcome {
    #[must_use]
    pub fn mount_id(&self) -> u64 {
        self.mount_id
    }
}

pub struct AssistantScreen {
    mount_id: u64,
    turns: Vec<ConversationTurn>,
    next_turn_id: u64,
    loading: bool,
    language: Language,
    driver: Arc<dyn LlmDriver>,
    planner: Arc<Mutex<PlannerChat>>,
}

impl fmt::Debug for AssistantScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssistantScreen")
            .field("mount_id", &self.mount_id)
            .field("turns", &self.turns.len())
            .field("loading", &self.loading)
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl AssistantScreen {
    #[must_use]
    pub fn mount(driver: Arc<dyn LlmDriver>, language: Language, greeting: Greeting) -> Self {
        let planner = Arc::new(Mutex::new(PlannerChat::new(Arc::clone(&driver))));
        let mut screen = Self {
            mount_id: next_mount_id(),
            turns: Vec::new(),
            next_turn_id: 0,
            loading: false,
            language,
            driver,
            planner,
        };
        screen.greet(greeting);
        screen
    }

    fn greet(&mut self, greeting: Greeting) {
        let text = match greeting {
            Greeting::Intro => INTRO_GREETING.to_string(),
            Greeting::LanguageSet => language_greeting(self.language),
        };
        self.push(text, Sender::Assistant, None);
    }

    fn push(&mut self, text: String, sender: Sender, itinerary: Option<ItineraryPlan>) {
        self.turns.push(ConversationTurn {
            id: self.next_turn_id,
            text,
            sender,
            itinerary,
        });
        self.next_turn_id += 1;
    }

    #[must_use]
    pub fn mount_id(&self) -> u64 {
        self.mount_id
    }

    #[must_use]
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// A planner call is in flight; input is disabled.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    /// The planner handle, shared with any in-flight turn.
    #[must_use]
    pub fn planner(&self) -> Arc<Mutex<PlannerChat>> {
        Arc::clone(&self.planner)
    }

    /// Append the user's message and hand back the work to run.
    ///
    /// Blank input and submissions during a pending call are ignored.
    pub fn begin_send(&mut self, text: &str) -> Option<PendingTurn> {
        if text.trim().is_empty() || self.loading {
            return None;
        }
        self.push(text.to_string(), Sender::User, None);
        self.loading = true;
        Some(PendingTurn {
            mount_id: self.mount_id,
            text: text.to_string(),
            language: self.language,
            planner: Arc::clone(&self.planner),
        })
    }

    /// Append the assistant's answer, or the apology, and re-enable input.
    pub fn complete(&mut self, result: Result<String, ChatFailure>) {
        match result {
            Ok(raw) => match classify_reply(&raw) {
                AssistantReply::Plan(plan) => {
                    self.push(PLAN_CAPTION.to_string(), Sender::Assistant, Some(plan));
                }
                AssistantReply::Text(text) => self.push(text, Sender::Assistant, None),
            },
            Err(failure) => self.push(failure.apology().to_string(), Sender::Assistant, None),
        }
        self.loading = false;
    }

    /// Apply `outcome` if it belongs to this mount. Returns whether it did.
    pub fn apply(&mut self, outcome: TurnOutcome) -> bool {
        if outcome.mount_id != self.mount_id {
            tracing::debug!(
                outcome_mount = outcome.mount_id,
                current_mount = self.mount_id,
                "Discarding planner result for a previous mount"
            );
            return false;
        }
        self.complete(outcome.result);
        true
    }

    /// Restart the conversation in `language`.
    ///
    /// The log and the planner session are discarded; a call still in flight
    /// resolves against the old planner and is not applied.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
        self.mount_id = next_mount_id();
        self.planner = Arc::new(Mutex::new(PlannerChat::new(Arc::clone(&self.driver))));
        self.turns.clear();
        self.loading = false;
        self.greet(Greeting::LanguageSet);
    }

    /// Booking hand-off for a bookable activity of an itinerary turn.
    #[must_use]
    pub fn booking_request(&self, turn_id: u64, day: usize, activity: usize) -> Option<BookingRequest> {
        let activity = self
            .turns
            .iter()
            .find(|t| t.id == turn_id)?
            .itinerary
            .as_ref()?
            .activity(day, activity)?;
        let booking_type = activity.booking_type?;
        Some(BookingRequest::for_activity(booking_type, &activity.location))
    }
}
