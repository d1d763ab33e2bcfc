//! Per-client UI shell.
//!
//! The shell holds exactly one mounted screen (the [`View`]) plus the state
//! that outlives navigation: authentication, theme, language, the booking
//! hand-off and the notification slot. Switching tabs drops the old screen.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::TimingConfig;
use crate::llm::LlmDriver;
use crate::notification::NotificationSlot;
use crate::prefs::{Language, Theme};
use crate::screens::assistant::{AssistantScreen, Greeting, PendingTurn, TurnOutcome};
use crate::screens::auth::{AuthError, AuthScreen, Credentials};
use crate::screens::booking::{BookingError, BookingRequest, BookingScreen, PaymentMethod, confirmation_message};
use crate::screens::inbox::InboxScreen;
use crate::screens::profile::ProfileScreen;
use crate::screens::reels::ReelsScreen;
use crate::screens::social::SocialScreen;

/// Poll interval while a planner call is in flight.
const LOADING_POLL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tab: {0}")]
pub struct UnknownTab(pub String);

/// Bottom navigation entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Ai,
    Book,
    Social,
    Reels,
    Chat,
    Profile,
}

impl Tab {
    pub const ALL: [Self; 6] = [
        Self::Ai,
        Self::Book,
        Self::Social,
        Self::Reels,
        Self::Chat,
        Self::Profile,
    ];

    /// Path segment used by `POST /tab/{tab}`.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Ai => "ai",
            Self::Book => "book",
            Self::Social => "social",
            Self::Reels => "reels",
            Self::Chat => "chat",
            Self::Profile => "profile",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Ai => "AI Plan",
            Self::Book => "Book",
            Self::Social => "Social",
            Self::Reels => "Reels",
            Self::Chat => "Chat",
            Self::Profile => "Profile",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Tab {
    type Err = UnknownTab;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownTab(s.to_string()))
    }
}

/// The mounted screen.
#[derive(Debug)]
pub enum View {
    Assistant(AssistantScreen),
    Booking(BookingScreen),
    Social(SocialScreen),
    Reels(ReelsScreen),
    Inbox(InboxScreen),
    Profile(ProfileScreen),
}

impl View {
    #[must_use]
    pub fn tab(&self) -> Tab {
        match self {
            Self::Assistant(_) => Tab::Ai,
            Self::Booking(_) => Tab::Book,
            Self::Social(_) => Tab::Social,
            Self::Reels(_) => Tab::Reels,
            Self::Inbox(_) => Tab::Chat,
            Self::Profile(_) => Tab::Profile,
        }
    }
}

pub struct Shell {
    authenticated: bool,
    auth: AuthScreen,
    view: View,
    theme: Theme,
    language: Language,
    language_changed: bool,
    pending_booking: Option<BookingRequest>,
    notification: NotificationSlot,
    driver: Arc<dyn LlmDriver>,
    timing: TimingConfig,
}

impl fmt::Debug for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shell")
            .field("authenticated", &self.authenticated)
            .field("tab", &self.view.tab())
            .field("theme", &self.theme)
            .field("language", &self.language)
            .field("pending_booking", &self.pending_booking)
            .finish_non_exhaustive()
    }
}

macro_rules! screen_accessors {
    ($($get:ident, $get_mut:ident => $variant:ident($ty:ty);)*) => {
        $(
            #[must_use]
            pub fn $get(&self) -> Option<&$ty> {
                match &self.view {
                    View::$variant(screen) if self.authenticated => Some(screen),
                    _ => None,
                }
            }

            pub fn $get_mut(&mut self) -> Option<&mut $ty> {
                match &mut self.view {
                    View::$variant(screen) if self.authenticated => Some(screen),
                    _ => None,
                }
            }
        )*
    };
}

impl Shell {
    /// A signed-out shell on the assistant tab.
    #[must_use]
    pub fn new(driver: Arc<dyn LlmDriver>, timing: TimingConfig, theme: Theme) -> Self {
        let language = Language::default();
        Self {
            authenticated: false,
            auth: AuthScreen::default(),
            view: View::Assistant(AssistantScreen::mount(
                Arc::clone(&driver),
                language,
                Greeting::Intro,
            )),
            theme,
            language,
            language_changed: false,
            pending_booking: None,
            notification: NotificationSlot::new(timing.notification()),
            driver,
            timing,
        }
    }

    fn mount(&mut self, tab: Tab) -> View {
        match tab {
            Tab::Ai => {
                let greeting = if self.language_changed {
                    Greeting::LanguageSet
                } else {
                    Greeting::Intro
                };
                View::Assistant(AssistantScreen::mount(
                    Arc::clone(&self.driver),
                    self.language,
                    greeting,
                ))
            }
            Tab::Book => View::Booking(BookingScreen::mount(self.pending_booking.take())),
            Tab::Social => View::Social(SocialScreen::mount(self.timing.story())),
            Tab::Reels => View::Reels(ReelsScreen::mount()),
            Tab::Chat => View::Inbox(InboxScreen::mount(&self.timing)),
            Tab::Profile => View::Profile(ProfileScreen::mount()),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Auth
    // ─────────────────────────────────────────────────────────────────────

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    #[must_use]
    pub fn auth(&self) -> &AuthScreen {
        &self.auth
    }

    pub fn toggle_auth_mode(&mut self) {
        self.auth.toggle_mode();
    }

    /// Sign in. The current tab is mounted fresh.
    pub fn login(&mut self, credentials: &Credentials) -> Result<(), AuthError> {
        if self.authenticated {
            return Ok(());
        }
        self.auth.submit(credentials)?;
        self.authenticated = true;
        self.auth = AuthScreen::default();
        self.view = self.mount(self.view.tab());
        tracing::info!(email = %credentials.email, "Client signed in");
        Ok(())
    }

    pub fn logout(&mut self) {
        self.authenticated = false;
        self.pending_booking = None;
    }

    // ─────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────

    #[must_use]
    pub fn tab(&self) -> Tab {
        self.view.tab()
    }

    #[must_use]
    pub fn view(&self) -> &View {
        &self.view
    }

    /// Switch tabs, unmounting the current screen. Selecting the active tab
    /// keeps it as is.
    pub fn select_tab(&mut self, tab: Tab) {
        if !self.authenticated || tab == self.view.tab() {
            return;
        }
        self.view = self.mount(tab);
        tracing::debug!(%tab, "Tab selected");
    }

    /// Hand a bookable itinerary activity to the booking tab.
    pub fn request_booking(&mut self, turn_id: u64, day: usize, activity: usize) -> bool {
        let Some(request) = self
            .assistant()
            .and_then(|a| a.booking_request(turn_id, day, activity))
        else {
            return false;
        };
        self.pending_booking = Some(request);
        self.select_tab(Tab::Book);
        true
    }

    screen_accessors! {
        assistant, assistant_mut => Assistant(AssistantScreen);
        booking, booking_mut => Booking(BookingScreen);
        social, social_mut => Social(SocialScreen);
        reels, reels_mut => Reels(ReelsScreen);
        inbox, inbox_mut => Inbox(InboxScreen);
        profile, profile_mut => Profile(ProfileScreen);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Preferences
    // ─────────────────────────────────────────────────────────────────────

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    /// Change the assistant language. The next assistant mount greets in it.
    pub fn set_language(&mut self, language: Language) {
        if language == self.language {
            return;
        }
        self.language = language;
        self.language_changed = true;
        if let Some(assistant) = self.assistant_mut() {
            assistant.set_language(language);
        }
        tracing::info!(%language, "Assistant language changed");
    }

    // ─────────────────────────────────────────────────────────────────────
    // Notification
    // ─────────────────────────────────────────────────────────────────────

    pub fn notify(&mut self, message: impl Into<String>, now: Instant) {
        self.notification.post(message, now);
    }

    #[must_use]
    pub fn notification(&self, now: Instant) -> Option<&str> {
        self.notification.active(now)
    }

    pub fn dismiss_notification(&mut self) {
        self.notification.dismiss();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Planner and payment
    // ─────────────────────────────────────────────────────────────────────

    pub fn begin_assistant_turn(&mut self, text: &str) -> Option<PendingTurn> {
        self.assistant_mut()?.begin_send(text)
    }

    /// Apply a finished planner call to the assistant log it came from.
    pub fn apply_turn(&mut self, outcome: TurnOutcome) -> bool {
        match &mut self.view {
            View::Assistant(assistant) => assistant.apply(outcome),
            _ => {
                tracing::debug!(
                    mount_id = outcome.mount_id(),
                    "Discarding planner result, assistant not mounted"
                );
                false
            }
        }
    }

    /// Start a payment on the booking screen, if it is mounted.
    pub fn begin_booking_payment(&mut self) -> Option<Result<PaymentMethod, BookingError>> {
        self.booking_mut().map(BookingScreen::begin_payment)
    }

    /// Finish a simulated payment. The confirmation is posted even if the
    /// user has navigated away in the meantime; a booking screen mounted
    /// since then is left as it is.
    pub fn complete_booking(&mut self, method: PaymentMethod, now: Instant) {
        if let View::Booking(booking) = &mut self.view {
            booking.complete_payment();
        }
        self.notify(confirmation_message(method), now);
        tracing::info!(%method, "Booking confirmed");
    }

    // ─────────────────────────────────────────────────────────────────────
    // Time
    // ─────────────────────────────────────────────────────────────────────

    /// Apply every time-driven effect due at `now`.
    pub fn tick(&mut self, now: Instant) {
        self.notification.tick(now);
        match &mut self.view {
            View::Inbox(inbox) => inbox.tick(now),
            View::Social(social) => social.tick(now),
            _ => {}
        }
    }

    /// How long the page may wait before its state changes on its own.
    #[must_use]
    pub fn refresh_after(&self, now: Instant) -> Option<Duration> {
        let view_due = match &self.view {
            View::Assistant(assistant) if assistant.is_loading() => Some(LOADING_POLL),
            View::Inbox(inbox) => inbox.next_due().map(|due| due.saturating_duration_since(now)),
            View::Social(social) => social
                .story_closes_at()
                .map(|due| due.saturating_duration_since(now)),
            _ => None,
        };
        [self.notification.remaining(now), view_due]
            .into_iter()
            .flatten()
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itinerary::BookingType;
    use crate::llm::scripted::ScriptedDriver;
    use crate::screens::assistant::INTRO_GREETING;
    use crate::screens::booking::BookingStep;

    const RIDE_PLAN: &str = r#"[{"day":1,"title":"Bo","activities":[
        {"time":"09:00","description":"Ride to Bo","estimated_cost":"Le 50,000","location":"Freetown","booking_type":"Ride"}
    ]}]"#;

    fn timing() -> TimingConfig {
        TimingConfig {
            payment_delay_ms: 0,
            ..TimingConfig::default()
        }
    }

    fn signed_in(replies: Vec<Result<String, crate::llm::LlmError>>) -> Shell {
        let mut shell = Shell::new(ScriptedDriver::new(replies), timing(), Theme::default());
        shell
            .login(&Credentials {
                name: None,
                email: "alex.doe@example.com".to_string(),
                password: "pw".to_string(),
            })
            .unwrap();
        shell
    }

    #[test]
    fn test_signed_out_shell_hides_screens() {
        let mut shell = Shell::new(ScriptedDriver::new(vec![]), timing(), Theme::Light);
        assert!(!shell.is_authenticated());
        assert!(shell.assistant().is_none());
        shell.select_tab(Tab::Profile);
        assert_eq!(shell.tab(), Tab::Ai);
        assert!(shell.login(&Credentials::default()).is_err());
    }

    #[test]
    fn test_tab_switch_unmounts_screen() {
        let mut shell = signed_in(vec![]);
        let _ = shell.begin_assistant_turn("hello");
        assert_eq!(shell.assistant().unwrap().turns().len(), 2);

        shell.select_tab(Tab::Social);
        assert!(shell.assistant().is_none());
        shell.select_tab(Tab::Ai);
        let turns = shell.assistant().unwrap().turns();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].text, INTRO_GREETING);
    }

    #[tokio::test]
    async fn test_booking_handoff_is_consumed_on_mount() {
        let mut shell = signed_in(vec![Ok(RIDE_PLAN.to_string())]);
        let pending = shell.begin_assistant_turn("plan").unwrap();
        assert!(shell.apply_turn(pending.run().await));
        let turn_id = shell.assistant().unwrap().turns().last().unwrap().id;

        assert!(shell.request_booking(turn_id, 0, 0));
        let booking = shell.booking().unwrap();
        assert_eq!(booking.category(), BookingType::Ride);
        assert_eq!(booking.form().from, "Freetown");

        shell.select_tab(Tab::Ai);
        shell.select_tab(Tab::Book);
        assert_eq!(shell.booking().unwrap().form().from, "");
    }

    #[tokio::test]
    async fn test_turn_for_unmounted_assistant_is_dropped() {
        let mut shell = signed_in(vec![Ok("Sure, tell me more!".to_string())]);
        let pending = shell.begin_assistant_turn("hi").unwrap();
        shell.select_tab(Tab::Reels);
        assert!(!shell.apply_turn(pending.run().await));
    }

    #[test]
    fn test_language_change_greets_on_next_mount() {
        let mut shell = signed_in(vec![]);
        shell.select_tab(Tab::Profile);
        shell.set_language(Language::NigerianPidgin);
        shell.select_tab(Tab::Ai);
        assert_eq!(
            shell.assistant().unwrap().turns()[0].text,
            "Hello! My language is now set to Nigerian Pidgin. How can I help you plan your trip?"
        );
        assert_eq!(shell.assistant().unwrap().language(), Language::NigerianPidgin);
    }

    #[test]
    fn test_payment_confirms_and_resets_flow() {
        let t0 = Instant::now();
        let mut shell = signed_in(vec![]);
        shell.select_tab(Tab::Book);
        assert!(matches!(shell.begin_booking_payment(), Some(Err(BookingError::NotAtPayment))));

        let booking = shell.booking_mut().unwrap();
        booking.search(&Default::default());
        booking.select_option(1).unwrap();
        booking.choose_payment(PaymentMethod::OrangeMoney);
        let method = shell.begin_booking_payment().unwrap().unwrap();
        assert!(matches!(
            shell.begin_booking_payment(),
            Some(Err(BookingError::PaymentInProgress))
        ));

        shell.complete_booking(method, t0);
        assert_eq!(shell.notification(t0), Some("Booking confirmed via Orange Money!"));
        assert_eq!(shell.booking().unwrap().step(), BookingStep::Form);
        assert!(shell.notification(t0 + Duration::from_secs(4)).is_none());
    }

    #[test]
    fn test_payment_completing_after_remount_keeps_new_screen() {
        let t0 = Instant::now();
        let mut shell = signed_in(vec![]);
        shell.select_tab(Tab::Book);
        let booking = shell.booking_mut().unwrap();
        booking.search(&Default::default());
        booking.select_option(1).unwrap();
        let method = shell.begin_booking_payment().unwrap().unwrap();

        // Leave and come back while the payment is processing.
        shell.select_tab(Tab::Reels);
        shell.select_tab(Tab::Book);
        let booking = shell.booking_mut().unwrap();
        booking.search(&Default::default());
        booking.select_option(1).unwrap();

        shell.complete_booking(method, t0);
        assert_eq!(shell.booking().unwrap().step(), BookingStep::Payment);
        assert_eq!(shell.notification(t0), Some("Booking confirmed via Pay with Wallet!"));
    }

    #[test]
    fn test_refresh_follows_pending_effects() {
        let t0 = Instant::now();
        let mut shell = signed_in(vec![]);
        assert!(shell.refresh_after(t0).is_none());

        shell.select_tab(Tab::Chat);
        shell.inbox_mut().unwrap().send_text("hi", t0).unwrap();
        assert_eq!(shell.refresh_after(t0), Some(Duration::from_millis(800)));
        shell.tick(t0 + Duration::from_secs(2));
        assert!(shell.refresh_after(t0 + Duration::from_secs(2)).is_none());
        assert_eq!(shell.inbox().unwrap().thread().len(), 6);
    }

    #[test]
    fn test_tab_slugs_parse() {
        assert_eq!("chat".parse(), Ok(Tab::Chat));
        assert_eq!(Tab::Ai.label(), "AI Plan");
        assert!("gallery".parse::<Tab>().is_err());
    }

    #[test]
    fn test_logout_keeps_tab() {
        let mut shell = signed_in(vec![]);
        shell.select_tab(Tab::Profile);
        shell.logout();
        assert!(shell.profile().is_none());
        assert_eq!(shell.tab(), Tab::Profile);
    }
}
