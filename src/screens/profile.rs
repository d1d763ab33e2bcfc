//! Profile and settings.

use crate::fixtures::{
    BOOKING_HISTORY, BookingHistoryItem, DEMO_USER, DemoUser, PAYMENT_HISTORY, PaymentRecord,
    TOP_UP_METHODS,
};

pub const FEEDBACK_MESSAGE: &str = "Thank you for your feedback!";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown top-up method: {0}")]
pub struct UnknownTopUpMethod(pub String);

#[derive(Debug, Clone, Default)]
pub struct ProfileScreen {
    top_up_open: bool,
}

impl ProfileScreen {
    #[must_use]
    pub fn mount() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn user(&self) -> &'static DemoUser {
        &DEMO_USER
    }

    #[must_use]
    pub fn booking_history(&self) -> &'static [BookingHistoryItem] {
        &BOOKING_HISTORY
    }

    #[must_use]
    pub fn payment_history(&self) -> &'static [PaymentRecord] {
        &PAYMENT_HISTORY
    }

    #[must_use]
    pub fn top_up_methods(&self) -> &'static [&'static str] {
        &TOP_UP_METHODS
    }

    #[must_use]
    pub fn is_top_up_open(&self) -> bool {
        self.top_up_open
    }

    pub fn open_top_up(&mut self) {
        self.top_up_open = true;
    }

    pub fn close_top_up(&mut self) {
        self.top_up_open = false;
    }

    /// Pick a top-up method. The wallet is a mock; this only closes the modal.
    pub fn choose_top_up(&mut self, method: &str) -> Result<&'static str, UnknownTopUpMethod> {
        let method = TOP_UP_METHODS
            .iter()
            .copied()
            .find(|m| *m == method)
            .ok_or_else(|| UnknownTopUpMethod(method.to_string()))?;
        tracing::debug!(method, "Top-up method chosen");
        self.top_up_open = false;
        Ok(method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_up_modal() {
        let mut profile = ProfileScreen::mount();
        assert!(!profile.is_top_up_open());
        profile.open_top_up();
        assert!(profile.is_top_up_open());

        assert_eq!(
            profile.choose_top_up("Dogecoin"),
            Err(UnknownTopUpMethod("Dogecoin".to_string()))
        );
        assert!(profile.is_top_up_open());

        assert_eq!(profile.choose_top_up("Bitcoin"), Ok("Bitcoin"));
        assert!(!profile.is_top_up_open());
        assert_eq!(profile.user().wallet_balance, "$100.00");
    }

    #[test]
    fn test_histories_come_from_fixtures() {
        let profile = ProfileScreen::mount();
        assert_eq!(profile.booking_history().len(), 4);
        assert_eq!(profile.payment_history().iter().filter(|p| p.is_credit()).count(), 1);
    }
}
