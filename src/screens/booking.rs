//! Booking flow: form, canned results, payment.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::fixtures::{BookingOption, booking_results};
use crate::itinerary::BookingType;

/// Hand-off from an itinerary activity to the booking screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub booking_type: BookingType,
    pub details: BTreeMap<String, String>,
}

impl BookingRequest {
    /// Form prefill for an activity at `location`.
    #[must_use]
    pub fn for_activity(booking_type: BookingType, location: &str) -> Self {
        let mut details = BTreeMap::new();
        if booking_type == BookingType::Ride {
            details.insert("from".to_string(), location.to_string());
        } else {
            details.insert("location".to_string(), location.to_string());
            details.insert("cuisine".to_string(), location.to_string());
        }
        Self {
            booking_type,
            details,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error("no booking option with id {0}")]
    UnknownOption(u32),
    #[error("payment can only be made from the payment step")]
    NotAtPayment,
    #[error("unknown payment method: {0}")]
    UnknownPaymentMethod(String),
    #[error("a payment is already being processed")]
    PaymentInProgress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingStep {
    #[default]
    Form,
    Results,
    Payment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentMethod {
    #[default]
    Wallet,
    CashOnDelivery,
    OrangeMoney,
    AfriMoney,
    Card,
}

impl PaymentMethod {
    pub const ALL: [Self; 5] = [
        Self::Wallet,
        Self::CashOnDelivery,
        Self::OrangeMoney,
        Self::AfriMoney,
        Self::Card,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Wallet => "Pay with Wallet",
            Self::CashOnDelivery => "Cash on Delivery",
            Self::OrangeMoney => "Orange Money",
            Self::AfriMoney => "AfriMoney",
            Self::Card => "Bank/Debit Card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMethod {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.label() == s)
            .ok_or_else(|| BookingError::UnknownPaymentMethod(s.to_string()))
    }
}

/// Text fields of the search form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingForm {
    pub from: String,
    pub to: String,
    pub location: String,
    pub checkin: String,
    pub checkout: String,
    pub cuisine: String,
    pub delivery_location: String,
}

impl BookingForm {
    /// Set a field by its form name. Unknown names are ignored.
    pub fn set(&mut self, name: &str, value: &str) -> bool {
        let slot = match name {
            "from" => &mut self.from,
            "to" => &mut self.to,
            "location" => &mut self.location,
            "checkin" => &mut self.checkin,
            "checkout" => &mut self.checkout,
            "cuisine" => &mut self.cuisine,
            "delivery_location" | "delivery-location" => &mut self.delivery_location,
            _ => return false,
        };
        value.clone_into(slot);
        true
    }

    pub fn merge(&mut self, fields: &BTreeMap<String, String>) {
        for (name, value) in fields {
            self.set(name, value);
        }
    }
}

/// Categories offered on the screen's own tab bar.
pub const TAB_CATEGORIES: [BookingType; 3] = [BookingType::Ride, BookingType::Hotel, BookingType::Food];

#[derive(Debug, Clone)]
pub struct BookingScreen {
    category: BookingType,
    step: BookingStep,
    form: BookingForm,
    results: &'static [BookingOption],
    selected: Option<BookingOption>,
    payment: PaymentMethod,
    paying: bool,
}

impl Default for BookingScreen {
    fn default() -> Self {
        Self {
            category: BookingType::Ride,
            step: BookingStep::Form,
            form: BookingForm::default(),
            results: &[],
            selected: None,
            payment: PaymentMethod::default(),
            paying: false,
        }
    }
}

impl BookingScreen {
    /// Mount the screen, applying a pending hand-off if there is one.
    #[must_use]
    pub fn mount(handoff: Option<BookingRequest>) -> Self {
        let mut screen = Self::default();
        if let Some(request) = handoff {
            screen.category = request.booking_type;
            screen.form.merge(&request.details);
        }
        screen
    }

    #[must_use]
    pub fn category(&self) -> BookingType {
        self.category
    }

    #[must_use]
    pub fn step(&self) -> BookingStep {
        self.step
    }

    #[must_use]
    pub fn form(&self) -> &BookingForm {
        &self.form
    }

    #[must_use]
    pub fn results(&self) -> &[BookingOption] {
        self.results
    }

    #[must_use]
    pub fn selected(&self) -> Option<&BookingOption> {
        self.selected.as_ref()
    }

    #[must_use]
    pub fn payment_method(&self) -> PaymentMethod {
        self.payment
    }

    /// Switch category and return to the form.
    pub fn select_category(&mut self, category: BookingType) {
        self.category = category;
        self.step = BookingStep::Form;
    }

    /// Apply submitted form fields and show the category's results.
    pub fn search(&mut self, fields: &BTreeMap<String, String>) {
        self.form.merge(fields);
        self.results = booking_results(self.category);
        self.step = BookingStep::Results;
    }

    pub fn select_option(&mut self, id: u32) -> Result<&BookingOption, BookingError> {
        let option = self
            .results
            .iter()
            .find(|o| o.id == id)
            .copied()
            .ok_or(BookingError::UnknownOption(id))?;
        self.step = BookingStep::Payment;
        Ok(&*self.selected.insert(option))
    }

    pub fn back(&mut self) {
        self.step = match self.step {
            BookingStep::Form | BookingStep::Results => BookingStep::Form,
            BookingStep::Payment => BookingStep::Results,
        };
    }

    pub fn choose_payment(&mut self, method: PaymentMethod) {
        self.payment = method;
    }

    /// Method to charge, if the flow is at the payment step.
    pub fn checkout(&self) -> Result<PaymentMethod, BookingError> {
        match (self.step, self.selected) {
            (BookingStep::Payment, Some(_)) => Ok(self.payment),
            _ => Err(BookingError::NotAtPayment),
        }
    }

    #[must_use]
    pub fn is_paying(&self) -> bool {
        self.paying
    }

    /// Start charging the chosen method. Only one payment runs at a time.
    pub fn begin_payment(&mut self) -> Result<PaymentMethod, BookingError> {
        if self.paying {
            return Err(BookingError::PaymentInProgress);
        }
        let method = self.checkout()?;
        self.paying = true;
        Ok(method)
    }

    /// Finish the payment started by [`Self::begin_payment`]: back to the form
    /// with results and selection cleared. Returns `false`, changing nothing,
    /// when this screen has no payment in flight.
    pub fn complete_payment(&mut self) -> bool {
        if !self.paying {
            return false;
        }
        self.paying = false;
        self.step = BookingStep::Form;
        self.results = &[];
        self.selected = None;
        true
    }
}

/// Notification text for a confirmed booking.
#[must_use]
pub fn confirmation_message(method: PaymentMethod) -> String {
    format!("Booking confirmed via {method}!")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ride_handoff_prefills_from() {
        let request = BookingRequest::for_activity(BookingType::Ride, "Lumley Beach");
        assert_eq!(request.details.get("from").map(String::as_str), Some("Lumley Beach"));
        assert!(!request.details.contains_key("location"));

        let screen = BookingScreen::mount(Some(request));
        assert_eq!(screen.category(), BookingType::Ride);
        assert_eq!(screen.form().from, "Lumley Beach");
    }

    #[test]
    fn test_other_handoff_prefills_location_and_cuisine() {
        let request = BookingRequest::for_activity(BookingType::Hotel, "Bo");
        let screen = BookingScreen::mount(Some(request));
        assert_eq!(screen.category(), BookingType::Hotel);
        assert_eq!(screen.form().location, "Bo");
        assert_eq!(screen.form().cuisine, "Bo");
    }

    #[test]
    fn test_full_flow_resets_after_payment() {
        let mut screen = BookingScreen::mount(None);
        screen.select_category(BookingType::Hotel);
        screen.search(&BTreeMap::from([("location".to_string(), "Freetown".to_string())]));
        assert_eq!(screen.step(), BookingStep::Results);
        assert_eq!(screen.results().len(), 2);

        assert_eq!(screen.select_option(2).unwrap().name, "The Country Lodge");
        assert_eq!(screen.step(), BookingStep::Payment);

        screen.choose_payment(PaymentMethod::OrangeMoney);
        let method = screen.begin_payment().unwrap();
        assert_eq!(confirmation_message(method), "Booking confirmed via Orange Money!");

        assert!(screen.complete_payment());
        assert_eq!(screen.step(), BookingStep::Form);
        assert!(screen.results().is_empty());
        assert!(screen.selected().is_none());
        assert_eq!(screen.form().location, "Freetown");
    }

    #[test]
    fn test_unknown_option_and_early_checkout() {
        let mut screen = BookingScreen::mount(None);
        assert_eq!(screen.checkout(), Err(BookingError::NotAtPayment));
        screen.search(&BTreeMap::new());
        assert_eq!(screen.select_option(7).unwrap_err(), BookingError::UnknownOption(7));
        assert_eq!(screen.step(), BookingStep::Results);
    }

    #[test]
    fn test_second_payment_is_refused_while_one_is_in_flight() {
        let mut screen = BookingScreen::mount(None);
        screen.search(&BTreeMap::new());
        screen.select_option(1).unwrap();

        assert_eq!(screen.begin_payment(), Ok(PaymentMethod::Wallet));
        assert!(screen.is_paying());
        assert_eq!(screen.begin_payment(), Err(BookingError::PaymentInProgress));

        assert!(screen.complete_payment());
        assert!(!screen.is_paying());
        assert!(!screen.complete_payment());
    }

    #[test]
    fn test_completion_without_payment_leaves_screen_alone() {
        let mut screen = BookingScreen::mount(None);
        screen.search(&BTreeMap::new());
        screen.select_option(1).unwrap();
        assert!(!screen.complete_payment());
        assert_eq!(screen.step(), BookingStep::Payment);
        assert!(screen.selected().is_some());
    }

    #[test]
    fn test_back_steps_and_category_switch() {
        let mut screen = BookingScreen::mount(None);
        screen.search(&BTreeMap::new());
        screen.select_option(1).unwrap();
        screen.back();
        assert_eq!(screen.step(), BookingStep::Results);
        screen.back();
        assert_eq!(screen.step(), BookingStep::Form);

        screen.search(&BTreeMap::new());
        screen.select_category(BookingType::Food);
        assert_eq!(screen.step(), BookingStep::Form);
    }

    #[test]
    fn test_payment_method_labels_parse() {
        for method in PaymentMethod::ALL {
            assert_eq!(method.label().parse::<PaymentMethod>(), Ok(method));
        }
        assert_eq!(PaymentMethod::default().label(), "Pay with Wallet");
        assert!("Cheque".parse::<PaymentMethod>().is_err());
    }
}
