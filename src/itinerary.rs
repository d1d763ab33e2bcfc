//! Structured itinerary model and reply classification.
//!
//! The planner asks the remote model for either a conversational answer or
//! a JSON array of days. [`classify_reply`] decides which one came back.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, de::Error as _};

/// Caption shown in place of the raw JSON when a reply is a plan.
pub const PLAN_CAPTION: &str = "Here is the travel plan I've prepared for you based on your request.";

/// Bookable category of an itinerary activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BookingType {
    Flight,
    Hotel,
    Food,
    Activity,
    Ride,
}

impl BookingType {
    /// Every category, in schema order.
    pub const ALL: [Self; 5] = [
        Self::Flight,
        Self::Hotel,
        Self::Food,
        Self::Activity,
        Self::Ride,
    ];

    /// Name as it appears on the wire and in the UI.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flight => "Flight",
            Self::Hotel => "Hotel",
            Self::Food => "Food",
            Self::Activity => "Activity",
            Self::Ride => "Ride",
        }
    }
}

impl fmt::Display for BookingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognised category name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown booking type: {0}")]
pub struct UnknownBookingType(pub String);

impl FromStr for BookingType {
    type Err = UnknownBookingType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownBookingType(s.to_string()))
    }
}

/// One timed activity within a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryActivity {
    pub time: String,
    pub description: String,
    pub estimated_cost: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_type: Option<BookingType>,
}

/// One day of a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryDay {
    #[serde(deserialize_with = "day_number")]
    pub day: u32,
    pub title: String,
    pub activities: Vec<ItineraryActivity>,
}

/// An ordered multi-day plan.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItineraryPlan(pub Vec<ItineraryDay>);

impl ItineraryPlan {
    /// Days in order.
    #[must_use]
    pub fn days(&self) -> &[ItineraryDay] {
        &self.0
    }

    /// Activity at (`day_index`, `activity_index`), both zero-based.
    #[must_use]
    pub fn activity(&self, day_index: usize, activity_index: usize) -> Option<&ItineraryActivity> {
        self.0.get(day_index)?.activities.get(activity_index)
    }
}

/// The schema declares `day` as a NUMBER, so `1.0` must be accepted.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn day_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let n = f64::deserialize(deserializer)?;
    if n.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&n) {
        Ok(n as u32)
    } else {
        Err(D::Error::custom(format!("day must be a non-negative integer, got {n}")))
    }
}

/// Response schema sent with every request, in the endpoint's schema dialect.
#[must_use]
pub fn response_schema() -> serde_json::Value {
    let booking_types: Vec<&str> = BookingType::ALL.iter().map(|t| t.as_str()).collect();

    serde_json::json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "day": { "type": "NUMBER" },
                "title": { "type": "STRING" },
                "activities": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "time": { "type": "STRING" },
                            "description": { "type": "STRING" },
                            "estimated_cost": { "type": "STRING" },
                            "location": { "type": "STRING" },
                            "booking_type": {
                                "type": "STRING",
                                "enum": booking_types,
                                "description": "The category for booking this item. Omit if not bookable."
                            }
                        },
                        "required": ["time", "description", "estimated_cost", "location"]
                    }
                }
            },
            "required": ["day", "title", "activities"]
        }
    })
}

/// How a raw model answer should be displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantReply {
    /// Conversational text, shown as-is.
    Text(String),
    /// A structured plan, shown under [`PLAN_CAPTION`].
    Plan(ItineraryPlan),
}

/// Classify a raw answer as a plan or plain text.
///
/// A plan is a JSON array whose first element has an `activities` field and
/// which deserializes into [`ItineraryPlan`]. Anything else, including
/// invalid JSON and structurally similar JSON with bad field types or an
/// unknown `booking_type`, is plain text.
#[must_use]
pub fn classify_reply(raw: &str) -> AssistantReply {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) else {
        return AssistantReply::Text(raw.to_string());
    };

    let looks_like_plan = value
        .as_array()
        .and_then(|days| days.first())
        .and_then(|first| first.get("activities"))
        .is_some_and(|activities| !activities.is_null());
    if !looks_like_plan {
        return AssistantReply::Text(raw.to_string());
    }

    match serde_json::from_value::<ItineraryPlan>(value) {
        Ok(plan) => AssistantReply::Plan(plan),
        Err(e) => {
            tracing::debug!(error = %e, "Plan-shaped reply failed validation, showing as text");
            AssistantReply::Text(raw.to_string())
        }
    }
}
