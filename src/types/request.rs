use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sentinel option that pairs a list or single-choice answer with free text.
pub const OTHER_OPTION: &str = "Other";

/// Party size assumed when the traveler answers "not sure" or something unrecognised.
pub const DEFAULT_PARTY_SIZE: PartySize = PartySize::Two;

/// Which block of the request is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripMode {
    /// The destination is to be recommended from preferences.
    Discover,
    /// The traveler already knows where they are going.
    Known,
}

impl TripMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "discover" => Some(Self::Discover),
            "known" => Some(Self::Known),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Discover => "discover",
            Self::Known => "known",
        }
    }
}

/// Inbound trip description, exactly as the client sent it.
///
/// Every key is optional here; which ones are required depends on `trip_mode`
/// and on the answers to other questions, and is decided by
/// [`validate`](crate::core::validator::validate).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripRequest {
    pub trip_mode: Option<String>,

    // Discover block
    pub has_discovery_intent: Option<bool>,
    pub discovery_intent: Option<String>,
    pub knows_trip_length: Option<bool>,
    pub days: Option<i64>,
    /// Bucket label such as "3-4" or "15 or more", or a bare number.
    pub people: Option<Value>,
    pub transport_mode: Option<String>,
    pub origin_location: Option<String>,
    pub international_travel: Option<bool>,
    pub preferred_countries: Option<String>,
    pub distance_preference: Option<String>,
    pub has_dates: Option<bool>,
    pub date_range: Option<String>,
    pub area_structure: Option<String>,

    // Known block
    pub destination: Option<String>,
    pub knows_trip_length_b: Option<bool>,
    pub days_b: Option<i64>,
    pub people_b: Option<Value>,

    // Evaluated in both modes
    pub has_time_constraints: Option<bool>,
    pub time_constraints_detail: Option<String>,
    pub special_group_needs: Option<Vec<String>>,
    pub accessibility_needs: Option<bool>,
    pub accessibility_details: Option<String>,

    // Shared optional preferences
    pub budget_concern: Option<bool>,
    pub budget_amount: Option<i64>,
    pub weather_avoidance: Option<Vec<String>>,
    pub interests: Option<String>,
    pub food_interest_level: Option<i64>,
    pub cuisine_preferences: Option<Vec<String>>,
    pub cuisine_preferences_other_text: Option<String>,
    pub shopping_interest_level: Option<i64>,
    pub shopping_preferences: Option<Vec<String>>,
    pub shopping_preferences_other_text: Option<String>,
    pub trip_purpose: Option<String>,
    pub schedule_style: Option<String>,
    pub must_do: Option<Vec<String>>,
    pub must_avoid: Option<Vec<String>>,
    pub physical_activity_level: Option<i64>,
    pub public_transit_comfort: Option<i64>,
    pub nightlife: Option<bool>,
    pub photography_importance: Option<i64>,
    pub desired_feelings: Option<Vec<String>>,
    pub travel_vs_depth: Option<String>,
    pub excluded_places: Option<Vec<String>>,
    pub start_time_preference: Option<String>,
    pub start_time_other_text: Option<String>,
    pub end_time_preference: Option<String>,
    pub end_time_other_text: Option<String>,
    pub additional_notes: Option<String>,
}

/// Trimmed text, or `None` when the field is missing or blank.
pub fn text(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
}

/// Non-blank list entries, or `None` when nothing usable was supplied.
pub fn list(value: &Option<Vec<String>>) -> Option<Vec<&str>> {
    let items: Vec<&str> = value
        .iter()
        .flatten()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .collect();

    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

/// Whether a list answer includes the "Other" sentinel.
pub fn selects_other(value: &Option<Vec<String>>) -> bool {
    list(value).is_some_and(|items| items.contains(&OTHER_OPTION))
}

/// Number of travelers, kept as the coarse bucket the question offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartySize {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3-4")]
    ThreeToFour,
    #[serde(rename = "5-6")]
    FiveToSix,
    #[serde(rename = "7-9")]
    SevenToNine,
    #[serde(rename = "10-14")]
    TenToFourteen,
    #[serde(rename = "15 or more")]
    FifteenOrMore,
}

impl PartySize {
    pub fn label(self) -> &'static str {
        match self {
            Self::One => "1",
            Self::Two => "2",
            Self::ThreeToFour => "3-4",
            Self::FiveToSix => "5-6",
            Self::SevenToNine => "7-9",
            Self::TenToFourteen => "10-14",
            Self::FifteenOrMore => "15 or more",
        }
    }

    /// Bucket holding `count` travelers. Zero has no bucket.
    pub fn from_count(count: u64) -> Option<Self> {
        match count {
            0 => None,
            1 => Some(Self::One),
            2 => Some(Self::Two),
            3..=4 => Some(Self::ThreeToFour),
            5..=6 => Some(Self::FiveToSix),
            7..=9 => Some(Self::SevenToNine),
            10..=14 => Some(Self::TenToFourteen),
            _ => Some(Self::FifteenOrMore),
        }
    }

    /// Match a bucket label, tolerating case, spacing, and plain numbers.
    pub fn from_label(value: &str) -> Option<Self> {
        let normalized = value.trim().to_lowercase().replace(' ', "");
        match normalized.as_str() {
            "3-4" => Some(Self::ThreeToFour),
            "5-6" => Some(Self::FiveToSix),
            "7-9" => Some(Self::SevenToNine),
            "10-14" => Some(Self::TenToFourteen),
            "15ormore" | "15+" => Some(Self::FifteenOrMore),
            other => other.parse::<u64>().ok().and_then(Self::from_count),
        }
    }
}

/// Resolved party size plus whether it had to be assumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartySignal {
    pub size: PartySize,
    pub assumed: bool,
}

/// Daily pacing preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStyle {
    Packed,
    Relaxed,
    Balanced,
}

impl ScheduleStyle {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "packed" => Some(Self::Packed),
            "relaxed" => Some(Self::Relaxed),
            "balanced" | "somewhere in between" | "in between" => Some(Self::Balanced),
            _ => None,
        }
    }

    /// Activity-count band the generator should aim for each day.
    pub fn pacing(self) -> &'static str {
        match self {
            Self::Packed => "3-4 substantial activities per day, with short transitions",
            Self::Relaxed => "1-2 anchor activities per day, with generous buffer time",
            Self::Balanced => "2-3 activities per day, with some unscheduled time",
        }
    }
}

/// Strength band for a 1-10 rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingBand {
    /// 1-3
    Minimal,
    /// 4-6
    Selective,
    /// 7-10
    Central,
}

impl RatingBand {
    pub fn from_rating(rating: i64) -> Option<Self> {
        match rating {
            1..=3 => Some(Self::Minimal),
            4..=6 => Some(Self::Selective),
            7..=10 => Some(Self::Central),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Selective => "selective / secondary",
            Self::Central => "central theme",
        }
    }
}
