//! Constraint validation for inbound trip requests.
//!
//! Rules run in a fixed order and the first violation is reported. Nothing is
//! repaired or defaulted here except the party-size bucket, whose fallback is
//! recorded on the result.

use serde_json::Value;
use tracing::debug;

use crate::{
    error::{Rule, ValidationError},
    types::request::{selects_other, text, PartySignal, PartySize, TripMode, TripRequest},
    types::{DEFAULT_PARTY_SIZE, OTHER_OPTION},
};

/// Inclusive bounds for 1-10 preference ratings.
pub const RATING_RANGE: (i64, i64) = (1, 10);
/// Inclusive bounds for trip length in days.
pub const DAYS_RANGE: (i64, i64) = (1, 30);
/// Inclusive bounds for the budget amount.
pub const BUDGET_RANGE: (i64, i64) = (1, 100_000);

const RATED_FIELDS: [&str; 5] = [
    "food_interest_level",
    "shopping_interest_level",
    "physical_activity_level",
    "public_transit_comfort",
    "photography_importance",
];

type Check = Result<(), ValidationError>;

/// A request that passed every rule, with its mode-dependent signals resolved.
///
/// Only [`validate`] constructs one.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRequest {
    mode: TripMode,
    party: PartySignal,
    trip_length: Option<u32>,
    request: TripRequest,
}

impl NormalizedRequest {
    pub fn mode(&self) -> TripMode {
        self.mode
    }

    pub fn party(&self) -> PartySignal {
        self.party
    }

    /// Requested number of days, when the traveler knows it.
    pub fn trip_length(&self) -> Option<u32> {
        self.trip_length
    }

    pub fn request(&self) -> &TripRequest {
        &self.request
    }

    pub fn rating(&self, field: &str) -> Option<i64> {
        rating_value(&self.request, field)
    }
}

/// Check a trip request against every conditional and range rule.
pub fn validate(request: &TripRequest) -> Result<NormalizedRequest, ValidationError> {
    match run_checks(request) {
        Ok(normalized) => {
            debug!(
                target: "trip::validation",
                mode = normalized.mode.as_str(),
                party = normalized.party.size.label(),
                trip_length = ?normalized.trip_length,
                "trip request accepted"
            );
            Ok(normalized)
        }
        Err(err) => {
            debug!(
                target: "trip::validation",
                field = err.field,
                rule = %err.rule,
                "trip request rejected"
            );
            Err(err)
        }
    }
}

fn run_checks(request: &TripRequest) -> Result<NormalizedRequest, ValidationError> {
    let mode = resolve_mode(request)?;
    let party = resolve_party(request, mode)?;

    check_detail_flags(request)?;

    match mode {
        TripMode::Known => check_known_block(request)?,
        TripMode::Discover => check_discover_block(request)?,
    }

    check_other_text(request)?;
    check_ranges(request)?;

    // A days value left over from a "no" answer is ignored.
    let (knows_length, days) = match mode {
        TripMode::Known => (request.knows_trip_length_b, request.days_b),
        TripMode::Discover => (request.knows_trip_length, request.days),
    };
    // Range-checked above, so the conversion cannot truncate.
    let trip_length = days
        .filter(|_| knows_length == Some(true))
        .and_then(|days| u32::try_from(days).ok());

    Ok(NormalizedRequest {
        mode,
        party,
        trip_length,
        request: request.clone(),
    })
}

fn resolve_mode(request: &TripRequest) -> Result<TripMode, ValidationError> {
    let raw = text(&request.trip_mode)
        .ok_or_else(|| ValidationError::new("trip_mode", Rule::Required))?;

    TripMode::parse(raw)
        .ok_or_else(|| ValidationError::new("trip_mode", Rule::UnknownMode(raw.to_string())))
}

fn resolve_party(request: &TripRequest, mode: TripMode) -> Result<PartySignal, ValidationError> {
    let (field, value) = match mode {
        TripMode::Discover => ("people", request.people.as_ref()),
        TripMode::Known => ("people_b", request.people_b.as_ref()),
    };

    let required = || ValidationError::new(field, Rule::Required);

    match value {
        None | Some(Value::Null) => Err(required()),
        Some(Value::Number(number)) => {
            let count = number
                .as_i64()
                .ok_or_else(|| {
                    ValidationError::new(field, Rule::Invalid("must be a whole number".into()))
                })?;
            let size = u64::try_from(count)
                .ok()
                .and_then(PartySize::from_count)
                .ok_or_else(|| {
                    ValidationError::new(field, Rule::Invalid("must be at least 1".into()))
                })?;
            Ok(PartySignal {
                size,
                assumed: false,
            })
        }
        Some(Value::String(label)) if label.trim().is_empty() => Err(required()),
        Some(Value::String(label)) => Ok(match PartySize::from_label(label) {
            Some(size) => PartySignal {
                size,
                assumed: false,
            },
            None => PartySignal {
                size: DEFAULT_PARTY_SIZE,
                assumed: true,
            },
        }),
        Some(_) => Err(ValidationError::new(
            field,
            Rule::Invalid("must be a number or a group-size label".into()),
        )),
    }
}

fn check_detail_flags(request: &TripRequest) -> Check {
    require_when(
        request.has_time_constraints == Some(true),
        text(&request.time_constraints_detail).is_some(),
        "time_constraints_detail",
        "has_time_constraints is true",
    )?;
    require_when(
        request.accessibility_needs == Some(true),
        text(&request.accessibility_details).is_some(),
        "accessibility_details",
        "accessibility_needs is true",
    )?;
    require_when(
        request.budget_amount.is_some(),
        request.budget_concern == Some(true),
        "budget_concern",
        "budget_amount is set",
    )
}

fn check_known_block(request: &TripRequest) -> Check {
    if text(&request.destination).is_none() {
        return Err(ValidationError::new("destination", Rule::Required));
    }

    require_when(
        request.knows_trip_length_b == Some(true),
        request.days_b.is_some(),
        "days_b",
        "knows_trip_length_b is true",
    )
}

fn check_discover_block(request: &TripRequest) -> Check {
    require_when(
        request.has_discovery_intent == Some(true),
        text(&request.discovery_intent).is_some(),
        "discovery_intent",
        "has_discovery_intent is true",
    )?;

    if text(&request.origin_location).is_none() {
        return Err(ValidationError::new("origin_location", Rule::Required));
    }

    if request.knows_trip_length == Some(true) {
        require_when(true, request.days.is_some(), "days", "knows_trip_length is true")?;
    } else {
        require_when(
            true,
            request.has_dates == Some(true),
            "has_dates",
            "the trip length is unknown",
        )?;
        require_when(
            true,
            text(&request.date_range).is_some(),
            "date_range",
            "the trip length is unknown",
        )?;
    }

    let international = request
        .international_travel
        .ok_or_else(|| ValidationError::new("international_travel", Rule::Required))?;

    let countries = text(&request.preferred_countries).is_some();
    let distance = text(&request.distance_preference).is_some();

    if international {
        require_when(true, countries, "preferred_countries", "international_travel is true")?;
        forbid_when(distance, "distance_preference", "international_travel is true")
    } else {
        require_when(true, distance, "distance_preference", "international_travel is false")?;
        forbid_when(countries, "preferred_countries", "international_travel is false")
    }
}

fn check_other_text(request: &TripRequest) -> Check {
    require_when(
        selects_other(&request.cuisine_preferences),
        text(&request.cuisine_preferences_other_text).is_some(),
        "cuisine_preferences_other_text",
        "cuisine_preferences includes Other",
    )?;
    require_when(
        selects_other(&request.shopping_preferences),
        text(&request.shopping_preferences_other_text).is_some(),
        "shopping_preferences_other_text",
        "shopping_preferences includes Other",
    )?;
    require_when(
        text(&request.start_time_preference) == Some(OTHER_OPTION),
        text(&request.start_time_other_text).is_some(),
        "start_time_other_text",
        "start_time_preference is Other",
    )?;
    require_when(
        text(&request.end_time_preference) == Some(OTHER_OPTION),
        text(&request.end_time_other_text).is_some(),
        "end_time_other_text",
        "end_time_preference is Other",
    )
}

fn check_ranges(request: &TripRequest) -> Check {
    for field in RATED_FIELDS {
        in_range(field, rating_value(request, field), RATING_RANGE)?;
    }

    in_range("days", request.days, DAYS_RANGE)?;
    in_range("days_b", request.days_b, DAYS_RANGE)?;
    in_range("budget_amount", request.budget_amount, BUDGET_RANGE)
}

fn rating_value(request: &TripRequest, field: &str) -> Option<i64> {
    match field {
        "food_interest_level" => request.food_interest_level,
        "shopping_interest_level" => request.shopping_interest_level,
        "physical_activity_level" => request.physical_activity_level,
        "public_transit_comfort" => request.public_transit_comfort,
        "photography_importance" => request.photography_importance,
        _ => None,
    }
}

fn require_when(condition: bool, satisfied: bool, field: &'static str, when: &'static str) -> Check {
    if condition && !satisfied {
        Err(ValidationError::new(field, Rule::RequiredWhen(when)))
    } else {
        Ok(())
    }
}

fn forbid_when(present: bool, field: &'static str, when: &'static str) -> Check {
    if present {
        Err(ValidationError::new(field, Rule::ForbiddenWhen(when)))
    } else {
        Ok(())
    }
}

fn in_range(field: &'static str, value: Option<i64>, (min, max): (i64, i64)) -> Check {
    match value {
        Some(actual) if actual < min || actual > max => Err(ValidationError::new(
            field,
            Rule::OutOfRange { min, max, actual },
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn known() -> TripRequest {
        TripRequest {
            trip_mode: Some("known".to_string()),
            destination: Some("Lisbon".to_string()),
            knows_trip_length_b: Some(true),
            days_b: Some(3),
            people_b: Some(json!("2")),
            ..TripRequest::default()
        }
    }

    #[test]
    fn test_mode_is_checked_first() {
        let request = TripRequest {
            trip_mode: Some("wander".to_string()),
            ..TripRequest::default()
        };
        let err = validate(&request).unwrap_err();
        assert_eq!(err.field, "trip_mode");
        assert_eq!(err.rule, Rule::UnknownMode("wander".to_string()));
    }

    #[test]
    fn test_mode_is_case_insensitive() {
        let mut request = known();
        request.trip_mode = Some(" KNOWN ".to_string());
        assert_eq!(validate(&request).unwrap().mode(), TripMode::Known);
    }

    #[test]
    fn test_people_resolved_from_mode_block() {
        let mut request = known();
        request.people = Some(json!("3-4"));
        request.people_b = None;

        let err = validate(&request).unwrap_err();
        assert_eq!(err.field, "people_b");
        assert_eq!(err.rule, Rule::Required);
    }

    #[test]
    fn test_unsure_party_size_uses_default_bucket() {
        let mut request = known();
        request.people_b = Some(json!("Not sure"));

        let party = validate(&request).unwrap().party();
        assert_eq!(party.size, DEFAULT_PARTY_SIZE);
        assert!(party.assumed);
    }

    #[test]
    fn test_numeric_party_size() {
        let mut request = known();
        request.people_b = Some(json!(6));
        assert_eq!(validate(&request).unwrap().party().size, PartySize::FiveToSix);

        request.people_b = Some(json!(0));
        assert_eq!(validate(&request).unwrap_err().field, "people_b");
    }

    #[test]
    fn test_budget_amount_requires_concern() {
        let mut request = known();
        request.budget_amount = Some(500);

        let err = validate(&request).unwrap_err();
        assert_eq!(err.field, "budget_concern");

        request.budget_concern = Some(true);
        assert!(validate(&request).is_ok());
    }

    #[test]
    fn test_detail_flags_precede_block_rules() {
        let mut request = known();
        request.destination = None;
        request.accessibility_needs = Some(true);

        let err = validate(&request).unwrap_err();
        assert_eq!(err.field, "accessibility_details");
    }

    #[test]
    fn test_known_length_requires_days_b() {
        let mut request = known();
        request.days_b = None;
        assert_eq!(validate(&request).unwrap_err().field, "days_b");

        request.knows_trip_length_b = Some(false);
        let normalized = validate(&request).unwrap();
        assert_eq!(normalized.trip_length(), None);
    }

    #[test]
    fn test_discover_without_length_needs_dates() {
        let request = TripRequest {
            trip_mode: Some("discover".to_string()),
            has_discovery_intent: Some(false),
            knows_trip_length: Some(false),
            people: Some(json!("1")),
            origin_location: Some("Austin".to_string()),
            international_travel: Some(false),
            distance_preference: Some("50-100 miles".to_string()),
            has_dates: Some(true),
            ..TripRequest::default()
        };

        let err = validate(&request).unwrap_err();
        assert_eq!(err.field, "date_range");
        assert_eq!(err.rule, Rule::RequiredWhen("the trip length is unknown"));
    }

    #[test]
    fn test_other_start_time_requires_text() {
        let mut request = known();
        request.start_time_preference = Some("Other".to_string());
        assert_eq!(
            validate(&request).unwrap_err().field,
            "start_time_other_text"
        );

        request.start_time_other_text = Some("6:30 AM".to_string());
        assert!(validate(&request).is_ok());
    }

    #[test]
    fn test_budget_range() {
        let mut request = known();
        request.budget_concern = Some(true);
        request.budget_amount = Some(100_001);

        let err = validate(&request).unwrap_err();
        assert_eq!(
            err.rule,
            Rule::OutOfRange {
                min: 1,
                max: 100_000,
                actual: 100_001
            }
        );
    }

    #[test]
    fn test_stale_days_ignored_when_length_unknown() {
        let mut request = known();
        request.knows_trip_length_b = Some(false);
        assert_eq!(request.days_b, Some(3));
        assert_eq!(validate(&request).unwrap().trip_length(), None);

        let request = TripRequest {
            trip_mode: Some("discover".to_string()),
            has_discovery_intent: Some(false),
            knows_trip_length: Some(false),
            days: Some(5),
            people: Some(json!("2")),
            origin_location: Some("Austin".to_string()),
            international_travel: Some(false),
            distance_preference: Some("50-100 miles".to_string()),
            has_dates: Some(true),
            date_range: Some("June 3 - June 9".to_string()),
            ..TripRequest::default()
        };
        assert_eq!(validate(&request).unwrap().trip_length(), None);
    }

    #[test]
    fn test_out_of_mode_days_still_range_checked() {
        let mut request = known();
        request.days = Some(45);
        assert_eq!(validate(&request).unwrap_err().field, "days");
    }
}
