use serde_json::{json, Value};
use trip_itinerary::{validate, PartySize, Rule, TripMode, TripRequest, ValidationError};

fn request(value: Value) -> TripRequest {
    serde_json::from_value(value).unwrap()
}

fn known(extra: Value) -> TripRequest {
    let mut base = json!({
        "trip_mode": "known",
        "destination": "Lisbon",
        "knows_trip_length_b": true,
        "days_b": 3,
        "people_b": "2"
    });
    merge(&mut base, extra);
    request(base)
}

fn discover(extra: Value) -> TripRequest {
    let mut base = json!({
        "trip_mode": "discover",
        "has_discovery_intent": false,
        "knows_trip_length": true,
        "days": 5,
        "people": "3-4",
        "origin_location": "Austin",
        "international_travel": false,
        "distance_preference": "Within a day's drive"
    });
    merge(&mut base, extra);
    request(base)
}

fn merge(base: &mut Value, extra: Value) {
    if let (Some(base), Value::Object(extra)) = (base.as_object_mut(), extra) {
        for (key, value) in extra {
            base.insert(key, value);
        }
    }
}

fn field_of(result: Result<impl std::fmt::Debug, ValidationError>) -> &'static str {
    result.unwrap_err().field
}

#[test]
fn test_known_with_destination_and_days_is_valid() {
    for days in [1, 3, 30] {
        let normalized = validate(&known(json!({ "days_b": days }))).unwrap();
        assert_eq!(normalized.mode(), TripMode::Known);
        assert_eq!(normalized.trip_length(), Some(days as u32));
    }
}

#[test]
fn test_known_block_ignores_discover_fields() {
    // International travel without countries only matters in DISCOVER mode.
    let normalized = validate(&known(json!({
        "international_travel": true,
        "origin_location": null,
        "days": 7
    })))
    .unwrap();
    assert_eq!(normalized.trip_length(), Some(3));
}

#[test]
fn test_unknown_mode_is_rejected_first() {
    let err = validate(&request(json!({ "trip_mode": "surprise me" }))).unwrap_err();
    assert_eq!(err.field, "trip_mode");
    assert_eq!(err.rule, Rule::UnknownMode("surprise me".to_string()));

    let err = validate(&TripRequest::default()).unwrap_err();
    assert_eq!(err, ValidationError::new("trip_mode", Rule::Required));
}

#[test]
fn test_mode_is_case_insensitive() {
    let normalized = validate(&known(json!({ "trip_mode": "  KNOWN " }))).unwrap();
    assert_eq!(normalized.mode(), TripMode::Known);
}

#[test]
fn test_people_is_required_for_the_active_mode() {
    assert_eq!(field_of(validate(&known(json!({ "people_b": null })))), "people_b");
    assert_eq!(field_of(validate(&discover(json!({ "people": "  " })))), "people");

    // The other block's people field does not satisfy the active mode.
    let err = validate(&known(json!({ "people_b": null, "people": "2" }))).unwrap_err();
    assert_eq!(err.field, "people_b");
}

#[test]
fn test_people_buckets() {
    let party = validate(&known(json!({ "people_b": 12 }))).unwrap().party();
    assert_eq!(party.size, PartySize::TenToFourteen);
    assert!(!party.assumed);

    let party = validate(&known(json!({ "people_b": "15 or more" }))).unwrap().party();
    assert_eq!(party.size, PartySize::FifteenOrMore);

    let party = validate(&known(json!({ "people_b": "not sure" }))).unwrap().party();
    assert_eq!(party.size, PartySize::Two);
    assert!(party.assumed);

    let err = validate(&known(json!({ "people_b": 0 }))).unwrap_err();
    assert_eq!(err.field, "people_b");
    assert!(matches!(err.rule, Rule::Invalid(_)));
}

#[test]
fn test_detail_flags_require_detail() {
    let err = validate(&known(json!({ "has_time_constraints": true }))).unwrap_err();
    assert_eq!(
        err,
        ValidationError::new(
            "time_constraints_detail",
            Rule::RequiredWhen("has_time_constraints is true")
        )
    );

    let err = validate(&known(json!({
        "accessibility_needs": true,
        "accessibility_details": ""
    })))
    .unwrap_err();
    assert_eq!(err.field, "accessibility_details");

    let err = validate(&known(json!({ "budget_amount": 500 }))).unwrap_err();
    assert_eq!(err.field, "budget_concern");

    let err = validate(&known(json!({ "budget_amount": 500, "budget_concern": false }))).unwrap_err();
    assert_eq!(err.field, "budget_concern");
}

#[test]
fn test_known_requires_destination_and_days_when_length_known() {
    assert_eq!(field_of(validate(&known(json!({ "destination": null })))), "destination");
    assert_eq!(field_of(validate(&known(json!({ "days_b": null })))), "days_b");

    let normalized = validate(&known(json!({
        "knows_trip_length_b": false,
        "days_b": null
    })))
    .unwrap();
    assert_eq!(normalized.trip_length(), None);
}

#[test]
fn test_international_requires_countries() {
    let err = validate(&discover(json!({
        "international_travel": true,
        "distance_preference": null
    })))
    .unwrap_err();
    assert_eq!(err.field, "preferred_countries");
    assert!(matches!(err.rule, Rule::RequiredWhen(_)));
}

#[test]
fn test_international_forbids_distance() {
    let err = validate(&discover(json!({
        "international_travel": true,
        "preferred_countries": "Japan"
    })))
    .unwrap_err();
    assert_eq!(err.field, "distance_preference");
    assert!(matches!(err.rule, Rule::ForbiddenWhen(_)));

    validate(&discover(json!({
        "international_travel": true,
        "preferred_countries": "Japan",
        "distance_preference": null
    })))
    .unwrap();
}

#[test]
fn test_domestic_forbids_countries() {
    let err = validate(&discover(json!({ "preferred_countries": "Japan" }))).unwrap_err();
    assert_eq!(err.field, "preferred_countries");
    assert!(matches!(err.rule, Rule::ForbiddenWhen(_)));
}

#[test]
fn test_austin_discover_without_distance_names_distance_preference() {
    let err = validate(&request(json!({
        "trip_mode": "discover",
        "has_discovery_intent": false,
        "knows_trip_length": true,
        "days": 5,
        "people": "2",
        "origin_location": "Austin",
        "international_travel": false
    })))
    .unwrap_err();

    assert_eq!(
        err,
        ValidationError::new(
            "distance_preference",
            Rule::RequiredWhen("international_travel is false")
        )
    );
}

#[test]
fn test_discover_needs_dates_when_length_unknown() {
    let err = validate(&discover(json!({ "knows_trip_length": false, "days": null }))).unwrap_err();
    assert_eq!(err.field, "has_dates");

    let err = validate(&discover(json!({
        "knows_trip_length": false,
        "days": null,
        "has_dates": true
    })))
    .unwrap_err();
    assert_eq!(err.field, "date_range");

    let normalized = validate(&discover(json!({
        "knows_trip_length": false,
        "days": null,
        "has_dates": true,
        "date_range": "June 3 - June 9"
    })))
    .unwrap();
    assert_eq!(normalized.trip_length(), None);
}

#[test]
fn test_discover_intent_and_origin() {
    let err = validate(&discover(json!({ "has_discovery_intent": true }))).unwrap_err();
    assert_eq!(err.field, "discovery_intent");

    let err = validate(&discover(json!({ "origin_location": "" }))).unwrap_err();
    assert_eq!(err.field, "origin_location");

    let err = validate(&discover(json!({ "international_travel": null }))).unwrap_err();
    assert_eq!(err, ValidationError::new("international_travel", Rule::Required));
}

#[test]
fn test_other_selections_require_text() {
    let cases = [
        (json!({ "cuisine_preferences": ["Thai", "Other"] }), "cuisine_preferences_other_text"),
        (json!({ "shopping_preferences": ["Other"] }), "shopping_preferences_other_text"),
        (json!({ "start_time_preference": "Other" }), "start_time_other_text"),
        (json!({ "end_time_preference": "Other" }), "end_time_other_text"),
    ];

    for (extra, field) in cases {
        assert_eq!(field_of(validate(&known(extra))), field);
    }

    validate(&known(json!({
        "cuisine_preferences": ["Thai", "Other"],
        "cuisine_preferences_other_text": "Ethiopian"
    })))
    .unwrap();
}

#[test]
fn test_rated_fields_bounds() {
    for field in [
        "food_interest_level",
        "shopping_interest_level",
        "physical_activity_level",
        "public_transit_comfort",
        "photography_importance",
    ] {
        for bad in [0, 11] {
            let err = validate(&known(json!({ field: bad }))).unwrap_err();
            assert_eq!(err.field, field);
            assert_eq!(
                err.rule,
                Rule::OutOfRange {
                    min: 1,
                    max: 10,
                    actual: bad
                }
            );
        }
        for good in [1, 10] {
            let normalized = validate(&known(json!({ field: good }))).unwrap();
            assert_eq!(normalized.rating(field), Some(good));
        }
    }
}

#[test]
fn test_days_and_budget_bounds() {
    assert_eq!(field_of(validate(&known(json!({ "days_b": 0 })))), "days_b");
    assert_eq!(field_of(validate(&known(json!({ "days_b": 31 })))), "days_b");
    assert_eq!(field_of(validate(&discover(json!({ "days": 31 })))), "days");

    let err = validate(&known(json!({
        "budget_concern": true,
        "budget_amount": 100_001
    })))
    .unwrap_err();
    assert_eq!(err.field, "budget_amount");
}

#[test]
fn test_first_violation_wins() {
    // Detail flags (step 3) are checked before the mode block (step 4) and ranges (step 6).
    let err = validate(&known(json!({
        "destination": null,
        "has_time_constraints": true,
        "food_interest_level": 42
    })))
    .unwrap_err();
    assert_eq!(err.field, "time_constraints_detail");
}

#[test]
fn test_validation_does_not_mutate_input() {
    let original = known(json!({ "cuisine_preferences": ["  Thai  "] }));
    let copy = original.clone();
    let normalized = validate(&original).unwrap();
    assert_eq!(original, copy);
    assert_eq!(normalized.request(), &copy);
}
