use serde_json::{json, Value};
use trip_itinerary::{compile, itinerary_schema_prompt, validate, DirectiveDocument, TripRequest};

fn directive(value: Value) -> DirectiveDocument {
    let request: TripRequest = serde_json::from_value(value).unwrap();
    compile(&validate(&request).unwrap())
}

fn lisbon() -> Value {
    json!({
        "trip_mode": "known",
        "destination": "Lisbon",
        "knows_trip_length_b": true,
        "days_b": 3,
        "people_b": "2",
        "budget_concern": true,
        "budget_amount": 500
    })
}

fn line_for<'a>(doc: &'a DirectiveDocument, label: &str) -> &'a str {
    let prefix = format!("- {}: ", label);
    doc.as_str()
        .lines()
        .find(|line| line.starts_with(&prefix))
        .unwrap_or_else(|| panic!("no `{}` line in directive", label))
}

#[test]
fn test_compile_is_deterministic() {
    let first = directive(lisbon());
    let second = directive(lisbon());
    assert_eq!(first.as_str().as_bytes(), second.as_str().as_bytes());
}

#[test]
fn test_lisbon_scenario() {
    let doc = directive(lisbon());
    let text = doc.as_str();

    let known_block = text.find("== DESTINATION ==").unwrap();
    let travelers = text.find("== TRAVELERS AND HARD CONSTRAINTS ==").unwrap();
    assert!(text[known_block..travelers].contains("Lisbon"));
    assert!(!text.contains("== DESTINATION DISCOVERY =="));

    assert_eq!(line_for(&doc, "Money is a concern"), "- Money is a concern: Yes");
    assert_eq!(line_for(&doc, "Budget amount"), "- Budget amount: 500");
    assert_eq!(line_for(&doc, "Trip length"), "- Trip length: 3 days");
}

#[test]
fn test_discover_block_is_exclusive() {
    let doc = directive(json!({
        "trip_mode": "discover",
        "has_discovery_intent": true,
        "discovery_intent": "Hot springs and quiet hikes",
        "knows_trip_length": true,
        "days": 5,
        "people": 4,
        "origin_location": "Austin",
        "transport_mode": "Car",
        "international_travel": false,
        "distance_preference": "Within 6 hours"
    }));
    let text = doc.as_str();

    assert!(text.contains("== DESTINATION DISCOVERY =="));
    assert!(!text.contains("== DESTINATION ==\n"));
    assert_eq!(line_for(&doc, "Starting from"), "- Starting from: Austin");
    assert_eq!(line_for(&doc, "Distance from origin"), "- Distance from origin: Within 6 hours");
    assert_eq!(line_for(&doc, "People"), "- People: 3-4");
    assert!(!text.contains("Preferred countries"));
}

#[test]
fn test_absent_values_use_placeholders() {
    let doc = directive(lisbon());

    assert_eq!(line_for(&doc, "Interests"), "- Interests: Not specified");
    assert_eq!(line_for(&doc, "Food interest"), "- Food interest: Not specified");
    assert_eq!(line_for(&doc, "Cuisines"), "- Cuisines: None");
    assert_eq!(line_for(&doc, "Must avoid"), "- Must avoid: None");
    assert_eq!(line_for(&doc, "Nightlife"), "- Nightlife: Not specified");
    assert_eq!(line_for(&doc, "Additional notes"), "- Additional notes: Not specified");
}

#[test]
fn test_other_is_replaced_in_place() {
    let mut request = lisbon();
    request["cuisine_preferences"] = json!(["Thai", "Other", "Greek"]);
    request["cuisine_preferences_other_text"] = json!("Ethiopian");
    request["shopping_preferences"] = json!(["Other", "Books"]);
    request["shopping_preferences_other_text"] = json!("Vintage vinyl");
    request["start_time_preference"] = json!("Other");
    request["start_time_other_text"] = json!("Before sunrise");

    let doc = directive(request);
    assert_eq!(line_for(&doc, "Cuisines"), "- Cuisines: Thai, Ethiopian, Greek");
    assert_eq!(line_for(&doc, "Shopping for"), "- Shopping for: Vintage vinyl, Books");
    assert_eq!(line_for(&doc, "Daily start time"), "- Daily start time: Before sunrise");
    assert_eq!(line_for(&doc, "Daily return time"), "- Daily return time: Not specified");
}

#[test]
fn test_ratings_carry_their_band() {
    let mut request = lisbon();
    request["food_interest_level"] = json!(9);
    request["shopping_interest_level"] = json!(5);
    request["photography_importance"] = json!(2);

    let doc = directive(request);
    assert!(line_for(&doc, "Food interest").contains("9/10 (central theme"));
    assert!(line_for(&doc, "Shopping interest").contains("5/10 (selective / secondary"));
    assert!(line_for(&doc, "Photography importance").contains("2/10 (minimal"));

    assert!(line_for(&doc, "Strong preferences").contains("food interest 9/10"));
    assert!(line_for(&doc, "Moderate preferences").contains("shopping interest 5/10"));
    assert!(line_for(&doc, "Weak preferences").contains("photography importance 2/10"));
}

#[test]
fn test_hard_constraints_in_snapshot() {
    let mut request = lisbon();
    request["accessibility_needs"] = json!(true);
    request["accessibility_details"] = json!("Wheelchair user");
    request["excluded_places"] = json!(["Sintra"]);

    let doc = directive(request);
    let hard = line_for(&doc, "Hard constraints");
    assert!(hard.contains("accessibility (Wheelchair user)"));
    assert!(hard.contains("excluded places (Sintra)"));
    assert!(hard.contains("exactly 3 days"));
    assert_eq!(
        line_for(&doc, "Accessibility needs"),
        "- Accessibility needs: Yes. Wheelchair user"
    );
}

#[test]
fn test_dates_win_over_stale_days() {
    let doc = directive(json!({
        "trip_mode": "discover",
        "has_discovery_intent": false,
        "knows_trip_length": false,
        "days": 5,
        "has_dates": true,
        "date_range": "June 3 - June 9",
        "people": "2",
        "origin_location": "Austin",
        "international_travel": false,
        "distance_preference": "50-100 miles"
    }));

    assert_eq!(line_for(&doc, "Trip length"), "- Trip length: Not specified");
    let hard = line_for(&doc, "Hard constraints");
    assert!(hard.contains("dates (June 3 - June 9)"));
    assert!(!hard.contains("exactly"));
}

#[test]
fn test_known_mode_ignores_discover_fields() {
    let mut request = lisbon();
    request["knows_trip_length_b"] = json!(false);
    request["date_range"] = json!("June 3 - June 9");

    let doc = directive(request);
    assert_eq!(line_for(&doc, "Trip length"), "- Trip length: Not specified");
    let hard = line_for(&doc, "Hard constraints");
    assert!(!hard.contains("exactly"));
    assert!(!hard.contains("June 3"));
}

#[test]
fn test_assumed_party_is_flagged() {
    let mut request = lisbon();
    request["people_b"] = json!("not sure");

    let doc = directive(request);
    assert!(line_for(&doc, "People").contains("2 (assumed"));
}

#[test]
fn test_planning_rules_in_priority_order() {
    let doc = directive(lisbon());
    let text = doc.as_str();

    let rules = text.find("== PLANNING RULES ==").unwrap();
    let hard = text.find("1. Hard constraints").unwrap();
    let strong = text.find("2. Strong preferences").unwrap();
    let moderate = text.find("3. Moderate preferences").unwrap();
    let weak = text.find("4. Weak preferences").unwrap();
    assert!(rules < hard && hard < strong && strong < moderate && moderate < weak);

    assert!(text.contains("Packed: 3-4 substantial activities per day"));
    assert!(text.contains("final day must read as an intentional close"));
    assert!(text.contains("Assumptions:"));
}

#[test]
fn test_prompt_appends_schema_contract() {
    let doc = directive(lisbon());
    let directive_text = doc.as_str().to_string();
    let prompt = doc.into_prompt();

    assert!(prompt.starts_with(&directive_text));
    assert!(prompt.ends_with(itinerary_schema_prompt()));
}
