//! Compiles a validated trip request into the directive text handed to the
//! generation service.
//!
//! The output is a pure function of the request: every field is rendered on
//! its own line, absent values become an explicit placeholder, and the fixed
//! planning rules are appended last.

use std::fmt;

use tracing::debug;

use crate::{
    core::validator::NormalizedRequest,
    schemas::itinerary_schema_prompt,
    services::planning::{
        accessibility_rules, pacing_rules, priority_rules, structure_rules, Signal,
    },
    types::request::{list, text},
    types::{RatingBand, ScheduleStyle, TripMode, TripRequest, OTHER_OPTION},
};

const NOT_SPECIFIED: &str = "Not specified";
const NONE: &str = "None";

/// Finished directive text. Immutable once compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveDocument {
    text: String,
}

impl DirectiveDocument {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The directive followed by the output schema contract: the exact text
    /// sent to the generation service.
    pub fn into_prompt(self) -> String {
        let mut prompt = self.text;
        prompt.push_str("\n\n");
        prompt.push_str(itinerary_schema_prompt());
        prompt
    }
}

impl fmt::Display for DirectiveDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Default)]
struct DirectiveBuilder {
    out: String,
}

impl DirectiveBuilder {
    fn heading(&mut self, title: &str) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        self.out.push_str(&format!("== {} ==\n", title));
    }

    fn field(&mut self, label: &str, value: impl fmt::Display) {
        self.out.push_str(&format!("- {}: {}\n", label, value));
    }

    fn block(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn finish(self) -> DirectiveDocument {
        DirectiveDocument {
            text: self.out.trim_end().to_string(),
        }
    }
}

/// Render a validated request as a directive document.
pub fn compile(normalized: &NormalizedRequest) -> DirectiveDocument {
    let request = normalized.request();
    let mut doc = DirectiveBuilder::default();

    doc.block("TRIP PLANNING DIRECTIVE");
    doc.block("Plan a day-by-day itinerary for the traveler described below.");

    doc.heading("TRIP MODE");
    match normalized.mode() {
        TripMode::Discover => {
            doc.field(
                "Mode",
                "Discover. Recommend one destination that fits everything below, then plan it",
            );
            render_discover(&mut doc, normalized);
        }
        TripMode::Known => {
            doc.field("Mode", "Known destination");
            render_known(&mut doc, normalized);
        }
    }

    render_travelers(&mut doc, normalized);
    render_preferences(&mut doc, request);
    render_priority_snapshot(&mut doc, normalized);

    doc.heading("PLANNING RULES");
    doc.block(priority_rules());
    doc.block("");
    doc.block(&pacing_rules());
    doc.block("");
    doc.block(accessibility_rules());
    doc.block("");
    doc.block(structure_rules());

    let document = doc.finish();
    debug!(
        target: "trip::directive",
        mode = normalized.mode().as_str(),
        bytes = document.len(),
        "directive compiled"
    );
    document
}

fn render_discover(doc: &mut DirectiveBuilder, normalized: &NormalizedRequest) {
    let request = normalized.request();
    doc.heading("DESTINATION DISCOVERY");

    doc.field("Has an idea of what to do", yes_no(request.has_discovery_intent));
    doc.field("Places or experiences in mind", or_placeholder(text(&request.discovery_intent)));
    doc.field("Starting from", or_placeholder(text(&request.origin_location)));
    doc.field("Getting there by", or_placeholder(text(&request.transport_mode)));

    if request.international_travel == Some(true) {
        doc.field("International travel", "Yes");
        doc.field("Preferred countries", or_placeholder(text(&request.preferred_countries)));
    } else {
        doc.field("International travel", "No, stay within the origin's country");
        doc.field("Distance from origin", or_placeholder(text(&request.distance_preference)));
    }

    doc.field("Trip length", trip_length(normalized.trip_length()));
    doc.field("Dates known", yes_no(request.has_dates));
    doc.field("Date range", or_placeholder(text(&request.date_range)));
    doc.field("One area or several", or_placeholder(text(&request.area_structure)));
}

fn render_known(doc: &mut DirectiveBuilder, normalized: &NormalizedRequest) {
    let request = normalized.request();
    doc.heading("DESTINATION");

    doc.field(
        "Destination (including any dates given)",
        or_placeholder(text(&request.destination)),
    );
    doc.field("Trip length", trip_length(normalized.trip_length()));
}

fn render_travelers(doc: &mut DirectiveBuilder, normalized: &NormalizedRequest) {
    let request = normalized.request();
    let party = normalized.party();
    doc.heading("TRAVELERS AND HARD CONSTRAINTS");

    if party.assumed {
        doc.field(
            "People",
            format!(
                "{} (assumed; the traveler was not sure)",
                party.size.label()
            ),
        );
    } else {
        doc.field("People", party.size.label());
    }

    doc.field("Special group needs", joined(list(&request.special_group_needs), ", "));
    doc.field(
        "Accessibility needs",
        flag_with_detail(request.accessibility_needs, text(&request.accessibility_details)),
    );
    doc.field(
        "Strict time constraints",
        flag_with_detail(request.has_time_constraints, text(&request.time_constraints_detail)),
    );
}

fn render_preferences(doc: &mut DirectiveBuilder, request: &TripRequest) {
    doc.heading("PREFERENCES");

    doc.field("Money is a concern", yes_no(request.budget_concern));
    doc.field(
        "Budget amount",
        or_placeholder(request.budget_amount.map(|amount| amount.to_string())),
    );
    doc.field("Weather to avoid", joined(list(&request.weather_avoidance), ", "));
    doc.field("Interests", or_placeholder(text(&request.interests)));

    doc.field("Food interest", rating(Signal::Food, request.food_interest_level));
    doc.field(
        "Cuisines",
        joined(
            resolve_other(&request.cuisine_preferences, &request.cuisine_preferences_other_text),
            ", ",
        ),
    );
    doc.field("Shopping interest", rating(Signal::Shopping, request.shopping_interest_level));
    doc.field(
        "Shopping for",
        joined(
            resolve_other(&request.shopping_preferences, &request.shopping_preferences_other_text),
            ", ",
        ),
    );

    doc.field("Trip purpose", or_placeholder(text(&request.trip_purpose)));
    doc.field("Schedule style", schedule_style(text(&request.schedule_style)));
    doc.field("Must do", joined(list(&request.must_do), "; "));
    doc.field("Must avoid", joined(list(&request.must_avoid), "; "));
    doc.field(
        "Physical activity",
        rating(Signal::PhysicalActivity, request.physical_activity_level),
    );
    doc.field(
        "Public transit comfort",
        rating(Signal::PublicTransit, request.public_transit_comfort),
    );
    doc.field("Nightlife", yes_no(request.nightlife));
    doc.field(
        "Photography importance",
        rating(Signal::Photography, request.photography_importance),
    );
    doc.field("Desired feelings", joined(list(&request.desired_feelings), "; "));
    doc.field("Travel vs depth", or_placeholder(text(&request.travel_vs_depth)));
    doc.field("Places to exclude", joined(list(&request.excluded_places), "; "));
    doc.field(
        "Daily start time",
        or_placeholder(resolve_choice(
            &request.start_time_preference,
            &request.start_time_other_text,
        )),
    );
    doc.field(
        "Daily return time",
        or_placeholder(resolve_choice(
            &request.end_time_preference,
            &request.end_time_other_text,
        )),
    );
    doc.field("Additional notes", or_placeholder(text(&request.additional_notes)));
}

fn render_priority_snapshot(doc: &mut DirectiveBuilder, normalized: &NormalizedRequest) {
    let request = normalized.request();
    let mut hard = Vec::new();
    let mut strong = Vec::new();
    let mut moderate = Vec::new();
    let mut weak = Vec::new();

    if let Some(detail) = text(&request.accessibility_details) {
        hard.push(format!("accessibility ({})", detail));
    }
    if let Some(needs) = list(&request.special_group_needs).filter(|needs| needs != &[NONE]) {
        hard.push(format!("group needs ({})", needs.join(", ")));
    }
    if let Some(detail) = text(&request.time_constraints_detail) {
        hard.push(format!("time windows ({})", detail));
    }
    if let Some(items) = list(&request.must_avoid) {
        hard.push(format!("avoid ({})", items.join("; ")));
    }
    if let Some(places) = list(&request.excluded_places) {
        hard.push(format!("excluded places ({})", places.join("; ")));
    }
    if let Some(weather) = list(&request.weather_avoidance) {
        hard.push(format!("weather to avoid ({})", weather.join(", ")));
    }
    if let Some(days) = normalized.trip_length() {
        hard.push(format!("exactly {} days", days));
    }
    if normalized.mode() == TripMode::Discover {
        if let Some(dates) = text(&request.date_range) {
            hard.push(format!("dates ({})", dates));
        }
        match request.international_travel {
            Some(true) => {
                if let Some(countries) = text(&request.preferred_countries) {
                    hard.push(format!("countries ({})", countries));
                }
            }
            _ => {
                hard.push("no international travel".to_string());
                if let Some(distance) = text(&request.distance_preference) {
                    hard.push(format!("distance ({})", distance));
                }
            }
        }
    }

    for signal in Signal::ALL {
        let Some(value) = normalized.rating(signal.field()) else {
            continue;
        };
        let entry = format!("{} {}/10", signal.label().to_lowercase(), value);
        match RatingBand::from_rating(value) {
            Some(RatingBand::Central) => strong.push(entry),
            Some(RatingBand::Selective) => moderate.push(entry),
            Some(RatingBand::Minimal) => weak.push(entry),
            None => {}
        }
    }
    if let Some(items) = list(&request.must_do) {
        strong.push(format!("must do ({})", items.join("; ")));
    }
    if let Some(style) = text(&request.schedule_style) {
        moderate.push(format!("schedule style ({})", style));
    }
    if let Some(stance) = text(&request.travel_vs_depth) {
        moderate.push(format!("travel vs depth ({})", stance));
    }

    doc.heading("PRIORITY SNAPSHOT");
    doc.field("Hard constraints", tier(&hard));
    doc.field("Strong preferences", tier(&strong));
    doc.field("Moderate preferences", tier(&moderate));
    doc.field("Weak preferences", tier(&weak));
}

/// Replace the "Other" sentinel with its free text, keeping the remaining
/// selections in order.
pub fn resolve_other<'a>(
    selections: &'a Option<Vec<String>>,
    other_text: &'a Option<String>,
) -> Option<Vec<&'a str>> {
    let resolved: Vec<&str> = list(selections)?
        .into_iter()
        .filter_map(|item| {
            if item == OTHER_OPTION {
                text(other_text)
            } else {
                Some(item)
            }
        })
        .collect();

    if resolved.is_empty() {
        None
    } else {
        Some(resolved)
    }
}

fn resolve_choice<'a>(choice: &'a Option<String>, other_text: &'a Option<String>) -> Option<&'a str> {
    match text(choice) {
        Some(OTHER_OPTION) => text(other_text),
        other => other,
    }
}

fn or_placeholder(value: Option<impl fmt::Display>) -> String {
    value
        .map(|value| value.to_string())
        .unwrap_or_else(|| NOT_SPECIFIED.to_string())
}

fn joined(items: Option<Vec<&str>>, separator: &str) -> String {
    items
        .map(|items| items.join(separator))
        .unwrap_or_else(|| NONE.to_string())
}

fn tier(entries: &[String]) -> String {
    if entries.is_empty() {
        NONE.to_string()
    } else {
        entries.join("; ")
    }
}

fn yes_no(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "Yes",
        Some(false) => "No",
        None => NOT_SPECIFIED,
    }
}

fn flag_with_detail(flag: Option<bool>, detail: Option<&str>) -> String {
    match (flag, detail) {
        (Some(true), Some(detail)) => format!("Yes. {}", detail),
        (flag, _) => yes_no(flag).to_string(),
    }
}

fn trip_length(days: Option<u32>) -> String {
    match days {
        Some(1) => "1 day".to_string(),
        Some(days) => format!("{} days", days),
        None => NOT_SPECIFIED.to_string(),
    }
}

fn rating(signal: Signal, value: Option<i64>) -> String {
    match value.and_then(|value| RatingBand::from_rating(value).map(|band| (value, band))) {
        Some((value, band)) => format!(
            "{}/10 ({}: {})",
            value,
            band.label(),
            signal.guidance(band)
        ),
        None => NOT_SPECIFIED.to_string(),
    }
}

fn schedule_style(value: Option<&str>) -> String {
    match value {
        Some(raw) => {
            let style = ScheduleStyle::parse(raw).unwrap_or(ScheduleStyle::Balanced);
            format!("{} ({})", raw, style.pacing())
        }
        None => NOT_SPECIFIED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_other_keeps_order() {
        let selections = Some(vec![
            "Thai".to_string(),
            "Other".to_string(),
            "Greek".to_string(),
        ]);
        let other = Some("Ethiopian".to_string());

        assert_eq!(
            resolve_other(&selections, &other),
            Some(vec!["Thai", "Ethiopian", "Greek"])
        );
    }

    #[test]
    fn test_resolve_other_without_text_drops_sentinel() {
        let selections = Some(vec!["Other".to_string()]);
        assert_eq!(resolve_other(&selections, &None), None);
    }

    #[test]
    fn test_rating_line_includes_band_and_guidance() {
        let line = rating(Signal::Food, Some(8));
        assert!(line.starts_with("8/10 (central theme:"));
        assert_eq!(rating(Signal::Food, None), NOT_SPECIFIED);
    }

    #[test]
    fn test_unknown_schedule_style_uses_balanced_band() {
        let line = schedule_style(Some("Whatever works"));
        assert!(line.starts_with("Whatever works (2-3 activities per day"));
    }

    #[test]
    fn test_other_time_choice_resolves_to_text() {
        let choice = Some("Other".to_string());
        let other = Some("6:30 AM".to_string());
        assert_eq!(resolve_choice(&choice, &other), Some("6:30 AM"));
        assert_eq!(resolve_choice(&Some("9 AM".to_string()), &other), Some("9 AM"));
    }
}
