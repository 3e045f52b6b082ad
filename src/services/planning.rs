//! Fixed planning rules appended to every directive.

use crate::types::{RatingBand, ScheduleStyle};

/// Rated signals the pacing table gives specific guidance for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Food,
    Shopping,
    PhysicalActivity,
    PublicTransit,
    Photography,
}

impl Signal {
    pub const ALL: [Signal; 5] = [
        Signal::Food,
        Signal::Shopping,
        Signal::PhysicalActivity,
        Signal::PublicTransit,
        Signal::Photography,
    ];

    /// Wire name of the rating field.
    pub fn field(self) -> &'static str {
        match self {
            Signal::Food => "food_interest_level",
            Signal::Shopping => "shopping_interest_level",
            Signal::PhysicalActivity => "physical_activity_level",
            Signal::PublicTransit => "public_transit_comfort",
            Signal::Photography => "photography_importance",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Signal::Food => "Food interest",
            Signal::Shopping => "Shopping interest",
            Signal::PhysicalActivity => "Physical activity",
            Signal::PublicTransit => "Public transit comfort",
            Signal::Photography => "Photography importance",
        }
    }

    /// How strongly the itinerary should lean on this signal.
    pub fn guidance(self, band: RatingBand) -> &'static str {
        match (self, band) {
            (Signal::Food, RatingBand::Minimal) => "keep meals practical and close to the route",
            (Signal::Food, RatingBand::Selective) => "include a few notable meals as secondary stops",
            (Signal::Food, RatingBand::Central) => "build days around food experiences and standout restaurants",
            (Signal::Shopping, RatingBand::Minimal) => "avoid dedicated shopping stops",
            (Signal::Shopping, RatingBand::Selective) => "allow occasional browsing that fits the route",
            (Signal::Shopping, RatingBand::Central) => "schedule dedicated shopping time in the matching districts and markets",
            (Signal::PhysicalActivity, RatingBand::Minimal) => "keep walking light and avoid strenuous activities",
            (Signal::PhysicalActivity, RatingBand::Selective) => "mix moderate walks with rest",
            (Signal::PhysicalActivity, RatingBand::Central) => "feature hikes, long walks, or active excursions",
            (Signal::PublicTransit, RatingBand::Minimal) => "prefer walking, taxis, or driving over public transit",
            (Signal::PublicTransit, RatingBand::Selective) => "use simple direct transit lines only",
            (Signal::PublicTransit, RatingBand::Central) => "public transit can be the main way of getting around",
            (Signal::Photography, RatingBand::Minimal) => "no need to plan around photo spots",
            (Signal::Photography, RatingBand::Selective) => "mention photogenic spots that are already on the route",
            (Signal::Photography, RatingBand::Central) => "plan viewpoints and golden-hour stops deliberately",
        }
    }
}

const PRIORITY_RULES: &str = "\
Conflict priority (highest first):
1. Hard constraints: safety, accessibility needs, strict time windows, explicit exclusions (must-avoid items and excluded places), and feasibility limits (trip length, dates, distance, international eligibility). Never violate these.
2. Strong preferences: ratings of 7-10 and explicit must-do items.
3. Moderate preferences: ratings of 4-6, schedule style, and the travel-vs-depth stance.
4. Weak preferences: ratings of 1-3. Minimize these, but do not ignore them.

Conflict resolution:
- A hard constraint always overrides any preference.
- Between conflicting rules, the higher-priority rule wins.
- Within the same tier, choose the more conservative, lower-risk interpretation.
- Only when you resolved a conflict or assumed missing information, end the summary with \"Assumptions:\" followed by 1-3 short bullets stating each choice. Otherwise leave the note out.";

const ACCESSIBILITY_RULES: &str = "\
Accessibility and group needs:
- When accessibility needs are stated, every activity must be feasible for them. Prefer step-free routes, accessible venues, and regular rest stops, even when this overrides a strong preference.
- With children, elderly, or disabled travelers, keep walking distances and day lengths appropriate and schedule breaks.
- Treat strict time constraints as fixed blocks and respect the daily start and return times.";

const STRUCTURE_RULES: &str = "\
Day structure:
- Every day has Morning, Afternoon, and Evening sections. Fill each one by default; leave a section empty only when nothing sensible applies, such as the evening after a late arrival.
- The final day must read as an intentional close of the trip (a last highlight, checkout, and departure logistics), never as a truncated day.
- The output must conform exactly to the JSON schema that follows this directive.";

/// Priority taxonomy and conflict-resolution rules, in priority order.
pub fn priority_rules() -> &'static str {
    PRIORITY_RULES
}

/// Schedule-style and rating-band pacing table.
pub fn pacing_rules() -> String {
    let mut lines = vec!["Pacing:".to_string()];

    for (label, style) in [
        ("Packed", ScheduleStyle::Packed),
        ("Relaxed", ScheduleStyle::Relaxed),
        ("Somewhere in between", ScheduleStyle::Balanced),
    ] {
        lines.push(format!("- {}: {}.", label, style.pacing()));
    }

    lines.push(String::new());
    lines.push("Rating bands (food, shopping, physical activity, photography):".to_string());
    lines.push(format!(
        "- 1-3 ({}): include only where it fits naturally.",
        RatingBand::Minimal.label()
    ));
    lines.push(format!(
        "- 4-6 ({}): a few well-chosen options, without building days around them.",
        RatingBand::Selective.label()
    ));
    lines.push(format!(
        "- 7-10 ({}): build days around this interest.",
        RatingBand::Central.label()
    ));

    lines.join("\n")
}

pub fn accessibility_rules() -> &'static str {
    ACCESSIBILITY_RULES
}

pub fn structure_rules() -> &'static str {
    STRUCTURE_RULES
}
