use std::sync::OnceLock;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schemas::{CompletionSchema, SchemaHandle};

/// Day-by-day itinerary returned by the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ItineraryResult {
    /// One entry per trip day, in order
    pub days: Vec<Day>,
    /// Short overview of the whole trip
    pub summary: String,
    /// Keys outside the contract, carried through unchanged
    #[serde(flatten)]
    #[schemars(skip)]
    pub extra: Map<String, Value>,
}

/// A single day of the itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Day {
    /// 1-based day counter
    pub day: u32,
    /// Activities grouped by part of the day
    pub sections: DaySections,
    #[serde(flatten)]
    #[schemars(skip)]
    pub extra: Map<String, Value>,
}

/// Activities for each part of a day. A list may be empty but is always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DaySections {
    pub morning: Vec<String>,
    pub afternoon: Vec<String>,
    pub evening: Vec<String>,
    #[serde(flatten)]
    #[schemars(skip)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Morning,
    Afternoon,
    Evening,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Morning, Section::Afternoon, Section::Evening];

    /// JSON key used in the `sections` object.
    pub fn key(self) -> &'static str {
        match self {
            Section::Morning => "morning",
            Section::Afternoon => "afternoon",
            Section::Evening => "evening",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::Morning => "Morning",
            Section::Afternoon => "Afternoon",
            Section::Evening => "Evening",
        }
    }
}

impl DaySections {
    pub fn get(&self, section: Section) -> &[String] {
        match section {
            Section::Morning => &self.morning,
            Section::Afternoon => &self.afternoon,
            Section::Evening => &self.evening,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Section, &[String])> {
        Section::ALL
            .into_iter()
            .map(move |section| (section, self.get(section)))
    }

    pub fn activity_count(&self) -> usize {
        self.iter().map(|(_, activities)| activities.len()).sum()
    }
}

impl ItineraryResult {
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    pub fn activity_count(&self) -> usize {
        self.days
            .iter()
            .map(|day| day.sections.activity_count())
            .sum()
    }
}

impl CompletionSchema for ItineraryResult {
    fn schema() -> &'static SchemaHandle {
        static HANDLE: OnceLock<SchemaHandle> = OnceLock::new();
        HANDLE.get_or_init(|| {
            let root = schemars::schema_for!(ItineraryResult);
            SchemaHandle::from_root_schema::<Self>("ItineraryResult", "ItineraryResult", root)
        })
    }
}
