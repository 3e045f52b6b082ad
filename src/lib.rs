//! trip-itinerary: validate traveler trip requests, compile them into a
//! planning directive for a language model, and check the itinerary it returns.
//!
//! The three pure stages are [`validate`], [`compile`], and [`validate_result`].
//! [`TripPlanner`] runs them around a [`Generator`] and can render the
//! accepted itinerary to PDF.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use trip_itinerary::{PlannerConfig, TripPlanner, TripRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PlannerConfig::from_env()?;
//!     let planner = TripPlanner::from_config(&config)?;
//!
//!     let request: TripRequest = serde_json::from_str(
//!         r#"{"trip_mode": "known", "destination": "Lisbon", "people_b": "2",
//!             "knows_trip_length_b": true, "days_b": 3}"#,
//!     )?;
//!
//!     let trip = planner.plan(&request).await?;
//!     println!("{}", trip.itinerary.summary);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod schemas;
pub mod server;
pub mod services;
pub mod types;

pub use config::PlannerConfig;
pub use core::{validate, NormalizedRequest, PlannedTrip, TripPlanner};
pub use error::{PlannerError, Result, Rule, SchemaError, ValidationError};
pub use schemas::{
    check_day_sequence, itinerary_schema_prompt, validate_result, CompletionSchema, SchemaHandle,
};
pub use services::{
    compile, ArtifactStore, ChatGenerator, DirectiveDocument, FsArtifactStore, Generator,
    PdfRenderer, Renderer,
};
pub use types::{Day, DaySections, ItineraryResult, PartySize, Section, TripMode, TripRequest};

#[cfg(feature = "cli")]
pub mod cli;
