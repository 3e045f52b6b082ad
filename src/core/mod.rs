pub mod planner;
pub mod validator;

pub use planner::{PlannedTrip, TripPlanner};
pub use validator::{validate, NormalizedRequest};
