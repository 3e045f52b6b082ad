pub mod itinerary;
pub mod request;

pub use itinerary::{Day, DaySections, ItineraryResult, Section};
pub use request::{
    PartySignal, PartySize, RatingBand, ScheduleStyle, TripMode, TripRequest, DEFAULT_PARTY_SIZE,
    OTHER_OPTION,
};
