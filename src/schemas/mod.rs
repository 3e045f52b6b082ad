pub mod contract;
pub mod schema;
pub mod validator;

pub use contract::{itinerary_schema_prompt, SYSTEM_INSTRUCTION};
pub use schema::{CompletionSchema, SchemaHandle};
pub use validator::{check_day_sequence, deserialize_structured, validate_result};
