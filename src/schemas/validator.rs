use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    error::SchemaError,
    schemas::CompletionSchema,
    types::{ItineraryResult, Section},
};

const ROOT_PATH: &str = "<root>";

/// Parse and structurally check the raw text returned by the generation service.
///
/// Stops at the first defect. Only the shape is checked here; day numbering and
/// trip length are a separate post-condition, see [`check_day_sequence`].
/// Keys the contract does not name are kept in the `extra` maps, so the result
/// serializes back to the same structure.
pub fn validate_result(raw: &str) -> Result<ItineraryResult, SchemaError> {
    let value: Value = serde_json::from_str(raw).map_err(|err| {
        debug!(target: "trip::schema", error = %err, "generator output is not JSON");
        SchemaError::NotJson(err.to_string())
    })?;

    if let Err(err) = check_shape(&value) {
        debug!(target: "trip::schema", error = %err, payload = %value);
        return Err(err);
    }

    deserialize_structured::<ItineraryResult>(value)
}

fn check_shape(value: &Value) -> Result<(), SchemaError> {
    let root = object_at(value, ROOT_PATH)?;

    let days = required_key(root, ROOT_PATH, "days")?;
    required_key(root, ROOT_PATH, "summary")?;

    let days = days.as_array().ok_or_else(|| SchemaError::InvalidType {
        path: "days".to_string(),
        detail: "expected a list".to_string(),
    })?;

    for (idx, entry) in days.iter().enumerate() {
        let path = format!("days[{idx}]");
        let entry = object_at(entry, &path)?;

        required_key(entry, &path, "day")?;
        let sections_path = format!("{path}.sections");
        let sections = object_at(required_key(entry, &path, "sections")?, &sections_path)?;

        for section in Section::ALL {
            if !required_key(sections, &sections_path, section.key())?.is_array() {
                return Err(SchemaError::InvalidSection {
                    day: idx + 1,
                    section: section.key(),
                });
            }
        }
    }

    Ok(())
}

fn object_at<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, SchemaError> {
    value.as_object().ok_or_else(|| SchemaError::InvalidType {
        path: path.to_string(),
        detail: "expected a JSON object".to_string(),
    })
}

fn required_key<'a>(
    object: &'a Map<String, Value>,
    path: &str,
    key: &'static str,
) -> Result<&'a Value, SchemaError> {
    object.get(key).ok_or_else(|| SchemaError::MissingKey {
        path: path.to_string(),
        key,
    })
}

/// Convert a checked payload into its typed model, reporting the JSON path of
/// any element with the wrong type.
pub fn deserialize_structured<T: CompletionSchema>(payload: Value) -> Result<T, SchemaError> {
    serde_path_to_error::deserialize(payload).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() || path == "." {
            ROOT_PATH.to_string()
        } else {
            path
        };
        debug!(
            target: "trip::schema",
            schema = T::schema().schema_name(),
            path = %location,
            error = %err.inner()
        );
        SchemaError::InvalidType {
            path: location,
            detail: err.inner().to_string(),
        }
    })
}

/// Post-condition: days are numbered 1..=n in order, and n matches the
/// requested trip length when one is known.
pub fn check_day_sequence(
    result: &ItineraryResult,
    expected_days: Option<u32>,
) -> Result<(), SchemaError> {
    if let Some(expected) = expected_days {
        if result.days.len() != expected as usize {
            return Err(SchemaError::DayCountMismatch {
                expected,
                found: result.days.len(),
            });
        }
    }

    for (position, day) in result.days.iter().enumerate() {
        let expected = position as u32 + 1;
        if day.day != expected {
            return Err(SchemaError::DaySequence {
                position: position + 1,
                expected,
                found: day.day,
            });
        }
    }

    Ok(())
}
