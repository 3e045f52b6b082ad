use thiserror::Error;

/// Why a single request field was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    #[error("unknown trip mode `{0}`, expected `discover` or `known`")]
    UnknownMode(String),

    #[error("is required")]
    Required,

    #[error("is required when {0}")]
    RequiredWhen(&'static str),

    #[error("must be empty when {0}")]
    ForbiddenWhen(&'static str),

    #[error("must be between {min} and {max}, got {actual}")]
    OutOfRange { min: i64, max: i64, actual: i64 },

    #[error("{0}")]
    Invalid(String),
}

/// First rule a trip request violated. Carries the wire name of the field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("`{field}` {rule}")]
pub struct ValidationError {
    pub field: &'static str,
    pub rule: Rule,
}

impl ValidationError {
    pub fn new(field: &'static str, rule: Rule) -> Self {
        Self { field, rule }
    }
}

/// Structural defect in the text returned by the generation service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("output is not valid JSON: {0}")]
    NotJson(String),

    #[error("missing key `{key}` at {path}")]
    MissingKey { path: String, key: &'static str },

    #[error("invalid value at {path}: {detail}")]
    InvalidType { path: String, detail: String },

    #[error("section `{section}` of day entry {day} must be a list")]
    InvalidSection { day: usize, section: &'static str },

    #[error("day entry {position} is numbered {found}, expected {expected}")]
    DaySequence {
        position: usize,
        expected: u32,
        found: u32,
    },

    #[error("itinerary has {found} days but the trip is {expected} days long")]
    DayCountMismatch { expected: u32, found: usize },
}

/// Main error type for the planning round trip
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Invalid trip request: {0}")]
    ClientInput(#[from] ValidationError),

    #[error("Generation service error: {0}")]
    GenerationService(String),

    #[error("Generation timed out: {0}")]
    Timeout(String),

    #[error("Rate limit exceeded: retry after {retry_after}s")]
    RateLimit { retry_after: u64 },

    #[error("Generated itinerary rejected: {0}")]
    OutputSchema(#[from] SchemaError),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid artifact name `{0}`")]
    InvalidArtifactName(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PlannerError>;

impl PlannerError {
    /// Whether resubmitting the same request could succeed.
    ///
    /// Client input errors never are; the caller has to fix the request first.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PlannerError::GenerationService(_)
                | PlannerError::Timeout(_)
                | PlannerError::RateLimit { .. }
                | PlannerError::OutputSchema(_)
        )
    }

    /// True when the caller, not the service, is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PlannerError::ClientInput(_) | PlannerError::InvalidArtifactName(_)
        )
    }

    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            PlannerError::ClientInput(_) => "CLIENT_INPUT_ERROR",
            PlannerError::GenerationService(_) => "GENERATION_SERVICE_ERROR",
            PlannerError::Timeout(_) => "TIMEOUT_ERROR",
            PlannerError::RateLimit { .. } => "RATE_LIMIT_ERROR",
            PlannerError::OutputSchema(_) => "OUTPUT_SCHEMA_ERROR",
            PlannerError::Render(_) => "RENDER_ERROR",
            PlannerError::Storage(_) => "STORAGE_ERROR",
            PlannerError::InvalidArtifactName(_) => "INVALID_ARTIFACT_NAME",
            PlannerError::Config(_) => "CONFIG_ERROR",
            PlannerError::Server(_) => "SERVER_ERROR",
            PlannerError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        let mut error = serde_json::json!({
            "code": self.error_code(),
            "message": self.to_string(),
            "retryable": self.is_retryable()
        });

        if let PlannerError::ClientInput(validation) = self {
            error["field"] = serde_json::Value::String(validation.field.to_string());
        }

        serde_json::json!({ "error": error })
    }
}
