use std::{env, net::SocketAddr, path::PathBuf, time::Duration};

use crate::{
    error::{PlannerError, Result},
    services::openai_client::DEFAULT_BASE_URL,
};

pub const DEFAULT_MODEL: &str = "openai/gpt-4.1-mini";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_MAX_TOKENS: u32 = 4000;
pub const DEFAULT_OUTPUT_DIR: &str = "generated_pdfs";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

/// Settings for the planning round trip and the HTTP server.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub max_tokens: Option<u32>,
    /// Send the itinerary JSON schema as `response_format`.
    pub structured_output: bool,
    /// Require day numbers 1..=n and n equal to the requested trip length.
    pub enforce_day_count: bool,
    pub output_dir: PathBuf,
    pub bind_addr: SocketAddr,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_tokens: Some(DEFAULT_MAX_TOKENS),
            structured_output: false,
            enforce_day_count: true,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
        }
    }
}

impl PlannerConfig {
    /// Read settings from the process environment.
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        config.api_key = get("OPENAI_API_KEY");
        if let Some(base_url) = get("OPENAI_BASE_URL").or_else(|| get("OPENROUTER_BASE_URL")) {
            config.base_url = base_url;
        }
        if let Some(model) = get("TRIP_MODEL") {
            config.model = model;
        }
        if let Some(secs) = get("TRIP_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(parse_number("TRIP_TIMEOUT_SECS", &secs)?);
        }
        if let Some(tokens) = get("TRIP_MAX_TOKENS") {
            let tokens: u32 = parse_number("TRIP_MAX_TOKENS", &tokens)?;
            config.max_tokens = (tokens > 0).then_some(tokens);
        }
        if let Some(flag) = get("TRIP_STRUCTURED_OUTPUT") {
            config.structured_output = parse_flag("TRIP_STRUCTURED_OUTPUT", &flag)?;
        }
        if let Some(flag) = get("TRIP_ENFORCE_DAY_COUNT") {
            config.enforce_day_count = parse_flag("TRIP_ENFORCE_DAY_COUNT", &flag)?;
        }
        if let Some(dir) = get("TRIP_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(addr) = get("TRIP_BIND_ADDR") {
            config.bind_addr = parse_bind_addr(&addr)?;
        }

        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }
}

pub fn parse_bind_addr(value: &str) -> Result<SocketAddr> {
    value
        .parse()
        .map_err(|err| PlannerError::Config(format!("invalid bind address `{value}`: {err}")))
}

fn parse_number<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|err| PlannerError::Config(format!("{key} must be a number, got `{value}`: {err}")))
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(PlannerError::Config(format!(
            "{key} must be true or false, got `{value}`"
        ))),
    }
}
