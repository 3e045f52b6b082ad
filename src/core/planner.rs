use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::{
    config::PlannerConfig,
    core::validator::{validate, NormalizedRequest},
    error::{PlannerError, Result},
    schemas::{check_day_sequence, validate_result},
    services::{
        directive::{compile, DirectiveDocument},
        generation::{ChatGenerator, Generator},
        rendering::{PdfRenderer, Renderer},
    },
    types::{ItineraryResult, TripRequest},
};

/// Outcome of one successful planning round trip.
#[derive(Debug, Clone)]
pub struct PlannedTrip {
    pub itinerary: ItineraryResult,
    pub directive: DirectiveDocument,
    pub duration: Duration,
}

/// Sequences validation, directive compilation, generation, and result
/// checking for a single trip request.
#[derive(Debug, Clone)]
pub struct TripPlanner {
    generator: Arc<dyn Generator>,
    renderer: Arc<dyn Renderer>,
    timeout: Duration,
    enforce_day_count: bool,
}

impl TripPlanner {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self {
            generator,
            renderer: Arc::new(PdfRenderer::new()),
            timeout: Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECS),
            enforce_day_count: true,
        }
    }

    /// Planner backed by a [`ChatGenerator`] built from `config`.
    pub fn from_config(config: &PlannerConfig) -> Result<Self> {
        let generator = ChatGenerator::from_config(config)?;
        Ok(Self::new(Arc::new(generator))
            .with_timeout(config.timeout)
            .with_day_count_check(config.enforce_day_count))
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Toggle the day numbering and trip length post-condition.
    pub fn with_day_count_check(mut self, enabled: bool) -> Self {
        self.enforce_day_count = enabled;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Validate the request and compile its directive without calling out.
    pub fn prepare(&self, request: &TripRequest) -> Result<(NormalizedRequest, DirectiveDocument)> {
        let normalized = validate(request)?;
        let directive = compile(&normalized);
        Ok((normalized, directive))
    }

    /// Classify generator output against the itinerary schema and, when
    /// enabled, the requested trip length.
    pub fn check_result(&self, raw: &str, expected_days: Option<u32>) -> Result<ItineraryResult> {
        let itinerary = validate_result(raw)?;
        if self.enforce_day_count {
            check_day_sequence(&itinerary, expected_days)?;
        }
        Ok(itinerary)
    }

    pub async fn plan(&self, request: &TripRequest) -> Result<PlannedTrip> {
        let started = Instant::now();

        let (normalized, directive) = self.prepare(request)?;
        info!(
            target: "trip::planner",
            mode = normalized.mode().as_str(),
            directive_bytes = directive.len(),
            "request validated"
        );

        let prompt = directive.clone().into_prompt();
        let raw = timeout(self.timeout, self.generator.generate(&prompt))
            .await
            .map_err(|_| {
                PlannerError::Timeout(format!(
                    "no itinerary within {}s",
                    self.timeout.as_secs()
                ))
            })??;
        debug!(target: "trip::planner", bytes = raw.len(), "generation finished");

        let itinerary = self
            .check_result(&raw, normalized.trip_length())
            .map_err(|err| {
                warn!(target: "trip::planner", error = %err, "generated itinerary rejected");
                err
            })?;

        let duration = started.elapsed();
        info!(
            target: "trip::planner",
            days = itinerary.day_count(),
            activities = itinerary.activity_count(),
            elapsed_ms = duration.as_millis() as u64,
            "itinerary planned"
        );

        Ok(PlannedTrip {
            itinerary,
            directive,
            duration,
        })
    }

    pub fn render(&self, itinerary: &ItineraryResult) -> Result<Vec<u8>> {
        self.renderer.render(itinerary)
    }

    /// Plan and render in one step. The document is only produced for an
    /// itinerary that passed every check.
    pub async fn plan_and_render(&self, request: &TripRequest) -> Result<(PlannedTrip, Vec<u8>)> {
        let trip = self.plan(request).await?;
        let document = self.render(&trip.itinerary)?;
        Ok((trip, document))
    }
}
