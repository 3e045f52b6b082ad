//! HTTP surface: plan an itinerary and download its rendered PDF.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::{
    config::PlannerConfig,
    core::TripPlanner,
    error::PlannerError,
    services::storage::{ArtifactStore, FsArtifactStore},
    types::{ItineraryResult, TripRequest},
};

#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<TripPlanner>,
    pub store: Arc<dyn ArtifactStore>,
}

impl AppState {
    pub fn new(planner: TripPlanner, store: impl ArtifactStore + 'static) -> Self {
        Self {
            planner: Arc::new(planner),
            store: Arc::new(store),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub itinerary: ItineraryResult,
    pub pdf_path: String,
}

#[derive(Debug)]
pub enum ApiError {
    Planner(PlannerError),
    BadBody(String),
    NotFound(String),
}

impl From<PlannerError> for ApiError {
    fn from(err: PlannerError) -> Self {
        ApiError::Planner(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadBody(rejection.body_text())
    }
}

/// HTTP status for a planner failure.
pub fn status_for(err: &PlannerError) -> StatusCode {
    match err {
        PlannerError::ClientInput(_) | PlannerError::InvalidArtifactName(_) => {
            StatusCode::BAD_REQUEST
        }
        PlannerError::OutputSchema(_) | PlannerError::GenerationService(_) => {
            StatusCode::BAD_GATEWAY
        }
        PlannerError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        PlannerError::RateLimit { .. } => StatusCode::SERVICE_UNAVAILABLE,
        PlannerError::Render(_)
        | PlannerError::Storage(_)
        | PlannerError::Config(_)
        | PlannerError::Server(_)
        | PlannerError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_body(code: &str, message: String) -> Value {
    json!({
        "error": {
            "code": code,
            "message": message,
            "retryable": false
        }
    })
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Planner(err) => {
                let status = status_for(&err);
                if status.is_server_error() {
                    error!(target: "trip::server", code = err.error_code(), error = %err, "request failed");
                } else {
                    warn!(target: "trip::server", code = err.error_code(), error = %err, "request rejected");
                }

                let body = Json(err.to_error_payload());
                match err {
                    PlannerError::RateLimit { retry_after } => (
                        status,
                        [(header::RETRY_AFTER, retry_after.to_string())],
                        body,
                    )
                        .into_response(),
                    _ => (status, body).into_response(),
                }
            }
            ApiError::BadBody(message) => (
                StatusCode::BAD_REQUEST,
                Json(error_body("INVALID_BODY", message)),
            )
                .into_response(),
            ApiError::NotFound(name) => (
                StatusCode::NOT_FOUND,
                Json(error_body("NOT_FOUND", format!("no itinerary named `{name}`"))),
            )
                .into_response(),
        }
    }
}

/// POST /generate-itinerary
async fn generate_itinerary(
    State(state): State<AppState>,
    payload: Result<Json<TripRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(request) = payload?;

    let (trip, pdf) = state.planner.plan_and_render(&request).await?;
    let pdf_path = state.store.put(pdf).await?;

    info!(
        target: "trip::server",
        pdf = %pdf_path,
        days = trip.itinerary.day_count(),
        elapsed_ms = trip.duration.as_millis() as u64,
        "itinerary generated"
    );

    Ok(Json(GenerateResponse {
        itinerary: trip.itinerary,
        pdf_path,
    }))
}

/// GET /download-itinerary/:name
async fn download_itinerary(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let bytes = state
        .store
        .get(&name)
        .await?
        .ok_or_else(|| ApiError::NotFound(name.clone()))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", name),
            ),
        ],
        bytes,
    )
        .into_response())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/generate-itinerary", post(generate_itinerary))
        .route("/download-itinerary/:name", get(download_itinerary))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `config.bind_addr` and serve until the process is stopped.
pub async fn serve(config: &PlannerConfig) -> crate::error::Result<()> {
    let planner = TripPlanner::from_config(config)?;
    let store = FsArtifactStore::new(config.output_dir.clone());
    let app = router(AppState::new(planner, store));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .map_err(|err| {
            PlannerError::Server(format!("failed to bind {}: {err}", config.bind_addr))
        })?;

    info!(
        target: "trip::server",
        addr = %config.bind_addr,
        output_dir = %config.output_dir.display(),
        model = %config.model,
        "listening"
    );

    axum::serve(listener, app)
        .await
        .map_err(|err| PlannerError::Server(err.to_string()))
}
