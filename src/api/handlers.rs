use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use tracing::debug;
use utoipa::OpenApi;

use super::{
    dto::{ErrorResponse, IngestRequest, MessageResponse, SensorReadingDto},
    errors::ApiError,
    SharedStore,
};
use crate::db::models::NewReading;

/// Most readings a single query returns.
pub const QUERY_LIMIT: u32 = 100;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Fetch the most recent readings, newest first.
#[utoipa::path(
    get,
    path = "/api/sensor_data",
    responses(
        (status = 200, description = "Up to 100 most recent readings, newest first", body = Vec<SensorReadingDto>),
        (status = 500, description = "Datastore unavailable", body = ErrorResponse),
    ),
    tag = "sensors"
)]
pub async fn list_readings(
    State(store): State<SharedStore>,
) -> Result<Json<Vec<SensorReadingDto>>, ApiError> {
    let rows = store.latest(QUERY_LIMIT).await.map_err(ApiError::Fetch)?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// Store a single reading. The timestamp is assigned server-side.
///
/// The body is parsed by hand rather than through `Json<T>` so that every
/// malformed payload gets the same 400 response, whatever the content type.
#[utoipa::path(
    post,
    path = "/api/sensor_data",
    request_body = IngestRequest,
    responses(
        (status = 201, description = "Reading stored", body = MessageResponse),
        (status = 400, description = "Missing or non-numeric field", body = ErrorResponse),
        (status = 500, description = "Datastore unavailable", body = ErrorResponse),
    ),
    tag = "sensors"
)]
pub async fn create_reading(
    State(store): State<SharedStore>,
    body: Bytes,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let request = IngestRequest::from_slice(&body).map_err(ApiError::InvalidPayload)?;
    let reading: NewReading = request.into();

    store.insert(reading).await.map_err(ApiError::Insert)?;
    debug!(?reading, "Sensor reading stored");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse { message: "Data inserted successfully".to_owned() }),
    ))
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Returns `200 OK` with `{"status":"ok"}` when the server is running.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
    ),
    tag = "system"
)]
pub async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// OpenAPI spec
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(list_readings, create_reading, health),
    components(schemas(SensorReadingDto, IngestRequest, MessageResponse, ErrorResponse)),
    tags(
        (name = "sensors", description = "Sensor telemetry ingestion and retrieval"),
        (name = "system",  description = "System endpoints"),
    ),
    info(
        title = "Sensor Telemetry API",
        version = "0.1.0",
        description = "Ingests and serves temperature, humidity and light readings"
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
