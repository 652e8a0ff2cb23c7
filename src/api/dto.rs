use chrono::{DateTime, Utc};
use serde::{
    de::{self, Unexpected},
    Deserialize, Serialize,
};
use utoipa::ToSchema;

use crate::db::models::{NewReading, SensorReading};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SensorReadingDto {
    /// Degrees Celsius
    pub temperature: f64,
    /// Relative humidity percentage
    pub humidity: f64,
    /// Light intensity, nominally 0–255
    pub light: f64,
    /// Assigned by the server at insert time (RFC3339).
    pub timestamp: DateTime<Utc>,
}

impl From<SensorReading> for SensorReadingDto {
    fn from(r: SensorReading) -> Self {
        Self {
            temperature: r.temperature,
            humidity: r.humidity,
            light: r.light,
            timestamp: r.timestamp,
        }
    }
}

/// Request body for `POST /api/sensor_data`.
///
/// Devices send the light measurement as `lightIntensity`; it is stored and
/// returned as `light`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct IngestRequest {
    pub temperature: f64,
    pub humidity: f64,
    #[serde(rename = "lightIntensity")]
    pub light_intensity: f64,
}

impl IngestRequest {
    /// Parse and validate a raw request body.
    ///
    /// The body must be a JSON object carrying all three fields as JSON
    /// numbers. No range checks are applied.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_slice(body)?;
        // Derived struct deserialization would also accept a positional array.
        if !value.is_object() {
            return Err(de::Error::invalid_type(
                Unexpected::Other("non-object JSON value"),
                &"a JSON object",
            ));
        }
        Self::deserialize(value)
    }
}

impl From<IngestRequest> for NewReading {
    fn from(r: IngestRequest) -> Self {
        Self {
            temperature: r.temperature,
            humidity: r.humidity,
            light: r.light_intensity,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
