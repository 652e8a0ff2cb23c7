use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the `sensor` table as returned by queries.
///
/// `timestamp` is assigned by the database on insert; readings are never
/// updated afterwards.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct SensorReading {
    /// Degrees Celsius
    pub temperature: f64,
    /// Relative humidity percentage
    pub humidity: f64,
    /// Light intensity, nominally 0–255
    pub light: f64,
    pub timestamp: DateTime<Utc>,
}

/// A validated reading that has not been stored yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewReading {
    pub temperature: f64,
    pub humidity: f64,
    pub light: f64,
}
