use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use super::dto::ErrorResponse;
use crate::sensors::StoreError;

/// Every way a sensor-data request can fail.
///
/// Callers only ever see the fixed message for the variant; the underlying
/// cause goes to the log.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid data format")]
    InvalidPayload(#[source] serde_json::Error),
    #[error("failed to insert sensor data")]
    Insert(#[source] StoreError),
    #[error("failed to fetch sensor data")]
    Fetch(#[source] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            Self::Insert(_) | Self::Fetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            Self::InvalidPayload(_) => "Invalid data format",
            Self::Insert(_) => "Failed to insert sensor data",
            Self::Fetch(_) => "Failed to fetch sensor data",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::InvalidPayload(e) => {
                warn!(error = %e, "Rejected sensor payload");
            }
            Self::Insert(e) => {
                error!(operation = "insert", error = %e, "Datastore operation failed");
            }
            Self::Fetch(e) => {
                error!(operation = "fetch", error = %e, "Datastore operation failed");
            }
        }

        let body = Json(ErrorResponse { error: self.public_message().to_owned() });
        (self.status(), body).into_response()
    }
}
