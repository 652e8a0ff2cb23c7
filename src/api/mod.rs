pub mod dto;
pub mod errors;
pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use crate::sensors::ReadingStore;
use handlers::ApiDoc;

/// Router state: the one store every request goes through.
pub type SharedStore = Arc<dyn ReadingStore>;

pub fn router(store: SharedStore) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .route(
            "/api/sensor_data",
            get(handlers::list_readings).post(handlers::create_reading),
        )
        .with_state(store)
        .split_for_parts();

    router
        .route("/health", get(handlers::health))
        .route(
            "/api-docs/openapi.json",
            get(move || async move { axum::Json(api) }),
        )
}
