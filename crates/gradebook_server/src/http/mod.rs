//! HTTP router.

mod assessments;
mod stats;

use std::sync::Arc;

use axum::{
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::AppState;

pub use assessments::AssessmentResponse;
pub use stats::{CurrentStatsResponse, ValidationResponse, WhatIfResponse};

/// Generic acknowledgement body.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OkResponse {
    pub ok: bool,
}

/// Create the HTTP router with all routes configured.
///
/// CORS is permissive so a static frontend served elsewhere can call the API.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/assessments",
            get(assessments::list_assessments).post(assessments::create_assessment),
        )
        .route(
            "/assessments/:id",
            get(assessments::get_assessment)
                .put(assessments::update_assessment)
                .delete(assessments::delete_assessment),
        )
        .route("/stats/current", get(stats::current))
        .route("/stats/what-if", get(stats::what_if))
        .route("/stats/validate", get(stats::validate))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<OkResponse> {
    Json(OkResponse { ok: true })
}
