//! Assessment CRUD handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    Json,
};
use chrono::NaiveDate;
use gradebook_core::{Assessment, AssessmentId, AssessmentPatch, NewAssessment};
use serde::{Deserialize, Serialize};

use super::OkResponse;
use crate::{ApiError, AppState};

/// Wire shape of a stored assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResponse {
    pub id: AssessmentId,
    pub title: String,
    pub weight_pct: f64,
    pub due_date: NaiveDate,
    pub score_pct: Option<f64>,
}

impl From<Assessment> for AssessmentResponse {
    fn from(assessment: Assessment) -> Self {
        Self {
            id: assessment.id,
            title: assessment.title,
            weight_pct: assessment.weight_pct,
            due_date: assessment.due_date,
            score_pct: assessment.score_pct,
        }
    }
}

pub async fn create_assessment(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewAssessment>, JsonRejection>,
) -> Result<Json<AssessmentResponse>, ApiError> {
    let Json(input) = payload.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    let created = state
        .with_service(move |service| service.create_assessment(&input))
        .await?;
    Ok(Json(created.into()))
}

pub async fn list_assessments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AssessmentResponse>>, ApiError> {
    let items = state
        .with_service(|service| service.list_assessments())
        .await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

pub async fn get_assessment(
    State(state): State<Arc<AppState>>,
    id: Result<Path<AssessmentId>, PathRejection>,
) -> Result<Json<AssessmentResponse>, ApiError> {
    let id = path_id(id)?;
    let item = state
        .with_service(move |service| service.get_assessment(id))
        .await?;
    Ok(Json(item.into()))
}

pub async fn update_assessment(
    State(state): State<Arc<AppState>>,
    id: Result<Path<AssessmentId>, PathRejection>,
    payload: Result<Json<AssessmentPatch>, JsonRejection>,
) -> Result<Json<AssessmentResponse>, ApiError> {
    let id = path_id(id)?;
    let Json(patch) = payload.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    let updated = state
        .with_service(move |service| service.update_assessment(id, &patch))
        .await?;
    Ok(Json(updated.into()))
}

pub async fn delete_assessment(
    State(state): State<Arc<AppState>>,
    id: Result<Path<AssessmentId>, PathRejection>,
) -> Result<Json<OkResponse>, ApiError> {
    let id = path_id(id)?;
    state
        .with_service(move |service| service.delete_assessment(id))
        .await?;
    Ok(Json(OkResponse { ok: true }))
}

fn path_id(id: Result<Path<AssessmentId>, PathRejection>) -> Result<AssessmentId, ApiError> {
    id.map(|Path(id)| id)
        .map_err(|rejection| ApiError::Validation(rejection.body_text()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_router;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    fn create_test_app() -> (TestServer, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(AppState::new(dir.path().join("grades.db")));
        (TestServer::new(create_router(state)).unwrap(), dir)
    }

    #[tokio::test]
    async fn test_create_then_get_assessment() {
        let (server, _dir) = create_test_app();
        let response = server
            .post("/assessments")
            .json(&json!({
                "title": "Midterm",
                "weight_pct": 30,
                "due_date": "2025-03-10",
                "score_pct": 88.5
            }))
            .await;
        response.assert_status_ok();
        let created: AssessmentResponse = response.json();
        assert_eq!(created.title, "Midterm");

        let fetched: AssessmentResponse = server
            .get(&format!("/assessments/{}", created.id))
            .await
            .json();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_rejects_out_of_range_weight() {
        let (server, _dir) = create_test_app();
        let response = server
            .post("/assessments")
            .json(&json!({
                "title": "Too heavy",
                "weight_pct": 140,
                "due_date": "2025-03-10"
            }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_create_rejects_malformed_date() {
        let (server, _dir) = create_test_app();
        let response = server
            .post("/assessments")
            .json(&json!({
                "title": "Quiz",
                "weight_pct": 10,
                "due_date": "next tuesday"
            }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let (server, _dir) = create_test_app();
        server.get("/assessments/999").await.assert_status_not_found();
        server
            .delete("/assessments/999")
            .await
            .assert_status_not_found();
        server
            .put("/assessments/999")
            .json(&json!({ "title": "x" }))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_rejected() {
        let (server, _dir) = create_test_app();
        server
            .get("/assessments/abc")
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}
