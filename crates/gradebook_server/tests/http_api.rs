use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use gradebook_server::http::{
    AssessmentResponse, CurrentStatsResponse, OkResponse, ValidationResponse, WhatIfResponse,
};
use gradebook_server::{create_router, AppState, ErrorResponse};
use serde_json::json;

struct TestApp {
    server: TestServer,
    _dir: tempfile::TempDir,
}

impl TestApp {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(AppState::new(dir.path().join("grades.db")));
        Self {
            server: TestServer::new(create_router(state)).unwrap(),
            _dir: dir,
        }
    }

    async fn create(&self, body: serde_json::Value) -> AssessmentResponse {
        let response = self.server.post("/assessments").json(&body).await;
        response.assert_status_ok();
        response.json()
    }
}

#[tokio::test]
async fn stats_on_empty_gradebook_are_defined() {
    let app = TestApp::new();

    let current: CurrentStatsResponse = app.server.get("/stats/current").await.json();
    assert_eq!(current.current_weighted, 0.0);
    assert!(!current.has_graded_weight);
    assert_eq!(current.remaining_weight, 100.0);

    let validation: ValidationResponse = app.server.get("/stats/validate").await.json();
    assert!(!validation.balanced);
    assert_eq!(validation.delta, -100.0);
}

#[tokio::test]
async fn grade_flow_matches_worked_example() {
    let app = TestApp::new();
    app.create(json!({
        "title": "Midterm",
        "weight_pct": 40,
        "due_date": "2025-03-01",
        "score_pct": 80
    }))
    .await;
    let final_exam = app
        .create(json!({
            "title": "Final",
            "weight_pct": 60,
            "due_date": "2025-05-01"
        }))
        .await;

    let current: CurrentStatsResponse = app.server.get("/stats/current").await.json();
    assert_eq!(current.current_weighted, 80.0);
    assert_eq!(current.completed_weight, 40.0);
    assert_eq!(current.remaining_weight, 60.0);
    assert_eq!(current.graded_count, 1);
    assert_eq!(current.ungraded_count, 1);

    let what_if: WhatIfResponse = app
        .server
        .get("/stats/what-if")
        .add_query_param("target", 70)
        .await
        .json();
    assert_eq!(what_if.required_avg, Some(63.33));
    assert!(what_if.attainable);
    assert_eq!(what_if.target, 70.0);

    let validation: ValidationResponse = app.server.get("/stats/validate").await.json();
    assert!(validation.balanced);

    let graded: AssessmentResponse = app
        .server
        .put(&format!("/assessments/{}", final_exam.id))
        .json(&json!({ "score_pct": 65 }))
        .await
        .json();
    assert_eq!(graded.score_pct, Some(65.0));
    assert_eq!(graded.title, "Final");

    let what_if: WhatIfResponse = app
        .server
        .get("/stats/what-if")
        .add_query_param("target", 80)
        .await
        .json();
    assert_eq!(what_if.required_avg, None);
    assert!(!what_if.attainable);
}

#[tokio::test]
async fn list_is_ordered_by_due_date_and_delete_is_permanent() {
    let app = TestApp::new();
    let late = app
        .create(json!({ "title": "Essay", "weight_pct": 30, "due_date": "2025-06-01" }))
        .await;
    let early = app
        .create(json!({ "title": "Quiz", "weight_pct": 10, "due_date": "2025-01-15" }))
        .await;

    let listed: Vec<AssessmentResponse> = app.server.get("/assessments").await.json();
    let ids: Vec<_> = listed.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![early.id, late.id]);

    let deleted: OkResponse = app
        .server
        .delete(&format!("/assessments/{}", early.id))
        .await
        .json();
    assert!(deleted.ok);

    app.server
        .get(&format!("/assessments/{}", early.id))
        .await
        .assert_status_not_found();
    let listed: Vec<AssessmentResponse> = app.server.get("/assessments").await.json();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn weights_over_100_are_accepted_and_reported() {
    let app = TestApp::new();
    app.create(json!({ "title": "A", "weight_pct": 60, "due_date": "2025-02-01" }))
        .await;
    app.create(json!({ "title": "B", "weight_pct": 45, "due_date": "2025-02-02" }))
        .await;

    let validation: ValidationResponse = app.server.get("/stats/validate").await.json();
    assert!(!validation.balanced);
    assert_eq!(validation.delta, 5.0);
    assert!(validation.message.contains("over-allocated"));
}

#[tokio::test]
async fn invalid_inputs_return_validation_errors() {
    let app = TestApp::new();

    let response = app.server.get("/stats/what-if").await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: ErrorResponse = response.json();
    assert_eq!(body.code, "VALIDATION_FAILED");

    let created = app
        .create(json!({ "title": "Lab", "weight_pct": 10, "due_date": "2025-02-01" }))
        .await;
    let response = app
        .server
        .put(&format!("/assessments/{}", created.id))
        .json(&json!({ "score_pct": -5 }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .server
        .post("/assessments")
        .json(&json!({ "title": "", "weight_pct": 10, "due_date": "2025-02-01" }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}
