//! Integration tests for the performance test API.
//!
//! Drives the actix app end to end: registration, lifecycle, deletion and
//! load simulation, including the error paths the boundary must map.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, test, web};
use serde_json::json;

use perftest_server::api;
use perftest_server::models::{TestListResponse, TestResponse, TestStatus};
use perftest_server::services::{LifecycleController, TestRegistry};

/// Shared state mirroring what `main` wires up, one isolated instance per test.
fn app_state() -> (web::Data<TestRegistry>, web::Data<LifecycleController>) {
    let registry = Arc::new(TestRegistry::new());
    let controller = web::Data::new(LifecycleController::new(Arc::clone(&registry), 10));
    (web::Data::from(registry), controller)
}

macro_rules! init_app {
    () => {{
        let (registry, controller) = app_state();
        test::init_service(
            App::new()
                .app_data(registry)
                .app_data(controller)
                .service(
                    web::scope("/api/v1/performance")
                        .configure(api::configure_health_routes)
                        .configure(api::configure_performance_routes),
                ),
        )
        .await
    }};
}

fn create_body(name: &str, duration_seconds: u32) -> serde_json::Value {
    json!({
        "name": name,
        "duration_seconds": duration_seconds,
        "load_level": 5,
        "description": "integration test"
    })
}

#[actix_web::test]
async fn test_health_endpoint() {
    let app = init_app!();

    let req = test::TestRequest::get()
        .uri("/api/v1/performance/health")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
}

#[actix_web::test]
async fn test_create_returns_pending_test() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/performance/tests")
        .set_json(create_body("checkout", 30))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let body: TestResponse = test::read_body_json(resp).await;
    assert_eq!(body.test_name, "checkout");
    assert_eq!(body.status, TestStatus::Pending);
    assert!(body.metrics.is_none());
    assert!(body.end_time.is_none());
}

#[actix_web::test]
async fn test_identical_creates_get_distinct_ids() {
    let app = init_app!();

    let mut ids = Vec::new();
    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/v1/performance/tests")
            .set_json(create_body("same name", 10))
            .to_request();
        let body: TestResponse = test::call_and_read_body_json(&app, req).await;
        ids.push(body.test_id);
    }
    assert_ne!(ids[0], ids[1]);
}

#[actix_web::test]
async fn test_create_rejects_invalid_config() {
    let app = init_app!();

    for body in [
        json!({ "name": "", "duration_seconds": 10, "load_level": 5 }),
        json!({ "name": "x", "duration_seconds": 0, "load_level": 5 }),
        json!({ "name": "x", "duration_seconds": 10, "load_level": 0 }),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/v1/performance/tests")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }
}

#[actix_web::test]
async fn test_start_unknown_id_returns_404() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri(&format!(
            "/api/v1/performance/tests/{}/start",
            uuid::Uuid::now_v7()
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_lifecycle_runs_to_completion() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/performance/tests")
        .set_json(create_body("lifecycle", 1))
        .to_request();
    let created: TestResponse = test::call_and_read_body_json(&app, req).await;

    // Start: transition to RUNNING is immediate.
    let req = test::TestRequest::post()
        .uri(&format!(
            "/api/v1/performance/tests/{}/start",
            created.test_id
        ))
        .to_request();
    let started: TestResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(started.status, TestStatus::Running);
    assert!(started.start_time >= created.start_time);

    // Starting again while RUNNING is rejected.
    let req = test::TestRequest::post()
        .uri(&format!(
            "/api/v1/performance/tests/{}/start",
            created.test_id
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    // Poll until the background execution reaches a terminal state.
    let mut finished = None;
    for _ in 0..50 {
        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/performance/tests/{}", created.test_id))
            .to_request();
        let current: TestResponse = test::call_and_read_body_json(&app, req).await;
        if current.status == TestStatus::Completed || current.status == TestStatus::Failed {
            finished = Some(current);
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    let finished = finished.expect("test did not finish in time");
    assert_eq!(finished.status, TestStatus::Completed);
    assert!(finished.end_time.is_some());

    let metrics = finished.metrics.expect("completed test must carry metrics");
    assert_eq!(
        metrics.total_requests,
        metrics.successful_requests + metrics.failed_requests
    );
    // load_level 5 * duration 1
    assert_eq!(metrics.total_requests, 5);
}

#[actix_web::test]
async fn test_list_returns_all_tests() {
    let app = init_app!();

    for i in 0..3 {
        let req = test::TestRequest::post()
            .uri("/api/v1/performance/tests")
            .set_json(create_body(&format!("test-{}", i), 10))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get()
        .uri("/api/v1/performance/tests")
        .to_request();
    let body: TestListResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.total, 3);
    assert_eq!(body.tests.len(), 3);
}

#[actix_web::test]
async fn test_delete_removes_test() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/performance/tests")
        .set_json(create_body("ephemeral", 10))
        .to_request();
    let created: TestResponse = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/performance/tests/{}", created.test_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/performance/tests/{}", created.test_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_delete_while_running_does_not_resurrect() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/performance/tests")
        .set_json(create_body("deleted mid-run", 1))
        .to_request();
    let created: TestResponse = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri(&format!(
            "/api/v1/performance/tests/{}/start",
            created.test_id
        ))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/performance/tests/{}", created.test_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);

    // Give the background task time to finish and attempt its write.
    tokio::time::sleep(Duration::from_millis(1500)).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/performance/tests/{}", created.test_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_delete_unknown_id_returns_404() {
    let app = init_app!();

    let req = test::TestRequest::delete()
        .uri(&format!(
            "/api/v1/performance/tests/{}",
            uuid::Uuid::now_v7()
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_simulate_load_returns_metrics() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/performance/load-test?requests=10&delay_ms=0")
        .to_request();
    let result: TestResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(result.status, TestStatus::Completed);
    assert!(result.test_id.starts_with("load-simulation-"));

    let metrics = result.metrics.expect("simulation must produce metrics");
    assert_eq!(metrics.total_requests, 10);
    assert_eq!(metrics.successful_requests + metrics.failed_requests, 10);
    assert!(metrics.average_response_time_ms > 0.0);
    assert!(metrics.throughput_per_sec > 0.0);
}

#[actix_web::test]
async fn test_simulate_load_rejects_out_of_bounds_params() {
    let app = init_app!();

    for uri in [
        "/api/v1/performance/load-test?requests=0&delay_ms=0",
        "/api/v1/performance/load-test?requests=10001&delay_ms=0",
        "/api/v1/performance/load-test?requests=10&delay_ms=5001",
    ] {
        let req = test::TestRequest::post().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400, "expected 400 for {}", uri);
    }
}
