//! Performance test API handlers.

use actix_web::{HttpResponse, web};
use tracing::info;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{
    CreateTestRequest, SimulateLoadParams, TestListResponse, TestResponse,
};
use crate::services::{LifecycleController, TestRegistry, simulation};

/// Register a new performance test.
///
/// The test is created in PENDING state and must be started explicitly.
#[utoipa::path(
    post,
    path = "/api/v1/performance/tests",
    tag = "Performance Tests",
    request_body = CreateTestRequest,
    responses(
        (status = 201, description = "Test created", body = TestResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_test(
    registry: web::Data<TestRegistry>,
    body: web::Json<CreateTestRequest>,
) -> AppResult<HttpResponse> {
    let request = body.into_inner();
    request.validate()?;

    info!("Creating performance test: {}", request.name);
    let test = registry.create(request);

    Ok(HttpResponse::Created().json(TestResponse::from(&test)))
}

/// Start a pending performance test.
///
/// Returns as soon as the test is RUNNING; execution continues in the
/// background and the terminal state is observable via a later get.
#[utoipa::path(
    post,
    path = "/api/v1/performance/tests/{test_id}/start",
    tag = "Performance Tests",
    params(
        ("test_id" = Uuid, Path, description = "Test UUID")
    ),
    responses(
        (status = 200, description = "Test started", body = TestResponse),
        (status = 400, description = "Test is not in PENDING state", body = crate::error::ErrorResponse),
        (status = 404, description = "Test not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn start_test(
    controller: web::Data<LifecycleController>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let test_id = path.into_inner();
    let test = controller.start(test_id)?;
    Ok(HttpResponse::Ok().json(TestResponse::from(&test)))
}

/// Get the current state of a performance test.
#[utoipa::path(
    get,
    path = "/api/v1/performance/tests/{test_id}",
    tag = "Performance Tests",
    params(
        ("test_id" = Uuid, Path, description = "Test UUID")
    ),
    responses(
        (status = 200, description = "Current test state", body = TestResponse),
        (status = 404, description = "Test not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_test(
    registry: web::Data<TestRegistry>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let test = registry.get(path.into_inner())?;
    Ok(HttpResponse::Ok().json(TestResponse::from(&test)))
}

/// List all registered performance tests.
#[utoipa::path(
    get,
    path = "/api/v1/performance/tests",
    tag = "Performance Tests",
    responses(
        (status = 200, description = "Registered tests", body = TestListResponse),
    )
)]
pub async fn list_tests(registry: web::Data<TestRegistry>) -> AppResult<HttpResponse> {
    let tests: Vec<TestResponse> = registry.list().iter().map(TestResponse::from).collect();
    let total = tests.len();
    Ok(HttpResponse::Ok().json(TestListResponse { tests, total }))
}

/// Delete a performance test.
///
/// Safe to call while the test is RUNNING; the background task's eventual
/// result is discarded.
#[utoipa::path(
    delete,
    path = "/api/v1/performance/tests/{test_id}",
    tag = "Performance Tests",
    params(
        ("test_id" = Uuid, Path, description = "Test UUID")
    ),
    responses(
        (status = 204, description = "Test deleted"),
        (status = 404, description = "Test not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn delete_test(
    registry: web::Data<TestRegistry>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let test_id = path.into_inner();
    info!("Deleting performance test: {}", test_id);
    registry.delete(test_id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Run an immediate, synchronous load simulation.
///
/// Does not create a test record; the call blocks until all simulated
/// requests have run (roughly `requests * (delay_ms + 25ms)`).
#[utoipa::path(
    post,
    path = "/api/v1/performance/load-test",
    tag = "Performance Tests",
    params(
        ("requests" = u32, Query, description = "Number of simulated requests (1-10000)"),
        ("delay_ms" = u64, Query, description = "Base delay per request in milliseconds (0-5000)")
    ),
    responses(
        (status = 200, description = "Simulation result", body = TestResponse),
        (status = 400, description = "Parameters out of bounds", body = crate::error::ErrorResponse),
    )
)]
pub async fn simulate_load(query: web::Query<SimulateLoadParams>) -> AppResult<HttpResponse> {
    let params = query.into_inner();
    params.validate()?;

    let result = simulation::simulate_load(&params).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// Configure performance test routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/tests")
            .route(web::post().to(create_test))
            .route(web::get().to(list_tests)),
    )
    .service(web::resource("/tests/{test_id}/start").route(web::post().to(start_test)))
    .service(
        web::resource("/tests/{test_id}")
            .route(web::get().to(get_test))
            .route(web::delete().to(delete_test)),
    )
    .service(web::resource("/load-test").route(web::post().to(simulate_load)));
}
