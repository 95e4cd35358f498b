//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Performance Test Server",
        version = "0.1.0",
        description = "API server for registering performance tests, running them in the background, and executing synchronous load simulations"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        // Performance test endpoints
        api::performance::create_test,
        api::performance::start_test,
        api::performance::get_test,
        api::performance::list_tests,
        api::performance::delete_test,
        api::performance::simulate_load,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            // Health
            api::health::HealthResponse,
            // Performance tests
            models::TestStatus,
            models::PerformanceMetrics,
            models::CreateTestRequest,
            models::SimulateLoadParams,
            models::TestResponse,
            models::TestListResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Performance Tests", description = "Test registration, lifecycle and load simulation")
    )
)]
pub struct ApiDoc;
