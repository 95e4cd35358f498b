//! Domain models and DTOs.


pub use performance_test::{
    CreateTestRequest, PerformanceMetrics, PerformanceTest, SimulateLoadParams, TestListResponse,
    TestResponse, TestStatus,
};
