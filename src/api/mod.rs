//! API endpoint modules.

pub mod health;
pub mod openapi;
pub mod performance;

pub use health::configure_health_routes;
pub use openapi::ApiDoc;
pub use performance::configure_routes as configure_performance_routes;
