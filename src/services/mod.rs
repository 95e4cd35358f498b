//! Business logic services.

pub mod lifecycle;
pub mod metrics;
pub mod registry;
pub mod simulation;

pub use lifecycle::LifecycleController;
pub use registry::TestRegistry;
