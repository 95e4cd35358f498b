//! Performance test server library.
//!
//! This library provides the core functionality for the performance test
//! server: the in-memory test registry, the lifecycle controller that runs
//! tests in the background, the synchronous load simulator, and the API
//! handlers exposing them over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
