//! Test lifecycle controller.
//!
//! Enforces the `Pending -> Running -> {Completed, Failed}` state machine and
//! runs started tests in the background on a bounded worker pool. Callers of
//! [`LifecycleController::start`] get the RUNNING snapshot back immediately;
//! the terminal transition happens later through the registry.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Semaphore;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{PerformanceMetrics, PerformanceTest, TestStatus};
use crate::services::TestRegistry;

/// Orchestrates background execution of started tests.
pub struct LifecycleController {
    registry: Arc<TestRegistry>,
    permits: Arc<Semaphore>,
}

impl LifecycleController {
    /// Create a controller executing at most `max_concurrent` tests at once.
    ///
    /// Tests started beyond the cap queue on the semaphore until a permit
    /// frees up; they stay RUNNING while they wait.
    pub fn new(registry: Arc<TestRegistry>, max_concurrent: usize) -> Self {
        Self {
            registry,
            permits: Arc::new(Semaphore::new(max_concurrent)),
        }
    }

    /// Start a pending test.
    ///
    /// Atomically transitions the record to RUNNING with a refreshed
    /// `start_time`, schedules the background execution, and returns the
    /// RUNNING snapshot without waiting for completion.
    ///
    /// Fails with `NotFound` for an unknown ID and `InvalidInput` when the
    /// test is not in PENDING state (starting a test twice is rejected rather
    /// than silently re-running it).
    pub fn start(&self, id: Uuid) -> AppResult<PerformanceTest> {
        let started = self.registry.update(id, |test| {
            if test.status != TestStatus::Pending {
                return Err(AppError::InvalidInput(format!(
                    "Test {} is {}; only PENDING tests can be started",
                    id, test.status
                )));
            }
            test.status = TestStatus::Running;
            test.start_time = Utc::now();
            Ok(())
        })?;

        info!("Starting performance test: {} ({})", started.name, id);

        let registry = Arc::clone(&self.registry);
        let permits = Arc::clone(&self.permits);
        tokio::spawn(execute_test(registry, permits, started.clone()));

        Ok(started)
    }

    /// Stop accepting background work. Tests still waiting for a permit are
    /// marked FAILED; tests already executing run to completion. Called once
    /// the HTTP server has stopped accepting requests.
    pub fn shutdown(&self) {
        self.permits.close();
    }
}

/// Run a started test to its terminal state.
///
/// Sleeps for the configured duration as a stand-in for real load, then
/// writes COMPLETED with synthesized metrics. Any failure to execute writes
/// FAILED with an empty metrics snapshot instead; the error never propagates
/// to the caller of `start`.
async fn execute_test(registry: Arc<TestRegistry>, permits: Arc<Semaphore>, test: PerformanceTest) {
    let id = test.id;

    let outcome = match permits.acquire_owned().await {
        Ok(_permit) => {
            info!("Executing test: {} ({})", test.name, id);
            tokio::time::sleep(Duration::from_secs(u64::from(test.duration_seconds))).await;
            let mut rng = StdRng::from_os_rng();
            Ok(synthesize_metrics(
                test.load_level,
                test.duration_seconds,
                &mut rng,
            ))
        }
        Err(_) => {
            error!("Worker pool closed before test {} could execute", id);
            Err(())
        }
    };

    let written = registry.update(id, |record| {
        record.end_time = Some(Utc::now());
        match &outcome {
            Ok(metrics) => {
                record.status = TestStatus::Completed;
                record.metrics = Some(metrics.clone());
            }
            Err(()) => {
                record.status = TestStatus::Failed;
                record.metrics = Some(PerformanceMetrics::default());
            }
        }
        Ok(())
    });

    match written {
        Ok(record) => info!("Test {} finished with status {}", id, record.status),
        // The test was deleted while running; drop the result.
        Err(AppError::NotFound(_)) => {
            debug!("Test {} deleted during execution, discarding result", id)
        }
        Err(e) => error!("Failed to record result for test {}: {}", id, e),
    }
}

/// Synthesize plausible metrics from the configured load level and duration.
///
/// No real load is generated, so the figures are formula-constrained
/// randomness: `load_level * duration_seconds` total requests at a 95%
/// success rate, with response times drawn around a 100-300ms average.
pub fn synthesize_metrics<R: Rng>(
    load_level: u32,
    duration_seconds: u32,
    rng: &mut R,
) -> PerformanceMetrics {
    let total_requests = u64::from(load_level) * u64::from(duration_seconds);
    let successful_requests = (total_requests as f64 * 0.95).floor() as u64;
    let failed_requests = total_requests - successful_requests;

    let average_response_time_ms = 100.0 + rng.random_range(0.0..200.0);
    let min_response_time_ms = 50.0 + rng.random_range(0.0..50.0);
    let max_response_time_ms = average_response_time_ms + rng.random_range(0.0..500.0);

    // duration_seconds is validated positive at creation time.
    let throughput_per_sec = total_requests as f64 / f64::from(duration_seconds);
    let error_rate_percent = if total_requests > 0 {
        failed_requests as f64 / total_requests as f64 * 100.0
    } else {
        0.0
    };

    PerformanceMetrics {
        average_response_time_ms,
        min_response_time_ms,
        max_response_time_ms,
        total_requests,
        successful_requests,
        failed_requests,
        throughput_per_sec,
        error_rate_percent,
    }
}
