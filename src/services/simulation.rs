//! Synchronous load simulation engine.
//!
//! Runs a bounded loop of simulated requests (artificial delay plus random
//! jitter, fixed failure probability) and aggregates the outcomes. Results
//! are throwaway; nothing is written to the registry.

use std::time::Instant;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::{SimulateLoadParams, TestResponse, TestStatus};
use crate::services::metrics::{RequestOutcome, aggregate};

/// Upper bound of the uniform jitter added to each simulated request, in
/// milliseconds.
const JITTER_MS: u64 = 50;

/// Probability that a simulated request fails, modeling an unreliable
/// backend.
const FAILURE_RATE: f64 = 0.05;

/// Run a load simulation to completion and return its aggregated metrics.
///
/// Blocks (in the async sense) for the entire run: roughly
/// `requests * (delay_ms + 25ms)`. Callers are expected to keep `requests`
/// within the bounds enforced by [`SimulateLoadParams::validate`]; the engine
/// itself only rejects `requests < 1`.
pub async fn simulate_load(params: &SimulateLoadParams) -> AppResult<TestResponse> {
    let mut rng = StdRng::from_os_rng();
    simulate_load_with_rng(params, &mut rng).await
}

/// [`simulate_load`] with an injected random source, for deterministic tests.
pub async fn simulate_load_with_rng<R: Rng>(
    params: &SimulateLoadParams,
    rng: &mut R,
) -> AppResult<TestResponse> {
    if params.requests < 1 {
        return Err(AppError::InvalidInput(
            "requests must be at least 1".to_string(),
        ));
    }

    info!(
        "Simulating load with {} requests and {}ms delay",
        params.requests, params.delay_ms
    );

    let started_at = Utc::now();
    let run_start = Instant::now();
    let mut outcomes = Vec::with_capacity(params.requests as usize);

    for _ in 0..params.requests {
        let request_start = Instant::now();
        let jitter = rng.random_range(0..JITTER_MS);
        let failed = rng.random_bool(FAILURE_RATE);

        tokio::time::sleep(std::time::Duration::from_millis(params.delay_ms + jitter)).await;

        outcomes.push(RequestOutcome {
            elapsed_ms: request_start.elapsed().as_secs_f64() * 1000.0,
            success: !failed,
        });
    }

    let total_elapsed = run_start.elapsed();
    let metrics = aggregate(&outcomes, total_elapsed.as_secs_f64());

    info!(
        "Load simulation finished: {} requests in {:.2}s ({:.1} req/s)",
        metrics.total_requests,
        total_elapsed.as_secs_f64(),
        metrics.throughput_per_sec
    );

    Ok(TestResponse {
        test_id: format!("load-simulation-{}", started_at.timestamp_millis()),
        test_name: "Load Simulation".to_string(),
        status: TestStatus::Completed,
        start_time: started_at,
        end_time: Some(Utc::now()),
        duration_seconds: total_elapsed.as_secs() as u32,
        load_level: params.requests,
        description: Some("Simulated load test".to_string()),
        metrics: Some(metrics),
    })
}
