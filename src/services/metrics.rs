//! Metrics aggregation for simulated request outcomes.
//!
//! Pure computation: a streaming reduction over per-request outcomes into a
//! [`PerformanceMetrics`] summary. No shared state.

use crate::models::PerformanceMetrics;

/// Outcome of a single simulated request.
#[derive(Debug, Clone, Copy)]
pub struct RequestOutcome {
    /// Elapsed time for this request in milliseconds.
    pub elapsed_ms: f64,
    /// Whether the request succeeded.
    pub success: bool,
}

/// Aggregate a sequence of request outcomes into summary metrics.
///
/// Maintains a running sum, min, max and success/failure counters in a single
/// pass. `total_elapsed_secs` is the wall-clock duration of the whole run and
/// drives the throughput figure.
///
/// An empty input yields all-zero metrics with `error_rate_percent = 0` and
/// `min_response_time_ms = 0`; the min-tracking sentinel never leaks out.
pub fn aggregate(outcomes: &[RequestOutcome], total_elapsed_secs: f64) -> PerformanceMetrics {
    let mut total_response_time = 0.0;
    let mut min_response_time = f64::MAX;
    let mut max_response_time: f64 = 0.0;
    let mut successful: u64 = 0;
    let mut failed: u64 = 0;

    for outcome in outcomes {
        total_response_time += outcome.elapsed_ms;
        min_response_time = min_response_time.min(outcome.elapsed_ms);
        max_response_time = max_response_time.max(outcome.elapsed_ms);
        if outcome.success {
            successful += 1;
        } else {
            failed += 1;
        }
    }

    let total = outcomes.len() as u64;

    let average_response_time_ms = if total > 0 {
        total_response_time / total as f64
    } else {
        0.0
    };
    let throughput_per_sec = if total_elapsed_secs > 0.0 {
        total as f64 / total_elapsed_secs
    } else {
        0.0
    };
    let error_rate_percent = if total > 0 {
        failed as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    PerformanceMetrics {
        average_response_time_ms,
        // First sample wins; normalize the unset sentinel to 0 for empty input.
        min_response_time_ms: if min_response_time == f64::MAX {
            0.0
        } else {
            min_response_time
        },
        max_response_time_ms: max_response_time,
        total_requests: total,
        successful_requests: successful,
        failed_requests: failed,
        throughput_per_sec,
        error_rate_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(elapsed_ms: f64, success: bool) -> RequestOutcome {
        RequestOutcome { elapsed_ms, success }
    }

    #[test]
    fn test_empty_input_yields_zeroed_metrics() {
        let metrics = aggregate(&[], 1.0);
        assert_eq!(metrics.total_requests, 0);
        assert_eq!(metrics.successful_requests, 0);
        assert_eq!(metrics.failed_requests, 0);
        assert_eq!(metrics.average_response_time_ms, 0.0);
        // The sentinel must be normalized, not propagated.
        assert_eq!(metrics.min_response_time_ms, 0.0);
        assert_eq!(metrics.max_response_time_ms, 0.0);
        assert_eq!(metrics.error_rate_percent, 0.0);
        assert_eq!(metrics.throughput_per_sec, 0.0);
    }

    #[test]
    fn test_mixed_outcomes() {
        let outcomes = [
            outcome(10.0, true),
            outcome(30.0, true),
            outcome(20.0, false),
            outcome(40.0, true),
        ];
        let metrics = aggregate(&outcomes, 2.0);

        assert_eq!(metrics.total_requests, 4);
        assert_eq!(metrics.successful_requests, 3);
        assert_eq!(metrics.failed_requests, 1);
        assert_eq!(
            metrics.total_requests,
            metrics.successful_requests + metrics.failed_requests
        );
        assert_eq!(metrics.average_response_time_ms, 25.0);
        assert_eq!(metrics.min_response_time_ms, 10.0);
        assert_eq!(metrics.max_response_time_ms, 40.0);
        assert_eq!(metrics.throughput_per_sec, 2.0);
        assert_eq!(metrics.error_rate_percent, 25.0);
    }

    #[test]
    fn test_single_sample_sets_min_and_max() {
        let metrics = aggregate(&[outcome(17.5, true)], 0.5);
        assert_eq!(metrics.min_response_time_ms, 17.5);
        assert_eq!(metrics.max_response_time_ms, 17.5);
        assert_eq!(metrics.average_response_time_ms, 17.5);
        assert_eq!(metrics.error_rate_percent, 0.0);
        assert_eq!(metrics.throughput_per_sec, 2.0);
    }

    #[test]
    fn test_all_failures() {
        let outcomes = [outcome(5.0, false), outcome(15.0, false)];
        let metrics = aggregate(&outcomes, 1.0);
        assert_eq!(metrics.successful_requests, 0);
        assert_eq!(metrics.failed_requests, 2);
        assert_eq!(metrics.error_rate_percent, 100.0);
    }

    #[test]
    fn test_zero_elapsed_guard() {
        let metrics = aggregate(&[outcome(1.0, true)], 0.0);
        assert_eq!(metrics.throughput_per_sec, 0.0);
    }
}
