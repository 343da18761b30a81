//! Metrics collection.
//!
//! # Metrics
//! - `dispatch_requests_total` (counter): requests by method, final status
//! - `dispatch_duration_seconds` (histogram): time spent in one cycle
//! - `dispatch_chain_length` (histogram): handlers resolved per request
//! - `dispatch_errors_total` (counter): failures by kind, recovered or not

use std::time::Instant;

use ::metrics::{counter, histogram};

/// Record one completed dispatch cycle.
pub fn record_dispatch(method: &str, status: u16, chain_len: usize, start: Instant) {
    counter!(
        "dispatch_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("dispatch_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
    histogram!("dispatch_chain_length").record(chain_len as f64);
}

/// Record a dispatch failure before recovery is attempted.
pub fn record_error(kind: &'static str) {
    counter!("dispatch_errors_total", "kind" => kind).increment(1);
}
