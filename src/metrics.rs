//! Lightweight metrics helpers for Pulsegate.
//!
//! This module exposes a small set of convenience functions and an RAII timer
//! wrapping the `metrics` crate macros. It intentionally avoids embedding a
//! concrete exporter (the application can initialize any compatible recorder
//! externally) while still documenting Pulsegate‑specific metric names.
//!
//! Provided metrics (all labeled with the logical receiver name):
//! * `pulsegate_requests_total` (counter, also labeled by status)
//! * `pulsegate_request_duration_seconds` (histogram)
//! * `pulsegate_datapoints_received_total` (counter)
//! * `pulsegate_datapoints_dropped_total` (counter)
//!
//! "Dropped" covers both conversion failures and whole-batch downstream
//! rejections; a request that records equal received and dropped counts was
//! rejected in full.
use std::time::Instant;

use metrics::{Unit, counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::Lazy;

pub const PULSEGATE_REQUESTS_TOTAL: &str = "pulsegate_requests_total";
pub const PULSEGATE_REQUEST_DURATION_SECONDS: &str = "pulsegate_request_duration_seconds";
pub const PULSEGATE_DATAPOINTS_RECEIVED_TOTAL: &str = "pulsegate_datapoints_received_total";
pub const PULSEGATE_DATAPOINTS_DROPPED_TOTAL: &str = "pulsegate_datapoints_dropped_total";

/// One-shot registration of metric descriptions
static METRIC_DESCRIPTIONS: Lazy<()> = Lazy::new(|| {
    describe_counter!(
        PULSEGATE_REQUESTS_TOTAL,
        Unit::Count,
        "Total number of upload requests processed by the receiver."
    );
    describe_histogram!(
        PULSEGATE_REQUEST_DURATION_SECONDS,
        Unit::Seconds,
        "Latency of upload requests processed by the receiver."
    );
    describe_counter!(
        PULSEGATE_DATAPOINTS_RECEIVED_TOTAL,
        Unit::Count,
        "Total number of datapoints that entered the pipeline."
    );
    describe_counter!(
        PULSEGATE_DATAPOINTS_DROPPED_TOTAL,
        Unit::Count,
        "Total number of datapoints that did not become usable canonical metrics."
    );
});

/// Record the per-request received/dropped datapoint counts.
///
/// Called exactly once per request that passes decoding, including the
/// zero-datapoint no-op case.
pub fn record_datapoints(receiver: &str, received: usize, dropped: usize) {
    counter!(
        PULSEGATE_DATAPOINTS_RECEIVED_TOTAL,
        "receiver" => receiver.to_string()
    )
    .increment(received as u64);
    counter!(
        PULSEGATE_DATAPOINTS_DROPPED_TOTAL,
        "receiver" => receiver.to_string()
    )
    .increment(dropped as u64);
}

/// Increment the total request counter for one completed request.
pub fn increment_request_total(receiver: &str, status: u16) {
    counter!(
        PULSEGATE_REQUESTS_TOTAL,
        "receiver" => receiver.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record a completed request's duration.
pub fn record_request_duration(receiver: &str, duration: std::time::Duration) {
    histogram!(
        PULSEGATE_REQUEST_DURATION_SECONDS,
        "receiver" => receiver.to_string()
    )
    .record(duration.as_secs_f64());
}

/// RAII helper measuring upload request duration.
pub struct IngestTimer {
    start: Instant,
    receiver: String,
}

impl IngestTimer {
    pub fn new(receiver: &str) -> Self {
        Self {
            start: Instant::now(),
            receiver: receiver.to_string(),
        }
    }
}

impl Drop for IngestTimer {
    fn drop(&mut self) {
        record_request_duration(&self.receiver, self.start.elapsed());
    }
}

/// Initialize metric descriptions (idempotent).
pub fn init_metrics() -> eyre::Result<()> {
    tracing::info!("Initializing Pulsegate metrics system");

    Lazy::force(&METRIC_DESCRIPTIONS);

    tracing::info!("Pulsegate metrics system initialized successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_metrics() {
        let result = init_metrics();
        assert!(result.is_ok());
    }

    #[test]
    fn test_record_datapoints_accepts_zero_counts() {
        // The zero/zero no-op request path must still be recordable
        record_datapoints("test", 0, 0);
        record_datapoints("test", 10, 3);
    }

    #[test]
    fn test_ingest_timer() {
        let timer = IngestTimer::new("test");
        // Timer will record duration when dropped
        drop(timer);
    }
}
