//! Canonical, protocol-agnostic metrics model.
//!
//! Everything downstream of the receiver operates on these types; the wire
//! protocol never leaks past the conversion step in [`convert`].
pub mod convert;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use convert::convert_upload;

/// A batch of canonical metrics produced from one upload request.
///
/// Ownership transfers to the downstream consumer on forwarding; the
/// receiver never retains a batch after the consume call returns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsBatch {
    pub metrics: Vec<Metric>,
}

impl MetricsBatch {
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

/// One canonical metric: a name, a kind and a single sample.
///
/// The upload protocol is sample-oriented, so each wire datapoint maps to
/// one canonical metric carrying one sample. Downstream aggregation across
/// samples of the same metric is not this crate's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
    pub kind: MetricKind,
    pub sample: Sample,
}

/// Canonical metric kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Point-in-time measurement
    Gauge,
    /// Delta count since the previous report
    Counter,
    /// Monotonic count since an arbitrary start
    CumulativeCounter,
}

/// One timestamped sample with its attributes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: i64,
    pub value: SampleValue,
    pub attributes: BTreeMap<String, String>,
}

/// Canonical numeric sample values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SampleValue {
    Int(i64),
    Float(f64),
}
