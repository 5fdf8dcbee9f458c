//! Wire-level types for the datapoint upload protocol.
//!
//! These structs mirror the upload message shape as submitted by clients:
//! a flat list of timestamped datapoints, each carrying a metric name, a
//! value, an optional metric type and a dimension map. They are serde types
//! only — parsing from a concrete encoding lives in the decoder
//! implementations (see [`json::JsonDecoder`]).
pub mod json;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use json::JsonDecoder;

/// One complete upload request: zero or more datapoints.
///
/// An upload with zero datapoints is a valid no-op request, not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataPointUpload {
    #[serde(default)]
    pub datapoints: Vec<DataPoint>,
}

impl DataPointUpload {
    pub fn len(&self) -> usize {
        self.datapoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datapoints.is_empty()
    }
}

/// A single timestamped metric sample as it appears on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPoint {
    /// Metric name; an empty name makes the datapoint unconvertible
    #[serde(default)]
    pub metric: String,
    /// Milliseconds since the Unix epoch; absent means "receive time"
    #[serde(default)]
    pub timestamp: Option<i64>,
    pub value: DataPointValue,
    /// Metric type; defaults to gauge when absent
    #[serde(default, rename = "type")]
    pub metric_type: Option<DataPointType>,
    /// Key/value dimensions attached to the sample
    #[serde(default)]
    pub dimensions: BTreeMap<String, String>,
}

/// Wire value variants. Text values exist in the protocol but have no
/// counterpart in the canonical model and are dropped during conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataPointValue {
    Integer(i64),
    Double(f64),
    Text(String),
}

/// Wire metric type variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataPointType {
    Gauge,
    Counter,
    Cumulative,
}
