//! Conversion from wire datapoints to the canonical model.
//!
//! Pure data transform, no I/O. Datapoints that cannot be faithfully
//! represented are counted as dropped; the remainder of the batch still
//! proceeds. Partial conversion is degraded success, never an error.
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{
    model::{Metric, MetricKind, MetricsBatch, Sample, SampleValue},
    protocol::{DataPoint, DataPointType, DataPointUpload, DataPointValue},
};

/// Convert an upload into a canonical batch.
///
/// Returns the batch plus the number of datapoints that could not be
/// converted: entries with an empty metric name, or with a text value,
/// which has no canonical counterpart.
pub fn convert_upload(upload: &DataPointUpload) -> (MetricsBatch, usize) {
    let mut metrics = Vec::with_capacity(upload.datapoints.len());
    let mut dropped = 0usize;

    for datapoint in &upload.datapoints {
        match convert_datapoint(datapoint) {
            Some(metric) => metrics.push(metric),
            None => {
                dropped += 1;
                tracing::debug!(
                    metric = %datapoint.metric,
                    "Dropping unconvertible datapoint"
                );
            }
        }
    }

    (MetricsBatch { metrics }, dropped)
}

fn convert_datapoint(datapoint: &DataPoint) -> Option<Metric> {
    if datapoint.metric.is_empty() {
        return None;
    }

    let value = match &datapoint.value {
        DataPointValue::Integer(v) => SampleValue::Int(*v),
        DataPointValue::Double(v) => SampleValue::Float(*v),
        // Text values have no canonical representation
        DataPointValue::Text(_) => return None,
    };

    let kind = match datapoint.metric_type.unwrap_or(DataPointType::Gauge) {
        DataPointType::Gauge => MetricKind::Gauge,
        DataPointType::Counter => MetricKind::Counter,
        DataPointType::Cumulative => MetricKind::CumulativeCounter,
    };

    Some(Metric {
        name: datapoint.metric.clone(),
        kind,
        sample: Sample {
            timestamp_ms: datapoint.timestamp.unwrap_or_else(now_ms),
            value,
            attributes: datapoint.dimensions.clone(),
        },
    })
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn datapoint(metric: &str, value: DataPointValue) -> DataPoint {
        DataPoint {
            metric: metric.to_string(),
            timestamp: Some(1_700_000_000_000),
            value,
            metric_type: None,
            dimensions: BTreeMap::new(),
        }
    }

    #[test]
    fn test_convert_preserves_numeric_datapoints() {
        let upload = DataPointUpload {
            datapoints: vec![
                datapoint("cpu.utilization", DataPointValue::Integer(42)),
                datapoint("mem.used_ratio", DataPointValue::Double(0.73)),
            ],
        };

        let (batch, dropped) = convert_upload(&upload);
        assert_eq!(batch.len(), 2);
        assert_eq!(dropped, 0);
        assert_eq!(batch.metrics[0].name, "cpu.utilization");
        assert_eq!(batch.metrics[0].kind, MetricKind::Gauge);
        assert_eq!(batch.metrics[0].sample.value, SampleValue::Int(42));
    }

    #[test]
    fn test_convert_drops_text_values_and_unnamed_points() {
        let upload = DataPointUpload {
            datapoints: vec![
                datapoint("service.state", DataPointValue::Text("up".to_string())),
                datapoint("", DataPointValue::Integer(1)),
                datapoint("requests", DataPointValue::Integer(9)),
            ],
        };

        let (batch, dropped) = convert_upload(&upload);
        assert_eq!(batch.len(), 1);
        assert_eq!(dropped, 2);
        assert_eq!(batch.metrics[0].name, "requests");
    }

    #[test]
    fn test_convert_maps_metric_types() {
        let mut dp = datapoint("disk.reads", DataPointValue::Integer(100));
        dp.metric_type = Some(DataPointType::Cumulative);

        let (batch, dropped) = convert_upload(&DataPointUpload {
            datapoints: vec![dp],
        });
        assert_eq!(dropped, 0);
        assert_eq!(batch.metrics[0].kind, MetricKind::CumulativeCounter);
    }

    #[test]
    fn test_convert_fills_missing_timestamp() {
        let mut dp = datapoint("uptime", DataPointValue::Integer(1));
        dp.timestamp = None;

        let (batch, _) = convert_upload(&DataPointUpload {
            datapoints: vec![dp],
        });
        assert!(batch.metrics[0].sample.timestamp_ms > 0);
    }
}
