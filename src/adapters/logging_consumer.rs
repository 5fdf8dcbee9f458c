use async_trait::async_trait;

use crate::{
    model::MetricsBatch,
    ports::consumer::{ConsumeError, MetricsConsumer},
};

/// Consumer that logs batch summaries instead of forwarding them.
///
/// Wired in by the binary when no real downstream is configured; useful for
/// smoke-testing an ingestion endpoint before the rest of the pipeline
/// exists.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingConsumer;

#[async_trait]
impl MetricsConsumer for LoggingConsumer {
    async fn consume(&self, batch: MetricsBatch) -> Result<(), ConsumeError> {
        tracing::info!(metrics = batch.len(), "Accepted metrics batch");
        for metric in &batch.metrics {
            tracing::debug!(
                name = %metric.name,
                kind = ?metric.kind,
                timestamp_ms = metric.sample.timestamp_ms,
                "Metric sample"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_logging_consumer_accepts_batches() {
        let consumer = LoggingConsumer;
        assert!(consumer.consume(MetricsBatch::default()).await.is_ok());
    }
}
