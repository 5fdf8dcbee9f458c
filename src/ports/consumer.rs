use async_trait::async_trait;
use thiserror::Error;

use crate::model::MetricsBatch;

/// Error returned when the downstream consumer rejects a batch
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConsumeError {
    /// The consumer refused the batch (backpressure, invalid state, ...)
    #[error("Metrics batch rejected: {0}")]
    Rejected(String),
    /// The consumer is no longer able to accept data at all
    #[error("Consumer unavailable: {0}")]
    Unavailable(String),
}

/// MetricsConsumer defines the port (interface) for the downstream stage
/// that accepts canonical metrics batches.
///
/// Ownership of the batch transfers on the call; the receiver never retains
/// or retries a batch after `consume` returns. The request-scoped tracing
/// span is active for the duration of the call, so implementations may
/// annotate it freely.
#[async_trait]
pub trait MetricsConsumer: Send + Sync + 'static {
    /// Accept one canonical metrics batch.
    ///
    /// # Returns
    /// `Ok(())` if the batch was accepted, an error if the entire batch was
    /// rejected. Partial acceptance is not part of the contract.
    async fn consume(&self, batch: MetricsBatch) -> Result<(), ConsumeError>;
}
