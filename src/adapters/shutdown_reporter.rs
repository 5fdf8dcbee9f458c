use std::sync::Arc;

use crate::{
    ports::host::{FatalErrorReporter, TransportError},
    utils::graceful_shutdown::{GracefulShutdown, ShutdownReason},
};

/// Fatal-error sink that takes the process down cleanly.
///
/// A receiver whose listener died cannot serve anything; the binary treats
/// that as terminal and routes it into the graceful-shutdown machinery.
pub struct ShutdownReporter {
    shutdown: Arc<GracefulShutdown>,
}

impl ShutdownReporter {
    pub fn new(shutdown: Arc<GracefulShutdown>) -> Self {
        Self { shutdown }
    }
}

impl FatalErrorReporter for ShutdownReporter {
    fn report_fatal_error(&self, error: TransportError) {
        tracing::error!(error = %error, "Fatal listener failure, shutting down");
        if let Err(e) = self.shutdown.trigger_shutdown(ShutdownReason::Force) {
            tracing::error!(error = %e, "Failed to trigger shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fatal_error_triggers_shutdown() {
        let shutdown = Arc::new(GracefulShutdown::new());
        let reporter = ShutdownReporter::new(shutdown.clone());

        reporter.report_fatal_error(TransportError::Serve {
            source: std::io::Error::other("listener gone"),
        });

        assert!(shutdown.is_shutdown_initiated());
    }
}
