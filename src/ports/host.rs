use thiserror::Error;

/// Listener failures that occur after `start` has already returned.
///
/// `start` schedules the listener asynchronously and does not block until the
/// socket is bound, so these cannot be returned synchronously to the caller.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TransportError {
    #[error("Failed to bind {endpoint}: {source}")]
    Bind {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Listener terminated unexpectedly: {source}")]
    Serve {
        #[source]
        source: std::io::Error,
    },
}

/// FatalErrorReporter defines the port through which the hosting process is
/// told that the listener died outside of a normal shutdown.
pub trait FatalErrorReporter: Send + Sync + 'static {
    /// Report a fatal transport failure. The receiver makes no recovery
    /// attempt of its own; what happens next is the host's decision.
    fn report_fatal_error(&self, error: TransportError);
}
