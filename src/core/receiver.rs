//! Receiver lifecycle control.
//!
//! One receiver owns one listener. Start and stop are exactly-once
//! transitions over a three-state machine guarded by a single lock; repeated
//! calls report a distinguishable "already in this state" outcome instead of
//! failing or panicking. The listener itself is bound asynchronously, so
//! bind and serve failures are delivered to the host's fatal-error sink
//! rather than returned from `start`.
use std::{
    mem,
    net::SocketAddr,
    sync::{Arc, OnceLock},
    time::Duration,
};

use axum::{Router, extract::Request, routing::any};
use thiserror::Error;
use tokio::{net::TcpListener, sync::Mutex, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    config::{ReceiverConfig, ReceiverConfigValidator, ValidationError},
    core::handler::{DATAPOINT_PATH, RequestHandler},
    ports::{FatalErrorReporter, MetricsConsumer, ProtocolDecoder, TransportError},
};

/// Non-fatal outcome of a repeated lifecycle transition
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Receiver already started")]
    AlreadyStarted,
    #[error("Receiver already stopped")]
    AlreadyStopped,
}

/// Lifecycle states of a receiver instance
enum Lifecycle {
    Idle,
    Running {
        shutdown: CancellationToken,
        task: JoinHandle<()>,
    },
    Stopped,
}

/// A single HTTP ingestion endpoint for datapoint uploads.
///
/// Created once, started at most once, stopped at most once. The listener
/// handle lives inside the spawned serve task and is closed only through
/// [`DatapointReceiver::stop`].
pub struct DatapointReceiver {
    config: Arc<ReceiverConfig>,
    handler: Arc<RequestHandler>,
    lifecycle: Mutex<Lifecycle>,
    bound_addr: Arc<OnceLock<SocketAddr>>,
}

impl DatapointReceiver {
    /// Build a receiver from a validated configuration.
    ///
    /// Fails synchronously on configuration errors, before any network
    /// resource is acquired.
    pub fn new(
        config: ReceiverConfig,
        decoder: Arc<dyn ProtocolDecoder>,
        consumer: Arc<dyn MetricsConsumer>,
    ) -> Result<Self, ValidationError> {
        ReceiverConfigValidator::validate(&config)?;

        let config = Arc::new(config);
        let handler = Arc::new(RequestHandler::new(config.clone(), decoder, consumer));

        Ok(Self {
            config,
            handler,
            lifecycle: Mutex::new(Lifecycle::Idle),
            bound_addr: Arc::new(OnceLock::new()),
        })
    }

    /// Start listening on the configured endpoint.
    ///
    /// Returns once the serve task is scheduled, not once the socket is
    /// bound; bind failures reach `host` asynchronously. Every invocation
    /// after the first reports the current terminal state.
    pub async fn start(
        &self,
        host: Arc<dyn FatalErrorReporter>,
    ) -> Result<(), LifecycleError> {
        let mut lifecycle = self.lifecycle.lock().await;

        match &*lifecycle {
            Lifecycle::Idle => {
                let shutdown = CancellationToken::new();
                let task = tokio::spawn(serve(
                    self.config.clone(),
                    self.handler.clone(),
                    host,
                    shutdown.clone(),
                    self.bound_addr.clone(),
                ));
                *lifecycle = Lifecycle::Running { shutdown, task };
                Ok(())
            }
            Lifecycle::Running { .. } => Err(LifecycleError::AlreadyStarted),
            Lifecycle::Stopped => Err(LifecycleError::AlreadyStopped),
        }
    }

    /// Close the listener.
    ///
    /// In-flight requests are not drained; their connections observe a
    /// close. Calling stop on a receiver that is not running (including one
    /// that was never started) reports `AlreadyStopped` as a no-op.
    pub async fn stop(&self) -> Result<(), LifecycleError> {
        let mut lifecycle = self.lifecycle.lock().await;

        match mem::replace(&mut *lifecycle, Lifecycle::Stopped) {
            Lifecycle::Running { shutdown, task } => {
                shutdown.cancel();
                // The serve task exits on its own once the token fires;
                // stop does not wait for it.
                drop(task);
                tracing::info!(
                    receiver = %self.config.name,
                    "Datapoint receiver stopped"
                );
                Ok(())
            }
            Lifecycle::Idle | Lifecycle::Stopped => Err(LifecycleError::AlreadyStopped),
        }
    }

    /// Address the listener actually bound to, once the bind completed.
    ///
    /// Useful when the configured endpoint uses port 0.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.bound_addr.get().copied()
    }

    /// The configuration this receiver was built with
    pub fn config(&self) -> &ReceiverConfig {
        &self.config
    }
}

/// Bind and run the listener until shutdown or fatal failure
async fn serve(
    config: Arc<ReceiverConfig>,
    handler: Arc<RequestHandler>,
    host: Arc<dyn FatalErrorReporter>,
    shutdown: CancellationToken,
    bound_addr: Arc<OnceLock<SocketAddr>>,
) {
    let listener = match TcpListener::bind(config.endpoint.as_str()).await {
        Ok(listener) => listener,
        Err(e) => {
            host.report_fatal_error(TransportError::Bind {
                endpoint: config.endpoint.clone(),
                source: e,
            });
            return;
        }
    };

    if let Ok(addr) = listener.local_addr() {
        let _ = bound_addr.set(addr);
    }

    tracing::info!(
        receiver = %config.name,
        endpoint = %config.endpoint,
        "Datapoint receiver listening"
    );

    let app = build_router(handler, Duration::from_secs(config.server_timeout_secs));

    let result = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown.clone().cancelled_owned())
        .await;

    match result {
        Ok(()) => tracing::info!(receiver = %config.name, "Listener closed"),
        Err(e) if shutdown.is_cancelled() => {
            tracing::debug!(receiver = %config.name, error = %e, "Listener closed during shutdown");
        }
        Err(e) => host.report_fatal_error(TransportError::Serve { source: e }),
    }
}

/// Router exposing exactly the upload path.
///
/// The route accepts any method so that the handler, not the router, maps
/// wrong methods to the catalog's "invalid method" body.
fn build_router(handler: Arc<RequestHandler>, timeout: Duration) -> Router {
    let ingest = move |req: Request| {
        let handler = handler.clone();
        async move { handler.handle(req).await }
    };

    Router::new()
        .route(DATAPOINT_PATH, any(ingest))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
}
