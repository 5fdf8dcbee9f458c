//! Pulsegate - an HTTP ingestion gateway for datapoint metrics uploads.
//!
//! Pulsegate is the network-facing edge of a telemetry pipeline, built with a
//! **hexagonal architecture**: one vendor-style upload protocol comes in over
//! HTTP, one canonical metrics model goes out to a downstream consumer.
//!
//! # Features
//! - Strict per-request validation chain (method, content type, content encoding)
//! - Optional gzip request decompression, bounded by a configurable read limit
//! - Fixed catalog of precomputed JSON response bodies for every outcome
//! - Exactly-once start/stop lifecycle over the network listener
//! - Pluggable wire decoder and downstream consumer ports
//! - Metrics (via the `metrics` crate) & structured tracing via `tracing`
//! - Graceful shutdown with fatal listener errors routed to the host
//!
//! # Quick Example
//! ```no_run
//! use std::sync::Arc;
//!
//! use pulsegate::{
//!     adapters::{LoggingConsumer, ShutdownReporter},
//!     config::ReceiverConfig,
//!     core::DatapointReceiver,
//!     protocol::JsonDecoder,
//!     utils::GracefulShutdown,
//! };
//!
//! # #[tokio::main] async fn main() -> eyre::Result<()> {
//! let config = ReceiverConfig {
//!     endpoint: "127.0.0.1:9943".to_string(),
//!     ..ReceiverConfig::default()
//! };
//! let receiver = DatapointReceiver::new(
//!     config,
//!     Arc::new(JsonDecoder),
//!     Arc::new(LoggingConsumer),
//! )?;
//!
//! let shutdown = Arc::new(GracefulShutdown::new());
//! receiver.start(Arc::new(ShutdownReporter::new(shutdown.clone()))).await?;
//! shutdown.wait_for_shutdown_signal().await;
//! receiver.stop().await?;
//! # Ok(()) }
//! ```
//!
//! # Architecture
//! The crate separates **ports** (traits) from **adapters** (implementations)
//! while keeping the request pipeline and lifecycle control inside `core`.
//! The wire protocol never leaks past `model::convert`; everything downstream
//! of the receiver sees only the canonical model.
//!
//! # Error Handling
//! All fallible APIs return a domain specific error type or `eyre::Result<T>`.
//! Per-request failures never propagate: each maps to a fixed HTTP response
//! and a span annotation at the point of detection. Repeated lifecycle
//! transitions report an "already in this state" outcome, never a panic.
//!
//! # License
//! Licensed under Apache-2.0.
pub mod config;
pub mod metrics;
pub mod model;
pub mod ports;
pub mod protocol;
pub mod tracing_setup;
pub mod utils;

// These modules are implementation details and should not be directly used by users
pub mod adapters;
pub mod core;

// Re-export the specific types needed by the binary crate
pub use crate::{
    adapters::{LoggingConsumer, ShutdownReporter},
    core::{DATAPOINT_PATH, DatapointReceiver, LifecycleError, RequestHandler},
    ports::{MetricsConsumer, ProtocolDecoder},
    utils::GracefulShutdown,
};
