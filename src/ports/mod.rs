pub mod consumer;
pub mod decoder;
pub mod host;

pub use consumer::{ConsumeError, MetricsConsumer};
pub use decoder::{DecodeError, ProtocolDecoder};
pub use host::{FatalErrorReporter, TransportError};
