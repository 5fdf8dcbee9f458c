use thiserror::Error;

use crate::protocol::DataPointUpload;

/// Error returned when a request body cannot be parsed as the wire protocol
#[derive(Error, Debug)]
#[error("Malformed payload: {0}")]
pub struct DecodeError(pub String);

/// ProtocolDecoder defines the port for parsing raw upload bytes into
/// protocol-level datapoint records.
///
/// Implementations must be pure: no I/O, no shared mutable state. The
/// declared media type is enforced verbatim by the request validation chain
/// (`Content-Type` must match it exactly).
pub trait ProtocolDecoder: Send + Sync + 'static {
    /// The registered media type of the wire protocol this decoder accepts
    fn media_type(&self) -> &'static str;

    /// Parse a fully-read, already-decompressed request body
    fn decode(&self, body: &[u8]) -> Result<DataPointUpload, DecodeError>;
}
