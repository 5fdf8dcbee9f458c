//! Per-request processing pipeline.
//!
//! The handler runs the validation chain, the decoder gateway and the
//! downstream orchestration for one request, stateless across requests.
//! Every exit point maps to a fixed catalog body, a span annotation and an
//! observability record; nothing propagates past this module.
use std::{io::Read, sync::Arc};

use axum::body::{Body, to_bytes};
use bytes::Bytes;
use flate2::read::GzDecoder;
use http::{Method, Request, Response, StatusCode, header};
use tracing::Instrument;

use crate::{
    config::ReceiverConfig,
    core::response::{
        ERR_GZIP_READER_RESP_BODY, ERR_NEXT_CONSUMER_RESP_BODY, ERR_READ_BODY_RESP_BODY,
        ERR_UNMARSHAL_BODY_RESP_BODY, INVALID_CONTENT_TYPE_RESP_BODY,
        INVALID_ENCODING_RESP_BODY, INVALID_METHOD_RESP_BODY, OK_RESP_BODY,
    },
    metrics,
    model::convert_upload,
    ports::{MetricsConsumer, ProtocolDecoder},
    tracing_setup,
};

/// Fixed upload path served by the receiver
pub const DATAPOINT_PATH: &str = "/v2/datapoint";

const GZIP_ENCODING: &str = "gzip";
const APPLICATION_JSON: &str = "application/json";

/// How the request body is encoded on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyEncoding {
    Identity,
    Gzip,
}

/// Stateless per-request orchestrator.
///
/// Holds only shared read-only references; concurrent requests need no
/// locking beyond the `Arc` clones taken at construction.
pub struct RequestHandler {
    config: Arc<ReceiverConfig>,
    decoder: Arc<dyn ProtocolDecoder>,
    consumer: Arc<dyn MetricsConsumer>,
}

impl RequestHandler {
    pub fn new(
        config: Arc<ReceiverConfig>,
        decoder: Arc<dyn ProtocolDecoder>,
        consumer: Arc<dyn MetricsConsumer>,
    ) -> Self {
        Self {
            config,
            decoder,
            consumer,
        }
    }

    /// Process one upload request under a request-scoped span
    pub async fn handle(&self, req: Request<Body>) -> Response<Body> {
        let request_id = uuid::Uuid::new_v4().to_string();
        let span = tracing_setup::create_ingest_span(&self.config.name, &request_id);
        let pipeline_span = span.clone();
        self.process(req, pipeline_span).instrument(span).await
    }

    async fn process(&self, req: Request<Body>, span: tracing::Span) -> Response<Body> {
        let _timer = metrics::IngestTimer::new(&self.config.name);

        if req.method() != Method::POST {
            return self.fail_request(
                &span,
                StatusCode::BAD_REQUEST,
                &INVALID_METHOD_RESP_BODY,
                None,
            );
        }

        let content_type = header_str(&req, header::CONTENT_TYPE);
        if content_type != Some(self.decoder.media_type()) {
            return self.fail_request(
                &span,
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                &INVALID_CONTENT_TYPE_RESP_BODY,
                None,
            );
        }

        let encoding = match header_str(&req, header::CONTENT_ENCODING) {
            None | Some("") => BodyEncoding::Identity,
            Some(GZIP_ENCODING) => BodyEncoding::Gzip,
            Some(_) => {
                return self.fail_request(
                    &span,
                    StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    &INVALID_ENCODING_RESP_BODY,
                    None,
                );
            }
        };

        let raw = match to_bytes(req.into_body(), self.config.max_body_bytes).await {
            Ok(bytes) => bytes,
            Err(e) => {
                return self.fail_request(
                    &span,
                    StatusCode::BAD_REQUEST,
                    &ERR_READ_BODY_RESP_BODY,
                    Some(&e),
                );
            }
        };

        let payload = match encoding {
            BodyEncoding::Identity => raw,
            BodyEncoding::Gzip => {
                match decompress_gzip(&raw, self.config.max_body_bytes) {
                    Ok(bytes) => bytes,
                    Err(GzipError::InvalidHeader(e)) => {
                        return self.fail_request(
                            &span,
                            StatusCode::BAD_REQUEST,
                            &ERR_GZIP_READER_RESP_BODY,
                            Some(&e),
                        );
                    }
                    Err(GzipError::Read(e)) => {
                        return self.fail_request(
                            &span,
                            StatusCode::BAD_REQUEST,
                            &ERR_READ_BODY_RESP_BODY,
                            Some(&e),
                        );
                    }
                }
            }
        };

        let upload = match self.decoder.decode(&payload) {
            Ok(upload) => upload,
            Err(e) => {
                return self.fail_request(
                    &span,
                    StatusCode::BAD_REQUEST,
                    &ERR_UNMARSHAL_BODY_RESP_BODY,
                    Some(&e),
                );
            }
        };

        // A valid request with zero datapoints is a no-op, not an error
        if upload.is_empty() {
            metrics::record_datapoints(&self.config.name, 0, 0);
            return self.succeed_request(&span, StatusCode::OK);
        }

        let total = upload.len();
        let (batch, convert_dropped) = convert_upload(&upload);

        match self.consumer.consume(batch).await {
            Ok(()) => {
                metrics::record_datapoints(&self.config.name, total, convert_dropped);
                self.succeed_request(&span, StatusCode::ACCEPTED)
            }
            Err(e) => {
                // Downstream rejected the batch: everything counts as dropped
                metrics::record_datapoints(&self.config.name, total, total);
                self.fail_request(
                    &span,
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &ERR_NEXT_CONSUMER_RESP_BODY,
                    Some(&e),
                )
            }
        }
    }

    fn succeed_request(&self, span: &tracing::Span, status: StatusCode) -> Response<Body> {
        span.record("http.status_code", status.as_u16());
        metrics::increment_request_total(&self.config.name, status.as_u16());
        catalog_response(status, &OK_RESP_BODY)
    }

    fn fail_request(
        &self,
        span: &tracing::Span,
        status: StatusCode,
        body: &Bytes,
        error: Option<&dyn std::error::Error>,
    ) -> Response<Body> {
        let status_text = std::str::from_utf8(body).unwrap_or_default();

        span.record("http.status_code", status.as_u16());
        span.record("http.status_text", status_text);
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            span.record("otel.status_code", "internal");
        } else {
            span.record("otel.status_code", "invalid_argument");
        }
        if let Some(e) = error {
            span.record("otel.status_message", tracing::field::display(e));
        }

        metrics::increment_request_total(&self.config.name, status.as_u16());

        tracing::debug!(
            http_status_code = status.as_u16(),
            msg = status_text,
            error = error.map(ToString::to_string),
            receiver = %self.config.name,
            "Datapoint receiver request failed"
        );

        catalog_response(status, body)
    }
}

/// Build a response from a precomputed catalog body.
///
/// The status line is committed before the body; hyper owns the actual body
/// write, and write failures surface through the trace layer at low severity
/// without changing the already-committed status.
fn catalog_response(status: StatusCode, body: &Bytes) -> Response<Body> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, APPLICATION_JSON)
        .body(Body::from(body.clone()))
        .unwrap_or_else(|_| Response::new(Body::from(body.clone())))
}

fn header_str<'a>(req: &'a Request<Body>, name: header::HeaderName) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

/// Failures from the decompression step of the decoder gateway
#[derive(Debug)]
enum GzipError {
    /// The stream header is not valid gzip
    InvalidHeader(std::io::Error),
    /// The header parsed but the stream is truncated, corrupt or too large
    Read(std::io::Error),
}

/// Inflate a gzip body, bounded by `limit` decompressed bytes
fn decompress_gzip(raw: &[u8], limit: usize) -> Result<Bytes, GzipError> {
    let mut decoder = GzDecoder::new(raw);
    let mut decoded = Vec::new();

    let read = (&mut decoder)
        .take(limit as u64 + 1)
        .read_to_end(&mut decoded);

    match read {
        Ok(_) if decoded.len() > limit => Err(GzipError::Read(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "decompressed payload exceeds the configured size limit",
        ))),
        Ok(_) => Ok(Bytes::from(decoded)),
        // flate2 parses the header lazily on first read; a missing header
        // after a failed read means the stream never was gzip
        Err(e) if decoder.header().is_none() => Err(GzipError::InvalidHeader(e)),
        Err(e) => Err(GzipError::Read(e)),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::{Compression, write::GzEncoder};

    use super::*;

    #[test]
    fn test_decompress_round_trip() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"{\"datapoints\": []}").unwrap();
        let compressed = encoder.finish().unwrap();

        let decoded = decompress_gzip(&compressed, 1024).unwrap();
        assert_eq!(&decoded[..], b"{\"datapoints\": []}");
    }

    #[test]
    fn test_decompress_rejects_garbage_header() {
        let err = decompress_gzip(b"definitely not gzip", 1024).unwrap_err();
        assert!(matches!(err, GzipError::InvalidHeader(_)));
    }

    #[test]
    fn test_decompress_rejects_truncated_stream() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&vec![7u8; 4096]).unwrap();
        let mut compressed = encoder.finish().unwrap();
        compressed.truncate(compressed.len() / 2);

        let err = decompress_gzip(&compressed, 1 << 20).unwrap_err();
        assert!(matches!(err, GzipError::Read(_)));
    }

    #[test]
    fn test_decompress_enforces_limit() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&vec![0u8; 8192]).unwrap();
        let compressed = encoder.finish().unwrap();

        let err = decompress_gzip(&compressed, 1024).unwrap_err();
        assert!(matches!(err, GzipError::Read(_)));
    }
}
