//! Fixed catalog of wire-response bodies.
//!
//! Every outcome the pipeline can reach maps to one precomputed JSON string
//! literal body. The catalog is built once at first use and is immutable
//! afterwards, so concurrent readers need no synchronization. Serializing a
//! static string cannot fail; if it somehow did, that is an unrecoverable
//! initialization fault and panicking at startup is the correct outcome.
use bytes::Bytes;
use once_cell::sync::Lazy;

pub const RESPONSE_OK: &str = "OK";
pub const RESPONSE_INVALID_METHOD: &str = "Only \"POST\" method is supported";
pub const RESPONSE_INVALID_CONTENT_TYPE: &str =
    "\"Content-Type\" must match the protocol media type";
pub const RESPONSE_INVALID_ENCODING: &str = "\"Content-Encoding\" must be \"gzip\" or empty";
pub const RESPONSE_ERR_GZIP_READER: &str = "Error on gzip body";
pub const RESPONSE_ERR_READ_BODY: &str = "Failed to read message body";
pub const RESPONSE_ERR_UNMARSHAL_BODY: &str = "Failed to unmarshal message body";
pub const RESPONSE_ERR_NEXT_CONSUMER: &str = "Internal Server Error";

pub static OK_RESP_BODY: Lazy<Bytes> = Lazy::new(|| json_body(RESPONSE_OK));
pub static INVALID_METHOD_RESP_BODY: Lazy<Bytes> =
    Lazy::new(|| json_body(RESPONSE_INVALID_METHOD));
pub static INVALID_CONTENT_TYPE_RESP_BODY: Lazy<Bytes> =
    Lazy::new(|| json_body(RESPONSE_INVALID_CONTENT_TYPE));
pub static INVALID_ENCODING_RESP_BODY: Lazy<Bytes> =
    Lazy::new(|| json_body(RESPONSE_INVALID_ENCODING));
pub static ERR_GZIP_READER_RESP_BODY: Lazy<Bytes> =
    Lazy::new(|| json_body(RESPONSE_ERR_GZIP_READER));
pub static ERR_READ_BODY_RESP_BODY: Lazy<Bytes> = Lazy::new(|| json_body(RESPONSE_ERR_READ_BODY));
pub static ERR_UNMARSHAL_BODY_RESP_BODY: Lazy<Bytes> =
    Lazy::new(|| json_body(RESPONSE_ERR_UNMARSHAL_BODY));
pub static ERR_NEXT_CONSUMER_RESP_BODY: Lazy<Bytes> =
    Lazy::new(|| json_body(RESPONSE_ERR_NEXT_CONSUMER));

/// Serialize a catalog message as a JSON string literal body
fn json_body(message: &str) -> Bytes {
    let body = serde_json::to_vec(message)
        .expect("serializing a static string as JSON cannot fail");
    Bytes::from(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bodies_are_json_string_literals() {
        for body in [
            &OK_RESP_BODY,
            &INVALID_METHOD_RESP_BODY,
            &INVALID_CONTENT_TYPE_RESP_BODY,
            &INVALID_ENCODING_RESP_BODY,
            &ERR_GZIP_READER_RESP_BODY,
            &ERR_READ_BODY_RESP_BODY,
            &ERR_UNMARSHAL_BODY_RESP_BODY,
            &ERR_NEXT_CONSUMER_RESP_BODY,
        ] {
            let decoded: String = serde_json::from_slice(body).unwrap();
            assert!(!decoded.is_empty());
        }
    }

    #[test]
    fn test_ok_body_round_trips() {
        let decoded: String = serde_json::from_slice(&OK_RESP_BODY).unwrap();
        assert_eq!(decoded, RESPONSE_OK);
    }
}
