use crate::{
    ports::decoder::{DecodeError, ProtocolDecoder},
    protocol::DataPointUpload,
};

/// Registered media type for the JSON rendition of the upload protocol
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// JSON decoder for datapoint uploads.
///
/// This is the decoder the binary wires in by default. The vendor's protobuf
/// rendition can be plugged in through the same [`ProtocolDecoder`] port
/// without touching the request pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonDecoder;

impl ProtocolDecoder for JsonDecoder {
    fn media_type(&self) -> &'static str {
        JSON_MEDIA_TYPE
    }

    fn decode(&self, body: &[u8]) -> Result<DataPointUpload, DecodeError> {
        serde_json::from_slice(body).map_err(|e| DecodeError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{DataPointType, DataPointValue};

    #[test]
    fn test_decode_upload() {
        let body = br#"{
            "datapoints": [
                {
                    "metric": "cpu.utilization",
                    "timestamp": 1700000000000,
                    "value": 42,
                    "type": "gauge",
                    "dimensions": {"host": "web-1"}
                }
            ]
        }"#;

        let upload = JsonDecoder.decode(body).unwrap();
        assert_eq!(upload.len(), 1);
        let dp = &upload.datapoints[0];
        assert_eq!(dp.metric, "cpu.utilization");
        assert_eq!(dp.value, DataPointValue::Integer(42));
        assert_eq!(dp.metric_type, Some(DataPointType::Gauge));
        assert_eq!(dp.dimensions.get("host").map(String::as_str), Some("web-1"));
    }

    #[test]
    fn test_decode_rejects_malformed_bytes() {
        let err = JsonDecoder.decode(b"\x00\x01not json").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn test_decode_rejects_wrong_shape() {
        assert!(JsonDecoder.decode(br#"{"datapoints": 7}"#).is_err());
    }
}
