use crate::context::ContextBag;
use crate::error::{Error, Result};
use crate::handler::{Decoder, Encoder};
use crate::value::Value;

const RON: &str = "ron";

/// The `"ron"` format, over `ron`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RonCodec;

impl Encoder for RonCodec {
    fn encode(&self, data: &Value, format: &str, _: &ContextBag) -> Result<Vec<u8>> {
        ron::to_string(data)
            .map(String::into_bytes)
            .map_err(|error| Error::Encode {
                format: format.into(),
                message: error.to_string(),
            })
    }

    fn supports_encoding(&self, format: &str, _: &ContextBag) -> bool {
        format == RON
    }
}

impl Decoder for RonCodec {
    fn decode(&self, data: &[u8], format: &str, _: &ContextBag) -> Result<Value> {
        ron::de::from_bytes(data).map_err(|error| Error::Decode {
            format: format.into(),
            message: error.to_string(),
        })
    }

    fn supports_decoding(&self, format: &str, _: &ContextBag) -> bool {
        format == RON
    }
}

#[cfg(test)]
mod tests {
    use super::RonCodec;
    use crate::context::ContextBag;
    use crate::error::Error;
    use crate::handler::{Decoder, Encoder};
    use crate::value::Value;

    #[test]
    fn reads_maps_and_lists() {
        let value = RonCodec
            .decode(br#"{"tags": ["a", "b"], "size": 3}"#, "ron", &ContextBag::new())
            .unwrap();
        let expected: Value = serde_json::from_str(r#"{"tags": ["a", "b"], "size": 3}"#).unwrap();
        assert_eq!(value, expected);
    }

    #[test]
    fn null_is_unit() {
        let bytes = RonCodec.encode(&Value::Null, "ron", &ContextBag::new()).unwrap();
        assert_eq!(bytes, b"()");
    }

    #[test]
    fn malformed_input_is_a_decode_error() {
        let error = RonCodec.decode(b"[1,", "ron", &ContextBag::new()).unwrap_err();
        assert!(matches!(error, Error::Decode { ref format, .. } if format == "ron"));
    }
}
