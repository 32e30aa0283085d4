use crate::context::ContextBag;
use crate::error::{Error, Result};
use crate::handler::{Decoder, Encoder};
use crate::value::Value;

const JSON: &str = "json";

/// The `"json"` format, over `serde_json`.
///
/// # Examples
///
/// ```
/// use vc_mapper::codec::JsonCodec;
/// use vc_mapper::context::ContextBag;
/// use vc_mapper::handler::{Decoder, Encoder};
/// use vc_mapper::value::Value;
///
/// let value = JsonCodec.decode(br#"{"a": [1, null]}"#, "json", &ContextBag::new()).unwrap();
/// let bytes = JsonCodec.encode(&value, "json", &ContextBag::new()).unwrap();
/// assert_eq!(bytes, br#"{"a":[1,null]}"#);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Encoder for JsonCodec {
    fn encode(&self, data: &Value, format: &str, _: &ContextBag) -> Result<Vec<u8>> {
        serde_json::to_vec(data).map_err(|error| Error::Encode {
            format: format.into(),
            message: error.to_string(),
        })
    }

    fn supports_encoding(&self, format: &str, _: &ContextBag) -> bool {
        format == JSON
    }
}

impl Decoder for JsonCodec {
    fn decode(&self, data: &[u8], format: &str, _: &ContextBag) -> Result<Value> {
        serde_json::from_slice(data).map_err(|error| Error::Decode {
            format: format.into(),
            message: error.to_string(),
        })
    }

    fn supports_decoding(&self, format: &str, _: &ContextBag) -> bool {
        format == JSON
    }
}

#[cfg(test)]
mod tests {
    use super::JsonCodec;
    use crate::context::ContextBag;
    use crate::error::Error;
    use crate::handler::{Decoder, Encoder};
    use crate::value::{Map, Object, Value};

    #[test]
    fn objects_are_written_as_maps() {
        let mut fields = Map::new();
        fields.insert("b".into(), Value::from(1));
        fields.insert("a".into(), Value::from("x"));
        let bytes = JsonCodec
            .encode(&Value::Object(Object::anonymous(fields)), "json", &ContextBag::new())
            .unwrap();
        assert_eq!(bytes, br#"{"b":1,"a":"x"}"#);
    }

    #[test]
    fn malformed_input_is_a_decode_error() {
        let error = JsonCodec.decode(b"{", "json", &ContextBag::new()).unwrap_err();
        assert!(matches!(error, Error::Decode { ref format, .. } if format == "json"));
    }

    #[test]
    fn only_json_is_supported() {
        assert!(JsonCodec.supports_decoding("json", &ContextBag::new()));
        assert!(!JsonCodec.supports_encoding("ron", &ContextBag::new()));
    }
}
