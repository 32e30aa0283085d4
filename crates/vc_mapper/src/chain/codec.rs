use alloc::sync::Arc;

use crate::context::ContextBag;
use crate::error::{Error, Result};
use crate::handler::{Decoder, Encoder};
use crate::value::Value;

// -----------------------------------------------------------------------------
// ChainEncoder

/// Dispatches encoding to the first [`Encoder`] supporting the format.
#[derive(Clone, Default)]
pub struct ChainEncoder {
    encoders: Vec<Arc<dyn Encoder>>,
}

impl ChainEncoder {
    pub fn new(encoders: Vec<Arc<dyn Encoder>>) -> Self {
        Self { encoders }
    }

    pub fn push(&mut self, encoder: Arc<dyn Encoder>) {
        self.encoders.push(encoder);
    }

    pub fn encoder_for(&self, format: &str, context: &ContextBag) -> Option<&Arc<dyn Encoder>> {
        self.encoders
            .iter()
            .find(|encoder| encoder.supports_encoding(format, context))
    }

    pub fn encode(&self, data: &Value, format: &str, context: &ContextBag) -> Result<Vec<u8>> {
        match self.encoder_for(format, context) {
            Some(encoder) => encoder.encode(data, format, context),
            None => Err(Error::unsupported_format("Encode", format)),
        }
    }

    #[inline]
    pub fn supports_encoding(&self, format: &str, context: &ContextBag) -> bool {
        self.encoder_for(format, context).is_some()
    }
}

// -----------------------------------------------------------------------------
// ChainDecoder

/// Dispatches decoding to the first [`Decoder`] supporting the format.
#[derive(Clone, Default)]
pub struct ChainDecoder {
    decoders: Vec<Arc<dyn Decoder>>,
}

impl ChainDecoder {
    pub fn new(decoders: Vec<Arc<dyn Decoder>>) -> Self {
        Self { decoders }
    }

    pub fn push(&mut self, decoder: Arc<dyn Decoder>) {
        self.decoders.push(decoder);
    }

    pub fn decoder_for(&self, format: &str, context: &ContextBag) -> Option<&Arc<dyn Decoder>> {
        self.decoders
            .iter()
            .find(|decoder| decoder.supports_decoding(format, context))
    }

    pub fn decode(&self, data: &[u8], format: &str, context: &ContextBag) -> Result<Value> {
        match self.decoder_for(format, context) {
            Some(decoder) => decoder.decode(data, format, context),
            None => Err(Error::unsupported_format("Decode", format)),
        }
    }

    #[inline]
    pub fn supports_decoding(&self, format: &str, context: &ContextBag) -> bool {
        self.decoder_for(format, context).is_some()
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use super::{ChainDecoder, ChainEncoder};
    use crate::codec::JsonCodec;
    use crate::context::ContextBag;
    use crate::error::Error;
    use crate::value::Value;

    #[test]
    fn unsupported_format_is_named() {
        let encoders = ChainEncoder::new(vec![Arc::new(JsonCodec)]);
        let error = encoders
            .encode(&Value::Null, "yaml", &ContextBag::new())
            .unwrap_err();
        assert!(matches!(&error, Error::UnsupportedFormat { format, .. } if format == "yaml"));
        assert_eq!(error.to_string(), "Encode for the format \"yaml\" is not supported");
    }

    #[test]
    fn first_supporting_decoder_wins() {
        let decoders = ChainDecoder::new(vec![Arc::new(JsonCodec)]);
        let value = decoders.decode(b"[1]", "json", &ContextBag::new()).unwrap();
        assert_eq!(value, Value::List(vec![Value::from(1)]));
        assert!(!decoders.supports_decoding("xml", &ContextBag::new()));
    }
}
