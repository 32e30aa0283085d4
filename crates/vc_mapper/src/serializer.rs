use alloc::sync::Arc;

use crate::chain::{ChainDecoder, ChainDenormalizer, ChainEncoder, ChainNormalizer};
use crate::codec::JsonCodec;
use crate::context::{ContextBag, SerializationContext};
use crate::discriminator::DiscriminatorResolver;
use crate::error::{Error, Result};
use crate::handler::{Decoder, Denormalizer, Encoder, Normalizer, SerializerValidator};
use crate::normalizer::{
    ArrayNormalizer, BuiltinDenormalizer, CustomNormalizer, EnumNormalizer, ObjectMapper,
    UnionDenormalizer,
};
use crate::shape::ClassRegistry;
use crate::types::Type;
use crate::value::Value;

// -----------------------------------------------------------------------------
// Serializer

/// Entry point of every conversion.
///
/// A `Serializer` owns four ordered chains and hands itself to every handler
/// it dispatches to, so nested values go through the same chains. The chains
/// never change after [`SerializerBuilder::build`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use vc_mapper::Serializer;
/// use vc_mapper::context::ContextBag;
/// use vc_mapper::shape::{ClassRegistry, ClassShape, ParameterShape};
/// use vc_mapper::types::Type;
/// use vc_mapper::value::{Object, Value};
///
/// let registry = ClassRegistry::new()
///     .with(ClassShape::new("Point").with_promoted(ParameterShape::new("x", Type::Int)));
/// let serializer = Serializer::with_defaults(Arc::new(registry));
///
/// let point = Value::Object(Object::new("Point").with("x", 3));
/// let bytes = serializer.serialize(&point, "json", &ContextBag::new()).unwrap();
/// assert_eq!(bytes, br#"{"x":3}"#);
///
/// let back = serializer
///     .deserialize(&bytes, &Type::class("Point"), "json", &ContextBag::new())
///     .unwrap();
/// assert_eq!(back, point);
/// ```
#[derive(Clone, Default)]
pub struct Serializer {
    normalizer: ChainNormalizer,
    denormalizer: ChainDenormalizer,
    encoder: ChainEncoder,
    decoder: ChainDecoder,
    validator: Option<Arc<dyn SerializerValidator>>,
}

impl Serializer {
    #[inline]
    pub fn builder() -> SerializerBuilder {
        SerializerBuilder::default()
    }

    /// A serializer with every built-in handler and codec, in dispatch order:
    /// custom mappings, enums, unions, arrays, objects, builtins.
    pub fn with_defaults(registry: Arc<ClassRegistry>) -> Self {
        let builder = Self::builder()
            .with_handler(CustomNormalizer::new(registry.clone()))
            .with_handler(EnumNormalizer::new(registry.clone()))
            .with_denormalizer(UnionDenormalizer::new(Arc::new(DiscriminatorResolver::new(
                registry.clone(),
            ))))
            .with_handler(ArrayNormalizer)
            .with_handler(ObjectMapper::new(registry))
            .with_denormalizer(BuiltinDenormalizer)
            .with_codec(JsonCodec);
        #[cfg(feature = "ron")]
        let builder = builder.with_codec(crate::codec::RonCodec);
        builder.build()
    }

    /// Normalizes `data` for `format`, then encodes it.
    ///
    /// Fails before normalizing when no encoder supports `format`.
    pub fn serialize(&self, data: &Value, format: &str, context: &ContextBag) -> Result<Vec<u8>> {
        if !self.supports_encoding(format, context) {
            return Err(Error::unsupported_format("Serialization", format));
        }
        let normalized = self.normalize(data, Some(format), context)?;
        self.encode(&normalized, format, context)
    }

    /// Decodes `data`, then denormalizes it into `ty`.
    ///
    /// Fails before decoding when no decoder supports `format`.
    pub fn deserialize(
        &self,
        data: &[u8],
        ty: &Type,
        format: &str,
        context: &ContextBag,
    ) -> Result<Value> {
        if !self.supports_decoding(format, context) {
            return Err(Error::unsupported_format("Deserialization", format));
        }
        let decoded = self.decode(data, format, context)?;
        self.denormalize(&decoded, ty, Some(format), context)
    }

    pub fn normalize(&self, data: &Value, format: Option<&str>, context: &ContextBag) -> Result<Value> {
        self.normalizer.normalize(data, format, context, self)
    }

    /// Builds a value of type `ty` from `data`.
    ///
    /// The validator, if any, runs first unless
    /// [`SerializationContext::validate_before_denormalization`] is off.
    pub fn denormalize(
        &self,
        data: &Value,
        ty: &Type,
        format: Option<&str>,
        context: &ContextBag,
    ) -> Result<Value> {
        if let Some(validator) = &self.validator
            && context.get::<SerializationContext>().validate_before_denormalization()
        {
            validator.validate(data, ty, context)?;
        }
        self.denormalizer.denormalize(data, ty, format, context, self)
    }

    pub fn encode(&self, data: &Value, format: &str, context: &ContextBag) -> Result<Vec<u8>> {
        self.encoder.encode(data, format, context)
    }

    pub fn decode(&self, data: &[u8], format: &str, context: &ContextBag) -> Result<Value> {
        self.decoder.decode(data, format, context)
    }

    #[inline]
    pub fn supports_normalization(&self, data: &Value, format: Option<&str>, context: &ContextBag) -> bool {
        self.normalizer.supports_normalization(data, format, context)
    }

    #[inline]
    pub fn supports_denormalization(
        &self,
        data: &Value,
        ty: &Type,
        format: Option<&str>,
        context: &ContextBag,
    ) -> bool {
        self.denormalizer.supports_denormalization(data, ty, format, context)
    }

    /// Returns `true` if some denormalizer takes both `ty` and the shape of `data`.
    #[inline]
    pub fn supports_denormalization_data(
        &self,
        data: &Value,
        ty: &Type,
        format: Option<&str>,
        context: &ContextBag,
    ) -> bool {
        self.denormalizer.supports_denormalization_data(data, ty, format, context)
    }

    #[inline]
    pub fn supports_encoding(&self, format: &str, context: &ContextBag) -> bool {
        self.encoder.supports_encoding(format, context)
    }

    #[inline]
    pub fn supports_decoding(&self, format: &str, context: &ContextBag) -> bool {
        self.decoder.supports_decoding(format, context)
    }

    #[inline]
    pub fn normalizers(&self) -> &ChainNormalizer {
        &self.normalizer
    }

    #[inline]
    pub fn denormalizers(&self) -> &ChainDenormalizer {
        &self.denormalizer
    }

    #[inline]
    pub fn encoders(&self) -> &ChainEncoder {
        &self.encoder
    }

    #[inline]
    pub fn decoders(&self) -> &ChainDecoder {
        &self.decoder
    }
}

// -----------------------------------------------------------------------------
// SerializerBuilder

/// Collects handlers and codecs in dispatch order.
#[derive(Default)]
pub struct SerializerBuilder {
    serializer: Serializer,
}

impl SerializerBuilder {
    pub fn with_normalizer(mut self, normalizer: impl Normalizer + 'static) -> Self {
        self.serializer.normalizer.push(Arc::new(normalizer));
        self
    }

    pub fn with_denormalizer(mut self, denormalizer: impl Denormalizer + 'static) -> Self {
        self.serializer.denormalizer.push(Arc::new(denormalizer));
        self
    }

    /// Registers one handler in both the normalizer and denormalizer chains.
    pub fn with_handler<H>(mut self, handler: H) -> Self
    where
        H: Normalizer + Denormalizer + 'static,
    {
        let handler = Arc::new(handler);
        self.serializer.normalizer.push(handler.clone());
        self.serializer.denormalizer.push(handler);
        self
    }

    pub fn with_encoder(mut self, encoder: impl Encoder + 'static) -> Self {
        self.serializer.encoder.push(Arc::new(encoder));
        self
    }

    pub fn with_decoder(mut self, decoder: impl Decoder + 'static) -> Self {
        self.serializer.decoder.push(Arc::new(decoder));
        self
    }

    /// Registers one codec as both encoder and decoder.
    pub fn with_codec<C>(mut self, codec: C) -> Self
    where
        C: Encoder + Decoder + 'static,
    {
        let codec = Arc::new(codec);
        self.serializer.encoder.push(codec.clone());
        self.serializer.decoder.push(codec);
        self
    }

    pub fn with_validator(mut self, validator: impl SerializerValidator + 'static) -> Self {
        self.serializer.validator = Some(Arc::new(validator));
        self
    }

    #[inline]
    pub fn build(self) -> Serializer {
        self.serializer
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use super::Serializer;
    use crate::codec::JsonCodec;
    use crate::context::{ContextBag, PathContext, SerializationContext};
    use crate::error::{Error, Result, ValidationError};
    use crate::handler::SerializerValidator;
    use crate::normalizer::BuiltinDenormalizer;
    use crate::shape::ClassRegistry;
    use crate::types::Type;
    use crate::value::Value;

    struct RejectNull;

    impl SerializerValidator for RejectNull {
        fn validate(&self, data: &Value, _: &Type, context: &ContextBag) -> Result<()> {
            if data.is_null() {
                return Err(ValidationError::required(&context.get::<PathContext>()).into());
            }
            Ok(())
        }
    }

    #[test]
    fn unsupported_formats_fail_up_front() {
        let serializer = Serializer::with_defaults(Arc::new(ClassRegistry::new()));

        let error = serializer
            .serialize(&Value::from(1), "yaml", &ContextBag::new())
            .unwrap_err();
        assert_eq!(error.to_string(), "Serialization for the format \"yaml\" is not supported");

        let error = serializer
            .deserialize(b"1", &Type::Int, "yaml", &ContextBag::new())
            .unwrap_err();
        assert!(matches!(error, Error::UnsupportedFormat { operation: "Deserialization", .. }));
    }

    #[test]
    fn validator_runs_unless_disabled() {
        let serializer = Serializer::builder()
            .with_denormalizer(BuiltinDenormalizer)
            .with_validator(RejectNull)
            .build();
        let ty = Type::nullable(Type::Int);

        let error = serializer
            .denormalize(&Value::Null, &Type::Null, None, &ContextBag::new())
            .unwrap_err();
        assert!(error.is_validation());

        let relaxed = ContextBag::new()
            .with(SerializationContext::default().with_validate_before_denormalization(false));
        let value = serializer.denormalize(&Value::Null, &Type::Null, None, &relaxed).unwrap();
        assert_eq!(value, Value::Null);
        assert!(!serializer.supports_denormalization(&Value::Null, &ty, None, &relaxed));
    }

    #[test]
    fn empty_serializer_passes_scalars_through() {
        let serializer = Serializer::builder().with_codec(JsonCodec).build();
        let context = ContextBag::new();

        assert_eq!(serializer.normalize(&Value::from("x"), None, &context).unwrap(), Value::from("x"));
        let error = serializer
            .denormalize(&Value::List(vec![]), &Type::Int, None, &context)
            .unwrap_err();
        assert!(matches!(error, Error::Denormalization { .. }));

        let bytes = serializer.serialize(&Value::from(2), "json", &context).unwrap();
        assert_eq!(bytes, b"2");
    }

    #[test]
    fn defaults_probe_by_type_and_data() {
        let serializer = Serializer::with_defaults(Arc::new(ClassRegistry::new()));
        let context = ContextBag::new();
        let list = Type::array_of(Type::Int);

        assert!(serializer.supports_denormalization(&Value::from(1), &list, None, &context));
        assert!(!serializer.supports_denormalization_data(&Value::from(1), &list, None, &context));
        assert!(serializer.supports_encoding("json", &context));
        #[cfg(feature = "ron")]
        assert!(serializer.supports_decoding("ron", &context));
    }
}
