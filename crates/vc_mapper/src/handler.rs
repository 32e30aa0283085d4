//! Handler traits plugged into a [`Serializer`].
//!
//! Handlers never call each other directly. They receive the [`Serializer`]
//! that dispatched them and go back through it for nested values, so the
//! whole chain (and its ordering) applies at every level.

use crate::Serializer;
use crate::context::ContextBag;
use crate::error::Result;
use crate::types::Type;
use crate::value::Value;

/// Turns a value into a generic structure.
pub trait Normalizer: Send + Sync {
    fn normalize(
        &self,
        data: &Value,
        format: Option<&str>,
        context: &ContextBag,
        serializer: &Serializer,
    ) -> Result<Value>;

    /// Pure predicate deciding whether this handler takes `data`.
    fn supports_normalization(&self, data: &Value, format: Option<&str>, context: &ContextBag)
    -> bool;
}

/// Builds a value of a target type from a generic structure.
pub trait Denormalizer: Send + Sync {
    fn denormalize(
        &self,
        data: &Value,
        ty: &Type,
        format: Option<&str>,
        context: &ContextBag,
        serializer: &Serializer,
    ) -> Result<Value>;

    /// Pure predicate on the target type.
    fn supports_denormalization(
        &self,
        data: &Value,
        ty: &Type,
        format: Option<&str>,
        context: &ContextBag,
    ) -> bool;

    /// Pure predicate on the shape of `data`, checked after
    /// [`supports_denormalization`](Denormalizer::supports_denormalization).
    fn supports_denormalization_data(
        &self,
        data: &Value,
        ty: &Type,
        format: Option<&str>,
        context: &ContextBag,
    ) -> bool {
        let _ = (data, ty, format, context);
        true
    }
}

/// Writes a generic structure as bytes.
pub trait Encoder: Send + Sync {
    fn encode(&self, data: &Value, format: &str, context: &ContextBag) -> Result<Vec<u8>>;

    fn supports_encoding(&self, format: &str, context: &ContextBag) -> bool;
}

/// Reads bytes into a generic structure.
pub trait Decoder: Send + Sync {
    fn decode(&self, data: &[u8], format: &str, context: &ContextBag) -> Result<Value>;

    fn supports_decoding(&self, format: &str, context: &ContextBag) -> bool;
}

/// Checks raw data before it is denormalized.
///
/// Runs at every [`Serializer::denormalize`] call while
/// [`SerializationContext::validate_before_denormalization`](crate::context::SerializationContext::validate_before_denormalization)
/// is set.
pub trait SerializerValidator: Send + Sync {
    fn validate(&self, data: &Value, ty: &Type, context: &ContextBag) -> Result<()>;
}
