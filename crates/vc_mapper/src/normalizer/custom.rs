use alloc::sync::Arc;
use core::fmt;

use crate::Serializer;
use crate::context::ContextBag;
use crate::error::{Error, Result};
use crate::handler::{Denormalizer, Normalizer};
use crate::shape::{ClassRegistry, ClassShape};
use crate::types::{ClassName, Type};
use crate::value::{Object, Value};

/// Hand-written mapping for one class.
///
/// Attached with [`ClassShape::with_custom`]. Both directions receive the
/// [`Serializer`] so nested values still go through the handler chain.
pub trait CustomMapping: fmt::Debug + Send + Sync {
    fn normalize(
        &self,
        object: &Object,
        serializer: &Serializer,
        format: Option<&str>,
        context: &ContextBag,
    ) -> Result<Value>;

    fn denormalize(
        &self,
        data: &Value,
        serializer: &Serializer,
        format: Option<&str>,
        context: &ContextBag,
    ) -> Result<Object>;
}

/// Runs the [`CustomMapping`] of classes that carry one.
#[derive(Debug, Clone)]
pub struct CustomNormalizer {
    registry: Arc<ClassRegistry>,
}

impl CustomNormalizer {
    pub fn new(registry: Arc<ClassRegistry>) -> Self {
        Self { registry }
    }

    fn custom_shape(&self, class: Option<&ClassName>) -> Option<&Arc<ClassShape>> {
        let shape = self.registry.get(class?.as_str())?;
        shape.custom().is_some().then_some(shape)
    }
}

impl Normalizer for CustomNormalizer {
    fn normalize(
        &self,
        data: &Value,
        format: Option<&str>,
        context: &ContextBag,
        serializer: &Serializer,
    ) -> Result<Value> {
        let object = data.as_object();
        let custom = object
            .and_then(|object| self.custom_shape(object.class()))
            .and_then(|shape| shape.custom());
        match (object, custom) {
            (Some(object), Some(custom)) => custom.normalize(object, serializer, format, context),
            _ => Err(Error::InvalidArgument(format!(
                "[{}] has no custom mapping",
                data.type_name()
            ))),
        }
    }

    fn supports_normalization(&self, data: &Value, _: Option<&str>, _: &ContextBag) -> bool {
        data.as_object()
            .is_some_and(|object| self.custom_shape(object.class()).is_some())
    }
}

impl Denormalizer for CustomNormalizer {
    fn denormalize(
        &self,
        data: &Value,
        ty: &Type,
        format: Option<&str>,
        context: &ContextBag,
        serializer: &Serializer,
    ) -> Result<Value> {
        let Some(custom) = self.custom_shape(ty.class_name()).and_then(|shape| shape.custom()) else {
            return Err(Error::InvalidArgument(format!("[{ty}] has no custom mapping")));
        };
        custom
            .denormalize(data, serializer, format, context)
            .map(Value::Object)
    }

    fn supports_denormalization(
        &self,
        _: &Value,
        ty: &Type,
        _: Option<&str>,
        _: &ContextBag,
    ) -> bool {
        self.custom_shape(ty.class_name()).is_some()
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use super::CustomMapping;
    use crate::Serializer;
    use crate::context::{ContextBag, PathContext};
    use crate::error::{Result, ValidationError};
    use crate::shape::{ClassRegistry, ClassShape};
    use crate::types::Type;
    use crate::value::{Object, Value};

    /// Stores a point as `"x,y"`.
    #[derive(Debug)]
    struct PointAsString;

    impl CustomMapping for PointAsString {
        fn normalize(
            &self,
            object: &Object,
            _: &Serializer,
            _: Option<&str>,
            _: &ContextBag,
        ) -> Result<Value> {
            let x = object.get("x").unwrap_or_default();
            let y = object.get("y").unwrap_or_default();
            let (Value::Int(x), Value::Int(y)) = (x, y) else {
                return Ok(Value::Null);
            };
            Ok(Value::from(format!("{x},{y}")))
        }

        fn denormalize(
            &self,
            data: &Value,
            _: &Serializer,
            _: Option<&str>,
            context: &ContextBag,
        ) -> Result<Object> {
            let parsed = data.as_str().and_then(|text| {
                let (x, y) = text.split_once(',')?;
                Some((x.parse::<i64>().ok()?, y.parse::<i64>().ok()?))
            });
            let Some((x, y)) = parsed else {
                let path = context.get::<PathContext>();
                return Err(ValidationError::unexpected_format(&path, "x,y").into());
            };
            Ok(Object::new("Point").with("x", x).with("y", y))
        }
    }

    fn serializer() -> Serializer {
        let registry = ClassRegistry::new().with(ClassShape::new("Point").with_custom(PointAsString));
        Serializer::with_defaults(Arc::new(registry))
    }

    #[test]
    fn normalizes_through_the_hook() {
        let point = Value::Object(Object::new("Point").with("x", 1).with("y", 2));
        let normalized = serializer().normalize(&point, None, &ContextBag::new()).unwrap();
        assert_eq!(normalized, Value::from("1,2"));
    }

    #[test]
    fn denormalizes_through_the_hook() {
        let value = serializer()
            .denormalize(&Value::from("3,4"), &Type::class("Point"), None, &ContextBag::new())
            .unwrap();
        assert_eq!(value, Value::Object(Object::new("Point").with("x", 3).with("y", 4)));
    }

    #[test]
    fn hook_errors_propagate() {
        let error = serializer()
            .denormalize(&Value::from("oops"), &Type::class("Point"), None, &ContextBag::new())
            .unwrap_err();
        assert_eq!(error.validation_errors()[0].message(), "Incorrect value format. Expected: x,y");
    }
}
