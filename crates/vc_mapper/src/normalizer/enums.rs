use alloc::sync::Arc;

use crate::Serializer;
use crate::context::{ContextBag, EnumContext, PathContext};
use crate::error::{Error, Result, ValidationError};
use crate::handler::{Denormalizer, Normalizer};
use crate::shape::{ClassRegistry, ClassShape, EnumCase};
use crate::types::Type;
use crate::value::{EnumBacking, EnumValue, Value};

/// Maps enum values to and from their backing scalar.
///
/// Incoming data is coerced towards the backing kind first: numeric strings
/// for int backed enums, integers for string backed ones. With
/// [`EnumContext::allow_invalid`] set, non-scalar data yields the configured
/// default and unknown values yield null instead of errors.
#[derive(Debug, Clone)]
pub struct EnumNormalizer {
    registry: Arc<ClassRegistry>,
}

impl EnumNormalizer {
    pub fn new(registry: Arc<ClassRegistry>) -> Self {
        Self { registry }
    }

    fn enum_shape(&self, ty: &Type) -> Option<&Arc<ClassShape>> {
        let shape = self.registry.get(ty.class_name()?.as_str())?;
        shape.is_enum().then_some(shape)
    }
}

fn coerce(data: &Value, first: &EnumBacking) -> Value {
    match (first, data) {
        (EnumBacking::Int(_), Value::String(text)) => match text.trim().parse::<i64>() {
            Ok(int) => Value::Int(int),
            Err(_) => match text.trim().parse::<f64>() {
                Ok(float) if float.is_finite() => Value::Int(float as i64),
                _ => data.clone(),
            },
        },
        (EnumBacking::Int(_), Value::Float(float)) if float.is_finite() => Value::Int(*float as i64),
        (EnumBacking::String(_), Value::Int(int)) => Value::String(int.to_string()),
        _ => data.clone(),
    }
}

fn find_case<'a>(cases: &'a [EnumCase], data: &Value) -> Option<&'a EnumCase> {
    cases.iter().find(|case| match (&case.backing, data) {
        (EnumBacking::Int(backing), Value::Int(int)) => backing == int,
        (EnumBacking::String(backing), Value::String(text)) => backing == text,
        _ => false,
    })
}

impl Normalizer for EnumNormalizer {
    fn normalize(
        &self,
        data: &Value,
        _: Option<&str>,
        _: &ContextBag,
        _: &Serializer,
    ) -> Result<Value> {
        match data {
            Value::Enum(value) => Ok(value.backing().to_value()),
            other => Err(Error::InvalidArgument(format!(
                "expected an enum value, actual: [{}]",
                other.type_name()
            ))),
        }
    }

    fn supports_normalization(&self, data: &Value, _: Option<&str>, _: &ContextBag) -> bool {
        matches!(data, Value::Enum(_))
    }
}

impl Denormalizer for EnumNormalizer {
    fn denormalize(
        &self,
        data: &Value,
        ty: &Type,
        _: Option<&str>,
        context: &ContextBag,
        _: &Serializer,
    ) -> Result<Value> {
        let Some(shape) = self.enum_shape(ty) else {
            return Err(Error::InvalidArgument(format!("[{ty}] is not an enum")));
        };
        let Some(first) = shape.cases().first() else {
            return Err(Error::InvalidArgument(format!("enum [{ty}] has no cases")));
        };

        let data = coerce(data, &first.backing);
        let to_value = |case: &EnumCase| {
            Value::Enum(EnumValue::new(shape.name(), case.name.clone(), case.backing.clone()))
        };

        let options = context.get::<EnumContext>();
        let scalar = matches!(data, Value::Int(_) | Value::String(_));
        if options.allow_invalid() {
            if !scalar {
                return Ok(options.default_value().clone());
            }
            return Ok(find_case(shape.cases(), &data).map_or(Value::Null, to_value));
        }

        let path = context.get::<PathContext>();
        if !scalar {
            return Err(ValidationError::incorrect_type(&path, "int|string", data.type_name()).into());
        }
        match find_case(shape.cases(), &data) {
            Some(case) => Ok(to_value(case)),
            None => Err(ValidationError::unexpected_value(
                &path,
                shape.cases().iter().map(|case| &case.backing),
            )
            .into()),
        }
    }

    fn supports_denormalization(
        &self,
        _: &Value,
        ty: &Type,
        _: Option<&str>,
        _: &ContextBag,
    ) -> bool {
        self.enum_shape(ty).is_some()
    }

    fn supports_denormalization_data(
        &self,
        data: &Value,
        _: &Type,
        _: Option<&str>,
        _: &ContextBag,
    ) -> bool {
        matches!(data, Value::Int(_) | Value::String(_))
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use crate::Serializer;
    use crate::context::{ContextBag, EnumContext, PathContext};
    use crate::error::ValidationRule;
    use crate::shape::{ClassRegistry, ClassShape};
    use crate::types::Type;
    use crate::value::{EnumValue, Value};

    fn serializer() -> Serializer {
        let registry = ClassRegistry::new()
            .with(ClassShape::new("Status").with_case("Active", 1).with_case("Blocked", 2))
            .with(ClassShape::new("Color").with_case("Red", "red").with_case("Ten", "10"));
        Serializer::with_defaults(Arc::new(registry))
    }

    fn denormalize(data: Value, ty: &str, context: &ContextBag) -> crate::error::Result<Value> {
        serializer().denormalize(&data, &Type::class(ty), None, context)
    }

    #[test]
    fn normalizes_to_backing() {
        let value = Value::Enum(EnumValue::new("Color", "Red", "red"));
        let normalized = serializer().normalize(&value, None, &ContextBag::new()).unwrap();
        assert_eq!(normalized, Value::from("red"));
    }

    #[test]
    fn coerces_towards_backing_kind() {
        let context = ContextBag::new();
        assert_eq!(
            denormalize(Value::from("2"), "Status", &context).unwrap(),
            Value::Enum(EnumValue::new("Status", "Blocked", 2))
        );
        assert_eq!(
            denormalize(Value::from(10), "Color", &context).unwrap(),
            Value::Enum(EnumValue::new("Color", "Ten", "10"))
        );
    }

    #[test]
    fn unknown_value_lists_backings() {
        let context = ContextBag::new().with(PathContext::new().add("status"));
        let error = denormalize(Value::from(7), "Status", &context).unwrap_err();
        let errors = error.validation_errors();
        assert_eq!(errors[0].rule(), ValidationRule::UnexpectedValue);
        assert_eq!(errors[0].field(), "status");
        assert_eq!(errors[0].message(), "Incorrect value. Allows one of: 1, 2");
    }

    #[test]
    fn non_scalar_is_incorrect_type() {
        let error = denormalize(Value::Bool(true), "Status", &ContextBag::new()).unwrap_err();
        assert_eq!(
            error.validation_errors()[0].message(),
            "Incorrect type. Expected: [int|string], actual: [bool]"
        );
    }

    #[test]
    fn allow_invalid_relaxes_errors() {
        let context = ContextBag::new().with(EnumContext::new(true, Value::from("fallback")));
        assert_eq!(denormalize(Value::from(7), "Status", &context).unwrap(), Value::Null);
        assert_eq!(
            denormalize(Value::Bool(true), "Status", &context).unwrap(),
            Value::from("fallback")
        );
    }
}
