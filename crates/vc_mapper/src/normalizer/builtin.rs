use crate::Serializer;
use crate::context::{ContextBag, PathContext};
use crate::error::{Error, Result, ValidationError};
use crate::handler::Denormalizer;
use crate::types::Type;
use crate::value::{Object, Value};

/// Denormalizes scalar, `object`, `mixed` and `null` targets.
///
/// | target   | accepted data            |
/// |----------|--------------------------|
/// | `int`    | int                      |
/// | `float`  | float, int               |
/// | `bool`   | bool, `0`, `1`           |
/// | `string` | string, int, float       |
/// | `object` | map, list, object        |
/// | `null`   | null                     |
/// | `mixed`  | anything                 |
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinDenormalizer;

fn accepts(ty: &Type, data: &Value) -> bool {
    match ty {
        Type::Mixed => true,
        Type::Null => data.is_null(),
        Type::Int => matches!(data, Value::Int(_)),
        Type::Float => matches!(data, Value::Float(_) | Value::Int(_)),
        Type::Bool => matches!(data, Value::Bool(_) | Value::Int(0 | 1)),
        Type::String => matches!(data, Value::String(_) | Value::Int(_) | Value::Float(_)),
        Type::Object => matches!(data, Value::Map(_) | Value::List(_) | Value::Object(_)),
        _ => false,
    }
}

impl Denormalizer for BuiltinDenormalizer {
    fn denormalize(
        &self,
        data: &Value,
        ty: &Type,
        _: Option<&str>,
        context: &ContextBag,
        _: &Serializer,
    ) -> Result<Value> {
        if !matches!(
            ty,
            Type::Mixed | Type::Null | Type::Int | Type::Float | Type::Bool | Type::String | Type::Object
        ) {
            return Err(Error::InvalidArgument(format!(
                "the target must be a builtin type, actual: [{ty}]"
            )));
        }
        if !accepts(ty, data) {
            let path = context.get::<PathContext>();
            return Err(ValidationError::incorrect_type(&path, ty, data.type_name()).into());
        }

        let value = match (ty, data) {
            (Type::Float, Value::Int(int)) => Value::Float(*int as f64),
            (Type::Bool, Value::Int(int)) => Value::Bool(*int == 1),
            (Type::String, Value::Int(int)) => Value::String(int.to_string()),
            (Type::String, Value::Float(float)) => Value::String(float.to_string()),
            (Type::Object, Value::Object(object)) => Value::Object(object.clone()),
            (Type::Object, other) => Value::Object(Object::anonymous(other.to_map().unwrap_or_default())),
            (_, other) => other.clone(),
        };
        Ok(value)
    }

    fn supports_denormalization(
        &self,
        _: &Value,
        ty: &Type,
        _: Option<&str>,
        _: &ContextBag,
    ) -> bool {
        matches!(
            ty,
            Type::Mixed | Type::Null | Type::Int | Type::Float | Type::Bool | Type::String | Type::Object
        )
    }

    fn supports_denormalization_data(
        &self,
        data: &Value,
        ty: &Type,
        _: Option<&str>,
        _: &ContextBag,
    ) -> bool {
        accepts(ty, data)
    }
}

#[cfg(test)]
mod tests {
    use super::BuiltinDenormalizer;
    use crate::Serializer;
    use crate::context::{ContextBag, PathContext};
    use crate::handler::Denormalizer;
    use crate::shape::ClassRegistry;
    use crate::types::Type;
    use crate::value::{Map, Object, Value};

    fn denormalize(data: Value, ty: Type) -> crate::error::Result<Value> {
        let serializer = Serializer::with_defaults(ClassRegistry::new().into());
        let context = ContextBag::new().with(PathContext::new().add("field"));
        BuiltinDenormalizer.denormalize(&data, &ty, None, &context, &serializer)
    }

    #[test]
    fn casts() {
        assert_eq!(denormalize(Value::from(3), Type::Float).unwrap(), Value::Float(3.0));
        assert_eq!(denormalize(Value::from(1), Type::Bool).unwrap(), Value::Bool(true));
        assert_eq!(denormalize(Value::from(12.5), Type::String).unwrap(), Value::from("12.5"));
        assert_eq!(denormalize(Value::from("x"), Type::Mixed).unwrap(), Value::from("x"));
    }

    #[test]
    fn maps_become_anonymous_objects() {
        let mut map = Map::new();
        map.insert("a".into(), Value::from(1));
        let value = denormalize(Value::Map(map.clone()), Type::Object).unwrap();
        assert_eq!(value, Value::Object(Object::anonymous(map)));
    }

    #[test]
    fn rejects_lossy_data() {
        for (data, ty) in [
            (Value::from(1.5), Type::Int),
            (Value::from(2), Type::Bool),
            (Value::from(true), Type::String),
            (Value::from("1"), Type::Int),
        ] {
            let error = denormalize(data, ty).unwrap_err();
            assert_eq!(error.validation_errors()[0].field(), "field");
        }
    }
}
