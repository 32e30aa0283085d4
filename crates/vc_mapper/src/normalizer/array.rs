use crate::Serializer;
use crate::context::{ContextBag, PathContext, SerializationContext, TagsContext};
use crate::error::{Error, ErrorCollector, Result, ValidationError};
use crate::handler::{Denormalizer, Normalizer};
use crate::types::Type;
use crate::value::{Map, Value};

/// Maps lists and maps item by item.
///
/// List items are addressed as `path[i]`, map entries as `path.key`. Item
/// errors are collected the same way object fields are.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayNormalizer;

impl Normalizer for ArrayNormalizer {
    fn normalize(
        &self,
        data: &Value,
        format: Option<&str>,
        context: &ContextBag,
        serializer: &Serializer,
    ) -> Result<Value> {
        let path = context.get::<PathContext>();
        let mut errors = ErrorCollector::new(context.get::<SerializationContext>().stop_on_first_error());

        let value = match data {
            Value::List(items) => {
                let mut result = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let item_context = context.with(path.item(index));
                    match serializer.normalize(item, format, &item_context) {
                        Ok(value) => result.push(value),
                        Err(error) => errors.absorb(error)?,
                    }
                }
                Value::List(result)
            }
            Value::Map(map) => {
                let mut result = Map::with_capacity(map.len());
                for (key, item) in map {
                    let item_context = context.with(path.add(key));
                    match serializer.normalize(item, format, &item_context) {
                        Ok(value) => {
                            result.insert(key.clone(), value);
                        }
                        Err(error) => errors.absorb(error)?,
                    }
                }
                Value::Map(result)
            }
            other => {
                return Err(Error::InvalidArgument(format!(
                    "expected a list or a map, actual: [{}]",
                    other.type_name()
                )));
            }
        };

        errors.finish()?;
        Ok(value)
    }

    fn supports_normalization(&self, data: &Value, _: Option<&str>, _: &ContextBag) -> bool {
        matches!(data, Value::List(_) | Value::Map(_))
    }
}

impl Denormalizer for ArrayNormalizer {
    fn denormalize(
        &self,
        data: &Value,
        ty: &Type,
        format: Option<&str>,
        context: &ContextBag,
        serializer: &Serializer,
    ) -> Result<Value> {
        let Type::Array(inner) = ty else {
            return Err(Error::InvalidArgument(format!(
                "the target must be an array type, actual: [{ty}]"
            )));
        };
        let path = context.get::<PathContext>();
        let mut errors = ErrorCollector::new(context.get::<SerializationContext>().stop_on_first_error());

        // Item contexts must not inherit the tags of the field holding the array.
        let base = context.with(TagsContext::default());

        let value = match data {
            Value::List(items) => {
                let mut result = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let item_context = base.with(path.item(index));
                    match serializer.denormalize(item, inner, format, &item_context) {
                        Ok(value) => result.push(value),
                        Err(error) => errors.absorb(error)?,
                    }
                }
                Value::List(result)
            }
            Value::Map(_) | Value::Object(_) => {
                let map = data.to_map().unwrap_or_default();
                let mut result = Map::with_capacity(map.len());
                for (key, item) in &map {
                    let item_context = base.with(path.add(key));
                    match serializer.denormalize(item, inner, format, &item_context) {
                        Ok(value) => {
                            result.insert(key.clone(), value);
                        }
                        Err(error) => errors.absorb(error)?,
                    }
                }
                Value::Map(result)
            }
            other => {
                return Err(ValidationError::incorrect_type(&path, "array|object", other.type_name()).into());
            }
        };

        errors.finish()?;
        Ok(value)
    }

    fn supports_denormalization(
        &self,
        _: &Value,
        ty: &Type,
        _: Option<&str>,
        _: &ContextBag,
    ) -> bool {
        matches!(ty, Type::Array(_))
    }

    fn supports_denormalization_data(
        &self,
        data: &Value,
        _: &Type,
        _: Option<&str>,
        _: &ContextBag,
    ) -> bool {
        matches!(data, Value::List(_) | Value::Map(_) | Value::Object(_))
    }
}

#[cfg(test)]
mod tests {
    use crate::Serializer;
    use crate::context::{ContextBag, SerializationContext};
    use crate::error::Error;
    use crate::shape::ClassRegistry;
    use crate::types::Type;
    use crate::value::Value;

    fn json(text: &str) -> Value {
        serde_json::from_str(text).unwrap()
    }

    fn serializer() -> Serializer {
        Serializer::with_defaults(ClassRegistry::new().into())
    }

    #[test]
    fn denormalizes_items() {
        let value = serializer()
            .denormalize(&json("[1, 2]"), &Type::array_of(Type::Float), None, &ContextBag::new())
            .unwrap();
        assert_eq!(value, Value::List(vec![Value::Float(1.0), Value::Float(2.0)]));
    }

    #[test]
    fn item_errors_are_collected_with_paths() {
        let error = serializer()
            .denormalize(
                &json(r#"[1, "a", true]"#),
                &Type::array_of(Type::Int),
                None,
                &ContextBag::new(),
            )
            .unwrap_err();
        let fields: Vec<_> = error.validation_errors().into_iter().map(|e| e.field()).collect();
        assert_eq!(fields, ["[1]", "[2]"]);
    }

    #[test]
    fn stop_on_first_reports_one_item() {
        let context = ContextBag::new().with(SerializationContext::default().with_stop_on_first_error(true));
        let error = serializer()
            .denormalize(&json(r#"{"a": "x", "b": "y"}"#), &Type::array_of(Type::Int), None, &context)
            .unwrap_err();
        let Error::Validation(error) = error else {
            panic!("expected a single validation error");
        };
        assert_eq!(error.field(), "a");
    }

    #[test]
    fn scalar_data_is_incorrect_type() {
        let error = serializer()
            .denormalize(&Value::from(5), &Type::array_of(Type::Int), None, &ContextBag::new())
            .unwrap_err();
        assert_eq!(
            error.validation_errors()[0].message(),
            "Incorrect type. Expected: [array|object], actual: [int]"
        );
    }
}
