use alloc::sync::Arc;

use crate::Serializer;
use crate::context::{ContextBag, PathContext};
use crate::error::{Error, Result};
use crate::handler::Denormalizer;
use crate::types::Type;
use crate::value::Value;

/// Dispatches denormalization to the first supporting [`Denormalizer`].
///
/// Scalars nobody claims are returned unchanged.
#[derive(Clone, Default)]
pub struct ChainDenormalizer {
    denormalizers: Vec<Arc<dyn Denormalizer>>,
}

impl ChainDenormalizer {
    pub fn new(denormalizers: Vec<Arc<dyn Denormalizer>>) -> Self {
        Self { denormalizers }
    }

    pub fn push(&mut self, denormalizer: Arc<dyn Denormalizer>) {
        self.denormalizers.push(denormalizer);
    }

    /// The handler a `ty` target would be dispatched to.
    pub fn denormalizer_for(
        &self,
        data: &Value,
        ty: &Type,
        format: Option<&str>,
        context: &ContextBag,
    ) -> Option<&Arc<dyn Denormalizer>> {
        self.denormalizers
            .iter()
            .find(|denormalizer| denormalizer.supports_denormalization(data, ty, format, context))
    }

    pub fn denormalize(
        &self,
        data: &Value,
        ty: &Type,
        format: Option<&str>,
        context: &ContextBag,
        serializer: &Serializer,
    ) -> Result<Value> {
        if let Some(denormalizer) = self.denormalizer_for(data, ty, format, context) {
            return denormalizer.denormalize(data, ty, format, context, serializer);
        }
        if data.is_scalar() {
            return Ok(data.clone());
        }
        let path = context.get::<PathContext>();
        log::trace!("no denormalizer for {ty} at [{path}]");
        Err(Error::denormalization(&path))
    }

    pub fn supports_denormalization(
        &self,
        data: &Value,
        ty: &Type,
        format: Option<&str>,
        context: &ContextBag,
    ) -> bool {
        self.denormalizer_for(data, ty, format, context).is_some()
    }

    /// Returns `true` if some handler accepts both the target type and the
    /// shape of `data`.
    pub fn supports_denormalization_data(
        &self,
        data: &Value,
        ty: &Type,
        format: Option<&str>,
        context: &ContextBag,
    ) -> bool {
        self.denormalizers.iter().any(|denormalizer| {
            denormalizer.supports_denormalization(data, ty, format, context)
                && denormalizer.supports_denormalization_data(data, ty, format, context)
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.denormalizers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.denormalizers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use super::ChainDenormalizer;
    use crate::Serializer;
    use crate::context::{ContextBag, PathContext};
    use crate::error::{Error, Result};
    use crate::handler::Denormalizer;
    use crate::types::Type;
    use crate::value::{Map, Value};

    /// Claims `array<int>` targets and answers with a fixed number.
    struct IntList {
        answer: i64,
        lists_only: bool,
    }

    impl Denormalizer for IntList {
        fn denormalize(
            &self,
            _: &Value,
            _: &Type,
            _: Option<&str>,
            _: &ContextBag,
            _: &Serializer,
        ) -> Result<Value> {
            Ok(Value::Int(self.answer))
        }

        fn supports_denormalization(&self, _: &Value, ty: &Type, _: Option<&str>, _: &ContextBag) -> bool {
            *ty == Type::array_of(Type::Int)
        }

        fn supports_denormalization_data(
            &self,
            data: &Value,
            _: &Type,
            _: Option<&str>,
            _: &ContextBag,
        ) -> bool {
            !self.lists_only || matches!(data, Value::List(_))
        }
    }

    fn chain() -> ChainDenormalizer {
        ChainDenormalizer::new(vec![
            Arc::new(IntList { answer: 1, lists_only: true }),
            Arc::new(IntList { answer: 2, lists_only: false }),
        ])
    }

    #[test]
    fn first_registered_handler_wins() {
        let ty = Type::array_of(Type::Int);
        let context = ContextBag::new();

        let value = chain()
            .denormalize(&Value::Map(Map::new()), &ty, None, &context, &Serializer::default())
            .unwrap();
        assert_eq!(value, Value::Int(1));
    }

    #[test]
    fn data_probe_checks_the_shape_too() {
        let ty = Type::array_of(Type::Int);
        let context = ContextBag::new();
        let strict = ChainDenormalizer::new(vec![Arc::new(IntList { answer: 1, lists_only: true })]);

        assert!(strict.supports_denormalization(&Value::from(3), &ty, None, &context));
        assert!(!strict.supports_denormalization_data(&Value::from(3), &ty, None, &context));
        assert!(strict.supports_denormalization_data(&Value::List(Vec::new()), &ty, None, &context));
        assert!(chain().supports_denormalization_data(&Value::from(3), &ty, None, &context));
    }

    #[test]
    fn unclaimed_scalars_pass_through() {
        let context = ContextBag::new();
        for scalar in [Value::Null, Value::from(false), Value::from(7), Value::from("x")] {
            let value = chain()
                .denormalize(&scalar, &Type::String, None, &context, &Serializer::default())
                .unwrap();
            assert_eq!(value, scalar);
        }
    }

    #[test]
    fn unclaimed_structures_fail_at_the_path() {
        let context = ContextBag::new().with(PathContext::new().add("lines").item(0));
        let error = chain()
            .denormalize(&Value::List(Vec::new()), &Type::String, None, &context, &Serializer::default())
            .unwrap_err();
        let Error::Denormalization { path } = error else {
            panic!("expected a denormalization error");
        };
        assert_eq!(path, "lines[0]");
    }
}
