use alloc::sync::Arc;

use crate::Serializer;
use crate::context::{ContextBag, PathContext};
use crate::error::{Error, Result};
use crate::handler::Normalizer;
use crate::value::Value;

/// Dispatches normalization to the first supporting [`Normalizer`].
///
/// Scalars nobody claims are returned unchanged.
#[derive(Clone, Default)]
pub struct ChainNormalizer {
    normalizers: Vec<Arc<dyn Normalizer>>,
}

impl ChainNormalizer {
    pub fn new(normalizers: Vec<Arc<dyn Normalizer>>) -> Self {
        Self { normalizers }
    }

    pub fn push(&mut self, normalizer: Arc<dyn Normalizer>) {
        self.normalizers.push(normalizer);
    }

    /// The handler `data` would be dispatched to.
    pub fn normalizer_for(
        &self,
        data: &Value,
        format: Option<&str>,
        context: &ContextBag,
    ) -> Option<&Arc<dyn Normalizer>> {
        self.normalizers
            .iter()
            .find(|normalizer| normalizer.supports_normalization(data, format, context))
    }

    pub fn normalize(
        &self,
        data: &Value,
        format: Option<&str>,
        context: &ContextBag,
        serializer: &Serializer,
    ) -> Result<Value> {
        if let Some(normalizer) = self.normalizer_for(data, format, context) {
            return normalizer.normalize(data, format, context, serializer);
        }
        if data.is_scalar() {
            return Ok(data.clone());
        }
        let path = context.get::<PathContext>();
        log::trace!("no normalizer for {} at [{path}]", data.type_name());
        Err(Error::normalization(&path))
    }

    pub fn supports_normalization(
        &self,
        data: &Value,
        format: Option<&str>,
        context: &ContextBag,
    ) -> bool {
        self.normalizer_for(data, format, context).is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.normalizers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.normalizers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use super::ChainNormalizer;
    use crate::Serializer;
    use crate::context::{ContextBag, PathContext};
    use crate::error::{Error, Result};
    use crate::handler::Normalizer;
    use crate::value::{Map, Value};

    /// Claims every list and replaces it with a fixed number.
    struct ListAs(i64);

    impl Normalizer for ListAs {
        fn normalize(&self, _: &Value, _: Option<&str>, _: &ContextBag, _: &Serializer) -> Result<Value> {
            Ok(Value::Int(self.0))
        }

        fn supports_normalization(&self, data: &Value, _: Option<&str>, _: &ContextBag) -> bool {
            matches!(data, Value::List(_))
        }
    }

    fn chain() -> ChainNormalizer {
        ChainNormalizer::new(vec![Arc::new(ListAs(1)), Arc::new(ListAs(2))])
    }

    #[test]
    fn first_registered_handler_wins() {
        let chain = chain();
        let context = ContextBag::new();
        let list = Value::List(vec![Value::from(9)]);

        assert_eq!(chain.len(), 2);
        assert!(chain.supports_normalization(&list, None, &context));
        let normalized = chain.normalize(&list, None, &context, &Serializer::default()).unwrap();
        assert_eq!(normalized, Value::Int(1));
    }

    #[test]
    fn unclaimed_scalars_pass_through() {
        let chain = chain();
        let context = ContextBag::new();
        for scalar in [Value::Null, Value::from(true), Value::from(1.5), Value::from("x")] {
            assert!(!chain.supports_normalization(&scalar, None, &context));
            let normalized = chain.normalize(&scalar, None, &context, &Serializer::default()).unwrap();
            assert_eq!(normalized, scalar);
        }
    }

    #[test]
    fn unclaimed_structures_fail_at_the_path() {
        let context = ContextBag::new().with(PathContext::new().add("items"));
        let error = chain()
            .normalize(&Value::Map(Map::new()), None, &context, &Serializer::default())
            .unwrap_err();
        let Error::Normalization { path } = error else {
            panic!("expected a normalization error");
        };
        assert_eq!(path, "items");

        let empty = ChainNormalizer::default();
        assert!(empty.is_empty());
        let error = empty
            .normalize(&Value::List(Vec::new()), None, &ContextBag::new(), &Serializer::default())
            .unwrap_err();
        assert!(matches!(error, Error::Normalization { .. }));
    }
}
