use alloc::sync::Arc;

use crate::Serializer;
use crate::context::{ContextBag, PathContext, TagsContext};
use crate::discriminator::DiscriminatorResolve;
use crate::error::{Error, Result};
use crate::handler::Denormalizer;
use crate::types::Type;
use crate::value::Value;

/// Narrows union targets to one member, then dispatches again.
#[derive(Clone)]
pub struct UnionDenormalizer {
    resolver: Arc<dyn DiscriminatorResolve>,
}

impl UnionDenormalizer {
    pub fn new(resolver: Arc<dyn DiscriminatorResolve>) -> Self {
        Self { resolver }
    }
}

impl Denormalizer for UnionDenormalizer {
    fn denormalize(
        &self,
        data: &Value,
        ty: &Type,
        format: Option<&str>,
        context: &ContextBag,
        serializer: &Serializer,
    ) -> Result<Value> {
        if !matches!(ty, Type::Union(_)) {
            return Err(Error::InvalidArgument(format!(
                "the target must be a union type, actual: [{ty}]"
            )));
        }
        let tags = context.get::<TagsContext>();
        let path = context.get::<PathContext>();
        let resolved = self.resolver.resolve(ty, data, serializer, tags.tags(), &path)?;
        serializer.denormalize(data, &resolved, format, context)
    }

    fn supports_denormalization(
        &self,
        _: &Value,
        ty: &Type,
        _: Option<&str>,
        _: &ContextBag,
    ) -> bool {
        matches!(ty, Type::Union(_))
    }
}
