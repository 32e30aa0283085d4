//! Polymorphic type selection.
//!
//! On the way in, [`DiscriminatorResolver`] narrows an abstract, interface or
//! union target down to one concrete named [`Type`]. On the way out,
//! [`DiscriminatorEnricher`] stamps the tag field a later resolution reads.
//!
//! Both are driven by the [`Discriminator`](crate::tags::Discriminator) and
//! [`DiscriminatorMap`](crate::tags::DiscriminatorMap) tags, found on the field
//! first and on the class hierarchy second.

mod enricher;
mod resolver;

pub use enricher::DiscriminatorEnricher;
pub use resolver::DiscriminatorResolver;

use core::any::Any;

use crate::Serializer;
use crate::context::PathContext;
use crate::error::Result;
use crate::tags::Tags;
use crate::types::Type;
use crate::value::{Map, Object, Value};

/// Picks the concrete type a raw value denormalizes into.
pub trait DiscriminatorResolve: Any + Send + Sync {
    /// Returns a named type (never a union or intersection).
    ///
    /// Failures are validation errors reported at `path`.
    fn resolve(
        &self,
        target: &Type,
        value: &Value,
        serializer: &Serializer,
        tags: &Tags,
        path: &PathContext,
    ) -> Result<Type>;
}

/// Rewrites the normalized form of an object.
pub trait DiscriminatorEnrich: Any + Send + Sync {
    fn enrich(&self, object: &Object, normalized: Map, tags: &Tags) -> Map;
}
