//! Immutable, type-keyed state threaded through every conversion.
//!
//! ## Menu
//!
//! - [`ContextBag`]: holds at most one value per [`Context`] type.
//! - Global knobs: [`SerializationContext`].
//! - Traversal bookkeeping: [`PathContext`], [`ReferencesContext`], [`DepthContext`].
//! - Per-field state: [`ArgumentContext`], [`TagsContext`], [`EnumContext`].
//!
//! Every operation returns a new bag. Bags are cheap to clone, so each
//! recursive call can overlay its own values without affecting its siblings.

mod argument;
mod enums;
mod path;
mod references;
mod serialization;
mod tags;

pub use argument::ArgumentContext;
pub use enums::EnumContext;
pub use path::PathContext;
pub use references::{DepthContext, ReferencesContext};
pub use serialization::SerializationContext;
pub use tags::TagsContext;

use alloc::borrow::Cow;
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use vc_utils::TypeIdMap;

// -----------------------------------------------------------------------------
// Context

/// A value that can live in a [`ContextBag`].
///
/// `Default` supplies the value observed when the bag has none.
pub trait Context: Any + Clone + Default + Send + Sync + fmt::Debug {}

trait StoredContext: Any + Send + Sync + fmt::Debug {}

impl<T: Context> StoredContext for T {}

// -----------------------------------------------------------------------------
// ContextBag

/// A persistent map from context type to context value.
///
/// # Examples
///
/// ```
/// use vc_mapper::context::{ContextBag, DepthContext, PathContext};
///
/// let root = ContextBag::new();
/// let child = root.with(PathContext::new().add("user"));
///
/// assert_eq!(child.get::<PathContext>().to_string(), "user");
/// assert_eq!(root.get::<PathContext>().to_string(), "");
/// // Missing kinds read as their default.
/// assert_eq!(child.get::<DepthContext>().depth(), 0);
/// ```
#[derive(Clone, Default)]
pub struct ContextBag {
    contexts: TypeIdMap<Arc<dyn StoredContext>>,
}

impl ContextBag {
    /// Creates an empty bag.
    #[inline]
    pub const fn new() -> Self {
        Self {
            contexts: TypeIdMap::new(),
        }
    }

    /// Returns the stored `T`, or `T::default()` when absent.
    pub fn get<T: Context>(&self) -> Cow<'_, T> {
        match self.find::<T>() {
            Some(context) => Cow::Borrowed(context),
            None => Cow::Owned(T::default()),
        }
    }

    /// Returns the stored `T` without defaulting.
    pub fn find<T: Context>(&self) -> Option<&T> {
        self.contexts
            .get_type::<T>()
            .and_then(|context| (&**context as &dyn Any).downcast_ref::<T>())
    }

    #[inline]
    pub fn contains<T: Context>(&self) -> bool {
        self.contexts.contains_type::<T>()
    }

    /// Returns a new bag with `context` replacing any `T` already present.
    pub fn with<T: Context>(&self, context: T) -> ContextBag {
        let mut contexts = self.contexts.clone();
        contexts.insert_type::<T>(Arc::new(context));
        ContextBag { contexts }
    }

    /// Returns a new bag with the current `T` (or its default) replaced by
    /// `f(current)`.
    pub fn update<T: Context>(&self, f: impl FnOnce(T) -> T) -> ContextBag {
        let current = self.get::<T>().into_owned();
        self.with(f(current))
    }

    /// Returns a new bag holding both sets of contexts; `other` wins on
    /// collisions.
    pub fn merge(&self, other: &ContextBag) -> ContextBag {
        let mut contexts = self.contexts.clone();
        contexts.overlay(&other.contexts);
        ContextBag { contexts }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}

impl fmt::Debug for ContextBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.contexts.values()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{ContextBag, DepthContext, PathContext, SerializationContext};

    #[test]
    fn with_never_mutates_the_receiver() {
        let base = ContextBag::new().with(DepthContext::default().increase());
        let next = base.with(DepthContext::default().increase().increase());
        assert_eq!(base.get::<DepthContext>().depth(), 1);
        assert_eq!(next.get::<DepthContext>().depth(), 2);
    }

    #[test]
    fn repeated_reads_agree() {
        let bag = ContextBag::new();
        assert_eq!(
            *bag.get::<SerializationContext>(),
            *bag.get::<SerializationContext>()
        );
        assert!(!bag.contains::<SerializationContext>());
    }

    #[test]
    fn merge_prefers_other() {
        let a = ContextBag::new()
            .with(PathContext::new().add("a"))
            .with(DepthContext::default().increase());
        let b = ContextBag::new().with(PathContext::new().add("b"));

        let merged = a.merge(&b);
        assert_eq!(merged.get::<PathContext>().to_string(), "b");
        assert_eq!(merged.get::<DepthContext>().depth(), 1);
        assert_eq!(a.get::<PathContext>().to_string(), "a");
    }

    #[test]
    fn update_starts_from_default() {
        let bag = ContextBag::new().update::<DepthContext>(|depth| depth.increase());
        assert_eq!(bag.get::<DepthContext>().depth(), 1);
    }
}
