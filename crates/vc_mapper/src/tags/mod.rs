//! Metadata tags attached to classes, parameters and properties.
//!
//! A tag is a pure function over the [`ContextBag`] of the field it is
//! attached to. Field contexts are computed by folding the field's tags, left
//! to right, over a fresh context. Some tags (like [`DiscriminatorMap`]) leave
//! the context untouched and are only looked up by type. Composite tags like
//! [`NormalizationTags`] and [`GroupTags`] apply nested tags conditionally.

mod composite;
mod discriminator;
mod field;
mod xml;

pub use composite::{DenormalizationTags, GroupTags, NormalizationTags};
pub use discriminator::{Discriminator, DiscriminatorMap};
pub use field::{
    EnumOptions, Groups, Ignore, IgnoreIfEmpty, IgnoreIfNull, MutateToList, SerializeTo,
    SerializedName, SerializedPath,
};
pub use xml::{XmlArray, XmlAttribute, XmlValue};

use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use crate::context::ContextBag;

// -----------------------------------------------------------------------------
// Operation

/// Direction of the conversion a tag is applied for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Normalize,
    Denormalize,
}

// -----------------------------------------------------------------------------
// Tag

/// A metadata tag.
pub trait Tag: Any + Send + Sync + fmt::Debug {
    /// Returns the context updated by this tag.
    fn apply(&self, context: ContextBag, operation: Operation) -> ContextBag {
        let _ = operation;
        context
    }
}

// -----------------------------------------------------------------------------
// Tags

/// An ordered list of tags.
///
/// # Examples
///
/// ```
/// use vc_mapper::context::{ArgumentContext, ContextBag};
/// use vc_mapper::tags::{IgnoreIfNull, Operation, SerializedName, Tags};
///
/// let tags = Tags::new().with(SerializedName::new("user_id")).with(IgnoreIfNull);
/// let context = ContextBag::new().with(ArgumentContext::new("userId"));
///
/// let context = tags.apply(context, Operation::Normalize);
/// let argument = context.get::<ArgumentContext>();
/// assert_eq!(argument.normalized_path(), ["user_id"]);
/// assert!(argument.ignore_if_null());
/// ```
#[derive(Clone, Default)]
pub struct Tags(Vec<Arc<dyn Tag>>);

impl Tags {
    #[inline]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn with(mut self, tag: impl Tag) -> Self {
        self.push(tag);
        self
    }

    pub fn push(&mut self, tag: impl Tag) {
        self.0.push(Arc::new(tag));
    }

    pub fn push_shared(&mut self, tag: Arc<dyn Tag>) {
        self.0.push(tag);
    }

    /// Returns the first tag of type `T`.
    pub fn first<T: Tag>(&self) -> Option<&T> {
        self.0
            .iter()
            .find_map(|tag| (&**tag as &dyn Any).downcast_ref::<T>())
    }

    #[inline]
    pub fn contains<T: Tag>(&self) -> bool {
        self.first::<T>().is_some()
    }

    /// Returns `self` followed by `other`.
    pub fn merge(&self, other: &Tags) -> Tags {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        let mut merged = Vec::with_capacity(self.len() + other.len());
        merged.extend(self.0.iter().cloned());
        merged.extend(other.0.iter().cloned());
        Tags(merged)
    }

    /// Applies every tag in order.
    pub fn apply(&self, context: ContextBag, operation: Operation) -> ContextBag {
        self.0
            .iter()
            .fold(context, |context, tag| tag.apply(context, operation))
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &dyn Tag> {
        self.0.iter().map(|tag| &**tag)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}
