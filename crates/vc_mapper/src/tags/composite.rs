use crate::context::{ContextBag, SerializationContext};
use crate::tags::{Operation, Tag, Tags};

// -----------------------------------------------------------------------------
// NormalizationTags / DenormalizationTags

/// Tags applied only while normalizing.
///
/// # Examples
///
/// ```
/// use vc_mapper::context::{ArgumentContext, ContextBag};
/// use vc_mapper::tags::{NormalizationTags, Operation, SerializedName, Tag};
///
/// let tag = NormalizationTags::new().with(SerializedName::new("out"));
/// let context = ContextBag::new().with(ArgumentContext::new("value"));
///
/// let normalize = tag.apply(context.clone(), Operation::Normalize);
/// assert_eq!(normalize.get::<ArgumentContext>().normalized_path(), ["out"]);
///
/// let denormalize = tag.apply(context, Operation::Denormalize);
/// assert_eq!(denormalize.get::<ArgumentContext>().normalized_path(), ["value"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NormalizationTags(Tags);

/// Tags applied only while denormalizing.
#[derive(Debug, Clone, Default)]
pub struct DenormalizationTags(Tags);

macro_rules! impl_operation_tags {
    ($name:ident, $operation:expr) => {
        impl $name {
            #[inline]
            pub const fn new() -> Self {
                Self(Tags::new())
            }

            pub fn with(mut self, tag: impl Tag) -> Self {
                self.0.push(tag);
                self
            }

            #[inline]
            pub fn tags(&self) -> &Tags {
                &self.0
            }
        }

        impl Tag for $name {
            fn apply(&self, context: ContextBag, operation: Operation) -> ContextBag {
                if operation != $operation {
                    return context;
                }
                self.0.apply(context, operation)
            }
        }
    };
}

impl_operation_tags!(NormalizationTags, Operation::Normalize);
impl_operation_tags!(DenormalizationTags, Operation::Denormalize);

// -----------------------------------------------------------------------------
// GroupTags

/// Tags applied only while the [`SerializationContext`] selects `group`.
///
/// [`GroupTags::ungrouped`] applies its tags when no group is active.
#[derive(Debug, Clone, Default)]
pub struct GroupTags {
    group: Option<String>,
    tags: Tags,
}

impl GroupTags {
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: Some(group.into()),
            tags: Tags::new(),
        }
    }

    pub const fn ungrouped() -> Self {
        Self {
            group: None,
            tags: Tags::new(),
        }
    }

    pub fn with(mut self, tag: impl Tag) -> Self {
        self.tags.push(tag);
        self
    }

    #[inline]
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    #[inline]
    pub fn tags(&self) -> &Tags {
        &self.tags
    }
}

impl Tag for GroupTags {
    fn apply(&self, context: ContextBag, operation: Operation) -> ContextBag {
        if context.get::<SerializationContext>().group() != self.group() {
            return context;
        }
        self.tags.apply(context, operation)
    }
}

#[cfg(test)]
mod tests {
    use super::{DenormalizationTags, GroupTags, NormalizationTags};
    use crate::context::{ArgumentContext, ContextBag, SerializationContext};
    use crate::tags::{Ignore, IgnoreIfNull, Operation, SerializedName, Tag};

    fn field() -> ContextBag {
        ContextBag::new().with(ArgumentContext::new("field"))
    }

    #[test]
    fn operation_tags_follow_their_direction() {
        let normalize = NormalizationTags::new().with(Ignore);
        let denormalize = DenormalizationTags::new().with(IgnoreIfNull);

        let context = normalize.apply(field(), Operation::Normalize);
        assert!(context.get::<ArgumentContext>().ignore());
        let context = normalize.apply(field(), Operation::Denormalize);
        assert!(!context.get::<ArgumentContext>().ignore());

        let context = denormalize.apply(field(), Operation::Denormalize);
        assert!(context.get::<ArgumentContext>().ignore_if_null());
        let context = denormalize.apply(field(), Operation::Normalize);
        assert!(!context.get::<ArgumentContext>().ignore_if_null());
    }

    #[test]
    fn group_tags_match_the_active_group() {
        let admin = GroupTags::new("admin").with(SerializedName::new("admin_name"));
        let ungrouped = GroupTags::ungrouped().with(SerializedName::new("plain_name"));
        let in_admin = field().with(SerializationContext::default().with_group("admin"));

        let context = admin.apply(in_admin.clone(), Operation::Normalize);
        assert_eq!(context.get::<ArgumentContext>().normalized_path(), ["admin_name"]);
        let context = admin.apply(field(), Operation::Normalize);
        assert_eq!(context.get::<ArgumentContext>().normalized_path(), ["field"]);

        let context = ungrouped.apply(field(), Operation::Denormalize);
        assert_eq!(context.get::<ArgumentContext>().normalized_path(), ["plain_name"]);
        let context = ungrouped.apply(in_admin, Operation::Denormalize);
        assert_eq!(context.get::<ArgumentContext>().normalized_path(), ["field"]);
    }
}
