use crate::context::{ArgumentContext, ContextBag, EnumContext, SerializationContext};
use crate::tags::{Operation, Tag};
use crate::value::Value;

fn update_argument(
    context: ContextBag,
    f: impl FnOnce(ArgumentContext) -> ArgumentContext,
) -> ContextBag {
    context.update::<ArgumentContext>(f)
}

/// Reads and writes the field under another key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedName(String);

impl SerializedName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Tag for SerializedName {
    fn apply(&self, context: ContextBag, _: Operation) -> ContextBag {
        update_argument(context, |argument| {
            argument.with_normalized_path(vec![self.0.clone()])
        })
    }
}

/// Reads and writes the field at a nested, dot separated path.
///
/// An empty path makes the field unreachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedPath(Vec<String>);

impl SerializedPath {
    pub fn new(path: &str) -> Self {
        Self(
            path.split('.')
                .filter(|segment| !segment.is_empty())
                .map(String::from)
                .collect(),
        )
    }

    #[inline]
    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl Tag for SerializedPath {
    fn apply(&self, context: ContextBag, _: Operation) -> ContextBag {
        update_argument(context, |argument| argument.with_normalized_path(self.0.clone()))
    }
}

/// Never reads or writes the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ignore;

impl Tag for Ignore {
    fn apply(&self, context: ContextBag, _: Operation) -> ContextBag {
        update_argument(context, |argument| argument.with_ignore(true))
    }
}

/// Skips the field while its value is null.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IgnoreIfNull;

impl Tag for IgnoreIfNull {
    fn apply(&self, context: ContextBag, _: Operation) -> ContextBag {
        update_argument(context, |argument| argument.with_ignore_if_null(true))
    }
}

/// Skips the field while its value is empty (see [`Value::is_empty`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IgnoreIfEmpty;

impl Tag for IgnoreIfEmpty {
    fn apply(&self, context: ContextBag, _: Operation) -> ContextBag {
        update_argument(context, |argument| argument.with_ignore_if_empty(true))
    }
}

/// Wraps incoming non-list values into a single element list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutateToList;

impl Tag for MutateToList {
    fn apply(&self, context: ContextBag, _: Operation) -> ContextBag {
        update_argument(context, |argument| argument.with_mutate_to_list(true))
    }
}

/// Stores the field as a string encoded in another format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializeTo(String);

impl SerializeTo {
    pub fn new(format: impl Into<String>) -> Self {
        Self(format.into())
    }

    #[inline]
    pub fn format(&self) -> &str {
        &self.0
    }
}

impl Tag for SerializeTo {
    fn apply(&self, context: ContextBag, _: Operation) -> ContextBag {
        update_argument(context, |argument| argument.with_serialize_to(self.0.clone()))
    }
}

/// Limits the field to the listed groups.
///
/// The field is ignored unless the [`SerializationContext`] selects one of
/// the listed groups. Without an active group a grouped field is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Groups(Vec<String>);

impl Groups {
    pub fn new<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(groups.into_iter().map(Into::into).collect())
    }

    #[inline]
    pub fn groups(&self) -> &[String] {
        &self.0
    }
}

impl Tag for Groups {
    fn apply(&self, context: ContextBag, _: Operation) -> ContextBag {
        let listed = context
            .get::<SerializationContext>()
            .group()
            .is_some_and(|group| self.0.iter().any(|g| g == group));
        if listed {
            return context;
        }
        update_argument(context, |argument| argument.with_ignore(true))
    }
}

/// Relaxes enum denormalization for the field.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumOptions {
    allow_invalid: bool,
    default: Value,
}

impl EnumOptions {
    /// Accepts invalid values, turning them into `default`.
    pub fn allow_invalid(default: impl Into<Value>) -> Self {
        Self {
            allow_invalid: true,
            default: default.into(),
        }
    }
}

impl Tag for EnumOptions {
    fn apply(&self, context: ContextBag, operation: Operation) -> ContextBag {
        if operation != Operation::Denormalize {
            return context;
        }
        context.with(EnumContext::new(self.allow_invalid, self.default.clone()))
    }
}
