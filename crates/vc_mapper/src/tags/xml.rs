//! Tags placing a field inside an XML-shaped document.
//!
//! XML documents are maps where `@name` keys hold attributes and the `#` key
//! holds the element content.

use crate::context::{ArgumentContext, ContextBag};
use crate::tags::{Operation, Tag};

/// Reads and writes the field as an attribute, `@name`.
///
/// Without an explicit name the field name is used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlAttribute(Option<String>);

impl XmlAttribute {
    #[inline]
    pub const fn new() -> Self {
        Self(None)
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self(Some(name.into()))
    }
}

impl Tag for XmlAttribute {
    fn apply(&self, context: ContextBag, _: Operation) -> ContextBag {
        context.update::<ArgumentContext>(|argument| {
            let name = self.0.as_deref().unwrap_or(argument.name());
            let path = vec![format!("@{name}")];
            argument.with_normalized_path(path)
        })
    }
}

/// Reads and writes the field as the element content, `#`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XmlValue;

impl Tag for XmlValue {
    fn apply(&self, context: ContextBag, _: Operation) -> ContextBag {
        context.update::<ArgumentContext>(|argument| argument.with_normalized_path(vec!["#".into()]))
    }
}

/// Reads the field as a list of repeated elements.
///
/// A single element is wrapped into a list. The optional item path, dot
/// separated, replaces the field path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlArray(Option<Vec<String>>);

impl XmlArray {
    #[inline]
    pub const fn new() -> Self {
        Self(None)
    }

    pub fn with_item_path(path: &str) -> Self {
        Self(Some(path.split('.').map(String::from).collect()))
    }
}

impl Tag for XmlArray {
    fn apply(&self, context: ContextBag, _: Operation) -> ContextBag {
        context.update::<ArgumentContext>(|argument| {
            let argument = argument.with_mutate_to_list(true);
            match &self.0 {
                Some(path) => argument.with_normalized_path(path.clone()),
                None => argument,
            }
        })
    }
}
