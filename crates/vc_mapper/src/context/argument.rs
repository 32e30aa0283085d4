use crate::context::Context;

/// Resolved directives of a single field.
///
/// Created by the field context filler with the field's own name as the
/// normalized path, then adjusted by the field's tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentContext {
    name: String,
    normalized_path: Vec<String>,
    ignore: bool,
    ignore_if_null: bool,
    ignore_if_empty: bool,
    mutate_to_list: bool,
    serialize_to: Option<String>,
}

impl ArgumentContext {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            normalized_path: vec![name.clone()],
            name,
            ..Self::default()
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the field inside structured data.
    #[inline]
    pub fn normalized_path(&self) -> &[String] {
        &self.normalized_path
    }

    #[inline]
    pub fn ignore(&self) -> bool {
        self.ignore
    }

    #[inline]
    pub fn ignore_if_null(&self) -> bool {
        self.ignore_if_null
    }

    #[inline]
    pub fn ignore_if_empty(&self) -> bool {
        self.ignore_if_empty
    }

    #[inline]
    pub fn mutate_to_list(&self) -> bool {
        self.mutate_to_list
    }

    /// Format the field's value is nested in, if any.
    #[inline]
    pub fn serialize_to(&self) -> Option<&str> {
        self.serialize_to.as_deref()
    }

    pub fn with_normalized_path(mut self, path: Vec<String>) -> Self {
        self.normalized_path = path;
        self
    }

    pub fn prepend_to_normalized_path(mut self, segment: impl Into<String>) -> Self {
        self.normalized_path.insert(0, segment.into());
        self
    }

    pub fn with_ignore(mut self, ignore: bool) -> Self {
        self.ignore = ignore;
        self
    }

    pub fn with_ignore_if_null(mut self, ignore: bool) -> Self {
        self.ignore_if_null = ignore;
        self
    }

    pub fn with_ignore_if_empty(mut self, ignore: bool) -> Self {
        self.ignore_if_empty = ignore;
        self
    }

    pub fn with_mutate_to_list(mut self, mutate: bool) -> Self {
        self.mutate_to_list = mutate;
        self
    }

    pub fn with_serialize_to(mut self, format: impl Into<String>) -> Self {
        self.serialize_to = Some(format.into());
        self
    }
}

impl Context for ArgumentContext {}
