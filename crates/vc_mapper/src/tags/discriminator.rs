use alloc::sync::Arc;
use core::fmt;

use indexmap::IndexMap;

use crate::discriminator::{DiscriminatorEnrich, DiscriminatorResolve};
use crate::tags::Tag;
use crate::types::ClassName;

// -----------------------------------------------------------------------------
// Discriminator

/// Attaches a custom resolver and/or enricher to a class or field.
#[derive(Clone, Default)]
pub struct Discriminator {
    resolver: Option<Arc<dyn DiscriminatorResolve>>,
    enricher: Option<Arc<dyn DiscriminatorEnrich>>,
}

impl Discriminator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resolver(mut self, resolver: impl DiscriminatorResolve + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    pub fn with_enricher(mut self, enricher: impl DiscriminatorEnrich + 'static) -> Self {
        self.enricher = Some(Arc::new(enricher));
        self
    }

    #[inline]
    pub fn resolver(&self) -> Option<&Arc<dyn DiscriminatorResolve>> {
        self.resolver.as_ref()
    }

    #[inline]
    pub fn enricher(&self) -> Option<&Arc<dyn DiscriminatorEnrich>> {
        self.enricher.as_ref()
    }
}

impl fmt::Debug for Discriminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Discriminator")
            .field("resolver", &self.resolver.is_some())
            .field("enricher", &self.enricher.is_some())
            .finish()
    }
}

impl Tag for Discriminator {}

// -----------------------------------------------------------------------------
// DiscriminatorMap

/// Maps values of a tag field to concrete classes.
///
/// # Examples
///
/// ```
/// use vc_mapper::tags::DiscriminatorMap;
///
/// let map = DiscriminatorMap::new("type")
///     .with_entry("circle", "Circle")
///     .with_entry("square", "Square");
///
/// assert_eq!(map.get("circle").unwrap().as_str(), "Circle");
/// assert_eq!(map.key_for(&"Square".into()), Some("square"));
/// assert_eq!(map.keys().collect::<Vec<_>>(), ["circle", "square"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DiscriminatorMap {
    field: String,
    entries: IndexMap<String, ClassName>,
    default: Option<ClassName>,
}

impl DiscriminatorMap {
    /// Creates an empty map reading the tag from `field`.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            entries: IndexMap::new(),
            default: None,
        }
    }

    pub fn with_entry(mut self, key: impl Into<String>, class: impl Into<ClassName>) -> Self {
        self.entries.insert(key.into(), class.into());
        self
    }

    /// Class used when the tag field is missing or unknown.
    pub fn with_default(mut self, class: impl Into<ClassName>) -> Self {
        self.default = Some(class.into());
        self
    }

    #[inline]
    pub fn field(&self) -> &str {
        &self.field
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&ClassName> {
        self.entries.get(key)
    }

    #[inline]
    pub fn default_class(&self) -> Option<&ClassName> {
        self.default.as_ref()
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// First key mapped to `class`.
    pub fn key_for(&self, class: &ClassName) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, c)| *c == class)
            .map(|(key, _)| key.as_str())
    }
}

impl Tag for DiscriminatorMap {}
