use alloc::sync::Arc;

use crate::discriminator::DiscriminatorEnrich;
use crate::shape::ClassRegistry;
use crate::tags::{Discriminator, DiscriminatorMap, Tag, Tags};
use crate::value::{Map, Object, Value};

/// The default [`DiscriminatorEnrich`] implementation.
///
/// A custom enricher from a [`Discriminator`] tag runs first. Otherwise a
/// [`DiscriminatorMap`] stamps its field with the key mapped to the object's
/// class. A stamp replaces an existing entry in place and is inserted first
/// otherwise. Objects of unmapped classes are left alone.
#[derive(Debug, Clone)]
pub struct DiscriminatorEnricher {
    registry: Arc<ClassRegistry>,
}

impl DiscriminatorEnricher {
    pub fn new(registry: Arc<ClassRegistry>) -> Self {
        Self { registry }
    }

    /// Field tags first, then the class, its interfaces and its ancestors.
    fn find<'a, T: Tag>(&'a self, tags: &'a Tags, object: &Object) -> Option<&'a T> {
        tags.first::<T>().or_else(|| {
            object
                .class()
                .and_then(|class| self.registry.find_class_tag::<T>(class.as_str()))
        })
    }
}

impl DiscriminatorEnrich for DiscriminatorEnricher {
    fn enrich(&self, object: &Object, mut normalized: Map, tags: &Tags) -> Map {
        if let Some(enricher) = self
            .find::<Discriminator>(tags, object)
            .and_then(Discriminator::enricher)
        {
            return enricher.enrich(object, normalized, tags);
        }

        let Some(map) = self.find::<DiscriminatorMap>(tags, object) else {
            return normalized;
        };
        let Some(key) = object.class().and_then(|class| map.key_for(class)) else {
            return normalized;
        };

        let key = Value::from(key);
        match normalized.get_mut(map.field()) {
            Some(slot) => *slot = key,
            None => {
                normalized.shift_insert(0, map.field().to_owned(), key);
            }
        }
        normalized
    }
}
