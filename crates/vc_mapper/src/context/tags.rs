use crate::context::Context;
use crate::tags::Tags;

/// Tags of the field currently being processed.
#[derive(Debug, Clone, Default)]
pub struct TagsContext {
    tags: Tags,
}

impl TagsContext {
    pub fn new(tags: Tags) -> Self {
        Self { tags }
    }

    #[inline]
    pub fn tags(&self) -> &Tags {
        &self.tags
    }
}

impl Context for TagsContext {}
