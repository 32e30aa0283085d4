use alloc::sync::Arc;

use vc_utils::hash::HashMap;

use crate::context::Context;
use crate::value::{Object, ObjectId};

// -----------------------------------------------------------------------------
// ReferencesContext

/// How many times each object is being normalized on the current branch.
///
/// Only used to detect cycles; converted values are never cached here.
#[derive(Debug, Clone, Default)]
pub struct ReferencesContext {
    visits: Arc<HashMap<ObjectId, usize>>,
}

impl ReferencesContext {
    /// Returns how many times `object` has been entered.
    pub fn count(&self, object: &Object) -> usize {
        self.visits.get(&object.id()).copied().unwrap_or(0)
    }

    /// Returns a copy with the visit count of `object` incremented.
    pub fn add_reference_call(&self, object: &Object) -> Self {
        let mut visits = HashMap::clone(&self.visits);
        *visits.entry(object.id()).or_insert(0) += 1;
        Self {
            visits: Arc::new(visits),
        }
    }
}

impl Context for ReferencesContext {}

// -----------------------------------------------------------------------------
// DepthContext

/// Nesting depth of the field being processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DepthContext {
    depth: usize,
}

impl DepthContext {
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn increase(&self) -> Self {
        Self {
            depth: self.depth + 1,
        }
    }
}

impl Context for DepthContext {}

#[cfg(test)]
mod tests {
    use super::ReferencesContext;
    use crate::value::Object;

    #[test]
    fn counts_by_identity() {
        let a = Object::new("Foo");
        let twin = Object::new("Foo");
        let refs = ReferencesContext::default().add_reference_call(&a);
        let again = refs.add_reference_call(&a);

        assert_eq!(refs.count(&a), 1);
        assert_eq!(again.count(&a), 2);
        assert_eq!(again.count(&twin), 0);
    }
}
