use alloc::sync::Arc;
use core::cell::RefCell;
use core::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use crate::types::ClassName;
use crate::value::{Map, Value};

// -----------------------------------------------------------------------------
// ObjectId

/// Identity token of a live [`Object`].
///
/// Two handles have the same id exactly when they share one instance.
/// Ids are only meaningful while the instance is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(usize);

// -----------------------------------------------------------------------------
// Object

struct Instance {
    class: Option<ClassName>,
    fields: RwLock<Map>,
}

/// A shared, mutable object instance.
///
/// Cloning an `Object` yields another handle to the same instance, so
/// object graphs (including cycles) can be expressed. An object without a
/// class is anonymous: it has no shape and exposes whatever fields it holds.
///
/// Equality compares class and fields, not identity, and also holds between
/// two cyclic graphs of the same shape. Use [`Object::id`] or
/// [`Object::ptr_eq`] for identity.
///
/// # Examples
///
/// ```
/// use vc_mapper::value::{Object, Value};
///
/// let node = Object::new("Node").with("name", "root");
/// node.set("next", node.clone());
///
/// let next = node.get("next").unwrap();
/// assert!(next.as_object().unwrap().ptr_eq(&node));
/// ```
#[derive(Clone)]
pub struct Object(Arc<Instance>);

impl Object {
    /// Creates an empty instance of `class`.
    pub fn new(class: impl Into<ClassName>) -> Self {
        Self::with_fields(Some(class.into()), Map::new())
    }

    /// Creates an anonymous object holding `fields`.
    pub fn anonymous(fields: Map) -> Self {
        Self::with_fields(None, fields)
    }

    pub fn with_fields(class: Option<ClassName>, fields: Map) -> Self {
        Self(Arc::new(Instance {
            class,
            fields: RwLock::new(fields),
        }))
    }

    /// Sets a field and returns the same handle.
    pub fn with(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    #[inline]
    pub fn id(&self) -> ObjectId {
        ObjectId(Arc::as_ptr(&self.0).addr())
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    #[inline]
    pub fn class(&self) -> Option<&ClassName> {
        self.0.class.as_ref()
    }

    #[inline]
    pub fn is_anonymous(&self) -> bool {
        self.0.class.is_none()
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.0
            .fields
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), value.into());
    }

    /// Returns a snapshot of the fields.
    pub fn fields(&self) -> Map {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    fn type_label(&self) -> &str {
        self.class().map_or("object", ClassName::as_str)
    }

    fn read(&self) -> RwLockReadGuard<'_, Map> {
        self.0.fields.read().unwrap_or_else(PoisonError::into_inner)
    }
}

thread_local! {
    /// Instance pairs whose comparison is in progress on this thread.
    static COMPARING: RefCell<Vec<(ObjectId, ObjectId)>> = const { RefCell::new(Vec::new()) };
}

/// Structural equality that terminates on cyclic graphs: a pair of instances
/// met again while it is still being compared counts as equal.
impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        if self.class() != other.class() {
            return false;
        }
        let pair = (self.id(), other.id());
        let revisited = COMPARING.with_borrow_mut(|pairs| {
            let revisited = pairs.contains(&pair);
            if !revisited {
                pairs.push(pair);
            }
            revisited
        });
        if revisited {
            return true;
        }
        // Snapshots, so no lock is held while nested instances are read.
        let equal = self.fields() == other.fields();
        COMPARING.with_borrow_mut(|pairs| pairs.retain(|entry| *entry != pair));
        equal
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct(self.type_label());
        for (key, value) in self.read().iter() {
            match value {
                // Print nested instances shallowly so cycles stay printable.
                Value::Object(object) => debug.field(key, &format_args!("<{}>", object.type_label())),
                other => debug.field(key, other),
            };
        }
        debug.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Object;
    use crate::value::{Map, Value};

    #[test]
    fn clones_share_instance() {
        let a = Object::new("Foo");
        let b = a.clone();
        b.set("x", 1);
        assert_eq!(a.get("x"), Some(Value::from(1)));
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn equality_is_structural() {
        let a = Object::new("Foo").with("x", 1);
        let b = Object::new("Foo").with("x", 1);
        assert_eq!(a, b);
        assert_ne!(a.id(), b.id());
        assert_ne!(a, Object::anonymous(a.fields()));
    }

    #[test]
    fn cyclic_graphs_compare_structurally() {
        let a = Object::new("Node").with("name", "n");
        a.set("next", a.clone());
        let b = Object::new("Node").with("name", "n");
        b.set("next", b.clone());
        assert_eq!(a, b);

        let c = Object::new("Node").with("name", "other");
        c.set("next", c.clone());
        assert_ne!(a, c);

        let d = Object::new("Node").with("name", "n");
        let e = Object::new("Node").with("name", "n").with("next", d.clone());
        d.set("next", e.clone());
        assert_eq!(a, d);
    }

    #[test]
    fn debug_survives_cycles() {
        let a = Object::anonymous(Map::new());
        a.set("me", a.clone());
        assert_eq!(format!("{a:?}"), "object { me: <object> }");
    }
}
