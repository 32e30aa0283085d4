use alloc::sync::Arc;

use vc_utils::hash::HashMap;

use crate::shape::ClassShape;
use crate::tags::Tag;
use crate::types::ClassName;

// -----------------------------------------------------------------------------
// ClassRegistry

/// A table of [`ClassShape`]s keyed by class name.
///
/// The registry is built up front and then shared read-only (usually behind
/// an [`Arc`]) by every handler that needs class metadata.
///
/// # Examples
///
/// ```
/// use vc_mapper::shape::{ClassKind, ClassRegistry, ClassShape};
///
/// let mut registry = ClassRegistry::new();
/// registry.register(ClassShape::new("Shape").with_kind(ClassKind::Interface));
/// registry.register(ClassShape::new("Circle").with_interface("Shape"));
///
/// assert!(registry.is_subclass_of(&"Circle".into(), &"Shape".into()));
/// assert!(!registry.is_instantiable("Shape"));
/// assert!(registry.is_instantiable("Unknown"));
/// ```
#[derive(Debug, Default, Clone)]
pub struct ClassRegistry {
    classes: HashMap<ClassName, Arc<ClassShape>>,
}

impl ClassRegistry {
    /// Creates an empty registry.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a shape, replacing any shape with the same name.
    pub fn register(&mut self, shape: ClassShape) {
        self.classes.insert(shape.name().clone(), Arc::new(shape));
    }

    /// Builder form of [`ClassRegistry::register`].
    pub fn with(mut self, shape: ClassShape) -> Self {
        self.register(shape);
        self
    }

    /// Registers every shape submitted with [`submit_class!`](crate::submit_class).
    ///
    /// Returns `false` when the `auto_register` feature is disabled.
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            for submission in inventory::iter::<ClassSubmission> {
                self.register((submission.0)());
            }
            true
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&Arc<ClassShape>> {
        self.classes.get(name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ClassShape>> {
        self.classes.values()
    }

    /// Returns `false` for known abstract classes, interfaces and enums.
    ///
    /// Unknown classes are assumed instantiable.
    pub fn is_instantiable(&self, name: &str) -> bool {
        self.get(name)
            .is_none_or(|shape| !shape.is_abstract() && !shape.is_enum())
    }

    /// Returns `true` if `child` is `ancestor`, extends it or implements it.
    pub fn is_subclass_of(&self, child: &ClassName, ancestor: &ClassName) -> bool {
        let mut pending = vec![child.clone()];
        let mut seen = Vec::new();
        while let Some(name) = pending.pop() {
            if name == *ancestor {
                return true;
            }
            if seen.contains(&name) {
                continue;
            }
            if let Some(shape) = self.get(name.as_str()) {
                pending.extend(shape.parent().cloned());
                pending.extend(shape.interfaces().iter().cloned());
            }
            seen.push(name);
        }
        false
    }

    /// Every interface `name` implements, directly or through its parents
    /// and extended interfaces, in discovery order.
    pub fn interfaces_of(&self, name: &str) -> Vec<ClassName> {
        let mut found: Vec<ClassName> = Vec::new();
        let mut visited: Vec<&ClassName> = Vec::new();
        let mut current = self.get(name);
        while let Some(shape) = current {
            if visited.contains(&shape.name()) {
                break;
            }
            visited.push(shape.name());
            let mut pending: Vec<ClassName> = shape.interfaces().to_vec();
            while let Some(interface) = pending.pop() {
                if found.contains(&interface) {
                    continue;
                }
                if let Some(extended) = self.get(interface.as_str()) {
                    pending.extend(extended.interfaces().iter().rev().cloned());
                }
                found.push(interface);
            }
            current = shape.parent().and_then(|parent| self.get(parent.as_str()));
        }
        found
    }

    /// Finds the first tag of type `T` on `name`, its interfaces, or up its
    /// parent chain.
    pub fn find_class_tag<T: Tag>(&self, name: &str) -> Option<&T> {
        let mut current = self.get(name);
        let mut depth = 0;
        while let Some(shape) = current {
            if let Some(tag) = shape.tags().first::<T>() {
                return Some(tag);
            }
            for interface in self.interfaces_of(shape.name().as_str()) {
                let tag = self
                    .get(interface.as_str())
                    .and_then(|shape| shape.tags().first::<T>());
                if tag.is_some() {
                    return tag;
                }
            }
            depth += 1;
            if depth > self.classes.len() {
                log::warn!("class hierarchy of `{name}` is cyclic");
                return None;
            }
            current = shape.parent().and_then(|parent| self.get(parent.as_str()));
        }
        None
    }
}

// -----------------------------------------------------------------------------
// Auto registration

/// A class submitted for [`ClassRegistry::auto_register`].
#[cfg(feature = "auto_register")]
pub struct ClassSubmission(pub fn() -> ClassShape);

#[cfg(feature = "auto_register")]
inventory::collect!(ClassSubmission);

/// Submits a `fn() -> ClassShape` for [`ClassRegistry::auto_register`].
///
/// ```
/// use vc_mapper::shape::{ClassRegistry, ClassShape};
///
/// fn point() -> ClassShape {
///     ClassShape::new("Point")
/// }
///
/// vc_mapper::submit_class!(point);
///
/// fn main() {
///     let mut registry = ClassRegistry::new();
///     assert!(registry.auto_register());
///     assert!(registry.contains("Point"));
/// }
/// ```
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! submit_class {
    ($shape:path) => {
        $crate::__macro_exports::inventory::submit! {
            $crate::shape::ClassSubmission($shape)
        }
    };
}
