use alloc::sync::Arc;
use core::any::TypeId;
use core::fmt::Debug;

use crate::hash::{HashMap, TypeIdHashState};

type Table<V> = HashMap<TypeId, V, TypeIdHashState>;

// -----------------------------------------------------------------------------
// TypeIdMap

/// A copy-on-write map with [`TypeId`] as the fixed key type.
///
/// Cloning a `TypeIdMap` is O(1): clones share one table until one of them
/// is written to, at which point the writer takes a private copy. This makes
/// the map a good backing store for values that are passed down a call tree
/// and only occasionally overlaid with a new entry.
///
/// # Examples
///
/// ```
/// use vc_utils::TypeIdMap;
///
/// let mut base = TypeIdMap::<i32>::new();
/// base.insert_type::<u8>(1);
///
/// let mut overlay = base.clone();
/// overlay.insert_type::<u16>(2);
///
/// assert_eq!(base.len(), 1);
/// assert_eq!(overlay.len(), 2);
/// assert_eq!(overlay.get_type::<u8>(), Some(&1));
/// ```
pub struct TypeIdMap<V>(Option<Arc<Table<V>>>);

impl<V> TypeIdMap<V> {
    /// Creates an empty `TypeIdMap` without allocating.
    #[inline]
    pub const fn new() -> Self {
        Self(None)
    }

    /// Returns a reference to the value corresponding to the type.
    #[inline]
    pub fn get(&self, type_id: &TypeId) -> Option<&V> {
        self.0.as_ref().and_then(|table| table.get(type_id))
    }

    /// Returns a reference to the value corresponding to the type.
    #[inline(always)]
    pub fn get_type<T: ?Sized + 'static>(&self) -> Option<&V> {
        self.get(&TypeId::of::<T>())
    }

    /// Returns `true` if the map contains a value for the specified key.
    #[inline]
    pub fn contains(&self, type_id: &TypeId) -> bool {
        self.get(type_id).is_some()
    }

    /// Returns `true` if the map contains a value for the specified type.
    #[inline(always)]
    pub fn contains_type<T: ?Sized + 'static>(&self) -> bool {
        self.contains(&TypeId::of::<T>())
    }

    /// Returns the number of elements in the map.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.as_ref().map_or(0, |table| table.len())
    }

    /// Returns `true` if the map contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if both maps share the same underlying table.
    ///
    /// Two empty maps are always considered shared.
    #[inline]
    pub fn shares_table(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// An iterator visiting all key-value pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&TypeId, &V)> {
        self.0.iter().flat_map(|table| table.iter())
    }

    /// An iterator visiting all values in arbitrary order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// An iterator visiting all keys in arbitrary order.
    pub fn types(&self) -> impl Iterator<Item = &TypeId> {
        self.iter().map(|(key, _)| key)
    }
}

impl<V: Clone> TypeIdMap<V> {
    fn table_mut(&mut self) -> &mut Table<V> {
        let table = self
            .0
            .get_or_insert_with(|| Arc::new(HashMap::default()));
        Arc::make_mut(table)
    }

    /// Inserts a key-value pair, copying the shared table first if needed.
    pub fn insert(&mut self, type_id: TypeId, value: V) -> Option<V> {
        self.table_mut().insert(type_id, value)
    }

    /// Inserts a value keyed by the type `T`.
    #[inline(always)]
    pub fn insert_type<T: ?Sized + 'static>(&mut self, value: V) -> Option<V> {
        self.insert(TypeId::of::<T>(), value)
    }

    /// Removes a key from the map, returning the previous value.
    pub fn remove(&mut self, type_id: &TypeId) -> Option<V> {
        if !self.contains(type_id) {
            return None;
        }
        self.table_mut().remove(type_id)
    }

    /// Overlays every entry of `other` onto `self`; `other` wins on collisions.
    ///
    /// Merging into an empty map shares `other`'s table instead of copying it.
    pub fn overlay(&mut self, other: &Self) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            self.0.clone_from(&other.0);
            return;
        }
        let table = self.table_mut();
        for (key, value) in other.iter() {
            table.insert(*key, value.clone());
        }
    }
}

// -----------------------------------------------------------------------------
// Traits

impl<V> Default for TypeIdMap<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for TypeIdMap<V> {
    #[inline]
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<V: Debug> Debug for TypeIdMap<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::TypeIdMap;

    #[test]
    fn writes_do_not_leak_into_clones() {
        let mut a = TypeIdMap::<&str>::new();
        a.insert_type::<u8>("a");
        let b = a.clone();
        assert!(a.shares_table(&b));

        a.insert_type::<u8>("changed");
        assert!(!a.shares_table(&b));
        assert_eq!(b.get_type::<u8>(), Some(&"a"));
        assert_eq!(a.get_type::<u8>(), Some(&"changed"));
    }

    #[test]
    fn overlay_prefers_other() {
        let mut a = TypeIdMap::<i32>::new();
        a.insert_type::<u8>(1);
        a.insert_type::<u16>(2);

        let mut b = TypeIdMap::<i32>::new();
        b.insert_type::<u16>(20);
        b.insert_type::<u32>(30);

        a.overlay(&b);
        assert_eq!(a.len(), 3);
        assert_eq!(a.get_type::<u8>(), Some(&1));
        assert_eq!(a.get_type::<u16>(), Some(&20));
        assert_eq!(a.get_type::<u32>(), Some(&30));
    }

    #[test]
    fn overlay_into_empty_shares() {
        let mut b = TypeIdMap::<i32>::new();
        b.insert_type::<u8>(1);
        let mut a = TypeIdMap::new();
        a.overlay(&b);
        assert!(a.shares_table(&b));
    }

    #[test]
    fn remove_missing_keeps_sharing() {
        let mut a = TypeIdMap::<i32>::new();
        a.insert_type::<u8>(1);
        let mut b = a.clone();
        assert_eq!(b.remove(&core::any::TypeId::of::<u16>()), None);
        assert!(a.shares_table(&b));
        assert_eq!(b.remove(&core::any::TypeId::of::<u8>()), Some(1));
        assert_eq!(a.len(), 1);
    }
}
