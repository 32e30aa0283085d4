//! Hash containers over *hashbrown* with *foldhash* states.
//!
//! [`FixedHashState`] hashes reproducibly across runs, so registry and
//! reference tables iterate the same way every time. [`TypeIdHashState`]
//! keys tables by [`TypeId`], whose bits are already a hash.

use core::any::TypeId;
use core::hash::{BuildHasher, BuildHasherDefault, Hasher};

pub use foldhash;
pub use hashbrown;

/// `foldhash` state with a fixed seed.
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use vc_utils::hash::FixedHashState;
///
/// let state = FixedHashState::default();
/// assert_eq!(state.hash_one("name"), FixedHashState::default().hash_one("name"));
/// ```
pub type FixedHashState = foldhash::fast::FixedState;

/// A [`hashbrown::HashMap`] using [`FixedHashState`] by default.
pub type HashMap<K, V, S = FixedHashState> = hashbrown::HashMap<K, V, S>;

/// Builds [`TypeIdHasher`]s.
pub type TypeIdHashState = BuildHasherDefault<TypeIdHasher>;

/// Hasher for [`TypeId`] keys.
///
/// The `u64` a [`TypeId`] writes is used as the hash as is. Any other input
/// is folded through [`FixedHashState`].
///
/// # Examples
///
/// ```
/// use core::any::TypeId;
/// use core::hash::BuildHasher;
/// use vc_utils::hash::TypeIdHashState;
///
/// let state = TypeIdHashState::default();
/// assert_ne!(state.hash_one(TypeId::of::<u8>()), state.hash_one(TypeId::of::<u16>()));
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct TypeIdHasher {
    hash: u64,
}

impl Hasher for TypeIdHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        self.hash = FixedHashState::default().hash_one((self.hash, bytes));
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.hash = i;
    }
}
