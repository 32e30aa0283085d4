//! Byte codecs for the generic structure.
//!
//! Both codecs are thin adapters over the `serde` impls of
//! [`Value`](crate::value::Value). Class-shaped objects are written as maps;
//! decoding only ever produces scalars, lists and maps.

mod json;
#[cfg(feature = "ron")]
mod ron;

pub use json::JsonCodec;
#[cfg(feature = "ron")]
pub use self::ron::RonCodec;
