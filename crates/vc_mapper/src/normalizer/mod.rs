//! The built-in handlers.
//!
//! ## Menu
//!
//! - [`ObjectMapper`]: class-shaped objects, through their [`ClassShape`](crate::shape::ClassShape).
//! - [`ArrayNormalizer`]: lists and maps, item by item.
//! - [`EnumNormalizer`]: backed enums to and from their backing scalar.
//! - [`UnionDenormalizer`]: narrows union targets, then dispatches again.
//! - [`CustomNormalizer`]: classes that map themselves via [`CustomMapping`].
//! - [`BuiltinDenormalizer`]: scalars, `object`, `mixed` and `null`.
//!
//! [`FieldContextFiller`] and [`data_path`] are the building blocks the object
//! mapper and the [`ParametersMapper`] share.

mod array;
mod builtin;
mod custom;
mod enums;
mod filler;
mod object;
mod parameters;
mod union;

pub mod data_path;

pub use array::ArrayNormalizer;
pub use builtin::BuiltinDenormalizer;
pub use custom::{CustomMapping, CustomNormalizer};
pub use enums::EnumNormalizer;
pub use filler::FieldContextFiller;
pub use object::ObjectMapper;
pub use parameters::ParametersMapper;
pub use union::UnionDenormalizer;
