//! Class shapes: the metadata the object mapper walks.
//!
//! ## Menu
//!
//! - [`ClassShape`]: constructor parameters, properties, tags and kind of one class.
//! - [`ParameterShape`] / [`PropertyShape`]: the two kinds of fields, seen
//!   uniformly through [`FieldShape`].
//! - [`ClassRegistry`]: name to shape lookup plus hierarchy queries.
//!
//! Shapes are plain data. They are built once, registered, and then only read.

mod class;
mod registry;

pub use class::{
    Arguments, ClassKind, ClassShape, ConstructorBody, ConstructorShape, EnumCase, FieldShape,
    ParameterShape, PropertyShape, Visibility,
};
pub use registry::ClassRegistry;

#[cfg(feature = "auto_register")]
pub use registry::ClassSubmission;
