#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Alloc

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod serializer;

pub mod chain;
pub mod codec;
pub mod context;
pub mod discriminator;
pub mod error;
pub mod handler;
pub mod normalizer;
pub mod shape;
pub mod tags;
pub mod types;
pub mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports {
    #[cfg(feature = "auto_register")]
    pub use inventory;
}

pub use error::{Error, Result};
pub use serializer::{Serializer, SerializerBuilder};
