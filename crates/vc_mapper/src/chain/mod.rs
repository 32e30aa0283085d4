//! Ordered handler lists.
//!
//! Each chain asks its handlers in registration order and hands the input to
//! the first one whose `supports_*` predicate accepts it. There is no other
//! precedence rule.

mod codec;
mod denormalizer;
mod normalizer;

pub use codec::{ChainDecoder, ChainEncoder};
pub use denormalizer::ChainDenormalizer;
pub use normalizer::ChainNormalizer;
