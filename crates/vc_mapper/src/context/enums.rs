use crate::context::Context;
use crate::value::Value;

/// Enum denormalization options of the current field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnumContext {
    allow_invalid: bool,
    default: Value,
}

impl EnumContext {
    pub fn new(allow_invalid: bool, default: Value) -> Self {
        Self {
            allow_invalid,
            default,
        }
    }

    /// Whether invalid values degrade instead of failing.
    #[inline]
    pub fn allow_invalid(&self) -> bool {
        self.allow_invalid
    }

    /// Value used for invalid input when `allow_invalid` is set.
    #[inline]
    pub fn default_value(&self) -> &Value {
        &self.default
    }
}

impl Context for EnumContext {}
