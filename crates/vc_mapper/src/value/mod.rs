//! Dynamic values exchanged between objects and wire formats.
//!
//! A [`Value`] is either a generic structure (scalars, lists, maps), a
//! class-shaped [`Object`], or an [`EnumValue`]. Normalization turns the last
//! two into the first; denormalization goes the other way.

mod object;
mod serde;

pub use object::{Object, ObjectId};

use alloc::borrow::Cow;
use core::fmt;

use indexmap::IndexMap;

use crate::types::ClassName;

/// Ordered string-keyed map, the structured form of a [`Value`].
pub type Map = IndexMap<String, Value>;

// -----------------------------------------------------------------------------
// Value

/// A dynamically typed value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(Map),
    Object(Object),
    Enum(EnumValue),
}

impl Value {
    /// Returns `true` for the values every dispatcher passes through untouched.
    #[inline]
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::Null | Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::String(_)
        )
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Returns `true` for "empty-ish" values: null, `false`, `0`, `0.0`,
    /// `""`, `"0"`, an empty list or an empty map.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Int(i) => *i == 0,
            Value::Float(f) => *f == 0.0,
            Value::String(s) => s.is_empty() || s == "0",
            Value::List(items) => items.is_empty(),
            Value::Map(map) => map.is_empty(),
            Value::Object(_) | Value::Enum(_) => false,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Returns the key this value addresses when used as a map key.
    ///
    /// Only strings and integers can be keys.
    pub fn as_key(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::String(s) => Some(Cow::Borrowed(s)),
            Value::Int(i) => Some(Cow::Owned(i.to_string())),
            _ => None,
        }
    }

    /// Views a map, list or object as a map.
    ///
    /// List items are keyed by their index, objects by their field names.
    pub fn to_map(&self) -> Option<Map> {
        match self {
            Value::Map(map) => Some(map.clone()),
            Value::List(items) => Some(
                items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| (index.to_string(), item.clone()))
                    .collect(),
            ),
            Value::Object(object) => Some(object.fields()),
            _ => None,
        }
    }

    /// Name of this value's runtime type, used in error messages.
    pub fn type_name(&self) -> Cow<'static, str> {
        match self {
            Value::Null => Cow::Borrowed("null"),
            Value::Bool(_) => Cow::Borrowed("bool"),
            Value::Int(_) => Cow::Borrowed("int"),
            Value::Float(_) => Cow::Borrowed("float"),
            Value::String(_) => Cow::Borrowed("string"),
            Value::List(_) => Cow::Borrowed("list"),
            Value::Map(_) => Cow::Borrowed("array"),
            Value::Object(object) => match object.class() {
                Some(class) => Cow::Owned(class.to_string()),
                None => Cow::Borrowed("object"),
            },
            Value::Enum(value) => Cow::Owned(value.class().to_string()),
        }
    }
}

// -----------------------------------------------------------------------------
// Conversions

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Value::$variant(value.into())
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i32 => Int,
    i64 => Int,
    u32 => Int,
    f32 => Float,
    f64 => Float,
    String => String,
    &str => String,
    Vec<Value> => List,
    Map => Map,
    Object => Object,
    EnumValue => Enum,
}

impl From<()> for Value {
    #[inline]
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// -----------------------------------------------------------------------------
// EnumValue

/// Backing scalar of an enum case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EnumBacking {
    Int(i64),
    String(String),
}

impl EnumBacking {
    pub fn to_value(&self) -> Value {
        match self {
            EnumBacking::Int(i) => Value::Int(*i),
            EnumBacking::String(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for EnumBacking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumBacking::Int(i) => fmt::Display::fmt(i, f),
            EnumBacking::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EnumBacking {
    fn from(value: i64) -> Self {
        EnumBacking::Int(value)
    }
}

impl From<i32> for EnumBacking {
    fn from(value: i32) -> Self {
        EnumBacking::Int(value.into())
    }
}

impl From<String> for EnumBacking {
    fn from(value: String) -> Self {
        EnumBacking::String(value)
    }
}

impl From<&str> for EnumBacking {
    fn from(value: &str) -> Self {
        EnumBacking::String(value.into())
    }
}

/// One case of a backed enum.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    class: ClassName,
    case: String,
    backing: EnumBacking,
}

impl EnumValue {
    pub fn new(
        class: impl Into<ClassName>,
        case: impl Into<String>,
        backing: impl Into<EnumBacking>,
    ) -> Self {
        Self {
            class: class.into(),
            case: case.into(),
            backing: backing.into(),
        }
    }

    #[inline]
    pub fn class(&self) -> &ClassName {
        &self.class
    }

    #[inline]
    pub fn case(&self) -> &str {
        &self.case
    }

    #[inline]
    pub fn backing(&self) -> &EnumBacking {
        &self.backing
    }
}
