//! Type descriptors: what a value is expected to become.

use alloc::sync::Arc;
use core::borrow::Borrow;
use core::fmt;

use crate::shape::ClassRegistry;
use crate::value::Value;

// -----------------------------------------------------------------------------
// ClassName

/// Identity of a class, interface or enum.
///
/// Cheap to clone; compares by name.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassName(Arc<str>);

impl ClassName {
    #[inline]
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ClassName {
    #[inline]
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ClassName {
    #[inline]
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl From<&ClassName> for ClassName {
    #[inline]
    fn from(value: &ClassName) -> Self {
        value.clone()
    }
}

impl Borrow<str> for ClassName {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ClassName {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for ClassName {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

// -----------------------------------------------------------------------------
// Type

/// A closed description of a target type.
///
/// `Array` covers both lists and string-keyed maps of the inner type.
///
/// # Examples
///
/// ```
/// use vc_mapper::types::Type;
///
/// let ty = Type::nullable(Type::array_of(Type::class("Foo")));
/// assert_eq!(ty.to_string(), "array<Foo>|null");
/// assert!(!ty.is_named());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Mixed,
    Null,
    Bool,
    Int,
    Float,
    String,
    /// Any object, including anonymous ones.
    Object,
    Array(Box<Type>),
    Class(ClassName),
    Union(Vec<Type>),
    Intersection(Vec<Type>),
}

impl Type {
    #[inline]
    pub fn class(name: impl Into<ClassName>) -> Self {
        Type::Class(name.into())
    }

    #[inline]
    pub fn array_of(inner: Type) -> Self {
        Type::Array(Box::new(inner))
    }

    pub fn union(members: impl IntoIterator<Item = Type>) -> Self {
        Type::Union(members.into_iter().collect())
    }

    pub fn intersection(members: impl IntoIterator<Item = Type>) -> Self {
        Type::Intersection(members.into_iter().collect())
    }

    /// `inner|null`.
    pub fn nullable(inner: Type) -> Self {
        Type::Union(vec![inner, Type::Null])
    }

    /// Infers the runtime type of a value.
    pub fn of_value(value: &Value) -> Self {
        match value {
            Value::Null => Type::Null,
            Value::Bool(_) => Type::Bool,
            Value::Int(_) => Type::Int,
            Value::Float(_) => Type::Float,
            Value::String(_) => Type::String,
            Value::List(_) | Value::Map(_) => Type::array_of(Type::Mixed),
            Value::Object(object) => match object.class() {
                Some(class) => Type::Class(class.clone()),
                None => Type::Object,
            },
            Value::Enum(value) => Type::Class(value.class().clone()),
        }
    }

    /// Returns `false` only for unions and intersections.
    #[inline]
    pub fn is_named(&self) -> bool {
        !matches!(self, Type::Union(_) | Type::Intersection(_))
    }

    /// Returns `true` for the kinds a dispatcher may pass through untouched.
    #[inline]
    pub fn is_builtin(&self) -> bool {
        matches!(
            self,
            Type::Mixed | Type::Null | Type::Bool | Type::Int | Type::Float | Type::String
        )
    }

    #[inline]
    pub fn class_name(&self) -> Option<&ClassName> {
        match self {
            Type::Class(name) => Some(name),
            _ => None,
        }
    }

    /// Members of a union or intersection; empty for named types.
    #[inline]
    pub fn members(&self) -> &[Type] {
        match self {
            Type::Union(members) | Type::Intersection(members) => members,
            _ => &[],
        }
    }

    /// Returns `true` if a value of type `other` is acceptable where `self`
    /// is expected.
    ///
    /// Class relations are looked up in `registry`; unknown classes only
    /// accept themselves.
    pub fn is_contravariant_to(&self, other: &Type, registry: &ClassRegistry) -> bool {
        match (self, other) {
            (Type::Mixed, _) => true,
            (_, Type::Union(others)) => {
                !others.is_empty() && others.iter().all(|o| self.is_contravariant_to(o, registry))
            }
            (Type::Union(members), _) => members
                .iter()
                .any(|m| m.is_contravariant_to(other, registry)),
            (Type::Intersection(members), _) => members
                .iter()
                .all(|m| m.is_contravariant_to(other, registry)),
            (_, Type::Intersection(others)) => others
                .iter()
                .any(|o| self.is_contravariant_to(o, registry)),
            (Type::Array(expected), Type::Array(actual)) => {
                expected.is_contravariant_to(actual, registry)
            }
            (Type::Object, Type::Object | Type::Class(_)) => true,
            (Type::Class(expected), Type::Class(actual)) => registry.is_subclass_of(actual, expected),
            (expected, actual) => expected == actual,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, members: &[Type], sep: &str) -> fmt::Result {
            for (index, member) in members.iter().enumerate() {
                if index > 0 {
                    f.write_str(sep)?;
                }
                fmt::Display::fmt(member, f)?;
            }
            Ok(())
        }

        match self {
            Type::Mixed => f.write_str("mixed"),
            Type::Null => f.write_str("null"),
            Type::Bool => f.write_str("bool"),
            Type::Int => f.write_str("int"),
            Type::Float => f.write_str("float"),
            Type::String => f.write_str("string"),
            Type::Object => f.write_str("object"),
            Type::Array(inner) => write!(f, "array<{inner}>"),
            Type::Class(name) => f.write_str(name.as_str()),
            Type::Union(members) => join(f, members, "|"),
            Type::Intersection(members) => join(f, members, "&"),
        }
    }
}
