use alloc::sync::Arc;
use core::any::Any;

use crate::Serializer;
use crate::context::{ContextBag, PathContext};
use crate::discriminator::DiscriminatorResolve;
use crate::error::{Result, ValidationError};
use crate::shape::ClassRegistry;
use crate::tags::{Discriminator, DiscriminatorMap, Tags};
use crate::types::Type;
use crate::value::Value;

/// The default [`DiscriminatorResolve`] implementation.
///
/// Resolution order, first success wins:
///
/// 1. a custom resolver from a [`Discriminator`] tag (field, then target class);
/// 2. a [`DiscriminatorMap`] field tag when the target is a union or intersection;
/// 3. union members in declaration order: a member matching the runtime type
///    of the value is returned immediately, otherwise the first member that
///    resolves recursively;
/// 4. a named target: a non-instantiable class goes through its
///    [`DiscriminatorMap`] (field, then the class's own, never an inherited
///    one), anything else is returned if the serializer accepts the data for it.
///
/// Everything else is an `incorrect_type` validation error.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use vc_mapper::Serializer;
/// use vc_mapper::context::PathContext;
/// use vc_mapper::discriminator::{DiscriminatorResolve, DiscriminatorResolver};
/// use vc_mapper::shape::{ClassKind, ClassRegistry, ClassShape};
/// use vc_mapper::tags::{DiscriminatorMap, Tags};
/// use vc_mapper::types::Type;
/// use vc_mapper::value::Value;
///
/// let registry = Arc::new(
///     ClassRegistry::new()
///         .with(
///             ClassShape::new("Shape")
///                 .with_kind(ClassKind::Interface)
///                 .with_tag(DiscriminatorMap::new("type").with_entry("circle", "Circle")),
///         )
///         .with(ClassShape::new("Circle").with_interface("Shape")),
/// );
/// let serializer = Serializer::with_defaults(registry.clone());
/// let resolver = DiscriminatorResolver::new(registry);
///
/// let value: Value = [("type", "circle")].into_iter().collect();
/// let ty = resolver
///     .resolve(&Type::class("Shape"), &value, &serializer, &Tags::new(), &PathContext::new())
///     .unwrap();
/// assert_eq!(ty, Type::class("Circle"));
/// ```
#[derive(Debug, Clone)]
pub struct DiscriminatorResolver {
    registry: Arc<ClassRegistry>,
}

impl DiscriminatorResolver {
    pub fn new(registry: Arc<ClassRegistry>) -> Self {
        Self { registry }
    }

    fn resolve_by_custom(
        &self,
        target: &Type,
        value: &Value,
        serializer: &Serializer,
        tags: &Tags,
        path: &PathContext,
    ) -> Option<Result<Type>> {
        let tag = tags.first::<Discriminator>().or_else(|| {
            target
                .class_name()
                .and_then(|class| self.registry.get(class.as_str()))
                .and_then(|shape| shape.tags().first::<Discriminator>())
        })?;
        let resolver = tag.resolver()?;
        // A tag pointing back at the default resolver would recurse forever.
        if (&**resolver as &dyn Any).is::<DiscriminatorResolver>() {
            return None;
        }
        log::debug!("resolving {target} at [{path}] with a custom resolver");
        Some(resolver.resolve(target, value, serializer, tags, path))
    }

    fn resolve_named(
        &self,
        target: &Type,
        value: &Value,
        serializer: &Serializer,
        tags: &Tags,
        path: &PathContext,
    ) -> Result<Option<Type>> {
        if let Some(class) = target.class_name()
            && !self.registry.is_instantiable(class.as_str())
        {
            // Only the target's own map: an inherited one may name classes
            // outside the target's subtree.
            let map = tags.first::<DiscriminatorMap>().or_else(|| {
                self.registry
                    .get(class.as_str())
                    .and_then(|shape| shape.tags().first::<DiscriminatorMap>())
            });
            if let Some(map) = map {
                return resolve_by_map(map, value, path);
            }
        }

        if serializer.supports_denormalization_data(value, target, None, &ContextBag::new()) {
            return Ok(Some(target.clone()));
        }
        Ok(None)
    }
}

impl DiscriminatorResolve for DiscriminatorResolver {
    fn resolve(
        &self,
        target: &Type,
        value: &Value,
        serializer: &Serializer,
        tags: &Tags,
        path: &PathContext,
    ) -> Result<Type> {
        if let Some(result) = self.resolve_by_custom(target, value, serializer, tags, path) {
            return result;
        }

        if matches!(target, Type::Union(_) | Type::Intersection(_))
            && let Some(map) = tags.first::<DiscriminatorMap>()
            && let Some(ty) = resolve_by_map(map, value, path)?
        {
            return Ok(ty);
        }

        if let Type::Union(members) = target {
            let actual = Type::of_value(value);
            let mut candidates = Vec::new();
            for member in members {
                if member.is_named() && member.is_contravariant_to(&actual, &self.registry) {
                    log::debug!("union member {member} matches {actual} at [{path}]");
                    return Ok(member.clone());
                }
                if let Ok(ty) = self.resolve(member, value, serializer, tags, path) {
                    candidates.push(ty);
                }
            }
            if let Some(first) = candidates.into_iter().next() {
                log::debug!("union {target} resolved to {first} at [{path}]");
                return Ok(first);
            }
        }

        if target.is_named()
            && let Some(ty) = self.resolve_named(target, value, serializer, tags, path)?
        {
            return Ok(ty);
        }

        Err(ValidationError::incorrect_type(path, target, value.type_name()).into())
    }
}

/// Reads the tag field of `value` and looks it up in `map`.
///
/// Returns `None` when `value` is not array-like.
fn resolve_by_map(map: &DiscriminatorMap, value: &Value, path: &PathContext) -> Result<Option<Type>> {
    let tag = match value {
        Value::Map(fields) => fields.get(map.field()),
        Value::List(_) => None,
        _ => return Ok(None),
    };

    let Some(tag) = tag else {
        if let Some(default) = map.default_class() {
            log::debug!("tag `{}` missing at [{path}], using {default}", map.field());
            return Ok(Some(Type::Class(default.clone())));
        }
        return Err(ValidationError::required(&path.add(map.field())).into());
    };

    match tag.as_key().and_then(|key| map.get(&key)) {
        Some(class) => Ok(Some(Type::Class(class.clone()))),
        None => match map.default_class() {
            Some(default) => {
                log::debug!("unknown tag {tag:?} at [{path}], using {default}");
                Ok(Some(Type::Class(default.clone())))
            }
            None => Err(ValidationError::unexpected_value(&path.add(map.field()), map.keys()).into()),
        },
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use super::DiscriminatorResolver;
    use crate::Serializer;
    use crate::context::PathContext;
    use crate::discriminator::DiscriminatorResolve;
    use crate::error::{Error, Result, ValidationRule};
    use crate::shape::{ClassKind, ClassRegistry, ClassShape};
    use crate::tags::{Discriminator, DiscriminatorMap, Tags};
    use crate::types::Type;
    use crate::value::{Map, Object, Value};

    fn foo_bar_map() -> DiscriminatorMap {
        DiscriminatorMap::new("field")
            .with_entry("foo", "Foo")
            .with_entry("bar", "Bar")
    }

    fn registry() -> Arc<ClassRegistry> {
        Arc::new(
            ClassRegistry::new()
                .with(
                    ClassShape::new("FooBar")
                        .with_kind(ClassKind::Interface)
                        .with_tag(foo_bar_map()),
                )
                .with(ClassShape::new("Foo").with_interface("FooBar"))
                .with(ClassShape::new("Bar").with_interface("FooBar")),
        )
    }

    fn resolve(target: Type, value: Value, tags: Tags) -> Result<Type> {
        let registry = registry();
        let serializer = Serializer::with_defaults(registry.clone());
        DiscriminatorResolver::new(registry).resolve(
            &target,
            &value,
            &serializer,
            &tags,
            &PathContext::new(),
        )
    }

    fn tagged(key: &str) -> Value {
        [("field", key)].into_iter().collect()
    }

    #[test]
    fn builtin_targets() {
        let cases = [
            (Type::Mixed, Value::from("any"), Some(Type::Mixed)),
            (Type::Int, Value::from(12), Some(Type::Int)),
            (Type::Int, Value::from(12.2), None),
            (Type::Int, Value::from("str"), None),
            (Type::Float, Value::from(12), Some(Type::Float)),
            (Type::String, Value::from(12.2), Some(Type::String)),
            (Type::Float, Value::from("str"), None),
            (Type::Object, Value::Map(Map::new()), Some(Type::Object)),
            (Type::Object, Value::from(12), None),
            (Type::array_of(Type::Mixed), Value::from(12), None),
            (Type::array_of(Type::Mixed), Value::List(Vec::new()), Some(Type::array_of(Type::Mixed))),
            (Type::class("Foo"), Value::from(12), None),
            (Type::class("Foo"), Value::Map(Map::new()), Some(Type::class("Foo"))),
            (
                Type::class("Foo"),
                Value::Object(Object::anonymous(Map::new())),
                Some(Type::class("Foo")),
            ),
        ];
        for (target, value, expected) in cases {
            let actual = resolve(target.clone(), value.clone(), Tags::new()).ok();
            assert_eq!(actual, expected, "{target} <- {value:?}");
        }
    }

    #[test]
    fn union_with_field_map() {
        let union = Type::union([Type::class("Foo"), Type::class("Bar")]);
        let tags = Tags::new().with(foo_bar_map());
        assert_eq!(resolve(union.clone(), tagged("foo"), tags.clone()).unwrap(), Type::class("Foo"));
        assert_eq!(resolve(union, tagged("bar"), tags).unwrap(), Type::class("Bar"));
    }

    #[test]
    fn interface_uses_class_map() {
        let target = Type::class("FooBar");
        assert_eq!(resolve(target.clone(), tagged("foo"), Tags::new()).unwrap(), Type::class("Foo"));
        assert_eq!(resolve(target, tagged("bar"), Tags::new()).unwrap(), Type::class("Bar"));
    }

    #[test]
    fn union_prefers_exact_match() {
        let union = Type::union([Type::Bool, Type::String, Type::Int]);
        assert_eq!(resolve(union, Value::from(12), Tags::new()).unwrap(), Type::Int);
    }

    #[test]
    fn union_falls_back_to_first_acceptable() {
        let union = Type::union([Type::Bool, Type::Float, Type::String]);
        assert_eq!(resolve(union, Value::from(12), Tags::new()).unwrap(), Type::Float);
    }

    #[test]
    fn union_member_with_class_map() {
        let union = Type::union([Type::Float, Type::class("FooBar"), Type::String]);
        assert_eq!(resolve(union, tagged("bar"), Tags::new()).unwrap(), Type::class("Bar"));
    }

    #[test]
    fn unknown_tag_lists_allowed_keys() {
        let error = resolve(Type::class("FooBar"), tagged("qux"), Tags::new()).unwrap_err();
        let Error::Validation(error) = error else {
            panic!("expected a validation error");
        };
        assert_eq!(error.rule(), ValidationRule::UnexpectedValue);
        assert_eq!(error.field(), "field");
        assert_eq!(error.message(), "Incorrect value. Allows one of: foo, bar");
    }

    #[test]
    fn missing_tag_is_required() {
        let value: Value = [("other", 1)].into_iter().collect();
        let error = resolve(Type::class("FooBar"), value, Tags::new()).unwrap_err();
        assert_eq!(error.validation_errors()[0].rule(), ValidationRule::Required);
        assert_eq!(error.validation_errors()[0].field(), "field");
    }

    #[test]
    fn default_class_covers_missing_and_unknown() {
        let tags = Tags::new().with(foo_bar_map().with_default("Foo"));
        let union = Type::union([Type::class("Foo"), Type::class("Bar")]);
        assert_eq!(
            resolve(union.clone(), tagged("qux"), tags.clone()).unwrap(),
            Type::class("Foo")
        );
        assert_eq!(resolve(union, Value::Map(Map::new()), tags).unwrap(), Type::class("Foo"));
    }

    #[test]
    fn inherited_map_is_not_used_for_a_subtree() {
        let registry = Arc::new(
            ClassRegistry::new()
                .with(
                    ClassShape::new("Animal")
                        .with_kind(ClassKind::Abstract)
                        .with_tag(
                            DiscriminatorMap::new("type")
                                .with_entry("cat", "Cat")
                                .with_entry("dog", "Dog"),
                        ),
                )
                .with(ClassShape::new("Canine").with_kind(ClassKind::Abstract).with_parent("Animal"))
                .with(ClassShape::new("Cat").with_parent("Animal"))
                .with(ClassShape::new("Dog").with_parent("Canine")),
        );
        let serializer = Serializer::with_defaults(registry.clone());
        let resolver = DiscriminatorResolver::new(registry);
        let value: Value = [("type", "cat")].into_iter().collect();

        let animal = resolver
            .resolve(&Type::class("Animal"), &value, &serializer, &Tags::new(), &PathContext::new())
            .unwrap();
        assert_eq!(animal, Type::class("Cat"));

        let canine = resolver
            .resolve(&Type::class("Canine"), &value, &serializer, &Tags::new(), &PathContext::new())
            .unwrap();
        assert_eq!(canine, Type::class("Canine"));
    }

    struct AlwaysString;

    impl DiscriminatorResolve for AlwaysString {
        fn resolve(
            &self,
            _target: &Type,
            _value: &Value,
            _serializer: &Serializer,
            _tags: &Tags,
            _path: &PathContext,
        ) -> Result<Type> {
            Ok(Type::String)
        }
    }

    #[test]
    fn custom_resolver_takes_over() {
        let tags = Tags::new().with(Discriminator::new().with_resolver(AlwaysString));
        let target = Type::intersection([Type::Object]);
        assert_eq!(resolve(target, Value::from("test"), tags).unwrap(), Type::String);
    }

    #[test]
    fn default_resolver_in_tag_is_skipped() {
        let tags = Tags::new().with(Discriminator::new().with_resolver(DiscriminatorResolver::new(registry())));
        assert_eq!(resolve(Type::Int, Value::from(1), tags).unwrap(), Type::Int);
    }
}
