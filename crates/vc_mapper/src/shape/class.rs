use alloc::sync::Arc;
use core::fmt;

use crate::normalizer::CustomMapping;
use crate::tags::{Tag, Tags};
use crate::types::{ClassName, Type};
use crate::value::{EnumBacking, Map, Object, Value};

// -----------------------------------------------------------------------------
// FieldShape

/// Common view of constructor parameters and properties.
pub trait FieldShape {
    fn name(&self) -> &str;
    fn ty(&self) -> &Type;
    fn default_value(&self) -> Option<&Value>;
    fn tags(&self) -> &Tags;
}

macro_rules! impl_field_shape {
    ($ty:ty) => {
        impl FieldShape for $ty {
            #[inline]
            fn name(&self) -> &str {
                &self.name
            }

            #[inline]
            fn ty(&self) -> &Type {
                &self.ty
            }

            #[inline]
            fn default_value(&self) -> Option<&Value> {
                self.default.as_ref()
            }

            #[inline]
            fn tags(&self) -> &Tags {
                &self.tags
            }
        }
    };
}

// -----------------------------------------------------------------------------
// ParameterShape

/// A constructor parameter.
#[derive(Debug, Clone)]
pub struct ParameterShape {
    name: String,
    ty: Type,
    default: Option<Value>,
    promoted: bool,
    tags: Tags,
}

impl ParameterShape {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
            promoted: false,
            tags: Tags::new(),
        }
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Marks the parameter as assigning the same-named property.
    pub fn promoted(mut self) -> Self {
        self.promoted = true;
        self
    }

    pub fn with_tag(mut self, tag: impl Tag) -> Self {
        self.tags.push(tag);
        self
    }

    #[inline]
    pub fn is_promoted(&self) -> bool {
        self.promoted
    }
}

impl_field_shape!(ParameterShape);

// -----------------------------------------------------------------------------
// PropertyShape

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

/// A declared property.
#[derive(Debug, Clone)]
pub struct PropertyShape {
    name: String,
    ty: Type,
    default: Option<Value>,
    visibility: Visibility,
    readonly: bool,
    promoted: bool,
    tags: Tags,
}

impl PropertyShape {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
            visibility: Visibility::Public,
            readonly: false,
            promoted: false,
            tags: Tags::new(),
        }
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    pub fn promoted(mut self) -> Self {
        self.promoted = true;
        self
    }

    pub fn with_tag(mut self, tag: impl Tag) -> Self {
        self.tags.push(tag);
        self
    }

    #[inline]
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    #[inline]
    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    #[inline]
    pub fn is_promoted(&self) -> bool {
        self.promoted
    }

    /// Returns `true` if the property may be assigned after construction.
    #[inline]
    pub fn is_writable(&self) -> bool {
        self.is_public() && !self.readonly && !self.promoted
    }
}

impl_field_shape!(PropertyShape);

// -----------------------------------------------------------------------------
// Arguments

/// Ordered, named constructor arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(Vec<(String, Value)>);

impl Arguments {
    #[inline]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.0.push((name.into(), value));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Value)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_map(self) -> Map {
        self.0.into_iter().collect()
    }
}

// -----------------------------------------------------------------------------
// ConstructorShape

/// Body run against a freshly allocated instance.
pub type ConstructorBody = Arc<dyn Fn(&Object, &Arguments) + Send + Sync>;

/// Constructor parameters plus an optional body.
///
/// Without a body, promoted parameters are copied into same-named fields.
#[derive(Clone, Default)]
pub struct ConstructorShape {
    parameters: Vec<ParameterShape>,
    body: Option<ConstructorBody>,
}

impl ConstructorShape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameter(mut self, parameter: ParameterShape) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_body(mut self, body: impl Fn(&Object, &Arguments) + Send + Sync + 'static) -> Self {
        self.body = Some(Arc::new(body));
        self
    }

    #[inline]
    pub fn parameters(&self) -> &[ParameterShape] {
        &self.parameters
    }
}

impl fmt::Debug for ConstructorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorShape")
            .field("parameters", &self.parameters)
            .field("body", &self.body.is_some())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// ClassShape

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClassKind {
    #[default]
    Concrete,
    Abstract,
    Interface,
    Enum,
}

/// One case of an enum class.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumCase {
    pub name: String,
    pub backing: EnumBacking,
}

/// Everything the mapper needs to know about a class.
///
/// # Examples
///
/// ```
/// use vc_mapper::shape::{ClassShape, ParameterShape, PropertyShape};
/// use vc_mapper::types::Type;
///
/// let shape = ClassShape::new("User")
///     .with_promoted(ParameterShape::new("id", Type::Int))
///     .with_property(PropertyShape::new("nick", Type::nullable(Type::String)).with_default(()));
///
/// assert_eq!(shape.parameters().len(), 1);
/// assert_eq!(shape.properties().len(), 2);
/// assert!(shape.property("id").unwrap().is_promoted());
/// ```
#[derive(Debug, Clone)]
pub struct ClassShape {
    name: ClassName,
    kind: ClassKind,
    immutable: bool,
    parent: Option<ClassName>,
    interfaces: Vec<ClassName>,
    constructor: Option<ConstructorShape>,
    properties: Vec<PropertyShape>,
    tags: Tags,
    cases: Vec<EnumCase>,
    custom: Option<Arc<dyn CustomMapping>>,
}

impl ClassShape {
    pub fn new(name: impl Into<ClassName>) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Concrete,
            immutable: false,
            parent: None,
            interfaces: Vec::new(),
            constructor: None,
            properties: Vec::new(),
            tags: Tags::new(),
            cases: Vec::new(),
            custom: None,
        }
    }

    pub fn with_kind(mut self, kind: ClassKind) -> Self {
        self.kind = kind;
        self
    }

    /// Marks the class as fully built by its constructor.
    pub fn immutable(mut self) -> Self {
        self.immutable = true;
        self
    }

    pub fn with_parent(mut self, parent: impl Into<ClassName>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Adds an implemented interface, or an extended one for interfaces.
    pub fn with_interface(mut self, interface: impl Into<ClassName>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn with_constructor(mut self, constructor: ConstructorShape) -> Self {
        self.constructor = Some(constructor);
        self
    }

    /// Adds a constructor parameter.
    pub fn with_parameter(mut self, parameter: ParameterShape) -> Self {
        let constructor = self.constructor.take().unwrap_or_default();
        self.constructor = Some(constructor.with_parameter(parameter));
        self
    }

    /// Adds a promoted constructor parameter and its public property.
    pub fn with_promoted(self, parameter: ParameterShape) -> Self {
        let mut property = PropertyShape::new(parameter.name.clone(), parameter.ty.clone()).promoted();
        property.tags = parameter.tags.clone();
        self.with_parameter(parameter.promoted()).with_property(property)
    }

    pub fn with_property(mut self, property: PropertyShape) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_tag(mut self, tag: impl Tag) -> Self {
        self.tags.push(tag);
        self
    }

    /// Adds an enum case and turns the shape into an enum.
    pub fn with_case(mut self, name: impl Into<String>, backing: impl Into<EnumBacking>) -> Self {
        self.kind = ClassKind::Enum;
        self.cases.push(EnumCase {
            name: name.into(),
            backing: backing.into(),
        });
        self
    }

    /// Lets instances map themselves.
    pub fn with_custom(mut self, custom: impl CustomMapping + 'static) -> Self {
        self.custom = Some(Arc::new(custom));
        self
    }

    #[inline]
    pub fn name(&self) -> &ClassName {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    /// Returns `true` for abstract classes and interfaces.
    #[inline]
    pub fn is_abstract(&self) -> bool {
        matches!(self.kind, ClassKind::Abstract | ClassKind::Interface)
    }

    #[inline]
    pub fn is_enum(&self) -> bool {
        self.kind == ClassKind::Enum
    }

    #[inline]
    pub fn is_immutable(&self) -> bool {
        self.immutable
    }

    #[inline]
    pub fn parent(&self) -> Option<&ClassName> {
        self.parent.as_ref()
    }

    #[inline]
    pub fn interfaces(&self) -> &[ClassName] {
        &self.interfaces
    }

    #[inline]
    pub fn constructor(&self) -> Option<&ConstructorShape> {
        self.constructor.as_ref()
    }

    /// Constructor parameters; empty without a constructor.
    #[inline]
    pub fn parameters(&self) -> &[ParameterShape] {
        match &self.constructor {
            Some(constructor) => constructor.parameters(),
            None => &[],
        }
    }

    #[inline]
    pub fn properties(&self) -> &[PropertyShape] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyShape> {
        self.properties.iter().find(|p| p.name == name)
    }

    #[inline]
    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    #[inline]
    pub fn cases(&self) -> &[EnumCase] {
        &self.cases
    }

    #[inline]
    pub fn custom(&self) -> Option<&Arc<dyn CustomMapping>> {
        self.custom.as_ref()
    }

    /// Allocates an instance and runs the constructor against `arguments`.
    ///
    /// Properties start at their declared defaults.
    pub fn instantiate(&self, arguments: &Arguments) -> Object {
        let object = Object::new(self.name.clone());
        for property in &self.properties {
            if let Some(default) = &property.default {
                object.set(property.name.clone(), default.clone());
            }
        }

        let Some(constructor) = &self.constructor else {
            return object;
        };
        match &constructor.body {
            Some(body) => body(&object, arguments),
            None => {
                for parameter in constructor.parameters.iter().filter(|p| p.promoted) {
                    let value = arguments
                        .get(&parameter.name)
                        .or(parameter.default.as_ref());
                    if let Some(value) = value {
                        object.set(parameter.name.clone(), value.clone());
                    }
                }
            }
        }
        object
    }
}

#[cfg(test)]
mod tests {
    use super::{Arguments, ClassShape, ConstructorShape, ParameterShape, PropertyShape};
    use crate::types::Type;
    use crate::value::Value;

    #[test]
    fn instantiate_assigns_promoted_and_defaults() {
        let shape = ClassShape::new("Foo")
            .with_promoted(ParameterShape::new("a", Type::Int))
            .with_promoted(ParameterShape::new("b", Type::Int).with_default(7))
            .with_property(PropertyShape::new("c", Type::String).with_default("c"));

        let mut args = Arguments::new();
        args.push("a", Value::from(1));
        let object = shape.instantiate(&args);

        assert_eq!(object.get("a"), Some(Value::from(1)));
        assert_eq!(object.get("b"), Some(Value::from(7)));
        assert_eq!(object.get("c"), Some(Value::from("c")));
    }

    #[test]
    fn custom_body_replaces_promotion() {
        let shape = ClassShape::new("Sum").with_constructor(
            ConstructorShape::new()
                .with_parameter(ParameterShape::new("a", Type::Int))
                .with_parameter(ParameterShape::new("b", Type::Int))
                .with_body(|object, args| {
                    let sum = [args.get("a"), args.get("b")]
                        .into_iter()
                        .flatten()
                        .filter_map(|v| match v {
                            Value::Int(i) => Some(*i),
                            _ => None,
                        })
                        .sum::<i64>();
                    object.set("total", sum);
                }),
        );

        let mut args = Arguments::new();
        args.push("a", Value::from(2));
        args.push("b", Value::from(3));
        let object = shape.instantiate(&args);
        assert_eq!(object.get("total"), Some(Value::from(5)));
        assert!(!object.contains("a"));
    }
}
