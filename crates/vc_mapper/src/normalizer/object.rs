use alloc::sync::Arc;

use crate::Serializer;
use crate::context::{
    ArgumentContext, ContextBag, DepthContext, PathContext, ReferencesContext,
    SerializationContext, TagsContext,
};
use crate::discriminator::{
    DiscriminatorEnrich, DiscriminatorEnricher, DiscriminatorResolve, DiscriminatorResolver,
};
use crate::error::{Error, ErrorCollector, Result, ValidationError};
use crate::handler::{Denormalizer, Normalizer};
use crate::normalizer::{FieldContextFiller, data_path};
use crate::shape::{Arguments, ClassRegistry, ClassShape, FieldShape};
use crate::tags::{Operation, Tags};
use crate::types::Type;
use crate::value::{Map, Object, Value};

/// Format whose documents keep element text under `#` and attributes
/// under `@name` keys.
const XML: &str = "xml";
const XML_VALUE: &str = "#";
const XML_ATTRIBUTE_PREFIX: char = '@';

/// Maps class-shaped objects by walking their [`ClassShape`].
///
/// Denormalization resolves abstract targets through the discriminator,
/// fills constructor parameters, instantiates, then assigns the remaining
/// writable properties unless the class is immutable. Normalization writes
/// every public property at its normalized path and lets the enricher stamp
/// the result.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use vc_mapper::Serializer;
/// use vc_mapper::context::ContextBag;
/// use vc_mapper::shape::{ClassRegistry, ClassShape, ParameterShape};
/// use vc_mapper::types::Type;
/// use vc_mapper::value::{Object, Value};
///
/// let registry = ClassRegistry::new().with(
///     ClassShape::new("User")
///         .with_promoted(ParameterShape::new("id", Type::Int))
///         .with_promoted(ParameterShape::new("name", Type::String)),
/// );
/// let serializer = Serializer::with_defaults(Arc::new(registry));
///
/// let data: Value = serde_json::from_str(r#"{"id": 7, "name": "ann"}"#).unwrap();
/// let user = serializer
///     .denormalize(&data, &Type::class("User"), None, &ContextBag::new())
///     .unwrap();
/// assert_eq!(user, Value::Object(Object::new("User").with("id", 7).with("name", "ann")));
/// ```
#[derive(Clone)]
pub struct ObjectMapper {
    registry: Arc<ClassRegistry>,
    resolver: Arc<dyn DiscriminatorResolve>,
    enricher: Arc<dyn DiscriminatorEnrich>,
    filler: FieldContextFiller,
}

impl ObjectMapper {
    /// Creates a mapper using the default discriminator resolver and enricher.
    pub fn new(registry: Arc<ClassRegistry>) -> Self {
        Self {
            resolver: Arc::new(DiscriminatorResolver::new(registry.clone())),
            enricher: Arc::new(DiscriminatorEnricher::new(registry.clone())),
            registry,
            filler: FieldContextFiller,
        }
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn DiscriminatorResolve>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_enricher(mut self, enricher: Arc<dyn DiscriminatorEnrich>) -> Self {
        self.enricher = enricher;
        self
    }

    /// The registered, non-enum shape behind `ty`.
    fn class_shape(&self, ty: &Type) -> Result<&Arc<ClassShape>> {
        ty.class_name()
            .and_then(|class| self.registry.get(class.as_str()))
            .filter(|shape| !shape.is_enum())
            .ok_or_else(|| {
                Error::InvalidArgument(format!("the target must be a known class, actual: [{ty}]"))
            })
    }

    // -------------------------------------------------------------------------
    // Denormalization

    fn instantiate(
        &self,
        shape: &ClassShape,
        data: &Value,
        format: Option<&str>,
        context: &ContextBag,
        serializer: &Serializer,
    ) -> Result<Object> {
        let stop = context.get::<SerializationContext>().stop_on_first_error();

        let mut errors = ErrorCollector::new(stop);
        let mut arguments = Arguments::new();
        for parameter in shape.parameters() {
            let tags = shape.tags().merge(parameter.tags());
            let field_context =
                self.filler
                    .fill(parameter.name(), &tags, Operation::Denormalize, context);
            match self.prepare_value(data, parameter, format, &field_context, serializer, false) {
                Ok(Some(value)) => arguments.push(parameter.name(), value),
                Ok(None) => {}
                Err(error) => errors.absorb(error)?,
            }
        }
        errors.finish()?;

        let object = shape.instantiate(&arguments);
        if shape.is_immutable() {
            return Ok(object);
        }

        let mut errors = ErrorCollector::new(stop);
        for property in shape.properties().iter().filter(|p| p.is_writable()) {
            let tags = shape.tags().merge(property.tags());
            let field_context =
                self.filler
                    .fill(property.name(), &tags, Operation::Denormalize, context);
            match self.prepare_value(data, property, format, &field_context, serializer, true) {
                Ok(Some(value)) => object.set(property.name(), value),
                Ok(None) => {}
                Err(error) => errors.absorb(error)?,
            }
        }
        errors.finish()?;

        Ok(object)
    }

    /// Finds and converts the value of one field.
    ///
    /// `Ok(None)` means the field is absent and may be left out.
    fn prepare_value(
        &self,
        data: &Value,
        field: &impl FieldShape,
        format: Option<&str>,
        context: &ContextBag,
        serializer: &Serializer,
        tolerate_absence: bool,
    ) -> Result<Option<Value>> {
        let argument = context.get::<ArgumentContext>();
        let path = context.get::<PathContext>();

        let normalized_path = argument.normalized_path();
        let found = if normalized_path.is_empty() {
            None
        } else if format == Some(XML) {
            lookup_xml(data, normalized_path)
        } else {
            data_path::get(data, normalized_path)
        };

        let found = found.filter(|value| {
            !(argument.ignore()
                || (argument.ignore_if_null() && value.is_null())
                || (argument.ignore_if_empty() && value.is_empty()))
        });

        let Some(mut value) = found else {
            return match field.default_value() {
                Some(default) => Ok(Some(default.clone())),
                None if tolerate_absence => Ok(None),
                None => Err(ValidationError::required(&path).into()),
            };
        };

        if let Some(sub_format) = argument.serialize_to()
            && let Value::String(encoded) = &value
        {
            value = serializer
                .decode(encoded.as_bytes(), sub_format, context)
                .map_err(|error| match error {
                    Error::Decode { .. } => ValidationError::unexpected_format(&path, sub_format).into(),
                    other => other,
                })?;
        }

        if argument.mutate_to_list() && !value.is_list() {
            value = Value::List(vec![value]);
        }

        serializer
            .denormalize(&value, field.ty(), format, context)
            .map(Some)
    }

    // -------------------------------------------------------------------------
    // Normalization

    fn normalize_fields<'a>(
        &self,
        object: &Object,
        fields: impl Iterator<Item = (&'a str, Tags)>,
        format: Option<&str>,
        context: &ContextBag,
        serializer: &Serializer,
    ) -> Result<Map> {
        let mut result = Value::Map(Map::new());
        let mut errors = ErrorCollector::new(context.get::<SerializationContext>().stop_on_first_error());

        for (name, tags) in fields {
            let field_context = self.filler.fill(name, &tags, Operation::Normalize, context);
            let value = object.get(name).unwrap_or_default();
            match self.normalize_property(&value, format, &field_context, serializer) {
                Ok(Some(normalized)) => {
                    let argument = field_context.get::<ArgumentContext>();
                    if !argument.normalized_path().is_empty() {
                        data_path::set(&mut result, argument.normalized_path(), normalized);
                    }
                }
                Ok(None) => {}
                Err(error) => errors.absorb(error)?,
            }
        }
        errors.finish()?;

        match result {
            Value::Map(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }

    /// `Ok(None)` means the field is skipped.
    fn normalize_property(
        &self,
        value: &Value,
        format: Option<&str>,
        context: &ContextBag,
        serializer: &Serializer,
    ) -> Result<Option<Value>> {
        let argument = context.get::<ArgumentContext>();
        if argument.ignore()
            || (argument.ignore_if_null() && value.is_null())
            || (argument.ignore_if_empty() && value.is_empty())
        {
            return Ok(None);
        }

        let max_depth = context.get::<SerializationContext>().max_depth();
        if let Some(max_depth) = max_depth
            && context.get::<DepthContext>().depth() > max_depth
        {
            return Ok(Some(Value::Null));
        }

        let normalized = serializer.normalize(value, format, context)?;
        let Some(sub_format) = argument.serialize_to() else {
            return Ok(Some(normalized));
        };
        let bytes = serializer.encode(&normalized, sub_format, context)?;
        let encoded = String::from_utf8(bytes).map_err(|error| Error::Encode {
            format: sub_format.into(),
            message: error.to_string(),
        })?;
        Ok(Some(Value::String(encoded)))
    }
}

/// Reads a field of an XML-shaped document.
///
/// Paths not aimed at an attribute or at the value marker are looked up under
/// the value marker, and a document without one is treated as
/// `{"#": document}`.
fn lookup_xml(data: &Value, path: &[String]) -> Option<Value> {
    let head = path.first().map_or("", String::as_str);
    let mut full: Vec<&str> = Vec::with_capacity(path.len() + 1);
    if head != XML_VALUE && !head.starts_with(XML_ATTRIBUTE_PREFIX) {
        full.push(XML_VALUE);
    }
    full.extend(path.iter().map(String::as_str));

    let has_value_marker = data.as_map().is_some_and(|map| map.contains_key(XML_VALUE));
    if has_value_marker {
        return data_path::get(data, &full);
    }
    match full.split_first() {
        Some((&XML_VALUE, rest)) => data_path::get(data, rest),
        _ => None,
    }
}

impl Normalizer for ObjectMapper {
    fn normalize(
        &self,
        data: &Value,
        format: Option<&str>,
        context: &ContextBag,
        serializer: &Serializer,
    ) -> Result<Value> {
        let Value::Object(object) = data else {
            return Err(Error::InvalidArgument(format!(
                "expected an object, actual: [{}]",
                data.type_name()
            )));
        };

        let settings = context.get::<SerializationContext>();
        let references = context.get::<ReferencesContext>();
        if references.count(object) >= settings.circular_reference_limit() {
            let path = context.get::<PathContext>();
            if settings.throw_on_circular_reference() {
                return Err(Error::CircularReference {
                    path: path.to_string(),
                });
            }
            log::debug!("circular reference to {} at [{path}] replaced by null", data.type_name());
            return Ok(Value::Null);
        }
        let context = &context.with(references.add_reference_call(object));

        let normalized = match object.class() {
            None => {
                let fields = object.fields();
                let names = fields.keys().map(|name| (name.as_str(), Tags::new()));
                self.normalize_fields(object, names, format, context, serializer)?
            }
            Some(class) => {
                let Some(shape) = self.registry.get(class.as_str()) else {
                    return Err(Error::InvalidArgument(format!("class [{class}] is not registered")));
                };
                let properties = shape
                    .properties()
                    .iter()
                    .filter(|property| property.is_public())
                    .map(|property| (property.name(), shape.tags().merge(property.tags())));
                let normalized = self.normalize_fields(object, properties, format, context, serializer)?;
                let tags = context.get::<TagsContext>();
                self.enricher.enrich(object, normalized, tags.tags())
            }
        };

        if settings.normalize_as_map() {
            Ok(Value::Map(normalized))
        } else {
            Ok(Value::Object(Object::anonymous(normalized)))
        }
    }

    fn supports_normalization(&self, data: &Value, _: Option<&str>, _: &ContextBag) -> bool {
        match data {
            Value::Object(object) => object
                .class()
                .is_none_or(|class| self.registry.contains(class.as_str())),
            _ => false,
        }
    }
}

impl Denormalizer for ObjectMapper {
    fn denormalize(
        &self,
        data: &Value,
        ty: &Type,
        format: Option<&str>,
        context: &ContextBag,
        serializer: &Serializer,
    ) -> Result<Value> {
        let mut shape = self.class_shape(ty)?;

        let path = context.get::<PathContext>();
        let data = match data {
            Value::Map(_) => data.clone(),
            Value::List(_) | Value::Object(_) => Value::Map(data.to_map().unwrap_or_default()),
            other => {
                return Err(ValidationError::incorrect_type(&path, "object|array", other.type_name()).into());
            }
        };

        if shape.is_abstract() {
            let tags = context.get::<TagsContext>();
            let resolved = self.resolver.resolve(ty, &data, serializer, tags.tags(), &path)?;
            shape = self.class_shape(&resolved)?;
            if let Some(target) = ty.class_name()
                && !self.registry.is_subclass_of(shape.name(), target)
            {
                return Err(ValidationError::incorrect_type(&path, ty, &resolved).into());
            }
            if shape.is_abstract() {
                return Err(Error::InvalidArgument(format!(
                    "[{ty}] resolved to the abstract class [{resolved}]"
                )));
            }
            log::debug!("{ty} at [{path}] resolved to {resolved}");
        }

        self.instantiate(shape, &data, format, context, serializer)
            .map(Value::Object)
    }

    fn supports_denormalization(
        &self,
        _: &Value,
        ty: &Type,
        _: Option<&str>,
        _: &ContextBag,
    ) -> bool {
        self.class_shape(ty).is_ok()
    }

    fn supports_denormalization_data(
        &self,
        data: &Value,
        _: &Type,
        _: Option<&str>,
        _: &ContextBag,
    ) -> bool {
        matches!(data, Value::Map(_) | Value::List(_) | Value::Object(_))
    }
}
