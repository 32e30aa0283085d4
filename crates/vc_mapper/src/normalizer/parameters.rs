use alloc::sync::Arc;

use crate::Serializer;
use crate::context::{ContextBag, PathContext, SerializationContext};
use crate::error::{ErrorCollector, Result, ValidationError};
use crate::normalizer::FieldContextFiller;
use crate::shape::{Arguments, FieldShape, ParameterShape};
use crate::tags::Operation;
use crate::value::Map;

/// Format parameter values are assumed to come from.
const PARAMETERS_FORMAT: &str = "json";

/// Maps named input values onto an ordered parameter list.
///
/// Values are looked up by parameter name and denormalized with the same
/// per-field tag rules as constructor arguments. Missing parameters fall back
/// to their default or are reported as required.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use vc_mapper::Serializer;
/// use vc_mapper::context::ContextBag;
/// use vc_mapper::normalizer::ParametersMapper;
/// use vc_mapper::shape::{ClassRegistry, ParameterShape};
/// use vc_mapper::types::Type;
/// use vc_mapper::value::{Map, Value};
///
/// let serializer = Arc::new(Serializer::with_defaults(Arc::new(ClassRegistry::new())));
/// let parameters = [
///     ParameterShape::new("page", Type::Int),
///     ParameterShape::new("limit", Type::Int).with_default(20),
/// ];
///
/// let mut input = Map::new();
/// input.insert("page".into(), Value::from(3));
///
/// let arguments = ParametersMapper::new(serializer)
///     .map(&input, &parameters, &ContextBag::new())
///     .unwrap();
/// assert_eq!(arguments.get("page"), Some(&Value::from(3)));
/// assert_eq!(arguments.get("limit"), Some(&Value::from(20)));
/// ```
#[derive(Clone)]
pub struct ParametersMapper {
    serializer: Arc<Serializer>,
    filler: FieldContextFiller,
}

impl ParametersMapper {
    pub fn new(serializer: Arc<Serializer>) -> Self {
        Self {
            serializer,
            filler: FieldContextFiller,
        }
    }

    pub fn map(
        &self,
        data: &Map,
        parameters: &[ParameterShape],
        context: &ContextBag,
    ) -> Result<Arguments> {
        let mut errors = ErrorCollector::new(context.get::<SerializationContext>().stop_on_first_error());
        let mut arguments = Arguments::new();

        for parameter in parameters {
            let name = parameter.name();
            let value = match (data.get(name), parameter.default_value()) {
                (Some(value), _) => {
                    let field_context =
                        self.filler
                            .fill(name, parameter.tags(), Operation::Denormalize, context);
                    self.serializer.denormalize(
                        value,
                        parameter.ty(),
                        Some(PARAMETERS_FORMAT),
                        &field_context,
                    )
                }
                (None, Some(default)) => Ok(default.clone()),
                (None, None) => {
                    let path = context.get::<PathContext>().add(name);
                    Err(ValidationError::required(&path).into())
                }
            };
            match value {
                Ok(value) => arguments.push(name, value),
                Err(error) => errors.absorb(error)?,
            }
        }

        errors.finish()?;
        Ok(arguments)
    }
}
