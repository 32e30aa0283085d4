use crate::context::Context;

/// Global conversion settings.
///
/// # Examples
///
/// ```
/// use vc_mapper::context::SerializationContext;
///
/// let context = SerializationContext::default()
///     .with_max_depth(2)
///     .with_circular_reference_limit(0);
///
/// assert_eq!(context.max_depth(), Some(2));
/// // Limits below one are raised to one.
/// assert_eq!(context.circular_reference_limit(), 1);
/// assert!(context.throw_on_circular_reference());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializationContext {
    validate_before_denormalization: bool,
    stop_on_first_error: bool,
    normalize_as_map: bool,
    max_depth: Option<usize>,
    circular_reference_limit: usize,
    throw_on_circular_reference: bool,
    group: Option<String>,
}

impl Default for SerializationContext {
    fn default() -> Self {
        Self {
            validate_before_denormalization: true,
            stop_on_first_error: false,
            normalize_as_map: false,
            max_depth: None,
            circular_reference_limit: 1,
            throw_on_circular_reference: true,
            group: None,
        }
    }
}

impl SerializationContext {
    /// Runs the serializer's validator before denormalizing.
    pub fn with_validate_before_denormalization(mut self, validate: bool) -> Self {
        self.validate_before_denormalization = validate;
        self
    }

    /// Fails on the first validation error instead of collecting all of them.
    pub fn with_stop_on_first_error(mut self, stop: bool) -> Self {
        self.stop_on_first_error = stop;
        self
    }

    /// Normalizes objects to maps instead of anonymous objects.
    pub fn with_normalize_as_map(mut self, as_map: bool) -> Self {
        self.normalize_as_map = as_map;
        self
    }

    /// Fields nested deeper than `depth` normalize to null.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// How many times one object may be entered on a single branch.
    pub fn with_circular_reference_limit(mut self, limit: usize) -> Self {
        if limit < 1 {
            log::warn!("circular reference limit {limit} raised to 1");
        }
        self.circular_reference_limit = limit.max(1);
        self
    }

    /// Fails on a circular reference instead of normalizing it to null.
    pub fn with_throw_on_circular_reference(mut self, throw: bool) -> Self {
        self.throw_on_circular_reference = throw;
        self
    }

    /// Selects the group filtered by [`Groups`](crate::tags::Groups) tags.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    #[inline]
    pub fn validate_before_denormalization(&self) -> bool {
        self.validate_before_denormalization
    }

    #[inline]
    pub fn stop_on_first_error(&self) -> bool {
        self.stop_on_first_error
    }

    #[inline]
    pub fn normalize_as_map(&self) -> bool {
        self.normalize_as_map
    }

    #[inline]
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    #[inline]
    pub fn circular_reference_limit(&self) -> usize {
        self.circular_reference_limit.max(1)
    }

    #[inline]
    pub fn throw_on_circular_reference(&self) -> bool {
        self.throw_on_circular_reference
    }

    #[inline]
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }
}

impl Context for SerializationContext {}
