//! Errors raised while mapping.
//!
//! Validation errors describe bad input data. They carry the path of the
//! offending field and are aggregated into a [`ValidationBag`] unless the
//! caller asked to stop at the first one. Every other [`Error`] variant is a
//! structural failure and propagates immediately.

use alloc::borrow::Cow;
use core::fmt;

use thiserror::Error;

use crate::context::PathContext;

/// Result type of this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

// -----------------------------------------------------------------------------
// ValidationRule

/// The rule a [`ValidationError`] violates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationRule {
    Required,
    IncorrectType,
    UnexpectedValue,
    UnexpectedFormat,
}

impl ValidationRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationRule::Required => "required",
            ValidationRule::IncorrectType => "incorrect_type",
            ValidationRule::UnexpectedValue => "unexpected_value",
            ValidationRule::UnexpectedFormat => "unexpected_format",
        }
    }
}

impl fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// -----------------------------------------------------------------------------
// ValidationError

/// A single invalid field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at [{field}]")]
pub struct ValidationError {
    field: String,
    rule: ValidationRule,
    message: String,
}

impl ValidationError {
    pub fn new(path: &PathContext, rule: ValidationRule, message: impl Into<String>) -> Self {
        Self {
            field: path.to_string(),
            rule,
            message: message.into(),
        }
    }

    /// The field is missing and has no default.
    pub fn required(path: &PathContext) -> Self {
        Self::new(path, ValidationRule::Required, "Expects required field")
    }

    pub fn incorrect_type(
        path: &PathContext,
        expected: impl fmt::Display,
        actual: impl fmt::Display,
    ) -> Self {
        Self::new(
            path,
            ValidationRule::IncorrectType,
            format!("Incorrect type. Expected: [{expected}], actual: [{actual}]"),
        )
    }

    /// The value is not one of `allowed`.
    pub fn unexpected_value<I>(path: &PathContext, allowed: I) -> Self
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        let allowed: Vec<String> = allowed.into_iter().map(|v| v.to_string()).collect();
        Self::new(
            path,
            ValidationRule::UnexpectedValue,
            format!("Incorrect value. Allows one of: {}", allowed.join(", ")),
        )
    }

    pub fn unexpected_format(path: &PathContext, expected: impl fmt::Display) -> Self {
        Self::new(
            path,
            ValidationRule::UnexpectedFormat,
            format!("Incorrect value format. Expected: {expected}"),
        )
    }

    #[inline]
    pub fn field(&self) -> &str {
        &self.field
    }

    #[inline]
    pub fn rule(&self) -> ValidationRule {
        self.rule
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

// -----------------------------------------------------------------------------
// ValidationBag

/// Ordered collection of validation errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", render_bag(.errors))]
pub struct ValidationBag {
    errors: Vec<ValidationError>,
}

fn render_bag(errors: &[ValidationError]) -> Cow<'static, str> {
    match errors {
        [] => Cow::Borrowed("no validation errors"),
        [single] => Cow::Owned(single.to_string()),
        many => Cow::Owned(format!(
            "{} validation errors: {}",
            many.len(),
            many.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ")
        )),
    }
}

impl ValidationBag {
    #[inline]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Appends every error of `other`.
    pub fn extend(&mut self, other: ValidationBag) {
        self.errors.extend(other.errors);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &ValidationError> {
        self.errors.iter()
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}

impl IntoIterator for ValidationBag {
    type Item = ValidationError;
    type IntoIter = alloc::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

// -----------------------------------------------------------------------------
// Error

/// Any failure of a mapping call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    ValidationBag(#[from] ValidationBag),
    #[error("normalization of this data is not supported at [{path}]")]
    Normalization { path: String },
    #[error("denormalization of this data is not supported at [{path}]")]
    Denormalization { path: String },
    #[error("{operation} for the format \"{format}\" is not supported")]
    UnsupportedFormat {
        operation: &'static str,
        format: String,
    },
    #[error("circular reference while normalizing object at [{path}]")]
    CircularReference { path: String },
    #[error("{0}")]
    InvalidArgument(String),
    #[error("failed to decode {format}: {message}")]
    Decode { format: String, message: String },
    #[error("failed to encode {format}: {message}")]
    Encode { format: String, message: String },
    #[error("{message} at [{path}]")]
    Custom { path: String, message: String },
}

impl Error {
    /// Returns `true` for errors caused by invalid input data.
    #[inline]
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::ValidationBag(_))
    }

    /// Flattens validation errors; empty for structural ones.
    pub fn validation_errors(&self) -> Vec<&ValidationError> {
        match self {
            Error::Validation(error) => vec![error],
            Error::ValidationBag(bag) => bag.iter().collect(),
            _ => Vec::new(),
        }
    }

    pub(crate) fn normalization(path: &PathContext) -> Self {
        Error::Normalization {
            path: path.to_string(),
        }
    }

    pub(crate) fn denormalization(path: &PathContext) -> Self {
        Error::Denormalization {
            path: path.to_string(),
        }
    }

    pub(crate) fn unsupported_format(operation: &'static str, format: &str) -> Self {
        Error::UnsupportedFormat {
            operation,
            format: format.into(),
        }
    }
}

// -----------------------------------------------------------------------------
// ErrorCollector

/// Collects sibling validation errors according to the stop-on-first policy.
///
/// # Examples
///
/// ```
/// use vc_mapper::context::PathContext;
/// use vc_mapper::error::{Error, ErrorCollector, ValidationError};
///
/// let mut errors = ErrorCollector::new(false);
/// errors.absorb(ValidationError::required(&PathContext::new().add("a")).into()).unwrap();
/// errors.absorb(ValidationError::required(&PathContext::new().add("b")).into()).unwrap();
///
/// let Err(Error::ValidationBag(bag)) = errors.finish() else { panic!() };
/// assert_eq!(bag.len(), 2);
/// ```
#[derive(Debug)]
pub struct ErrorCollector {
    bag: ValidationBag,
    stop_on_first: bool,
}

impl ErrorCollector {
    pub fn new(stop_on_first: bool) -> Self {
        Self {
            bag: ValidationBag::new(),
            stop_on_first,
        }
    }

    /// Records a validation error, or hands the error back when it must
    /// propagate right away.
    pub fn absorb(&mut self, error: Error) -> Result<()> {
        if self.stop_on_first {
            return Err(error);
        }
        match error {
            Error::Validation(error) => self.bag.push(error),
            Error::ValidationBag(bag) => self.bag.extend(bag),
            other => return Err(other),
        }
        Ok(())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bag.is_empty()
    }

    /// Fails with the collected bag, if any.
    pub fn finish(self) -> Result<()> {
        if self.bag.is_empty() {
            Ok(())
        } else {
            Err(Error::ValidationBag(self.bag))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorCollector, ValidationError, ValidationRule};
    use crate::context::PathContext;

    #[test]
    fn messages() {
        let path = PathContext::new().add("user").item(0);
        let error = ValidationError::incorrect_type(&path, "int", "string");
        assert_eq!(error.field(), "user[0]");
        assert_eq!(error.rule(), ValidationRule::IncorrectType);
        assert_eq!(error.message(), "Incorrect type. Expected: [int], actual: [string]");

        let error = ValidationError::unexpected_value(&path, ["foo", "bar"]);
        assert_eq!(error.message(), "Incorrect value. Allows one of: foo, bar");
        assert_eq!(error.rule().as_str(), "unexpected_value");
    }

    #[test]
    fn stop_on_first_passes_errors_through() {
        let mut errors = ErrorCollector::new(true);
        let error = errors
            .absorb(ValidationError::required(&PathContext::new()).into())
            .unwrap_err();
        assert!(matches!(error, Error::Validation(_)));
        assert!(errors.finish().is_ok());
    }

    #[test]
    fn structural_errors_are_not_collected() {
        let mut errors = ErrorCollector::new(false);
        let error = errors
            .absorb(Error::InvalidArgument("bad".into()))
            .unwrap_err();
        assert!(!error.is_validation());
        assert!(errors.is_empty());
    }

    #[test]
    fn bags_flatten() {
        let mut inner = ErrorCollector::new(false);
        inner
            .absorb(ValidationError::required(&PathContext::new().add("x")).into())
            .unwrap();
        let Err(bag) = inner.finish() else {
            panic!("expected errors");
        };

        let mut outer = ErrorCollector::new(false);
        outer.absorb(bag).unwrap();
        outer
            .absorb(ValidationError::required(&PathContext::new().add("y")).into())
            .unwrap();
        let Err(error) = outer.finish() else {
            panic!("expected errors");
        };
        let fields: Vec<_> = error.validation_errors().into_iter().map(|e| e.field()).collect();
        assert_eq!(fields, ["x", "y"]);
    }
}
