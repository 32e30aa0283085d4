use core::fmt;

use crate::context::Context;

/// Location of the value being processed, e.g. `items[2].name`.
///
/// # Examples
///
/// ```
/// use vc_mapper::context::PathContext;
///
/// let path = PathContext::new().add("items").item(2).add_path(["owner", "name"]);
/// assert_eq!(path.to_string(), "items[2].owner.name");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathContext {
    path: String,
}

impl PathContext {
    #[inline]
    pub const fn new() -> Self {
        Self { path: String::new() }
    }

    /// Appends a dotted segment.
    pub fn add(&self, segment: &str) -> Self {
        if self.path.is_empty() {
            return Self {
                path: segment.into(),
            };
        }
        Self {
            path: format!("{}.{segment}", self.path),
        }
    }

    /// Appends several dotted segments.
    pub fn add_path<I, S>(&self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        segments
            .into_iter()
            .fold(self.clone(), |path, segment| path.add(segment.as_ref()))
    }

    /// Appends a bracketed index or key.
    pub fn item(&self, key: impl fmt::Display) -> Self {
        Self {
            path: format!("{}[{key}]", self.path),
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.path
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

impl fmt::Display for PathContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl Context for PathContext {}
