//! Validation errors.

use thiserror::Error;

/// Result type for validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Reasons a validation pass stops.
///
/// Validation is fail-fast: the first failing field ends the pass.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A field's value was rejected by its filter.
    ///
    /// `indices` locate the failing element inside nested arrays, innermost
    /// first.
    #[error("Field '{field}' failed validation.{}", index_suffix(.indices))]
    FieldFailed {
        /// The schema key that failed.
        field: String,
        /// Element indices, innermost first.
        indices: Vec<String>,
    },

    /// The schema names a filter type the validator does not know.
    #[error("unknown filter type '{0}'")]
    UnknownFilter(String),

    /// A `callback` filter names a callback that was never registered.
    #[error("unknown callback '{0}'")]
    UnknownCallback(String),

    /// A filter was used without an option it requires.
    #[error("filter '{filter}' requires option '{option}'")]
    MissingOption {
        /// The filter type.
        filter: &'static str,
        /// The missing option key.
        option: &'static str,
    },

    /// A `regexp` option did not compile.
    #[error("invalid regexp option '{pattern}'")]
    InvalidRegexp {
        /// The rejected pattern.
        pattern: String,
        /// Compilation error.
        #[source]
        source: regex::Error,
    },
}

impl ValidationError {
    /// Creates a field failure without index context.
    pub fn field_failed(field: impl Into<String>) -> Self {
        Self::FieldFailed {
            field: field.into(),
            indices: Vec::new(),
        }
    }

    /// Appends an element index to a field failure.
    ///
    /// Other variants are returned unchanged.
    #[must_use]
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        if let Self::FieldFailed { indices, .. } = &mut self {
            indices.push(index.into());
        }
        self
    }

    /// Returns the failing field, if this is a field failure.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::FieldFailed { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Returns the element indices of a field failure, innermost first.
    #[must_use]
    pub fn indices(&self) -> &[String] {
        match self {
            Self::FieldFailed { indices, .. } => indices,
            _ => &[],
        }
    }
}

fn index_suffix(indices: &[String]) -> String {
    indices
        .iter()
        .map(|index| format!(" Array index '{index}'."))
        .collect()
}
