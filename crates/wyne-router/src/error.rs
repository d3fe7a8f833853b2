//! Router error types.

use thiserror::Error;

/// Result type for router operations.
pub type RouterResult<T> = Result<T, RouterError>;

/// Errors raised while compiling patterns or parsing method names.
#[derive(Debug, Error)]
pub enum RouterError {
    /// A path specifier is not a valid regular expression fragment.
    #[error("invalid path pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending specifier.
        pattern: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// A base path is not a valid regular expression fragment.
    #[error("invalid base path '{base_path}': {source}")]
    InvalidBasePath {
        /// The offending base path.
        base_path: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// A method name is neither a supported HTTP verb nor `all`.
    #[error("unknown route method: {0}")]
    UnknownMethod(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_method_display() {
        let err = RouterError::UnknownMethod("FETCH".to_string());
        assert_eq!(err.to_string(), "unknown route method: FETCH");
    }

    #[test]
    fn test_invalid_pattern_display() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = RouterError::InvalidPattern {
            pattern: "(".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("invalid path pattern '('"));
    }
}
