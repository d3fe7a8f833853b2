use regex::Regex;
use serde_json::Value;

use super::{default_or_invalid, present, Filter, FilterResult};
use crate::error::ValidationError;
use crate::schema::FilterSpec;
use crate::Validator;

/// Accepts strings (and numbers, as text) matching the `regexp` option.
///
/// The pattern is unanchored; use `^…$` to match the whole value.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexpFilter;

impl Filter for RegexpFilter {
    fn apply(&self, value: Option<&Value>, spec: &FilterSpec, _validator: &Validator) -> FilterResult {
        let pattern = spec.options().regexp.as_deref().ok_or(ValidationError::MissingOption {
            filter: super::REGEXP,
            option: "regexp",
        })?;
        let regex = Regex::new(pattern).map_err(|source| ValidationError::InvalidRegexp {
            pattern: pattern.to_string(),
            source,
        })?;

        let text = match present(value) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return default_or_invalid(spec),
        };

        if regex.is_match(&text) {
            Ok(Value::String(text))
        } else {
            default_or_invalid(spec)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use crate::filters::Rejection;

    fn run(value: Value, spec: &FilterSpec) -> FilterResult {
        RegexpFilter.apply(Some(&value), spec, &Validator::new())
    }

    #[test]
    fn test_matches() {
        let spec = FilterSpec::regexp("^[a-z]+-[0-9]+$");
        assert_eq!(run(json!("sku-12"), &spec).unwrap(), json!("sku-12"));
        assert!(run(json!("SKU-12"), &spec).is_err());
    }

    #[test]
    fn test_unanchored_and_numbers() {
        let spec = FilterSpec::regexp("7");
        assert_eq!(run(json!(172), &spec).unwrap(), json!("172"));
    }

    #[test]
    fn test_missing_pattern() {
        let result = run(json!("x"), &FilterSpec::new("regexp"));
        assert!(matches!(
            result,
            Err(Rejection::Error(ValidationError::MissingOption { option: "regexp", .. }))
        ));
    }

    #[test]
    fn test_invalid_pattern() {
        let result = run(json!("x"), &FilterSpec::regexp("("));
        assert!(matches!(
            result,
            Err(Rejection::Error(ValidationError::InvalidRegexp { .. }))
        ));
    }
}
