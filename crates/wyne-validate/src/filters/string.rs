use serde_json::Value;

use super::{default_or_invalid, present, Filter, FilterResult, Rejection};
use crate::schema::FilterSpec;
use crate::Validator;

/// Validates and normalizes strings.
///
/// Transforms run in order `trim`, `to_upper_case`, `to_lower_case`; the
/// `one_of` and length checks see the transformed value. Lengths count
/// Unicode scalar values and `min_length` defaults to 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringFilter;

impl Filter for StringFilter {
    fn apply(&self, value: Option<&Value>, spec: &FilterSpec, _validator: &Validator) -> FilterResult {
        let Some(value) = present(value) else {
            return default_or_invalid(spec);
        };
        let Value::String(raw) = value else {
            return Err(Rejection::Invalid);
        };

        let options = spec.options();
        let mut value = if options.trim {
            raw.trim().to_string()
        } else {
            raw.clone()
        };
        if options.to_upper_case {
            value = value.to_uppercase();
        }
        if options.to_lower_case {
            value = value.to_lowercase();
        }

        if let Some(allowed) = &options.one_of {
            if !allowed.iter().any(|candidate| candidate.as_str() == Some(value.as_str())) {
                return Err(Rejection::Invalid);
            }
        }

        let length = value.chars().count();
        if options.length.is_some_and(|expected| length != expected) {
            return Err(Rejection::Invalid);
        }
        if length < options.min_length.unwrap_or(1) {
            return Err(Rejection::Invalid);
        }
        if options.max_length.is_some_and(|max| length > max) {
            return Err(Rejection::Invalid);
        }

        Ok(Value::String(value))
    }
}
