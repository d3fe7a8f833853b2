use serde_json::Value;

use super::{default_or_invalid, present, Filter, FilterResult, Rejection};
use crate::schema::{FilterSpec, Flags};
use crate::Validator;

/// Literal inputs for which a `false` result counts as valid.
const FALSE_LITERALS: [&str; 4] = ["0", "false", "off", "no"];

/// Validates booleans.
///
/// `"1"`, `"true"`, `"on"`, `"yes"` (any case, surrounding whitespace
/// ignored) and `true` become `true`. A `false` result is only accepted
/// when the input is literally `false` or one of `"0"`, `"false"`, `"off"`,
/// `"no"`; other falsy-looking input such as `"OFF"`, `""` or `0` fails.
///
/// Unrecognized input falls back to `default`, then to `null` under
/// [`Flags::NULL_ON_FAILURE`], and otherwise fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanFilter;

impl Filter for BooleanFilter {
    fn apply(&self, value: Option<&Value>, spec: &FilterSpec, _validator: &Validator) -> FilterResult {
        let Some(value) = present(value) else {
            return default_or_invalid(spec);
        };

        match coerce(value) {
            Some(true) => Ok(Value::Bool(true)),
            Some(false) if is_false_literal(value) => Ok(Value::Bool(false)),
            Some(false) => Err(Rejection::Invalid),
            None => match default_or_invalid(spec) {
                Err(Rejection::Invalid) if spec.flags().contains(Flags::NULL_ON_FAILURE) => {
                    Ok(Value::Null)
                }
                other => other,
            },
        }
    }
}

fn coerce(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "on" | "yes" => Some(true),
            "0" | "false" | "off" | "no" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn is_false_literal(value: &Value) -> bool {
    match value {
        Value::Bool(b) => !b,
        Value::String(s) => FALSE_LITERALS.contains(&s.as_str()),
        _ => false,
    }
}
