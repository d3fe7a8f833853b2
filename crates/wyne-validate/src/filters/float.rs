use serde_json::Value;

use super::{default_or_invalid, in_range, present, Filter, FilterResult};
use crate::schema::FilterSpec;
use crate::Validator;

/// Validates floating-point numbers.
///
/// Accepts JSON numbers, `true` (as 1.0) and decimal strings with an
/// optional exponent. Non-finite spellings such as `inf` or `NaN` fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatFilter;

impl Filter for FloatFilter {
    fn apply(&self, value: Option<&Value>, spec: &FilterSpec, _validator: &Validator) -> FilterResult {
        let parsed = present(value)
            .and_then(to_float)
            .filter(|f| in_range(*f, spec));

        match parsed.and_then(serde_json::Number::from_f64) {
            Some(n) => Ok(Value::Number(n)),
            None => default_or_invalid(spec),
        }
    }
}

fn to_float(value: &Value) -> Option<f64> {
    match value {
        Value::Bool(true) => Some(1.0),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_float(s.trim()),
        _ => None,
    }
}

fn parse_float(s: &str) -> Option<f64> {
    let body = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(at) => (&body[..at], Some(&body[at + 1..])),
        None => (body, None),
    };

    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !digits(whole) || !digits(fraction) {
        return None;
    }
    if let Some(exponent) = exponent {
        let exponent = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
        if exponent.is_empty() || !digits(exponent) {
            return None;
        }
    }

    s.parse::<f64>().ok().filter(|f| f.is_finite())
}
