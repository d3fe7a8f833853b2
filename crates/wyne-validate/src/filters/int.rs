use serde_json::{Number, Value};

use super::{default_or_invalid, present, Filter, FilterResult};
use crate::schema::{FilterSpec, Flags};
use crate::Validator;

/// Validates integers.
///
/// Accepts JSON integers, whole floats, `true` (as 1) and decimal strings
/// without leading zeros. [`Flags::ALLOW_HEX`] adds `0x1f`;
/// [`Flags::ALLOW_OCTAL`] adds `017` and `0o17`. `min_range` and
/// `max_range` bound the result. Failures fall back to `default`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntFilter;

impl Filter for IntFilter {
    fn apply(&self, value: Option<&Value>, spec: &FilterSpec, _validator: &Validator) -> FilterResult {
        let parsed = present(value)
            .and_then(|value| to_int(value, spec.flags()))
            .filter(|n| in_int_range(*n, spec));

        match parsed {
            Some(n) => Ok(Value::from(n)),
            None => default_or_invalid(spec),
        }
    }
}

fn to_int(value: &Value, flags: Flags) -> Option<i64> {
    match value {
        Value::Bool(true) => Some(1),
        Value::Number(n) => n.as_i64().or_else(|| whole_float(n)),
        Value::String(s) => parse_int(s.trim(), flags),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn whole_float(n: &Number) -> Option<i64> {
    let f = n.as_f64()?;
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64).then_some(f as i64)
}

fn parse_int(s: &str, flags: Flags) -> Option<i64> {
    if flags.contains(Flags::ALLOW_HEX) {
        if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            return parse_digits(hex, 16);
        }
    }
    if flags.contains(Flags::ALLOW_OCTAL) {
        if let Some(octal) = s.strip_prefix("0o").or_else(|| s.strip_prefix("0O")) {
            return parse_digits(octal, 8);
        }
        if s.len() > 1 && s.starts_with('0') {
            return parse_digits(&s[1..], 8);
        }
    }

    let (negative, digits) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    if digits.is_empty() || (digits.len() > 1 && digits.starts_with('0')) {
        return None;
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let signed = if negative {
        format!("-{digits}")
    } else {
        digits.to_string()
    };
    signed.parse().ok()
}

fn parse_digits(digits: &str, radix: u32) -> Option<i64> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    i64::from_str_radix(digits, radix).ok()
}

fn in_int_range(n: i64, spec: &FilterSpec) -> bool {
    let options = spec.options();
    let above_min = options.min_range.as_ref().map_or(true, |min| match min.as_i64() {
        Some(min) => n >= min,
        None => min.as_f64().map_or(true, |min| n as f64 >= min),
    });
    let below_max = options.max_range.as_ref().map_or(true, |max| match max.as_i64() {
        Some(max) => n <= max,
        None => max.as_f64().map_or(true, |max| n as f64 <= max),
    });
    above_min && below_max
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(value: Value, spec: &FilterSpec) -> FilterResult {
        IntFilter.apply(Some(&value), spec, &Validator::new())
    }

    #[test]
    fn test_decimal_strings() {
        assert_eq!(run(json!("42"), &FilterSpec::int()).unwrap(), json!(42));
        assert_eq!(run(json!(" -7 "), &FilterSpec::int()).unwrap(), json!(-7));
        assert_eq!(run(json!("+3"), &FilterSpec::int()).unwrap(), json!(3));
        assert_eq!(run(json!("0"), &FilterSpec::int()).unwrap(), json!(0));
    }

    #[test]
    fn test_rejects_malformed_strings() {
        for input in ["", "-", "007", "1.5", "1e3", "12abc", "9223372036854775808"] {
            assert!(run(json!(input), &FilterSpec::int()).is_err(), "{input}");
        }
    }

    #[test]
    fn test_json_numbers() {
        assert_eq!(run(json!(12), &FilterSpec::int()).unwrap(), json!(12));
        assert_eq!(run(json!(3.0), &FilterSpec::int()).unwrap(), json!(3));
        assert!(run(json!(3.5), &FilterSpec::int()).is_err());
        assert_eq!(run(json!(true), &FilterSpec::int()).unwrap(), json!(1));
        assert!(run(json!(false), &FilterSpec::int()).is_err());
    }

    #[test]
    fn test_hex_and_octal_flags() {
        assert!(run(json!("0x1f"), &FilterSpec::int()).is_err());

        let hex = FilterSpec::int().with_flags(Flags::ALLOW_HEX);
        assert_eq!(run(json!("0x1f"), &hex).unwrap(), json!(31));
        assert!(run(json!("0x"), &hex).is_err());

        let octal = FilterSpec::int().with_flags(Flags::ALLOW_OCTAL);
        assert_eq!(run(json!("017"), &octal).unwrap(), json!(15));
        assert_eq!(run(json!("0o17"), &octal).unwrap(), json!(15));
        assert!(run(json!("019"), &octal).is_err());
    }

    #[test]
    fn test_range() {
        let spec = FilterSpec::int().min_range(1).max_range(10);
        assert!(run(json!("0"), &spec).is_err());
        assert_eq!(run(json!("10"), &spec).unwrap(), json!(10));
        assert!(run(json!(11), &spec).is_err());
    }

    #[test]
    fn test_failure_uses_default() {
        let spec = FilterSpec::int().min_range(0).default_value(5);
        assert_eq!(run(json!("-1"), &spec).unwrap(), json!(5));
        assert_eq!(IntFilter.apply(None, &spec, &Validator::new()).unwrap(), json!(5));
    }
}
