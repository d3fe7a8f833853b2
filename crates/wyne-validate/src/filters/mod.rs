//! Filter catalog.
//!
//! A [`Filter`] turns one input value into a normalized output value or
//! rejects it. The [`Validator`](crate::Validator) owns a catalog of
//! filters keyed by type name; the built-in ones are registered under the
//! constants in this module.

mod array;
mod boolean;
mod callback;
mod email;
mod float;
mod int;
mod regexp;
mod string;

use std::sync::Arc;

use serde_json::Value;

use crate::error::ValidationError;
use crate::schema::FilterSpec;
use crate::Validator;

pub use array::ArrayFilter;
pub use boolean::BooleanFilter;
pub use callback::{Callback, CallbackFilter};
pub use email::EmailFilter;
pub use float::FloatFilter;
pub use int::IntFilter;
pub use regexp::RegexpFilter;
pub use string::StringFilter;

/// Type name of [`StringFilter`].
pub const STRING: &str = "string";
/// Type name of [`ArrayFilter`].
pub const ARRAY: &str = "array";
/// Type name of [`BooleanFilter`].
pub const BOOLEAN: &str = "boolean";
/// Type name of [`IntFilter`].
pub const INT: &str = "int";
/// Type name of [`FloatFilter`].
pub const FLOAT: &str = "float";
/// Type name of [`RegexpFilter`].
pub const REGEXP: &str = "regexp";
/// Type name of [`EmailFilter`].
pub const EMAIL: &str = "email";
/// Type name of [`CallbackFilter`].
pub const CALLBACK: &str = "callback";

/// Result of applying a filter.
pub type FilterResult = Result<Value, Rejection>;

/// Why a filter did not produce a value.
#[derive(Debug)]
pub enum Rejection {
    /// The value is invalid for this filter.
    Invalid,
    /// A nested validation failed with its own error.
    Error(ValidationError),
    /// An element of a collection was rejected.
    AtIndex {
        /// Array index or object key of the element.
        index: String,
        /// Why the element was rejected.
        cause: Box<Rejection>,
    },
}

impl Rejection {
    /// Wraps a rejection with the index of the element that caused it.
    #[must_use]
    pub fn at(index: impl Into<String>, cause: Self) -> Self {
        Self::AtIndex {
            index: index.into(),
            cause: Box::new(cause),
        }
    }

    /// Resolves the rejection into the error reported for `field`.
    #[must_use]
    pub fn into_error(self, field: &str) -> ValidationError {
        match self {
            Self::Invalid => ValidationError::field_failed(field),
            Self::Error(err) => err,
            Self::AtIndex { index, cause } => cause.into_error(field).with_index(index),
        }
    }
}

impl From<ValidationError> for Rejection {
    fn from(err: ValidationError) -> Self {
        Self::Error(err)
    }
}

/// A named validation/normalization step.
///
/// `value` is `None` when the key is absent from the source. Filters that
/// nest (like `array`) call back into `validator`.
///
/// Closures with the same signature are filters:
///
/// ```
/// use serde_json::{json, Map, Value};
/// use wyne_validate::filters::{FilterResult, Rejection};
/// use wyne_validate::{FilterSpec, Schema, Validator};
///
/// let validator = Validator::new().with_filter(
///     "even",
///     |value: Option<&Value>, _spec: &FilterSpec, _v: &Validator| -> FilterResult {
///         match value.and_then(Value::as_i64) {
///             Some(n) if n % 2 == 0 => Ok(json!(n)),
///             _ => Err(Rejection::Invalid),
///         }
///     },
/// );
///
/// let schema = Schema::new().field("n", "even");
/// let mut source = Map::new();
/// source.insert("n".into(), json!(4));
/// assert_eq!(validator.validate(&source, &schema).unwrap()["n"], json!(4));
/// ```
pub trait Filter: Send + Sync + 'static {
    /// Applies the filter.
    fn apply(&self, value: Option<&Value>, spec: &FilterSpec, validator: &Validator) -> FilterResult;
}

impl<F> Filter for F
where
    F: Fn(Option<&Value>, &FilterSpec, &Validator) -> FilterResult + Send + Sync + 'static,
{
    fn apply(&self, value: Option<&Value>, spec: &FilterSpec, validator: &Validator) -> FilterResult {
        self(value, spec, validator)
    }
}

/// Type-erased filter.
pub type BoxFilter = Arc<dyn Filter>;

/// The built-in catalog, in registration order.
pub(crate) fn builtin() -> Vec<(&'static str, BoxFilter)> {
    vec![
        (STRING, Arc::new(StringFilter) as BoxFilter),
        (ARRAY, Arc::new(ArrayFilter)),
        (BOOLEAN, Arc::new(BooleanFilter)),
        (INT, Arc::new(IntFilter)),
        (FLOAT, Arc::new(FloatFilter)),
        (REGEXP, Arc::new(RegexpFilter)),
        (EMAIL, Arc::new(EmailFilter)),
        (CALLBACK, Arc::new(CallbackFilter)),
    ]
}

/// Falls back to the configured `default`, or rejects.
pub(crate) fn default_or_invalid(spec: &FilterSpec) -> FilterResult {
    spec.options().default.clone().ok_or(Rejection::Invalid)
}

/// Absent and `null` are treated alike.
pub(crate) fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// Checks `value` against the inclusive `min_range`/`max_range`.
pub(crate) fn in_range(value: f64, spec: &FilterSpec) -> bool {
    let options = spec.options();
    let above_min = options
        .min_range
        .as_ref()
        .and_then(serde_json::Number::as_f64)
        .map_or(true, |min| value >= min);
    let below_max = options
        .max_range
        .as_ref()
        .and_then(serde_json::Number::as_f64)
        .map_or(true, |max| value <= max);
    above_min && below_max
}
