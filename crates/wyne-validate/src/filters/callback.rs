use std::sync::Arc;

use serde_json::Value;

use super::{default_or_invalid, Filter, FilterResult};
use crate::error::ValidationError;
use crate::schema::FilterSpec;
use crate::Validator;

/// A user-supplied conversion: `None` rejects the value.
///
/// Absent inputs are passed as `Value::Null`.
pub type Callback = Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>;

/// Runs the callback named by the `callback` option.
///
/// Callbacks are registered with
/// [`Validator::with_callback`](crate::Validator::with_callback).
#[derive(Debug, Clone, Copy, Default)]
pub struct CallbackFilter;

impl Filter for CallbackFilter {
    fn apply(&self, value: Option<&Value>, spec: &FilterSpec, validator: &Validator) -> FilterResult {
        let name = spec.options().callback.as_deref().ok_or(ValidationError::MissingOption {
            filter: super::CALLBACK,
            option: "callback",
        })?;
        let callback = validator
            .callback(name)
            .ok_or_else(|| ValidationError::UnknownCallback(name.to_string()))?;

        match callback(value.unwrap_or(&Value::Null)) {
            Some(result) => Ok(result),
            None => default_or_invalid(spec),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::Rejection;
    use serde_json::json;

    fn slugify() -> Validator {
        Validator::new().with_callback("slug", |value| {
            value
                .as_str()
                .map(|s| Value::String(s.trim().to_lowercase().replace(' ', "-")))
        })
    }

    #[test]
    fn test_runs_registered_callback() {
        let validator = slugify();
        let result = CallbackFilter
            .apply(Some(&json!(" Hello World ")), &FilterSpec::callback("slug"), &validator)
            .unwrap();
        assert_eq!(result, json!("hello-world"));
    }

    #[test]
    fn test_rejection_uses_default() {
        let validator = slugify();
        let spec = FilterSpec::callback("slug").default_value("untitled");
        assert_eq!(
            CallbackFilter.apply(Some(&json!(3)), &spec, &validator).unwrap(),
            json!("untitled")
        );
        assert!(CallbackFilter
            .apply(Some(&json!(3)), &FilterSpec::callback("slug"), &validator)
            .is_err());
    }

    #[test]
    fn test_unknown_callback() {
        let result = CallbackFilter.apply(Some(&json!("x")), &FilterSpec::callback("nope"), &Validator::new());
        assert!(matches!(
            result,
            Err(Rejection::Error(ValidationError::UnknownCallback(name))) if name == "nope"
        ));
    }
}
