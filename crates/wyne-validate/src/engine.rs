//! The validation engine.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ValidationError, ValidationResult};
use crate::filters::{self, BoxFilter, Callback, Filter, FilterResult, Rejection};
use crate::schema::{FilterSpec, Schema};

/// Interprets schemas against source mappings.
///
/// A validator owns the filter catalog (the built-ins plus any registered
/// with [`with_filter`](Self::with_filter)) and the named callbacks used by
/// the `callback` filter. It is immutable once built and can be shared.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use wyne_validate::{FilterSpec, Schema, Validator};
///
/// let schema = Schema::new()
///     .field("name", FilterSpec::string().trim())
///     .field("age", FilterSpec::int().optional());
///
/// let source = json!({ "name": "  Bob  " });
/// let result = Validator::new()
///     .validate(source.as_object().unwrap(), &schema)
///     .unwrap();
///
/// assert_eq!(serde_json::Value::Object(result), json!({ "name": "Bob" }));
/// ```
#[derive(Clone)]
pub struct Validator {
    filters: HashMap<String, BoxFilter>,
    callbacks: HashMap<String, Callback>,
}

impl Validator {
    /// Creates a validator with the built-in filters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            filters: filters::builtin()
                .into_iter()
                .map(|(name, filter)| (name.to_string(), filter))
                .collect(),
            callbacks: HashMap::new(),
        }
    }

    /// Registers a filter under `name`, replacing any filter of that name.
    #[must_use]
    pub fn with_filter<F: Filter>(mut self, name: impl Into<String>, filter: F) -> Self {
        self.filters.insert(name.into(), Arc::new(filter));
        self
    }

    /// Registers a callback for the `callback` filter.
    #[must_use]
    pub fn with_callback<F>(mut self, name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        self.callbacks.insert(name.into(), Arc::new(callback));
        self
    }

    /// Returns `true` if a filter is registered under `name`.
    #[must_use]
    pub fn has_filter(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Returns the callback registered under `name`.
    #[must_use]
    pub fn callback(&self, name: &str) -> Option<&Callback> {
        self.callbacks.get(name)
    }

    /// Validates `source` against `schema`.
    ///
    /// Fields are processed in schema order. An absent `optional` field is
    /// left out of the result; an absent or null `nullable` field becomes
    /// `null`; everything else goes through its filter. Keys of `source`
    /// that the schema does not name are dropped.
    ///
    /// # Errors
    ///
    /// Returns the first failure. `ValidationError::FieldFailed` names the
    /// field and, for array elements, the element indices.
    pub fn validate(
        &self,
        source: &Map<String, Value>,
        schema: &Schema,
    ) -> ValidationResult<Map<String, Value>> {
        let mut result = Map::new();

        for (field, spec) in schema.iter() {
            let value = source.get(field);

            if value.is_none() && spec.options().optional {
                continue;
            }

            match self.check(spec, value) {
                Ok(validated) => {
                    result.insert(field.to_string(), validated);
                }
                Err(rejection) => {
                    let err = rejection.into_error(field);
                    debug!(field, filter = spec.kind(), error = %err, "validation failed");
                    return Err(err);
                }
            }
        }

        Ok(result)
    }

    /// Validates a single value against a spec.
    ///
    /// Applies `nullable`, then the named filter. Used for array elements
    /// and available to custom filters that nest.
    pub fn check(&self, spec: &FilterSpec, value: Option<&Value>) -> FilterResult {
        if spec.options().nullable && value.map_or(true, Value::is_null) {
            return Ok(Value::Null);
        }

        let filter = self
            .filters
            .get(spec.kind())
            .ok_or_else(|| ValidationError::UnknownFilter(spec.kind().to_string()))
            .map_err(Rejection::from)?;

        filter.apply(value, spec, self)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut filters: Vec<_> = self.filters.keys().collect();
        filters.sort();
        let mut callbacks: Vec<_> = self.callbacks.keys().collect();
        callbacks.sort();
        f.debug_struct("Validator")
            .field("filters", &filters)
            .field("callbacks", &callbacks)
            .finish()
    }
}

/// Validates `source` against `schema` with the built-in filters.
///
/// # Errors
///
/// See [`Validator::validate`].
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use wyne_validate::{validate, FilterSpec, Schema};
///
/// let schema = Schema::new().field("age", FilterSpec::string().default_value("18"));
/// let result = validate(&serde_json::Map::new(), &schema).unwrap();
/// assert_eq!(result["age"], json!("18"));
/// ```
pub fn validate(
    source: &Map<String, Value>,
    schema: &Schema,
) -> ValidationResult<Map<String, Value>> {
    static DEFAULT: OnceLock<Validator> = OnceLock::new();
    DEFAULT.get_or_init(Validator::new).validate(source, schema)
}
