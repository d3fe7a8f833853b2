use serde_json::{Map, Value};

use super::{default_or_invalid, present, Filter, FilterResult, Rejection};
use crate::schema::FilterSpec;
use crate::Validator;

/// Validates arrays and objects, optionally recursing into their elements.
///
/// A string value is decoded as JSON first. `shape` validates the value as
/// a mapping against a nested schema (array elements are keyed by index)
/// and replaces it with the result. `of` then validates every element
/// against one spec, reporting the failing element's index.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayFilter;

impl Filter for ArrayFilter {
    fn apply(&self, value: Option<&Value>, spec: &FilterSpec, validator: &Validator) -> FilterResult {
        let Some(value) = present(value) else {
            return default_or_invalid(spec);
        };

        let mut value = match value {
            Value::String(text) => serde_json::from_str(text).map_err(|_| Rejection::Invalid)?,
            other => other.clone(),
        };

        let count = match &value {
            Value::Array(items) => items.len(),
            Value::Object(map) => map.len(),
            _ => return Err(Rejection::Invalid),
        };

        let options = spec.options();
        if options.length.is_some_and(|expected| count != expected)
            || options.min_length.is_some_and(|min| count < min)
            || options.max_length.is_some_and(|max| count > max)
        {
            return Err(Rejection::Invalid);
        }

        if let Some(shape) = &options.shape {
            let validated = validator.validate(&as_mapping(value), shape)?;
            value = Value::Object(validated);
        }

        if let Some(element_spec) = options.of.as_deref() {
            match &mut value {
                Value::Array(items) => {
                    for (index, item) in items.iter_mut().enumerate() {
                        *item = validator
                            .check(element_spec, Some(&*item))
                            .map_err(|cause| Rejection::at(index.to_string(), cause))?;
                    }
                }
                Value::Object(map) => {
                    for (key, item) in map.iter_mut() {
                        *item = validator
                            .check(element_spec, Some(&*item))
                            .map_err(|cause| Rejection::at(key.clone(), cause))?;
                    }
                }
                _ => {}
            }
        }

        Ok(value)
    }
}

fn as_mapping(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| (index.to_string(), item))
            .collect(),
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Schema;
    use serde_json::json;

    fn run(value: Value, spec: &FilterSpec) -> FilterResult {
        ArrayFilter.apply(Some(&value), spec, &Validator::new())
    }

    #[test]
    fn test_accepts_arrays_and_objects() {
        assert_eq!(run(json!([1, 2]), &FilterSpec::array()).unwrap(), json!([1, 2]));
        assert_eq!(run(json!({"a": 1}), &FilterSpec::array()).unwrap(), json!({"a": 1}));
        assert!(run(json!(3), &FilterSpec::array()).is_err());
    }

    #[test]
    fn test_decodes_json_strings() {
        assert_eq!(run(json!("[1,2,3]"), &FilterSpec::array()).unwrap(), json!([1, 2, 3]));
        assert!(run(json!("[1,2"), &FilterSpec::array()).is_err());
        assert!(run(json!("\"text\""), &FilterSpec::array()).is_err());
    }

    #[test]
    fn test_empty_array_is_valid_without_min_length() {
        assert_eq!(run(json!([]), &FilterSpec::array()).unwrap(), json!([]));
        assert!(run(json!([]), &FilterSpec::array().min_length(1)).is_err());
    }

    #[test]
    fn test_length_bounds() {
        let spec = FilterSpec::array().length(2);
        assert!(run(json!([1, 2]), &spec).is_ok());
        assert!(run(json!([1]), &spec).is_err());
        assert!(run(json!([1, 2, 3]), &FilterSpec::array().max_length(2)).is_err());
    }

    #[test]
    fn test_absent_uses_default() {
        let spec = FilterSpec::array().default_value(json!(["x"]));
        let result = ArrayFilter.apply(None, &spec, &Validator::new()).unwrap();
        assert_eq!(result, json!(["x"]));
    }

    #[test]
    fn test_of_reports_index() {
        let spec = FilterSpec::array().of(FilterSpec::string());
        let err = run(json!(["ok", 123]), &spec).unwrap_err().into_error("tags");
        assert_eq!(err.to_string(), "Field 'tags' failed validation. Array index '1'.");
    }

    #[test]
    fn test_of_transforms_elements() {
        let spec = FilterSpec::array().of(FilterSpec::string().trim());
        assert_eq!(run(json!([" a ", "b "]), &spec).unwrap(), json!(["a", "b"]));
    }

    #[test]
    fn test_nested_of_indices_innermost_first() {
        let spec = FilterSpec::array().of(FilterSpec::array().of(FilterSpec::int()));
        let err = run(json!([[1], [2, "x"]]), &spec).unwrap_err().into_error("grid");
        assert_eq!(err.indices(), ["1", "1"]);

        let err = run(json!([[1, 2, "x"], [3]]), &spec).unwrap_err().into_error("grid");
        assert_eq!(err.indices(), ["2", "0"]);
    }

    #[test]
    fn test_shape_validates_object() {
        let shape = Schema::new()
            .field("street", FilterSpec::string().trim())
            .field("zip", FilterSpec::string().optional());
        let spec = FilterSpec::array().shape(shape);

        let result = run(json!({"street": " Main ", "ignored": true}), &spec).unwrap();
        assert_eq!(result, json!({"street": "Main"}));
    }

    #[test]
    fn test_shape_failure_names_inner_field() {
        let spec = FilterSpec::array().shape(Schema::new().field("street", "string"));
        let err = run(json!({"street": 1}), &spec).unwrap_err().into_error("address");
        assert_eq!(err.field(), Some("street"));
    }

    #[test]
    fn test_shape_keys_arrays_by_index() {
        let spec = FilterSpec::array().shape(Schema::new().field("0", "string").field("1", "int"));
        assert_eq!(run(json!(["a", "2"]), &spec).unwrap(), json!({"0": "a", "1": 2}));
    }

    #[test]
    fn test_of_elements_honor_nullable() {
        let spec = FilterSpec::array().of(FilterSpec::string().nullable());
        assert_eq!(run(json!(["a", null]), &spec).unwrap(), json!(["a", null]));
    }
}
