//! # Wyne Validate
//!
//! Declarative validation and normalization of untyped input.
//!
//! A [`Schema`] maps field names to [`FilterSpec`]s. [`validate`] walks the
//! schema in order against a source mapping (typically a request's query or
//! body) and returns a new mapping with exactly the schema's fields, each
//! normalized by its filter. The first failing field stops the pass.
//!
//! ## Filters
//!
//! | Type | Accepts | Notable options |
//! |------|---------|-----------------|
//! | `string` | strings | `trim`, `to_upper_case`, `to_lower_case`, `one_of`, `length`, `min_length` (default 1), `max_length` |
//! | `array` | arrays, objects, JSON text | `length`, `min_length`, `max_length`, `shape`, `of` |
//! | `boolean` | booleans, `"on"`/`"off"` and friends | flag `NULL_ON_FAILURE` |
//! | `int` | integers, decimal text | `min_range`, `max_range`, flags `ALLOW_HEX`, `ALLOW_OCTAL` |
//! | `float` | numbers, decimal text | `min_range`, `max_range` |
//! | `regexp` | text matching a pattern | `regexp` |
//! | `email` | email addresses | |
//! | `callback` | whatever the callback accepts | `callback` |
//!
//! Every filter understands `default`, `optional` and `nullable`. Custom
//! filters are registered with [`Validator::with_filter`].
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use wyne_validate::{validate, FilterSpec, Schema};
//!
//! let schema = Schema::new()
//!     .field("name", FilterSpec::string().trim())
//!     .field("tags", FilterSpec::array().of(FilterSpec::string()));
//!
//! let source = json!({ "name": "  Bob  ", "tags": ["ok", 123] });
//! let err = validate(source.as_object().unwrap(), &schema).unwrap_err();
//! assert_eq!(err.to_string(), "Field 'tags' failed validation. Array index '1'.");
//! ```

#![doc(html_root_url = "https://docs.rs/wyne-validate/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod engine;
mod error;
pub mod filters;
mod schema;

pub use engine::{validate, Validator};
pub use error::{ValidationError, ValidationResult};
pub use schema::{FilterSpec, Flags, Options, Schema};
