//! Validation schemas.
//!
//! A [`Schema`] is an ordered mapping from field name to [`FilterSpec`].
//! Schemas are built in code or deserialized; a spec is either a bare type
//! name or a `{ type, options, flags }` object:
//!
//! ```
//! use wyne_validate::Schema;
//!
//! let schema: Schema = serde_json::from_str(r#"{
//!     "name": { "type": "string", "options": { "trim": true } },
//!     "tags": { "type": "array", "options": { "of": "string", "optional": true } },
//!     "admin": "boolean"
//! }"#).unwrap();
//!
//! let fields: Vec<_> = schema.iter().map(|(name, _)| name).collect();
//! assert_eq!(fields, ["name", "tags", "admin"]);
//! ```

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use indexmap::IndexMap;
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::filters;

/// Ordered mapping from field name to filter specification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: IndexMap<String, FilterSpec>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, replacing any previous spec under the same name.
    ///
    /// A replaced field keeps its original position.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, spec: impl Into<FilterSpec>) -> Self {
        self.insert(name, spec);
        self
    }

    /// Adds a field in place.
    pub fn insert(&mut self, name: impl Into<String>, spec: impl Into<FilterSpec>) {
        self.fields.insert(name.into(), spec.into());
    }

    /// Returns the filter for a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FilterSpec> {
        self.fields.get(name)
    }

    /// Iterates fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterSpec)> {
        self.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the schema has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, S> FromIterator<(K, S)> for Schema
where
    K: Into<String>,
    S: Into<FilterSpec>,
{
    fn from_iter<I: IntoIterator<Item = (K, S)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, spec)| (name.into(), spec.into()))
                .collect(),
        }
    }
}

/// How a single value is validated: a filter type plus its options and flags.
///
/// # Example
///
/// ```
/// use wyne_validate::FilterSpec;
///
/// let spec = FilterSpec::string().trim().max_length(32);
/// assert_eq!(spec.kind(), "string");
/// assert!(spec.options().trim);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SpecRepr", into = "SpecRepr")]
pub struct FilterSpec {
    kind: String,
    options: Options,
    flags: Flags,
}

impl FilterSpec {
    /// Creates a spec for the named filter type with no options.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            options: Options::default(),
            flags: Flags::NONE,
        }
    }

    /// `string` filter.
    #[must_use]
    pub fn string() -> Self {
        Self::new(filters::STRING)
    }

    /// `array` filter.
    #[must_use]
    pub fn array() -> Self {
        Self::new(filters::ARRAY)
    }

    /// `boolean` filter.
    #[must_use]
    pub fn boolean() -> Self {
        Self::new(filters::BOOLEAN)
    }

    /// `int` filter.
    #[must_use]
    pub fn int() -> Self {
        Self::new(filters::INT)
    }

    /// `float` filter.
    #[must_use]
    pub fn float() -> Self {
        Self::new(filters::FLOAT)
    }

    /// `email` filter.
    #[must_use]
    pub fn email() -> Self {
        Self::new(filters::EMAIL)
    }

    /// `regexp` filter matching `pattern`.
    #[must_use]
    pub fn regexp(pattern: impl Into<String>) -> Self {
        let mut spec = Self::new(filters::REGEXP);
        spec.options.regexp = Some(pattern.into());
        spec
    }

    /// `callback` filter invoking the callback registered as `name`.
    #[must_use]
    pub fn callback(name: impl Into<String>) -> Self {
        let mut spec = Self::new(filters::CALLBACK);
        spec.options.callback = Some(name.into());
        spec
    }

    /// Returns the filter type name.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns the options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Returns the options for in-place editing.
    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    /// Returns the flags.
    #[must_use]
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Replaces the flags.
    #[must_use]
    pub fn with_flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    /// Value used when the input is absent or, for primitive filters, invalid.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.options.default = Some(value.into());
        self
    }

    /// Omit the field from the result when it is absent from the source.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.options.optional = true;
        self
    }

    /// Pass an absent or null value through as `null`.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.options.nullable = true;
        self
    }

    /// Trim surrounding whitespace (string).
    #[must_use]
    pub fn trim(mut self) -> Self {
        self.options.trim = true;
        self
    }

    /// Convert to upper case (string).
    #[must_use]
    pub fn to_upper_case(mut self) -> Self {
        self.options.to_upper_case = true;
        self
    }

    /// Convert to lower case (string).
    #[must_use]
    pub fn to_lower_case(mut self) -> Self {
        self.options.to_lower_case = true;
        self
    }

    /// Restrict to a set of allowed values (string).
    #[must_use]
    pub fn one_of<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.options.one_of = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Exact length: characters for strings, elements for arrays.
    #[must_use]
    pub fn length(mut self, length: usize) -> Self {
        self.options.length = Some(length);
        self
    }

    /// Minimum length (strings default to 1).
    #[must_use]
    pub fn min_length(mut self, length: usize) -> Self {
        self.options.min_length = Some(length);
        self
    }

    /// Maximum length.
    #[must_use]
    pub fn max_length(mut self, length: usize) -> Self {
        self.options.max_length = Some(length);
        self
    }

    /// Validate an array or object against a nested schema.
    #[must_use]
    pub fn shape(mut self, schema: Schema) -> Self {
        self.options.shape = Some(schema);
        self
    }

    /// Validate every element against one spec.
    #[must_use]
    pub fn of(mut self, spec: impl Into<FilterSpec>) -> Self {
        self.options.of = Some(Box::new(spec.into()));
        self
    }

    /// Inclusive lower bound (int, float).
    #[must_use]
    pub fn min_range(mut self, min: impl Into<Number>) -> Self {
        self.options.min_range = Some(min.into());
        self
    }

    /// Inclusive upper bound (int, float).
    #[must_use]
    pub fn max_range(mut self, max: impl Into<Number>) -> Self {
        self.options.max_range = Some(max.into());
        self
    }

    /// Sets an option without a dedicated field, for custom filters.
    #[must_use]
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.extra.insert(key.into(), value.into());
        self
    }
}

impl From<&str> for FilterSpec {
    fn from(kind: &str) -> Self {
        Self::new(kind)
    }
}

impl From<String> for FilterSpec {
    fn from(kind: String) -> Self {
        Self::new(kind)
    }
}

/// Filter options.
///
/// Generic options (`default`, `optional`, `nullable`) apply to every
/// filter; the rest are read by the filters that understand them. Keys
/// without a dedicated field are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Fallback value.
    ///
    /// An explicit `"default": null` deserializes to `None` and therefore
    /// means "no default": an absent field fails instead of becoming `null`.
    /// Use `nullable` to accept absent or null values as `null`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Skip the field when absent.
    #[serde(skip_serializing_if = "is_false")]
    pub optional: bool,

    /// Emit `null` for absent or null values.
    #[serde(skip_serializing_if = "is_false")]
    pub nullable: bool,

    /// Trim whitespace.
    #[serde(skip_serializing_if = "is_false")]
    pub trim: bool,

    /// Upper-case the value.
    #[serde(alias = "toUpperCase", skip_serializing_if = "is_false")]
    pub to_upper_case: bool,

    /// Lower-case the value.
    #[serde(alias = "toLowerCase", skip_serializing_if = "is_false")]
    pub to_lower_case: bool,

    /// Allowed values.
    #[serde(alias = "oneOf", skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<Value>>,

    /// Exact length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,

    /// Minimum length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    /// Maximum length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    /// Nested schema for array/object values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<Schema>,

    /// Spec applied to every element.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub of: Option<Box<FilterSpec>>,

    /// Inclusive lower bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_range: Option<Number>,

    /// Inclusive upper bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_range: Option<Number>,

    /// Pattern for the `regexp` filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regexp: Option<String>,

    /// Callback name for the `callback` filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback: Option<String>,

    /// Options for custom filters.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

/// Filter flags.
///
/// Serialized as a list of names, e.g. `["NULL_ON_FAILURE"]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Flags(u8);

impl Flags {
    /// No flags.
    pub const NONE: Self = Self(0);
    /// Boolean: unrecognized input yields `null` instead of failing.
    pub const NULL_ON_FAILURE: Self = Self(1);
    /// Int: accept `0x` hexadecimal.
    pub const ALLOW_HEX: Self = Self(1 << 1);
    /// Int: accept leading-zero or `0o` octal.
    pub const ALLOW_OCTAL: Self = Self(1 << 2);

    const NAMES: [(&'static str, Self); 3] = [
        ("NULL_ON_FAILURE", Self::NULL_ON_FAILURE),
        ("ALLOW_HEX", Self::ALLOW_HEX),
        ("ALLOW_OCTAL", Self::ALLOW_OCTAL),
    ];

    /// Returns `true` if every flag in `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if no flag is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Looks up a flag by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map(|(_, flag)| *flag)
    }
}

impl BitOr for Flags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl Serialize for Flags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect();
        let mut seq = serializer.serialize_seq(Some(names.len()))?;
        for name in names {
            seq.serialize_element(name)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Flags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FlagsVisitor;

        impl<'de> Visitor<'de> for FlagsVisitor {
            type Value = Flags;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a flag name or a list of flag names")
            }

            fn visit_str<E: de::Error>(self, name: &str) -> Result<Flags, E> {
                Flags::from_name(name).ok_or_else(|| E::custom(format!("unknown flag '{name}'")))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Flags, A::Error> {
                let mut flags = Flags::NONE;
                while let Some(name) = seq.next_element::<String>()? {
                    flags |= Flags::from_name(&name)
                        .ok_or_else(|| <A::Error as de::Error>::custom(format!("unknown flag '{name}'")))?;
                }
                Ok(flags)
            }
        }

        deserializer.deserialize_any(FlagsVisitor)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum SpecRepr {
    Bare(String),
    Full {
        #[serde(rename = "type")]
        kind: String,
        #[serde(default)]
        options: Options,
        #[serde(default, skip_serializing_if = "Flags::is_empty")]
        flags: Flags,
    },
}

impl From<SpecRepr> for FilterSpec {
    fn from(repr: SpecRepr) -> Self {
        match repr {
            SpecRepr::Bare(kind) => Self::new(kind),
            SpecRepr::Full {
                kind,
                options,
                flags,
            } => Self {
                kind,
                options,
                flags,
            },
        }
    }
}

impl From<FilterSpec> for SpecRepr {
    fn from(spec: FilterSpec) -> Self {
        if spec.options == Options::default() && spec.flags.is_empty() {
            Self::Bare(spec.kind)
        } else {
            Self::Full {
                kind: spec.kind,
                options: spec.options,
                flags: spec.flags,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_spec_deserializes() {
        let spec: FilterSpec = serde_json::from_value(json!("email")).unwrap();
        assert_eq!(spec.kind(), "email");
        assert_eq!(spec.options(), &Options::default());
    }

    #[test]
    fn test_full_spec_deserializes() {
        let spec: FilterSpec = serde_json::from_value(json!({
            "type": "string",
            "options": { "trim": true, "oneOf": ["a", "b"], "min_length": 0 },
        }))
        .unwrap();

        assert!(spec.options().trim);
        assert_eq!(spec.options().one_of, Some(vec![json!("a"), json!("b")]));
        assert_eq!(spec.options().min_length, Some(0));
    }

    #[test]
    fn test_nested_of_and_shape() {
        let spec: FilterSpec = serde_json::from_value(json!({
            "type": "array",
            "options": {
                "of": { "type": "array", "options": { "shape": { "id": "int" } } }
            }
        }))
        .unwrap();

        let inner = spec.options().of.as_deref().unwrap();
        let shape = inner.options().shape.as_ref().unwrap();
        assert_eq!(shape.get("id").map(FilterSpec::kind), Some("int"));
    }

    #[test]
    fn test_unknown_options_kept_in_extra() {
        let spec: FilterSpec = serde_json::from_value(json!({
            "type": "slug",
            "options": { "separator": "-" }
        }))
        .unwrap();
        assert_eq!(spec.options().extra.get("separator"), Some(&json!("-")));
    }

    #[test]
    fn test_flags_deserialize() {
        let spec: FilterSpec = serde_json::from_value(json!({
            "type": "int",
            "flags": ["ALLOW_HEX", "allow_octal"]
        }))
        .unwrap();
        assert!(spec.flags().contains(Flags::ALLOW_HEX | Flags::ALLOW_OCTAL));
        assert!(!spec.flags().contains(Flags::NULL_ON_FAILURE));

        let single: Flags = serde_json::from_value(json!("NULL_ON_FAILURE")).unwrap();
        assert_eq!(single, Flags::NULL_ON_FAILURE);

        assert!(serde_json::from_value::<Flags>(json!(["SOMETIMES"])).is_err());
    }

    #[test]
    fn test_plain_spec_serializes_bare() {
        assert_eq!(serde_json::to_value(FilterSpec::string()).unwrap(), json!("string"));
        assert_eq!(
            serde_json::to_value(FilterSpec::int().with_flags(Flags::ALLOW_HEX)).unwrap(),
            json!({ "type": "int", "options": {}, "flags": ["ALLOW_HEX"] })
        );
    }

    #[test]
    fn test_schema_from_toml_keeps_order() {
        let schema: Schema = toml::from_str(
            r#"
            zeta = "string"
            alpha = { type = "int", options = { min_range = 0 } }
            "#,
        )
        .unwrap();

        let names: Vec<_> = schema.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["zeta", "alpha"]);
        assert_eq!(
            schema.get("alpha").unwrap().options().min_range,
            Some(Number::from(0))
        );
    }

    #[test]
    fn test_builder_matches_deserialized() {
        let built = Schema::new().field("name", FilterSpec::string().trim().optional());
        let parsed: Schema = serde_json::from_value(json!({
            "name": { "type": "string", "options": { "trim": true, "optional": true } }
        }))
        .unwrap();
        assert_eq!(built, parsed);
    }
}
