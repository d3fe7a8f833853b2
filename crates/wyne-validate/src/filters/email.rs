use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::{default_or_invalid, present, Filter, FilterResult};
use crate::schema::FilterSpec;
use crate::Validator;

const LOCAL_PART: &str = r"[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*";
const DOMAIN: &str = r"(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}";

static ADDRESS: OnceLock<Regex> = OnceLock::new();

fn address() -> &'static Regex {
    ADDRESS.get_or_init(|| {
        Regex::new(&format!("^{LOCAL_PART}@{DOMAIN}$")).expect("email pattern is valid")
    })
}

/// Accepts dot-atom email addresses with a dotted domain.
///
/// The local part is limited to 64 characters and the address to 254.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailFilter;

impl Filter for EmailFilter {
    fn apply(&self, value: Option<&Value>, spec: &FilterSpec, _validator: &Validator) -> FilterResult {
        let Some(Value::String(text)) = present(value) else {
            return default_or_invalid(spec);
        };

        let local_len = text.rfind('@').unwrap_or(0);
        if text.len() <= 254 && local_len <= 64 && address().is_match(text) {
            Ok(Value::String(text.clone()))
        } else {
            default_or_invalid(spec)
        }
    }
}
