//! Route parameter storage.
//!
//! Captures produced by a [`PathPattern`](crate::PathPattern) are stored in
//! match order. Every capture is addressable by its position; captures that
//! came from a named group (`(?<id>...)`) are also addressable by name.

use smallvec::SmallVec;

/// Maximum number of parameters stored inline (stack allocated).
const INLINE_PARAMS: usize = 4;

/// Ordered route parameters captured from a path pattern.
///
/// # Example
///
/// ```rust
/// use wyne_router::Params;
///
/// let mut params = Params::new();
/// params.push("42");
/// params.push_named("slug", "hello-world");
///
/// assert_eq!(params.get(0), Some("42"));
/// assert_eq!(params.get(1), Some("hello-world"));
/// assert_eq!(params.named("slug"), Some("hello-world"));
/// assert_eq!(params.named("unknown"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    /// Storage for (optional group name, captured value) pairs
    inner: SmallVec<[(Option<String>, String); INLINE_PARAMS]>,
}

impl Params {
    /// Creates a new empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a params set with the given capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: SmallVec::with_capacity(capacity),
        }
    }

    /// Appends an unnamed capture.
    pub fn push(&mut self, value: impl Into<String>) {
        self.inner.push((None, value.into()));
    }

    /// Appends a capture that came from a named group.
    pub fn push_named(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push((Some(name.into()), value.into()));
    }

    /// Returns the capture at `index` (zero-based, left to right).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.inner.get(index).map(|(_, v)| v.as_str())
    }

    /// Returns the value of the first capture with the given group name.
    #[must_use]
    pub fn named(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n.as_deref() == Some(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns an iterator over `(name, value)` pairs in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (Option<&str>, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_deref(), v.as_str()))
    }

    /// Returns an iterator over the captured values in order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.inner.iter().map(|(_, v)| v.as_str())
    }

    /// Clears all parameters, retaining allocated capacity.
    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

impl FromIterator<(Option<String>, String)> for Params {
    fn from_iter<I: IntoIterator<Item = (Option<String>, String)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<String> for Params {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().map(|v| (None, v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_new() {
        let params = Params::new();
        assert!(params.is_empty());
        assert_eq!(params.len(), 0);
        assert_eq!(params.get(0), None);
    }

    #[test]
    fn test_positional_and_named_lookup() {
        let mut params = Params::new();
        params.push("acme");
        params.push_named("user", "123");

        assert_eq!(params.get(0), Some("acme"));
        assert_eq!(params.get(1), Some("123"));
        assert_eq!(params.named("user"), Some("123"));
        assert_eq!(params.named("acme"), None);
    }

    #[test]
    fn test_params_iter_keeps_order() {
        let mut params = Params::new();
        params.push("a");
        params.push_named("b", "2");

        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, vec![(None, "a"), (Some("b"), "2")]);

        let values: Vec<_> = params.values().collect();
        assert_eq!(values, vec!["a", "2"]);
    }

    #[test]
    fn test_params_clear() {
        let mut params = Params::new();
        params.push("1");
        params.push("2");

        params.clear();
        assert!(params.is_empty());
    }

    #[test]
    fn test_params_from_values() {
        let params: Params = vec!["x".to_string(), "y".to_string()].into_iter().collect();
        assert_eq!(params.len(), 2);
        assert_eq!(params.get(1), Some("y"));
    }

    #[test]
    fn test_params_many_params() {
        // More than INLINE_PARAMS spills to the heap
        let mut params = Params::new();
        for i in 0..10 {
            params.push(format!("value{i}"));
        }

        assert_eq!(params.len(), 10);
        assert_eq!(params.get(5), Some("value5"));
    }
}
