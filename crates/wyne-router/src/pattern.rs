//! Anchored path patterns.
//!
//! A path specifier is a regular-expression fragment. It is always matched
//! against the whole request path, never a substring. When a base path is
//! configured it becomes a required, captured prefix group:
//!
//! ```text
//! without base path:   ^(?:PATTERN)$
//! with base path:      ^(?:(BASE)(?:PATTERN))$
//! ```
//!
//! On a match the whole-string capture is dropped, the base-path capture is
//! dropped, and every remaining group becomes a route parameter.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use parking_lot::RwLock;
use regex::Regex;
use tracing::warn;

use crate::error::{RouterError, RouterResult};
use crate::params::Params;

/// Normalizes a request path.
///
/// A single trailing slash is stripped, except for the root path. An empty
/// path becomes `/`.
///
/// ```rust
/// use wyne_router::normalize_path;
///
/// assert_eq!(normalize_path("/users/"), "/users");
/// assert_eq!(normalize_path("/users"), "/users");
/// assert_eq!(normalize_path("/"), "/");
/// assert_eq!(normalize_path(""), "/");
/// ```
#[must_use]
pub fn normalize_path(path: &str) -> &str {
    if path.is_empty() {
        return "/";
    }
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}

/// A validated base path that prefixes every route and middleware pattern.
///
/// An empty base path and `/` are equivalent and mean "no prefix".
///
/// ```rust
/// use wyne_router::BasePath;
///
/// assert!(BasePath::new("/").unwrap().is_root());
/// assert!(!BasePath::new("/api").unwrap().is_root());
/// assert!(BasePath::new("/api(").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BasePath(Option<String>);

impl BasePath {
    /// The root base path (no prefix).
    #[must_use]
    pub const fn root() -> Self {
        Self(None)
    }

    /// Validates and creates a base path.
    pub fn new(base: impl Into<String>) -> RouterResult<Self> {
        let base = base.into();
        if base.is_empty() || base == "/" {
            return Ok(Self(None));
        }
        if let Err(source) = Regex::new(&base) {
            return Err(RouterError::InvalidBasePath {
                base_path: base,
                source,
            });
        }
        Ok(Self(Some(base)))
    }

    /// Returns true if this base path adds no prefix.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_none()
    }

    /// Returns the base path as written, `/` for the root.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_deref().unwrap_or("/")
    }

    fn fragment(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl FromStr for BasePath {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for BasePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compiled path specifier.
///
/// The specifier is validated when the pattern is created. Patterns composed
/// with a base path are compiled on first use and cached per base path.
///
/// # Example
///
/// ```rust
/// use wyne_router::{BasePath, PathPattern};
///
/// let pattern = PathPattern::new(r"/users/(\d+)").unwrap();
///
/// let params = pattern.captures(&BasePath::root(), "/users/42").unwrap();
/// assert_eq!(params.get(0), Some("42"));
///
/// // Anchored at both ends
/// assert!(pattern.captures(&BasePath::root(), "/users/42/posts").is_none());
///
/// // The base path is a required prefix and never shows up in the params
/// let api = BasePath::new("/api").unwrap();
/// let params = pattern.captures(&api, "/api/users/7").unwrap();
/// assert_eq!(params.len(), 1);
/// assert_eq!(params.get(0), Some("7"));
/// assert!(pattern.captures(&api, "/users/7").is_none());
/// ```
#[derive(Debug)]
pub struct PathPattern {
    /// The specifier as registered
    source: String,
    /// Anchored regex used when no base path is configured
    anchored: Regex,
    /// Anchored regexes composed with a base path, keyed by base path
    composed: RwLock<HashMap<String, Regex>>,
}

impl PathPattern {
    /// Compiles a path specifier.
    pub fn new(spec: impl Into<String>) -> RouterResult<Self> {
        let source = spec.into();
        let anchored = match Regex::new(&format!("^(?:{source})$")) {
            Ok(regex) => regex,
            Err(err) => {
                return Err(RouterError::InvalidPattern {
                    pattern: source,
                    source: err,
                })
            }
        };

        Ok(Self {
            source,
            anchored,
            composed: RwLock::new(HashMap::new()),
        })
    }

    /// Returns the specifier as registered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Matches `path` and returns the route parameters on success.
    ///
    /// Returns `None` when the path does not match. Groups that did not take
    /// part in the match yield an empty string so positions stay stable.
    #[must_use]
    pub fn captures(&self, base: &BasePath, path: &str) -> Option<Params> {
        match base.fragment() {
            None => extract(&self.anchored, path, 1),
            Some(fragment) => {
                let regex = self.composed_for(fragment)?;
                extract(&regex, path, 2)
            }
        }
    }

    /// Returns true if `path` matches, without extracting parameters.
    #[must_use]
    pub fn is_match(&self, base: &BasePath, path: &str) -> bool {
        match base.fragment() {
            None => self.anchored.is_match(path),
            Some(fragment) => self
                .composed_for(fragment)
                .is_some_and(|regex| regex.is_match(path)),
        }
    }

    fn composed_for(&self, fragment: &str) -> Option<Regex> {
        if let Some(regex) = self.composed.read().get(fragment) {
            return Some(regex.clone());
        }

        match Regex::new(&format!("^(?:({fragment})(?:{}))$", self.source)) {
            Ok(regex) => {
                let mut cache = self.composed.write();
                Some(cache.entry(fragment.to_string()).or_insert(regex).clone())
            }
            Err(err) => {
                // Both halves compile alone; this only happens on clashing group names.
                warn!(
                    pattern = %self.source,
                    base_path = fragment,
                    error = %err,
                    "cannot compose pattern with base path, treating as no match"
                );
                None
            }
        }
    }
}

impl Clone for PathPattern {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            anchored: self.anchored.clone(),
            composed: RwLock::new(HashMap::new()),
        }
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn extract(regex: &Regex, path: &str, skip: usize) -> Option<Params> {
    let captures = regex.captures(path)?;
    let mut params = Params::with_capacity(regex.captures_len().saturating_sub(skip));

    for (index, name) in regex.capture_names().enumerate().skip(skip) {
        let value = captures.get(index).map_or("", |m| m.as_str());
        match name {
            Some(name) => params.push_named(name, value),
            None => params.push(value),
        }
    }

    Some(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn root() -> BasePath {
        BasePath::root()
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/a/b/"), "/a/b");
        assert_eq!(normalize_path("/a/b"), "/a/b");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path(""), "/");
        // Only a single slash is stripped
        assert_eq!(normalize_path("/a//"), "/a/");
    }

    #[test]
    fn test_literal_pattern() {
        let pattern = PathPattern::new("/users").unwrap();
        assert!(pattern.is_match(&root(), "/users"));
        assert!(!pattern.is_match(&root(), "/users/1"));
        assert!(!pattern.is_match(&root(), "/api/users"));
    }

    #[test]
    fn test_alternation_is_fully_anchored() {
        let pattern = PathPattern::new("/a|/b").unwrap();
        assert!(pattern.is_match(&root(), "/a"));
        assert!(pattern.is_match(&root(), "/b"));
        assert!(!pattern.is_match(&root(), "/a/x"));
        assert!(!pattern.is_match(&root(), "/x/b"));
    }

    #[test]
    fn test_captures_in_order() {
        let pattern = PathPattern::new(r"/orgs/([^/]+)/users/(\d+)").unwrap();
        let params = pattern.captures(&root(), "/orgs/acme/users/123").unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params.get(0), Some("acme"));
        assert_eq!(params.get(1), Some("123"));
    }

    #[test]
    fn test_named_groups() {
        let pattern = PathPattern::new(r"/posts/(?<slug>[a-z-]+)").unwrap();
        let params = pattern.captures(&root(), "/posts/hello-world").unwrap();
        assert_eq!(params.get(0), Some("hello-world"));
        assert_eq!(params.named("slug"), Some("hello-world"));
    }

    #[test]
    fn test_unmatched_optional_group_is_empty() {
        let pattern = PathPattern::new(r"/files(/(\w+))?").unwrap();
        let params = pattern.captures(&root(), "/files").unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params.get(0), Some(""));
        assert_eq!(params.get(1), Some(""));
    }

    #[test]
    fn test_base_path_is_required_and_discarded() {
        let base = BasePath::new("/api/v1").unwrap();
        let pattern = PathPattern::new(r"/items/(\d+)").unwrap();

        let params = pattern.captures(&base, "/api/v1/items/9").unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params.get(0), Some("9"));

        assert!(pattern.captures(&base, "/items/9").is_none());
        assert!(pattern.captures(&base, "/api/v1/items/9/x").is_none());
    }

    #[test]
    fn test_root_base_path_adds_nothing() {
        let pattern = PathPattern::new("/").unwrap();
        assert!(pattern.is_match(&BasePath::new("").unwrap(), "/"));
        assert!(pattern.is_match(&BasePath::new("/").unwrap(), "/"));
    }

    #[test]
    fn test_composed_pattern_is_cached() {
        let base = BasePath::new("/api").unwrap();
        let pattern = PathPattern::new("/health").unwrap();
        assert!(pattern.is_match(&base, "/api/health"));
        assert!(pattern.is_match(&base, "/api/health"));
        assert_eq!(pattern.composed.read().len(), 1);
    }

    #[test]
    fn test_clashing_group_names_never_match() {
        let base = BasePath::new("/(?<v>v1)").unwrap();
        let pattern = PathPattern::new("/(?<v>x)").unwrap();
        assert!(pattern.captures(&base, "/v1/x").is_none());
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = PathPattern::new("/users/(").unwrap_err();
        assert!(matches!(err, RouterError::InvalidPattern { .. }));
    }

    #[test]
    fn test_clone_keeps_matching() {
        let pattern = PathPattern::new(r"/a/(\d)").unwrap();
        let cloned = pattern.clone();
        assert_eq!(cloned.as_str(), r"/a/(\d)");
        assert!(cloned.is_match(&root(), "/a/1"));
    }

    proptest! {
        #[test]
        fn prop_literal_matches_only_itself(
            segments in prop::collection::vec("[a-z0-9]{1,8}", 1..4),
            suffix in "[a-z0-9]{1,4}",
        ) {
            let path = format!("/{}", segments.join("/"));
            let pattern = PathPattern::new(regex::escape(&path)).unwrap();

            prop_assert!(pattern.is_match(&BasePath::root(), &path));
            let extended = format!("{path}/{suffix}");
            prop_assert!(!pattern.is_match(&BasePath::root(), &extended));
            let prefixed = format!("/{suffix}{path}");
            prop_assert!(!pattern.is_match(&BasePath::root(), &prefixed));
        }

        #[test]
        fn prop_captures_follow_segments(values in prop::collection::vec("[a-z0-9]{1,8}", 1..5)) {
            let spec = "/([^/]+)".repeat(values.len());
            let path = format!("/{}", values.join("/"));
            let pattern = PathPattern::new(spec).unwrap();
            let base = BasePath::new("/base").unwrap();

            let params = pattern.captures(&base, &format!("/base{path}")).unwrap();
            let captured: Vec<&str> = params.values().collect();
            let expected: Vec<&str> = values.iter().map(String::as_str).collect();
            prop_assert_eq!(captured, expected);
        }
    }
}
