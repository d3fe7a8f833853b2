//! Per-request extension slot.
//!
//! Middleware attach arbitrary typed values to a request under a string key.
//! Later middleware and the route handler read them back by key and type.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

/// A string-keyed map of typed values.
///
/// A lookup succeeds only when both the key and the stored type match.
///
/// # Example
///
/// ```
/// use wyne_core::Extensions;
///
/// #[derive(Debug, PartialEq)]
/// struct User {
///     name: String,
/// }
///
/// let mut ext = Extensions::new();
/// ext.insert("user", User { name: "alice".into() });
///
/// assert_eq!(ext.get::<User>("user").unwrap().name, "alice");
/// assert!(ext.get::<String>("user").is_none());
/// assert!(ext.get::<User>("admin").is_none());
/// ```
#[derive(Default)]
pub struct Extensions {
    map: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl Extensions {
    /// Creates an empty extension map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, replacing whatever was there.
    ///
    /// Returns true if a previous value was replaced.
    pub fn insert<T: Send + Sync + 'static>(&mut self, key: impl Into<String>, value: T) -> bool {
        self.map.insert(key.into(), Box::new(value)).is_some()
    }

    /// Returns the value stored under `key` if it has type `T`.
    #[must_use]
    pub fn get<T: Send + Sync + 'static>(&self, key: &str) -> Option<&T> {
        self.map.get(key).and_then(|v| v.downcast_ref())
    }

    /// Returns a mutable reference to the value stored under `key` if it has type `T`.
    pub fn get_mut<T: Send + Sync + 'static>(&mut self, key: &str) -> Option<&mut T> {
        self.map.get_mut(key).and_then(|v| v.downcast_mut())
    }

    /// Removes and returns the value under `key` if it has type `T`.
    ///
    /// A value of a different type is left in place.
    pub fn remove<T: Send + Sync + 'static>(&mut self, key: &str) -> Option<T> {
        if !self.map.get(key).is_some_and(|v| v.is::<T>()) {
            return None;
        }
        self.map
            .remove(key)
            .and_then(|v| v.downcast().ok())
            .map(|b| *b)
    }

    /// Returns true if any value is stored under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Returns the number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl fmt::Debug for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.map.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("Extensions").field("keys", &keys).finish()
    }
}
