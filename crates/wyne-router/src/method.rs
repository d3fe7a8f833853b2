//! HTTP method filters.
//!
//! This module provides [`MethodFilter`], the method a route is registered
//! for. A filter is either one of the nine standard HTTP verbs or
//! [`MethodFilter::All`], which matches any request method.

use std::fmt;
use std::str::FromStr;

use http::Method;

use crate::error::RouterError;

/// The request method a route answers to.
///
/// Comparison against the request method is case-insensitive.
///
/// # Example
///
/// ```rust
/// use wyne_router::MethodFilter;
/// use http::Method;
///
/// let filter: MethodFilter = "get".parse().unwrap();
/// assert!(filter.matches(&Method::GET));
/// assert!(!filter.matches(&Method::POST));
///
/// assert!(MethodFilter::All.matches(&Method::DELETE));
/// assert!("FETCH".parse::<MethodFilter>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodFilter {
    /// Matches every method
    All,
    /// GET
    Get,
    /// HEAD
    Head,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
    /// CONNECT
    Connect,
    /// OPTIONS
    Options,
    /// TRACE
    Trace,
    /// PATCH
    Patch,
}

impl MethodFilter {
    /// Every filter, wildcard first.
    pub const ALL_FILTERS: [Self; 10] = [
        Self::All,
        Self::Get,
        Self::Head,
        Self::Post,
        Self::Put,
        Self::Delete,
        Self::Connect,
        Self::Options,
        Self::Trace,
        Self::Patch,
    ];

    /// Returns the canonical name: `all` for the wildcard, the upper-case verb
    /// otherwise.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Connect => "CONNECT",
            Self::Options => "OPTIONS",
            Self::Trace => "TRACE",
            Self::Patch => "PATCH",
        }
    }

    /// Returns true if this filter accepts `method`.
    #[must_use]
    pub fn matches(&self, method: &Method) -> bool {
        match self {
            Self::All => true,
            verb => verb.as_str().eq_ignore_ascii_case(method.as_str()),
        }
    }

    /// Returns true if this is the wildcard filter.
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl FromStr for MethodFilter {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL_FILTERS
            .into_iter()
            .find(|filter| filter.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| RouterError::UnknownMethod(s.to_string()))
    }
}

impl From<&Method> for MethodFilter {
    /// Converts a request method; non-standard methods become the wildcard.
    fn from(method: &Method) -> Self {
        match *method {
            Method::GET => Self::Get,
            Method::HEAD => Self::Head,
            Method::POST => Self::Post,
            Method::PUT => Self::Put,
            Method::DELETE => Self::Delete,
            Method::CONNECT => Self::Connect,
            Method::OPTIONS => Self::Options,
            Method::TRACE => Self::Trace,
            Method::PATCH => Self::Patch,
            _ => Self::All,
        }
    }
}

impl fmt::Display for MethodFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
