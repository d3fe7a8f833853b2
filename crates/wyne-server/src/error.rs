//! Dispatcher error types.

use thiserror::Error;
use wyne_router::{MethodFilter, RouterError};

/// Result type for dispatcher construction.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Errors raised while building a [`Dispatcher`](crate::Dispatcher).
///
/// Dispatch itself never fails: not-found, method-not-allowed and halted
/// requests are reported through [`DispatchOutcome`](crate::DispatchOutcome).
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A route path specifier does not compile.
    #[error("invalid route {method}: {source}")]
    InvalidRoute {
        /// Method the route was registered for.
        method: MethodFilter,
        /// The underlying pattern error.
        #[source]
        source: RouterError,
    },

    /// A middleware scope does not compile.
    #[error("invalid middleware scope: {source}")]
    InvalidScope {
        /// The underlying pattern error.
        #[source]
        source: RouterError,
    },

    /// The base path does not compile.
    #[error("invalid base path: {0}")]
    InvalidBasePath(#[source] RouterError),

    /// A route descriptor names an unknown method.
    #[error("invalid route descriptor for '{path}': {source}")]
    InvalidDescriptor {
        /// Path of the rejected descriptor.
        path: String,
        /// The underlying parse error.
        #[source]
        source: RouterError,
    },
}
