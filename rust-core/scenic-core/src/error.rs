//! # Error Handling
//!
//! Centralized error types for scenic core.
//! Uses `thiserror` for ergonomic error definitions.
//!
//! Registration-time failures (`MalformedRoute`, `InvalidPattern`,
//! `Controller`, `UnknownMiddleware`) are raised eagerly so that a broken
//! route table never reaches dispatch. Dispatch-time failures raised by
//! handlers are [`crate::pipeline::HandlerError`] values instead.

use crate::router::Method;
use thiserror::Error;

/// Result type alias for scenic operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the scenic runtime
#[derive(Error, Debug)]
pub enum Error {
    /// Server failed to bind to the specified address
    #[error("Failed to bind server to {address}: {source}")]
    BindError {
        /// The address we tried to bind to
        address: String,
        /// The underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// No registered route matches the requested verb and path
    #[error("No route found for {method} {path}")]
    RouteNotFound {
        /// The requested verb
        method: Method,
        /// The path that wasn't matched
        path: String,
    },

    /// A route declaration cannot be compiled into the tree
    #[error("Malformed route {path}: {reason}")]
    MalformedRoute {
        /// The offending route path
        path: String,
        /// Reason for invalidity
        reason: String,
    },

    /// A parameter constraint is not a valid regular expression
    #[error("Invalid pattern for parameter '{param}': {source}")]
    InvalidPattern {
        /// Parameter the pattern was declared for
        param: String,
        /// The regex compiler error
        #[source]
        source: regex::Error,
    },

    /// A controller or controller action could not be resolved
    #[error("Cannot resolve controller action '{reference}': {reason}")]
    Controller {
        /// The controller reference (`Controller` or `Controller@method`)
        reference: String,
        /// Reason for the failure
        reason: String,
    },

    /// A middleware was referenced by a name that was never defined
    #[error("Unknown middleware '{name}'")]
    UnknownMiddleware {
        /// The undefined middleware name
        name: String,
    },

    /// HTTP protocol error
    #[error("HTTP error: {0}")]
    Http(#[from] hyper::Error),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Request payload too large
    #[error("Payload too large: limit={limit} bytes, received={actual} bytes")]
    PayloadTooLarge {
        /// Max allowed size
        limit: usize,
        /// Actual size
        actual: usize,
    },
}

impl Error {
    /// Shorthand for a [`Error::MalformedRoute`]
    pub(crate) fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedRoute {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`Error::Controller`]
    pub(crate) fn controller(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Controller {
            reference: reference.into(),
            reason: reason.into(),
        }
    }
}
