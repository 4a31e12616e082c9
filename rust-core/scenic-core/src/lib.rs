//! # Scenic Core
//!
//! Core library of the scenic request router.
//! Compiles declared routes into per-verb segment tries, resolves a request to
//! an ordered handler stack plus bound parameters, and generates paths back
//! from route names.
//!
//! ## Architecture
//!
//! Registration and dispatch are two separate phases. A [`Router`] is built
//! on one thread through [`Scope`] handles, then frozen into a [`Dispatcher`]
//! that only reads it and can be shared by any number of request tasks.
//!
//! ## Modules
//!
//! - `pattern` - Segment classification, path joining, default constraints
//! - `tree` - Segment trie and matcher
//! - `action` - Action shapes and their normalization
//! - `router` - Routing namespace and registration API
//! - `controller` - Controller lookup and kebab-case method routes
//! - `url` - Name registry and URL generation
//! - `statics` - Longest-prefix resolution of served directories
//! - `static_files` - Directory serving handler
//! - `pipeline` - Handler stack execution and error middleware
//! - `dispatch` - Transport-independent request dispatch
//! - `server` - HTTP server built on Hyper
//! - `request` - HTTP request with params, query, headers and extensions
//! - `response` - HTTP response sink
//! - `error` - Error types and handling

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod action;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod pattern;
pub mod pipeline;
pub mod request;
pub mod response;
pub mod router;
pub mod server;
pub mod static_files;
pub mod statics;
pub mod tree;
pub mod url;

pub use action::{Action, MiddlewareRef, RouteAction, Uses};
pub use controller::{
    ActionOptions, Controller, ControllerOptions, ControllerRegistry, ControllerResolver,
};
pub use dispatch::Dispatcher;
pub use error::{Error, Result};
pub use pattern::{PatternRegistry, Segment};
pub use pipeline::{
    error_handler, handler, logging, Completion, ErrorHandler, Flow, Handler, HandlerError,
    HandlerResult, Pipeline, DEFAULT_ERROR_MESSAGE, NOT_FOUND_MESSAGE,
};
pub use request::Request;
pub use response::Response;
pub use router::{GroupOptions, Method, RouteMatch, Router, Scope, Verb};
pub use server::{init_tracing, Server, ServerConfig};
pub use static_files::{ServeOptions, StaticDir};
pub use statics::{StaticRoutes, Stack};
pub use tree::RouteTree;
pub use url::{NameRegistry, UrlParam};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, "0.1.1");
    }
}
