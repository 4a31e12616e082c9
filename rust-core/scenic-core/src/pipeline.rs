//! # Handler Pipeline
//!
//! Runs the stack resolved for a request: middleware first, the route
//! handler last, strictly one after another.
//!
//! Each handler returns a [`Flow`]:
//!
//! - `Ok(Flow::Next)` advances to the next element
//! - `Ok(Flow::Done)` ends the chain
//! - `Err(HandlerError)` aborts the rest of the stack and replays the error
//!   through the error middleware, with the same discipline
//!
//! A handler that panics is treated as returning an error.
//!
//! ## Design Principles (SOLID)
//!
//! - **S**: The pipeline only sequences handlers, matching happens elsewhere
//! - **O**: Extensible via plain closures, no trait to implement
//! - **D**: Dispatch depends on [`Pipeline`], not on concrete handlers

use crate::request::Request;
use crate::response::Response;
use serde::Serialize;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{info, warn};

/// Message used when an error carries none
pub const DEFAULT_ERROR_MESSAGE: &str = "An unknown error occurred.";

/// Message of the default "not found" error
pub const NOT_FOUND_MESSAGE: &str = "The page you are looking for could not be found.";

/// What a handler wants the pipeline to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Continue with the next handler
    Next,
    /// Stop, the response is complete
    Done,
}

/// Outcome of one handler invocation
pub type HandlerResult = std::result::Result<Flow, HandlerError>;

/// Route handler or middleware
pub type Handler = Arc<dyn Fn(&mut Request, &mut Response) -> HandlerResult + Send + Sync>;

/// Error middleware, invoked with the error that aborted the main stack
pub type ErrorHandler =
    Arc<dyn Fn(&HandlerError, &mut Request, &mut Response) -> HandlerResult + Send + Sync>;

/// Wrap a closure as a [`Handler`]
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&mut Request, &mut Response) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a closure as an [`ErrorHandler`]
pub fn error_handler<F>(f: F) -> ErrorHandler
where
    F: Fn(&HandlerError, &mut Request, &mut Response) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Error raised by a handler at dispatch time
///
/// Unset fields are filled in by [`HandlerError::normalize`] before the error
/// reaches error middleware.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HandlerError {
    /// HTTP-style status code
    pub status: Option<u16>,
    /// Human-readable message
    pub message: Option<String>,
    /// Extra data, e.g. the requested path for "not found"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl HandlerError {
    /// Create an error with a status and message
    #[must_use]
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: Some(message.into()),
            meta: None,
        }
    }

    /// Create a 500 error with the given message
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(500, message)
    }

    /// The default "not found" error, carrying the requested path as meta
    #[must_use]
    pub fn not_found(path: &str) -> Self {
        Self::new(404, NOT_FOUND_MESSAGE).with_meta(serde_json::json!({ "path": path }))
    }

    /// Attach meta data
    #[must_use]
    pub fn with_meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Fill in the default message and status
    #[must_use]
    pub fn normalize(mut self) -> Self {
        self.message.get_or_insert_with(|| DEFAULT_ERROR_MESSAGE.to_string());
        self.status.get_or_insert(500);
        self
    }

    /// Status code, 500 if unset
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status.unwrap_or(500)
    }

    /// Message, the default message if unset
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or(DEFAULT_ERROR_MESSAGE)
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), self.status_code())
    }
}

impl std::error::Error for HandlerError {}

/// How a pipeline run ended
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// A handler returned [`Flow::Done`]
    Finished,
    /// Every handler returned [`Flow::Next`]
    Exhausted,
    /// The error went through all error middleware unhandled
    Unhandled(HandlerError),
}

/// One request's walk through a stack and the error middleware
pub struct Pipeline<'a> {
    stack: &'a [Handler],
    error_stack: &'a [ErrorHandler],
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline over a resolved stack
    #[must_use]
    pub fn new(stack: &'a [Handler], error_stack: &'a [ErrorHandler]) -> Self {
        Self { stack, error_stack }
    }

    /// Run the stack in order
    pub fn run(&self, req: &mut Request, res: &mut Response) -> Completion {
        for step in self.stack {
            match invoke(|| step(req, res)) {
                Ok(Flow::Next) => {}
                Ok(Flow::Done) => return Completion::Finished,
                Err(err) => return self.fail(err, req, res),
            }
        }
        Completion::Exhausted
    }

    /// Replay `err` through the error middleware
    pub fn fail(&self, err: HandlerError, req: &mut Request, res: &mut Response) -> Completion {
        let mut err = err.normalize();
        warn!(
            method = %req.method,
            path = %req.path,
            status = err.status_code(),
            error = err.message(),
            "Handler error"
        );

        for step in self.error_stack {
            match invoke(|| step(&err, req, res)) {
                Ok(Flow::Next) => {}
                Ok(Flow::Done) => return Completion::Finished,
                Err(next) => err = next.normalize(),
            }
        }
        Completion::Unhandled(err)
    }
}

/// Call a handler, turning a panic into a 500 error
fn invoke<F>(f: F) -> HandlerResult
where
    F: FnOnce() -> HandlerResult,
{
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned());
        warn!(panic = ?message, "Handler panicked");
        Err(HandlerError {
            status: Some(500),
            message,
            meta: None,
        })
    })
}

/// Generic completion handler, run when no handler finished the response
///
/// Without an error the request gets a plain 404, with an error it gets the
/// error's status and a JSON body.
pub fn complete(completion: Completion, req: &Request, res: &mut Response) {
    if res.is_finished() {
        return;
    }
    match completion {
        Completion::Finished => {}
        Completion::Exhausted => {
            res.status = 404;
            res.content_type = "text/plain; charset=utf-8".to_string();
            res.end(format!("Cannot {} {}", req.method, req.path));
        }
        Completion::Unhandled(err) => {
            res.status = err.status_code();
            let body = serde_json::json!({
                "error": err.message(),
                "status": err.status_code(),
                "meta": err.meta,
            });
            if res.send_json(&body).is_err() {
                res.end(err.message().to_string());
            }
        }
    }
}

/// Request logging middleware
///
/// Logs method, path and request id, then passes control on.
pub fn logging() -> Handler {
    handler(|req, _res| {
        let request_id = req.header("x-request-id").unwrap_or("-");
        info!(
            method = %req.method,
            path = %req.path,
            request_id = %request_id,
            params = ?req.params,
            "Request received"
        );
        Ok(Flow::Next)
    })
}
