//! # Controllers
//!
//! A controller is an ordered `method-name -> handler` mapping. Controller
//! routes register every method whose name starts with a verb token:
//!
//! - `getIndex` -> `GET {path}`
//! - `getSomeGreeting` -> `GET {path}/some-greeting`
//! - `postForm` -> `POST {path}/form`
//!
//! Resolution is pluggable through [`ControllerResolver`];
//! [`ControllerRegistry`] is the in-memory implementation.

use crate::action::MiddlewareRef;
use crate::error::{Error, Result};
use crate::pattern;
use crate::pipeline::Handler;
use std::collections::HashMap;

/// Maps controller names to their actions
pub trait ControllerResolver: Send + Sync {
    /// All actions of `controller`, in declaration order
    ///
    /// `namespace` is the enclosing group's namespace (e.g. `Admin`).
    ///
    /// # Errors
    ///
    /// Returns `Error::Controller` if the controller is unknown.
    fn actions(&self, controller: &str, namespace: &str) -> Result<Vec<(String, Handler)>>;

    /// One action of `controller`
    ///
    /// # Errors
    ///
    /// Returns `Error::Controller` if the controller or method is unknown.
    fn action(&self, controller: &str, method: &str, namespace: &str) -> Result<Handler> {
        self.actions(controller, namespace)?
            .into_iter()
            .find(|(name, _)| name == method)
            .map(|(_, handler)| handler)
            .ok_or_else(|| {
                Error::controller(
                    format!("{controller}@{method}"),
                    "controller has no such method",
                )
            })
    }
}

/// Ordered actions of one controller
#[derive(Clone, Default)]
pub struct Controller {
    methods: Vec<(String, Handler)>,
}

impl Controller {
    /// Create a controller without methods
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a method
    #[must_use]
    pub fn method(mut self, name: impl Into<String>, handler: Handler) -> Self {
        self.methods.push((name.into(), handler));
        self
    }

    /// Method names, in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.methods.iter().map(|(name, _)| name.as_str())
    }
}

/// In-memory controller lookup, keyed by namespaced name
///
/// `Somewhere/FourthController` registered here is found both as
/// `Somewhere/FourthController` at the root and as `FourthController` inside
/// a group with namespace `Somewhere`.
#[derive(Clone, Default)]
pub struct ControllerRegistry {
    controllers: HashMap<String, Controller>,
}

impl ControllerRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a controller under `name` (may contain a namespace path)
    pub fn register(&mut self, name: &str, controller: Controller) {
        self.controllers.insert(pattern::join("/", name), controller);
    }
}

impl ControllerResolver for ControllerRegistry {
    fn actions(&self, controller: &str, namespace: &str) -> Result<Vec<(String, Handler)>> {
        let key = pattern::join(namespace, controller);
        self.controllers
            .get(&key)
            .map(|c| c.methods.clone())
            .ok_or_else(|| Error::controller(key.trim_start_matches('/'), "unknown controller"))
    }
}

/// Middleware and name for one controller method
#[derive(Clone, Default)]
pub struct ActionOptions {
    /// Middleware run before the method
    pub middleware: Vec<MiddlewareRef>,
    /// Route name
    pub name: Option<String>,
}

impl ActionOptions {
    /// Empty options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one middleware
    #[must_use]
    pub fn middleware(mut self, middleware: impl Into<MiddlewareRef>) -> Self {
        self.middleware.push(middleware.into());
        self
    }

    /// Name the route
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Per-method options of a controller registration
#[derive(Clone, Default)]
pub struct ControllerOptions {
    actions: HashMap<String, ActionOptions>,
}

impl ControllerOptions {
    /// No per-method options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for the method called `method`
    #[must_use]
    pub fn action(mut self, method: impl Into<String>, options: ActionOptions) -> Self {
        self.actions.insert(method.into(), options);
        self
    }

    /// Options registered for `method`
    #[must_use]
    pub fn get(&self, method: &str) -> Option<&ActionOptions> {
        self.actions.get(method)
    }
}

/// Convert a method-name remainder to a kebab-case path segment
///
/// Word boundaries are case changes, letter/digit changes and any
/// non-alphanumeric character: `SomeGreeting` -> `some-greeting`,
/// `HTMLPage2` -> `html-page-2`.
#[must_use]
pub fn kebab_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if let Some(prev) = current.chars().last() {
            let next = chars.get(i + 1).copied();
            let boundary = (prev.is_lowercase() && c.is_uppercase())
                || (prev.is_alphabetic() && c.is_numeric())
                || (prev.is_numeric() && c.is_alphabetic())
                || (prev.is_uppercase()
                    && c.is_uppercase()
                    && next.is_some_and(char::is_lowercase));
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}
