//! # Route Actions
//!
//! Everything a registration call accepts as "what to run", and the
//! normalization of it into one canonical [`ActionDescriptor`].
//!
//! ## Accepted shapes
//!
//! - a bare [`Handler`]
//! - a `"Controller@method"` reference, resolved through the router's
//!   [`ControllerResolver`]
//! - a [`RouteAction`] descriptor with `uses`, middleware, name and
//!   per-parameter constraints
//!
//! Normalization happens once per registration call. Every failure is
//! reported there, never at dispatch time.

use crate::controller::ControllerResolver;
use crate::error::{Error, Result};
use crate::pattern;
use crate::pipeline::Handler;
use regex::Regex;
use std::collections::HashMap;

/// Middleware given directly or by a name defined on the router
#[derive(Clone)]
pub enum MiddlewareRef {
    /// A handler value
    Handler(Handler),
    /// A name registered with `Router::alias_middleware`
    Named(String),
}

impl From<Handler> for MiddlewareRef {
    fn from(handler: Handler) -> Self {
        Self::Handler(handler)
    }
}

impl From<&str> for MiddlewareRef {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for MiddlewareRef {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

/// The final handler of a [`RouteAction`]
#[derive(Clone)]
pub enum Uses {
    /// A handler value
    Handler(Handler),
    /// A `"Controller@method"` reference
    Controller(String),
}

impl From<Handler> for Uses {
    fn from(handler: Handler) -> Self {
        Self::Handler(handler)
    }
}

impl From<&str> for Uses {
    fn from(reference: &str) -> Self {
        Self::Controller(reference.to_string())
    }
}

impl From<String> for Uses {
    fn from(reference: String) -> Self {
        Self::Controller(reference)
    }
}

/// Route descriptor as declared by the application
///
/// ```ignore
/// RouteAction::uses(show_user)
///     .middleware(auth)
///     .name("users.show")
///     .constrain("id", r"\d+")
/// ```
#[derive(Clone, Default)]
pub struct RouteAction {
    /// Final handler, required
    pub uses: Option<Uses>,
    /// Per-route middleware, run after the scope's middleware
    pub middleware: Vec<MiddlewareRef>,
    /// Route name for URL generation
    pub name: Option<String>,
    /// `parameter -> regex source` constraints
    pub constraints: Vec<(String, String)>,
}

impl RouteAction {
    /// Empty descriptor; registering it without `uses` fails
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptor with its final handler
    #[must_use]
    pub fn uses(uses: impl Into<Uses>) -> Self {
        Self {
            uses: Some(uses.into()),
            ..Self::default()
        }
    }

    /// Set the final handler
    #[must_use]
    pub fn with_uses(mut self, uses: impl Into<Uses>) -> Self {
        self.uses = Some(uses.into());
        self
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

    /// Constrain a parameter to a regex
    #[must_use]
    pub fn constrain(mut self, param: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.constraints.push((param.into(), pattern.into()));
        self
    }
}

/// Any action shape accepted by a registration call
#[derive(Clone)]
pub enum Action {
    /// Bare handler
    Handler(Handler),
    /// `"Controller@method"` reference
    Controller(String),
    /// Full descriptor
    Route(RouteAction),
}

impl From<Handler> for Action {
    fn from(handler: Handler) -> Self {
        Self::Handler(handler)
    }
}

impl From<&str> for Action {
    fn from(reference: &str) -> Self {
        Self::Controller(reference.to_string())
    }
}

impl From<String> for Action {
    fn from(reference: String) -> Self {
        Self::Controller(reference)
    }
}

impl From<RouteAction> for Action {
    fn from(action: RouteAction) -> Self {
        Self::Route(action)
    }
}

/// Canonical action, consumed by the tree builder
#[derive(Clone)]
pub struct ActionDescriptor {
    /// Per-route middleware
    pub middleware: Vec<Handler>,
    /// Final handler
    pub handler: Handler,
    /// Fully prefixed route name
    pub name: Option<String>,
    /// Compiled constraints
    pub constraints: HashMap<String, Regex>,
}

/// Lookup context for normalizing actions inside one scope
pub(crate) struct Normalizer<'a> {
    pub middleware: &'a HashMap<String, Handler>,
    pub controllers: Option<&'a dyn ControllerResolver>,
    pub namespace: &'a str,
    pub name_prefix: &'a str,
}

impl Normalizer<'_> {
    /// Turn any accepted action shape into an [`ActionDescriptor`]
    pub fn normalize(&self, path: &str, action: Action) -> Result<ActionDescriptor> {
        let action = match action {
            Action::Handler(handler) => RouteAction::uses(handler),
            Action::Controller(reference) => RouteAction::uses(reference),
            Action::Route(action) => action,
        };

        let Some(uses) = action.uses else {
            return Err(Error::malformed(
                path,
                "route action is missing its handler (`uses`)",
            ));
        };

        let handler = match uses {
            Uses::Handler(handler) => handler,
            Uses::Controller(reference) => self.controller_action(&reference)?,
        };

        let constraints = action
            .constraints
            .iter()
            .map(|(param, source)| Ok((param.clone(), pattern::compile(param, source)?)))
            .collect::<Result<HashMap<_, _>>>()?;

        Ok(ActionDescriptor {
            middleware: self.resolve_middleware(action.middleware)?,
            handler,
            name: action.name.map(|name| format!("{}{name}", self.name_prefix)),
            constraints,
        })
    }

    /// Resolve middleware references against the router's named middleware
    pub fn resolve_middleware(&self, refs: Vec<MiddlewareRef>) -> Result<Vec<Handler>> {
        refs.into_iter()
            .map(|m| match m {
                MiddlewareRef::Handler(handler) => Ok(handler),
                MiddlewareRef::Named(name) => self
                    .middleware
                    .get(&name)
                    .cloned()
                    .ok_or(Error::UnknownMiddleware { name }),
            })
            .collect()
    }

    fn controller_action(&self, reference: &str) -> Result<Handler> {
        let (controller, method) = match reference.split('@').collect::<Vec<_>>()[..] {
            [controller, method] => (controller.trim(), method.trim()),
            _ => {
                return Err(Error::controller(
                    reference,
                    "expected the format \"[controller_name]@[method]\"",
                ))
            }
        };

        let resolver = self
            .controllers
            .ok_or_else(|| Error::controller(reference, "no controller resolver configured"))?;
        resolver.action(controller, method, self.namespace)
    }
}
