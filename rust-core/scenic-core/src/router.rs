//! # Router
//!
//! One routing namespace: a segment trie per HTTP verb, the public trie for
//! served directories, the name and pattern registries, and the routing
//! level configuration (named middleware, controllers, error middleware,
//! not-found handler).
//!
//! Routes are registered through a [`Scope`], which carries the enclosing
//! groups' prefix, middleware, namespace and name prefix:
//!
//! ```ignore
//! let mut router = Router::new();
//! router.routes(|r| {
//!     r.get("/", home)?;
//!     r.group(GroupOptions::new().prefix("/admin").middleware(auth), |r| {
//!         r.get("/users/{id}", RouteAction::uses(show).name("admin.users.show"))
//!     })
//! })?;
//! ```
//!
//! ## Matching
//!
//! Per segment: literal child, then regex branches in registration order,
//! then the plain variable. The first viable branch is taken, there is no
//! backtracking.
//!
//! ## SOLID Principles
//!
//! - **S**: Router owns the tables, the trie walks itself, dispatch runs stacks
//! - **O**: Controllers plug in through `ControllerResolver`
//! - **D**: Scopes register through `Action`, not concrete handler types

use crate::action::{Action, MiddlewareRef, Normalizer, RouteAction};
use crate::controller::{kebab_case, ControllerOptions, ControllerResolver};
use crate::error::{Error, Result};
use crate::pattern::{self, PatternRegistry, Segment};
use crate::pipeline::{ErrorHandler, Handler, HandlerError};
use crate::static_files::{ServeOptions, StaticDir};
use crate::statics::{Stack, StaticRoutes};
use crate::tree::RouteTree;
use crate::url::{NameRegistry, UrlParam};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, trace};

/// HTTP methods supported by the router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// HTTP GET
    Get,
    /// HTTP POST
    Post,
    /// HTTP PUT
    Put,
    /// HTTP DELETE
    Delete,
    /// HTTP PATCH
    Patch,
    /// HTTP OPTIONS
    Options,
}

impl Method {
    /// Every dispatchable verb, the set used by `any`
    pub const ALL: [Self; 6] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Delete,
        Self::Patch,
        Self::Options,
    ];

    /// Lowercase token, the prefix of controller method names
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Delete => "delete",
            Self::Patch => "patch",
            Self::Options => "options",
        }
    }

    /// Convert from the `http` crate's method, `None` for other verbs
    #[must_use]
    pub fn from_http(method: &http::Method) -> Option<Self> {
        match *method {
            http::Method::GET => Some(Self::Get),
            http::Method::POST => Some(Self::Post),
            http::Method::PUT => Some(Self::Put),
            http::Method::DELETE => Some(Self::Delete),
            http::Method::PATCH => Some(Self::Patch),
            http::Method::OPTIONS => Some(Self::Options),
            _ => None,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Delete => write!(f, "DELETE"),
            Self::Patch => write!(f, "PATCH"),
            Self::Options => write!(f, "OPTIONS"),
        }
    }
}

/// Tree a route is registered into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// A dispatchable method
    Method(Method),
    /// Served directories, only reached through static resolution
    Public,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Method(method) => method.fmt(f),
            Self::Public => write!(f, "PUBLIC"),
        }
    }
}

impl From<Method> for Verb {
    fn from(method: Method) -> Self {
        Self::Method(method)
    }
}

/// A matched route: its stack and the bound parameters
pub struct RouteMatch<'a> {
    /// Middleware followed by the route handler
    pub stack: &'a [Handler],
    /// Parameters bound by variable segments
    pub params: HashMap<String, String>,
}

/// Builds the error raised when nothing handles a path
pub type NotFoundHandler = Arc<dyn Fn(&str) -> HandlerError + Send + Sync>;

/// A routing namespace
pub struct Router {
    trees: HashMap<Method, RouteTree<Stack>>,
    public: RouteTree<Stack>,
    names: NameRegistry,
    patterns: PatternRegistry,
    middleware: HashMap<String, Handler>,
    controllers: Option<Arc<dyn ControllerResolver>>,
    error_middleware: Vec<ErrorHandler>,
    not_found: NotFoundHandler,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Create an empty router
    #[must_use]
    pub fn new() -> Self {
        Self {
            trees: HashMap::new(),
            public: RouteTree::new(),
            names: NameRegistry::new(),
            patterns: PatternRegistry::new(),
            middleware: HashMap::new(),
            controllers: None,
            error_middleware: Vec::new(),
            not_found: Arc::new(HandlerError::not_found),
        }
    }

    /// Registration handle at the root of the namespace
    pub fn scope(&mut self) -> Scope<'_> {
        Scope::root(self)
    }

    /// Register routes with a root scope
    ///
    /// # Errors
    ///
    /// Returns the first registration error of `f`.
    pub fn routes<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Scope<'_>) -> Result<()>,
    {
        f(&mut self.scope())
    }

    /// Register a default constraint for every later `{param}`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPattern` if `source` does not compile.
    pub fn pattern(&mut self, param: &str, source: &str) -> Result<()> {
        self.patterns.insert(param, source)
    }

    /// Define middleware that scopes and actions can reference by name
    pub fn alias_middleware(&mut self, name: impl Into<String>, middleware: Handler) {
        self.middleware.insert(name.into(), middleware);
    }

    /// Set the resolver used for controller routes and `Controller@method`
    pub fn set_controllers(&mut self, resolver: impl ControllerResolver + 'static) {
        self.controllers = Some(Arc::new(resolver));
    }

    /// Append error middleware
    pub fn add_error_middleware(&mut self, middleware: ErrorHandler) {
        self.error_middleware.push(middleware);
    }

    /// Replace the error raised for unmatched paths
    pub fn set_not_found_handler<F>(&mut self, f: F)
    where
        F: Fn(&str) -> HandlerError + Send + Sync + 'static,
    {
        self.not_found = Arc::new(f);
    }

    /// Error middleware, in order
    #[must_use]
    pub fn error_middleware(&self) -> &[ErrorHandler] {
        &self.error_middleware
    }

    /// The not-found error for `path`
    #[must_use]
    pub fn not_found(&self, path: &str) -> HandlerError {
        (self.not_found)(path)
    }

    /// Named route templates
    #[must_use]
    pub fn names(&self) -> &NameRegistry {
        &self.names
    }

    /// Resolver over the public tree
    #[must_use]
    pub fn static_routes(&self) -> StaticRoutes {
        StaticRoutes::from_tree(&self.public)
    }

    /// Generate the path of a named route
    ///
    /// Returns `None` if no route has that name.
    pub fn url<I, K, V>(&self, name: &str, params: I) -> Option<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: UrlParam,
    {
        self.names.url(name, params)
    }

    /// Generate the path of a named route without parameters
    #[must_use]
    pub fn url_for(&self, name: &str) -> Option<String> {
        self.names.url(name, std::iter::empty::<(&str, &str)>())
    }

    /// Match a request path against the routes of `method`
    ///
    /// # Errors
    ///
    /// Returns `Error::RouteNotFound` when no route matches or the matched
    /// node has no stack.
    pub fn match_route(&self, method: Method, path: &str) -> Result<RouteMatch<'_>> {
        let matched = self.trees.get(&method).and_then(|tree| tree.at(path));
        trace!(%method, path, found = matched.is_some(), "Route lookup");
        let matched = matched.ok_or_else(|| Error::RouteNotFound {
            method,
            path: path.to_string(),
        })?;

        Ok(RouteMatch {
            stack: matched.value,
            params: matched.params,
        })
    }

    /// Every registered `(verb, template)`, public routes included
    ///
    /// Templates are rendered from the trees, constrained parameters as
    /// `{name:pattern}`.
    #[must_use]
    pub fn route_list(&self) -> Vec<(Verb, String)> {
        let render = |segments: Vec<String>| format!("/{}", segments.join("/"));
        let mut list: Vec<(Verb, String)> = Method::ALL
            .iter()
            .filter_map(|method| self.trees.get(method).map(|tree| (*method, tree)))
            .flat_map(|(method, tree)| {
                tree.entries()
                    .into_iter()
                    .map(move |(segments, _)| (Verb::Method(method), render(segments)))
            })
            .collect();
        list.extend(
            self.public
                .entries()
                .into_iter()
                .map(|(segments, _)| (Verb::Public, render(segments))),
        );
        list
    }

    fn normalizer<'a>(&'a self, options: &'a ScopeOptions) -> Normalizer<'a> {
        Normalizer {
            middleware: &self.middleware,
            controllers: self.controllers.as_deref(),
            namespace: &options.namespace,
            name_prefix: &options.name,
        }
    }

    /// Compile one route into its tree
    ///
    /// Nothing is written until the path is fully classified, so a failed
    /// call leaves the router untouched.
    fn insert(
        &mut self,
        verb: Verb,
        path: &str,
        action: Action,
        options: &ScopeOptions,
    ) -> Result<()> {
        let descriptor = self.normalizer(options).normalize(path, action)?;
        let mut segments = pattern::classify(path, &descriptor.constraints, &self.patterns)?;

        let stack: Stack = options
            .middleware
            .iter()
            .cloned()
            .chain(descriptor.middleware)
            .chain(std::iter::once(descriptor.handler))
            .collect();

        let tree = match verb {
            Verb::Method(method) => self.trees.entry(method).or_default(),
            Verb::Public => &mut self.public,
        };
        tree.insert(&segments, Arc::clone(&stack));
        if segments.last().is_some_and(Segment::is_optional) {
            segments.pop();
            tree.insert(&segments, stack);
        }

        if let Some(name) = &descriptor.name {
            self.names.insert(name.clone(), path);
        }
        debug!(%verb, path, name = ?descriptor.name, "Route registered");
        Ok(())
    }
}

/// Options of a route group
///
/// Prefix and namespace are joined like paths onto the parent's, middleware
/// runs after the parent's, and the name prefix is appended to the parent's.
#[derive(Clone, Default)]
pub struct GroupOptions {
    prefix: Option<String>,
    middleware: Vec<MiddlewareRef>,
    namespace: Option<String>,
    name: Option<String>,
}

impl GroupOptions {
    /// Empty options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Path prefix
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Append group middleware
    #[must_use]
    pub fn middleware(mut self, middleware: impl Into<MiddlewareRef>) -> Self {
        self.middleware.push(middleware.into());
        self
    }

    /// Controller namespace
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Route name prefix
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[derive(Clone)]
struct ScopeOptions {
    prefix: String,
    middleware: Vec<Handler>,
    namespace: String,
    name: String,
}

/// Registration handle for one group level
pub struct Scope<'r> {
    router: &'r mut Router,
    options: ScopeOptions,
}

impl<'r> Scope<'r> {
    fn root(router: &'r mut Router) -> Self {
        Self {
            router,
            options: ScopeOptions {
                prefix: "/".to_string(),
                middleware: Vec::new(),
                namespace: String::new(),
                name: String::new(),
            },
        }
    }

    /// Path prefix of this scope
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.options.prefix
    }

    /// Controller namespace of this scope
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.options.namespace
    }

    fn register(&mut self, verb: Verb, path: &str, action: Action) -> Result<()> {
        let path = pattern::join(&self.options.prefix, path);
        self.router.insert(verb, &path, action, &self.options)
    }

    /// Register a route for one method
    ///
    /// # Errors
    ///
    /// Returns the registration error; earlier routes stay registered.
    pub fn route(&mut self, method: Method, path: &str, action: impl Into<Action>) -> Result<()> {
        self.register(Verb::Method(method), path, action.into())
    }

    /// Register a GET route
    ///
    /// # Errors
    ///
    /// See [`Scope::route`].
    pub fn get(&mut self, path: &str, action: impl Into<Action>) -> Result<()> {
        self.route(Method::Get, path, action)
    }

    /// Register a POST route
    ///
    /// # Errors
    ///
    /// See [`Scope::route`].
    pub fn post(&mut self, path: &str, action: impl Into<Action>) -> Result<()> {
        self.route(Method::Post, path, action)
    }

    /// Register a PUT route
    ///
    /// # Errors
    ///
    /// See [`Scope::route`].
    pub fn put(&mut self, path: &str, action: impl Into<Action>) -> Result<()> {
        self.route(Method::Put, path, action)
    }

    /// Register a DELETE route
    ///
    /// # Errors
    ///
    /// See [`Scope::route`].
    pub fn delete(&mut self, path: &str, action: impl Into<Action>) -> Result<()> {
        self.route(Method::Delete, path, action)
    }

    /// Register a PATCH route
    ///
    /// # Errors
    ///
    /// See [`Scope::route`].
    pub fn patch(&mut self, path: &str, action: impl Into<Action>) -> Result<()> {
        self.route(Method::Patch, path, action)
    }

    /// Register an OPTIONS route
    ///
    /// # Errors
    ///
    /// See [`Scope::route`].
    pub fn options(&mut self, path: &str, action: impl Into<Action>) -> Result<()> {
        self.route(Method::Options, path, action)
    }

    /// Register one action for several methods
    ///
    /// # Errors
    ///
    /// Stops at the first failing method.
    pub fn matches(
        &mut self,
        methods: &[Method],
        path: &str,
        action: impl Into<Action>,
    ) -> Result<()> {
        let action = action.into();
        methods
            .iter()
            .try_for_each(|method| self.route(*method, path, action.clone()))
    }

    /// Register one action for every method
    ///
    /// # Errors
    ///
    /// See [`Scope::matches`].
    pub fn any(&mut self, path: &str, action: impl Into<Action>) -> Result<()> {
        self.matches(&Method::ALL, path, action)
    }

    /// Register a nested group
    ///
    /// # Errors
    ///
    /// `Error::UnknownMiddleware` for an undefined middleware name, or the
    /// first error returned by `f`.
    pub fn group<F>(&mut self, options: GroupOptions, f: F) -> Result<()>
    where
        F: FnOnce(&mut Scope<'_>) -> Result<()>,
    {
        let middleware = self
            .router
            .normalizer(&self.options)
            .resolve_middleware(options.middleware)?;

        let nested = ScopeOptions {
            prefix: pattern::join(
                &self.options.prefix,
                options.prefix.as_deref().unwrap_or_default(),
            ),
            middleware: self
                .options
                .middleware
                .iter()
                .cloned()
                .chain(middleware)
                .collect(),
            namespace: pattern::join(
                &self.options.namespace,
                options.namespace.as_deref().unwrap_or_default(),
            )
            .trim_start_matches('/')
            .to_string(),
            name: format!(
                "{}{}",
                self.options.name,
                options.name.unwrap_or_default()
            ),
        };

        f(&mut Scope {
            router: &mut *self.router,
            options: nested,
        })
    }

    /// Register every verb-prefixed method of a controller under `path`
    ///
    /// `getIndex` lands on `path` itself, `getSomeThing` on
    /// `path/some-thing`. Methods without a verb prefix are skipped.
    ///
    /// # Errors
    ///
    /// `Error::Controller` if no resolver is set or the controller is unknown.
    pub fn controller(
        &mut self,
        path: &str,
        controller: &str,
        options: ControllerOptions,
    ) -> Result<()> {
        let resolver = self
            .router
            .controllers
            .clone()
            .ok_or_else(|| Error::controller(controller, "no controller resolver configured"))?;
        let actions = resolver.actions(controller, &self.options.namespace)?;

        self.group(GroupOptions::new().prefix(path), |scope| {
            for (method_name, handler) in actions {
                for method in Method::ALL {
                    let Some(rest) = method_name.strip_prefix(method.token()) else {
                        continue;
                    };
                    let mut subpath = kebab_case(rest);
                    if subpath == "index" {
                        subpath.clear();
                    }

                    let mut action = RouteAction::uses(handler.clone());
                    if let Some(extra) = options.get(&method_name) {
                        action.middleware.clone_from(&extra.middleware);
                        action.name.clone_from(&extra.name);
                    }
                    scope.route(method, &subpath, action)?;
                }
            }
            Ok(())
        })
    }

    /// Serve the files under `dir` at `path`
    ///
    /// # Errors
    ///
    /// Returns the registration error.
    pub fn serve(
        &mut self,
        path: &str,
        dir: impl Into<PathBuf>,
        options: ServeOptions,
    ) -> Result<()> {
        let handler = StaticDir::new(dir, options).into_handler();
        self.register(Verb::Public, path, Action::Handler(handler))
    }

    /// Register a default constraint, see [`Router::pattern`]
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPattern` if `source` does not compile.
    pub fn pattern(&mut self, param: &str, source: &str) -> Result<()> {
        self.router.pattern(param, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{ActionOptions, Controller, ControllerRegistry};
    use crate::pipeline::{handler, Flow};

    fn ok() -> Handler {
        handler(|_req, res| {
            res.end("ok");
            Ok(Flow::Done)
        })
    }

    fn paths(router: &Router, method: Method) -> Vec<String> {
        let mut list: Vec<String> = router
            .route_list()
            .into_iter()
            .filter(|(verb, _)| *verb == Verb::Method(method))
            .map(|(_, path)| path)
            .collect();
        list.sort();
        list
    }

    #[test]
    fn test_method_display_and_conversion() {
        assert_eq!(Method::Options.to_string(), "OPTIONS");
        assert_eq!(Verb::Public.to_string(), "PUBLIC");
        assert_eq!(Method::from_http(&http::Method::PATCH), Some(Method::Patch));
        assert_eq!(Method::from_http(&http::Method::HEAD), None);
        assert_eq!(Method::Delete.token(), "delete");
    }

    #[test]
    fn test_basic_routing() {
        let mut router = Router::new();
        router
            .routes(|r| {
                r.get("/", ok())?;
                r.get("/users", ok())?;
                r.post("/users", ok())
            })
            .unwrap();

        assert!(router.match_route(Method::Get, "/").is_ok());
        assert!(router.match_route(Method::Get, "/users/").is_ok());
        assert!(router.match_route(Method::Post, "/users").is_ok());
        assert!(router.match_route(Method::Put, "/users").is_err());
    }

    #[test]
    fn test_route_not_found() {
        let router = Router::new();
        let err = router.match_route(Method::Get, "/nonexistent").err().unwrap();
        assert!(matches!(err, Error::RouteNotFound { method: Method::Get, .. }));
    }

    #[test]
    fn test_path_parameters() {
        let mut router = Router::new();
        router
            .routes(|r| r.get("/users/{user_id}/posts/{post_id}", ok()))
            .unwrap();

        let m = router
            .match_route(Method::Get, "/users/456/posts/789")
            .unwrap();
        assert_eq!(m.params["user_id"], "456");
        assert_eq!(m.params["post_id"], "789");
        assert_eq!(m.stack.len(), 1);
    }

    #[test]
    fn test_optional_tail_registers_both_paths() {
        let mut router = Router::new();
        router
            .routes(|r| r.get("/route-17/{thing}/{another?}", RouteAction::uses(ok()).name("seventeen")))
            .unwrap();

        assert!(router.match_route(Method::Get, "/route-17/a").is_ok());
        let m = router.match_route(Method::Get, "/route-17/a/b").unwrap();
        assert_eq!(m.params["another"], "b");
        assert_eq!(
            router.names().get("seventeen"),
            Some("/route-17/{thing}/{another?}")
        );
    }

    #[test]
    fn test_malformed_optional_leaves_router_untouched() {
        let mut router = Router::new();
        let err = router
            .routes(|r| r.get("/a/{b?}/c", RouteAction::uses(ok()).name("bad")))
            .unwrap_err();
        assert!(matches!(err, Error::MalformedRoute { .. }));
        assert!(router.route_list().is_empty());
        assert!(router.names().is_empty());
    }

    #[test]
    fn test_global_pattern_applies_to_later_routes() {
        let mut router = Router::new();
        router.pattern("id", r"\d+").unwrap();
        router.routes(|r| r.get("/items/{id}", ok())).unwrap();

        assert!(router.match_route(Method::Get, "/items/12").is_ok());
        assert!(router.match_route(Method::Get, "/items/abc").is_err());
    }

    #[test]
    fn test_group_composition() {
        let mut router = Router::new();
        router.alias_middleware("named", ok());
        router
            .routes(|r| {
                r.group(
                    GroupOptions::new().prefix("/outer").middleware(ok()).name("outer."),
                    |r| {
                        r.group(
                            GroupOptions::new().prefix("inner").middleware("named").name("inner."),
                            |r| r.get("/leaf", RouteAction::uses(ok()).middleware(ok()).name("leaf")),
                        )
                    },
                )
            })
            .unwrap();

        let m = router.match_route(Method::Get, "/outer/inner/leaf").unwrap();
        assert_eq!(m.stack.len(), 4);
        assert_eq!(router.url_for("outer.inner.leaf").as_deref(), Some("/outer/inner/leaf"));
    }

    #[test]
    fn test_unknown_group_middleware() {
        let mut router = Router::new();
        let err = router
            .routes(|r| r.group(GroupOptions::new().middleware("missing"), |_| Ok(())))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownMiddleware { .. }));
    }

    #[test]
    fn test_matches_and_any() {
        let mut router = Router::new();
        router
            .routes(|r| {
                r.matches(&[Method::Get, Method::Post], "/some", ok())?;
                r.any("/all", ok())
            })
            .unwrap();

        assert!(router.match_route(Method::Post, "/some").is_ok());
        assert!(router.match_route(Method::Put, "/some").is_err());
        for method in Method::ALL {
            assert!(router.match_route(method, "/all").is_ok());
        }
    }

    #[test]
    fn test_controller_routes() {
        let mut registry = ControllerRegistry::new();
        registry.register(
            "Admin/UsersController",
            Controller::new()
                .method("getIndex", ok())
                .method("getSomeGreeting", ok())
                .method("postForm", ok())
                .method("helper", ok()),
        );
        let mut router = Router::new();
        router.set_controllers(registry);
        router
            .routes(|r| {
                r.group(GroupOptions::new().namespace("Admin"), |r| {
                    r.controller(
                        "/users",
                        "UsersController",
                        ControllerOptions::new()
                            .action("getSomeGreeting", ActionOptions::new().middleware(ok()).name("greet")),
                    )
                })
            })
            .unwrap();

        assert_eq!(paths(&router, Method::Get), vec!["/users", "/users/some-greeting"]);
        assert_eq!(paths(&router, Method::Post), vec!["/users/form"]);
        let m = router.match_route(Method::Get, "/users/some-greeting").unwrap();
        assert_eq!(m.stack.len(), 2);
        assert_eq!(router.url_for("greet").as_deref(), Some("/users/some-greeting"));
    }

    #[test]
    fn test_controller_without_resolver() {
        let mut router = Router::new();
        let err = router
            .routes(|r| r.controller("/x", "Missing", ControllerOptions::new()))
            .unwrap_err();
        assert!(matches!(err, Error::Controller { .. }));
    }

    #[test]
    fn test_serve_goes_to_public_tree() {
        let mut router = Router::new();
        router
            .routes(|r| r.serve("/assets", "tests/public", ServeOptions::default()))
            .unwrap();

        assert!(router.match_route(Method::Get, "/assets").is_err());
        let statics = router.static_routes();
        assert_eq!(statics.len(), 1);
        assert!(router
            .route_list()
            .contains(&(Verb::Public, "/assets".to_string())));
    }

    #[test]
    fn test_custom_not_found() {
        let mut router = Router::new();
        assert_eq!(router.not_found("/x").status, Some(404));
        router.set_not_found_handler(|path| HandlerError::new(410, format!("gone: {path}")));
        assert_eq!(router.not_found("/x").message.as_deref(), Some("gone: /x"));
    }
}
