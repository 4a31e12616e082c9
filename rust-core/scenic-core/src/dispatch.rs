//! # Dispatch
//!
//! Runs one request against a finished [`Router`], independent of any
//! transport:
//!
//! 1. match the verb's tree, bind the parameters and run the stack
//! 2. otherwise resolve the path against the served directories and run
//!    that stack with the remainder as the asset path
//! 3. otherwise raise the router's not-found error into the error middleware
//!
//! A static stack that passes control on without finishing is treated as
//! "asset not found" and takes the third branch. Whatever is left unfinished
//! goes through the completion handler.

use crate::pipeline::{complete, Completion, Pipeline};
use crate::request::Request;
use crate::response::Response;
use crate::router::{Method, Router};
use crate::statics::StaticRoutes;
use crate::url::NameRegistry;
use hyper::body::Bytes;
use std::collections::HashMap;
use std::sync::Arc;

/// Read-only view of a router, shared across requests
pub struct Dispatcher {
    router: Router,
    statics: StaticRoutes,
    names: Arc<NameRegistry>,
}

impl Dispatcher {
    /// Freeze `router` for dispatch
    #[must_use]
    pub fn new(router: Router) -> Self {
        let statics = router.static_routes();
        let names = Arc::new(router.names().clone());
        Self {
            router,
            statics,
            names,
        }
    }

    /// The frozen router
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// The static-route resolver
    #[must_use]
    pub fn statics(&self) -> &StaticRoutes {
        &self.statics
    }

    /// Handle one request
    #[must_use]
    pub fn dispatch(&self, mut req: Request) -> Response {
        let mut res = Response::new();
        req.extensions_mut().insert(Arc::clone(&self.names));
        let errors = self.router.error_middleware();

        let completion = match self.router.match_route(req.method, &req.path) {
            Ok(matched) => {
                req.params = matched.params;
                Pipeline::new(matched.stack, errors).run(&mut req, &mut res)
            }
            Err(_) => {
                let resolved = self
                    .statics
                    .resolve(&req.path)
                    .map(|(stack, rest)| (stack, rest.to_string()));
                match resolved {
                    Some((stack, rest)) => {
                        req.set_asset_path(rest);
                        let pipeline = Pipeline::new(stack, errors);
                        match pipeline.run(&mut req, &mut res) {
                            Completion::Exhausted if !res.is_finished() => {
                                let err = self.router.not_found(&req.path);
                                pipeline.fail(err, &mut req, &mut res)
                            }
                            other => other,
                        }
                    }
                    None => {
                        let err = self.router.not_found(&req.path);
                        Pipeline::new(&[], errors).fail(err, &mut req, &mut res)
                    }
                }
            }
        };

        complete(completion, &req, &mut res);
        res
    }

    /// Build a request and dispatch it
    #[must_use]
    pub fn test_request(
        &self,
        method: Method,
        path: &str,
        headers: HashMap<String, String>,
        body: Option<Bytes>,
    ) -> Response {
        self.dispatch(Request::new(method, path, headers, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::RouteAction;
    use crate::pipeline::{error_handler, handler, Flow, HandlerError, NOT_FOUND_MESSAGE};

    fn get(dispatcher: &Dispatcher, path: &str) -> Response {
        dispatcher.test_request(Method::Get, path, HashMap::new(), None)
    }

    fn json(res: &Response) -> serde_json::Value {
        serde_json::from_slice(res.body()).unwrap()
    }

    #[test]
    fn test_params_reach_handler() {
        let mut router = Router::new();
        router
            .routes(|r| {
                r.get(
                    "/hello/{name}",
                    handler(|req, res| {
                        res.end(format!("hello {}", req.param("name").unwrap_or("?")));
                        Ok(Flow::Done)
                    }),
                )
            })
            .unwrap();
        let dispatcher = Dispatcher::new(router);

        let res = get(&dispatcher, "/hello/world?x=1");
        assert_eq!(res.status, 200);
        assert_eq!(res.body_str(), Some("hello world"));
    }

    #[test]
    fn test_encoded_slash_binds_one_param() {
        let mut router = Router::new();
        router
            .routes(|r| {
                r.get(
                    "/files/{name}",
                    handler(|req, res| {
                        res.end(req.param("name").unwrap_or_default().to_string());
                        Ok(Flow::Done)
                    }),
                )
            })
            .unwrap();
        let dispatcher = Dispatcher::new(router);

        let res = get(&dispatcher, "/files/a%2Fb");
        assert_eq!(res.status, 200);
        assert_eq!(res.body_str(), Some("a/b"));

        let res = get(&dispatcher, "/nothing%2Fhere");
        assert_eq!(res.status, 404);
        assert_eq!(json(&res)["meta"]["path"], "/nothing%2Fhere");
    }

    #[test]
    fn test_unmatched_path_is_default_not_found() {
        let dispatcher = Dispatcher::new(Router::new());
        let res = get(&dispatcher, "/missing");

        assert_eq!(res.status, 404);
        let body = json(&res);
        assert_eq!(body["error"], NOT_FOUND_MESSAGE);
        assert_eq!(body["meta"]["path"], "/missing");
    }

    #[test]
    fn test_exhausted_stack_is_cannot_verb() {
        let mut router = Router::new();
        router
            .routes(|r| r.post("/next", handler(|_req, _res| Ok(Flow::Next))))
            .unwrap();
        let dispatcher = Dispatcher::new(router);

        let res = dispatcher.test_request(Method::Post, "/next", HashMap::new(), None);
        assert_eq!(res.status, 404);
        assert_eq!(res.body_str(), Some("Cannot POST /next"));
    }

    #[test]
    fn test_custom_not_found_and_error_middleware() {
        let mut router = Router::new();
        router.set_not_found_handler(|path| HandlerError::new(404, format!("nothing at {path}")));
        router.add_error_middleware(error_handler(|err, _req, res| {
            res.status = err.status_code();
            res.end(format!("handled: {}", err.message()));
            Ok(Flow::Done)
        }));
        let dispatcher = Dispatcher::new(router);

        let res = get(&dispatcher, "/x");
        assert_eq!(res.status, 404);
        assert_eq!(res.body_str(), Some("handled: nothing at /x"));
    }

    #[test]
    fn test_handler_panic_is_500() {
        let mut router = Router::new();
        router
            .routes(|r| r.get("/boom", handler(|_req, _res| panic!("exploded"))))
            .unwrap();
        let dispatcher = Dispatcher::new(router);

        let res = get(&dispatcher, "/boom");
        assert_eq!(res.status, 500);
        assert_eq!(json(&res)["error"], "exploded");
    }

    #[test]
    fn test_request_url_helper() {
        let mut router = Router::new();
        router
            .routes(|r| {
                r.get(
                    "/posts/{id}",
                    RouteAction::uses(handler(|req, res| {
                        let url = req.url("posts.show", [("id", "9")]).unwrap_or_default();
                        res.end(url);
                        Ok(Flow::Done)
                    }))
                    .name("posts.show"),
                )
            })
            .unwrap();
        let dispatcher = Dispatcher::new(router);

        assert_eq!(get(&dispatcher, "/posts/1").body_str(), Some("/posts/9"));
    }
}
