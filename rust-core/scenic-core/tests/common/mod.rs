#![allow(dead_code)]

use scenic_core::{handler, Dispatcher, Flow, Handler, Method, Response};
use std::collections::HashMap;
use std::path::PathBuf;

/// Middleware trail carried between handlers of one request
#[derive(Clone, Debug, Default)]
pub struct Trail(pub String);

pub fn public_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/public")
}

pub fn ok() -> Handler {
    text("ok")
}

pub fn text(body: &'static str) -> Handler {
    handler(move |_req, res| {
        res.end(body);
        Ok(Flow::Done)
    })
}

/// Start the trail with `step`
pub fn set(step: &'static str) -> Handler {
    handler(move |req, _res| {
        req.extensions_mut().insert(Trail(step.to_string()));
        Ok(Flow::Next)
    })
}

/// Append `|step` to the trail
pub fn append(step: &'static str) -> Handler {
    handler(move |req, _res| {
        let mut trail = req.extensions().get::<Trail>().cloned().unwrap_or_default();
        trail.0.push('|');
        trail.0.push_str(step);
        req.extensions_mut().insert(trail);
        Ok(Flow::Next)
    })
}

/// Respond with the trail
pub fn echo_trail() -> Handler {
    handler(|req, res| {
        let trail = req.extensions().get::<Trail>().cloned().unwrap_or_default();
        res.end(trail.0);
        Ok(Flow::Done)
    })
}

/// Respond with the URL of `name`, filled from the request's params
pub fn echo_url(name: &'static str, keys: &'static [&'static str]) -> Handler {
    handler(move |req, res| {
        let params: Vec<(&str, Option<String>)> = keys
            .iter()
            .map(|key| (*key, req.param(key).map(str::to_string)))
            .collect();
        res.end(req.url(name, params).unwrap_or_default());
        Ok(Flow::Done)
    })
}

pub fn send(dispatcher: &Dispatcher, method: Method, path: &str) -> Response {
    dispatcher.test_request(method, path, HashMap::new(), None)
}

pub fn get(dispatcher: &Dispatcher, path: &str) -> Response {
    send(dispatcher, Method::Get, path)
}

/// Body of a 200 response
#[track_caller]
pub fn body(res: &Response) -> String {
    assert_eq!(res.status, 200, "unexpected status, body: {:?}", res.body_str());
    res.body_str().unwrap_or_default().to_string()
}
