//! # HTTP Response
//!
//! Response sink shared by every handler of one request. A handler that
//! produces the response calls [`Response::end`] (or one of the helpers that
//! wrap it); the completion handler only writes a fallback body when nothing
//! has finished the response yet.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::StatusCode;
use serde::Serialize;
use std::collections::HashMap;

/// HTTP response under construction
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response body
    body: Bytes,
    /// Content type
    pub content_type: String,
    /// Response headers
    pub headers: HashMap<String, String>,
    /// Whether a handler has completed the response
    finished: bool,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status: 200,
            body: Bytes::new(),
            content_type: "text/plain; charset=utf-8".to_string(),
            headers: HashMap::new(),
            finished: false,
        }
    }
}

impl Response {
    /// Create an empty, unfinished 200 response
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a finished JSON response
    #[must_use]
    pub fn json(body: impl Into<String>) -> Self {
        let mut res = Self::new().with_header("Content-Type", "application/json");
        res.end(body.into());
        res
    }

    /// Create a finished text response
    #[must_use]
    pub fn text(body: impl Into<String>) -> Self {
        let mut res = Self::new();
        res.end(body.into());
        res
    }

    /// Set status code
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Set header
    #[must_use]
    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.set_header(key, value);
        self
    }

    /// Set or override a header
    pub fn set_header(&mut self, key: &str, value: &str) {
        if key.eq_ignore_ascii_case("content-type") {
            self.content_type = value.to_string();
        } else {
            self.headers.insert(key.to_string(), value.to_string());
        }
    }

    /// Get a header previously set on this response
    #[must_use]
    pub fn header(&self, key: &str) -> Option<&str> {
        if key.eq_ignore_ascii_case("content-type") {
            return Some(&self.content_type);
        }
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Write the body and mark the response as finished
    pub fn end(&mut self, body: impl Into<Bytes>) {
        self.body = body.into();
        self.finished = true;
    }

    /// Serialize `value` as the JSON body and finish the response
    ///
    /// # Errors
    ///
    /// Returns the serializer error; the response is left untouched.
    pub fn send_json<T: Serialize>(&mut self, value: &T) -> serde_json::Result<()> {
        let body = serde_json::to_vec(value)?;
        self.content_type = "application/json".to_string();
        self.end(body);
        Ok(())
    }

    /// Whether a handler has completed the response
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Response body bytes
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Response body as UTF-8 text, if it is valid UTF-8
    #[must_use]
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Convert to hyper Response
    pub(crate) fn into_hyper(self) -> hyper::Response<Full<Bytes>> {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut builder = hyper::Response::builder()
            .status(status)
            .header("Content-Type", &self.content_type);
        for (k, v) in &self.headers {
            builder = builder.header(k.as_str(), v.as_str());
        }

        builder.body(Full::new(self.body)).unwrap_or_else(|_| {
            let mut fallback = hyper::Response::new(Full::new(Bytes::from("Internal Server Error")));
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
    }
}
