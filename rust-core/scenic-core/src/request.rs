//! # HTTP Request
//!
//! Request object handed to every handler of a resolved stack.
//!
//! The transport fills in verb, path, query, headers and body; dispatch fills
//! in the bound `params` and, for static routes, the asset path. `params` and
//! `query` are kept as two disjoint string maps.
//!
//! ## Design Principles (SOLID)
//!
//! - **S**: Request only handles request data, not response
//! - **O**: Middleware passes data to handlers through typed extensions
//! - **D**: Handlers never see hyper request types

use crate::error::{Error, Result};
use crate::router::Method;
use crate::url::{NameRegistry, UrlParam};
use http::Extensions;
use http_body_util::BodyExt;
use hyper::body::Bytes;
use hyper::HeaderMap;
use std::collections::HashMap;
use std::sync::Arc;

/// HTTP request as seen by handlers
#[derive(Debug)]
pub struct Request {
    /// HTTP method
    pub method: Method,
    /// Raw request path as received (without query string)
    ///
    /// Segments are percent-decoded by the matcher after splitting.
    pub path: String,
    /// Path parameters bound by the matcher
    pub params: HashMap<String, String>,
    /// Raw query string (e.g., "page=1&limit=10")
    query_string: Option<String>,
    /// Parsed query parameters
    query_params: HashMap<String, String>,
    /// Request headers
    headers: HeaderMap,
    /// Request body (collected)
    body: Option<Bytes>,
    /// Typed values attached by middleware
    extensions: Extensions,
    /// Path remainder for static routes
    asset_path: Option<String>,
}

impl Request {
    /// Create a new request manually (for testing/internal use)
    ///
    /// `path` may carry a query string, which is split off and parsed.
    pub fn new(
        method: Method,
        path: impl Into<String>,
        headers_map: HashMap<String, String>,
        body: Option<Bytes>,
    ) -> Self {
        let path = path.into();
        let (path, query_string) = match path.split_once('?') {
            Some((p, q)) => (p.to_string(), Some(q.to_string())),
            None => (path, None),
        };

        let mut headers = HeaderMap::new();
        for (k, v) in headers_map {
            if let (Ok(n), Ok(v)) = (
                hyper::header::HeaderName::from_bytes(k.as_bytes()),
                hyper::header::HeaderValue::from_str(&v),
            ) {
                headers.insert(n, v);
            }
        }

        Self::from_parts(method, path, query_string, headers, body)
    }

    fn from_parts(
        method: Method,
        path: String,
        query_string: Option<String>,
        headers: HeaderMap,
        body: Option<Bytes>,
    ) -> Self {
        let query_params = parse_query_string(query_string.as_deref());
        Self {
            method,
            path,
            params: HashMap::new(),
            query_string,
            query_params,
            headers,
            body,
            extensions: Extensions::new(),
            asset_path: None,
        }
    }

    /// Create from a hyper request with a body size limit
    ///
    /// Returns `Ok(None)` when the verb is not one the router dispatches.
    ///
    /// # Errors
    ///
    /// Returns `Error::PayloadTooLarge` if the declared or actual body size
    /// exceeds `max_body_size`.
    pub async fn from_hyper_with_limit(
        req: hyper::Request<hyper::body::Incoming>,
        max_body_size: usize,
    ) -> Result<Option<Self>> {
        let Some(method) = Method::from_http(req.method()) else {
            return Ok(None);
        };

        let uri = req.uri();
        let path = uri.path().to_string();
        let query_string = uri.query().map(String::from);
        let headers = req.headers().clone();

        if let Some(content_len) = headers
            .get(hyper::header::CONTENT_LENGTH)
            .and_then(|len| len.to_str().ok())
            .and_then(|len| len.parse::<usize>().ok())
        {
            if content_len > max_body_size {
                return Err(Error::PayloadTooLarge {
                    limit: max_body_size,
                    actual: content_len,
                });
            }
        }

        let body = match BodyExt::collect(req.into_body()).await {
            Ok(collected) => {
                let bytes = collected.to_bytes();
                if bytes.len() > max_body_size {
                    return Err(Error::PayloadTooLarge {
                        limit: max_body_size,
                        actual: bytes.len(),
                    });
                }
                Some(bytes)
            }
            Err(_) => None,
        };

        Ok(Some(Self::from_parts(
            method,
            path,
            query_string,
            headers,
            body,
        )))
    }

    /// Get a path parameter bound by the matcher
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Get a query parameter
    #[must_use]
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(String::as_str)
    }

    /// Get query parameters as a HashMap
    #[must_use]
    pub fn query_map(&self) -> &HashMap<String, String> {
        &self.query_params
    }

    /// Get raw query string
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.query_string.as_deref()
    }

    /// Get a header value by name (case-insensitive)
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Set or override a header
    pub fn set_header(&mut self, name: &str, value: &str) {
        if let (Ok(n), Ok(v)) = (
            hyper::header::HeaderName::from_bytes(name.as_bytes()),
            hyper::header::HeaderValue::from_str(value),
        ) {
            self.headers.insert(n, v);
        }
    }

    /// Get the request body as bytes
    #[must_use]
    pub fn body_bytes(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Get the request body as string (UTF-8)
    #[must_use]
    pub fn body_str(&self) -> Option<&str> {
        self.body_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Typed values attached by earlier handlers
    #[must_use]
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Mutable access to the typed values, for middleware
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    /// Path remainder after the matched static prefix
    #[must_use]
    pub fn asset_path(&self) -> Option<&str> {
        self.asset_path.as_deref()
    }

    /// Generate the path of a named route of the dispatching router
    ///
    /// Returns `None` outside dispatch or when no route has that name.
    pub fn url<I, K, V>(&self, name: &str, params: I) -> Option<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: UrlParam,
    {
        self.extensions
            .get::<Arc<NameRegistry>>()
            .and_then(|names| names.url(name, params))
    }

    pub(crate) fn set_asset_path(&mut self, remainder: impl Into<String>) {
        self.asset_path = Some(remainder.into());
    }
}

/// Parse query string into HashMap
///
/// Handles URL decoding and duplicate keys (last value wins).
fn parse_query_string(query: Option<&str>) -> HashMap<String, String> {
    query
        .map(|q| {
            q.split('&')
                .filter(|pair| !pair.is_empty())
                .map(|pair| {
                    let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                    (url_decode(key), url_decode(value))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Form-style decoding: `+` is a space, `%XX` escapes are decoded
fn url_decode(s: &str) -> String {
    let spaced = s.replace('+', " ");
    urlencoding::decode(&spaced).map_or_else(|_| spaced.clone(), |d| d.into_owned())
}
