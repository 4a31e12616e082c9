//! # URL Generation
//!
//! Reverse routing: route name + parameter values -> path string.
//!
//! Templates are stored exactly as registered (prefix joined, placeholder
//! markers kept). Generation only reads the [`NameRegistry`].
//!
//! ```ignore
//! names.insert("users.show", "/users/{id}/{tab?}");
//! names.url("users.show", [("id", "7")]);               // "/users/7"
//! names.url("users.show", [("id", "7"), ("x", "y")]);   // "/users/7?x=y"
//! names.url("users.show", std::iter::empty::<(&str, &str)>()); // "/users/null"
//! ```

use crate::pattern;
use std::collections::HashMap;

/// A value usable as a URL parameter
///
/// `None` is the "unset" value: the key is skipped entirely, it neither
/// fills a placeholder nor becomes a query parameter.
pub trait UrlParam {
    /// String form of the value, `None` when unset
    fn into_param(self) -> Option<String>;
}

impl UrlParam for &str {
    fn into_param(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl UrlParam for String {
    fn into_param(self) -> Option<String> {
        Some(self)
    }
}

impl UrlParam for &String {
    fn into_param(self) -> Option<String> {
        Some(self.clone())
    }
}

impl<T: UrlParam> UrlParam for Option<T> {
    fn into_param(self) -> Option<String> {
        self.and_then(UrlParam::into_param)
    }
}

macro_rules! impl_url_param_for_int {
    ($($t:ty),*) => {
        $(
            impl UrlParam for $t {
                fn into_param(self) -> Option<String> {
                    Some(self.to_string())
                }
            }
        )*
    };
}

impl_url_param_for_int!(i32, i64, u16, u32, u64, usize);

/// `route name -> raw template`
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    templates: HashMap<String, String>,
}

impl NameRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a name; a later registration of the same name replaces it
    pub fn insert(&mut self, name: impl Into<String>, template: impl Into<String>) {
        self.templates.insert(name.into(), template.into());
    }

    /// Raw template registered under `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.templates.get(name).map(String::as_str)
    }

    /// Number of named routes
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether no route is named
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Generate the path of the route called `name`
    ///
    /// Returns `None` when no route has that name.
    pub fn url<I, K, V>(&self, name: &str, params: I) -> Option<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: UrlParam,
    {
        self.get(name).map(|template| generate(template, params))
    }
}

/// Fill `template` with `params`
///
/// Placeholders are whole segments. Supplied keys without a placeholder are
/// appended as a query string in the order given.
pub fn generate<I, K, V>(template: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: UrlParam,
{
    let params: Vec<(String, String)> = params
        .into_iter()
        .filter_map(|(key, value)| value.into_param().map(|value| (key.into(), value)))
        .collect();

    let lookup = |name: &str| {
        params
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    };

    let mut placeholders: Vec<&str> = Vec::new();
    let mut segments: Vec<&str> = Vec::new();
    for segment in template.split('/') {
        let Some((name, optional)) = pattern::parse_placeholder(segment) else {
            segments.push(segment);
            continue;
        };
        placeholders.push(name);
        match lookup(name) {
            Some(value) => segments.push(value),
            None if optional => {}
            None => segments.push("null"),
        }
    }

    let mut uri = segments.join("/").trim_end_matches('/').to_string();
    if uri.is_empty() {
        uri.push('/');
    }

    let query: Vec<String> = params
        .iter()
        .filter(|(key, _)| !placeholders.contains(&key.as_str()))
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        })
        .collect();

    if !query.is_empty() {
        uri.push('?');
        uri.push_str(&query.join("&"));
    }
    uri
}
