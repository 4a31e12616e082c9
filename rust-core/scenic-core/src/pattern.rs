//! # Path Segments and Parameter Patterns
//!
//! Turns declared route paths into classified [`Segment`]s and owns the
//! [`PatternRegistry`] of default parameter constraints.
//!
//! ## Segment syntax
//!
//! - `users` -> [`Segment::Literal`]
//! - `{id}` -> [`Segment::Variable`]
//! - `{id}` with a constraint (per route or registered globally) -> [`Segment::RegexVariable`]
//! - `{id?}` -> optional variable, only valid as the last segment
//! - `{}` -> anonymous variable, matches one segment without binding it
//!
//! ## Design Principles (SOLID)
//!
//! - **S**: Only parses and classifies, the tree decides what to do with segments
//! - **O**: New segment kinds extend [`Segment`] without touching the registry

use crate::error::{Error, Result};
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

/// One classified `/`-delimited token of a declared path
#[derive(Debug, Clone)]
pub enum Segment {
    /// Matched by exact string equality
    Literal(String),
    /// Matches any single non-empty segment and binds `name`
    Variable {
        /// Parameter name (empty for `{}`)
        name: String,
        /// Declared as `{name?}`
        optional: bool,
    },
    /// Matches a single segment iff the whole segment matches `pattern`
    RegexVariable {
        /// Parameter name
        name: String,
        /// Anchored constraint
        pattern: Regex,
        /// Declared as `{name?}`
        optional: bool,
    },
}

impl Segment {
    /// Whether this segment was declared with the `{name?}` marker
    #[must_use]
    pub fn is_optional(&self) -> bool {
        match self {
            Self::Literal(_) => false,
            Self::Variable { optional, .. } | Self::RegexVariable { optional, .. } => *optional,
        }
    }

    /// Parameter name for variable segments
    #[must_use]
    pub fn param_name(&self) -> Option<&str> {
        match self {
            Self::Literal(_) => None,
            Self::Variable { name, .. } | Self::RegexVariable { name, .. } => Some(name),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => write!(f, "{text}"),
            Self::Variable { name, optional } => {
                write!(f, "{{{name}{}}}", if *optional { "?" } else { "" })
            }
            Self::RegexVariable {
                name,
                pattern,
                optional,
            } => write!(
                f,
                "{{{name}{}:{}}}",
                if *optional { "?" } else { "" },
                pattern.as_str()
            ),
        }
    }
}

/// Parse a raw segment as a parameter placeholder
///
/// Examples:
/// - `{id}` -> `Some(("id", false))`
/// - `{id?}` -> `Some(("id", true))`
/// - `static` -> `None`
#[must_use]
pub fn parse_placeholder(segment: &str) -> Option<(&str, bool)> {
    let inner = segment.strip_prefix('{')?.strip_suffix('}')?;
    match inner.strip_suffix('?') {
        Some(name) => Some((name, true)),
        None => Some((inner, false)),
    }
}

/// Join a scope prefix and a declared path like a filesystem path join
///
/// Duplicate and trailing slashes disappear, `.` is dropped and `..` pops
/// the previous segment. The result always has exactly one leading `/`.
#[must_use]
pub fn join(prefix: &str, path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for part in prefix.split('/').chain(path.split('/')) {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            part => parts.push(part),
        }
    }
    format!("/{}", parts.join("/"))
}

/// Split a path into segments the way registration does
///
/// Leading and trailing slashes are ignored, so `/`, `` and `//` all yield
/// no segments (the root).
#[must_use]
pub fn split(path: &str) -> Vec<&str> {
    let trimmed = path.trim_start_matches('/').trim_end_matches('/');
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    }
}

/// Percent-decode one request segment
///
/// Runs after splitting, so an encoded `%2F` stays inside its segment.
/// Text that does not decode to UTF-8 is kept as is.
#[must_use]
pub fn decode(segment: &str) -> Cow<'_, str> {
    urlencoding::decode(segment).unwrap_or(Cow::Borrowed(segment))
}

/// Compile a constraint so it only accepts whole segments
///
/// # Errors
///
/// Returns `Error::InvalidPattern` if `source` is not a valid regex.
pub fn compile(param: &str, source: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{source})$")).map_err(|source| Error::InvalidPattern {
        param: param.to_string(),
        source,
    })
}

/// Global `parameter-name -> pattern` defaults
///
/// Consulted at registration time only, for parameters whose route did not
/// declare its own constraint.
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    patterns: HashMap<String, Regex>,
}

impl PatternRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the default pattern for `param`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPattern` if `source` does not compile.
    pub fn insert(&mut self, param: &str, source: &str) -> Result<()> {
        let regex = compile(param, source)?;
        self.patterns.insert(param.to_string(), regex);
        Ok(())
    }

    /// Default pattern for `param`, if any
    #[must_use]
    pub fn get(&self, param: &str) -> Option<&Regex> {
        self.patterns.get(param)
    }

    /// Number of registered patterns
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether no pattern is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Classify every segment of an already joined path
///
/// Per-route `constraints` win over the registry defaults. Validation runs
/// over the whole path before anything is returned, so a failed call has no
/// side effects on the tree.
///
/// # Errors
///
/// Returns `Error::MalformedRoute` if an optional marker is not on the last
/// segment.
pub fn classify(
    path: &str,
    constraints: &HashMap<String, Regex>,
    registry: &PatternRegistry,
) -> Result<Vec<Segment>> {
    let raw = split(path);
    let last = raw.len().saturating_sub(1);

    raw.iter()
        .enumerate()
        .map(|(index, segment)| {
            let Some((name, optional)) = parse_placeholder(segment) else {
                return Ok(Segment::Literal((*segment).to_string()));
            };

            if optional && index != last {
                return Err(Error::malformed(
                    path,
                    "optional parameter must be the last segment",
                ));
            }

            let pattern = constraints
                .get(name)
                .or_else(|| registry.get(name))
                .cloned();

            Ok(match pattern {
                Some(pattern) if !name.is_empty() => Segment::RegexVariable {
                    name: name.to_string(),
                    pattern,
                    optional,
                },
                _ => Segment::Variable {
                    name: name.to_string(),
                    optional,
                },
            })
        })
        .collect()
}
