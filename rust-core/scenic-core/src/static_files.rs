//! # Static Directories
//!
//! File serving for `serve` registrations. The handler reads the path
//! remainder left by static-route resolution and maps it under a root
//! directory. A missing file passes control on, so dispatch can report
//! "not found" through the configured handler.

use crate::pattern;
use crate::pipeline::{handler, Flow, Handler, HandlerError};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Options for a served directory
#[derive(Debug, Clone)]
pub struct ServeOptions {
    /// File served for a directory request, `None` to disable
    pub index: Option<String>,
    /// `Cache-Control: max-age`, omitted when zero
    pub max_age: Duration,
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self {
            index: Some("index.html".to_string()),
            max_age: Duration::ZERO,
        }
    }
}

impl ServeOptions {
    /// Default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the index file name
    #[must_use]
    pub fn index(mut self, index: Option<&str>) -> Self {
        self.index = index.map(str::to_string);
        self
    }

    /// Set the cache lifetime
    #[must_use]
    pub const fn max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }
}

/// A directory served under a route prefix
#[derive(Debug, Clone)]
pub struct StaticDir {
    root: PathBuf,
    options: ServeOptions,
}

impl StaticDir {
    /// Serve files under `root`
    pub fn new(root: impl Into<PathBuf>, options: ServeOptions) -> Self {
        Self {
            root: root.into(),
            options,
        }
    }

    /// Map a raw URL remainder below the root, refusing anything that climbs out
    ///
    /// Each segment is percent-decoded on its own and must still be a single
    /// plain path component afterwards.
    fn map_path(&self, url_path: &str) -> Option<PathBuf> {
        let mut path = self.root.clone();
        for raw in url_path.split('/') {
            let part = pattern::decode(raw);
            let mut components = Path::new(part.as_ref()).components();
            match (components.next(), components.next()) {
                (Some(Component::Normal(name)), None) => path.push(name),
                (None | Some(Component::CurDir), None) => {}
                _ => return None,
            }
        }
        Some(path)
    }

    fn content_type(path: &Path) -> &'static str {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase()
            .as_str()
        {
            "html" | "htm" => "text/html; charset=utf-8",
            "css" => "text/css",
            "js" | "mjs" => "application/javascript",
            "json" => "application/json",
            "txt" => "text/plain; charset=utf-8",
            "svg" => "image/svg+xml",
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "ico" => "image/x-icon",
            "woff2" => "font/woff2",
            _ => "application/octet-stream",
        }
    }

    /// Read the file for `url_path`
    ///
    /// Returns the bytes and the content type. A directory falls back to the
    /// index file.
    ///
    /// # Errors
    ///
    /// `NotFound` for missing files and refused paths, any other IO error
    /// as is.
    pub fn load(&self, url_path: &str) -> io::Result<(Vec<u8>, &'static str)> {
        let mut path = self
            .map_path(url_path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "invalid path"))?;
        if path.is_dir() {
            let index = self
                .options
                .index
                .as_deref()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "directory listing"))?;
            path.push(index);
        }
        if !path.is_file() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        }
        let bytes = fs::read(&path)?;
        Ok((bytes, Self::content_type(&path)))
    }

    /// Handler serving this directory
    #[must_use]
    pub fn into_handler(self) -> Handler {
        handler(move |req, res| {
            let remainder = req.asset_path().unwrap_or(&req.path).to_string();
            match self.load(&remainder) {
                Ok((bytes, content_type)) => {
                    res.content_type = content_type.to_string();
                    if !self.options.max_age.is_zero() {
                        res.set_header(
                            "Cache-Control",
                            &format!("public, max-age={}", self.options.max_age.as_secs()),
                        );
                    }
                    res.end(bytes);
                    Ok(Flow::Done)
                }
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    debug!(root = %self.root.display(), path = %remainder, "Asset not found");
                    Ok(Flow::Next)
                }
                Err(err) => Err(HandlerError::internal(err.to_string())),
            }
        })
    }
}
