//! # Static-Route Resolution
//!
//! Flattens the public tree into prefixes, deepest first, so that a request
//! under `/assets/vendor` reaches the `/assets/vendor` directory before the
//! `/assets` one.

use crate::pipeline::Handler;
use crate::tree::RouteTree;
use std::sync::Arc;
use tracing::trace;

/// Handler stack of one registered route
pub type Stack = Arc<[Handler]>;

/// One `serve` registration
#[derive(Clone)]
pub struct StaticRoute {
    prefix: String,
    depth: usize,
    stack: Stack,
}

impl StaticRoute {
    /// Registered prefix, e.g. `/assets/vendor`
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Remainder of `path` after the prefix text, if `path` starts with it
    fn strip<'p>(&self, path: &'p str) -> Option<&'p str> {
        path.strip_prefix(self.prefix.as_str())
    }
}

/// Sorted view over the public tree
#[derive(Clone, Default)]
pub struct StaticRoutes {
    routes: Vec<StaticRoute>,
}

impl StaticRoutes {
    /// Build the resolver from the public tree
    #[must_use]
    pub fn from_tree(tree: &RouteTree<Stack>) -> Self {
        let mut routes: Vec<StaticRoute> = tree
            .entries()
            .into_iter()
            .map(|(segments, stack)| StaticRoute {
                prefix: format!("/{}", segments.join("/")),
                depth: segments.len(),
                stack: Arc::clone(stack),
            })
            .collect();
        routes.sort_by(|a, b| b.depth.cmp(&a.depth).then_with(|| a.prefix.cmp(&b.prefix)));
        Self { routes }
    }

    /// Find the deepest registration whose prefix text starts `path`
    ///
    /// Returns its stack and the path remainder after the prefix text.
    #[must_use]
    pub fn resolve<'p>(&self, path: &'p str) -> Option<(&[Handler], &'p str)> {
        let found = self
            .routes
            .iter()
            .find_map(|route| route.strip(path).map(|rest| (route, rest)));
        trace!(path, prefix = ?found.map(|(route, _)| route.prefix()), "Static lookup");
        found.map(|(route, rest)| (&*route.stack, rest))
    }

    /// Registered prefixes in resolution order
    pub fn iter(&self) -> impl Iterator<Item = &StaticRoute> {
        self.routes.iter()
    }

    /// Number of registrations
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether nothing is served
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{classify, PatternRegistry};
    use crate::pipeline::{handler, Flow};
    use std::collections::HashMap;

    fn tree(prefixes: &[&str]) -> RouteTree<Stack> {
        let mut tree = RouteTree::new();
        for prefix in prefixes {
            let segments = classify(prefix, &HashMap::new(), &PatternRegistry::new()).unwrap();
            let marker = (*prefix).to_string();
            let stack: Stack = Arc::from(vec![handler(move |_req, res| {
                res.end(marker.clone());
                Ok(Flow::Done)
            })]);
            tree.insert(&segments, stack);
        }
        tree
    }

    fn prefixes(routes: &StaticRoutes) -> Vec<&str> {
        routes.iter().map(StaticRoute::prefix).collect()
    }

    #[test]
    fn test_deepest_prefix_first() {
        let routes = StaticRoutes::from_tree(&tree(&["/a", "/a/b", "/c"]));
        assert_eq!(prefixes(&routes), vec!["/a/b", "/a", "/c"]);
    }

    #[test]
    fn test_resolve_remainder() {
        let routes = StaticRoutes::from_tree(&tree(&["/a", "/a/b"]));

        let (_, rest) = routes.resolve("/a/b/file.txt").unwrap();
        assert_eq!(rest, "/file.txt");

        let (_, rest) = routes.resolve("/a/c/file.txt").unwrap();
        assert_eq!(rest, "/c/file.txt");

        let (_, rest) = routes.resolve("/a").unwrap();
        assert_eq!(rest, "");
    }

    #[test]
    fn test_prefix_is_plain_text() {
        let routes = StaticRoutes::from_tree(&tree(&["/a"]));

        let (_, rest) = routes.resolve("/afile.txt").unwrap();
        assert_eq!(rest, "file.txt");
        assert!(routes.resolve("/b").is_none());
    }

    #[test]
    fn test_root_prefix_covers_everything() {
        let routes = StaticRoutes::from_tree(&tree(&["/", "/x"]));
        assert_eq!(prefixes(&routes), vec!["/x", "/"]);
        let (_, rest) = routes.resolve("/anything/here").unwrap();
        assert_eq!(rest, "anything/here");
        let (_, rest) = routes.resolve("/x/y").unwrap();
        assert_eq!(rest, "/y");
    }

    #[test]
    fn test_empty() {
        let routes = StaticRoutes::from_tree(&RouteTree::new());
        assert!(routes.is_empty());
        assert!(routes.resolve("/x").is_none());
    }
}
