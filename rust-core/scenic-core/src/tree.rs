//! # Route Tree
//!
//! Segment trie holding one value per registered path. The router keeps one
//! tree per verb plus one for static routes; the value is the handler stack.
//!
//! Each node has three kinds of branches:
//!
//! - literal children keyed by exact segment text
//! - at most one plain variable child
//! - an ordered list of regex-constrained variable children
//!
//! Matching tries them in that order at every depth and never backtracks:
//! once a branch is taken, a dead end further down is a miss. Among regex
//! branches the first one registered that accepts the segment wins.

use crate::pattern::{self, Segment};
use regex::Regex;
use std::collections::HashMap;

/// A matched terminal value and the parameters bound on the way
#[derive(Debug)]
pub struct Matched<'t, T> {
    /// Value stored at the terminal node
    pub value: &'t T,
    /// Bound path parameters (a repeated name keeps the later segment)
    pub params: HashMap<String, String>,
}

struct VariableBranch<T> {
    name: String,
    node: Node<T>,
}

struct PatternBranch<T> {
    name: String,
    pattern: Regex,
    node: Node<T>,
}

struct Node<T> {
    children: HashMap<String, Node<T>>,
    variable: Option<Box<VariableBranch<T>>>,
    patterns: Vec<PatternBranch<T>>,
    value: Option<T>,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self {
            children: HashMap::new(),
            variable: None,
            patterns: Vec::new(),
            value: None,
        }
    }
}

impl<T> Node<T> {
    fn insert(&mut self, segments: &[Segment], value: T) {
        let Some((segment, remaining)) = segments.split_first() else {
            self.value = Some(value);
            return;
        };

        let child = match segment {
            Segment::Literal(text) => self.children.entry(text.clone()).or_default(),
            Segment::Variable { name, .. } => {
                let branch = self.variable.get_or_insert_with(|| {
                    Box::new(VariableBranch {
                        name: name.clone(),
                        node: Node::default(),
                    })
                });
                // The branch is shared by every variable name at this depth.
                branch.name.clone_from(name);
                &mut branch.node
            }
            Segment::RegexVariable { name, pattern, .. } => {
                self.patterns.push(PatternBranch {
                    name: name.clone(),
                    pattern: pattern.clone(),
                    node: Node::default(),
                });
                let last = self.patterns.len() - 1;
                &mut self.patterns[last].node
            }
        };
        child.insert(remaining, value);
    }

    fn step<'n>(&'n self, segment: &str, params: &mut HashMap<String, String>) -> Option<&'n Self> {
        if let Some(child) = self.children.get(segment) {
            return Some(child);
        }
        if segment.is_empty() {
            return None;
        }
        if let Some(branch) = self.patterns.iter().find(|b| b.pattern.is_match(segment)) {
            params.insert(branch.name.clone(), segment.to_string());
            return Some(&branch.node);
        }
        self.variable.as_deref().map(|branch| {
            if !branch.name.is_empty() {
                params.insert(branch.name.clone(), segment.to_string());
            }
            &branch.node
        })
    }

    fn collect<'t>(&'t self, prefix: &mut Vec<String>, out: &mut Vec<(Vec<String>, &'t T)>) {
        if let Some(value) = &self.value {
            out.push((prefix.clone(), value));
        }

        let mut literals: Vec<_> = self.children.iter().collect();
        literals.sort_by(|a, b| a.0.cmp(b.0));
        for (text, child) in literals {
            prefix.push(text.clone());
            child.collect(prefix, out);
            prefix.pop();
        }

        for branch in &self.patterns {
            prefix.push(format!("{{{}:{}}}", branch.name, branch.pattern.as_str()));
            branch.node.collect(prefix, out);
            prefix.pop();
        }

        if let Some(branch) = &self.variable {
            prefix.push(format!("{{{}}}", branch.name));
            branch.node.collect(prefix, out);
            prefix.pop();
        }
    }
}

/// Segment trie for one verb
pub struct RouteTree<T> {
    root: Node<T>,
    len: usize,
}

impl<T> Default for RouteTree<T> {
    fn default() -> Self {
        Self {
            root: Node::default(),
            len: 0,
        }
    }
}

impl<T> RouteTree<T> {
    /// Create an empty tree
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` at the node reached by `segments`
    ///
    /// Literal and plain variable branches are shared with earlier
    /// registrations, every regex segment opens a fresh branch. A value
    /// already stored at the same node is replaced.
    pub fn insert(&mut self, segments: &[Segment], value: T) {
        self.root.insert(segments, value);
        self.len += 1;
    }

    /// Resolve a raw request path
    ///
    /// The path is split first and each segment is percent-decoded on its
    /// own, so `%2F` binds into a single parameter. Returns `None` when a segment has no branch to follow or the last node
    /// holds no value.
    #[must_use]
    pub fn at(&self, path: &str) -> Option<Matched<'_, T>> {
        let mut params = HashMap::new();
        let mut node = &self.root;
        for raw in pattern::split(path) {
            node = node.step(&pattern::decode(raw), &mut params)?;
        }
        node.value.as_ref().map(|value| Matched { value, params })
    }

    /// Every stored value with the segments leading to it
    ///
    /// Variable segments are rendered as `{name}` and regex segments as
    /// `{name:pattern}`.
    #[must_use]
    pub fn entries(&self) -> Vec<(Vec<String>, &T)> {
        let mut out = Vec::new();
        self.root.collect(&mut Vec::new(), &mut out);
        out
    }

    /// Number of insert calls made on this tree
    #[must_use]
    pub fn insertions(&self) -> usize {
        self.len
    }

    /// Whether nothing was ever inserted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{classify, compile, PatternRegistry};

    fn segments(path: &str) -> Vec<Segment> {
        classify(path, &HashMap::new(), &PatternRegistry::new()).unwrap()
    }

    fn constrained(path: &str, param: &str, source: &str) -> Vec<Segment> {
        let mut constraints = HashMap::new();
        constraints.insert(param.to_string(), compile(param, source).unwrap());
        classify(path, &constraints, &PatternRegistry::new()).unwrap()
    }

    #[test]
    fn test_literal_routes() {
        let mut tree = RouteTree::new();
        tree.insert(&segments("/"), "root");
        tree.insert(&segments("/route-4/route-5"), "nested");

        let m = tree.at("/").unwrap();
        assert_eq!(*m.value, "root");
        assert!(m.params.is_empty());

        assert_eq!(*tree.at("/route-4/route-5").unwrap().value, "nested");
        assert_eq!(*tree.at("route-4/route-5/").unwrap().value, "nested");
    }

    #[test]
    fn test_prefix_without_value_is_a_miss() {
        let mut tree = RouteTree::new();
        tree.insert(&segments("/route-6/route-7/route-8"), "deep");
        assert!(tree.at("/route-6/route-7").is_none());
        assert!(tree.at("/route-6/route-7/route-8/extra").is_none());
    }

    #[test]
    fn test_variable_binds_segment() {
        let mut tree = RouteTree::new();
        tree.insert(&segments("/route-17/{thing}/{another_thing}"), "seventeen");

        let m = tree.at("/route-17/hello/hi").unwrap();
        assert_eq!(m.params.get("thing").map(String::as_str), Some("hello"));
        assert_eq!(m.params.get("another_thing").map(String::as_str), Some("hi"));
    }

    #[test]
    fn test_variable_never_binds_empty_segment() {
        let mut tree = RouteTree::new();
        tree.insert(&segments("/a/{x}/b"), "x");
        assert!(tree.at("/a//b").is_none());
    }

    #[test]
    fn test_literal_beats_variable() {
        let mut tree = RouteTree::new();
        tree.insert(&segments("/users/{id}"), "variable");
        tree.insert(&segments("/users/me"), "literal");

        assert_eq!(*tree.at("/users/me").unwrap().value, "literal");
        assert_eq!(*tree.at("/users/42").unwrap().value, "variable");
    }

    #[test]
    fn test_literal_beats_regex() {
        let mut tree = RouteTree::new();
        tree.insert(&constrained("/items/{id}", "id", r"\d+"), "numeric");
        tree.insert(&segments("/items/42"), "literal");

        let m = tree.at("/items/42").unwrap();
        assert_eq!(*m.value, "literal");
        assert!(m.params.is_empty());
        assert_eq!(*tree.at("/items/7").unwrap().value, "numeric");
    }

    #[test]
    fn test_segments_are_decoded_after_splitting() {
        let mut tree = RouteTree::new();
        tree.insert(&segments("/files/{name}"), "file");
        tree.insert(&segments("/route 3"), "spaced");

        let m = tree.at("/files/a%2Fb").unwrap();
        assert_eq!(m.params.get("name").map(String::as_str), Some("a/b"));
        assert!(tree.at("/files/a/b").is_none());
        assert_eq!(*tree.at("/route%203").unwrap().value, "spaced");
    }

    #[test]
    fn test_regex_beats_variable_and_falls_back() {
        let mut tree = RouteTree::new();
        tree.insert(&segments("/items/{slug}"), "variable");
        tree.insert(&constrained("/items/{id}", "id", r"\d+"), "numeric");

        let m = tree.at("/items/15").unwrap();
        assert_eq!(*m.value, "numeric");
        assert_eq!(m.params.get("id").map(String::as_str), Some("15"));

        let m = tree.at("/items/hello").unwrap();
        assert_eq!(*m.value, "variable");
        assert_eq!(m.params.get("slug").map(String::as_str), Some("hello"));
    }

    #[test]
    fn test_first_registered_regex_wins() {
        let mut tree = RouteTree::new();
        tree.insert(&constrained("/v/{a}", "a", r"[a-z0-9]+"), "first");
        tree.insert(&constrained("/v/{b}", "b", r"\d+"), "second");

        let m = tree.at("/v/123").unwrap();
        assert_eq!(*m.value, "first");
        assert_eq!(m.params.get("a").map(String::as_str), Some("123"));
        assert!(m.params.get("b").is_none());
    }

    #[test]
    fn test_regex_miss_is_not_found() {
        let mut tree = RouteTree::new();
        tree.insert(&constrained("/route-15/{thing}", "thing", r"^\d+$"), "fifteen");
        assert!(tree.at("/route-15/15").is_some());
        assert!(tree.at("/route-15/hello").is_none());
    }

    #[test]
    fn test_no_backtracking_after_regex_branch() {
        let mut tree = RouteTree::new();
        tree.insert(&constrained("/a/{id}/x", "id", r"\d+"), "x");
        tree.insert(&constrained("/a/{id}/y", "id", r"\d+"), "y");

        assert_eq!(*tree.at("/a/5/x").unwrap().value, "x");
        // The first regex branch takes "5" and has no "y" child.
        assert!(tree.at("/a/5/y").is_none());
    }

    #[test]
    fn test_repeated_regex_registration_grows_branches() {
        let mut tree = RouteTree::new();
        tree.insert(&constrained("/r/{id}", "id", r"\d+"), 1);
        tree.insert(&constrained("/r/{id}", "id", r"\d+"), 2);

        assert_eq!(tree.entries().len(), 2);
        assert_eq!(*tree.at("/r/7").unwrap().value, 1);
    }

    #[test]
    fn test_last_write_wins() {
        let mut tree = RouteTree::new();
        tree.insert(&segments("/group-1/route-1"), "ok");
        tree.insert(&segments("/group-1/route-1"), "also-ok");

        assert_eq!(*tree.at("/group-1/route-1").unwrap().value, "also-ok");
        assert_eq!(tree.entries().len(), 1);
        assert_eq!(tree.insertions(), 2);
    }

    #[test]
    fn test_repeated_name_keeps_last_binding() {
        let mut tree = RouteTree::new();
        tree.insert(&segments("/route-20/{thing}/{thing}"), "twenty");

        let m = tree.at("/route-20/first/second").unwrap();
        assert_eq!(m.params.get("thing").map(String::as_str), Some("second"));
        assert_eq!(m.params.len(), 1);
    }

    #[test]
    fn test_shared_variable_branch_uses_latest_name() {
        let mut tree = RouteTree::new();
        tree.insert(&segments("/u/{id}/posts"), "posts");
        tree.insert(&segments("/u/{user}/comments"), "comments");

        let m = tree.at("/u/9/posts").unwrap();
        assert_eq!(m.params.get("user").map(String::as_str), Some("9"));
    }

    #[test]
    fn test_anonymous_variable_binds_nothing() {
        let mut tree = RouteTree::new();
        tree.insert(&segments("/c/{}/{greeting}"), "anon");

        let m = tree.at("/c/skip/hello").unwrap();
        assert_eq!(m.params.len(), 1);
        assert_eq!(m.params.get("greeting").map(String::as_str), Some("hello"));
    }

    #[test]
    fn test_entries_render_templates() {
        let mut tree = RouteTree::new();
        tree.insert(&segments("/b"), 1);
        tree.insert(&segments("/a/{id}"), 2);

        let entries: Vec<String> = tree
            .entries()
            .into_iter()
            .map(|(path, _)| path.join("/"))
            .collect();
        assert_eq!(entries, vec!["a/{id}".to_string(), "b".to_string()]);
    }
}
