//! # Structural Queries
//!
//! A compiled query locates every node of a given set of types in one walk
//! over a tree — an O(results) alternative to full recursive dispatch for
//! features that need "all calls" or "all definitions".
//!
//! The query string syntax is the node-type subset of tree-sitter's
//! S-expression patterns: one or more `(node_type)` groups, each optionally
//! followed by a `@capture` label. Bare node type names are also accepted.
//!
//! ## Usage
//!
//! ```rust
//! use openscad_cst::{CstNode, QueryEngine};
//!
//! let engine = QueryEngine::new();
//! let query = engine.compile("(module_definition) @def").unwrap();
//! let tree = CstNode::leaf("source_file", "", 0, 0);
//! assert!(query.matches(&tree).is_empty());
//! ```

use crate::node::CstNode;
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors raised when compiling a query string.
///
/// These indicate caller programming errors (malformed patterns), not
/// malformed source input, so they surface as `Result::Err` instead of
/// in-tree error values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    /// The query string contained no node-type pattern
    #[error("empty query")]
    Empty,

    /// A pattern group was not closed
    #[error("unbalanced parentheses in query: {0}")]
    Unbalanced(String),

    /// A node type token contained invalid characters
    #[error("invalid node type in query: {0}")]
    InvalidNodeType(String),
}

/// A compiled structural query: a set of node types to match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    node_types: BTreeSet<String>,
}

impl Query {
    /// Runs the query over `tree`, returning every matching node in
    /// document order.
    pub fn matches<'t>(&self, tree: &'t CstNode) -> Vec<&'t CstNode> {
        let mut out = Vec::new();
        self.collect(tree, &mut out);
        out
    }

    fn collect<'t>(&self, node: &'t CstNode, out: &mut Vec<&'t CstNode>) {
        if self.node_types.contains(&node.node_type) {
            out.push(node);
        }
        for child in &node.children {
            self.collect(child, out);
        }
    }

    /// The node types this query matches.
    pub fn node_types(&self) -> impl Iterator<Item = &str> {
        self.node_types.iter().map(String::as_str)
    }
}

/// Compiles query strings into [`Query`] values.
///
/// Stateless; exists as a type so callers can hold "the query capability"
/// the way they hold a parser handle.
#[derive(Debug, Default, Clone)]
pub struct QueryEngine;

impl QueryEngine {
    pub fn new() -> Self {
        Self
    }

    /// Compiles a query string.
    ///
    /// Accepts `(type) @capture` groups and bare type names, separated by
    /// whitespace. Capture labels are allowed for source compatibility but
    /// carry no meaning here.
    ///
    /// # Example
    ///
    /// ```rust
    /// use openscad_cst::QueryEngine;
    ///
    /// let engine = QueryEngine::new();
    /// let query = engine
    ///     .compile("(module_definition) @def (function_definition) @def")
    ///     .unwrap();
    /// assert_eq!(query.node_types().count(), 2);
    /// ```
    pub fn compile(&self, source: &str) -> Result<Query, QueryError> {
        let mut node_types = BTreeSet::new();
        let mut rest = source.trim();

        while !rest.is_empty() {
            if let Some(stripped) = rest.strip_prefix('(') {
                let close = stripped
                    .find(')')
                    .ok_or_else(|| QueryError::Unbalanced(source.to_string()))?;
                let name = stripped[..close].trim();
                node_types.insert(Self::validate(name)?);
                rest = stripped[close + 1..].trim_start();
            } else if let Some(stripped) = rest.strip_prefix('@') {
                // Capture label: skip the token
                let end = stripped
                    .find(char::is_whitespace)
                    .unwrap_or(stripped.len());
                rest = stripped[end..].trim_start();
            } else {
                let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
                node_types.insert(Self::validate(&rest[..end])?);
                rest = rest[end..].trim_start();
            }
        }

        if node_types.is_empty() {
            return Err(QueryError::Empty);
        }
        Ok(Query { node_types })
    }

    /// Builds a query matching exactly the given node types, bypassing the
    /// string syntax.
    pub fn for_node_types(&self, types: &[&str]) -> Result<Query, QueryError> {
        let mut node_types = BTreeSet::new();
        for ty in types {
            node_types.insert(Self::validate(ty)?);
        }
        if node_types.is_empty() {
            return Err(QueryError::Empty);
        }
        Ok(Query { node_types })
    }

    fn validate(name: &str) -> Result<String, QueryError> {
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(QueryError::InvalidNodeType(name.to_string()));
        }
        Ok(name.to_string())
    }
}
