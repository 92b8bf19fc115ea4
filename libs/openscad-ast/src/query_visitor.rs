//! # Query Visitor
//!
//! Structural queries over one parse session's CST, with per-session
//! memoization. Repeated queries against the same tree hit the cache;
//! AST construction for matched nodes is delegated to a composite
//! visitor, never duplicated here.
//!
//! The type borrows the tree for its whole life, so the cache can never
//! outlive the nodes it points at. Re-parsing means building a new
//! `QueryVisitor`.

use crate::ast::AstNode;
use crate::handler::SharedErrorHandler;
use crate::visitor::composite::CompositeVisitor;
use crate::visitor::CstVisitor;
use openscad_cst::{CstNode, QueryEngine, QueryError};
use std::cell::RefCell;
use std::collections::HashMap;

pub struct QueryVisitor<'t> {
    tree: &'t CstNode,
    composite: CompositeVisitor,
    engine: QueryEngine,
    // Separate namespaces: a joined type list must never alias a query
    // source string (a bare-name query renders identically to a single
    // type key).
    type_cache: RefCell<HashMap<String, Vec<&'t CstNode>>>,
    source_cache: RefCell<HashMap<String, Vec<&'t CstNode>>>,
}

impl<'t> QueryVisitor<'t> {
    /// Builds a query session over `tree` with the full default visitor
    /// lineup.
    pub fn new(tree: &'t CstNode, handler: SharedErrorHandler) -> Self {
        Self::with_composite(tree, CompositeVisitor::with_default_visitors(handler))
    }

    /// Builds a query session with a caller-assembled composite, e.g. a
    /// reduced delegate lineup.
    pub fn with_composite(tree: &'t CstNode, composite: CompositeVisitor) -> Self {
        Self {
            tree,
            composite,
            engine: QueryEngine::new(),
            type_cache: RefCell::new(HashMap::new()),
            source_cache: RefCell::new(HashMap::new()),
        }
    }

    /// All nodes of one CST type, in document order. Cached.
    pub fn find_nodes_by_type(&self, node_type: &str) -> Result<Vec<&'t CstNode>, QueryError> {
        self.find_nodes_by_types(&[node_type])
    }

    /// All nodes matching any of the given CST types, in document order.
    /// Cached under the joined type list, apart from source-form queries.
    pub fn find_nodes_by_types(&self, types: &[&str]) -> Result<Vec<&'t CstNode>, QueryError> {
        let key = types.join(",");
        if let Some(hit) = self.type_cache.borrow().get(&key) {
            return Ok(hit.clone());
        }
        let query = self.engine.for_node_types(types)?;
        let matches = query.matches(self.tree);
        self.type_cache.borrow_mut().insert(key, matches.clone());
        Ok(matches)
    }

    /// Runs a query in source form (`"(module_definition) @def"`),
    /// memoized on the literal query string.
    pub fn execute_query(&self, source: &str) -> Result<Vec<&'t CstNode>, QueryError> {
        if let Some(hit) = self.source_cache.borrow().get(source) {
            return Ok(hit.clone());
        }
        let query = self.engine.compile(source)?;
        let matches = query.matches(self.tree);
        self.source_cache
            .borrow_mut()
            .insert(source.to_string(), matches.clone());
        Ok(matches)
    }

    /// Converts every match of a query to an AST node through the
    /// composite. Matches the composite declines are skipped.
    pub fn visit_matches(&self, source: &str) -> Result<Vec<AstNode>, QueryError> {
        Ok(self
            .execute_query(source)?
            .into_iter()
            .filter_map(|node| self.composite.visit_node(node))
            .collect())
    }

    /// Number of memoized query results, across both namespaces.
    pub fn cached_query_count(&self) -> usize {
        self.type_cache.borrow().len() + self.source_cache.borrow().len()
    }

    /// Drops all memoized results; subsequent queries re-walk the tree.
    pub fn clear_cache(&self) {
        self.type_cache.borrow_mut().clear();
        self.source_cache.borrow_mut().clear();
    }
}
