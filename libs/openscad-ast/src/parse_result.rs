//! # Parse Result
//!
//! The top-level entry point: one call takes a CST root and returns the
//! AST, the accumulated diagnostics, and an overall success flag. Errors
//! never abort the build; a file with ten problems yields a partial AST
//! and ten reported errors.

use crate::ast::AstNode;
use crate::handler::{CollectingErrorHandler, Severity, SharedErrorHandler};
use crate::visitor::composite::CompositeVisitor;
use crate::visitor::CstVisitor;
use config::constants::ERROR_SNIPPET_MAX_LEN;
use openscad_cst::CstNode;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// A line/column pair for reporting, zero-based like the CST positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseLocation {
    pub line: usize,
    pub column: usize,
}

/// One diagnostic attached to a parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseError {
    pub message: String,
    pub location: Option<ParseLocation>,
    pub severity: Severity,
}

/// The outcome of transforming one CST into an AST.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    /// Top-level AST nodes in document order; partial on malformed input.
    pub ast: Vec<AstNode>,
    /// Syntax errors from the upstream parse plus error- and
    /// warning-severity diagnostics from AST construction, in report order.
    pub errors: Vec<ParseError>,
    /// `false` iff the CST carries error/missing nodes or any
    /// error-severity diagnostic was reported.
    pub success: bool,
}

/// Builds an AST from a parsed CST root with the default visitor lineup.
///
/// # Example
///
/// ```rust
/// use openscad_ast::parse_result::build_ast;
/// use openscad_cst::CstNode;
///
/// let root = CstNode::leaf("source_file", "", 0, 0);
/// let result = build_ast(&root);
/// assert!(result.success);
/// assert!(result.ast.is_empty());
/// ```
pub fn build_ast(root: &CstNode) -> ParseResult {
    let handler = Rc::new(CollectingErrorHandler::new());
    let composite = CompositeVisitor::with_default_visitors(handler.clone() as SharedErrorHandler);
    build_ast_with(root, &composite, &handler)
}

/// Builds an AST with a caller-assembled composite and handler. The
/// handler must be the one the composite's delegates report into.
pub fn build_ast_with(
    root: &CstNode,
    composite: &CompositeVisitor,
    handler: &CollectingErrorHandler,
) -> ParseResult {
    let mut errors = Vec::new();
    collect_syntax_errors(root, &mut errors);
    let cst_broken = !errors.is_empty();

    let ast: Vec<AstNode> = root
        .children
        .iter()
        .filter(|c| !c.is_punctuation())
        .filter_map(|c| composite.visit_node(c))
        .collect();

    for diagnostic in handler.diagnostics() {
        if matches!(diagnostic.severity, Severity::Error | Severity::Warning) {
            let entry = ParseError {
                message: diagnostic.message,
                location: diagnostic.location.map(|loc| ParseLocation {
                    line: loc.start.line,
                    column: loc.start.column,
                }),
                severity: diagnostic.severity,
            };
            // Visitors re-report CST errors the pre-pass already saw.
            if !errors.contains(&entry) {
                errors.push(entry);
            }
        }
    }

    let success = !cst_broken && !handler.has_errors();
    ParseResult {
        ast,
        errors,
        success,
    }
}

/// Pre-pass over the CST: every `ERROR` and `MISSING` node becomes one
/// error-severity entry, before any AST construction runs.
fn collect_syntax_errors(node: &CstNode, out: &mut Vec<ParseError>) {
    if node.is_error() || node.is_missing() {
        let snippet: String = node.text.chars().take(ERROR_SNIPPET_MAX_LEN).collect();
        let message = if node.is_missing() {
            format!("missing syntax: {}", node.node_type)
        } else {
            format!("syntax error near '{snippet}'")
        };
        out.push(ParseError {
            message,
            location: Some(ParseLocation {
                line: node.start_position.row,
                column: node.start_position.column,
            }),
            severity: Severity::Error,
        });
    }
    for child in &node.children {
        collect_syntax_errors(child, out);
    }
}
