//! # CST Visitors
//!
//! Composable visitors transforming CST nodes into AST nodes. The
//! [`CstVisitor`] trait is the shared walker contract: a default
//! type-keyed `visit_node` dispatch, traversal helpers, and two extension
//! points every concrete visitor provides — the per-construct `visit_*`
//! overrides for its grammar slice and [`CstVisitor::create_node_for_call`]
//! for call-shaped constructs.
//!
//! A visit returns `Option<AstNode>`: `None` means "not mine", never an
//! error. Only structurally-expected-but-malformed nodes become
//! [`ErrorNode`](crate::error::ErrorNode) values.

pub mod args;
pub mod composite;
pub mod control;
pub mod csg;
pub mod expressions;
pub mod functions;
pub mod modules;
pub mod primitives;
pub mod range;
pub mod transforms;

use crate::ast::{AstNode, Parameter};
use crate::handler::SharedErrorHandler;
use openscad_cst::CstNode;

/// Node types handled by the control-structure slice.
pub const CONTROL_NODE_TYPES: &[&str] = &[
    "if_statement",
    "for_statement",
    "let_expression",
    "each_statement",
];

const EXPRESSION_NODE_TYPES: &[&str] = &[
    "number",
    "string",
    "boolean",
    "true",
    "false",
    "undef",
    "identifier",
    "special_variable",
    "vector_expression",
    "list_expression",
    "binary_expression",
    "unary_expression",
    "conditional_expression",
    "ternary_expression",
    "range_expression",
    "parenthesized_expression",
];

/// Shared walker contract for CST→AST visitors.
///
/// Provided methods implement the traversal skeleton; concrete visitors
/// override the `visit_*` methods of their grammar slice and implement
/// `create_node_for_call`.
pub trait CstVisitor {
    /// The injected error-handling capability.
    fn error_handler(&self) -> &SharedErrorHandler;

    /// Turns a recognized call-shaped node plus its extracted name and
    /// arguments into a domain AST node. Returns `None` when the call is
    /// outside this visitor's slice.
    fn create_node_for_call(
        &self,
        node: &CstNode,
        name: &str,
        args: Vec<Parameter>,
    ) -> Option<AstNode>;

    /// Dispatches a node by its CST type.
    ///
    /// Unrecognized types yield `None`, not an error.
    fn visit_node(&self, node: &CstNode) -> Option<AstNode> {
        match node.node_type.as_str() {
            "statement" => self.visit_statement(node),
            "module_instantiation" => self.visit_module_instantiation(node),
            "module_definition" => self.visit_module_definition(node),
            "function_definition" => self.visit_function_definition(node),
            "if_statement" => self.visit_if_statement(node),
            "for_statement" => self.visit_for_statement(node),
            "let_expression" => self.visit_let_expression(node),
            "each_statement" => self.visit_each_statement(node),
            "assignment" | "assignment_statement" => self.visit_assignment(node),
            "call_expression" | "function_call" => self.visit_call_expression(node),
            "ERROR" => self.visit_error(node),
            ty if EXPRESSION_NODE_TYPES.contains(&ty) => self.visit_expression(node),
            _ => None,
        }
    }

    /// Visits a generic statement wrapper by visiting its payload.
    fn visit_statement(&self, node: &CstNode) -> Option<AstNode> {
        self.visit_node(unwrap_statement(node)?)
    }

    /// Visits a call-shaped statement: extracts name and arguments, then
    /// delegates to `create_node_for_call`.
    fn visit_module_instantiation(&self, node: &CstNode) -> Option<AstNode> {
        let call = args::extract_call_signature(node, self.error_handler())?;
        self.create_node_for_call(node, &call.name, call.arguments)
    }

    /// Visits a call in expression position. Same extraction as statements;
    /// visitors that care distinguish via `create_node_for_call`.
    fn visit_call_expression(&self, node: &CstNode) -> Option<AstNode> {
        let call = args::extract_call_signature(node, self.error_handler())?;
        self.create_node_for_call(node, &call.name, call.arguments)
    }

    fn visit_module_definition(&self, _node: &CstNode) -> Option<AstNode> {
        None
    }

    fn visit_function_definition(&self, _node: &CstNode) -> Option<AstNode> {
        None
    }

    fn visit_if_statement(&self, _node: &CstNode) -> Option<AstNode> {
        None
    }

    fn visit_for_statement(&self, _node: &CstNode) -> Option<AstNode> {
        None
    }

    fn visit_let_expression(&self, _node: &CstNode) -> Option<AstNode> {
        None
    }

    fn visit_each_statement(&self, _node: &CstNode) -> Option<AstNode> {
        None
    }

    fn visit_assignment(&self, _node: &CstNode) -> Option<AstNode> {
        None
    }

    fn visit_expression(&self, _node: &CstNode) -> Option<AstNode> {
        None
    }

    fn visit_error(&self, _node: &CstNode) -> Option<AstNode> {
        None
    }

    /// Visits all children, skipping punctuation, collecting non-`None`
    /// results.
    fn visit_children(&self, node: &CstNode) -> Vec<AstNode> {
        node.children
            .iter()
            .filter(|c| !c.is_punctuation())
            .filter_map(|c| self.visit_node(c))
            .collect()
    }

    /// Visits a `{ ... }` block, returning the statement list.
    fn visit_block(&self, node: &CstNode) -> Vec<AstNode> {
        self.visit_children(node)
    }

    /// Visits a construct body that is either a block or a single
    /// statement. Statement wrappers are unwrapped directly, so visitors
    /// overriding `visit_statement` (e.g. with a gating contract) still
    /// build their own bodies in full.
    fn visit_body(&self, node: &CstNode) -> Vec<AstNode> {
        match node.node_type.as_str() {
            "block" | "union_block" => node
                .children
                .iter()
                .filter(|c| !c.is_punctuation())
                .filter_map(|c| unwrap_statement(c))
                .filter_map(|c| self.visit_node(c))
                .collect(),
            _ => unwrap_statement(node)
                .and_then(|inner| self.visit_node(inner))
                .into_iter()
                .collect(),
        }
    }
}

/// Builds the child list of a call-shaped node: the `{ ... }` block, or
/// the single trailing child statement of forms like `translate(v) cube();`.
pub(crate) fn call_children(visitor: &dyn CstVisitor, node: &CstNode) -> Vec<AstNode> {
    if let Some(block) = node
        .find_child("block")
        .or_else(|| node.find_child("union_block"))
    {
        return visitor.visit_body(block);
    }
    node.named_children
        .iter()
        .filter(|c| {
            !c.is_punctuation()
                && !matches!(
                    c.node_type.as_str(),
                    "identifier" | "arguments" | "argument_list"
                )
        })
        .filter_map(unwrap_statement)
        .filter_map(|c| visitor.visit_node(c))
        .collect()
}

/// Peels generic `statement` wrappers down to the payload node. Returns
/// `None` for statements with no named payload (e.g. a bare `;`).
pub fn unwrap_statement(node: &CstNode) -> Option<&CstNode> {
    let mut current = node;
    while current.node_type == "statement" {
        current = current
            .named_children
            .iter()
            .find(|c| !c.is_punctuation())?;
    }
    Some(current)
}
