//! # Control Structure Visitor
//!
//! Handles `if`/`else`, `for`, `let` and `each`. If and for conversion
//! live in sub-visitors; this type is the dispatch root that wires their
//! bodies back through full statement dispatch, so control structures
//! nest arbitrarily and bodies keep nested module and function
//! definitions.
//!
//! `visit_statement` is gated: statements containing no control-structure
//! node type are declined outright. Inside a composite this keeps the
//! visitor from claiming plain instantiations that happen to reach it
//! before a more specific delegate.

mod for_loop;
mod if_else;

pub use for_loop::ForLoopVisitor;
pub use if_else::IfElseVisitor;

use crate::ast::{
    AstNode, EachNode, LetAssignment, LetNode, ModuleInstantiation, Parameter,
};
use crate::handler::SharedErrorHandler;
use crate::location::Location;
use crate::visitor::expressions::ExpressionVisitor;
use crate::visitor::functions::FunctionVisitor;
use crate::visitor::modules::build_module_definition;
use crate::visitor::{call_children, unwrap_statement, CstVisitor, CONTROL_NODE_TYPES};
use openscad_cst::CstNode;

pub struct ControlStructureVisitor {
    handler: SharedErrorHandler,
    if_else: IfElseVisitor,
    for_loop: ForLoopVisitor,
    functions: FunctionVisitor,
    expr: ExpressionVisitor,
}

impl ControlStructureVisitor {
    pub fn new(handler: SharedErrorHandler) -> Self {
        Self {
            if_else: IfElseVisitor::new(handler.clone()),
            for_loop: ForLoopVisitor::new(handler.clone()),
            functions: FunctionVisitor::new(handler.clone()),
            expr: ExpressionVisitor::new(handler.clone()),
            handler,
        }
    }

    /// Ordered `name = value` bindings of a `let` header.
    fn let_assignments(&self, node: &CstNode) -> Vec<LetAssignment> {
        let container = node
            .child_by_field("assignments")
            .or_else(|| node.find_child("assignments"))
            .or_else(|| node.find_child("parenthesized_assignments"))
            .unwrap_or(node);
        container
            .children
            .iter()
            .filter(|c| c.node_type == "assignment")
            .filter_map(|a| {
                let name_node = a
                    .child_by_field("name")
                    .or_else(|| a.find_named_child("identifier"))?;
                let value = a.child_by_field("value").or_else(|| {
                    a.named_children
                        .iter()
                        .find(|c| **c != *name_node && !c.is_punctuation())
                })?;
                Some(LetAssignment {
                    name: name_node.text.clone(),
                    value: self.expr.expression(value),
                })
            })
            .collect()
    }

    /// The body node of a `let`: everything after the assignment header.
    fn let_body<'t>(&self, node: &'t CstNode) -> Option<&'t CstNode> {
        if let Some(body) = node.child_by_field("body") {
            return Some(body);
        }
        node.children.iter().rev().find(|c| {
            c.is_named
                && !c.is_punctuation()
                && !matches!(
                    c.node_type.as_str(),
                    "assignment" | "assignments" | "parenthesized_assignments"
                )
        })
    }
}

impl CstVisitor for ControlStructureVisitor {
    fn error_handler(&self) -> &SharedErrorHandler {
        &self.handler
    }

    /// Declines any statement with no control-structure content. Bodies
    /// of accepted structures are still built in full because traversal
    /// goes through `visit_body`, which bypasses this gate.
    fn visit_statement(&self, node: &CstNode) -> Option<AstNode> {
        if !node.contains_type(CONTROL_NODE_TYPES) {
            return None;
        }
        self.visit_node(unwrap_statement(node)?)
    }

    fn visit_if_statement(&self, node: &CstNode) -> Option<AstNode> {
        self.if_else.visit_if(node, self)
    }

    fn visit_for_statement(&self, node: &CstNode) -> Option<AstNode> {
        self.for_loop.visit_for(node, self)
    }

    fn visit_let_expression(&self, node: &CstNode) -> Option<AstNode> {
        let location = Location::from_node(node);
        let assignments = self.let_assignments(node);
        let Some(body_node) = self.let_body(node) else {
            self.handler
                .log_warning("let without a body", Some(location));
            return None;
        };
        let body = self.visit_body(body_node);
        Some(AstNode::Let(LetNode {
            assignments,
            body,
            location,
        }))
    }

    // Definitions are legal inside any control body; building them here
    // keeps them when a body dispatches through this visitor.
    fn visit_module_definition(&self, node: &CstNode) -> Option<AstNode> {
        Some(build_module_definition(node, &self.handler, self))
    }

    fn visit_function_definition(&self, node: &CstNode) -> Option<AstNode> {
        self.functions.visit_function_definition(node)
    }

    fn visit_each_statement(&self, node: &CstNode) -> Option<AstNode> {
        let location = Location::from_node(node);
        let value_node = node
            .child_by_field("value")
            .or_else(|| {
                node.named_children
                    .iter()
                    .find(|c| !c.is_punctuation())
            })?;
        Some(AstNode::Each(EachNode {
            value: self.expr.expression(value_node),
            location,
        }))
    }

    /// Any call reached from a control-structure body becomes a generic
    /// instantiation; name-specific handling belongs to other visitors.
    fn create_node_for_call(
        &self,
        node: &CstNode,
        name: &str,
        args: Vec<Parameter>,
    ) -> Option<AstNode> {
        Some(AstNode::ModuleInstantiation(ModuleInstantiation {
            name: name.to_string(),
            arguments: args,
            children: call_children(self, node),
            location: Location::from_node(node),
        }))
    }
}
