//! For-loop conversion.
//!
//! A loop header may bind several variables (`for (i = [0:2], j = v)`);
//! bindings keep their source order. Iterables are ordinary expressions,
//! so range validation happens in the range visitor, not here.

use crate::ast::{AstNode, ForAssignment, ForLoopNode};
use crate::handler::SharedErrorHandler;
use crate::location::Location;
use crate::visitor::expressions::ExpressionVisitor;
use crate::visitor::CstVisitor;
use openscad_cst::CstNode;

pub struct ForLoopVisitor {
    handler: SharedErrorHandler,
    expr: ExpressionVisitor,
}

impl ForLoopVisitor {
    pub fn new(handler: SharedErrorHandler) -> Self {
        let expr = ExpressionVisitor::new(handler.clone());
        Self { handler, expr }
    }

    /// Converts a `for_statement`. `body_visitor` dispatches the loop body.
    pub fn visit_for(&self, node: &CstNode, body_visitor: &dyn CstVisitor) -> Option<AstNode> {
        let location = Location::from_node(node);

        let container = self.assignment_container(node);
        let assignments = self.assignments(container.unwrap_or(node));
        if assignments.is_empty() {
            self.handler
                .log_warning("for loop without iterator assignments", Some(location));
        }

        // Missing body: decline and let the root traversal surface it.
        let Some(body_node) = self.body_node(node, container) else {
            self.handler
                .log_warning("for loop without a body", Some(location));
            return None;
        };
        let body = body_visitor.visit_body(body_node);

        Some(AstNode::ForLoop(ForLoopNode {
            assignments,
            body,
            location,
        }))
    }

    fn assignment_container<'t>(&self, node: &'t CstNode) -> Option<&'t CstNode> {
        node.child_by_field("iterator")
            .or_else(|| node.find_child("assignments"))
            .or_else(|| node.find_child("parenthesized_assignments"))
    }

    fn assignments(&self, container: &CstNode) -> Vec<ForAssignment> {
        container
            .children
            .iter()
            .filter(|c| c.node_type == "assignment")
            .filter_map(|a| self.assignment(a))
            .collect()
    }

    fn assignment(&self, node: &CstNode) -> Option<ForAssignment> {
        let name_node = node
            .child_by_field("name")
            .or_else(|| node.find_named_child("identifier"))?;
        let value = node.child_by_field("value").or_else(|| {
            node.named_children
                .iter()
                .find(|c| **c != *name_node && !c.is_punctuation())
        })?;
        Some(ForAssignment {
            variable: name_node.text.clone(),
            iterable: self.expr.expression(value),
            location: Location::from_node(node),
        })
    }

    /// The loop body: a `body` field, a block, or the last named child
    /// after the assignment container.
    fn body_node<'t>(
        &self,
        node: &'t CstNode,
        container: Option<&CstNode>,
    ) -> Option<&'t CstNode> {
        if let Some(body) = node.child_by_field("body") {
            return Some(body);
        }
        if let Some(block) = node
            .find_child("block")
            .or_else(|| node.find_child("union_block"))
        {
            return Some(block);
        }
        node.children.iter().rev().find(|c| {
            c.is_named
                && !c.is_punctuation()
                && c.node_type != "assignment"
                && !container.is_some_and(|cont| std::ptr::eq(*c, cont))
        })
    }
}
