//! If/else conversion, including `else if` chains.
//!
//! Branch bodies are built through a caller-supplied dispatch visitor so
//! that anything legal at statement level (nested control structures,
//! instantiations, definitions) is legal in a branch.

use crate::ast::{AstNode, ExpressionNode, IfNode};
use crate::error::{ErrorCode, ErrorNode};
use crate::handler::SharedErrorHandler;
use crate::location::Location;
use crate::visitor::expressions::ExpressionVisitor;
use crate::visitor::{unwrap_statement, CstVisitor};
use openscad_cst::CstNode;

pub struct IfElseVisitor {
    handler: SharedErrorHandler,
    expr: ExpressionVisitor,
}

impl IfElseVisitor {
    pub fn new(handler: SharedErrorHandler) -> Self {
        let expr = ExpressionVisitor::new(handler.clone());
        Self { handler, expr }
    }

    /// Converts an `if_statement`. `body_visitor` dispatches the branch
    /// bodies, so the caller decides what a branch may contain.
    pub fn visit_if(&self, node: &CstNode, body_visitor: &dyn CstVisitor) -> Option<AstNode> {
        let location = Location::from_node(node);
        let condition_node = self.condition_node(node);

        let condition = match condition_node {
            Some(cond) => self.expr.expression(cond),
            None => {
                let err = ErrorNode::from_node(
                    ErrorCode::SyntaxError,
                    "if statement without a condition",
                    node,
                );
                self.handler.log_error(&err.message, err.location);
                ExpressionNode::Error(Box::new(err))
            }
        };

        let (then_node, else_node) = self.branch_nodes(node, condition_node);

        // Missing body: decline and let the root traversal surface it.
        let Some(then_node) = then_node else {
            self.handler
                .log_warning("if statement without a body", Some(location));
            return None;
        };
        let then_branch = body_visitor.visit_body(then_node);

        // `else if` becomes a single nested If inside the else branch, so
        // arbitrarily long chains nest rather than flatten.
        let else_branch = else_node.map(|n| {
            let inner = unwrap_statement(n).unwrap_or(n);
            if inner.node_type == "if_statement" {
                self.visit_if(inner, body_visitor).into_iter().collect()
            } else {
                body_visitor.visit_body(n)
            }
        });

        Some(AstNode::If(IfNode {
            condition,
            then_branch,
            else_branch,
            location,
        }))
    }

    /// The condition child: a `condition` field, or the parenthesized
    /// expression between `if` and the body.
    fn condition_node<'t>(&self, node: &'t CstNode) -> Option<&'t CstNode> {
        node.child_by_field("condition")
            .or_else(|| node.find_child("parenthesized_expression"))
            .or_else(|| node.find_child("condition"))
    }

    /// The consequence and alternative children, field-first with a
    /// positional fallback keyed on the `else` token.
    fn branch_nodes<'t>(
        &self,
        node: &'t CstNode,
        condition: Option<&CstNode>,
    ) -> (Option<&'t CstNode>, Option<&'t CstNode>) {
        if let Some(consequence) = node.child_by_field("consequence") {
            let alternative = node.child_by_field("alternative").or_else(|| {
                node.find_child("else_clause")
                    .and_then(|clause| clause.named_children.iter().find(|c| !c.is_punctuation()))
            });
            return (Some(consequence), alternative);
        }

        let mut then_node = None;
        let mut else_node = None;
        let mut seen_else = false;
        for child in &node.children {
            if !child.is_named {
                if child.text == "else" {
                    seen_else = true;
                }
                continue;
            }
            if condition.is_some_and(|cond| std::ptr::eq(child, cond)) {
                continue;
            }
            if child.node_type == "else_clause" {
                else_node = child.named_children.iter().find(|c| !c.is_punctuation());
                continue;
            }
            if then_node.is_none() && !seen_else {
                then_node = Some(child);
            } else if else_node.is_none() {
                else_node = Some(child);
            }
        }
        (then_node, else_node)
    }
}
