//! # Function Visitor
//!
//! Handles `function name(params) = expr;` definitions. A function body
//! is a single expression, not a statement list, so conversion goes
//! through the expression visitor rather than statement dispatch.

use crate::ast::{
    AstNode, ExpressionNode, FunctionCallExpression, FunctionDefinition, Identifier, Parameter,
};
use crate::error::{ErrorCode, ErrorNode};
use crate::handler::SharedErrorHandler;
use crate::location::Location;
use crate::visitor::expressions::ExpressionVisitor;
use crate::visitor::{args, CstVisitor};
use openscad_cst::CstNode;

pub struct FunctionVisitor {
    handler: SharedErrorHandler,
    expr: ExpressionVisitor,
}

impl FunctionVisitor {
    pub fn new(handler: SharedErrorHandler) -> Self {
        let expr = ExpressionVisitor::new(handler.clone());
        Self { handler, expr }
    }

    /// The expression to the right of the `=`: a `value`/`body` field, or
    /// the last named child after the parameter list.
    fn body_node<'t>(&self, node: &'t CstNode) -> Option<&'t CstNode> {
        node.child_by_field("value")
            .or_else(|| node.child_by_field("body"))
            .or_else(|| {
                node.children.iter().rev().find(|c| {
                    c.is_named
                        && !c.is_punctuation()
                        && !matches!(
                            c.node_type.as_str(),
                            "identifier" | "parameters" | "parameter_list"
                        )
                })
            })
    }
}

impl CstVisitor for FunctionVisitor {
    fn error_handler(&self) -> &SharedErrorHandler {
        &self.handler
    }

    fn visit_function_definition(&self, node: &CstNode) -> Option<AstNode> {
        let location = Location::from_node(node);

        let Some(name) = args::extract_name(node, Some("function"), &self.handler) else {
            let err = ErrorNode::from_node(
                ErrorCode::MissingName,
                "function definition without a recoverable name",
                node,
            );
            self.handler.log_error(&err.message, err.location);
            return Some(AstNode::Error(err));
        };
        let name = match name.location {
            Some(loc) => Identifier::new(name.name, loc),
            None => Identifier::degraded(name.name),
        };

        let parameters = node
            .child_by_field("parameters")
            .or_else(|| node.find_child("parameters"))
            .or_else(|| node.find_child("parameter_list"))
            .map(|params| args::extract_parameters(params, &self.expr))
            .unwrap_or_default();

        let body = match self.body_node(node) {
            Some(body) => self.expr.expression(body),
            None => {
                let err = ErrorNode::from_node(
                    ErrorCode::MissingBody,
                    format!("function '{}' has no body expression", name.name),
                    node,
                );
                self.handler.log_error(&err.message, err.location);
                ExpressionNode::Error(Box::new(err))
            }
        };

        Some(AstNode::FunctionDefinition(FunctionDefinition {
            name,
            parameters,
            body,
            location,
        }))
    }

    /// Calls claimed by this visitor are expression-level function calls.
    fn create_node_for_call(
        &self,
        node: &CstNode,
        name: &str,
        arguments: Vec<Parameter>,
    ) -> Option<AstNode> {
        if node.node_type != "call_expression" && node.node_type != "function_call" {
            return None;
        }
        Some(AstNode::Expression(ExpressionNode::FunctionCall(
            FunctionCallExpression {
                name: name.to_string(),
                arguments,
                location: Location::from_node(node),
            },
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOperator, LiteralValue};
    use crate::handler::CollectingErrorHandler;
    use std::rc::Rc;

    fn visitor() -> FunctionVisitor {
        FunctionVisitor::new(Rc::new(CollectingErrorHandler::new()))
    }

    fn assignment(name: &str, value: CstNode) -> CstNode {
        CstNode::leaf("assignment", "", 0, 0).with_children(vec![
            CstNode::leaf("identifier", name, 0, name.len()).with_field("name"),
            value.with_field("value"),
        ])
    }

    fn definition(name: &str, params: Vec<CstNode>, body: CstNode) -> CstNode {
        CstNode::leaf("function_definition", &format!("function {name}(...) = ..."), 0, 25)
            .with_children(vec![
                CstNode::leaf("function", "function", 0, 8).anonymous(),
                CstNode::leaf("identifier", name, 9, 9 + name.len()).with_field("name"),
                CstNode::leaf("parameters", "(...)", 0, 5)
                    .with_field("parameters")
                    .with_children(params),
                CstNode::leaf("=", "=", 0, 1).anonymous(),
                body.with_field("value"),
            ])
    }

    #[test]
    fn test_function_definition() {
        let v = visitor();
        let body = CstNode::leaf("binary_expression", "x * 2", 0, 5).with_children(vec![
            CstNode::leaf("identifier", "x", 0, 1).with_field("left"),
            CstNode::leaf("*", "*", 2, 3).anonymous().with_field("operator"),
            CstNode::leaf("number", "2", 4, 5).with_field("right"),
        ]);
        let node = definition("double", vec![assignment("x", CstNode::leaf("number", "1", 0, 1))], body);
        match v.visit_node(&node) {
            Some(AstNode::FunctionDefinition(def)) => {
                assert_eq!(def.name.name, "double");
                assert_eq!(def.parameters.len(), 1);
                match def.parameters[0].default_value.as_ref() {
                    Some(ExpressionNode::Literal(lit)) => {
                        assert_eq!(lit.value, LiteralValue::Number(1.0));
                    }
                    other => panic!("expected default, got {other:?}"),
                }
                match def.body {
                    ExpressionNode::Binary(b) => assert_eq!(b.operator, BinaryOperator::Multiply),
                    other => panic!("expected binary body, got {other:?}"),
                }
            }
            other => panic!("expected definition, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_body_is_error_expression() {
        let handler = Rc::new(CollectingErrorHandler::new());
        let v = FunctionVisitor::new(handler.clone() as SharedErrorHandler);
        let node = CstNode::leaf("function_definition", "function f()", 0, 12).with_children(vec![
            CstNode::leaf("function", "function", 0, 8).anonymous(),
            CstNode::leaf("identifier", "f", 9, 10).with_field("name"),
            CstNode::leaf("parameters", "()", 10, 12).with_field("parameters"),
        ]);
        match v.visit_node(&node) {
            Some(AstNode::FunctionDefinition(def)) => match def.body {
                ExpressionNode::Error(err) => {
                    assert_eq!(err.error_code, ErrorCode::MissingBody);
                }
                other => panic!("expected error body, got {other:?}"),
            },
            other => panic!("expected definition, got {other:?}"),
        }
        assert!(handler.has_errors());
    }

    #[test]
    fn test_declines_statement_calls() {
        let v = visitor();
        let node = crate::visitor::tests_support::call_node("cube");
        assert!(v.visit_node(&node).is_none());
    }
}
