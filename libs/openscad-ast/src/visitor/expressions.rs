//! # Expression Visitor
//!
//! Transforms CST expression nodes to typed [`ExpressionNode`] values.
//! The conversion is total: every input maps to an expression, with the
//! `Error` variant standing in for anything that cannot be built. Nothing
//! in this module panics or throws on malformed input.
//!
//! Range syntax is delegated to the owned
//! [`RangeExpressionVisitor`](crate::visitor::range::RangeExpressionVisitor).

use crate::ast::{
    AstNode, BinaryExpression, BinaryOperator, ExpressionNode, FunctionCallExpression,
    IdentifierExpression, LiteralExpression, LiteralValue, Parameter, TernaryExpression,
    UnaryExpression, UnaryOperator, VectorExpression,
};
use crate::error::{ErrorCode, ErrorNode};
use crate::handler::SharedErrorHandler;
use crate::location::Location;
use crate::visitor::range::RangeExpressionVisitor;
use crate::visitor::{args, CstVisitor};
use config::constants::is_reserved_keyword;
use openscad_cst::CstNode;

/// Visitor for the expression slice of the grammar: literals, identifiers,
/// vectors, binary/unary/ternary operators, parenthesized groups and
/// calls in expression position.
pub struct ExpressionVisitor {
    handler: SharedErrorHandler,
    range: RangeExpressionVisitor,
}

impl ExpressionVisitor {
    pub fn new(handler: SharedErrorHandler) -> Self {
        let range = RangeExpressionVisitor::new(handler.clone());
        Self { handler, range }
    }

    /// Total CST→expression conversion. Failures come back as
    /// [`ExpressionNode::Error`], never as `None` or a panic.
    pub fn expression(&self, node: &CstNode) -> ExpressionNode {
        match node.node_type.as_str() {
            "number" => self.number(node),
            "string" => self.string(node),
            "boolean" | "true" | "false" => self.boolean(node),
            "undef" => ExpressionNode::Literal(LiteralExpression {
                value: LiteralValue::Undef,
                location: Location::from_node(node),
            }),
            "identifier" | "special_variable" => self.identifier(node),
            "vector_expression" | "list_expression" => self.vector(node),
            "range_expression" => self.range.visit_range_expression(node),
            "binary_expression" => self.binary(node),
            "unary_expression" => self.unary(node),
            "conditional_expression" | "ternary_expression" => self.ternary(node),
            "parenthesized_expression" => self.parenthesized(node),
            "call_expression" | "function_call" => self.call(node),
            "argument" => self.unwrap_single_child(node),
            "ERROR" => {
                let err = ErrorNode::from_node(
                    ErrorCode::SyntaxError,
                    format!("syntax error near '{}'", snippet(node)),
                    node,
                );
                self.handler.log_error(&err.message, err.location);
                ExpressionNode::Error(Box::new(err))
            }
            _ => self.fallback(node),
        }
    }

    fn number(&self, node: &CstNode) -> ExpressionNode {
        match node.text.parse::<f64>() {
            Ok(value) => ExpressionNode::Literal(LiteralExpression {
                value: LiteralValue::Number(value),
                location: Location::from_node(node),
            }),
            Err(parse_err) => {
                let err = ErrorNode::from_node(
                    ErrorCode::InvalidLiteral,
                    format!("invalid number literal '{}'", node.text),
                    node,
                )
                .with_cause(parse_err.to_string());
                self.handler.log_error(&err.message, err.location);
                ExpressionNode::Error(Box::new(err))
            }
        }
    }

    fn string(&self, node: &CstNode) -> ExpressionNode {
        let text = node.text.as_str();
        let content = text
            .strip_prefix('"')
            .and_then(|t| t.strip_suffix('"'))
            .unwrap_or(text);
        ExpressionNode::Literal(LiteralExpression {
            value: LiteralValue::String(content.to_string()),
            location: Location::from_node(node),
        })
    }

    fn boolean(&self, node: &CstNode) -> ExpressionNode {
        ExpressionNode::Literal(LiteralExpression {
            value: LiteralValue::Boolean(node.text == "true"),
            location: Location::from_node(node),
        })
    }

    fn identifier(&self, node: &CstNode) -> ExpressionNode {
        if is_reserved_keyword(&node.text) {
            let err = ErrorNode::from_node(
                ErrorCode::SyntaxError,
                format!("reserved keyword '{}' used as identifier", node.text),
                node,
            );
            self.handler.log_error(&err.message, err.location);
            return ExpressionNode::Error(Box::new(err));
        }
        ExpressionNode::Identifier(IdentifierExpression {
            name: node.text.clone(),
            location: Location::from_node(node),
        })
    }

    fn vector(&self, node: &CstNode) -> ExpressionNode {
        let elements = node
            .named_children
            .iter()
            .filter(|c| !c.is_punctuation())
            .map(|c| self.expression(c))
            .collect();
        ExpressionNode::Vector(VectorExpression {
            elements,
            location: Location::from_node(node),
        })
    }

    fn binary(&self, node: &CstNode) -> ExpressionNode {
        let location = Location::from_node(node);

        let left = node.child_by_field("left");
        let right = node.child_by_field("right");
        let operator = node.child_by_field("operator");

        // Field layout first, then positional operand/operator/operand.
        let slots = match (left, operator, right) {
            (Some(l), Some(o), Some(r)) => Some((l, o, r)),
            _ => match (node.child(0), node.child(1), node.child(2)) {
                (Some(l), Some(o), Some(r)) => Some((l, o, r)),
                _ => None,
            },
        };
        let Some((left, operator, right)) = slots else {
            let err = ErrorNode::from_node(
                ErrorCode::SyntaxError,
                "binary expression missing operand or operator",
                node,
            );
            self.handler.log_error(&err.message, err.location);
            return ExpressionNode::Error(Box::new(err));
        };

        let Some(op) = BinaryOperator::from_token(&operator.text) else {
            let err = ErrorNode::from_node(
                ErrorCode::UnsupportedNode,
                format!("unknown binary operator '{}'", operator.text),
                node,
            );
            self.handler.log_error(&err.message, err.location);
            return ExpressionNode::Error(Box::new(err));
        };

        ExpressionNode::Binary(BinaryExpression {
            operator: op,
            left: Box::new(self.expression(left)),
            right: Box::new(self.expression(right)),
            location,
        })
    }

    fn unary(&self, node: &CstNode) -> ExpressionNode {
        let operand = node
            .child_by_field("operand")
            .or_else(|| node.child(1))
            .filter(|c| !c.is_punctuation() || c.child_count() > 0);
        let operator = node.child_by_field("operator").or_else(|| node.child(0));

        let (Some(operator), Some(operand)) = (operator, operand) else {
            let err = ErrorNode::from_node(
                ErrorCode::SyntaxError,
                "unary expression missing operand",
                node,
            );
            self.handler.log_error(&err.message, err.location);
            return ExpressionNode::Error(Box::new(err));
        };

        let Some(op) = UnaryOperator::from_token(&operator.text) else {
            let err = ErrorNode::from_node(
                ErrorCode::UnsupportedNode,
                format!("unknown unary operator '{}'", operator.text),
                node,
            );
            self.handler.log_error(&err.message, err.location);
            return ExpressionNode::Error(Box::new(err));
        };

        ExpressionNode::Unary(UnaryExpression {
            operator: op,
            operand: Box::new(self.expression(operand)),
            location: Location::from_node(node),
        })
    }

    fn ternary(&self, node: &CstNode) -> ExpressionNode {
        let condition = node.child_by_field("condition");
        let consequence = node.child_by_field("consequence");
        let alternative = node.child_by_field("alternative");

        let (condition, consequence, alternative) = match (condition, consequence, alternative) {
            (Some(c), Some(t), Some(a)) => (c, t, a),
            _ => {
                // Positional layout: cond ? cons : alt with anonymous tokens.
                let named: Vec<&CstNode> = node
                    .named_children
                    .iter()
                    .filter(|c| !c.is_punctuation())
                    .collect();
                if named.len() < 3 {
                    let err = ErrorNode::from_node(
                        ErrorCode::SyntaxError,
                        "conditional expression needs condition, consequence and alternative",
                        node,
                    );
                    self.handler.log_error(&err.message, err.location);
                    return ExpressionNode::Error(Box::new(err));
                }
                (named[0], named[1], named[2])
            }
        };

        ExpressionNode::Ternary(TernaryExpression {
            condition: Box::new(self.expression(condition)),
            consequence: Box::new(self.expression(consequence)),
            alternative: Box::new(self.expression(alternative)),
            location: Location::from_node(node),
        })
    }

    fn parenthesized(&self, node: &CstNode) -> ExpressionNode {
        match node.named_children.iter().find(|c| !c.is_punctuation()) {
            Some(inner) => self.expression(inner),
            None => {
                let err =
                    ErrorNode::from_node(ErrorCode::SyntaxError, "empty parentheses", node);
                self.handler.log_error(&err.message, err.location);
                ExpressionNode::Error(Box::new(err))
            }
        }
    }

    fn call(&self, node: &CstNode) -> ExpressionNode {
        match args::extract_call_signature(node, &self.handler) {
            Some(call) => ExpressionNode::FunctionCall(FunctionCallExpression {
                name: call.name,
                arguments: call.arguments,
                location: Location::from_node(node),
            }),
            None => {
                let err = ErrorNode::from_node(
                    ErrorCode::MissingName,
                    "call expression without a recoverable name",
                    node,
                );
                self.handler.log_error(&err.message, err.location);
                ExpressionNode::Error(Box::new(err))
            }
        }
    }

    fn unwrap_single_child(&self, node: &CstNode) -> ExpressionNode {
        match node.named_children.iter().find(|c| !c.is_punctuation()) {
            Some(inner) => self.expression(inner),
            None => self.fallback(node),
        }
    }

    /// Last resort: unwrap single-child wrapper nodes the grammar
    /// introduces, otherwise report an unsupported node.
    fn fallback(&self, node: &CstNode) -> ExpressionNode {
        let named: Vec<&CstNode> = node
            .named_children
            .iter()
            .filter(|c| !c.is_punctuation())
            .collect();
        if named.len() == 1 {
            return self.expression(named[0]);
        }
        let err = ErrorNode::from_node(
            ErrorCode::UnsupportedNode,
            format!("unsupported expression node '{}'", node.node_type),
            node,
        );
        self.handler.log_warning(&err.message, err.location);
        ExpressionNode::Error(Box::new(err))
    }
}

impl CstVisitor for ExpressionVisitor {
    fn error_handler(&self) -> &SharedErrorHandler {
        &self.handler
    }

    /// Claims calls in expression position only; statement-level
    /// instantiations belong to the statement visitors.
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

    fn visit_expression(&self, node: &CstNode) -> Option<AstNode> {
        Some(AstNode::Expression(self.expression(node)))
    }
}

fn snippet(node: &CstNode) -> String {
    node.text
        .chars()
        .take(config::constants::ERROR_SNIPPET_MAX_LEN)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::CollectingErrorHandler;
    use std::rc::Rc;

    fn visitor() -> ExpressionVisitor {
        ExpressionVisitor::new(Rc::new(CollectingErrorHandler::new()))
    }

    fn binary_node(left: CstNode, op: &str, right: CstNode) -> CstNode {
        let text = format!("{} {} {}", left.text, op, right.text);
        CstNode::leaf("binary_expression", &text, 0, text.len()).with_children(vec![
            left.with_field("left"),
            CstNode::leaf(op, op, 0, op.len()).anonymous().with_field("operator"),
            right.with_field("right"),
        ])
    }

    #[test]
    fn test_number_literal() {
        let expr = visitor().expression(&CstNode::leaf("number", "3.14", 0, 4));
        match expr {
            ExpressionNode::Literal(lit) => match lit.value {
                LiteralValue::Number(n) => assert!((n - 3.14).abs() < 1e-9),
                other => panic!("expected number, got {other:?}"),
            },
            other => panic!("expected literal, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_number_is_error_value() {
        let v = visitor();
        let expr = v.expression(&CstNode::leaf("number", "1.2.3", 0, 5));
        match expr {
            ExpressionNode::Error(err) => {
                assert_eq!(err.error_code, ErrorCode::InvalidLiteral);
                assert!(err.cause.is_some());
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn test_string_strips_quotes() {
        let expr = visitor().expression(&CstNode::leaf("string", "\"hello\"", 0, 7));
        match expr {
            ExpressionNode::Literal(lit) => {
                assert_eq!(lit.value, LiteralValue::String("hello".to_string()));
            }
            other => panic!("expected literal, got {other:?}"),
        }
    }

    #[test]
    fn test_identifier() {
        let expr = visitor().expression(&CstNode::leaf("identifier", "size", 0, 4));
        match expr {
            ExpressionNode::Identifier(id) => assert_eq!(id.name, "size"),
            other => panic!("expected identifier, got {other:?}"),
        }
    }

    #[test]
    fn test_reserved_keyword_identifier_is_error() {
        let expr = visitor().expression(&CstNode::leaf("identifier", "for", 0, 3));
        match expr {
            ExpressionNode::Error(err) => assert_eq!(err.error_code, ErrorCode::SyntaxError),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn test_vector_elements() {
        let node = CstNode::leaf("vector_expression", "[1, 2, 3]", 0, 9).with_children(vec![
            CstNode::leaf("[", "[", 0, 1).anonymous(),
            CstNode::leaf("number", "1", 1, 2),
            CstNode::leaf("number", "2", 4, 5),
            CstNode::leaf("number", "3", 7, 8),
            CstNode::leaf("]", "]", 8, 9).anonymous(),
        ]);
        match visitor().expression(&node) {
            ExpressionNode::Vector(v) => assert_eq!(v.elements.len(), 3),
            other => panic!("expected vector, got {other:?}"),
        }
    }

    #[test]
    fn test_binary_expression_fields() {
        let node = binary_node(
            CstNode::leaf("number", "1", 0, 1),
            "+",
            CstNode::leaf("number", "2", 4, 5),
        );
        match visitor().expression(&node) {
            ExpressionNode::Binary(b) => {
                assert_eq!(b.operator, BinaryOperator::Add);
                assert!(matches!(*b.left, ExpressionNode::Literal(_)));
            }
            other => panic!("expected binary, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_binary_expression() {
        let inner = binary_node(
            CstNode::leaf("number", "2", 4, 5),
            "*",
            CstNode::leaf("number", "3", 8, 9),
        );
        let node = binary_node(CstNode::leaf("number", "1", 0, 1), "+", inner);
        match visitor().expression(&node) {
            ExpressionNode::Binary(b) => {
                assert_eq!(b.operator, BinaryOperator::Add);
                assert!(matches!(*b.right, ExpressionNode::Binary(_)));
            }
            other => panic!("expected binary, got {other:?}"),
        }
    }

    #[test]
    fn test_unary_expression() {
        let node = CstNode::leaf("unary_expression", "-x", 0, 2).with_children(vec![
            CstNode::leaf("-", "-", 0, 1).anonymous().with_field("operator"),
            CstNode::leaf("identifier", "x", 1, 2).with_field("operand"),
        ]);
        match visitor().expression(&node) {
            ExpressionNode::Unary(u) => assert_eq!(u.operator, UnaryOperator::Minus),
            other => panic!("expected unary, got {other:?}"),
        }
    }

    #[test]
    fn test_ternary_positional() {
        let node = CstNode::leaf("conditional_expression", "a ? 1 : 2", 0, 9).with_children(vec![
            CstNode::leaf("identifier", "a", 0, 1),
            CstNode::leaf("?", "?", 2, 3).anonymous(),
            CstNode::leaf("number", "1", 4, 5),
            CstNode::leaf(":", ":", 6, 7).anonymous(),
            CstNode::leaf("number", "2", 8, 9),
        ]);
        match visitor().expression(&node) {
            ExpressionNode::Ternary(t) => {
                assert!(matches!(*t.condition, ExpressionNode::Identifier(_)));
                assert!(matches!(*t.alternative, ExpressionNode::Literal(_)));
            }
            other => panic!("expected ternary, got {other:?}"),
        }
    }

    #[test]
    fn test_function_call_expression() {
        let node = CstNode::leaf("call_expression", "max(1, 2)", 0, 9).with_children(vec![
            CstNode::leaf("identifier", "max", 0, 3).with_field("name"),
            CstNode::leaf("arguments", "(1, 2)", 3, 9)
                .with_field("arguments")
                .with_children(vec![
                    CstNode::leaf("number", "1", 4, 5),
                    CstNode::leaf("number", "2", 7, 8),
                ]),
        ]);
        match visitor().expression(&node) {
            ExpressionNode::FunctionCall(call) => {
                assert_eq!(call.name, "max");
                assert_eq!(call.arguments.len(), 2);
            }
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_node_logs_and_returns_error() {
        let handler = Rc::new(CollectingErrorHandler::new());
        let v = ExpressionVisitor::new(handler.clone() as SharedErrorHandler);
        let expr = v.expression(&CstNode::leaf("mystery_expression", "???", 0, 3));
        assert!(expr.is_error());
        assert_eq!(handler.diagnostics().len(), 1);
    }

    #[test]
    fn test_idempotent_visits() {
        let v = visitor();
        let node = binary_node(
            CstNode::leaf("number", "1", 0, 1),
            "+",
            CstNode::leaf("number", "2", 4, 5),
        );
        assert_eq!(v.expression(&node), v.expression(&node));
    }
}
