//! # Composite Visitor
//!
//! Unifies the specialized visitors behind one [`CstVisitor`] face.
//! Dispatch is type-keyed first: each `visit_*` override asks the
//! delegates for that construct in registration order and takes the first
//! `Some`. Node types outside the keyed set fall back to asking every
//! delegate's full `visit_node` in the same order.
//!
//! Registration order is the priority contract: earlier delegates win
//! ties. The default lineup puts the name-gated visitors first and the
//! catch-all module visitor last, so user-defined calls only reach it
//! after every built-in name has been ruled out.

use crate::ast::{AstNode, Parameter};
use crate::error::{ErrorCode, ErrorNode};
use crate::handler::SharedErrorHandler;
use crate::visitor::control::ControlStructureVisitor;
use crate::visitor::csg::CsgVisitor;
use crate::visitor::expressions::ExpressionVisitor;
use crate::visitor::functions::FunctionVisitor;
use crate::visitor::modules::ModuleVisitor;
use crate::visitor::primitives::PrimitiveVisitor;
use crate::visitor::transforms::TransformVisitor;
use crate::visitor::CstVisitor;
use openscad_cst::CstNode;

pub struct CompositeVisitor {
    delegates: Vec<Box<dyn CstVisitor>>,
    handler: SharedErrorHandler,
}

impl CompositeVisitor {
    /// Builds a composite over an explicit delegate lineup. Order matters:
    /// it is the tie-break priority.
    pub fn new(delegates: Vec<Box<dyn CstVisitor>>, handler: SharedErrorHandler) -> Self {
        Self { delegates, handler }
    }

    /// The full default lineup: primitives, transforms, CSG, control
    /// structures, functions, expressions, then the catch-all module
    /// visitor.
    pub fn with_default_visitors(handler: SharedErrorHandler) -> Self {
        let delegates: Vec<Box<dyn CstVisitor>> = vec![
            Box::new(PrimitiveVisitor::new(handler.clone())),
            Box::new(TransformVisitor::new(handler.clone())),
            Box::new(CsgVisitor::new(handler.clone())),
            Box::new(ControlStructureVisitor::new(handler.clone())),
            Box::new(FunctionVisitor::new(handler.clone())),
            Box::new(ExpressionVisitor::new(handler.clone())),
            Box::new(ModuleVisitor::new(handler.clone())),
        ];
        Self::new(delegates, handler)
    }

    pub fn delegate_count(&self) -> usize {
        self.delegates.len()
    }

    fn first_some<F>(&self, ask: F) -> Option<AstNode>
    where
        F: Fn(&dyn CstVisitor) -> Option<AstNode>,
    {
        self.delegates.iter().find_map(|d| ask(d.as_ref()))
    }
}

impl CstVisitor for CompositeVisitor {
    fn error_handler(&self) -> &SharedErrorHandler {
        &self.handler
    }

    fn visit_statement(&self, node: &CstNode) -> Option<AstNode> {
        self.first_some(|d| d.visit_statement(node))
    }

    fn visit_module_instantiation(&self, node: &CstNode) -> Option<AstNode> {
        self.first_some(|d| d.visit_module_instantiation(node))
    }

    fn visit_call_expression(&self, node: &CstNode) -> Option<AstNode> {
        self.first_some(|d| d.visit_call_expression(node))
    }

    fn visit_module_definition(&self, node: &CstNode) -> Option<AstNode> {
        self.first_some(|d| d.visit_module_definition(node))
    }

    fn visit_function_definition(&self, node: &CstNode) -> Option<AstNode> {
        self.first_some(|d| d.visit_function_definition(node))
    }

    fn visit_if_statement(&self, node: &CstNode) -> Option<AstNode> {
        self.first_some(|d| d.visit_if_statement(node))
    }

    fn visit_for_statement(&self, node: &CstNode) -> Option<AstNode> {
        self.first_some(|d| d.visit_for_statement(node))
    }

    fn visit_let_expression(&self, node: &CstNode) -> Option<AstNode> {
        self.first_some(|d| d.visit_let_expression(node))
    }

    fn visit_each_statement(&self, node: &CstNode) -> Option<AstNode> {
        self.first_some(|d| d.visit_each_statement(node))
    }

    fn visit_assignment(&self, node: &CstNode) -> Option<AstNode> {
        self.first_some(|d| d.visit_assignment(node))
    }

    fn visit_expression(&self, node: &CstNode) -> Option<AstNode> {
        self.first_some(|d| d.visit_expression(node))
    }

    /// Parser `ERROR` nodes become error AST nodes here, not in the
    /// delegates, so a tree with syntax errors still yields one node per
    /// top-level construct.
    fn visit_error(&self, node: &CstNode) -> Option<AstNode> {
        if let Some(result) = self.first_some(|d| d.visit_error(node)) {
            return Some(result);
        }
        let err = ErrorNode::from_node(
            ErrorCode::SyntaxError,
            format!("syntax error near '{}'", truncate(&node.text)),
            node,
        );
        self.handler.log_error(&err.message, err.location);
        Some(AstNode::Error(err))
    }

    /// Reached only through this type's own default dispatch; delegates
    /// answer calls through their `visit_*` overrides instead.
    fn create_node_for_call(
        &self,
        node: &CstNode,
        _name: &str,
        _args: Vec<Parameter>,
    ) -> Option<AstNode> {
        self.first_some(|d| d.visit_module_instantiation(node))
    }

    /// Unknown node types: full-dispatch fallback through every delegate.
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
            _ => self.first_some(|d| d.visit_node(node)),
        }
    }
}

fn truncate(text: &str) -> String {
    text.chars()
        .take(config::constants::ERROR_SNIPPET_MAX_LEN)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::CollectingErrorHandler;
    use crate::visitor::tests_support::{call_statement, if_node};
    use std::rc::Rc;

    fn composite() -> CompositeVisitor {
        CompositeVisitor::with_default_visitors(Rc::new(CollectingErrorHandler::new()))
    }

    fn pair() -> CompositeVisitor {
        // Only primitives and control structures registered.
        let handler: SharedErrorHandler = Rc::new(CollectingErrorHandler::new());
        CompositeVisitor::new(
            vec![
                Box::new(PrimitiveVisitor::new(handler.clone())),
                Box::new(ControlStructureVisitor::new(handler.clone())),
            ],
            handler,
        )
    }

    #[test]
    fn test_default_lineup_size() {
        assert_eq!(composite().delegate_count(), 7);
    }

    #[test]
    fn test_primitive_statement() {
        let v = composite();
        match v.visit_node(&call_statement("cube")) {
            Some(AstNode::ModuleInstantiation(m)) => assert_eq!(m.name, "cube"),
            other => panic!("expected instantiation, got {other:?}"),
        }
    }

    #[test]
    fn test_user_module_call_reaches_catch_all() {
        let v = composite();
        match v.visit_node(&call_statement("my_bracket")) {
            Some(AstNode::ModuleInstantiation(m)) => assert_eq!(m.name, "my_bracket"),
            other => panic!("expected instantiation, got {other:?}"),
        }
    }

    #[test]
    fn test_if_statement_goes_to_control_not_primitives() {
        // The primitive visitor is registered first but declines the if
        // statement; the control visitor builds it with its body intact.
        let v = pair();
        let stmt = CstNode::leaf("statement", "if (true) cube(1);", 0, 18)
            .with_children(vec![if_node("true", call_statement("cube"), None)]);
        match v.visit_node(&stmt) {
            Some(AstNode::If(if_ast)) => {
                assert_eq!(if_ast.then_branch.len(), 1);
                match &if_ast.then_branch[0] {
                    AstNode::ModuleInstantiation(m) => assert_eq!(m.name, "cube"),
                    other => panic!("expected body instantiation, got {other:?}"),
                }
            }
            other => panic!("expected if, got {other:?}"),
        }
    }

    #[test]
    fn test_bare_primitive_still_wins_in_pair() {
        let v = pair();
        match v.visit_node(&call_statement("cube")) {
            Some(AstNode::ModuleInstantiation(m)) => assert_eq!(m.name, "cube"),
            other => panic!("expected instantiation, got {other:?}"),
        }
    }

    #[test]
    fn test_error_node_becomes_error_ast() {
        let handler = Rc::new(CollectingErrorHandler::new());
        let v = CompositeVisitor::with_default_visitors(handler.clone() as SharedErrorHandler);
        let node = CstNode::leaf("ERROR", "cube(((", 0, 7);
        match v.visit_node(&node) {
            Some(AstNode::Error(err)) => assert_eq!(err.error_code, ErrorCode::SyntaxError),
            other => panic!("expected error, got {other:?}"),
        }
        assert!(handler.has_errors());
    }

    #[test]
    fn test_revisit_is_deep_equal() {
        let v = composite();
        let stmt = CstNode::leaf("statement", "if (true) cube(1);", 0, 18)
            .with_children(vec![if_node("true", call_statement("cube"), None)]);
        assert_eq!(v.visit_node(&stmt), v.visit_node(&stmt));
    }

    #[test]
    fn test_definition_dispatch() {
        let v = composite();
        let node = CstNode::leaf("module_definition", "module m() {}", 0, 13).with_children(vec![
            CstNode::leaf("module", "module", 0, 6).anonymous(),
            CstNode::leaf("identifier", "m", 7, 8).with_field("name"),
            CstNode::leaf("parameters", "()", 8, 10).with_field("parameters"),
            CstNode::leaf("block", "{}", 11, 13).with_field("body"),
        ]);
        match v.visit_node(&node) {
            Some(AstNode::ModuleDefinition(def)) => assert_eq!(def.name.name, "m"),
            other => panic!("expected definition, got {other:?}"),
        }
    }
}
