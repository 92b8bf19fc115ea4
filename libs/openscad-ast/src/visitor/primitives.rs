//! # Primitive Visitor
//!
//! Claims calls to the built-in 2D and 3D primitive shapes, by name.
//! Anything else is declined so another visitor can take it.

use crate::ast::{AstNode, ModuleInstantiation, Parameter};
use crate::handler::SharedErrorHandler;
use crate::location::Location;
use crate::visitor::{call_children, CstVisitor};
use openscad_cst::CstNode;

/// Built-in primitive shape names, 3D then 2D.
pub const PRIMITIVE_NAMES: &[&str] = &[
    "cube",
    "sphere",
    "cylinder",
    "polyhedron",
    "square",
    "circle",
    "polygon",
    "text",
];

pub struct PrimitiveVisitor {
    handler: SharedErrorHandler,
}

impl PrimitiveVisitor {
    pub fn new(handler: SharedErrorHandler) -> Self {
        Self { handler }
    }

    pub fn is_primitive(name: &str) -> bool {
        PRIMITIVE_NAMES.contains(&name)
    }
}

impl CstVisitor for PrimitiveVisitor {
    fn error_handler(&self) -> &SharedErrorHandler {
        &self.handler
    }

    fn create_node_for_call(
        &self,
        node: &CstNode,
        name: &str,
        args: Vec<Parameter>,
    ) -> Option<AstNode> {
        if !Self::is_primitive(name) {
            return None;
        }
        Some(AstNode::ModuleInstantiation(ModuleInstantiation {
            name: name.to_string(),
            arguments: args,
            children: call_children(self, node),
            location: Location::from_node(node),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ExpressionNode, LiteralValue};
    use crate::handler::CollectingErrorHandler;
    use crate::visitor::tests_support::call_node;
    use std::rc::Rc;

    fn visitor() -> PrimitiveVisitor {
        PrimitiveVisitor::new(Rc::new(CollectingErrorHandler::new()))
    }

    #[test]
    fn test_claims_primitive_call_with_arguments() {
        let v = visitor();
        let node = CstNode::leaf("module_instantiation", "cube(10)", 0, 8).with_children(vec![
            CstNode::leaf("identifier", "cube", 0, 4).with_field("name"),
            CstNode::leaf("arguments", "(10)", 4, 8)
                .with_field("arguments")
                .with_children(vec![CstNode::leaf("number", "10", 5, 7)]),
        ]);
        match v.visit_node(&node) {
            Some(AstNode::ModuleInstantiation(m)) => {
                assert_eq!(m.name, "cube");
                assert_eq!(m.arguments.len(), 1);
                match &m.arguments[0].value {
                    ExpressionNode::Literal(lit) => {
                        assert_eq!(lit.value, LiteralValue::Number(10.0));
                    }
                    other => panic!("expected literal, got {other:?}"),
                }
                assert!(m.children.is_empty());
            }
            other => panic!("expected instantiation, got {other:?}"),
        }
    }

    #[test]
    fn test_declines_non_primitive_call() {
        let v = visitor();
        assert!(v.visit_node(&call_node("translate")).is_none());
        assert!(v.visit_node(&call_node("mymodule")).is_none());
    }

    #[test]
    fn test_declines_statement_without_primitive() {
        let v = visitor();
        let stmt = crate::visitor::tests_support::call_statement("union");
        assert!(v.visit_node(&stmt).is_none());
    }
}
