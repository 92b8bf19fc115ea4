//! # CSG Visitor
//!
//! Claims calls to the boolean/combination operations, by name. Like
//! transforms, these wrap child statements, so children dispatch through
//! an owned [`ControlStructureVisitor`].

use crate::ast::{AstNode, ModuleInstantiation, Parameter};
use crate::handler::SharedErrorHandler;
use crate::location::Location;
use crate::visitor::control::ControlStructureVisitor;
use crate::visitor::{call_children, CstVisitor};
use openscad_cst::CstNode;

/// Built-in CSG operation names.
pub const CSG_NAMES: &[&str] = &["union", "difference", "intersection", "hull", "minkowski"];

pub struct CsgVisitor {
    handler: SharedErrorHandler,
    body: ControlStructureVisitor,
}

impl CsgVisitor {
    pub fn new(handler: SharedErrorHandler) -> Self {
        Self {
            body: ControlStructureVisitor::new(handler.clone()),
            handler,
        }
    }

    pub fn is_csg_operation(name: &str) -> bool {
        CSG_NAMES.contains(&name)
    }
}

impl CstVisitor for CsgVisitor {
    fn error_handler(&self) -> &SharedErrorHandler {
        &self.handler
    }

    fn create_node_for_call(
        &self,
        node: &CstNode,
        name: &str,
        args: Vec<Parameter>,
    ) -> Option<AstNode> {
        if !Self::is_csg_operation(name) {
            return None;
        }
        Some(AstNode::ModuleInstantiation(ModuleInstantiation {
            name: name.to_string(),
            arguments: args,
            children: call_children(&self.body, node),
            location: Location::from_node(node),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::CollectingErrorHandler;
    use crate::visitor::tests_support::{block, call_node, call_statement};
    use std::rc::Rc;

    fn visitor() -> CsgVisitor {
        CsgVisitor::new(Rc::new(CollectingErrorHandler::new()))
    }

    #[test]
    fn test_difference_keeps_operand_order() {
        let v = visitor();
        let node = CstNode::leaf("module_instantiation", "difference() { ... }", 0, 20)
            .with_children(vec![
                CstNode::leaf("identifier", "difference", 0, 10).with_field("name"),
                CstNode::leaf("arguments", "()", 10, 12).with_field("arguments"),
                block(vec![call_statement("cube"), call_statement("sphere")]),
            ]);
        match v.visit_node(&node) {
            Some(AstNode::ModuleInstantiation(m)) => {
                assert_eq!(m.name, "difference");
                assert_eq!(m.children.len(), 2);
                match (&m.children[0], &m.children[1]) {
                    (AstNode::ModuleInstantiation(a), AstNode::ModuleInstantiation(b)) => {
                        assert_eq!(a.name, "cube");
                        assert_eq!(b.name, "sphere");
                    }
                    other => panic!("expected instantiations, got {other:?}"),
                }
            }
            other => panic!("expected instantiation, got {other:?}"),
        }
    }

    #[test]
    fn test_declines_non_csg() {
        let v = visitor();
        assert!(v.visit_node(&call_node("cube")).is_none());
        assert!(v.visit_node(&call_node("translate")).is_none());
    }
}
