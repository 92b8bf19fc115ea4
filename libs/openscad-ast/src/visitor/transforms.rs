//! # Transform Visitor
//!
//! Claims calls to the built-in transformations, by name. A transform
//! wraps its child statements, so the child list goes through an owned
//! [`ControlStructureVisitor`] and keeps full statement fidelity
//! (`translate(v) if (c) cube();` works).

use crate::ast::{AstNode, ModuleInstantiation, Parameter};
use crate::handler::SharedErrorHandler;
use crate::location::Location;
use crate::visitor::control::ControlStructureVisitor;
use crate::visitor::{call_children, CstVisitor};
use openscad_cst::CstNode;

/// Built-in transformation names.
pub const TRANSFORM_NAMES: &[&str] = &[
    "translate",
    "rotate",
    "scale",
    "mirror",
    "resize",
    "color",
    "offset",
    "multmatrix",
    "linear_extrude",
    "rotate_extrude",
];

pub struct TransformVisitor {
    handler: SharedErrorHandler,
    body: ControlStructureVisitor,
}

impl TransformVisitor {
    pub fn new(handler: SharedErrorHandler) -> Self {
        Self {
            body: ControlStructureVisitor::new(handler.clone()),
            handler,
        }
    }

    pub fn is_transform(name: &str) -> bool {
        TRANSFORM_NAMES.contains(&name)
    }
}

impl CstVisitor for TransformVisitor {
    fn error_handler(&self) -> &SharedErrorHandler {
        &self.handler
    }

    fn create_node_for_call(
        &self,
        node: &CstNode,
        name: &str,
        args: Vec<Parameter>,
    ) -> Option<AstNode> {
        if !Self::is_transform(name) {
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
