//! # Module Visitor
//!
//! Handles `module name(params) { body }` definitions and acts as the
//! catch-all for user-defined module calls. In a composite it registers
//! last, after the name-gated visitors have had their turn.
//!
//! Bodies dispatch back through `self`, and control-structure statements
//! are forwarded to an owned [`ControlStructureVisitor`], so a module
//! body supports the full statement grammar including nested definitions.

use crate::ast::{AstNode, Identifier, ModuleDefinition, ModuleInstantiation, Parameter};
use crate::error::{ErrorCode, ErrorNode};
use crate::handler::SharedErrorHandler;
use crate::location::Location;
use crate::visitor::control::ControlStructureVisitor;
use crate::visitor::expressions::ExpressionVisitor;
use crate::visitor::functions::FunctionVisitor;
use crate::visitor::{args, call_children, CstVisitor};
use openscad_cst::CstNode;

pub struct ModuleVisitor {
    handler: SharedErrorHandler,
    control: ControlStructureVisitor,
    functions: FunctionVisitor,
}

impl ModuleVisitor {
    pub fn new(handler: SharedErrorHandler) -> Self {
        Self {
            control: ControlStructureVisitor::new(handler.clone()),
            functions: FunctionVisitor::new(handler.clone()),
            handler,
        }
    }
}

/// Builds a `module_definition` node. `body_visitor` dispatches the body
/// statements; any visitor whose slice can contain a definition routes
/// here so nested definitions survive wherever they appear.
pub(crate) fn build_module_definition(
    node: &CstNode,
    handler: &SharedErrorHandler,
    body_visitor: &dyn CstVisitor,
) -> AstNode {
    let location = Location::from_node(node);

    let Some(name) = args::extract_name(node, Some("module"), handler) else {
        let err = ErrorNode::from_node(
            ErrorCode::MissingName,
            "module definition without a recoverable name",
            node,
        );
        handler.log_error(&err.message, err.location);
        return AstNode::Error(err);
    };
    let name = match name.location {
        Some(loc) => Identifier::new(name.name, loc),
        None => Identifier::degraded(name.name),
    };

    let expr = ExpressionVisitor::new(handler.clone());
    let parameters = node
        .child_by_field("parameters")
        .or_else(|| node.find_child("parameters"))
        .or_else(|| node.find_child("parameter_list"))
        .map(|params| args::extract_parameters(params, &expr))
        .unwrap_or_default();

    let body = match node
        .child_by_field("body")
        .or_else(|| node.find_child("block"))
    {
        Some(body) => body_visitor.visit_body(body),
        None => {
            handler.log_warning(
                &format!("module '{}' has no body", name.name),
                Some(location),
            );
            Vec::new()
        }
    };

    AstNode::ModuleDefinition(ModuleDefinition {
        name,
        parameters,
        body,
        location,
    })
}

impl CstVisitor for ModuleVisitor {
    fn error_handler(&self) -> &SharedErrorHandler {
        &self.handler
    }

    fn visit_module_definition(&self, node: &CstNode) -> Option<AstNode> {
        Some(build_module_definition(node, &self.handler, self))
    }

    fn visit_function_definition(&self, node: &CstNode) -> Option<AstNode> {
        self.functions.visit_function_definition(node)
    }

    fn visit_if_statement(&self, node: &CstNode) -> Option<AstNode> {
        self.control.visit_if_statement(node)
    }

    fn visit_for_statement(&self, node: &CstNode) -> Option<AstNode> {
        self.control.visit_for_statement(node)
    }

    fn visit_let_expression(&self, node: &CstNode) -> Option<AstNode> {
        self.control.visit_let_expression(node)
    }

    fn visit_each_statement(&self, node: &CstNode) -> Option<AstNode> {
        self.control.visit_each_statement(node)
    }

    /// Catch-all: every call becomes an instantiation, whatever its name.
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
