//! # Call and Parameter Extraction
//!
//! The single boundary adapter between grammar field coverage and the
//! visitors: every name, argument list and parameter list is extracted
//! here, structured-field-first with one explicit degraded raw-text
//! fallback. Visitors never re-derive values from raw text themselves;
//! they either get a located value or a value flagged as degraded (no
//! location).

use crate::ast::{ModuleParameter, Parameter};
use crate::handler::SharedErrorHandler;
use crate::location::Location;
use crate::visitor::expressions::ExpressionVisitor;
use config::constants::is_reserved_keyword;
use openscad_cst::CstNode;

/// A name extracted from a definition or call node.
#[derive(Debug, Clone, PartialEq)]
pub struct NameField {
    pub name: String,
    /// `None` iff the name came from the degraded raw-text parse.
    pub location: Option<Location>,
}

impl NameField {
    pub fn is_degraded(&self) -> bool {
        self.location.is_none()
    }
}

/// A call-shaped node reduced to its name and ordered arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct CallSignature {
    pub name: String,
    pub name_location: Option<Location>,
    pub arguments: Vec<Parameter>,
}

/// Extracts a name from a node carrying a `name` field, falling back to
/// the first identifier child, then to a raw-text parse.
///
/// The raw-text path strips `keyword` (e.g. `"module"`) from the front of
/// the node text and reads up to the opening parenthesis. Names recovered
/// this way carry no location.
pub fn extract_name(
    node: &CstNode,
    keyword: Option<&str>,
    handler: &SharedErrorHandler,
) -> Option<NameField> {
    if let Some(name_node) = node.child_by_field("name") {
        return Some(NameField {
            name: name_node.text.clone(),
            location: Some(Location::from_node(name_node)),
        });
    }
    if let Some(id) = node.find_named_child("identifier") {
        return Some(NameField {
            name: id.text.clone(),
            location: Some(Location::from_node(id)),
        });
    }

    // Degraded path: the grammar produced no structured name field.
    let mut text = node.text.trim_start();
    if let Some(kw) = keyword {
        text = text.strip_prefix(kw).unwrap_or(text).trim_start();
    }
    let name: String = text
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '$')
        .collect();
    if name.is_empty() {
        return None;
    }
    handler.log_debug(
        &format!("recovered name '{name}' from raw text; location unavailable"),
        Some(Location::from_node(node)),
    );
    Some(NameField { name, location: None })
}

/// Extracts the name and ordered argument list of a call-shaped node.
///
/// Returns `None` when no name can be recovered or the recovered name is a
/// reserved keyword (the node then belongs to a control-structure slice,
/// not to call handling).
pub fn extract_call_signature(
    node: &CstNode,
    handler: &SharedErrorHandler,
) -> Option<CallSignature> {
    let name = extract_name(node, None, handler)?;
    if is_reserved_keyword(&name.name) {
        return None;
    }

    let expr = ExpressionVisitor::new(handler.clone());
    let arguments = node
        .child_by_field("arguments")
        .or_else(|| node.find_child("arguments"))
        .or_else(|| node.find_child("argument_list"))
        .map(|args| extract_arguments(args, &expr))
        .unwrap_or_default();

    Some(CallSignature {
        name: name.name,
        name_location: name.location,
        arguments,
    })
}

/// Extracts an ordered argument list from an `arguments` node.
///
/// Positional arguments have `name == None`; named arguments (grammar
/// `assignment`/`named_argument` children, or `argument` nodes with a
/// `name` field) carry their name.
pub fn extract_arguments(args_node: &CstNode, expr: &ExpressionVisitor) -> Vec<Parameter> {
    let mut out = Vec::new();

    for child in args_node.named_children.iter().filter(|c| !c.is_punctuation()) {
        match child.node_type.as_str() {
            "argument" => {
                if let Some(param) = extract_argument(child, expr) {
                    out.push(param);
                }
            }
            "assignment" | "named_argument" => {
                if let Some(param) = extract_named_argument(child, expr) {
                    out.push(param);
                }
            }
            _ => out.push(Parameter::positional(expr.expression(child))),
        }
    }

    out
}

fn extract_argument(node: &CstNode, expr: &ExpressionVisitor) -> Option<Parameter> {
    if let Some(name_node) = node.child_by_field("name") {
        let value = node
            .child_by_field("value")
            .or_else(|| {
                node.named_children
                    .iter()
                    .find(|c| **c != *name_node && !c.is_punctuation())
            })?;
        return Some(Parameter::named(name_node.text.clone(), expr.expression(value)));
    }
    let value = node.named_children.iter().find(|c| !c.is_punctuation())?;
    Some(Parameter::positional(expr.expression(value)))
}

fn extract_named_argument(node: &CstNode, expr: &ExpressionVisitor) -> Option<Parameter> {
    let name_node = node
        .child_by_field("name")
        .or_else(|| node.find_named_child("identifier"))
        .or_else(|| node.find_named_child("special_variable"))?;
    let value = node.child_by_field("value").or_else(|| {
        node.named_children
            .iter()
            .find(|c| **c != *name_node && !c.is_punctuation())
    })?;
    Some(Parameter::named(name_node.text.clone(), expr.expression(value)))
}

/// Extracts the ordered parameter list of a module or function definition.
///
/// Handles bare identifiers (`size`), `parameter` wrappers, and
/// `assignment` children carrying default values (`size = 10`). Defaults
/// are fully parsed expressions.
pub fn extract_parameters(params_node: &CstNode, expr: &ExpressionVisitor) -> Vec<ModuleParameter> {
    let mut out = Vec::new();

    for child in params_node.named_children.iter().filter(|c| !c.is_punctuation()) {
        match child.node_type.as_str() {
            "identifier" | "special_variable" => out.push(ModuleParameter {
                name: child.text.clone(),
                default_value: None,
                location: Some(Location::from_node(child)),
            }),
            "parameter" | "parameter_declaration" => {
                if let Some(param) = extract_parameter(child, expr) {
                    out.push(param);
                }
            }
            "assignment" => {
                if let Some(param) = extract_default_parameter(child, expr) {
                    out.push(param);
                }
            }
            _ => {}
        }
    }

    out
}

fn extract_parameter(node: &CstNode, expr: &ExpressionVisitor) -> Option<ModuleParameter> {
    if let Some(assignment) = node.find_named_child("assignment") {
        return extract_default_parameter(assignment, expr);
    }
    let name_node = node
        .child_by_field("name")
        .or_else(|| node.find_named_child("identifier"))
        .or_else(|| node.find_named_child("special_variable"))?;
    let default_value = node
        .child_by_field("default")
        .or_else(|| {
            node.named_children
                .iter()
                .find(|c| **c != *name_node && !c.is_punctuation())
        })
        .map(|value| expr.expression(value));
    Some(ModuleParameter {
        name: name_node.text.clone(),
        default_value,
        location: Some(Location::from_node(name_node)),
    })
}

fn extract_default_parameter(node: &CstNode, expr: &ExpressionVisitor) -> Option<ModuleParameter> {
    let name_node = node
        .child_by_field("name")
        .or_else(|| node.find_named_child("identifier"))
        .or_else(|| node.find_named_child("special_variable"))?;
    let default_value = node
        .child_by_field("value")
        .or_else(|| {
            node.named_children
                .iter()
                .find(|c| **c != *name_node && !c.is_punctuation())
        })
        .map(|value| expr.expression(value));
    Some(ModuleParameter {
        name: name_node.text.clone(),
        default_value,
        location: Some(Location::from_node(name_node)),
    })
}
