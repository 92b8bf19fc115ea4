//! # Document Outline
//!
//! Flat symbol listing for editor outlines: module and function
//! definitions plus top-level variable assignments, in document order.
//! The walk descends into statement structure only, so assignments that
//! are really call arguments or parameter defaults never show up.

use crate::location::Location;
use openscad_cst::CstNode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Module,
    Function,
    Variable,
}

/// One named symbol in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineItem {
    pub name: String,
    pub kind: SymbolKind,
    pub location: Location,
}

/// Extracts the symbol outline of a parsed document.
///
/// Nested definitions are included; a module defined inside another
/// module still appears, after its parent.
pub fn extract_outline(root: &CstNode) -> Vec<OutlineItem> {
    let mut items = Vec::new();
    walk(root, &mut items);
    items
}

fn walk(node: &CstNode, items: &mut Vec<OutlineItem>) {
    match node.node_type.as_str() {
        "module_definition" => {
            if let Some(name) = symbol_name(node) {
                items.push(OutlineItem {
                    name,
                    kind: SymbolKind::Module,
                    location: Location::from_node(node),
                });
            }
            if let Some(body) = node.child_by_field("body").or_else(|| node.find_child("block"))
            {
                walk(body, items);
            }
        }
        "function_definition" => {
            if let Some(name) = symbol_name(node) {
                items.push(OutlineItem {
                    name,
                    kind: SymbolKind::Function,
                    location: Location::from_node(node),
                });
            }
        }
        "assignment" | "assignment_statement" => {
            if let Some(name) = symbol_name(node) {
                items.push(OutlineItem {
                    name,
                    kind: SymbolKind::Variable,
                    location: Location::from_node(node),
                });
            }
        }
        "source_file" | "statement" | "block" | "union_block" => {
            for child in &node.children {
                walk(child, items);
            }
        }
        _ => {}
    }
}

fn symbol_name(node: &CstNode) -> Option<String> {
    node.child_by_field("name")
        .or_else(|| node.find_named_child("identifier"))
        .map(|n| n.text.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statement(inner: CstNode) -> CstNode {
        CstNode::leaf("statement", "", 0, 0).with_children(vec![inner])
    }

    fn module_def(name: &str, body: Vec<CstNode>) -> CstNode {
        CstNode::leaf("module_definition", "", 0, 0).with_children(vec![
            CstNode::leaf("identifier", name, 0, name.len()).with_field("name"),
            CstNode::leaf("block", "", 0, 0).with_field("body").with_children(body),
        ])
    }

    fn function_def(name: &str) -> CstNode {
        CstNode::leaf("function_definition", "", 0, 0).with_children(vec![
            CstNode::leaf("identifier", name, 0, name.len()).with_field("name"),
        ])
    }

    fn assignment(name: &str) -> CstNode {
        CstNode::leaf("assignment", "", 0, 0).with_children(vec![
            CstNode::leaf("identifier", name, 0, name.len()).with_field("name"),
            CstNode::leaf("number", "1", 0, 1).with_field("value"),
        ])
    }

    #[test]
    fn test_outline_kinds_and_order() {
        let root = CstNode::leaf("source_file", "", 0, 0).with_children(vec![
            statement(assignment("size")),
            statement(module_def("bracket", Vec::new())),
            statement(function_def("area")),
        ]);
        let outline = extract_outline(&root);
        assert_eq!(outline.len(), 3);
        assert_eq!(outline[0].name, "size");
        assert_eq!(outline[0].kind, SymbolKind::Variable);
        assert_eq!(outline[1].kind, SymbolKind::Module);
        assert_eq!(outline[2].kind, SymbolKind::Function);
    }

    #[test]
    fn test_nested_module_after_parent() {
        let root = CstNode::leaf("source_file", "", 0, 0).with_children(vec![statement(
            module_def("outer", vec![statement(module_def("inner", Vec::new()))]),
        )]);
        let outline = extract_outline(&root);
        assert_eq!(outline.len(), 2);
        assert_eq!(outline[0].name, "outer");
        assert_eq!(outline[1].name, "inner");
    }

    #[test]
    fn test_call_arguments_are_not_variables() {
        let call = CstNode::leaf("module_instantiation", "cube(size=1)", 0, 12).with_children(vec![
            CstNode::leaf("identifier", "cube", 0, 4).with_field("name"),
            CstNode::leaf("arguments", "(size=1)", 4, 12)
                .with_field("arguments")
                .with_children(vec![assignment("size")]),
        ]);
        let root = CstNode::leaf("source_file", "", 0, 0).with_children(vec![statement(call)]);
        assert!(extract_outline(&root).is_empty());
    }
}
