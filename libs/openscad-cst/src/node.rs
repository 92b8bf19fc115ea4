//! # CST Node Contract
//!
//! Defines the node shape produced by the external parser. Natively this
//! mirrors a tree-sitter node; in the browser it is the serialized form
//! produced by web-tree-sitter before being handed to WASM.
//!
//! ## Usage
//!
//! ```rust
//! use openscad_cst::CstNode;
//!
//! let node = CstNode::leaf("identifier", "size", 0, 4);
//! assert_eq!(node.node_type, "identifier");
//! assert!(!node.is_error());
//! ```

use serde::{Deserialize, Serialize};

/// A syntax tree node from the external parser.
///
/// This structure mirrors the `SerializedNode` interface emitted by the
/// JavaScript side of the toolkit, which itself mirrors a tree-sitter node.
///
/// # Fields
///
/// * `node_type` - The grammar rule name (e.g., "source_file", "module_instantiation")
/// * `text` - The source text covered by this node
/// * `start_index` - Byte offset where this node starts
/// * `end_index` - Byte offset where this node ends
/// * `start_position` - Row/column position where this node starts
/// * `end_position` - Row/column position where this node ends
/// * `children` - All child nodes (including anonymous punctuation)
/// * `named_children` - Only named child nodes
/// * `is_named` - Whether this is a named node in the grammar
/// * `field_name` - The field name if this node is a field child
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CstNode {
    /// Node type from grammar (e.g., "source_file", "module_instantiation")
    #[serde(rename = "type")]
    pub node_type: String,

    /// Source text covered by this node
    pub text: String,

    /// Byte offset where this node starts
    #[serde(rename = "startIndex")]
    pub start_index: usize,

    /// Byte offset where this node ends
    #[serde(rename = "endIndex")]
    pub end_index: usize,

    /// Start position (row, column)
    #[serde(rename = "startPosition")]
    pub start_position: Point,

    /// End position (row, column)
    #[serde(rename = "endPosition")]
    pub end_position: Point,

    /// All child nodes
    pub children: Vec<CstNode>,

    /// Named children only
    #[serde(rename = "namedChildren")]
    pub named_children: Vec<CstNode>,

    /// Whether this is a named node
    #[serde(rename = "isNamed")]
    pub is_named: bool,

    /// Field name if this node is a field child
    #[serde(rename = "fieldName")]
    pub field_name: Option<String>,
}

/// Position in source code (row, column).
///
/// Both row and column are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    /// Zero-based row number
    pub row: usize,
    /// Zero-based column number
    pub column: usize,
}

impl CstNode {
    /// Creates a childless named node covering `[start_index, end_index)`
    /// on row zero. Intended for building trees in tests and tools; the
    /// real parser produces full position data.
    pub fn leaf(node_type: &str, text: &str, start_index: usize, end_index: usize) -> Self {
        Self {
            node_type: node_type.to_string(),
            text: text.to_string(),
            start_index,
            end_index,
            start_position: Point { row: 0, column: start_index },
            end_position: Point { row: 0, column: end_index },
            children: Vec::new(),
            named_children: Vec::new(),
            is_named: true,
            field_name: None,
        }
    }

    /// Attaches children, mirroring them into `named_children` when named.
    pub fn with_children(mut self, children: Vec<CstNode>) -> Self {
        self.named_children = children.iter().filter(|c| c.is_named).cloned().collect();
        self.children = children;
        self
    }

    /// Tags this node with a grammar field name.
    pub fn with_field(mut self, field: &str) -> Self {
        self.field_name = Some(field.to_string());
        self
    }

    /// Marks this node as anonymous (punctuation, operators).
    pub fn anonymous(mut self) -> Self {
        self.is_named = false;
        self
    }

    /// Returns the child at index `i`, or None when out of range.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let first = node.child(0);
    /// ```
    pub fn child(&self, i: usize) -> Option<&CstNode> {
        self.children.get(i)
    }

    /// Returns the number of children (including anonymous nodes).
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Finds the first child with the given type.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let call = node.find_child("module_instantiation");
    /// ```
    pub fn find_child(&self, node_type: &str) -> Option<&CstNode> {
        self.children.iter().find(|c| c.node_type == node_type)
    }

    /// Finds the first named child with the given type.
    pub fn find_named_child(&self, node_type: &str) -> Option<&CstNode> {
        self.named_children.iter().find(|c| c.node_type == node_type)
    }

    /// Finds a child by its grammar field name.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let name = node.child_by_field("name");
    /// let value = node.child_by_field("value");
    /// ```
    pub fn child_by_field(&self, field: &str) -> Option<&CstNode> {
        self.children
            .iter()
            .find(|c| c.field_name.as_deref() == Some(field))
    }

    /// Checks if this node itself is an error node.
    pub fn is_error(&self) -> bool {
        self.node_type == "ERROR"
    }

    /// Checks if this node was inserted by error recovery.
    pub fn is_missing(&self) -> bool {
        self.node_type.starts_with("MISSING")
    }

    /// Checks if this node or any descendant is an error or missing node.
    ///
    /// Mirrors tree-sitter's `hasError` marker for serialized trees that
    /// do not carry the flag explicitly.
    pub fn has_error(&self) -> bool {
        self.is_error() || self.is_missing() || self.children.iter().any(CstNode::has_error)
    }

    /// Checks if this node is punctuation or another anonymous token that
    /// traversal should skip.
    pub fn is_punctuation(&self) -> bool {
        !self.is_named
            || matches!(
                self.node_type.as_str(),
                "(" | ")" | "{" | "}" | "[" | "]" | "," | ";" | ":" | "="
            )
    }

    /// Gets all children of a specific type.
    pub fn children_by_type(&self, node_type: &str) -> Vec<&CstNode> {
        self.children
            .iter()
            .filter(|c| c.node_type == node_type)
            .collect()
    }

    /// Gets all named children of a specific type.
    pub fn named_children_by_type(&self, node_type: &str) -> Vec<&CstNode> {
        self.named_children
            .iter()
            .filter(|c| c.node_type == node_type)
            .collect()
    }

    /// Returns true if this node or any descendant has one of the given
    /// types. Used for cheap "does this statement contain an `if`" checks
    /// before committing to a full visit.
    pub fn contains_type(&self, node_types: &[&str]) -> bool {
        node_types.contains(&self.node_type.as_str())
            || self.children.iter().any(|c| c.contains_type(node_types))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_child() {
        let parent = CstNode::leaf("source_file", "cube(10);", 0, 9)
            .with_children(vec![CstNode::leaf("module_instantiation", "cube(10)", 0, 8)]);

        let found = parent.find_child("module_instantiation");
        assert!(found.is_some());
        assert_eq!(found.unwrap().node_type, "module_instantiation");
    }

    #[test]
    fn test_child_by_field() {
        let parent = CstNode::leaf("assignment", "x = 10", 0, 6).with_children(vec![
            CstNode::leaf("identifier", "x", 0, 1).with_field("name"),
            CstNode::leaf("=", "=", 2, 3).anonymous(),
            CstNode::leaf("number", "10", 4, 6).with_field("value"),
        ]);

        let found = parent.child_by_field("name");
        assert!(found.is_some());
        assert_eq!(found.unwrap().text, "x");
        assert_eq!(parent.child_by_field("value").unwrap().text, "10");
    }

    #[test]
    fn test_child_index_access() {
        let parent = CstNode::leaf("arguments", "(10)", 0, 4).with_children(vec![
            CstNode::leaf("(", "(", 0, 1).anonymous(),
            CstNode::leaf("number", "10", 1, 3),
            CstNode::leaf(")", ")", 3, 4).anonymous(),
        ]);
        assert_eq!(parent.child_count(), 3);
        assert_eq!(parent.child(1).unwrap().node_type, "number");
        assert!(parent.child(3).is_none());
    }

    #[test]
    fn test_is_error() {
        let error_node = CstNode::leaf("ERROR", "invalid", 0, 7);
        assert!(error_node.is_error());

        let normal_node = CstNode::leaf("number", "10", 0, 2);
        assert!(!normal_node.is_error());
    }

    #[test]
    fn test_has_error_descends() {
        let tree = CstNode::leaf("source_file", "cube(;", 0, 6).with_children(vec![
            CstNode::leaf("statement", "cube(;", 0, 6)
                .with_children(vec![CstNode::leaf("ERROR", "cube(", 0, 5)]),
        ]);
        assert!(tree.has_error());
        assert!(!tree.is_error());
    }

    #[test]
    fn test_punctuation_detection() {
        assert!(CstNode::leaf(";", ";", 0, 1).anonymous().is_punctuation());
        assert!(!CstNode::leaf("identifier", "x", 0, 1).is_punctuation());
    }

    #[test]
    fn test_contains_type() {
        let stmt = CstNode::leaf("statement", "if (x) y();", 0, 11)
            .with_children(vec![CstNode::leaf("if_statement", "if (x) y();", 0, 11)]);
        assert!(stmt.contains_type(&["if_statement", "for_statement"]));
        assert!(!stmt.contains_type(&["let_expression"]));
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "type": "identifier", "text": "x",
            "startIndex": 3, "endIndex": 4,
            "startPosition": {"row": 0, "column": 3},
            "endPosition": {"row": 0, "column": 4},
            "children": [], "namedChildren": [],
            "isNamed": true, "fieldName": "name"
        }"#;
        let node: CstNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.node_type, "identifier");
        assert_eq!(node.field_name.as_deref(), Some("name"));
        assert_eq!(node.start_position.column, 3);
    }
}
