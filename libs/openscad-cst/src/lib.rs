//! # OpenSCAD CST Crate
//!
//! Defines the Concrete Syntax Tree contract honored by the external
//! incremental parser. The parser itself is a black box: natively it is a
//! tree-sitter grammar, in the browser it is web-tree-sitter producing a
//! serialized tree. Either way, downstream crates only ever see the
//! [`CstNode`] shape defined here.
//!
//! ## Architecture
//!
//! ```text
//! OpenSCAD Source → external parser → CstNode tree → openscad-ast (AST)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use openscad_cst::CstNode;
//!
//! let json = r#"{
//!     "type": "number", "text": "42",
//!     "startIndex": 0, "endIndex": 2,
//!     "startPosition": {"row": 0, "column": 0},
//!     "endPosition": {"row": 0, "column": 2},
//!     "children": [], "namedChildren": [],
//!     "isNamed": true, "fieldName": null
//! }"#;
//! let node: CstNode = serde_json::from_str(json).unwrap();
//! assert_eq!(node.node_type, "number");
//! ```
//!
//! ## Design Principles
//!
//! - **Fixed Contract**: type, text, span, indexed/named children, fields,
//!   error markers — nothing grammar-version specific
//! - **Error Tolerant**: partial and erroneous trees are valid values
//! - **Browser-Safe**: plain data, serde round-trippable, no FFI

pub mod node;
pub mod query;

// Re-exports for convenience
pub use node::{CstNode, Point};
pub use query::{Query, QueryEngine, QueryError};
