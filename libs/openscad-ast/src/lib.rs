//! # OpenSCAD AST Crate
//!
//! Transforms the CST contract from `openscad-cst` into a typed,
//! located, error-tolerant AST. Built for static tooling — outline,
//! navigation, diagnostics — where partial results from broken files
//! matter more than rejection.
//!
//! ## Architecture
//!
//! ```text
//! CstNode tree → CompositeVisitor (specialized CstVisitors) → AstNode tree
//!                       ↘ ErrorHandler diagnostics ↗
//! ```
//!
//! Each specialized visitor owns one grammar slice (primitives,
//! transforms, CSG, control structures, functions, expressions, module
//! definitions) and declines everything else; the composite asks them in
//! registration order. Failures become [`error::ErrorNode`] values inside
//! the tree, never panics.
//!
//! ## Usage
//!
//! ```rust
//! use openscad_ast::parse_result::build_ast;
//! use openscad_cst::CstNode;
//!
//! let root = CstNode::leaf("source_file", "cube(1);", 0, 8)
//!     .with_children(vec![
//!         CstNode::leaf("module_instantiation", "cube(1)", 0, 7).with_children(vec![
//!             CstNode::leaf("identifier", "cube", 0, 4).with_field("name"),
//!             CstNode::leaf("arguments", "(1)", 4, 7)
//!                 .with_field("arguments")
//!                 .with_children(vec![CstNode::leaf("number", "1", 5, 6)]),
//!         ]),
//!     ]);
//! let result = build_ast(&root);
//! assert!(result.success);
//! assert_eq!(result.ast.len(), 1);
//! ```

pub mod ast;
pub mod error;
pub mod handler;
pub mod location;
pub mod outline;
pub mod parse_result;
pub mod query_visitor;
pub mod visitor;

// Re-exports for convenience
pub use ast::{AstNode, ExpressionNode};
pub use error::{ErrorCode, ErrorNode};
pub use handler::{CollectingErrorHandler, ErrorHandler, SharedErrorHandler};
pub use location::{Location, Position};
pub use outline::{extract_outline, OutlineItem, SymbolKind};
pub use parse_result::{build_ast, ParseResult};
pub use query_visitor::QueryVisitor;
pub use visitor::composite::CompositeVisitor;
pub use visitor::CstVisitor;
