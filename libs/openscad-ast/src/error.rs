//! # Error Model
//!
//! AST-construction failures are first-class values, never exceptions: a
//! visitor that cannot build a node returns an [`ErrorNode`] carrying a
//! stable machine-readable code, a human message, and the offending CST
//! node's type, text and location. Downstream tooling keeps working on
//! malformed input because errors flow through the tree like any other
//! node.

use crate::location::Location;
use config::constants::ERROR_SNIPPET_MAX_LEN;
use openscad_cst::CstNode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable machine-readable codes for AST-construction errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Syntax error reported by the upstream parser (CST `ERROR` node)
    #[serde(rename = "SYNTAX_ERROR")]
    SyntaxError,
    /// Range expression without a start bound
    #[serde(rename = "MISSING_RANGE_START")]
    MissingRangeStart,
    /// Range expression without an end bound
    #[serde(rename = "MISSING_RANGE_END")]
    MissingRangeEnd,
    /// Forbidden construct or keyword in a range start bound
    #[serde(rename = "E210_INVALID_SYNTAX_IN_RANGE_START")]
    InvalidSyntaxInRangeStart,
    /// Forbidden construct or keyword in a range end bound
    #[serde(rename = "E211_INVALID_SYNTAX_IN_RANGE_END")]
    InvalidSyntaxInRangeEnd,
    /// Forbidden construct or keyword in a range step bound
    #[serde(rename = "E212_INVALID_SYNTAX_IN_RANGE_STEP")]
    InvalidSyntaxInRangeStep,
    /// A literal token that could not be parsed (e.g. malformed number)
    #[serde(rename = "INVALID_LITERAL")]
    InvalidLiteral,
    /// A definition or call without a recoverable name
    #[serde(rename = "MISSING_NAME")]
    MissingName,
    /// A construct without its required body
    #[serde(rename = "MISSING_BODY")]
    MissingBody,
    /// A CST node type this layer does not recognize
    #[serde(rename = "UNSUPPORTED_NODE")]
    UnsupportedNode,
    /// A bug in this layer, not in the input
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
}

impl ErrorCode {
    /// The stable string form used in serialized output and tests.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::SyntaxError => "SYNTAX_ERROR",
            ErrorCode::MissingRangeStart => "MISSING_RANGE_START",
            ErrorCode::MissingRangeEnd => "MISSING_RANGE_END",
            ErrorCode::InvalidSyntaxInRangeStart => "E210_INVALID_SYNTAX_IN_RANGE_START",
            ErrorCode::InvalidSyntaxInRangeEnd => "E211_INVALID_SYNTAX_IN_RANGE_END",
            ErrorCode::InvalidSyntaxInRangeStep => "E212_INVALID_SYNTAX_IN_RANGE_STEP",
            ErrorCode::InvalidLiteral => "INVALID_LITERAL",
            ErrorCode::MissingName => "MISSING_NAME",
            ErrorCode::MissingBody => "MISSING_BODY",
            ErrorCode::UnsupportedNode => "UNSUPPORTED_NODE",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recoverable AST-construction failure, kept in the tree as a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorNode {
    #[serde(rename = "errorCode")]
    pub error_code: ErrorCode,
    pub message: String,
    /// Type of the CST node that failed to convert
    #[serde(rename = "originalNodeType")]
    pub original_node_type: String,
    /// Source text of the offending CST node
    #[serde(rename = "cstNodeText")]
    pub cst_node_text: String,
    pub location: Option<Location>,
    /// Optional underlying cause (e.g. a number-parse failure message)
    pub cause: Option<String>,
}

impl ErrorNode {
    /// Builds an error node for a CST node, capturing its type, text and
    /// location.
    pub fn from_node(code: ErrorCode, message: impl Into<String>, node: &CstNode) -> Self {
        Self {
            error_code: code,
            message: message.into(),
            original_node_type: node.node_type.clone(),
            cst_node_text: node.text.clone(),
            location: Some(Location::from_node(node)),
            cause: None,
        }
    }

    /// Attaches an underlying cause.
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// The offending source text truncated for use in log messages.
    pub fn snippet(&self) -> String {
        self.cst_node_text
            .chars()
            .take(ERROR_SNIPPET_MAX_LEN)
            .collect()
    }
}

impl fmt::Display for ErrorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code, self.message)
    }
}
