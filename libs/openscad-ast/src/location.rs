//! # Source Locations
//!
//! Converts CST position spans into AST-neutral `{start, end}` records.
//! Locations are attached to nearly every AST node and preserved through
//! the entire analysis pipeline for diagnostics and editor features.
//!
//! ## Usage
//!
//! ```rust
//! use openscad_ast::{Location, Position};
//!
//! let loc = Location::new(
//!     Position { line: 0, column: 0, offset: 0 },
//!     Position { line: 0, column: 4, offset: 4 },
//! );
//! assert_eq!(loc.start.offset, 0);
//! assert_eq!(loc.end.column, 4);
//! ```

use openscad_cst::CstNode;
use serde::{Deserialize, Serialize};

/// A point in the source code.
///
/// # Fields
///
/// - `line`: Zero-based line number
/// - `column`: Zero-based column number
/// - `offset`: Byte offset from the start of the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Position {
    /// Zero-based line number
    pub line: usize,
    /// Zero-based column number
    pub column: usize,
    /// Byte offset from the start of the source
    pub offset: usize,
}

/// A range in the source code.
///
/// Invariant: `start <= end`. Constructors normalize reversed inputs so
/// the invariant holds for every constructed value.
///
/// # Example
///
/// ```rust
/// use openscad_ast::{Location, Position};
///
/// // For source "cube(10);" the location of "cube" would be:
/// let loc = Location::new(
///     Position { line: 0, column: 0, offset: 0 },
///     Position { line: 0, column: 4, offset: 4 },
/// );
/// assert!(loc.start <= loc.end);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Location {
    /// Start of the range (inclusive)
    pub start: Position,
    /// End of the range (exclusive)
    pub end: Position,
}

impl Location {
    /// Creates a new location, swapping the bounds if they arrive reversed.
    pub fn new(start: Position, end: Position) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self { start: end, end: start }
        }
    }

    /// Builds the location covering a CST node.
    ///
    /// # Example
    ///
    /// ```rust
    /// use openscad_ast::Location;
    /// use openscad_cst::CstNode;
    ///
    /// let node = CstNode::leaf("identifier", "size", 5, 9);
    /// let loc = Location::from_node(&node);
    /// assert_eq!(loc.start.offset, 5);
    /// assert_eq!(loc.end.offset, 9);
    /// ```
    pub fn from_node(node: &CstNode) -> Self {
        Self::new(
            Position {
                line: node.start_position.row,
                column: node.start_position.column,
                offset: node.start_index,
            },
            Position {
                line: node.end_position.row,
                column: node.end_position.column,
                offset: node.end_index,
            },
        )
    }

    /// Creates a location that encompasses both this location and another.
    pub fn merge(&self, other: &Location) -> Location {
        Location {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Checks if this location contains a byte offset.
    #[inline]
    pub fn contains_offset(&self, offset: usize) -> bool {
        offset >= self.start.offset && offset < self.end.offset
    }

    /// Returns the length of the location in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    /// Returns true if the location has zero length.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start.offset >= self.end.offset
    }
}
