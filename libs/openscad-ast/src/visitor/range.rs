//! # Range Expression Visitor
//!
//! Handles `[start:end]` and `[start:step:end]` range literals, the most
//! failure-prone corner of the grammar. Each bound is validated before
//! conversion; a range with a missing or invalid bound collapses to a
//! single `Error` expression carrying that bound's code, so a consumer
//! checking the result's type tag sees the failure directly.
//!
//! Bound failures use dedicated codes so tooling can tell them apart:
//! `MISSING_RANGE_START` / `MISSING_RANGE_END` for absent bounds, and the
//! `E210`/`E211`/`E212` family for bounds occupied by a forbidden
//! construct (`[0:if]`, `[for:10]`, ...).

use crate::ast::{ExpressionNode, RangeExpression};
use crate::error::{ErrorCode, ErrorNode};
use crate::handler::SharedErrorHandler;
use crate::location::Location;
use crate::visitor::expressions::ExpressionVisitor;
use config::constants::{is_reserved_keyword, FORBIDDEN_RANGE_BOUND_TYPES};
use openscad_cst::CstNode;

/// Which slot of the range a bound occupies. Determines the error code
/// used when the bound is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Start,
    End,
    Step,
}

impl Bound {
    fn invalid_code(self) -> ErrorCode {
        match self {
            Bound::Start => ErrorCode::InvalidSyntaxInRangeStart,
            Bound::End => ErrorCode::InvalidSyntaxInRangeEnd,
            Bound::Step => ErrorCode::InvalidSyntaxInRangeStep,
        }
    }

    fn missing_code(self) -> ErrorCode {
        match self {
            Bound::Start => ErrorCode::MissingRangeStart,
            Bound::End => ErrorCode::MissingRangeEnd,
            // A missing step is legal ([0:10]); callers never ask for it.
            Bound::Step => ErrorCode::InternalError,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Bound::Start => "start",
            Bound::End => "end",
            Bound::Step => "step",
        }
    }
}

/// The state of a range's step slot after structural extraction.
#[derive(Debug, Clone, Copy)]
enum StepSlot<'t> {
    /// Two-part range, no step slot at all.
    Absent,
    /// Three-part range whose middle segment is empty (`[0::10]`).
    Empty,
    Present(&'t CstNode),
}

/// Visitor for range expressions. Owned by
/// [`ExpressionVisitor`](crate::visitor::expressions::ExpressionVisitor),
/// which delegates every `range_expression` node here.
pub struct RangeExpressionVisitor {
    handler: SharedErrorHandler,
}

impl RangeExpressionVisitor {
    pub fn new(handler: SharedErrorHandler) -> Self {
        Self { handler }
    }

    /// Converts a `range_expression` node. Total: any missing or invalid
    /// bound makes the whole range a single `Error` expression with that
    /// bound's code, and an unrecoverable colon structure a plain
    /// `SYNTAX_ERROR`. The first failing bound (start, end, step) wins.
    pub fn visit_range_expression(&self, node: &CstNode) -> ExpressionNode {
        let location = Location::from_node(node);

        let (start, step, end) = match self.bound_nodes(node) {
            Ok(bounds) => bounds,
            Err(err) => {
                self.handler.log_error(&err.message, err.location);
                return ExpressionNode::Error(Box::new(err));
            }
        };

        let start = match self.bound(node, start, Bound::Start) {
            Ok(expr) => Box::new(expr),
            Err(err) => return ExpressionNode::Error(err),
        };
        let end = match self.bound(node, end, Bound::End) {
            Ok(expr) => Box::new(expr),
            Err(err) => return ExpressionNode::Error(err),
        };
        let step = match step {
            StepSlot::Present(step_node) => {
                match self.bound(node, Some(step_node), Bound::Step) {
                    Ok(expr) => Some(Box::new(expr)),
                    Err(err) => return ExpressionNode::Error(err),
                }
            }
            StepSlot::Empty => {
                // `[0::10]` parses but carries no step value.
                self.handler.log_warning(
                    "range has an empty step; treating as unstepped",
                    Some(location),
                );
                None
            }
            StepSlot::Absent => None,
        };

        ExpressionNode::Range(RangeExpression {
            start,
            end,
            step,
            location,
        })
    }

    /// Locates the start/step/end child nodes, field-first with a
    /// positional colon-split fallback.
    ///
    /// Returns `(start, step, end)`; `None` for start/end means that bound
    /// is absent in the source. `Err` means the node has no recoverable
    /// range structure at all.
    #[allow(clippy::type_complexity)]
    fn bound_nodes<'t>(
        &self,
        node: &'t CstNode,
    ) -> Result<(Option<&'t CstNode>, StepSlot<'t>, Option<&'t CstNode>), ErrorNode> {
        let start = node.child_by_field("start");
        let end = node.child_by_field("end");
        if start.is_some() || end.is_some() {
            let step = match node.child_by_field("step") {
                Some(step) => StepSlot::Present(step),
                None => StepSlot::Absent,
            };
            return Ok((start, step, end));
        }

        // Positional fallback: split the children on ':' tokens into two
        // or three segments. ERROR children occupy their segment so a bad
        // bound still lands in the right slot.
        let mut segments: Vec<Vec<&CstNode>> = vec![Vec::new()];
        for child in &node.children {
            match child.node_type.as_str() {
                ":" => segments.push(Vec::new()),
                "[" | "]" => {}
                _ if !child.is_named && child.text.trim().is_empty() => {}
                _ => {
                    if let Some(segment) = segments.last_mut() {
                        segment.push(child);
                    }
                }
            }
        }

        let single = |seg: &Vec<&'t CstNode>| -> Option<&'t CstNode> { seg.first().copied() };

        match segments.len() {
            2 => Ok((single(&segments[0]), StepSlot::Absent, single(&segments[1]))),
            3 => {
                let step = match single(&segments[1]) {
                    Some(step) => StepSlot::Present(step),
                    None => StepSlot::Empty,
                };
                Ok((single(&segments[0]), step, single(&segments[2])))
            }
            _ => Err(ErrorNode::from_node(
                ErrorCode::SyntaxError,
                "range expression without ':' separator",
                node,
            )),
        }
    }

    /// Validates and converts one bound. A failed bound is an `Err` so the
    /// caller can collapse the whole range to it.
    fn bound(
        &self,
        range_node: &CstNode,
        bound_node: Option<&CstNode>,
        which: Bound,
    ) -> Result<ExpressionNode, Box<ErrorNode>> {
        let Some(bound_node) = bound_node else {
            let err = ErrorNode::from_node(
                which.missing_code(),
                format!("range is missing its {} bound", which.label()),
                range_node,
            );
            self.handler.log_error(&err.message, err.location);
            return Err(Box::new(err));
        };

        if FORBIDDEN_RANGE_BOUND_TYPES.contains(&bound_node.node_type.as_str())
            || bound_node.is_error()
            || bound_node.is_missing()
        {
            let err = ErrorNode::from_node(
                which.invalid_code(),
                format!(
                    "invalid syntax in range {}: '{}'",
                    which.label(),
                    bound_node.text.trim()
                ),
                bound_node,
            );
            self.handler.log_error(&err.message, err.location);
            return Err(Box::new(err));
        }

        // `[0:if]` often parses the keyword as a plain identifier rather
        // than a statement node; catch it by text.
        if bound_node.node_type == "identifier" && is_reserved_keyword(&bound_node.text) {
            let err = ErrorNode::from_node(
                which.invalid_code(),
                format!(
                    "reserved keyword '{}' in range {}",
                    bound_node.text,
                    which.label()
                ),
                bound_node,
            );
            self.handler.log_error(&err.message, err.location);
            return Err(Box::new(err));
        }

        Ok(ExpressionVisitor::new(self.handler.clone()).expression(bound_node))
    }
}
