//! # Error Handler Capability
//!
//! A structured-logging/collection interface injected into every visitor's
//! constructor. A single traversal accumulates *all* diagnostics instead of
//! stopping at the first, so downstream tooling sees the complete picture
//! of a malformed file.
//!
//! The traversal is single-threaded and synchronous (the CST is fully
//! materialized before it starts), so the collecting implementation uses
//! `Rc` + `RefCell` rather than locks.

use crate::location::Location;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Severity of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Debug,
}

/// A diagnostic message with severity and optional location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub location: Option<Location>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>, location: Option<Location>) -> Self {
        Self {
            severity,
            message: message.into(),
            location,
        }
    }
}

/// The injected error-handling capability.
///
/// Visitors never throw on malformed input; they report through this
/// interface and return `None` or an error node. Implementations decide
/// what reporting means (collect, log, both).
pub trait ErrorHandler {
    fn report(&self, diagnostic: Diagnostic);

    fn log_error(&self, message: &str, location: Option<Location>) {
        self.report(Diagnostic::new(Severity::Error, message, location));
    }

    fn log_warning(&self, message: &str, location: Option<Location>) {
        self.report(Diagnostic::new(Severity::Warning, message, location));
    }

    fn log_info(&self, message: &str, location: Option<Location>) {
        self.report(Diagnostic::new(Severity::Info, message, location));
    }

    fn log_debug(&self, message: &str, location: Option<Location>) {
        self.report(Diagnostic::new(Severity::Debug, message, location));
    }
}

/// Shared handle to an error handler, cloned into every visitor.
pub type SharedErrorHandler = Rc<dyn ErrorHandler>;

/// Accumulates diagnostics for one traversal and mirrors them to
/// `tracing` events.
///
/// Scoped to a single parse: create a fresh handler per traversal rather
/// than reusing one across trees.
///
/// # Example
///
/// ```rust
/// use openscad_ast::handler::{CollectingErrorHandler, ErrorHandler};
///
/// let handler = CollectingErrorHandler::new();
/// handler.log_warning("suspicious range step", None);
/// assert_eq!(handler.diagnostics().len(), 1);
/// assert!(!handler.has_errors());
/// ```
#[derive(Debug, Default)]
pub struct CollectingErrorHandler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl CollectingErrorHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the accumulated diagnostics, in report order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Number of error-severity diagnostics.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Drops all accumulated diagnostics.
    pub fn clear(&self) {
        self.diagnostics.borrow_mut().clear();
    }
}

impl ErrorHandler for CollectingErrorHandler {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => tracing::error!(message = %diagnostic.message, "ast"),
            Severity::Warning => tracing::warn!(message = %diagnostic.message, "ast"),
            Severity::Info => tracing::info!(message = %diagnostic.message, "ast"),
            Severity::Debug => tracing::debug!(message = %diagnostic.message, "ast"),
        }
        self.diagnostics.borrow_mut().push(diagnostic);
    }
}
