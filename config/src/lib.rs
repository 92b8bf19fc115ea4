//! # Config Crate
//!
//! Centralized configuration constants for the OpenSCAD analysis toolkit.
//! All magic numbers and language tables used by the CST→AST layer are
//! defined here to ensure consistency across crates.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{RESERVED_KEYWORDS, ERROR_SNIPPET_MAX_LEN};
//!
//! assert!(RESERVED_KEYWORDS.contains(&"module"));
//! assert!(ERROR_SNIPPET_MAX_LEN >= 10);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Browser-Safe**: No platform-specific values
//! - **OpenSCAD Compatible**: Tables match the OpenSCAD language reference

pub mod constants;
