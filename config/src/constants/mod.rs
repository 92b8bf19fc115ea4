//! Centralized configuration values shared across the OpenSCAD analysis
//! toolkit.
//!
//! Each public item in this module documents its purpose and provides a
//! minimal usage example so that downstream crates can remain declarative
//! and avoid scattering literals.

/// Keywords of the OpenSCAD language that may never be used as plain
/// identifiers. A keyword appearing where an expression is expected (for
/// example as a range bound) is a syntax error, not an identifier.
///
/// # Examples
/// ```
/// use config::constants::RESERVED_KEYWORDS;
/// assert!(RESERVED_KEYWORDS.contains(&"if"));
/// assert!(!RESERVED_KEYWORDS.contains(&"cube"));
/// ```
pub const RESERVED_KEYWORDS: &[&str] = &[
    "if", "else", "for", "while", "do", "let", "each", "module", "function",
    "include", "use", "import",
];

/// CST node types that are never valid inside a range-expression bound.
/// A bound built from one of these constructs yields an
/// `INVALID_SYNTAX_IN_RANGE` error instead of an expression.
///
/// # Examples
/// ```
/// use config::constants::FORBIDDEN_RANGE_BOUND_TYPES;
/// assert!(FORBIDDEN_RANGE_BOUND_TYPES.contains(&"for_statement"));
/// ```
pub const FORBIDDEN_RANGE_BOUND_TYPES: &[&str] = &[
    "if_statement",
    "for_statement",
    "while_statement",
    "do_statement",
    "module_definition",
    "function_definition",
    "include_statement",
    "use_statement",
    "import_statement",
];

/// Maximum number of characters of offending source text quoted in a
/// diagnostic message. Longer snippets are truncated.
///
/// # Examples
/// ```
/// use config::constants::ERROR_SNIPPET_MAX_LEN;
/// assert!(ERROR_SNIPPET_MAX_LEN >= 10);
/// ```
pub const ERROR_SNIPPET_MAX_LEN: usize = 20;

/// Returns true if `name` is a reserved OpenSCAD keyword.
///
/// # Examples
/// ```
/// use config::constants::is_reserved_keyword;
/// assert!(is_reserved_keyword("for"));
/// assert!(!is_reserved_keyword("translate"));
/// ```
pub fn is_reserved_keyword(name: &str) -> bool {
    RESERVED_KEYWORDS.contains(&name)
}
