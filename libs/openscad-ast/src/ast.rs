//! # AST Node Types
//!
//! Strongly-typed AST nodes representing OpenSCAD constructs. Every node
//! carries a [`Location`] (absence is tolerated only on documented degraded
//! paths, e.g. names recovered from raw text). Nodes are immutable value
//! objects with no back-reference to the CST; ownership transfers wholly to
//! the caller, and a fresh traversal runs on every re-parse.

use crate::error::ErrorNode;
use crate::location::Location;
use serde::{Deserialize, Serialize};

/// A node of the OpenSCAD AST, discriminated by `type`.
///
/// Recoverable construction failures appear in the tree as
/// [`AstNode::Error`] values; code iterating constructed nodes must check
/// the tag before treating an element as a geometry or control node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AstNode {
    ModuleDefinition(ModuleDefinition),
    FunctionDefinition(FunctionDefinition),
    ModuleInstantiation(ModuleInstantiation),
    If(IfNode),
    ForLoop(ForLoopNode),
    Let(LetNode),
    Each(EachNode),
    Expression(ExpressionNode),
    Error(ErrorNode),
}

impl AstNode {
    /// The discriminant as it appears in serialized form.
    pub fn node_type(&self) -> &'static str {
        match self {
            AstNode::ModuleDefinition(_) => "module_definition",
            AstNode::FunctionDefinition(_) => "function_definition",
            AstNode::ModuleInstantiation(_) => "module_instantiation",
            AstNode::If(_) => "if",
            AstNode::ForLoop(_) => "for_loop",
            AstNode::Let(_) => "let",
            AstNode::Each(_) => "each",
            AstNode::Expression(_) => "expression",
            AstNode::Error(_) => "error",
        }
    }

    /// The source location, when the node carries one.
    pub fn location(&self) -> Option<&Location> {
        match self {
            AstNode::ModuleDefinition(n) => Some(&n.location),
            AstNode::FunctionDefinition(n) => Some(&n.location),
            AstNode::ModuleInstantiation(n) => Some(&n.location),
            AstNode::If(n) => Some(&n.location),
            AstNode::ForLoop(n) => Some(&n.location),
            AstNode::Let(n) => Some(&n.location),
            AstNode::Each(n) => Some(&n.location),
            AstNode::Expression(e) => e.location(),
            AstNode::Error(e) => e.location.as_ref(),
        }
    }

    /// True for [`AstNode::Error`].
    pub fn is_error(&self) -> bool {
        matches!(self, AstNode::Error(_))
    }
}

/// An identifier with its source location.
///
/// The location is `None` only when the name was recovered from raw text
/// because the grammar's structured `name` field was absent — a documented
/// degraded path, not silent corruption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    pub location: Option<Location>,
}

impl Identifier {
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self { name: name.into(), location: Some(location) }
    }

    /// An identifier recovered from raw text, without a location.
    pub fn degraded(name: impl Into<String>) -> Self {
        Self { name: name.into(), location: None }
    }
}

/// `module name(params) { body }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDefinition {
    pub name: Identifier,
    /// Declaration order preserved.
    pub parameters: Vec<ModuleParameter>,
    pub body: Vec<AstNode>,
    pub location: Location,
}

/// `function name(params) = expr;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: Identifier,
    /// Declaration order preserved.
    pub parameters: Vec<ModuleParameter>,
    pub body: ExpressionNode,
    pub location: Location,
}

/// A call-shaped statement: `cube(10);`, `translate(v) child;`,
/// `mymod(a, b) { ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleInstantiation {
    pub name: String,
    /// Call order preserved; positional arguments have `name == None`.
    pub arguments: Vec<Parameter>,
    /// Child statements for transform/CSG-style calls.
    pub children: Vec<AstNode>,
    pub location: Location,
}

/// `if (cond) consequence [else alternative]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfNode {
    pub condition: ExpressionNode,
    pub then_branch: Vec<AstNode>,
    /// `else if` chains appear here as a single nested [`AstNode::If`].
    pub else_branch: Option<Vec<AstNode>>,
    pub location: Location,
}

/// `for (assignments) body`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForLoopNode {
    pub assignments: Vec<ForAssignment>,
    pub body: Vec<AstNode>,
    pub location: Location,
}

/// One `variable = iterable` binding of a for loop. The iterable is a
/// range expression or any vector-valued expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForAssignment {
    pub variable: String,
    pub iterable: ExpressionNode,
    pub location: Location,
}

/// `let (a = 1, b = 2) body`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetNode {
    /// Ordered name→value bindings.
    pub assignments: Vec<LetAssignment>,
    pub body: Vec<AstNode>,
    pub location: Location,
}

/// One `name = value` binding of a let.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetAssignment {
    pub name: String,
    pub value: ExpressionNode,
}

/// `each expr`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EachNode {
    pub value: ExpressionNode,
    pub location: Location,
}

/// A declared parameter of a module or function definition.
///
/// Defaults are fully-parsed expressions (constants, vectors, nested
/// expressions), never raw text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleParameter {
    pub name: String,
    #[serde(rename = "defaultValue")]
    pub default_value: Option<ExpressionNode>,
    pub location: Option<Location>,
}

/// An argument of a call: positional (`name == None`) or named.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: Option<String>,
    pub value: ExpressionNode,
}

impl Parameter {
    pub fn positional(value: ExpressionNode) -> Self {
        Self { name: None, value }
    }

    pub fn named(name: impl Into<String>, value: ExpressionNode) -> Self {
        Self { name: Some(name.into()), value }
    }
}

/// An OpenSCAD expression, discriminated by `expressionType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "expressionType", rename_all = "snake_case")]
pub enum ExpressionNode {
    Literal(LiteralExpression),
    Identifier(IdentifierExpression),
    Vector(VectorExpression),
    Binary(BinaryExpression),
    Unary(UnaryExpression),
    Ternary(TernaryExpression),
    #[serde(rename = "range_expression")]
    Range(RangeExpression),
    FunctionCall(FunctionCallExpression),
    Error(Box<ErrorNode>),
}

impl ExpressionNode {
    pub fn location(&self) -> Option<&Location> {
        match self {
            ExpressionNode::Literal(e) => Some(&e.location),
            ExpressionNode::Identifier(e) => Some(&e.location),
            ExpressionNode::Vector(e) => Some(&e.location),
            ExpressionNode::Binary(e) => Some(&e.location),
            ExpressionNode::Unary(e) => Some(&e.location),
            ExpressionNode::Ternary(e) => Some(&e.location),
            ExpressionNode::Range(e) => Some(&e.location),
            ExpressionNode::FunctionCall(e) => Some(&e.location),
            ExpressionNode::Error(e) => e.location.as_ref(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ExpressionNode::Error(_))
    }
}

/// A literal value. Serializes untagged, so a number literal is a plain
/// JSON number and `undef` is `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Number(f64),
    String(String),
    Boolean(bool),
    Undef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralExpression {
    pub value: LiteralValue,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifierExpression {
    pub name: String,
    pub location: Location,
}

/// `[a, b, c]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorExpression {
    pub elements: Vec<ExpressionNode>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpression {
    pub operator: BinaryOperator,
    pub left: Box<ExpressionNode>,
    pub right: Box<ExpressionNode>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpression {
    pub operator: UnaryOperator,
    pub operand: Box<ExpressionNode>,
    pub location: Location,
}

/// `cond ? cons : alt`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TernaryExpression {
    pub condition: Box<ExpressionNode>,
    pub consequence: Box<ExpressionNode>,
    pub alternative: Box<ExpressionNode>,
    pub location: Location,
}

/// `[start : end]` / `[start : step : end]`
///
/// Both bounds are mandatory and `step` is optional. A reserved keyword
/// written positionally as a bound never reaches this struct; it becomes an
/// [`ErrorNode`](crate::error::ErrorNode) instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeExpression {
    pub start: Box<ExpressionNode>,
    pub end: Box<ExpressionNode>,
    pub step: Option<Box<ExpressionNode>>,
    pub location: Location,
}

/// `name(args)` in expression position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCallExpression {
    pub name: String,
    pub arguments: Vec<Parameter>,
    pub location: Location,
}

/// Binary operators in precedence-free AST form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOperator {
    Or,
    And,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
}

impl BinaryOperator {
    /// Maps an operator token to its AST form.
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "||" => Self::Or,
            "&&" => Self::And,
            "==" => Self::Equal,
            "!=" => Self::NotEqual,
            "<" => Self::Less,
            ">" => Self::Greater,
            "<=" => Self::LessEqual,
            ">=" => Self::GreaterEqual,
            "+" => Self::Add,
            "-" => Self::Subtract,
            "*" => Self::Multiply,
            "/" => Self::Divide,
            "%" => Self::Modulo,
            "^" => Self::Power,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOperator {
    Not,
    Plus,
    Minus,
}

impl UnaryOperator {
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "!" => Self::Not,
            "+" => Self::Plus,
            "-" => Self::Minus,
            _ => return None,
        })
    }
}
