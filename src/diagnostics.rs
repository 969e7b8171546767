//! Error taxonomy for the expression pipeline and the interpreter
//!
//! Every stage returns one of these typed errors; the interpreter wraps the
//! first one it meets into a [`Failure`] naming the offending block.

use crate::ast::BlockPath;
use crate::common::Span;
use crate::parser::Operator;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Convert our Span to miette's SourceSpan
impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        SourceSpan::new(span.start.into(), span.len())
    }
}

/// Failure while tokenizing, parsing or evaluating an expression
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum ExprError {
    // === Lexical Errors ===
    #[error("Unexpected character `{text}` in expression")]
    #[diagnostic(
        code(lex::unexpected_character),
        help("expressions may only contain integers, names, `+ - * / %` and parentheses")
    )]
    UnexpectedCharacter {
        text: String,
        #[label("not part of any token")]
        span: SourceSpan,
    },

    #[error("Expression is empty")]
    #[diagnostic(code(lex::empty_expression))]
    EmptyExpression,

    // === Syntax Errors ===
    #[error("Unmatched parenthesis")]
    #[diagnostic(code(parse::unmatched_paren))]
    UnmatchedParen,

    #[error("Unknown symbol `{name}`")]
    #[diagnostic(
        code(parse::unknown_symbol),
        help("declare `{name}` in a declaration block before using it")
    )]
    UnknownSymbol { name: String },

    #[error("Unexpected symbol `{symbol}`")]
    #[diagnostic(
        code(parse::unexpected_symbol),
        help("comparisons belong in a condition block, not in arithmetic")
    )]
    UnexpectedSymbol { symbol: String },

    // === Evaluation Errors ===
    #[error("`{value}` is not an integer")]
    #[diagnostic(code(eval::non_integer))]
    NonIntegerValue { value: String },

    #[error("Division by zero")]
    #[diagnostic(code(eval::division_by_zero))]
    DivisionByZero,

    #[error("Not enough operands for `{op}`")]
    #[diagnostic(code(eval::insufficient_operands))]
    InsufficientOperands { op: Operator },

    #[error("Malformed expression: {remaining} values left after evaluation")]
    #[diagnostic(
        code(eval::malformed),
        help("every value must be joined to the next one by an operator")
    )]
    MalformedExpression { remaining: usize },

    #[error("Integer overflow")]
    #[diagnostic(code(eval::overflow), help("values are 64-bit signed integers"))]
    IntegerOverflow,
}

impl ExprError {
    /// Stable key for this kind of error
    pub fn kind(&self) -> &'static str {
        match self {
            ExprError::UnexpectedCharacter { .. } => "unexpected_character",
            ExprError::EmptyExpression => "empty_expression",
            ExprError::UnmatchedParen => "unmatched_paren",
            ExprError::UnknownSymbol { .. } => "unknown_symbol",
            ExprError::UnexpectedSymbol { .. } => "unexpected_symbol",
            ExprError::NonIntegerValue { .. } => "non_integer_value",
            ExprError::DivisionByZero => "division_by_zero",
            ExprError::InsufficientOperands { .. } => "insufficient_operands",
            ExprError::MalformedExpression { .. } => "malformed_expression",
            ExprError::IntegerOverflow => "integer_overflow",
        }
    }
}

/// Failure while executing a single block
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum RunError {
    #[error("Invalid variable name `{name}`")]
    #[diagnostic(
        code(run::invalid_identifier),
        help("names start with a letter or `_` followed by letters, digits or `_`")
    )]
    InvalidIdentifier { name: String },

    #[error("Undeclared variable `{name}`")]
    #[diagnostic(
        code(run::undeclared_variable),
        help("add `{name}` to a declaration block placed above this one")
    )]
    UndeclaredVariable { name: String },

    #[error("`{literal}` is not an integer literal")]
    #[diagnostic(code(run::not_an_integer))]
    NotAnInteger { literal: String },

    #[error("Missing {operand}")]
    #[diagnostic(code(run::missing_operand))]
    MissingOperand { operand: &'static str },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Expression(#[from] ExprError),
}

impl RunError {
    /// Stable key for this kind of error
    pub fn kind(&self) -> &'static str {
        match self {
            RunError::InvalidIdentifier { .. } => "invalid_identifier",
            RunError::UndeclaredVariable { .. } => "undeclared_variable",
            RunError::NotAnInteger { .. } => "not_an_integer",
            RunError::MissingOperand { .. } => "missing_operand",
            RunError::Expression(e) => e.kind(),
        }
    }
}

/// A run halted at `path` with `error`
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
#[error("Block {path} failed")]
pub struct Failure {
    pub path: BlockPath,
    #[source]
    #[diagnostic_source]
    pub error: RunError,
}

impl Failure {
    pub fn new(path: BlockPath, error: impl Into<RunError>) -> Self {
        Self {
            path,
            error: error.into(),
        }
    }
}

/// Structural edit that does not fit the tree
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("No block at {path}")]
    #[diagnostic(code(tree::invalid_path))]
    InvalidPath { path: BlockPath },

    #[error("Block {path} cannot contain other blocks")]
    #[diagnostic(code(tree::not_a_container), help("only condition blocks have a body"))]
    NotAContainer { path: BlockPath },

    #[error("Cannot move block {from} into its own body at {to}")]
    #[diagnostic(code(tree::into_own_subtree))]
    IntoOwnSubtree { from: BlockPath, to: BlockPath },
}

/// Failure to read a program file
#[derive(Error, Debug, Diagnostic)]
pub enum ProgramError {
    #[error("Failed to read `{path}`")]
    #[diagnostic(code(program::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON program")]
    #[diagnostic(code(program::json))]
    Json(#[from] serde_json::Error),

    #[error("Invalid TOML program")]
    #[diagnostic(code(program::toml))]
    Toml(#[from] toml::de::Error),

    #[error("Unsupported program format for `{path}`")]
    #[diagnostic(code(program::format), help("use a `.json` or `.toml` file"))]
    UnsupportedFormat { path: String },
}
