//! Blocklang: the core of a visual block programming language
//!
//! Programs are trees of blocks (declare, assign, calculate, if) built by a
//! visual editor. This crate holds everything below the editor:
//! - an integer expression engine (lexer, shunting-yard parser, RPN evaluator)
//! - the block tree and the structural edits the editor performs
//! - a tree-walking interpreter that reports the exact failing block
//!
//! # Architecture
//!
//! ```text
//! expression: Lexer → Parser (shunting-yard) → Evaluator (RPN)
//! program:    Block Tree → Interpreter → Environment | Failure
//! ```
//!
//! # Example
//!
//! ```
//! use blocklang::ast::{Block, Comparison};
//!
//! let program = vec![
//!     Block::declare(["x"]),
//!     Block::if_block("1", Comparison::Gt, "0", vec![Block::calculate("x", "2 + 2")]),
//! ];
//! let env = blocklang::run(&program).unwrap();
//! assert_eq!(env.get("x"), Some(4));
//! ```

pub mod ast;
pub mod common;
pub mod diagnostics;
pub mod eval;
pub mod interp;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod report;

// Re-export diagnostics for convenience
pub use diagnostics::{ExprError, Failure, ProgramError, RunError, TreeError};

// Re-exports for convenience
pub use ast::{Block, BlockPath, Comparison, Program};
pub use eval::calculate_expression;
pub use interp::{Environment, Interpreter, RunResult, run};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
