//! Presentation of run results
//!
//! Two renderings: plain text for terminals and a serializable [`Report`]
//! for tools that mark the failing block themselves.

use crate::ast::{Block, BlockPath, Program};
use crate::diagnostics::{Failure, RunError};
use crate::interp::{Environment, RunResult};
use crate::lexer;
use miette::{Diagnostic, MietteDiagnostic};
use serde::Serialize;
use std::fmt::Write;

/// Shown when a successful run declared nothing
pub const NO_VARIABLES: &str = "(no variables)";

/// Machine-readable outcome of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Report {
    Success {
        variables: Environment,
    },
    Failure {
        /// 1-based dotted form, e.g. `2.1`
        block: String,
        path: BlockPath,
        kind: &'static str,
        message: String,
    },
}

impl Report {
    pub fn new(result: &RunResult) -> Self {
        match result {
            Ok(env) => Report::Success {
                variables: env.clone(),
            },
            Err(failure) => Report::Failure {
                block: failure.path.to_string(),
                path: failure.path.clone(),
                kind: failure.error.kind(),
                message: failure.error.to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Report::Success { .. })
    }
}

/// Render a run result as text
pub fn render(result: &RunResult) -> String {
    match result {
        Ok(env) => render_variables(env),
        Err(failure) => format!("block {}: {}\n", failure.path, failure.error),
    }
}

/// One `name = value` line per variable, in declaration order
pub fn render_variables(env: &Environment) -> String {
    if env.is_empty() {
        return format!("{}\n", NO_VARIABLES);
    }
    let mut out = String::new();
    for (name, value) in env.iter() {
        let _ = writeln!(out, "{} = {}", name, value);
    }
    out
}

/// The expression text a failure's labels point into
///
/// For an `if` block this is whichever side fails to tokenize the same way.
pub fn failing_expression<'a>(program: &'a Program, failure: &Failure) -> Option<&'a str> {
    let RunError::Expression(err) = &failure.error else {
        return None;
    };
    match program.get(&failure.path)? {
        Block::Calculate { expression, .. } => Some(expression.as_str()),
        Block::If { lhs, rhs, .. } => [lhs, rhs]
            .into_iter()
            .find(|side| lexer::lex(side).err().as_ref() == Some(err))
            .map(String::as_str),
        _ => None,
    }
}

/// Turn a failure into a terminal diagnostic, with the failing expression
/// attached when its error carries labels
pub fn diagnostic(program: &Program, failure: &Failure) -> miette::Report {
    let error = &failure.error;
    let mut diagnostic =
        MietteDiagnostic::new(format!("Block {} failed: {}", failure.path, error));
    if let Some(code) = error.code() {
        diagnostic = diagnostic.with_code(code.to_string());
    }
    if let Some(help) = error.help() {
        diagnostic = diagnostic.with_help(help.to_string());
    }

    match (failing_expression(program, failure), error.labels()) {
        (Some(source), Some(labels)) => {
            miette::Report::new(diagnostic.with_labels(labels)).with_source_code(source.to_string())
        }
        _ => miette::Report::new(diagnostic),
    }
}
