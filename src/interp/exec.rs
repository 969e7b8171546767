//! Tree-walking interpreter for block programs

use crate::ast::{Block, BlockPath, Comparison};
use crate::diagnostics::{Failure, RunError};
use crate::eval::calculate_expression;
use crate::lexer::is_identifier;

use super::env::Environment;

/// Final variables on success, the failing block otherwise
///
/// Changes made before a failure are discarded along with the environment.
pub type RunResult = Result<Environment, Failure>;

/// Run a program from an empty environment
pub fn run(blocks: &[Block]) -> RunResult {
    Interpreter::new().run(blocks)
}

/// Tree-walking interpreter
#[derive(Debug, Default)]
pub struct Interpreter {
    /// Every block entered during the last run, in order
    executed: Vec<BlockPath>,
}

impl Interpreter {
    /// Create a new interpreter
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks visited by the last run, including a failing one
    pub fn executed(&self) -> &[BlockPath] {
        &self.executed
    }

    /// Run `blocks` against a fresh environment
    pub fn run(&mut self, blocks: &[Block]) -> RunResult {
        let mut env = Environment::new();
        self.run_in(blocks, &mut env)?;
        tracing::debug!(variables = env.len(), "run finished");
        Ok(env)
    }

    /// Run `blocks` against a caller-owned environment
    ///
    /// Stops at the first failure; earlier changes stay in `env`.
    pub fn run_in(&mut self, blocks: &[Block], env: &mut Environment) -> Result<(), Failure> {
        self.executed.clear();
        let mut path = BlockPath::root();
        self.exec_sequence(blocks, &mut path, env)
    }

    fn exec_sequence(
        &mut self,
        blocks: &[Block],
        path: &mut BlockPath,
        env: &mut Environment,
    ) -> Result<(), Failure> {
        for (index, block) in blocks.iter().enumerate() {
            path.push(index);
            self.exec_block(block, path, env)?;
            path.pop();
        }
        Ok(())
    }

    fn exec_block(
        &mut self,
        block: &Block,
        path: &mut BlockPath,
        env: &mut Environment,
    ) -> Result<(), Failure> {
        self.executed.push(path.clone());
        tracing::debug!(block = %path, kind = block.kind_name(), "executing");

        let result = match block {
            Block::Declare { names } => declare(names, env),
            Block::Assign { target, literal } => assign(target, literal, env),
            Block::Calculate { target, expression } => calculate(target, expression, env),
            Block::If { lhs, op, rhs, body } => match condition(lhs, *op, rhs, env) {
                Ok(true) => return self.exec_sequence(body, path, env),
                Ok(false) => Ok(()),
                Err(error) => Err(error),
            },
        };

        result.map_err(|error| {
            tracing::debug!(block = %path, %error, "block failed");
            Failure::new(path.clone(), error)
        })
    }
}

fn declare(names: &[String], env: &mut Environment) -> Result<(), RunError> {
    let names: Vec<&str> = names
        .iter()
        .flat_map(|raw| raw.split(','))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect();

    if let Some(bad) = names.iter().find(|name| !is_identifier(name)) {
        return Err(RunError::InvalidIdentifier {
            name: bad.to_string(),
        });
    }
    for name in names {
        env.declare(name);
    }
    Ok(())
}

fn assign(target: &str, literal: &str, env: &mut Environment) -> Result<(), RunError> {
    let target = target.trim();
    if target.is_empty() {
        tracing::debug!("assignment without a target, skipped");
        return Ok(());
    }
    if !env.is_declared(target) {
        return Err(RunError::UndeclaredVariable {
            name: target.to_string(),
        });
    }
    let value = parse_literal(literal)?;
    env.set(target, value)
}

fn calculate(target: &str, expression: &str, env: &mut Environment) -> Result<(), RunError> {
    let target = target.trim();
    if target.is_empty() {
        return Err(RunError::MissingOperand {
            operand: "target variable",
        });
    }
    if expression.trim().is_empty() {
        return Err(RunError::MissingOperand {
            operand: "expression",
        });
    }
    if !env.is_declared(target) {
        return Err(RunError::UndeclaredVariable {
            name: target.to_string(),
        });
    }
    let value = calculate_expression(expression, env)?;
    env.set(target, value)
}

fn condition(lhs: &str, op: Comparison, rhs: &str, env: &Environment) -> Result<bool, RunError> {
    if lhs.trim().is_empty() {
        return Err(RunError::MissingOperand {
            operand: "left-hand side",
        });
    }
    if rhs.trim().is_empty() {
        return Err(RunError::MissingOperand {
            operand: "right-hand side",
        });
    }
    let left = calculate_expression(lhs, env)?;
    let right = calculate_expression(rhs, env)?;
    Ok(op.apply(left, right))
}

/// Parse an optionally negative run of digits, nothing else
fn parse_literal(literal: &str) -> Result<i64, RunError> {
    let digits = literal.strip_prefix('-').unwrap_or(literal);
    let well_formed = !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit());
    match literal.parse::<i64>() {
        Ok(value) if well_formed => Ok(value),
        _ => Err(RunError::NotAnInteger {
            literal: literal.to_string(),
        }),
    }
}
