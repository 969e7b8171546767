//! Reverse-Polish evaluation of arithmetic expressions

use crate::diagnostics::ExprError;
use crate::interp::Environment;
use crate::lexer;
use crate::parser::{self, Number, Operator, RpnItem};

/// Reduce a postfix sequence to a single integer
pub fn evaluate(postfix: &[RpnItem]) -> Result<i64, ExprError> {
    let mut stack: Vec<i64> = Vec::with_capacity(postfix.len());

    for item in postfix {
        match item {
            RpnItem::Value(Number::Int(n)) => stack.push(*n),
            RpnItem::Value(Number::Real(text)) => {
                return Err(ExprError::NonIntegerValue {
                    value: text.clone(),
                });
            }
            RpnItem::Op(op) => {
                let value = apply(*op, &mut stack)?;
                stack.push(value);
            }
        }
    }

    match stack.as_slice() {
        [value] => Ok(*value),
        rest => Err(ExprError::MalformedExpression {
            remaining: rest.len(),
        }),
    }
}

/// Pop the operands of `op` and apply it; division truncates toward zero
fn apply(op: Operator, stack: &mut Vec<i64>) -> Result<i64, ExprError> {
    let missing = move || ExprError::InsufficientOperands { op };
    let nonzero = |b: i64| if b == 0 { Err(ExprError::DivisionByZero) } else { Ok(b) };
    let b = stack.pop().ok_or_else(missing)?;
    // the left operand was pushed first
    let mut lhs = || stack.pop().ok_or_else(missing);
    let result = match op {
        Operator::Neg => b.checked_neg(),
        Operator::Add => lhs()?.checked_add(b),
        Operator::Sub => lhs()?.checked_sub(b),
        Operator::Mul => lhs()?.checked_mul(b),
        Operator::Div => lhs()?.checked_div(nonzero(b)?),
        Operator::Rem => lhs()?.checked_rem(nonzero(b)?),
    };
    result.ok_or(ExprError::IntegerOverflow)
}

/// Tokenize, convert and evaluate `expr` against `env`
pub fn calculate_expression(expr: &str, env: &Environment) -> Result<i64, ExprError> {
    let tokens = lexer::lex(expr)?;
    let postfix = parser::to_postfix(&tokens, env)?;
    evaluate(&postfix)
}
