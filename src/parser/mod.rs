//! Shunting-yard conversion of expression tokens to reverse-Polish order
//!
//! Names are resolved against the variable environment while converting, so
//! the postfix sequence only ever holds numbers and operators.

use crate::diagnostics::ExprError;
use crate::interp::Environment;
use crate::lexer::{Token, TokenKind};
use std::fmt;

/// Operator associativity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
}

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    /// Prefix minus
    Neg,
}

impl Operator {
    /// Binary operator for a token, if it is one
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(Operator::Add),
            TokenKind::Minus => Some(Operator::Sub),
            TokenKind::Star => Some(Operator::Mul),
            TokenKind::Slash => Some(Operator::Div),
            TokenKind::Percent => Some(Operator::Rem),
            _ => None,
        }
    }

    pub fn precedence(self) -> u8 {
        match self {
            Operator::Add | Operator::Sub => 1,
            Operator::Mul | Operator::Div | Operator::Rem => 2,
            Operator::Neg => 3,
        }
    }

    pub fn assoc(self) -> Assoc {
        match self {
            Operator::Neg => Assoc::Right,
            _ => Assoc::Left,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub | Operator::Neg => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Rem => "%",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A numeric operand as written
///
/// Fractional literals survive parsing so evaluation can reject them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Number {
    Int(i64),
    Real(String),
}

/// One element of a postfix sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpnItem {
    Value(Number),
    Op(Operator),
}

/// Operator stack entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Op(Operator),
    LParen,
}

/// Convert infix tokens into reverse-Polish order
pub fn to_postfix(tokens: &[Token], env: &Environment) -> Result<Vec<RpnItem>, ExprError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Pending> = Vec::new();
    // True where a value (or prefix operator) is expected next
    let mut expect_operand = true;
    // True right after a prefix minus was pushed
    let mut after_neg = false;

    for token in tokens {
        let negated = std::mem::replace(&mut after_neg, false);
        match token.kind {
            TokenKind::Number => {
                let number = match parse_number(&token.text) {
                    Err(ExprError::IntegerOverflow) if negated && is_min_magnitude(&token.text) => {
                        stack.pop();
                        Number::Int(i64::MIN)
                    }
                    other => other?,
                };
                output.push(RpnItem::Value(number));
                expect_operand = false;
            }
            TokenKind::Ident => {
                let value = env
                    .get(&token.text)
                    .ok_or_else(|| ExprError::UnknownSymbol {
                        name: token.text.clone(),
                    })?;
                output.push(RpnItem::Value(Number::Int(value)));
                expect_operand = false;
            }
            TokenKind::Minus if expect_operand => {
                stack.push(Pending::Op(Operator::Neg));
                after_neg = true;
            }
            TokenKind::LParen => {
                stack.push(Pending::LParen);
                expect_operand = true;
            }
            TokenKind::RParen => {
                loop {
                    match stack.pop() {
                        Some(Pending::Op(op)) => output.push(RpnItem::Op(op)),
                        Some(Pending::LParen) => break,
                        None => return Err(ExprError::UnmatchedParen),
                    }
                }
                expect_operand = false;
            }
            kind => {
                let op = Operator::from_token(kind).ok_or_else(|| ExprError::UnexpectedSymbol {
                    symbol: token.text.clone(),
                })?;
                while let Some(&Pending::Op(top)) = stack.last() {
                    let drains = top.precedence() > op.precedence()
                        || (top.precedence() == op.precedence() && op.assoc() == Assoc::Left);
                    if !drains {
                        break;
                    }
                    output.push(RpnItem::Op(top));
                    stack.pop();
                }
                stack.push(Pending::Op(op));
                expect_operand = true;
            }
        }
    }

    while let Some(pending) = stack.pop() {
        match pending {
            Pending::Op(op) => output.push(RpnItem::Op(op)),
            Pending::LParen => return Err(ExprError::UnmatchedParen),
        }
    }

    tracing::trace!(?output, "postfix");
    Ok(output)
}

/// Parse a numeric literal
///
/// A fraction made only of zeros (`4.00`) is still an integer.
fn parse_number(text: &str) -> Result<Number, ExprError> {
    let Some(whole) = integral_part(text) else {
        return Ok(Number::Real(text.to_string()));
    };
    whole
        .parse::<i64>()
        .map(Number::Int)
        .map_err(|_| ExprError::IntegerOverflow)
}

/// `9223372036854775808`, which only fits in `i64` behind a prefix minus
fn is_min_magnitude(text: &str) -> bool {
    integral_part(text).and_then(|whole| whole.parse::<u64>().ok()) == Some(i64::MIN.unsigned_abs())
}

/// Digits before the point, or `None` when the fraction is not all zeros
fn integral_part(text: &str) -> Option<&str> {
    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    fraction.bytes().all(|b| b == b'0').then_some(whole)
}
