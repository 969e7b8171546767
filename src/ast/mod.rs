//! Block tree: the program as the editor hands it over
//!
//! A program is an ordered sequence of blocks; a condition block owns its
//! own nested sequence. Nodes are addressed by [`BlockPath`].

mod program;

pub use program::{Program, Walk};

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One node of the program tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    /// Declare variables, each set to 0
    ///
    /// Every entry may itself be a comma-separated list.
    Declare {
        #[serde(deserialize_with = "one_or_many")]
        names: Vec<String>,
    },
    /// Store an integer literal
    Assign { target: String, literal: String },
    /// Store the value of an arithmetic expression
    Calculate { target: String, expression: String },
    /// Run `body` when `lhs op rhs` holds
    If {
        lhs: String,
        op: Comparison,
        rhs: String,
        #[serde(default)]
        body: Vec<Block>,
    },
}

impl Block {
    pub fn declare<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Block::Declare {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn assign(target: impl Into<String>, literal: impl Into<String>) -> Self {
        Block::Assign {
            target: target.into(),
            literal: literal.into(),
        }
    }

    pub fn calculate(target: impl Into<String>, expression: impl Into<String>) -> Self {
        Block::Calculate {
            target: target.into(),
            expression: expression.into(),
        }
    }

    pub fn if_block(
        lhs: impl Into<String>,
        op: Comparison,
        rhs: impl Into<String>,
        body: Vec<Block>,
    ) -> Self {
        Block::If {
            lhs: lhs.into(),
            op,
            rhs: rhs.into(),
            body,
        }
    }

    /// Short name of the block kind
    pub fn kind_name(&self) -> &'static str {
        match self {
            Block::Declare { .. } => "declare",
            Block::Assign { .. } => "assign",
            Block::Calculate { .. } => "calculate",
            Block::If { .. } => "if",
        }
    }

    /// Nested sequence, for blocks that have one
    pub fn body(&self) -> Option<&[Block]> {
        match self {
            Block::If { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn body_mut(&mut self) -> Option<&mut Vec<Block>> {
        match self {
            Block::If { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Block::Declare { names } => write!(f, "declare {}", names.join(", ")),
            Block::Assign { target, literal } => write!(f, "set {} = {}", target, literal),
            Block::Calculate { target, expression } => {
                write!(f, "calc {} = {}", target, expression)
            }
            Block::If { lhs, op, rhs, .. } => write!(f, "if {} {} {}", lhs, op, rhs),
        }
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(name) => vec![name],
        OneOrMany::Many(names) => names,
    })
}

/// Comparison used by condition blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,
}

impl Comparison {
    pub fn apply(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Comparison::Gt => lhs > rhs,
            Comparison::Lt => lhs < rhs,
            Comparison::Eq => lhs == rhs,
            Comparison::Ne => lhs != rhs,
            Comparison::Ge => lhs >= rhs,
            Comparison::Le => lhs <= rhs,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Comparison::Gt => ">",
            Comparison::Lt => "<",
            Comparison::Eq => "==",
            Comparison::Ne => "!=",
            Comparison::Ge => ">=",
            Comparison::Le => "<=",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Location of a block: one 0-based index per nesting level
///
/// Displayed 1-based and dot-separated, so `[1, 0]` prints as `2.1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockPath(Vec<usize>);

impl BlockPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Containing sequence and position within it
    pub fn split_last(&self) -> Option<(BlockPath, usize)> {
        self.0
            .split_last()
            .map(|(last, parent)| (BlockPath(parent.to_vec()), *last))
    }

    pub fn starts_with(&self, prefix: &BlockPath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    pub(crate) fn push(&mut self, index: usize) {
        self.0.push(index);
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }

    pub(crate) fn indices_mut(&mut self) -> &mut [usize] {
        &mut self.0
    }
}

impl From<Vec<usize>> for BlockPath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl<const N: usize> From<[usize; N]> for BlockPath {
    fn from(indices: [usize; N]) -> Self {
        Self(indices.to_vec())
    }
}

impl fmt::Display for BlockPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", index + 1)?;
        }
        Ok(())
    }
}
