//! Whole-program container and the structural edits the editor performs

use super::{Block, BlockPath};
use crate::diagnostics::{ProgramError, TreeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Top-level block sequence
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Number of top-level blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of blocks at every nesting level
    pub fn count(&self) -> usize {
        self.walk().count()
    }

    /// Append a block at the top level
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn get(&self, path: &BlockPath) -> Option<&Block> {
        let (first, rest) = path.indices().split_first()?;
        let mut block = self.blocks.get(*first)?;
        for index in rest {
            block = block.body()?.get(*index)?;
        }
        Some(block)
    }

    pub fn get_mut(&mut self, path: &BlockPath) -> Option<&mut Block> {
        let (first, rest) = path.indices().split_first()?;
        let mut block = self.blocks.get_mut(*first)?;
        for index in rest {
            block = block.body_mut()?.get_mut(*index)?;
        }
        Some(block)
    }

    /// Insert `block` before the block at `path`
    ///
    /// An index one past the end of its sequence appends.
    pub fn insert(&mut self, path: &BlockPath, block: Block) -> Result<(), TreeError> {
        let (parent, index) = path
            .split_last()
            .ok_or_else(|| TreeError::InvalidPath { path: path.clone() })?;
        let sequence = self.sequence_mut(&parent)?;
        if index > sequence.len() {
            return Err(TreeError::InvalidPath { path: path.clone() });
        }
        sequence.insert(index, block);
        Ok(())
    }

    pub fn remove(&mut self, path: &BlockPath) -> Result<Block, TreeError> {
        let (parent, index) = path
            .split_last()
            .ok_or_else(|| TreeError::InvalidPath { path: path.clone() })?;
        let sequence = self.sequence_mut(&parent)?;
        if index >= sequence.len() {
            return Err(TreeError::InvalidPath { path: path.clone() });
        }
        Ok(sequence.remove(index))
    }

    /// Move the block at `from` so it lands before the block now at `to`
    ///
    /// On error the tree is left unchanged.
    pub fn move_block(&mut self, from: &BlockPath, to: &BlockPath) -> Result<(), TreeError> {
        if to.depth() > from.depth() && to.starts_with(from) {
            return Err(TreeError::IntoOwnSubtree {
                from: from.clone(),
                to: to.clone(),
            });
        }

        let block = self.remove(from)?;

        // Later siblings of `from` (and everything inside them) shift left
        let mut target = to.clone();
        if let Some((parent, removed)) = from.split_last() {
            let level = parent.depth();
            if target.depth() > level && target.starts_with(&parent) {
                let index = &mut target.indices_mut()[level];
                if *index > removed {
                    *index -= 1;
                }
            }
        }

        if let Err(err) = self.insert(&target, block.clone()) {
            // `from` was valid a moment ago, so this restores the tree
            self.insert(from, block)?;
            return Err(err);
        }
        Ok(())
    }

    /// Depth-first, left-to-right traversal
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(self.blocks.as_slice(), 0)],
        }
    }

    /// Sequence addressed by `parent`: the root or a condition body
    fn sequence_mut(&mut self, parent: &BlockPath) -> Result<&mut Vec<Block>, TreeError> {
        if parent.is_root() {
            return Ok(&mut self.blocks);
        }
        let block = self
            .get_mut(parent)
            .ok_or_else(|| TreeError::InvalidPath {
                path: parent.clone(),
            })?;
        block.body_mut().ok_or_else(|| TreeError::NotAContainer {
            path: parent.clone(),
        })
    }

    // === Loading ===

    pub fn from_json(source: &str) -> Result<Self, ProgramError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_toml(source: &str) -> Result<Self, ProgramError> {
        Ok(toml::from_str(source)?)
    }

    pub fn to_json(&self) -> Result<String, ProgramError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a program file, picking the format from its extension
    pub fn load(path: &Path) -> Result<Self, ProgramError> {
        let source = std::fs::read_to_string(path).map_err(|source| ProgramError::Io {
            path: path.display().to_string(),
            source,
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&source),
            Some("toml") => Self::from_toml(&source),
            _ => Err(ProgramError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }
}

impl fmt::Display for Program {
    /// Indented outline, one block per line
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (path, block) in self.walk() {
            let indent = "  ".repeat(path.depth() - 1);
            writeln!(f, "{}{:<6} {}", indent, path.to_string(), block)?;
        }
        Ok(())
    }
}

/// Iterator returned by [`Program::walk`]
pub struct Walk<'a> {
    /// One frame per open sequence: the blocks and the next index to visit
    stack: Vec<(&'a [Block], usize)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (BlockPath, &'a Block);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            let blocks: &'a [Block] = frame.0;
            let Some(block) = blocks.get(frame.1) else {
                self.stack.pop();
                continue;
            };
            frame.1 += 1;

            let path = BlockPath::from(
                self.stack
                    .iter()
                    .map(|(_, next)| next - 1)
                    .collect::<Vec<_>>(),
            );
            if let Some(body) = block.body() {
                self.stack.push((body, 0));
            }
            return Some((path, block));
        }
    }
}
