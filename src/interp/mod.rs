//! Tree-walking interpreter for block programs
//!
//! Walks the block tree depth-first with one shared environment and stops
//! at the first failing block.

pub mod env;
pub mod exec;

pub use env::Environment;
pub use exec::{Interpreter, RunResult, run};
