//! Variable environment: one flat scope per run

use crate::diagnostics::RunError;
use indexmap::IndexMap;
use serde::Serialize;

/// Integer variables, kept in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Environment {
    vars: IndexMap<String, i64>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name` with value 0
    ///
    /// Re-declaring resets the value but keeps the original position.
    pub fn declare(&mut self, name: impl Into<String>) {
        self.vars.insert(name.into(), 0);
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.vars.get(name).copied()
    }

    /// Update an already declared variable
    pub fn set(&mut self, name: &str, value: i64) -> Result<(), RunError> {
        let slot = self
            .vars
            .get_mut(name)
            .ok_or_else(|| RunError::UndeclaredVariable {
                name: name.to_string(),
            })?;
        *slot = value;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.vars.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn clear(&mut self) {
        self.vars.clear();
    }
}

impl<S: Into<String>> FromIterator<(S, i64)> for Environment {
    fn from_iter<I: IntoIterator<Item = (S, i64)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redeclare_resets_in_place() {
        let mut env = Environment::new();
        env.declare("a");
        env.declare("b");
        env.set("a", 7).unwrap();
        env.declare("a");
        assert_eq!(env.get("a"), Some(0));
        let names: Vec<_> = env.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_set_requires_declaration() {
        let mut env = Environment::new();
        assert_eq!(
            env.set("x", 1),
            Err(RunError::UndeclaredVariable { name: "x".into() })
        );
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let env: Environment = [("Total", 3)].into_iter().collect();
        assert_eq!(env.get("Total"), Some(3));
        assert_eq!(env.get("total"), None);
    }
}
