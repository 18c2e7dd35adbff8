//! Schema container
//!
//! A [`Schema`] owns the root of a rule tree plus a table of named rules.
//! Named definitions are stored for later reuse; nothing resolves references
//! to them yet.

use std::collections::HashMap;

use toml::Value;

use crate::rule::Rule;
use crate::validator::{self, ValidationResult};

/// A root rule plus named rule definitions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    root: Option<Rule>,
    definitions: HashMap<String, Rule>,
}

impl Schema {
    /// Create an empty schema with no root rule
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a schema from its root rule
    pub fn with_root(root: Rule) -> Self {
        Self {
            root: Some(root),
            definitions: HashMap::new(),
        }
    }

    /// Root rule, if set
    pub fn root(&self) -> Option<&Rule> {
        self.root.as_ref()
    }

    /// Replace the root rule
    pub fn set_root(&mut self, root: Rule) -> &mut Self {
        self.root = Some(root);
        self
    }

    /// Store a named rule definition, replacing any earlier one
    pub fn define(&mut self, name: impl Into<String>, rule: Rule) -> &mut Self {
        self.definitions.insert(name.into(), rule);
        self
    }

    /// Look up a named rule definition
    pub fn definition(&self, name: &str) -> Option<&Rule> {
        self.definitions.get(name)
    }

    /// All named rule definitions
    pub fn definitions(&self) -> &HashMap<String, Rule> {
        &self.definitions
    }

    /// Validate a document against this schema
    pub fn validate(&self, data: &Value) -> ValidationResult {
        validator::validate(self, data)
    }
}

impl From<Rule> for Schema {
    fn from(root: Rule) -> Self {
        Self::with_root(root)
    }
}
