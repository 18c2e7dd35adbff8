//! Recursive validation of documents against rule trees
//!
//! Validation never stops at the first problem. Every child of a container is
//! checked and every violation is reported with the path of the offending
//! node. The only early exit is per node: when a value has the wrong type,
//! its constraints and children are not examined.
//!
//! # Paths
//!
//! - `""` is the document root
//! - table keys are joined with `.` (`package.name`)
//! - array indices are appended as `[i]` (`bin[0].source`)

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use toml::Value;

use crate::document::{join_index, join_key, type_name};
use crate::rule::{ArrayRule, FloatRule, IntRule, Rule, RuleKind, StringRule, TableRule};
use crate::schema::Schema;

/// A single violation found during validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Path to the violating node; empty at the document root
    pub path: String,
    /// Human-readable description of the violation
    pub message: String,
}

impl ValidationError {
    fn new(path: &str, message: String) -> Self {
        Self {
            path: path.to_string(),
            message,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "[<root>] {}", self.message)
        } else {
            write!(f, "[{}] {}", self.path, self.message)
        }
    }
}

/// Outcome of validating one document
///
/// `valid` is true exactly when `errors` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    valid: bool,
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Whether the document satisfied every rule
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Violations in the order they were found
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Consumes self and returns the violations
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}

/// Validate a document against a schema
///
/// A schema without a root rule produces a single error at the root.
pub fn validate(schema: &Schema, data: &Value) -> ValidationResult {
    let Some(root) = schema.root() else {
        return ValidationResult::from_errors(vec![ValidationError::new(
            "",
            "schema is null or has no root rule".to_string(),
        )]);
    };

    let mut walker = Walker::default();
    walker.rule(root, data, "");
    let result = ValidationResult::from_errors(walker.errors);

    tracing::debug!("Validation finished: {} error(s)", result.errors.len());
    result
}

#[derive(Default)]
struct Walker {
    errors: Vec<ValidationError>,
}

impl Walker {
    fn push(&mut self, path: &str, message: String) {
        self.errors.push(ValidationError::new(path, message));
    }

    fn rule(&mut self, rule: &Rule, data: &Value, path: &str) {
        let expected = rule.rule_type();
        if !expected.matches(data) {
            self.push(
                path,
                format!("expected {}, got {}", expected, type_name(data)),
            );
            return;
        }

        match (rule.kind(), data) {
            (RuleKind::String(r), Value::String(s)) => self.string(r, s, path),
            (RuleKind::Int(r), Value::Integer(v)) => self.int(r, *v, path),
            (RuleKind::Float(r), Value::Float(v)) => self.float(r, *v, path),
            (RuleKind::Array(r), Value::Array(items)) => self.array(r, items, path),
            (RuleKind::Table(r), Value::Table(table)) => self.table(r, table, path),
            _ => {}
        }
    }

    fn string(&mut self, rule: &StringRule, value: &str, path: &str) {
        let len = value.chars().count();

        if let Some(min) = rule.min_length
            && len < min
        {
            self.push(
                path,
                format!("string length {} is less than minimum {}", len, min),
            );
        }

        if let Some(max) = rule.max_length
            && len > max
        {
            self.push(path, format!("string length {} exceeds maximum {}", len, max));
        }

        if !rule.allowed.is_empty() && !rule.allowed.iter().any(|a| a == value) {
            let choices = rule
                .allowed
                .iter()
                .map(|a| format!("\"{}\"", a))
                .collect::<Vec<_>>()
                .join(", ");
            self.push(path, format!("value must be one of: {}", choices));
        }

        // `rule.pattern` is carried for tooling but not evaluated.
    }

    fn int(&mut self, rule: &IntRule, value: i64, path: &str) {
        if let Some(min) = rule.min
            && value < min
        {
            self.push(path, format!("value {} is less than minimum {}", value, min));
        }
        if let Some(max) = rule.max
            && value > max
        {
            self.push(path, format!("value {} exceeds maximum {}", value, max));
        }
    }

    fn float(&mut self, rule: &FloatRule, value: f64, path: &str) {
        if let Some(min) = rule.min
            && value < min
        {
            self.push(path, format!("value {} is less than minimum {}", value, min));
        }
        if let Some(max) = rule.max
            && value > max
        {
            self.push(path, format!("value {} exceeds maximum {}", value, max));
        }
    }

    fn array(&mut self, rule: &ArrayRule, items: &[Value], path: &str) {
        let len = items.len();

        if let Some(min) = rule.min_items
            && len < min
        {
            self.push(
                path,
                format!("array length {} is less than minimum {}", len, min),
            );
        }

        if let Some(max) = rule.max_items
            && len > max
        {
            self.push(path, format!("array length {} exceeds maximum {}", len, max));
        }

        if let Some(element) = rule.element.as_deref() {
            for (i, item) in items.iter().enumerate() {
                self.rule(element, item, &join_index(path, i));
            }
        }
    }

    fn table(&mut self, rule: &TableRule, table: &toml::Table, path: &str) {
        let mut seen: HashSet<&str> = HashSet::with_capacity(rule.len());

        for (key, value) in table {
            let prop_path = join_key(path, key);

            if let Some(property) = rule.property(key) {
                seen.insert(key.as_str());
                self.rule(property, value, &prop_path);
            } else if rule.allows_additional() {
                if let Some(additional) = rule.additional() {
                    self.rule(additional, value, &prop_path);
                }
            } else {
                self.push(&prop_path, format!("unknown property \"{}\"", key));
            }
        }

        for property in rule.properties().filter(|p| p.is_required()) {
            let key = property.key().unwrap_or_default();
            if !seen.contains(key) {
                self.push(
                    &join_key(path, key),
                    format!("required property \"{}\" is missing", key),
                );
            }
        }
    }
}
