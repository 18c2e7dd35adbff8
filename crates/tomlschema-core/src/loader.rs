//! Declarative schema loader
//!
//! Builds a rule tree from a TOML document written in the `$`-prefixed
//! meta-schema convention.
//!
//! # Meta-schema
//!
//! ```toml
//! "$type" = "table"
//!
//! [package]
//! "$type" = "table"
//! "$required" = true
//!
//! [package.name]
//! "$type" = "string"
//! "$required" = true
//! "$min_length" = 1
//!
//! [package.kinds]
//! "$type" = "array"
//! "$element" = { "$type" = "string", "$enum" = ["shared", "static"] }
//! ```
//!
//! | key                 | applies to   |
//! |---------------------|--------------|
//! | `$type`             | all          |
//! | `$required`         | all          |
//! | `$min_length`       | string       |
//! | `$max_length`       | string       |
//! | `$enum`             | string       |
//! | `$pattern`          | string       |
//! | `$min`, `$max`      | int, float   |
//! | `$min_items`        | array        |
//! | `$max_items`        | array        |
//! | `$element`          | array        |
//! | `$allow_additional` | table        |
//! | `$additional`       | table        |
//! | `$definitions`      | root only    |
//!
//! Tables loaded here accept unknown keys unless `$allow_additional = false`.
//! This differs from [`Rule::table`], which starts closed.
//!
//! Loading never fails on a malformed meta-schema. Nodes that cannot be
//! understood become `any` rules and refinements of the wrong type are
//! ignored.

use std::path::Path;

use toml::{Table, Value};

use crate::document;
use crate::rule::{Rule, RuleType};
use crate::schema::Schema;

/// Build a schema from a meta-schema document
pub fn load_schema(doc: &Value) -> Schema {
    let mut schema = Schema::with_root(parse_rule(doc));

    if let Some(definitions) = doc.get("$definitions").and_then(Value::as_table) {
        for (name, def) in definitions {
            schema.define(name.clone(), parse_rule(def));
        }
    }

    schema
}

/// Parse meta-schema text into a schema
///
/// Returns `None` if the text is not valid TOML.
pub fn load_schema_str(text: &str) -> Option<Schema> {
    match document::parse_str(text) {
        Ok(doc) => Some(load_schema(&doc)),
        Err(e) => {
            tracing::warn!("Failed to parse schema: {}", e);
            None
        }
    }
}

/// Read a meta-schema file into a schema
///
/// Returns `None` if the file cannot be read or parsed; the cause is logged.
pub fn load_schema_from_file<P: AsRef<Path>>(path: P) -> Option<Schema> {
    let path = path.as_ref();
    match document::parse_file(path) {
        Ok(doc) => {
            tracing::debug!("Loaded schema from {}", path.display());
            Some(load_schema(&doc))
        }
        Err(e) => {
            tracing::warn!("Failed to load schema file {}: {}", path.display(), e);
            None
        }
    }
}

impl Schema {
    /// Build a schema from a meta-schema document
    pub fn from_document(doc: &Value) -> Self {
        load_schema(doc)
    }
}

fn parse_rule(node: &Value) -> Rule {
    let Some(table) = node.as_table() else {
        return Rule::any();
    };
    let Some(type_name) = table.get("$type").and_then(Value::as_str) else {
        return Rule::any();
    };

    let mut rule = match RuleType::from_name(type_name).unwrap_or(RuleType::Any) {
        RuleType::String => parse_string(table),
        RuleType::Int => parse_int(table),
        RuleType::Float => parse_float(table),
        RuleType::Bool => Rule::bool(),
        RuleType::Table => parse_table(table),
        RuleType::Array => parse_array(table),
        RuleType::Any => Rule::any(),
    };

    if let Some(required) = table.get("$required").and_then(Value::as_bool) {
        rule.set_required(required);
    }

    rule
}

fn count(table: &Table, key: &str) -> Option<usize> {
    table
        .get(key)
        .and_then(Value::as_integer)
        .and_then(|n| usize::try_from(n).ok())
}

fn parse_string(table: &Table) -> Rule {
    let mut rule = Rule::string();

    if let Some(min) = count(table, "$min_length") {
        rule = rule.min_length(min);
    }
    if let Some(max) = count(table, "$max_length") {
        rule = rule.max_length(max);
    }
    if let Some(values) = table.get("$enum").and_then(Value::as_array) {
        rule = rule.one_of(values.iter().filter_map(Value::as_str));
    }
    if let Some(pattern) = table.get("$pattern").and_then(Value::as_str) {
        rule = rule.pattern(pattern);
    }

    rule
}

fn parse_int(table: &Table) -> Rule {
    let mut rule = Rule::int();

    if let Some(min) = table.get("$min").and_then(Value::as_integer) {
        rule = rule.min_int(min);
    }
    if let Some(max) = table.get("$max").and_then(Value::as_integer) {
        rule = rule.max_int(max);
    }

    rule
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Float(f) => Some(*f),
        Value::Integer(i) => Some(*i as f64),
        _ => None,
    }
}

fn parse_float(table: &Table) -> Rule {
    let mut rule = Rule::float();

    if let Some(min) = table.get("$min").and_then(as_number) {
        rule = rule.min_float(min);
    }
    if let Some(max) = table.get("$max").and_then(as_number) {
        rule = rule.max_float(max);
    }

    rule
}

fn parse_array(table: &Table) -> Rule {
    let mut rule = Rule::array();

    if let Some(min) = count(table, "$min_items") {
        rule = rule.min_items(min);
    }
    if let Some(max) = count(table, "$max_items") {
        rule = rule.max_items(max);
    }
    if let Some(element) = table.get("$element").filter(|e| e.is_table()) {
        rule = rule.element(parse_rule(element));
    }

    rule
}

fn parse_table(table: &Table) -> Rule {
    let mut rule = Rule::table().allow_additional();

    for (key, value) in table.iter().filter(|(k, _)| !k.starts_with('$')) {
        rule.add_property(key.clone(), parse_rule(value));
    }

    if let Some(additional) = table.get("$additional").filter(|a| a.is_table()) {
        rule = rule.additional(parse_rule(additional));
    }
    if table.get("$allow_additional").and_then(Value::as_bool) == Some(false) {
        rule = rule.deny_additional();
    }

    rule
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_str;
    use crate::rule::RuleKind;

    fn load(text: &str) -> Schema {
        load_schema(&parse_str(text).unwrap())
    }

    #[test]
    fn test_string_rule_matches_builder() {
        let schema = load(
            r#"
"$type" = "string"
"$required" = true
"$min_length" = 3
"$max_length" = 10
"$enum" = ["alpha", "beta"]
"$pattern" = "^[a-z]+$"
"#,
        );
        let expected = Rule::string()
            .min_length(3)
            .max_length(10)
            .one_of(["alpha", "beta"])
            .pattern("^[a-z]+$")
            .required();
        assert_eq!(schema.root(), Some(&expected));
    }

    #[test]
    fn test_numeric_rules() {
        let schema = load(
            r#"
"$type" = "int"
"$min" = 1
"$max" = 65535
"#,
        );
        assert_eq!(schema.root(), Some(&Rule::int().min_int(1).max_int(65535)));

        let schema = load(
            r#"
"$type" = "float"
"$min" = 0.5
"$max" = 2
"#,
        );
        assert_eq!(
            schema.root(),
            Some(&Rule::float().min_float(0.5).max_float(2.0))
        );
    }

    #[test]
    fn test_array_rule_with_element() {
        let schema = load(
            r#"
"$type" = "array"
"$min_items" = 1
"$max_items" = 4
"$element" = { "$type" = "string", "$enum" = ["shared", "static"] }
"#,
        );
        let expected = Rule::array_of(Rule::string().one_of(["shared", "static"]))
            .min_items(1)
            .max_items(4);
        assert_eq!(schema.root(), Some(&expected));
    }

    #[test]
    fn test_tables_default_open() {
        let schema = load(
            r#"
"$type" = "table"
[name]
"$type" = "string"
"#,
        );
        let expected = Rule::table()
            .allow_additional()
            .property("name", Rule::string());
        assert_eq!(schema.root(), Some(&expected));
    }

    #[test]
    fn test_allow_additional_false_closes_table() {
        let schema = load(
            r#"
"$type" = "table"
"$allow_additional" = false
"#,
        );
        assert_eq!(schema.root(), Some(&Rule::table()));

        let schema = load(
            r#"
"$type" = "table"
"$allow_additional" = true
"#,
        );
        assert_eq!(schema.root(), Some(&Rule::table().allow_additional()));
    }

    #[test]
    fn test_additional_rule() {
        let schema = load(
            r#"
"$type" = "table"
"$additional" = { "$type" = "string" }
"#,
        );
        assert_eq!(
            schema.root(),
            Some(&Rule::table().additional(Rule::string()))
        );
    }

    #[test]
    fn test_properties_keep_document_order() {
        let schema = load(
            r#"
"$type" = "table"
zeta = { "$type" = "int" }
alpha = { "$type" = "bool" }
"#,
        );
        let Some(RuleKind::Table(table)) = schema.root().map(Rule::kind) else {
            panic!("Expected table rule");
        };
        let keys: Vec<_> = table.properties().map(|p| p.key().unwrap()).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_malformed_nodes_degrade_to_any() {
        // no $type
        assert_eq!(load(r#""$required" = true"#).root(), Some(&Rule::any()));
        // $type of the wrong TOML type
        assert_eq!(load(r#""$type" = 3"#).root(), Some(&Rule::any()));
        // unknown $type keeps refinements that apply to every kind
        let schema = load(
            r#"
"$type" = "integer"
"$required" = true
"#,
        );
        assert_eq!(schema.root(), Some(&Rule::any().required()));
        // property that is not a table
        let schema = load(
            r#"
"$type" = "table"
name = "string"
"#,
        );
        assert_eq!(
            schema.root(),
            Some(&Rule::table().allow_additional().property("name", Rule::any()))
        );
    }

    #[test]
    fn test_wrongly_typed_refinements_are_ignored() {
        let schema = load(
            r#"
"$type" = "string"
"$required" = "yes"
"$min_length" = -1
"$max_length" = "10"
"$enum" = ["ok", 3, true]
"#,
        );
        assert_eq!(schema.root(), Some(&Rule::string().one_of(["ok"])));

        let schema = load(
            r#"
"$type" = "int"
"$min" = 1.5
"#,
        );
        assert_eq!(schema.root(), Some(&Rule::int()));

        let schema = load(
            r#"
"$type" = "array"
"$element" = "string"
"#,
        );
        assert_eq!(schema.root(), Some(&Rule::array()));
    }

    #[test]
    fn test_definitions_are_stored() {
        let schema = load(
            r#"
"$type" = "table"

["$definitions".port]
"$type" = "int"
"$min" = 1
"#,
        );
        assert_eq!(schema.definition("port"), Some(&Rule::int().min_int(1)));
        let Some(RuleKind::Table(table)) = schema.root().map(Rule::kind) else {
            panic!("Expected table rule");
        };
        assert!(table.is_empty());
    }

    #[test]
    fn test_load_schema_str_invalid_toml() {
        assert!(load_schema_str(r#""$type" = "#).is_none());
        assert!(load_schema_str(r#""$type" = "bool""#).is_some());
    }

    #[test]
    fn test_load_schema_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.toml");
        std::fs::write(
            &path,
            r#"
"$type" = "table"
[port]
"$type" = "int"
"#,
        )
        .unwrap();

        let schema = load_schema_from_file(&path).unwrap();
        assert_eq!(
            schema.root(),
            Some(&Rule::table().allow_additional().property("port", Rule::int()))
        );

        assert!(load_schema_from_file(dir.path().join("missing.toml")).is_none());

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[unterminated").unwrap();
        assert!(load_schema_from_file(&broken).is_none());
    }
}
