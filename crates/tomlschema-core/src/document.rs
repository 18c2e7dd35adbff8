//! Document loading and inspection
//!
//! The document model is [`toml::Value`]. The core only reads documents;
//! this module covers the parser contract (text or file in, tree out) and
//! the type names used in error messages.

use std::path::Path;

use toml::Value;
use toml::value::Datetime;

use crate::error::{Error, Result};

/// Parse TOML text into a document tree
///
/// The root of a TOML document is always a table.
pub fn parse_str(text: &str) -> Result<Value> {
    let table: toml::Table = toml::from_str(text)?;
    Ok(Value::Table(table))
}

/// Read and parse a TOML file
///
/// # Example
///
/// ```rust,ignore
/// let doc = tomlschema_core::document::parse_file("Cargo.toml")?;
/// assert!(doc.is_table());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(Error::DocumentNotFound {
            path: path.display().to_string(),
        });
    }

    let contents = std::fs::read_to_string(path)?;
    parse_str(&contents)
}

/// Name of a document node's runtime type, as used in error messages
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::String(_) => "string",
        Value::Integer(_) => "int",
        Value::Float(_) => "float",
        Value::Boolean(_) => "bool",
        Value::Table(_) => "table",
        Value::Array(_) => "array",
        Value::Datetime(dt) => datetime_type_name(dt),
    }
}

fn datetime_type_name(dt: &Datetime) -> &'static str {
    match (dt.date.is_some(), dt.time.is_some(), dt.offset.is_some()) {
        (_, _, true) => "datetimetz",
        (true, true, false) => "datetime",
        (true, false, false) => "date",
        _ => "time",
    }
}

/// Join a child key onto a parent path (`""` at the root)
pub(crate) fn join_key(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

/// Join an array index onto a parent path
pub(crate) fn join_index(path: &str, index: usize) -> String {
    format!("{}[{}]", path, index)
}
