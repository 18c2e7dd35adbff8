//! Struct binding
//!
//! A [`Binder`] maps keys of a TOML table onto fields of a native record
//! through typed setters. Nested tables are handled by child binders reached
//! through a projection onto the nested record.
//!
//! Binding is fail-fast: the first missing required key or type mismatch
//! aborts the call. Fields written before the failure keep their new values,
//! so a target is only meaningful after a successful bind. Optional keys that
//! are absent leave their field untouched; initialize targets with defaults.
//!
//! # Example
//!
//! ```rust,ignore
//! #[derive(Default)]
//! struct Server { host: String, port: i64 }
//!
//! #[derive(Default)]
//! struct App { name: String, server: Server, features: Vec<String> }
//!
//! let server = Binder::<Server>::new()
//!     .string("host", |s, v| s.host = v)
//!     .required()
//!     .int("port", |s, v| s.port = v)
//!     .required();
//!
//! let app = Binder::<App>::new()
//!     .string("name", |a, v| a.name = v)
//!     .required()
//!     .table("server", |a| &mut a.server, server)
//!     .string_array("features", |a, v| a.features = v);
//!
//! let mut config = App::default();
//! app.bind(&doc, &mut config)?;
//! ```

use std::fmt;

use thiserror::Error;
use toml::{Table, Value};

use crate::document::type_name;

/// Result of a bind call
pub type BindResult = std::result::Result<(), BindError>;

/// Reason a bind call stopped
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// The data handed to the binder is not a table
    #[error("data must be a TOML table")]
    NotATable,

    /// A required key is absent
    #[error("required field \"{key}\" is missing")]
    MissingField {
        /// Key that was looked up
        key: String,
    },

    /// A key is present with the wrong type
    #[error("field \"{key}\" expected {expected}, got {actual}")]
    TypeMismatch {
        /// Key that was looked up
        key: String,
        /// Kind the binding expects
        expected: BindKind,
        /// Type found in the data
        actual: &'static str,
    },

    /// An element of a string array is not a string
    #[error("field \"{key}\"[{index}] expected string, got {actual}")]
    ElementMismatch {
        /// Key of the array
        key: String,
        /// Index of the offending element
        index: usize,
        /// Type found in the data
        actual: &'static str,
    },
}

/// Kind of value a binding accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindKind {
    /// String field
    String,
    /// 64-bit integer field
    Int,
    /// 64-bit float field
    Float,
    /// Boolean field
    Bool,
    /// Nested table
    Table,
    /// Array of strings
    StringArray,
}

impl BindKind {
    /// Name used in error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Table => "table",
            Self::StringArray => "array",
        }
    }
}

impl fmt::Display for BindKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type Setter<T, V> = Box<dyn Fn(&mut T, V) + Send + Sync>;
type NestedBind<T> = Box<dyn Fn(&mut T, &Table) -> BindResult + Send + Sync>;

enum Apply<T> {
    String(Setter<T, String>),
    Int(Setter<T, i64>),
    Float(Setter<T, f64>),
    Bool(Setter<T, bool>),
    StringArray(Setter<T, Vec<String>>),
    Table(Option<NestedBind<T>>),
}

struct Binding<T> {
    key: String,
    required: bool,
    apply: Apply<T>,
}

impl<T> Binding<T> {
    fn kind(&self) -> BindKind {
        match self.apply {
            Apply::String(_) => BindKind::String,
            Apply::Int(_) => BindKind::Int,
            Apply::Float(_) => BindKind::Float,
            Apply::Bool(_) => BindKind::Bool,
            Apply::StringArray(_) => BindKind::StringArray,
            Apply::Table(_) => BindKind::Table,
        }
    }

    fn mismatch(&self, actual: &Value) -> BindError {
        BindError::TypeMismatch {
            key: self.key.clone(),
            expected: self.kind(),
            actual: type_name(actual),
        }
    }

    fn apply(&self, value: &Value, target: &mut T) -> BindResult {
        match (&self.apply, value) {
            (Apply::String(set), Value::String(s)) => set(target, s.clone()),
            (Apply::Int(set), Value::Integer(i)) => set(target, *i),
            (Apply::Float(set), Value::Float(f)) => set(target, *f),
            (Apply::Bool(set), Value::Boolean(b)) => set(target, *b),
            (Apply::StringArray(set), Value::Array(items)) => {
                let strings = self.collect_strings(items)?;
                set(target, strings);
            }
            (Apply::Table(nested), Value::Table(table)) => {
                if let Some(nested) = nested {
                    nested(target, table)?;
                }
            }
            _ => return Err(self.mismatch(value)),
        }
        Ok(())
    }

    fn collect_strings(&self, items: &[Value]) -> Result<Vec<String>, BindError> {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(BindError::ElementMismatch {
                    key: self.key.clone(),
                    index,
                    actual: type_name(other),
                }),
            })
            .collect()
    }
}

/// Ordered set of field bindings for records of type `T`
pub struct Binder<T> {
    bindings: Vec<Binding<T>>,
}

impl<T> Default for Binder<T> {
    fn default() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }
}

impl<T> fmt::Debug for Binder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.bindings
                    .iter()
                    .map(|b| (b.key.as_str(), b.kind(), b.required)),
            )
            .finish()
    }
}

impl<T: 'static> Binder<T> {
    /// Create a binder with no bindings
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, key: impl Into<String>, apply: Apply<T>) -> Self {
        self.bindings.push(Binding {
            key: key.into(),
            required: false,
            apply,
        });
        self
    }

    /// Bind a string key
    pub fn string<F>(self, key: impl Into<String>, set: F) -> Self
    where
        F: Fn(&mut T, String) + Send + Sync + 'static,
    {
        self.push(key, Apply::String(Box::new(set)))
    }

    /// Bind an integer key
    pub fn int<F>(self, key: impl Into<String>, set: F) -> Self
    where
        F: Fn(&mut T, i64) + Send + Sync + 'static,
    {
        self.push(key, Apply::Int(Box::new(set)))
    }

    /// Bind a float key
    pub fn float<F>(self, key: impl Into<String>, set: F) -> Self
    where
        F: Fn(&mut T, f64) + Send + Sync + 'static,
    {
        self.push(key, Apply::Float(Box::new(set)))
    }

    /// Bind a boolean key
    pub fn bool<F>(self, key: impl Into<String>, set: F) -> Self
    where
        F: Fn(&mut T, bool) + Send + Sync + 'static,
    {
        self.push(key, Apply::Bool(Box::new(set)))
    }

    /// Bind an array of strings. The field is replaced only if every element
    /// is a string.
    pub fn string_array<F>(self, key: impl Into<String>, set: F) -> Self
    where
        F: Fn(&mut T, Vec<String>) + Send + Sync + 'static,
    {
        self.push(key, Apply::StringArray(Box::new(set)))
    }

    /// Bind a nested table onto the record reached through `project`
    pub fn table<U: 'static>(
        self,
        key: impl Into<String>,
        project: fn(&mut T) -> &mut U,
        nested: Binder<U>,
    ) -> Self {
        let bind: NestedBind<T> = Box::new(move |target: &mut T, table: &Table| {
            nested.bind_table(table, project(target))
        });
        self.push(key, Apply::Table(Some(bind)))
    }

    /// Require a key to hold a table without binding its contents
    pub fn expect_table(self, key: impl Into<String>) -> Self {
        self.push(key, Apply::Table(None))
    }

    /// Mark the most recently added binding as required
    pub fn required(mut self) -> Self {
        if let Some(last) = self.bindings.last_mut() {
            last.required = true;
        }
        self
    }
}

impl<T> Binder<T> {
    /// Number of bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the binder has no bindings
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bind a document node onto `target`
    pub fn bind(&self, data: &Value, target: &mut T) -> BindResult {
        let Value::Table(table) = data else {
            return Err(BindError::NotATable);
        };

        let result = self.bind_table(table, target);
        if let Err(e) = &result {
            tracing::debug!("Binding stopped: {}", e);
        }
        result
    }

    /// Bind a table onto `target`
    pub fn bind_table(&self, table: &Table, target: &mut T) -> BindResult {
        for binding in &self.bindings {
            match table.get(&binding.key) {
                Some(value) => binding.apply(value, target)?,
                None if binding.required => {
                    return Err(BindError::MissingField {
                        key: binding.key.clone(),
                    });
                }
                None => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_str;

    #[derive(Debug, Default, PartialEq)]
    struct Server {
        host: String,
        port: i64,
    }

    #[derive(Debug, Default, PartialEq)]
    struct App {
        name: String,
        count: i64,
        ratio: f64,
        enabled: bool,
        server: Server,
        features: Vec<String>,
    }

    fn server_binder() -> Binder<Server> {
        Binder::new()
            .string("host", |s: &mut Server, v| s.host = v)
            .required()
            .int("port", |s: &mut Server, v| s.port = v)
            .required()
    }

    fn app_binder() -> Binder<App> {
        Binder::new()
            .string("name", |a: &mut App, v| a.name = v)
            .required()
            .int("count", |a: &mut App, v| a.count = v)
            .float("ratio", |a: &mut App, v| a.ratio = v)
            .bool("enabled", |a: &mut App, v| a.enabled = v)
            .table("server", |a: &mut App| &mut a.server, server_binder())
            .string_array("features", |a: &mut App, v| a.features = v)
    }

    #[test]
    fn test_bind_scalars() {
        let data =
            parse_str("name = \"test\"\ncount = 42\nenabled = true\nratio = 0.5\n").unwrap();
        let mut app = App::default();
        app_binder().bind(&data, &mut app).unwrap();
        assert_eq!(app.name, "test");
        assert_eq!(app.count, 42);
        assert!(app.enabled);
        assert_eq!(app.ratio, 0.5);
    }

    #[test]
    fn test_bind_nested_and_arrays() {
        let data = parse_str(
            r#"
name = "my-app"
features = ["auth", "logging", "metrics"]

[server]
host = "0.0.0.0"
port = 3000
"#,
        )
        .unwrap();
        let mut app = App::default();
        app_binder().bind(&data, &mut app).unwrap();
        assert_eq!(
            app.server,
            Server {
                host: "0.0.0.0".to_string(),
                port: 3000
            }
        );
        assert_eq!(app.features, vec!["auth", "logging", "metrics"]);
    }

    #[test]
    fn test_non_table_data() {
        let mut app = App::default();
        let err = app_binder()
            .bind(&Value::Integer(1), &mut app)
            .unwrap_err();
        assert_eq!(err, BindError::NotATable);
        assert_eq!(err.to_string(), "data must be a TOML table");
    }

    #[test]
    fn test_missing_required_field() {
        let data = parse_str("count = 1").unwrap();
        let mut app = App::default();
        let err = app_binder().bind(&data, &mut app).unwrap_err();
        assert_eq!(err.to_string(), "required field \"name\" is missing");
    }

    #[test]
    fn test_missing_optional_leaves_field() {
        let data = parse_str("name = \"x\"").unwrap();
        let mut app = App {
            count: 7,
            features: vec!["keep".to_string()],
            ..App::default()
        };
        app_binder().bind(&data, &mut app).unwrap();
        assert_eq!(app.count, 7);
        assert_eq!(app.features, vec!["keep"]);
    }

    #[test]
    fn test_type_mismatch_message() {
        let data = parse_str("name = \"x\"\ncount = \"many\"\n").unwrap();
        let mut app = App::default();
        let err = app_binder().bind(&data, &mut app).unwrap_err();
        assert_eq!(err.to_string(), "field \"count\" expected int, got string");
    }

    #[test]
    fn test_int_does_not_bind_to_float() {
        let data = parse_str("name = \"x\"\nratio = 1\n").unwrap();
        let mut app = App::default();
        let err = app_binder().bind(&data, &mut app).unwrap_err();
        assert_eq!(err.to_string(), "field \"ratio\" expected float, got int");
    }

    #[test]
    fn test_array_kind_mismatch() {
        let data = parse_str("name = \"x\"\nfeatures = \"auth\"\n").unwrap();
        let mut app = App::default();
        let err = app_binder().bind(&data, &mut app).unwrap_err();
        assert_eq!(err.to_string(), "field \"features\" expected array, got string");
    }

    #[test]
    fn test_string_array_is_atomic() {
        let data = parse_str("name = \"x\"\nfeatures = [\"a\", 2, \"c\"]\n").unwrap();
        let mut app = App {
            features: vec!["original".to_string()],
            ..App::default()
        };
        let err = app_binder().bind(&data, &mut app).unwrap_err();
        assert_eq!(err.to_string(), "field \"features\"[1] expected string, got int");
        assert_eq!(app.features, vec!["original"]);
    }

    #[test]
    fn test_earlier_writes_are_kept_after_failure() {
        let data = parse_str("name = \"written\"\ncount = 5\nenabled = \"no\"\n").unwrap();
        let mut app = App::default();
        assert!(app_binder().bind(&data, &mut app).is_err());
        assert_eq!(app.name, "written");
        assert_eq!(app.count, 5);
    }

    #[test]
    fn test_nested_failure_propagates() {
        let data = parse_str("name = \"x\"\n[server]\nhost = \"h\"\n").unwrap();
        let mut app = App::default();
        let err = app_binder().bind(&data, &mut app).unwrap_err();
        assert_eq!(err.to_string(), "required field \"port\" is missing");
        assert_eq!(app.server.host, "h");
    }

    #[test]
    fn test_nested_kind_mismatch() {
        let data = parse_str("name = \"x\"\nserver = \"localhost\"\n").unwrap();
        let mut app = App::default();
        let err = app_binder().bind(&data, &mut app).unwrap_err();
        assert_eq!(err.to_string(), "field \"server\" expected table, got string");
    }

    #[test]
    fn test_expect_table_checks_shape_only() {
        let binder = Binder::<App>::new().expect_table("server").required();
        let mut app = App::default();

        let data = parse_str("[server]\nanything = 1\n").unwrap();
        binder.bind(&data, &mut app).unwrap();
        assert_eq!(app, App::default());

        let data = parse_str("server = [1]").unwrap();
        let err = binder.bind(&data, &mut app).unwrap_err();
        assert_eq!(err.to_string(), "field \"server\" expected table, got array");
    }

    #[test]
    fn test_required_on_empty_binder_is_noop() {
        let binder = Binder::<App>::new().required();
        assert!(binder.is_empty());
        let mut app = App::default();
        binder.bind(&parse_str("").unwrap(), &mut app).unwrap();
    }

    #[test]
    fn test_debug_lists_bindings() {
        let binder = server_binder();
        assert_eq!(binder.len(), 2);
        let debug = format!("{:?}", binder);
        assert!(debug.contains("\"host\""));
        assert!(debug.contains("Int"));
    }

    #[test]
    fn test_binder_is_shareable() {
        fn assert_send_sync<S: Send + Sync>() {}
        assert_send_sync::<Binder<App>>();
    }
}
