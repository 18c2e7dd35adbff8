//! Rule model and fluent builders
//!
//! A [`Rule`] describes the expected shape of one document node. Rules nest:
//! tables own their property rules and arrays own their element rule, so a
//! rule tree is always a tree.
//!
//! # Example
//!
//! ```rust,ignore
//! let package = Rule::table()
//!     .property("name", Rule::string().min_length(1).required())
//!     .property("version", Rule::string().required())
//!     .property("include", Rule::array_of(Rule::string()));
//! ```
//!
//! Constraint methods panic when applied to the wrong kind of rule
//! (`Rule::int().min_length(1)`). That is a programming error in the
//! schema definition, not a data problem.

use std::collections::HashMap;
use std::fmt;

use toml::Value;

/// Declared type of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleType {
    /// TOML string
    String,
    /// TOML integer
    Int,
    /// TOML float
    Float,
    /// TOML boolean
    Bool,
    /// TOML table
    Table,
    /// TOML array
    Array,
    /// Any value
    Any,
}

impl RuleType {
    /// Name used in meta-schemas and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Table => "table",
            Self::Array => "array",
            Self::Any => "any",
        }
    }

    /// Parse a meta-schema `$type` name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "bool" => Some(Self::Bool),
            "table" => Some(Self::Table),
            "array" => Some(Self::Array),
            "any" => Some(Self::Any),
            _ => None,
        }
    }

    /// Whether a document node has this type
    pub fn matches(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::Any, _)
                | (Self::String, Value::String(_))
                | (Self::Int, Value::Integer(_))
                | (Self::Float, Value::Float(_))
                | (Self::Bool, Value::Boolean(_))
                | (Self::Table, Value::Table(_))
                | (Self::Array, Value::Array(_))
        )
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Constraints on a string value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringRule {
    /// Minimum length in characters
    pub min_length: Option<usize>,
    /// Maximum length in characters
    pub max_length: Option<usize>,
    /// Allowed values, in declaration order; empty means unrestricted
    pub allowed: Vec<String>,
    /// Pattern the value should match. Stored but not evaluated.
    pub pattern: Option<String>,
}

/// Inclusive bounds on an integer value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntRule {
    /// Minimum value
    pub min: Option<i64>,
    /// Maximum value
    pub max: Option<i64>,
}

/// Inclusive bounds on a float value
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FloatRule {
    /// Minimum value
    pub min: Option<f64>,
    /// Maximum value
    pub max: Option<f64>,
}

/// Constraints on an array value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrayRule {
    /// Minimum number of items
    pub min_items: Option<usize>,
    /// Maximum number of items
    pub max_items: Option<usize>,
    /// Rule applied to every element
    pub element: Option<Box<Rule>>,
}

/// Constraints on a table value
///
/// Properties are kept in declaration order with a key index for lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRule {
    properties: Vec<Rule>,
    index: HashMap<String, usize>,
    allow_additional: bool,
    additional: Option<Box<Rule>>,
}

impl TableRule {
    /// Look up a declared property by key
    pub fn property(&self, key: &str) -> Option<&Rule> {
        self.index.get(key).map(|&i| &self.properties[i])
    }

    /// Declared properties in declaration order
    pub fn properties(&self) -> impl Iterator<Item = &Rule> {
        self.properties.iter()
    }

    /// Number of declared properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether no properties are declared
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Whether keys without a declared property are accepted
    pub fn allows_additional(&self) -> bool {
        self.allow_additional
    }

    /// Rule applied to keys without a declared property
    pub fn additional(&self) -> Option<&Rule> {
        self.additional.as_deref()
    }

    pub(crate) fn set_allow_additional(&mut self, allow: bool) {
        self.allow_additional = allow;
    }

    pub(crate) fn set_additional(&mut self, rule: Rule) {
        self.allow_additional = true;
        self.additional = Some(Box::new(rule));
    }

    /// Insert or overwrite a property. An overwrite keeps the original slot.
    fn insert(&mut self, key: String, mut rule: Rule) {
        rule.key = Some(key.clone());
        match self.index.get(&key) {
            Some(&i) => self.properties[i] = rule,
            None => {
                self.index.insert(key, self.properties.len());
                self.properties.push(rule);
            }
        }
    }
}

/// Per-variant payload of a rule
#[derive(Debug, Clone, PartialEq)]
pub enum RuleKind {
    /// String rule
    String(StringRule),
    /// Integer rule
    Int(IntRule),
    /// Float rule
    Float(FloatRule),
    /// Boolean rule
    Bool,
    /// Table rule
    Table(TableRule),
    /// Array rule
    Array(ArrayRule),
    /// Matches any value
    Any,
}

impl RuleKind {
    /// Declared type of this payload
    pub fn rule_type(&self) -> RuleType {
        match self {
            Self::String(_) => RuleType::String,
            Self::Int(_) => RuleType::Int,
            Self::Float(_) => RuleType::Float,
            Self::Bool => RuleType::Bool,
            Self::Table(_) => RuleType::Table,
            Self::Array(_) => RuleType::Array,
            Self::Any => RuleType::Any,
        }
    }
}

/// A node in a validation rule tree
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    key: Option<String>,
    required: bool,
    kind: RuleKind,
}

impl Rule {
    fn new(kind: RuleKind) -> Self {
        Self {
            key: None,
            required: false,
            kind,
        }
    }

    /// Unconstrained string rule
    pub fn string() -> Self {
        Self::new(RuleKind::String(StringRule::default()))
    }

    /// Unconstrained integer rule
    pub fn int() -> Self {
        Self::new(RuleKind::Int(IntRule::default()))
    }

    /// Unconstrained float rule
    pub fn float() -> Self {
        Self::new(RuleKind::Float(FloatRule::default()))
    }

    /// Boolean rule
    pub fn bool() -> Self {
        Self::new(RuleKind::Bool)
    }

    /// Table rule with no properties. Closed to unknown keys by default.
    pub fn table() -> Self {
        Self::new(RuleKind::Table(TableRule::default()))
    }

    /// Array rule with no element rule
    pub fn array() -> Self {
        Self::new(RuleKind::Array(ArrayRule::default()))
    }

    /// Array rule applying `element` to every item
    pub fn array_of(element: Rule) -> Self {
        Self::array().element(element)
    }

    /// Rule matching any value
    pub fn any() -> Self {
        Self::new(RuleKind::Any)
    }

    /// Key this rule is attached under, if it is a table property
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Whether the property must be present in its parent table
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Variant payload
    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    /// Declared type
    pub fn rule_type(&self) -> RuleType {
        self.kind.rule_type()
    }

    /// Mark as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark as optional
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Set the required flag in place
    pub fn set_required(&mut self, required: bool) -> &mut Self {
        self.required = required;
        self
    }

    /// Minimum string length in characters
    pub fn min_length(mut self, min: usize) -> Self {
        self.string_mut("min_length").min_length = Some(min);
        self
    }

    /// Maximum string length in characters
    pub fn max_length(mut self, max: usize) -> Self {
        self.string_mut("max_length").max_length = Some(max);
        self
    }

    /// Restrict a string to the given values, replacing any earlier list
    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.string_mut("one_of").allowed = values.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a pattern to a string rule. The validator does not evaluate it.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.string_mut("pattern").pattern = Some(pattern.into());
        self
    }

    /// Inclusive integer minimum
    pub fn min_int(mut self, min: i64) -> Self {
        self.int_mut("min_int").min = Some(min);
        self
    }

    /// Inclusive integer maximum
    pub fn max_int(mut self, max: i64) -> Self {
        self.int_mut("max_int").max = Some(max);
        self
    }

    /// Inclusive float minimum
    pub fn min_float(mut self, min: f64) -> Self {
        self.float_mut("min_float").min = Some(min);
        self
    }

    /// Inclusive float maximum
    pub fn max_float(mut self, max: f64) -> Self {
        self.float_mut("max_float").max = Some(max);
        self
    }

    /// Minimum number of array items
    pub fn min_items(mut self, min: usize) -> Self {
        self.array_mut("min_items").min_items = Some(min);
        self
    }

    /// Maximum number of array items
    pub fn max_items(mut self, max: usize) -> Self {
        self.array_mut("max_items").max_items = Some(max);
        self
    }

    /// Rule applied to every array element
    pub fn element(mut self, element: Rule) -> Self {
        self.array_mut("element").element = Some(Box::new(element));
        self
    }

    /// Attach a named property to a table rule
    pub fn property(mut self, key: impl Into<String>, child: Rule) -> Self {
        self.add_property(key, child);
        self
    }

    /// Attach a named property in place, overwriting any rule under the same key
    pub fn add_property(&mut self, key: impl Into<String>, child: Rule) -> &mut Self {
        self.table_mut("add_property").insert(key.into(), child);
        self
    }

    /// Accept keys that have no declared property
    pub fn allow_additional(mut self) -> Self {
        self.table_mut("allow_additional").set_allow_additional(true);
        self
    }

    /// Reject keys that have no declared property
    pub fn deny_additional(mut self) -> Self {
        self.table_mut("deny_additional").set_allow_additional(false);
        self
    }

    /// Accept keys without a declared property and validate them against `rule`
    pub fn additional(mut self, rule: Rule) -> Self {
        self.table_mut("additional").set_additional(rule);
        self
    }

    fn string_mut(&mut self, op: &str) -> &mut StringRule {
        match &mut self.kind {
            RuleKind::String(rule) => rule,
            other => wrong_kind(op, RuleType::String, other.rule_type()),
        }
    }

    fn int_mut(&mut self, op: &str) -> &mut IntRule {
        match &mut self.kind {
            RuleKind::Int(rule) => rule,
            other => wrong_kind(op, RuleType::Int, other.rule_type()),
        }
    }

    fn float_mut(&mut self, op: &str) -> &mut FloatRule {
        match &mut self.kind {
            RuleKind::Float(rule) => rule,
            other => wrong_kind(op, RuleType::Float, other.rule_type()),
        }
    }

    fn array_mut(&mut self, op: &str) -> &mut ArrayRule {
        match &mut self.kind {
            RuleKind::Array(rule) => rule,
            other => wrong_kind(op, RuleType::Array, other.rule_type()),
        }
    }

    pub(crate) fn table_mut(&mut self, op: &str) -> &mut TableRule {
        match &mut self.kind {
            RuleKind::Table(rule) => rule,
            other => wrong_kind(op, RuleType::Table, other.rule_type()),
        }
    }
}

#[track_caller]
fn wrong_kind(op: &str, expected: RuleType, actual: RuleType) -> ! {
    panic!("`{}` applies to {} rules, not {}", op, expected, actual)
}
