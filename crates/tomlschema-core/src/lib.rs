//! tomlschema Core Library
//!
//! This crate provides the core functionality for tomlschema:
//! - Rule trees built programmatically or from a declarative meta-schema
//! - Recursive validation with path-tagged, exhaustive error reporting
//! - Struct binding of TOML tables onto native records
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Meta-schema │────▶│  Rule tree  │────▶│  Validator  │
//! │   (TOML)    │     │  (Schema)   │     │   Result    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!
//! ┌─────────────┐     ┌─────────────┐
//! │ Binder<T>   │────▶│  &mut T     │
//! └─────────────┘     └─────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use tomlschema_core::{Rule, Schema};
//!
//! let schema = Schema::with_root(
//!     Rule::table().property("name", Rule::string().min_length(1).required()),
//! );
//! let data = tomlschema_core::document::parse_str("name = \"demo\"")?;
//! assert!(schema.validate(&data).is_valid());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod binder;
pub mod document;
pub mod error;
pub mod loader;
pub mod rule;
pub mod schema;
pub mod validator;

pub use binder::{BindError, BindKind, BindResult, Binder};
pub use error::{Error, Result};
pub use loader::{load_schema, load_schema_from_file, load_schema_str};
pub use rule::{Rule, RuleKind, RuleType};
pub use schema::Schema;
pub use validator::{ValidationError, ValidationResult, validate};
