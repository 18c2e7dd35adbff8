//! CLI command implementations

pub mod check;
pub mod manifest;
pub mod validate;
