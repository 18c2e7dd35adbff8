//! Validate a file against a declarative schema

use std::path::Path;

use anyhow::{Context, Result};
use tomlschema_core::{document, load_schema_from_file};

use crate::report::{self, OutputFormat};

/// Run the validate command
pub fn run(file: &Path, schema_path: &Path, format: OutputFormat) -> Result<()> {
    tracing::info!(
        "Validating {} against {}",
        file.display(),
        schema_path.display()
    );

    let schema = load_schema_from_file(schema_path)
        .with_context(|| format!("Failed to load schema {}", schema_path.display()))?;

    let data = document::parse_file(file)
        .with_context(|| format!("Failed to parse {}", file.display()))?;

    let result = schema.validate(&data);
    report::print(file, &result, format)?;
    report::ensure_valid(&result)
}
