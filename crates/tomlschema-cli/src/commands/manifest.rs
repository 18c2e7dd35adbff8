//! Validate a package manifest against the built-in schema

use std::path::Path;

use anyhow::{Context, Result};
use tomlschema_core::document;

use crate::manifest_schema;
use crate::report::{self, OutputFormat};

/// Run the manifest command
pub fn run(file: &Path, format: OutputFormat) -> Result<()> {
    tracing::info!("Validating manifest: {}", file.display());

    let data = document::parse_file(file)
        .with_context(|| format!("Failed to parse {}", file.display()))?;

    let result = manifest_schema::build().validate(&data);
    report::print(file, &result, format)?;
    report::ensure_valid(&result)
}
