//! Parse-only check command

use std::path::Path;

use anyhow::{Context, Result};
use tomlschema_core::document;

/// Run the check command
pub fn run(file: &Path) -> Result<()> {
    tracing::info!("Checking syntax: {}", file.display());

    document::parse_file(file)
        .with_context(|| format!("{} is not valid TOML", file.display()))?;

    println!("OK");
    Ok(())
}
