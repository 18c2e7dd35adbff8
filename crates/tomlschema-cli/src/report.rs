//! Validation report rendering

use std::path::Path;

use anyhow::{Result, bail};
use clap::ValueEnum;
use tomlschema_core::ValidationResult;

/// How a validation report is written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines
    Text,
    /// `{"valid": ..., "errors": [...]}`
    Json,
}

/// Print a validation report for `file`
pub fn print(file: &Path, result: &ValidationResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", render_text(file, result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
    }
    Ok(())
}

/// Turn an invalid result into a command failure
pub fn ensure_valid(result: &ValidationResult) -> Result<()> {
    if !result.is_valid() {
        bail!(
            "Validation failed with {} error(s)",
            result.errors().len()
        );
    }
    tracing::info!("✓ All validation checks passed");
    Ok(())
}

fn render_text(file: &Path, result: &ValidationResult) -> String {
    let mut out = format!("Validation report for: {}\n", file.display());
    if result.is_valid() {
        out.push_str("Status: PASS\n");
        return out;
    }

    out.push_str("Status: FAIL\n");
    out.push_str(&format!("Errors found: {}\n", result.errors().len()));
    for error in result.errors() {
        out.push_str(&format!("  {}\n", error));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tomlschema_core::document::parse_str;
    use tomlschema_core::{Rule, Schema};

    fn result_for(text: &str) -> ValidationResult {
        let schema = Schema::with_root(
            Rule::table()
                .property("name", Rule::string().required())
                .property("port", Rule::int().max_int(10)),
        );
        schema.validate(&parse_str(text).unwrap())
    }

    #[test]
    fn test_render_pass() {
        let text = render_text(Path::new("app.toml"), &result_for("name = \"x\""));
        assert_eq!(text, "Validation report for: app.toml\nStatus: PASS\n");
    }

    #[test]
    fn test_render_fail_lists_errors() {
        let text = render_text(Path::new("app.toml"), &result_for("port = 11"));
        assert_eq!(
            text,
            "Validation report for: app.toml\n\
             Status: FAIL\n\
             Errors found: 2\n  \
             [port] value 11 exceeds maximum 10\n  \
             [name] required property \"name\" is missing\n"
        );
    }

    #[test]
    fn test_ensure_valid() {
        assert!(ensure_valid(&result_for("name = \"x\"")).is_ok());
        let err = ensure_valid(&result_for("")).unwrap_err();
        assert_eq!(err.to_string(), "Validation failed with 1 error(s)");
    }
}
