//! Validation command handler.

use super::ValidationOutputFormat;
use responsio_agent::{ValidationConfig, ValidationResult, validate_assistant_path};
use std::path::{Path, PathBuf};

/// Handles the validate command.
///
/// Files that cannot be read or parsed are reported as errors and the remaining
/// files are still validated. Exits with status 1 when any file has errors, or
/// 2 in strict mode when any file has warnings.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn handle_validate_command(
    path: PathBuf,
    format: ValidationOutputFormat,
    strict: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting validation");

    let config = ValidationConfig {
        warn_unused: !quiet,
        ..ValidationConfig::default()
    };

    let files = if path.is_file() {
        vec![path]
    } else if path.is_dir() {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&path)? {
            let entry_path = entry?.path();
            if entry_path.extension().and_then(|s| s.to_str()) == Some("toml") {
                files.push(entry_path);
            }
        }
        files.sort();
        files
    } else {
        return Err(format!(
            "Path '{}' is neither a file nor a directory",
            path.display()
        )
        .into());
    };

    let mut has_errors = false;
    let mut has_warnings = false;
    for file in &files {
        let result = validate_assistant_path(file, &config);
        has_errors = has_errors || !result.is_valid();
        has_warnings = has_warnings || !result.warnings.is_empty();

        match format {
            ValidationOutputFormat::Human => output_human(file, &result, quiet),
            ValidationOutputFormat::Json => output_json(file, &result),
        }
    }

    if has_errors {
        std::process::exit(1);
    }
    if strict && has_warnings {
        std::process::exit(2);
    }
    Ok(())
}

fn output_human(path: &Path, result: &ValidationResult, quiet: bool) {
    println!("\n{}", path.display());
    println!("{}", "-".repeat(80));

    if !result.errors.is_empty() {
        println!("\nErrors:");
        for (i, error) in result.errors.iter().enumerate() {
            println!("\n  {}. {}", i + 1, error.message);
            if let Some(location) = &error.location {
                println!("     in {}", location);
            }
            if let Some(suggestion) = &error.suggestion {
                println!("     Suggestion: {}", suggestion);
            }
        }
    }

    if !quiet && !result.warnings.is_empty() {
        println!("\nWarnings:");
        for (i, warning) in result.warnings.iter().enumerate() {
            println!("\n  {}. {}", i + 1, warning.message);
        }
    }

    if result.is_valid() && result.warnings.is_empty() {
        println!("\n  No issues found");
    }
}

fn output_json(path: &Path, result: &ValidationResult) {
    use serde_json::json;

    let errors: Vec<serde_json::Value> = result
        .errors
        .iter()
        .map(|e| {
            json!({
                "kind": format!("{:?}", e.kind),
                "message": e.message,
                "suggestion": e.suggestion,
                "location": e.location,
            })
        })
        .collect();
    let warnings: Vec<serde_json::Value> = result
        .warnings
        .iter()
        .map(|w| {
            json!({
                "kind": format!("{:?}", w.kind),
                "message": w.message,
                "location": w.location,
            })
        })
        .collect();

    println!(
        "{}",
        json!({
            "path": path.display().to_string(),
            "valid": result.is_valid(),
            "errors": errors,
            "warnings": warnings,
        })
    );
}
