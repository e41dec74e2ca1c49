//! Normalize command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::json;
use tracing::info;

use super::Output;
use crate::utils::{build_normalized_path, read_image};

/// Execute the normalize command.
pub fn execute(file: PathBuf, output_path: Option<PathBuf>, out: Output) -> Result<()> {
    let bytes = read_image(&file)?;
    let input_bytes = bytes.len();

    let normalized = plantwatch_core::normalize(bytes)
        .with_context(|| format!("Cannot normalize {}", file.display()))?;

    let output_path =
        output_path.unwrap_or_else(|| build_normalized_path(&file, normalized.extension()));

    std::fs::write(&output_path, normalized.bytes())
        .with_context(|| format!("Failed to write output: {}", output_path.display()))?;

    info!(
        input = %file.display(),
        output = %output_path.display(),
        format = ?normalized.format(),
        reencoded = normalized.was_reencoded(),
        "Image normalized"
    );

    if out.json {
        return out.json(&json!({
            "input": file.display().to_string(),
            "output": output_path.display().to_string(),
            "mime_type": normalized.mime_type(),
            "reencoded": normalized.was_reencoded(),
            "input_bytes": input_bytes,
            "output_bytes": normalized.bytes().len(),
        }));
    }

    if out.human() {
        let action = if normalized.was_reencoded() {
            "Re-encoded".yellow()
        } else {
            "Kept".green()
        };
        println!(
            "{} {} -> {} ({}, {} bytes)",
            action,
            file.display(),
            output_path.display().to_string().bold(),
            normalized.mime_type(),
            normalized.bytes().len()
        );
    }

    Ok(())
}
