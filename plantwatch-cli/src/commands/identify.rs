//! Identify command implementation.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use plantwatch_core::{PlantNetConfig, PlantNetIdentifier, PlantwatchError, RejectionCause};
use serde_json::json;
use tracing::{debug, info};

use super::Output;
use crate::utils::{read_image, require_env};

/// Execute the identify command.
pub async fn execute(file: PathBuf, timeout: Duration, out: Output) -> Result<()> {
    let bytes = read_image(&file)?;
    let image = plantwatch_core::normalize(bytes)
        .with_context(|| format!("Cannot identify {}", file.display()))?;

    let identifier = PlantNetIdentifier::with_config(PlantNetConfig {
        api_key: require_env("PLANTNET_API_KEY")?,
        timeout,
        ..Default::default()
    })?;

    debug!(mime_type = image.mime_type(), bytes = image.bytes().len(), "Sending image");

    let species = match identifier.best_match(&image).await {
        Ok(Some(species)) => species,
        Ok(None) => {
            return Err(PlantwatchError::NotAPlant(RejectionCause::NoMatch(
                "no species recognized in the image".into(),
            ))
            .into());
        }
        Err(reason) => bail!("Identification service unavailable: {reason}"),
    };

    info!(species = %species, "Species identified");

    if out.json {
        return out.json(&json!({
            "file": file.display().to_string(),
            "species": species,
        }));
    }

    if out.human() {
        println!("{} {}", "Species:".dimmed(), species.green().bold());
    } else {
        println!("{species}");
    }

    Ok(())
}
