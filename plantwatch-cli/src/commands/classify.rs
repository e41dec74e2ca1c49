//! Classify command implementation.

use std::time::Duration;

use anyhow::{anyhow, Result};
use colored::Colorize;
use plantwatch_core::{
    build_prompt, parse_reply, ClassificationOutcome, OpenAiClassifier, OpenAiConfig,
    PlantwatchError, RejectionCause,
};
use serde_json::json;
use tracing::info;

use super::Output;
use crate::utils::require_env;

/// Execute the classify command.
///
/// With `raw`, the model reply is printed verbatim before the parsed verdict.
pub async fn execute(
    species: String,
    lat: String,
    lng: String,
    timeout: Duration,
    raw: bool,
    out: Output,
) -> Result<()> {
    let classifier = OpenAiClassifier::with_config(OpenAiConfig {
        api_key: require_env("OPENAI_API_KEY")?,
        timeout,
        ..Default::default()
    })?;

    let reply = classifier
        .complete(&build_prompt(&species, &lat, &lng))
        .await
        .map_err(|e| anyhow!("Classification service unavailable: {e}"))?;
    let outcome = parse_reply(&reply);

    if raw {
        if out.json {
            return out.json(&json!({
                "species": species,
                "reply": reply,
                "parsed": describe(&outcome),
            }));
        }
        println!("{reply}");
        if out.human() {
            println!();
        }
    }

    let result = match outcome {
        ClassificationOutcome::Classified(result) => result,
        ClassificationOutcome::Invalid(reason) => {
            return Err(
                PlantwatchError::NotAPlant(RejectionCause::UnparseableClassification(reason))
                    .into(),
            );
        }
    };

    info!(species = %species, is_invasive = result.is_invasive, "Species classified");

    if out.json {
        return out.json(&json!({
            "species": species,
            "lat": lat,
            "lng": lng,
            "is_invasive": result.is_invasive,
            "detail": result.detail,
        }));
    }

    if !out.human() {
        println!("{}", result.is_invasive);
        return Ok(());
    }

    if result.is_invasive {
        println!(
            "{} {} is {} at {}, {}",
            "!".red().bold(),
            species.bold(),
            "invasive".red().bold(),
            lat,
            lng
        );
        if !result.detail.is_empty() {
            println!("   {}", result.detail.dimmed());
        }
    } else {
        println!(
            "{} {} is {} at {}, {}",
            "✓".green().bold(),
            species.bold(),
            "not invasive".green(),
            lat,
            lng
        );
    }

    Ok(())
}

fn describe(outcome: &ClassificationOutcome) -> serde_json::Value {
    match outcome {
        ClassificationOutcome::Classified(result) => json!({
            "is_invasive": result.is_invasive,
            "detail": result.detail,
        }),
        ClassificationOutcome::Invalid(reason) => json!({ "invalid": reason }),
    }
}
