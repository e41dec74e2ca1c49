//! Subcommand implementations.

pub mod classify;
pub mod identify;
pub mod normalize;

/// Output options shared by every subcommand.
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    /// Print machine-readable JSON on stdout instead of the formatted summary.
    pub json: bool,
    /// Suppress the formatted summary.
    pub quiet: bool,
}

impl Output {
    pub fn json(&self, value: &serde_json::Value) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    pub fn human(&self) -> bool {
        !self.json && !self.quiet
    }
}
