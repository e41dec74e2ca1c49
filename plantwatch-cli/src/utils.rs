//! Helpers shared across CLI commands.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::debug;

/// Default output path for a normalized image.
///
/// `photo.bmp` becomes `photo.normalized.jpg` next to the input.
pub fn build_normalized_path(file: &Path, extension: &str) -> PathBuf {
    let stem = file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    file.with_file_name(format!("{stem}.normalized.{extension}"))
}

/// Read an input image, tagging failures so they map to EX_NOINPUT.
pub fn read_image(path: &Path) -> Result<Vec<u8>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    debug!(path = %path.display(), bytes = bytes.len(), "Read file");
    Ok(bytes)
}

/// Fetch a required API key from the environment.
pub fn require_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => bail!("{name} is not set"),
    }
}

/// Convert a `--timeout` argument, rejecting zero.
pub fn timeout_from_secs(secs: u64) -> Result<Duration> {
    if secs == 0 {
        bail!("--timeout must be at least 1 second");
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_normalized_path() {
        assert_eq!(
            build_normalized_path(Path::new("leaf.bmp"), "jpg"),
            PathBuf::from("leaf.normalized.jpg")
        );
        assert_eq!(
            build_normalized_path(Path::new("shots/leaf.png"), "png"),
            PathBuf::from("shots/leaf.normalized.png")
        );
        assert_eq!(
            build_normalized_path(Path::new("noext"), "jpg"),
            PathBuf::from("noext.normalized.jpg")
        );
    }

    #[test]
    fn test_timeout_from_secs() {
        assert_eq!(timeout_from_secs(10).unwrap(), Duration::from_secs(10));
        assert!(timeout_from_secs(0).is_err());
    }

    #[test]
    fn test_require_env_missing() {
        let err = require_env("PLANTWATCH_TEST_SURELY_UNSET_KEY").unwrap_err();
        assert!(err.to_string().contains("not set"));
    }
}
