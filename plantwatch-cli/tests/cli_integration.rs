//! CLI integration tests for plantwatch-cli.
//!
//! These run the actual binary and check outputs, exit codes, and files
//! written. Remote calls only ever target a closed local port.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use assert_cmd::Command;
use image::{ImageFormat, Rgb, RgbImage};
use predicates::prelude::*;
use tempfile::TempDir;

/// Nothing listens on port 1.
const UNREACHABLE_URL: &str = "https://127.0.0.1:1";

fn plantwatch() -> Command {
    let mut cmd = Command::cargo_bin("plantwatch").unwrap();
    cmd.env_remove("PLANTNET_API_KEY")
        .env_remove("PLANTNET_API_URL")
        .env_remove("OPENAI_API_KEY")
        .env_remove("OPENAI_API_URL")
        .env_remove("RUST_LOG");
    cmd
}

fn encoded(format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_pixel(8, 8, Rgb([40, 160, 60]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).unwrap();
    out.into_inner()
}

fn write_image(dir: &Path, name: &str, format: ImageFormat) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, encoded(format)).unwrap();
    path
}

// ============================================================================
// Help and Version
// ============================================================================

#[test]
fn test_help_displays_usage() {
    plantwatch()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invasive plant photo tools"))
        .stdout(predicate::str::contains("normalize"))
        .stdout(predicate::str::contains("identify"))
        .stdout(predicate::str::contains("classify"));
}

#[test]
fn test_version_displays_version() {
    plantwatch()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("plantwatch"));
}

#[test]
fn test_help_shows_exit_codes() {
    plantwatch()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exit codes:"))
        .stdout(predicate::str::contains("65"))
        .stdout(predicate::str::contains("78"));
}

#[test]
fn test_classify_help_shows_options() {
    plantwatch()
        .args(["classify", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--lat"))
        .stdout(predicate::str::contains("--lng"))
        .stdout(predicate::str::contains("--raw"));
}

#[test]
fn test_missing_subcommand_is_usage_error() {
    plantwatch().assert().failure().code(2);
}

// ============================================================================
// Normalize
// ============================================================================

#[test]
fn test_normalize_reencodes_bmp_as_jpeg() {
    let dir = TempDir::new().unwrap();
    let input = write_image(dir.path(), "leaf.bmp", ImageFormat::Bmp);

    plantwatch()
        .args(["--quiet", "normalize"])
        .arg(&input)
        .assert()
        .success();

    let output = dir.path().join("leaf.normalized.jpg");
    let bytes = fs::read(&output).expect("normalized file written");
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
    assert!(image::load_from_memory(&bytes).is_ok());
}

#[test]
fn test_normalize_passes_png_through_unchanged() {
    let dir = TempDir::new().unwrap();
    let input = write_image(dir.path(), "leaf.png", ImageFormat::Png);
    let output = dir.path().join("copy.png");

    plantwatch()
        .args(["normalize", "-o"])
        .arg(&output)
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Kept"));

    assert_eq!(fs::read(&output).unwrap(), fs::read(&input).unwrap());
}

#[test]
fn test_normalize_json_output() {
    let dir = TempDir::new().unwrap();
    let input = write_image(dir.path(), "leaf.gif", ImageFormat::Gif);

    let assert = plantwatch()
        .args(["--json", "normalize"])
        .arg(&input)
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let body: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(body["mime_type"], "image/jpeg");
    assert_eq!(body["reencoded"], true);
    assert!(body["output"]
        .as_str()
        .unwrap()
        .ends_with("leaf.normalized.jpg"));
}

#[test]
fn test_normalize_missing_file_exits_66() {
    let dir = TempDir::new().unwrap();

    plantwatch()
        .arg("normalize")
        .arg(dir.path().join("nope.jpg"))
        .assert()
        .failure()
        .code(66)
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn test_normalize_non_image_exits_65() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("notes.jpg");
    fs::write(&input, b"these are field notes, not a photo").unwrap();

    plantwatch()
        .arg("normalize")
        .arg(&input)
        .assert()
        .failure()
        .code(65)
        .stderr(predicate::str::contains("Invalid image"));

    assert!(!dir.path().join("notes.normalized.jpg").exists());
}

#[test]
fn test_normalize_unwritable_output_exits_74() {
    let dir = TempDir::new().unwrap();
    let input = write_image(dir.path(), "leaf.png", ImageFormat::Png);

    plantwatch()
        .args(["normalize", "-o"])
        .arg(dir.path().join("missing-dir").join("out.png"))
        .arg(&input)
        .assert()
        .failure()
        .code(74);
}

// ============================================================================
// Identify / Classify without credentials
// ============================================================================

#[test]
fn test_identify_without_api_key_exits_78() {
    let dir = TempDir::new().unwrap();
    let input = write_image(dir.path(), "leaf.png", ImageFormat::Png);

    plantwatch()
        .arg("identify")
        .arg(&input)
        .assert()
        .failure()
        .code(78)
        .stderr(predicate::str::contains("PLANTNET_API_KEY"));
}

#[test]
fn test_identify_rejects_non_image_before_remote_call() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("blob.bin");
    fs::write(&input, [0u8, 1, 2, 3]).unwrap();

    plantwatch()
        .arg("identify")
        .arg(&input)
        .env("PLANTNET_API_KEY", "unused")
        .assert()
        .failure()
        .code(65);
}

#[test]
fn test_classify_without_api_key_exits_78() {
    plantwatch()
        .args([
            "classify",
            "Pueraria montana",
            "--lat",
            "35.99",
            "--lng",
            "-78.89",
        ])
        .assert()
        .failure()
        .code(78)
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}

#[test]
fn test_zero_timeout_is_usage_error() {
    plantwatch()
        .args([
            "classify",
            "Pueraria montana",
            "--lat",
            "35.99",
            "--lng",
            "-78.89",
            "--timeout",
            "0",
        ])
        .assert()
        .failure()
        .code(64);
}

// ============================================================================
// Unreachable services
// ============================================================================

#[test]
fn test_identify_unreachable_service_exits_69_without_leaking_key() {
    let dir = TempDir::new().unwrap();
    let input = write_image(dir.path(), "leaf.png", ImageFormat::Png);

    plantwatch()
        .args(["--verbose", "identify", "--timeout", "2"])
        .arg(&input)
        .env("PLANTNET_API_KEY", "secret-plantnet-key")
        .env("PLANTNET_API_URL", UNREACHABLE_URL)
        .assert()
        .failure()
        .code(69)
        .stderr(predicate::str::contains("Identification service unavailable"))
        .stderr(predicate::str::contains("secret-plantnet-key").not());
}

#[test]
fn test_classify_unreachable_service_exits_69() {
    plantwatch()
        .args([
            "classify",
            "Pueraria montana",
            "--lat",
            "35.99",
            "--lng",
            "-78.89",
            "--timeout",
            "2",
        ])
        .env("OPENAI_API_KEY", "secret-openai-key")
        .env("OPENAI_API_URL", format!("{UNREACHABLE_URL}/v1/chat/completions"))
        .assert()
        .failure()
        .code(69)
        .stderr(predicate::str::contains("Classification service unavailable"))
        .stderr(predicate::str::contains("secret-openai-key").not());
}
