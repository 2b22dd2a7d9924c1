//! CLI end-to-end tests
//!
//! Tests for the tubeforge command-line interface.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the tubeforge binary
#[allow(deprecated)]
fn tubeforge_cmd() -> Command {
    let mut cmd = Command::cargo_bin("tubeforge").unwrap();
    // Keep stray config files in the working directory out of the way.
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/payloads")
        .join(name)
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = tubeforge_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = tubeforge_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("tubeforge"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = tubeforge_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(concat!("tubeforge ", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn test_cli_resolve_help() {
    let mut cmd = tubeforge_cmd();
    cmd.args(["resolve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolve a video"));
}

#[test]
fn test_cli_resolve_info_only() {
    let mut cmd = tubeforge_cmd();
    cmd.args(["resolve", "--id", "fixture01"])
        .arg("--info")
        .arg(fixture("info.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Title: Fixture Video"))
        .stdout(predicate::str::contains("Duration: 00:02:05"))
        .stdout(predicate::str::contains("Usable Streams: 1"))
        .stdout(predicate::str::contains("Cipher-Pending Streams: 1"))
        .stdout(predicate::str::contains("signature param: sig"))
        .stdout(predicate::str::contains("120x90 https://i.example/vi/default.jpg"))
        .stdout(predicate::str::contains("  https://i.example/vi/maxres.jpg"));
}

#[test]
fn test_cli_resolve_all_sources() {
    let mut cmd = tubeforge_cmd();
    cmd.args(["resolve", "--id", "fixture01"])
        .arg("--info")
        .arg(fixture("info.txt"))
        .arg("--manifest")
        .arg(fixture("manifest.m3u8"))
        .arg("--streaming-data")
        .arg(fixture("streaming_data.txt"))
        .args(["--dash-url", "160=https://d.example/160"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Usable Streams: 4"))
        .stdout(predicate::str::contains("Cipher-Pending Streams: 2"))
        .stdout(predicate::str::contains("[95] application/x-mpegURL 720p 1280x720"))
        .stdout(predicate::str::contains("[91]").not())
        .stdout(predicate::str::contains("Expires: 2023-11-14T19:26:40"));
}

#[test]
fn test_cli_resolve_json() {
    let output = tubeforge_cmd()
        .args(["resolve", "--id", "fixture01", "--json"])
        .arg("--info")
        .arg(fixture("info.txt"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["id"], "fixture01");
    assert_eq!(json["metadata"]["author"], "Fixture Channel");
    assert_eq!(json["streams"]["22"]["cipher"]["signature"], "ENCRYPTED");
    assert_eq!(json["thumbnails"].as_array().unwrap().len(), 3);
}

#[test]
fn test_cli_resolve_unavailable_video() {
    let mut cmd = tubeforge_cmd();
    cmd.args(["resolve", "--id", "gone"])
        .arg("--info")
        .arg(fixture("unavailable.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("error code 151"))
        .stderr(predicate::str::contains("This video is unavailable"));
}

#[test]
fn test_cli_resolve_blank_id() {
    let mut cmd = tubeforge_cmd();
    cmd.args(["resolve", "--id", " "])
        .arg("--info")
        .arg(fixture("info.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid video identifier"));
}

#[test]
fn test_cli_resolve_missing_info_file() {
    let mut cmd = tubeforge_cmd();
    cmd.args(["resolve", "--id", "x", "--info", "/nonexistent/info.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read payload file"));
}

#[test]
fn test_cli_resolve_malformed_manifest() {
    let temp = tempdir().unwrap();
    let manifest = temp.path().join("bad.m3u8");
    fs::write(&manifest, "<html>blocked</html>").unwrap();

    let mut cmd = tubeforge_cmd();
    cmd.args(["resolve", "--id", "fixture01"])
        .arg("--info")
        .arg(fixture("info.txt"))
        .arg("--manifest")
        .arg(&manifest)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed manifest payload"));
}

#[test]
fn test_cli_resolve_with_config() {
    let temp = tempdir().unwrap();
    let config_file = temp.path().join("config.toml");
    fs::write(
        &config_file,
        r#"
[output]
show_thumbnails = false
preferred_itags = [137, 18]
"#,
    )
    .unwrap();

    let mut cmd = tubeforge_cmd();
    cmd.arg("--config")
        .arg(&config_file)
        .args(["resolve", "--id", "fixture01"])
        .arg("--info")
        .arg(fixture("info.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Preferred: itag 18"))
        .stdout(predicate::str::contains("Thumbnails").not());
}

#[test]
fn test_cli_resolve_with_renamed_keys() {
    let temp = tempdir().unwrap();
    let config_file = temp.path().join("config.toml");
    fs::write(&config_file, "[decode]\nstream_map_keys = [\"fmt_v2\"]\n").unwrap();
    let info = temp.path().join("info.txt");
    fs::write(&info, "title=Renamed&fmt_v2=itag%3D43%26url%3Dhttps%253A%252F%252Fr.example%252F43\n").unwrap();

    let mut cmd = tubeforge_cmd();
    cmd.arg("--config")
        .arg(&config_file)
        .args(["resolve", "--id", "renamed"])
        .arg("--info")
        .arg(&info)
        .assert()
        .success()
        .stdout(predicate::str::contains("[43]"));
}

#[test]
fn test_cli_decode_query() {
    let temp = tempdir().unwrap();
    let payload = temp.path().join("payload.txt");
    fs::write(&payload, "title=Test+Video&b=%2F&a=1\n").unwrap();

    let mut cmd = tubeforge_cmd();
    cmd.arg("decode-query")
        .arg(&payload)
        .assert()
        .success()
        .stdout(predicate::str::contains("a = 1\nb = /\ntitle = Test Video"));
}

#[test]
fn test_cli_decode_query_nonexistent_file() {
    let mut cmd = tubeforge_cmd();
    cmd.args(["decode-query", "/nonexistent/payload.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_cli_validate_config() {
    let temp = tempdir().unwrap();
    let config_file = temp.path().join("config.toml");
    fs::write(&config_file, "[decode]\nthumbnail_key = \"thumbs\"\n").unwrap();

    let mut cmd = tubeforge_cmd();
    cmd.arg("validate-config")
        .arg(&config_file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("Thumbnail key: thumbs"));
}

#[test]
fn test_cli_validate_invalid_config() {
    let temp = tempdir().unwrap();
    let config_file = temp.path().join("config.toml");
    fs::write(&config_file, "[decode]\ndefault_signature_param = \" \"\n").unwrap();

    let mut cmd = tubeforge_cmd();
    cmd.arg("validate-config")
        .arg(&config_file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("default_signature_param"));
}

#[test]
fn test_cli_validate_config_defaults() {
    let mut cmd = tubeforge_cmd();
    cmd.arg("validate-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("using defaults"))
        .stdout(predicate::str::contains("url_encoded_fmt_stream_map, adaptive_fmts"));
}
