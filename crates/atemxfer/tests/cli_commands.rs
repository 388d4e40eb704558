#![cfg(feature = "cli")]

use std::path::PathBuf;
use std::process::{Command, Output};

fn atemxfer(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_atemxfer"))
        .arg("--log-level")
        .arg("error")
        .args(args)
        .output()
        .expect("atemxfer should run")
}

fn json_lines(output: &Output) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("stdout line should be json"))
        .collect()
}

fn temp_file(tag: &str, data: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "atemxfer-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::write(&path, data).expect("temp file should be writable");
    path
}

#[test]
fn decode_finish_outputs_json() {
    let output = atemxfer(&["--format", "json", "decode", "FTDC", "00 07 00 00"]);
    assert!(output.status.success());

    let lines = json_lines(&output);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["title"], "FTDC");
    assert_eq!(lines[0]["name"], "FinishDataTransfer");
    assert_eq!(lines[0]["transfer_id"], 7);
    assert_eq!(lines[0]["size"], 4);
}

#[test]
fn decode_rejects_malformed_title_with_usage() {
    let output = atemxfer(&["--format", "json", "decode", "FT", "00070000"]);
    assert_eq!(output.status.code(), Some(64));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid title"));
}

#[test]
fn decode_truncated_payload_is_data_invalid() {
    let output = atemxfer(&["--format", "json", "decode", "FTDC", "0007"]);
    assert_eq!(output.status.code(), Some(60));
    assert!(output.stdout.is_empty());
}

#[test]
fn decode_unknown_title_is_data_invalid() {
    let output = atemxfer(&["--format", "json", "decode", "PrgI", "00000001"]);
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn decode_strict_magic_rejects_non_standard_request() {
    let payload = "0001 1a000000 0100 0002 8c00";
    let lenient = atemxfer(&["--format", "json", "decode", "FTCD", payload]);
    assert!(lenient.status.success());

    let strict = atemxfer(&["--format", "json", "decode", "FTCD", payload, "--strict-magic"]);
    assert_eq!(strict.status.code(), Some(60));
}

#[test]
fn catalog_lists_every_title() {
    let output = atemxfer(&["--format", "json", "catalog"]);
    assert!(output.status.success());

    let lines = json_lines(&output);
    assert_eq!(lines.len(), 1);
    let entries = lines[0].as_array().expect("catalog should be a json array");
    assert_eq!(entries.len(), 9);
    let titles: Vec<&str> = entries
        .iter()
        .map(|e| e["title"].as_str().unwrap_or_default())
        .collect();
    for title in [
        "LOCK", "PLCK", "LKST", "LKOB", "FTSD", "FTCD", "FTFD", "FTDa", "FTDC",
    ] {
        assert!(titles.contains(&title), "missing {title}");
    }
    let data = entries.iter().find(|e| e["title"] == "FTDa").unwrap();
    assert_eq!(data["variable"], true);
    assert_eq!(data["size"], 4);
}

#[test]
fn unframe_decodes_and_skips_foreign_titles() {
    // FTDC for transfer 7, then a program-input command outside the family.
    let packet = "000c0000 46544443 00070000 000c0000 50726749 00000001";
    let output = atemxfer(&["--format", "json", "unframe", packet]);
    assert!(output.status.success());

    let lines = json_lines(&output);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["title"], "FTDC");
    assert_eq!(lines[0]["transfer_id"], 7);

    let strict = atemxfer(&["--format", "json", "unframe", packet, "--strict"]);
    assert_eq!(strict.status.code(), Some(60));
}

#[test]
fn unframe_partial_command_is_data_invalid() {
    let output = atemxfer(&["--format", "json", "unframe", "000c0000 46544443 0007"]);
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn chunk_emits_start_description_and_batch() {
    let file = temp_file("chunk", &[1, 2, 3, 4, 5]);
    let path = file.to_string_lossy().to_string();
    let output = atemxfer(&[
        "--format",
        "json",
        "chunk",
        &path,
        "--transfer-id",
        "9",
        "--chunk-size",
        "2",
        "--chunk-count",
        "10",
        "--name",
        "clip",
    ]);
    let _ = std::fs::remove_file(&file);
    assert!(output.status.success());

    let lines = json_lines(&output);
    let titles: Vec<&str> = lines
        .iter()
        .map(|l| l["title"].as_str().unwrap_or_default())
        .collect();
    assert_eq!(titles, vec!["FTSD", "FTFD", "FTDa", "FTDa", "FTDa"]);
    assert!(lines.iter().all(|l| l["transfer_id"] == 9));
}

#[test]
fn chunk_raw_output_is_framed() {
    let file = temp_file("raw", &[0xaa; 3]);
    let path = file.to_string_lossy().to_string();
    let output = atemxfer(&["--format", "raw", "chunk", &path, "--transfer-id", "1"]);
    let _ = std::fs::remove_file(&file);
    assert!(output.status.success());

    let raw = output.stdout;
    // FTSD: 8-byte header plus 16-byte payload.
    assert_eq!(&raw[0..2], &[0x00, 0x18]);
    assert_eq!(&raw[4..8], b"FTSD");
    // FTDa: header, id, size, three body bytes.
    assert_eq!(&raw[24..26], &[0x00, 0x0f]);
    assert_eq!(&raw[28..32], b"FTDa");
    assert_eq!(&raw[36..39], &[0xaa; 3]);
    assert_eq!(raw.len(), 39);
}

#[test]
fn chunk_missing_file_fails() {
    let output = atemxfer(&["--format", "json", "chunk", "/nonexistent/atemxfer-input"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed reading"));
}

#[test]
fn version_prints_package_version() {
    let output = atemxfer(&["version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));

    let extended = atemxfer(&["version", "--extended"]);
    let stdout = String::from_utf8_lossy(&extended.stdout);
    assert!(stdout.contains("titles: 9"));
}
