use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

fn cardex() -> Command {
    Command::cargo_bin("cardex").unwrap()
}

/// Config with no API key and no OCR models, archiving inside `dir`.
fn offline_config(dir: &Path) -> PathBuf {
    let path = dir.join("config.json");
    let config = json!({
        "vision": {"api_key_env": "CARDEX_TEST_NO_SUCH_KEY"},
        "ocr": {"model_dir": dir.join("no-models")},
        "archive": {"path": dir.join("archive.jsonl")}
    });
    fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
    path
}

fn write_png(path: &Path) {
    image::DynamicImage::new_rgb8(32, 16).save(path).unwrap();
}

#[test]
fn test_help_lists_commands() {
    cardex()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("batch"))
        .stdout(predicate::str::contains("archive"));
}

#[test]
fn test_config_init_refuses_overwrite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cfg").join("config.json");

    cardex()
        .args(["config", "init", "--output"])
        .arg(&path)
        .assert()
        .success();
    assert!(path.exists());

    cardex()
        .args(["config", "init", "--output"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    cardex()
        .args(["config", "init", "--force", "--output"])
        .arg(&path)
        .assert()
        .success();
}

#[test]
fn test_config_set_then_get() {
    let dir = TempDir::new().unwrap();
    let config = offline_config(dir.path());

    cardex()
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "heuristics.company_max_len", "30"])
        .assert()
        .success();

    cardex()
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "heuristics.company_max_len"])
        .assert()
        .success()
        .stdout(predicate::str::diff("30\n"));

    cardex()
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "heuristics.nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_config_set_rejects_blank_default() {
    let dir = TempDir::new().unwrap();
    let config = offline_config(dir.path());

    cardex()
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "defaults.name", " "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must not be empty"));
}

#[test]
fn test_archive_list_empty() {
    let dir = TempDir::new().unwrap();
    let config = offline_config(dir.path());

    cardex()
        .arg("--config")
        .arg(&config)
        .args(["archive", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No archived cards"));

    cardex()
        .arg("--config")
        .arg(&config)
        .args(["archive", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("archive.jsonl"));
}

#[test]
fn test_extract_missing_input() {
    let dir = TempDir::new().unwrap();
    let config = offline_config(dir.path());

    cardex()
        .arg("--config")
        .arg(&config)
        .args(["extract", "does-not-exist.jpg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_extract_without_vision_or_models_fails_in_ocr() {
    let dir = TempDir::new().unwrap();
    let config = offline_config(dir.path());
    let card = dir.path().join("card.png");
    write_png(&card);

    cardex()
        .arg("--config")
        .arg(&config)
        .arg("extract")
        .arg(&card)
        .arg("--archive")
        .assert()
        .failure()
        .stderr(predicate::str::contains("OCR error"));

    assert!(!dir.path().join("archive.jsonl").exists());
}

#[test]
fn test_batch_no_matches() {
    let dir = TempDir::new().unwrap();
    let config = offline_config(dir.path());
    let pattern = dir.path().join("*.jpg");

    cardex()
        .arg("--config")
        .arg(&config)
        .arg("batch")
        .arg(pattern.to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn test_batch_continue_on_error_writes_summary() {
    let dir = TempDir::new().unwrap();
    let config = offline_config(dir.path());
    write_png(&dir.path().join("a.png"));
    write_png(&dir.path().join("b.png"));
    let out = dir.path().join("out");

    cardex()
        .arg("--config")
        .arg(&config)
        .arg("batch")
        .arg(dir.path().join("*.png").to_str().unwrap())
        .arg("--output-dir")
        .arg(&out)
        .args(["--continue-on-error", "--summary", "-j", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 successful"))
        .stdout(predicate::str::contains("2 failed"));

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.starts_with("filename,status,source"));
    assert!(summary.contains("a.png,error"));
    assert!(summary.contains("b.png,error"));
}
