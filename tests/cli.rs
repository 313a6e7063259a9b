use assert_cmd::prelude::*;
use mockito::Matcher;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{TempDir, tempdir};

/// Config with near-instant retries so failure paths stay fast
fn write_config(dir: &Path) -> PathBuf {
    let path = dir.join("config.yaml");
    fs::write(&path, "retry:\n  max_retries: 2\n  initial_delay_ms: 1\n")
        .expect("failed to write config");
    path
}

/// Command isolated from the user's environment: own home, cache dir and config
fn hkconnect(temp: &TempDir, config: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("hkconnect"));
    cmd.arg("--config")
        .arg(config)
        .env("HOME", temp.path())
        .env("XDG_CACHE_HOME", temp.path().join("cache"))
        .env("NO_COLOR", "1")
        .env_remove("HKCONNECT_CONFIG")
        .env_remove("HKCONNECT_GATEWAY_URL")
        .env_remove("HKCONNECT_LANG")
        .env_remove("HKCONNECT_FORMAT")
        .env_remove("HKCONNECT_NO_CACHE")
        .env_remove("HKCONNECT_NO_PERSIST")
        .env_remove("HKCONNECT_DEBUG")
        .env_remove("RUST_LOG");
    cmd
}

const VERSE_BODY: &str = r#"{
    "chapter": 2,
    "verse": 47,
    "sanskrit": "karmaṇy evādhikāras te mā phaleṣu kadācana",
    "transliteration": "karmany evadhikaras te ma phalesu kadacana",
    "translation": "You have a right to perform your prescribed duty, but you are not entitled to the fruits of action.",
    "purport": "Act without attachment to results."
}"#;

#[test]
fn version_prints_package_version() {
    Command::new(assert_cmd::cargo::cargo_bin!("hkconnect"))
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn help_lists_content_commands() {
    Command::new(assert_cmd::cargo::cargo_bin!("hkconnect"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("verse"))
        .stdout(predicate::str::contains("leelas"))
        .stdout(predicate::str::contains("cache"));
}

#[test]
fn verse_rejects_out_of_range_chapter() {
    let temp = tempdir().unwrap();
    let config = write_config(temp.path());

    hkconnect(&temp, &config)
        .args(["verse", "19", "1"])
        .assert()
        .failure();
}

#[test]
fn chapter_without_gateway_shows_placeholder() {
    let temp = tempdir().unwrap();
    let config = write_config(temp.path());

    hkconnect(&temp, &config)
        .args(["chapter", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Chapter 5"))
        .stdout(predicate::str::contains(
            "Content service not configured. Please set the gateway URL.",
        ));
}

#[test]
fn verse_without_gateway_fails_with_hint() {
    let temp = tempdir().unwrap();
    let config = write_config(temp.path());

    hkconnect(&temp, &config)
        .args(["verse", "2", "47"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--gateway-url"));
}

#[test]
fn news_without_gateway_is_empty_list() {
    let temp = tempdir().unwrap();
    let config = write_config(temp.path());

    let assert = hkconnect(&temp, &config)
        .args(["news", "--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["data"], serde_json::json!([]));
}

#[test]
fn verse_is_fetched_once_then_served_from_disk_cache() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/gita/verse")
        .match_body(Matcher::Json(serde_json::json!({
            "chapter": 2,
            "verse": 47,
            "language": "en"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(VERSE_BODY)
        .expect(1)
        .create();

    let temp = tempdir().unwrap();
    let config = write_config(temp.path());

    for _ in 0..2 {
        hkconnect(&temp, &config)
            .args(["verse", "2", "47", "--gateway-url", &server.url()])
            .assert()
            .success()
            .stdout(predicate::str::contains("You have a right to perform"));
    }

    mock.assert();
}

#[test]
fn no_cache_always_hits_gateway() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/gita/verse")
        .with_status(200)
        .with_body(VERSE_BODY)
        .expect(2)
        .create();

    let temp = tempdir().unwrap();
    let config = write_config(temp.path());

    for _ in 0..2 {
        hkconnect(&temp, &config)
            .args(["verse", "2", "47", "--no-cache", "--gateway-url", &server.url()])
            .assert()
            .success();
    }

    mock.assert();
}

#[test]
fn chapter_gateway_failure_degrades_to_placeholder() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/gita/chapter")
        .with_status(500)
        .with_body(r#"{"error": "model overloaded"}"#)
        // 1 attempt + 2 retries
        .expect(3)
        .create();

    let temp = tempdir().unwrap();
    let config = write_config(temp.path());

    let assert = hkconnect(&temp, &config)
        .args(["chapter", "5", "--format", "json", "--gateway-url", &server.url()])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(
        json["data"],
        serde_json::json!({
            "title": "Chapter 5",
            "summary": "Unable to load summary at this time."
        })
    );
    mock.assert();
}

#[test]
fn failed_fetch_is_not_cached() {
    let mut server = mockito::Server::new();
    let failing = server
        .mock("POST", "/api/gita/verse")
        .with_status(503)
        .expect(3)
        .create();

    let temp = tempdir().unwrap();
    let config = write_config(temp.path());

    hkconnect(&temp, &config)
        .args(["verse", "2", "47", "--gateway-url", &server.url()])
        .assert()
        .failure();
    failing.assert();
    failing.remove();

    let ok = server
        .mock("POST", "/api/gita/verse")
        .with_status(200)
        .with_body(VERSE_BODY)
        .expect(1)
        .create();

    hkconnect(&temp, &config)
        .args(["verse", "2", "47", "--gateway-url", &server.url()])
        .assert()
        .success();
    ok.assert();
}

#[test]
fn leelas_table_output() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/api/leelas/list")
        .with_status(200)
        .with_body(r#"{"leelas": ["Damodara Lila", "Govardhan Lila"]}"#)
        .create();

    let temp = tempdir().unwrap();
    let config = write_config(temp.path());

    hkconnect(&temp, &config)
        .args(["leelas", "--format", "table", "--gateway-url", &server.url()])
        .assert()
        .success()
        .stdout(predicate::str::contains("TITLE"))
        .stdout(predicate::str::contains("Govardhan Lila"));
}

#[test]
fn image_written_to_file() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/api/image/generate")
        .with_status(200)
        .with_body(r#"{"image": "data:image/png;base64,aGFyZSBrcmlzaG5h"}"#)
        .create();

    let temp = tempdir().unwrap();
    let config = write_config(temp.path());
    let out = temp.path().join("art.png");

    hkconnect(&temp, &config)
        .args(["image", "Lotus feet", "--gateway-url", &server.url(), "--out"])
        .arg(&out)
        .assert()
        .success();

    assert_eq!(fs::read(&out).unwrap(), b"hare krishna");
}

#[test]
fn cache_clear_by_operation() {
    let mut server = mockito::Server::new();
    let verse = server
        .mock("POST", "/api/gita/verse")
        .with_status(200)
        .with_body(VERSE_BODY)
        .expect(2)
        .create();

    let temp = tempdir().unwrap();
    let config = write_config(temp.path());

    hkconnect(&temp, &config)
        .args(["verse", "2", "47", "--gateway-url", &server.url()])
        .assert()
        .success();

    hkconnect(&temp, &config)
        .args(["cache", "clear", "--operation", "verse"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared 1 cache entries"));

    hkconnect(&temp, &config)
        .args(["verse", "2", "47", "--gateway-url", &server.url()])
        .assert()
        .success();

    verse.assert();
}

#[test]
fn cache_clear_rejects_unknown_operation() {
    let temp = tempdir().unwrap();
    let config = write_config(temp.path());

    hkconnect(&temp, &config)
        .args(["cache", "clear", "--operation", "horoscope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("horoscope"));
}

#[test]
fn cache_status_json() {
    let temp = tempdir().unwrap();
    let config = write_config(temp.path());

    let assert = hkconnect(&temp, &config)
        .args(["cache", "status", "--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["entries"], 0);
}

#[test]
fn config_init_then_show() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("nested").join("config.yaml");

    hkconnect(&temp, &config)
        .args(["config", "init", "--gateway-url", "http://localhost:3000"])
        .assert()
        .success();
    assert!(config.exists());

    hkconnect(&temp, &config)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    hkconnect(&temp, &config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:3000"));
}

#[test]
fn missing_explicit_config_is_an_error() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("absent.yaml");

    hkconnect(&temp, &config)
        .args(["chapter", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found"));
}
