//! Integration tests for the `apotheca` CLI binary.
//!
//! Argument parsing, help output, completions, and end-to-end runs against
//! an unreachable service (local fallback) or a wiremock service. No test
//! touches the user's real configuration or mirror.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Nothing listens on port 1, so every request fails fast.
const UNREACHABLE: &str = "http://127.0.0.1:1/api/medicines";

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `apotheca` binary with env isolation.
///
/// Clears all `APOTHECA_*` env vars and points config directories into
/// `home` so tests never touch real configuration.
fn apotheca_cmd(home: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("apotheca");
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("APOTHECA_PROFILE")
        .env_remove("APOTHECA_API_URL")
        .env_remove("APOTHECA_DATA_DIR")
        .env_remove("APOTHECA_TIMEOUT")
        .env_remove("APOTHECA_OUTPUT")
        .env_remove("APOTHECA_DEFAULT_PROFILE");
    cmd
}

/// A command wired to an unreachable service and a private mirror directory.
fn offline_cmd(home: &TempDir) -> assert_cmd::Command {
    let mut cmd = apotheca_cmd(home);
    cmd.args(["--api-url", UNREACHABLE, "--timeout", "2", "--data-dir"])
        .arg(home.path().join("mirror"));
    cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = apotheca_cmd(&home).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    apotheca_cmd(&home).arg("--help").assert().success().stdout(
        predicate::str::contains("medicines")
            .and(predicate::str::contains("diseases"))
            .and(predicate::str::contains("mirror")),
    );
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    apotheca_cmd(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("apotheca"));
}

#[test]
fn test_completions_bash() {
    let home = TempDir::new().unwrap();
    apotheca_cmd(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_unknown_profile_is_a_usage_error() {
    let home = TempDir::new().unwrap();
    apotheca_cmd(&home)
        .args(["--profile", "ghost", "medicines", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("ghost"));
}

#[test]
fn test_config_path_points_into_home() {
    let home = TempDir::new().unwrap();
    apotheca_cmd(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ── Offline fallback ────────────────────────────────────────────────

#[test]
fn test_offline_list_falls_back_to_sample_inventory() {
    let home = TempDir::new().unwrap();
    let output = offline_cmd(&home)
        .args(["-o", "json", "medicines", "list"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Failed to load medicines. Using local data."),
        "stderr:\n{stderr}"
    );

    let list = stdout_json(&output);
    let names: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    // Soonest expiry first.
    assert_eq!(names, vec!["Triphala Guggulu", "Paracetamol", "Ashwagandha Churna"]);

    let mirrored = home.path().join("mirror").join("ayur_library_medicines.json");
    assert!(mirrored.exists(), "fallback inventory should be mirrored");
}

#[test]
fn test_offline_stats_counts_sample_inventory() {
    let home = TempDir::new().unwrap();
    let output = offline_cmd(&home)
        .args(["-o", "json", "stats"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stats = stdout_json(&output);
    assert_eq!(stats["total"], 3);
    assert_eq!(stats["source"], "Degraded");
    assert_eq!(
        stats["expired"].as_u64().unwrap()
            + stats["expiring_soon"].as_u64().unwrap()
            + stats["stable"].as_u64().unwrap(),
        3
    );
}

#[test]
fn test_offline_add_is_kept_locally() {
    let home = TempDir::new().unwrap();
    let output = offline_cmd(&home)
        .args([
            "-o",
            "json",
            "medicines",
            "add",
            "Chyawanprash",
            "--quantity",
            "4",
            "--expiry",
            "2031-03-01",
            "--ingredients",
            "Amla, Ghee",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to add medicine"), "stderr:\n{stderr}");

    let added = stdout_json(&output);
    assert_eq!(added["name"], "Chyawanprash");
    assert_eq!(added["category"], "Ayurvedic");
    assert_eq!(added["ingredients"], json!(["Amla", "Ghee"]));

    // The next run reads it back from the mirror.
    offline_cmd(&home)
        .args(["-o", "plain", "medicines", "list", "--search", "chyawan"])
        .assert()
        .success()
        .stdout(predicate::str::contains(added["id"].as_str().unwrap()));
}

#[test]
fn test_get_unknown_medicine_exits_not_found() {
    let home = TempDir::new().unwrap();
    offline_cmd(&home)
        .args(["medicines", "get", "does-not-exist"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_remote_query_has_no_fallback() {
    let home = TempDir::new().unwrap();
    offline_cmd(&home)
        .args(["medicines", "query", "expired"])
        .assert()
        .code(7);
}

#[test]
fn test_update_without_fields_is_rejected() {
    let home = TempDir::new().unwrap();
    offline_cmd(&home)
        .args(["medicines", "update", "1"])
        .assert()
        .code(2);
}

#[test]
fn test_diseases_round_trip_through_the_mirror() {
    let home = TempDir::new().unwrap();
    let output = offline_cmd(&home)
        .args([
            "-o",
            "json",
            "diseases",
            "add",
            "Migraine",
            "--severity",
            "chronic",
            "--symptoms",
            "Headache, Nausea",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let id = stdout_json(&output)["id"].as_str().unwrap().to_owned();

    offline_cmd(&home)
        .args(["-o", "json", "stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"chronic_diseases\": 1"));

    offline_cmd(&home)
        .args(["-y", "diseases", "delete", &id])
        .assert()
        .success();

    offline_cmd(&home)
        .args(["-o", "plain", "diseases", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(id.as_str()).not());
}

#[test]
fn test_mirror_clear_removes_snapshots() {
    let home = TempDir::new().unwrap();
    offline_cmd(&home).args(["medicines", "list"]).assert().success();

    let snapshot = home.path().join("mirror").join("ayur_library_medicines.json");
    assert!(snapshot.exists());

    offline_cmd(&home)
        .args(["-y", "mirror", "clear", "medicines"])
        .assert()
        .success();
    assert!(!snapshot.exists());
}

// ── Against a live service ──────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_list_reads_from_the_service() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/medicines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 41,
            "name": "Brahmi Vati",
            "brand": "Dabur",
            "category": "Ayurvedic",
            "quantity": 20,
            "unit": "Bottles (80 tabs)",
            "expiryDate": "2032-06-30"
        }])))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let api_url = format!("{}/api/medicines", server.uri());
    let data_dir = home.path().join("mirror");

    let output = tokio::task::spawn_blocking(move || {
        apotheca_cmd(&home)
            .args(["-o", "json", "--api-url", &api_url, "--data-dir"])
            .arg(&data_dir)
            .args(["medicines", "list"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success());
    assert!(
        !String::from_utf8_lossy(&output.stderr).contains("warning:"),
        "no advisory expected"
    );
    let list = stdout_json(&output);
    assert_eq!(list[0]["id"], "41");
    assert_eq!(list[0]["name"], "Brahmi Vati");
}
