//! Integration tests for quote-history

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn escape_path_for_toml(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "\\\\")
}

/// Config pointing at a three-quote catalog and a history file
fn setup_test_env(history: Option<&[&str]>) -> (TempDir, PathBuf, PathBuf) {
    let dir = TempDir::new().unwrap();
    let catalog_path = dir.path().join("quotes.json");
    let history_path = dir.path().join("used_quotes.json");
    let config_path = dir.path().join("config.toml");

    fs::write(
        &catalog_path,
        serde_json::json!({"quotes": ["First.", "Second.", "Third."]}).to_string(),
    )
    .unwrap();

    if let Some(entries) = history {
        fs::write(
            &history_path,
            serde_json::json!({ "used_quotes": entries }).to_string(),
        )
        .unwrap();
    }

    fs::write(
        &config_path,
        format!(
            "[content]\ncatalog = \"{}\"\nhistory = \"{}\"\n",
            escape_path_for_toml(&catalog_path),
            escape_path_for_toml(&history_path)
        ),
    )
    .unwrap();

    (dir, config_path, history_path)
}

fn quote_history(dir: &TempDir, config_path: &Path) -> Command {
    let mut cmd = Command::cargo_bin("quote-history").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("QUOTECAST_CONFIG")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(config_path);
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    Command::cargo_bin("quote-history")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("stats"))
        .stdout(predicate::str::contains("clear"));
}

#[test]
fn test_list_text_in_order() {
    let (dir, config, _) = setup_test_env(Some(&["Second.", "First."]));

    quote_history(&dir, &config)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Second."))
        .stdout(predicate::str::contains("2. First."));
}

#[test]
fn test_list_json() {
    let (dir, config, _) = setup_test_env(Some(&["Third."]));

    let output = quote_history(&dir, &config)
        .args(["list", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let entries: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(entries, vec!["Third.".to_string()]);
}

#[test]
fn test_list_without_history_is_empty_success() {
    let (dir, config, _) = setup_test_env(None);

    quote_history(&dir, &config)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_stats_json() {
    let (dir, config, _) = setup_test_env(Some(&["First."]));

    let output = quote_history(&dir, &config)
        .args(["stats", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats["catalog_quotes"], 3);
    assert_eq!(stats["history_len"], 1);
    assert_eq!(stats["available"], 2);
    assert_eq!(stats["history_limit"], 50);
    assert_eq!(stats["last_posted"], "First.");
}

#[test]
fn test_stats_text() {
    let (dir, config, _) = setup_test_env(Some(&["First.", "Second."]));

    quote_history(&dir, &config)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Catalog quotes:  3"))
        .stdout(predicate::str::contains("Available:       1"))
        .stdout(predicate::str::contains("Last posted:     Second."));
}

#[test]
fn test_clear_empties_history() {
    let (dir, config, history_path) = setup_test_env(Some(&["First.", "Second."]));

    quote_history(&dir, &config)
        .arg("clear")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared"));

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&history_path).unwrap()).unwrap();
    assert_eq!(saved["used_quotes"], serde_json::json!([]));
}

#[test]
fn test_unreadable_config_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(&config, "[content\nbroken").unwrap();

    quote_history(&dir, &config)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}
