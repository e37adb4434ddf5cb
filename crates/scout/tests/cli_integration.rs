//! CLI integration tests for the Scout command-line interface.
//!
//! These tests verify:
//! - Help text is displayed correctly
//! - Argument parsing works as expected
//! - Commands that need no external service run end to end
//!
//! Note: none of these tests need Redis or the resume service. Store-backed
//! commands run with `--backend memory` or `--backend disabled`.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a command for the scout binary, isolated from the host's config.
fn scout(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("scout").unwrap();
    cmd.current_dir(config_dir.path())
        .arg("--config")
        .arg(config_dir.path())
        .env_remove("SCOUT_CONFIG_DIR")
        .env_remove("REDIS_HOST")
        .env_remove("REDIS_PORT")
        .env_remove("REDIS_PASSWORD")
        .env_remove("REDIS_DB")
        .env_remove("RESUME_SEARCH_BASE_URL");
    cmd
}

fn bare() -> Command {
    Command::cargo_bin("scout").unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help_displays() {
    bare()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Scout"))
        .stdout(predicate::str::contains("recruiting assistant"));
}

#[test]
fn test_version_displays() {
    bare()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("scout"));
}

#[test]
fn test_help_lists_subcommands() {
    bare()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("prompt"))
        .stdout(predicate::str::contains("recent"))
        .stdout(predicate::str::contains("summary"))
        .stdout(predicate::str::contains("resume"))
        .stdout(predicate::str::contains("config"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Global Flag Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_global_flags_accepted() {
    bare()
        .args(["--verbose", "--json", "--backend", "memory", "--help"])
        .assert()
        .success();
}

#[test]
fn test_invalid_backend_fails() {
    let dir = TempDir::new().unwrap();
    scout(&dir)
        .args(["--backend", "sqlite", "config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown store backend 'sqlite'"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Subcommand Help Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_prompt_help() {
    bare()
        .args(["prompt", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--session"))
        .stdout(predicate::str::contains("--limit"));
}

#[test]
fn test_recent_help() {
    bare()
        .args(["recent", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("view"))
        .stdout(predicate::str::contains("remove"))
        .stdout(predicate::str::contains("clear"));
}

#[test]
fn test_summary_help() {
    bare()
        .args(["summary", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("delete"));
}

#[test]
fn test_resume_help() {
    bare()
        .args(["resume", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("update"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Invalid Input Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_unknown_subcommand_fails() {
    bare()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_prompt_requires_session() {
    bare()
        .arg("prompt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--session"));
}

// ─────────────────────────────────────────────────────────────────────────────
// End-to-end Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_prompt_with_disabled_store() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("system.md"), "# Scout\nYou help recruiters.\n").unwrap();

    scout(&dir)
        .args(["--backend", "disabled", "prompt", "--session", "s1"])
        .args(["--model", "m-1", "--system-prompt", "system.md"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# Scout\nYou help recruiters.\n\n## Runtime Info"))
        .stdout(predicate::str::contains("- model: m-1"))
        .stdout(predicate::str::contains("Recently Viewed").not());
}

#[test]
fn test_prompt_without_redis_falls_back_quickly() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[redis]\nhost = \"127.0.0.1\"\nport = 1\n\n[store]\nop_timeout_ms = 500\n",
    )
    .unwrap();

    scout(&dir)
        .args(["--backend", "redis", "prompt", "--session", "s1"])
        .timeout(std::time::Duration::from_secs(20))
        .assert()
        .success()
        .stdout(predicate::str::contains("## Runtime Info"))
        .stdout(predicate::str::contains("Recently Viewed").not());
}

#[test]
fn test_prompt_json_payload_lists_tool() {
    let dir = TempDir::new().unwrap();
    scout(&dir)
        .args(["--json", "--backend", "memory", "prompt", "--session", "s1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"system_prompt\""))
        .stdout(predicate::str::contains("\"resume_search\""));
}

#[test]
fn test_recent_list_empty() {
    let dir = TempDir::new().unwrap();
    scout(&dir)
        .args(["--backend", "memory", "recent", "list", "--session", "s1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No recently viewed resumes"));
}

#[test]
fn test_recent_list_with_disabled_store_fails() {
    let dir = TempDir::new().unwrap();
    scout(&dir)
        .args(["--backend", "disabled", "recent", "list", "--session", "s1"])
        .assert()
        .failure();
}

#[test]
fn test_config_show_masks_password() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[redis]\nhost = \"cache.internal\"\npassword = \"hunter2\"\n",
    )
    .unwrap();

    scout(&dir)
        .args(["--verbose", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cache.internal"))
        .stdout(predicate::str::contains("***"))
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn test_config_path_lists_layers() {
    let dir = TempDir::new().unwrap();
    scout(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"))
        .stdout(predicate::str::contains("scout.toml"));
}

#[test]
fn test_resume_update_rejects_non_object_fields() {
    let dir = TempDir::new().unwrap();
    scout(&dir)
        .args(["--backend", "memory", "resume", "update", "c1", "--fields", "[1]"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--fields must be a JSON object"));
}
