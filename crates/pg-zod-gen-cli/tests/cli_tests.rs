//! CLI integration tests for pg-zod-gen.
//!
//! These tests verify command-line argument parsing, help output,
//! and exit codes for error conditions that occur before or at connect time.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

/// Get a command for the pg-zod-gen binary.
fn cmd() -> Command {
    Command::cargo_bin("pg-zod-gen").unwrap()
}

/// Config pointing at a port nothing listens on.
fn unreachable_config() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "database:").unwrap();
    writeln!(file, "  host: 127.0.0.1").unwrap();
    writeln!(file, "  port: 1").unwrap();
    writeln!(file, "  database: app").unwrap();
    writeln!(file, "  user: postgres").unwrap();
    writeln!(file, "  ssl_mode: disable").unwrap();
    file
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_shows_all_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("list-tables"))
        .stdout(predicate::str::contains("health-check"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn test_generate_subcommand_help() {
    cmd()
        .args(["generate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--table"))
        .stdout(predicate::str::contains("--schema"))
        .stdout(predicate::str::contains("--output"))
        .stdout(predicate::str::contains("--exclude-defaults"))
        .stdout(predicate::str::contains("--exclude-nullable"))
        .stdout(predicate::str::contains("--allow-non-positive"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pg-zod-gen"));
}

// =============================================================================
// Global Flags Tests
// =============================================================================

#[test]
fn test_global_flags() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--output-json"))
        .stdout(predicate::str::contains("--log-format"))
        .stdout(predicate::str::contains("[default: text]"))
        .stdout(predicate::str::contains("--verbosity"))
        .stdout(predicate::str::contains("[default: info]"))
        .stdout(predicate::str::contains("[default: config.yaml]"));
}

#[test]
fn test_short_config_flag() {
    cmd()
        .args(["-c", "some_config.yaml", "--help"])
        .assert()
        .success();
}

// =============================================================================
// Exit Code Tests
// =============================================================================

#[test]
fn test_missing_config_exits_with_code_7() {
    // Missing file is an IO error, not a config error
    cmd()
        .args(["--config", "nonexistent_config_file.yaml", "generate"])
        .assert()
        .code(7);
}

#[test]
fn test_invalid_yaml_exits_with_code_1() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "invalid: yaml: content: [").unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "health-check"])
        .assert()
        .code(1);
}

#[test]
fn test_empty_config_exits_with_code_1() {
    let file = NamedTempFile::new().unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "health-check"])
        .assert()
        .code(1);
}

#[test]
fn test_missing_required_fields_exits_with_code_1() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "database:").unwrap();
    writeln!(file, "  host: localhost").unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "generate"])
        .assert()
        .code(1);
}

#[test]
fn test_invalid_ssl_mode_exits_with_code_1() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "database:").unwrap();
    writeln!(file, "  host: localhost").unwrap();
    writeln!(file, "  database: app").unwrap();
    writeln!(file, "  user: postgres").unwrap();
    writeln!(file, "  ssl_mode: prefer").unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "health-check"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ssl_mode"));
}

#[test]
fn test_reserved_table_name_rejected_before_connect() {
    let file = unreachable_config();

    cmd()
        .args([
            "--config",
            file.path().to_str().unwrap(),
            "generate",
            "--table",
            "select",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid table name"));
}

#[test]
fn test_table_name_with_bad_characters_rejected() {
    let file = unreachable_config();

    cmd()
        .args([
            "--config",
            file.path().to_str().unwrap(),
            "generate",
            "--table",
            "users;drop",
        ])
        .assert()
        .code(1);
}

#[test]
fn test_zero_concurrency_rejected() {
    let file = unreachable_config();

    cmd()
        .args([
            "--config",
            file.path().to_str().unwrap(),
            "generate",
            "--concurrency",
            "0",
        ])
        .assert()
        .code(1);
}

#[test]
fn test_unreachable_database_exits_with_code_2() {
    let file = unreachable_config();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "health-check"])
        .assert()
        .code(2);
}

// =============================================================================
// Subcommand Existence Tests
// =============================================================================

#[test]
fn test_health_check_command_exists() {
    cmd()
        .args(["health-check", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Test the database connection"));
}

#[test]
fn test_list_tables_command_exists() {
    cmd()
        .args(["list-tables", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("List base tables"));
}

#[test]
fn test_init_command_exists() {
    cmd()
        .args(["init", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--advanced"))
        .stdout(predicate::str::contains("--force"));
}

#[test]
fn test_no_subcommand_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}
