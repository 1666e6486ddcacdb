//! CLI integration tests for lend
//!
//! Each invocation builds its library from a seed configuration, so these
//! tests exercise config loading, the commands and their output together.

use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const SEED: &str = r#"
[library]
name = "Biblioteca Central"
address = "Av. Principal, 1000"

[policy]
individual_quota = 2

[[staff]]
name = "Ana Silva"
registration = "FUNC001"
role = "Librarian"

[[books]]
id = "b-0000001"
title = "Dom Casmurro"
author = "Machado de Assis"
copies = 2

[[books]]
id = "b-0000002"
title = "1984"
author = "George Orwell"
copies = 1

[[books]]
id = "b-0000003"
title = "Animal Farm"
author = "George Orwell"
copies = 0

[[patrons]]
id = "p-0000001"
kind = "individual"
name = "Joao Santos"
tax_id = "111.222.333-44"

[[patrons]]
id = "p-0000002"
kind = "organization"
name = "Escola Municipal"
tax_id = "12.345.678/0001-90"
legal_name = "Escola Municipal de Sao Paulo"
responsible = "Maria Oliveira"
"#;

/// Get a command instance for the lend binary
fn lend_cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("lend"));
    cmd.env_remove("LENDBOOK_CONFIG").env_remove("RUST_LOG");
    cmd
}

/// Write the seed configuration into a temporary directory
fn setup_config() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("library.toml");
    fs::write(&path, SEED).unwrap();
    (dir, path)
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_info_shows_library_and_staff() {
    let (_dir, config) = setup_config();

    lend_cmd()
        .arg("--config")
        .arg(&config)
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("Biblioteca Central"))
        .stdout(predicate::str::contains("Individual quota:   2"))
        .stdout(predicate::str::contains("FUNC001 Ana Silva (Librarian)"));
}

#[test]
fn test_config_from_environment() {
    let (_dir, config) = setup_config();

    lend_cmd()
        .env("LENDBOOK_CONFIG", &config)
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("Biblioteca Central"));
}

#[test]
fn test_missing_config_fails() {
    let dir = TempDir::new().unwrap();

    lend_cmd()
        .arg("--config")
        .arg(dir.path().join("nope.toml"))
        .arg("info")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
fn test_invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("library.toml");
    fs::write(&path, "[policy]\nloan_period_days = 0\n").unwrap();

    lend_cmd()
        .arg("--config")
        .arg(&path)
        .arg("info")
        .assert()
        .failure()
        .stderr(predicate::str::contains("loan_period_days"));
}

// =============================================================================
// Books
// =============================================================================

#[test]
fn test_book_list_and_available_filter() {
    let (_dir, config) = setup_config();

    lend_cmd()
        .arg("-c")
        .arg(&config)
        .args(["book", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Animal Farm"));

    lend_cmd()
        .arg("-c")
        .arg(&config)
        .args(["book", "list", "--available"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dom Casmurro"))
        .stdout(predicate::str::contains("Animal Farm").not());
}

#[test]
fn test_book_show_json() {
    let (_dir, config) = setup_config();

    let output = lend_cmd()
        .arg("-c")
        .arg(&config)
        .args(["book", "show", "b-0000001", "--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["title"], "Dom Casmurro");
    assert_eq!(json["copies"], 2);
    assert_eq!(json["available"], true);
}

#[test]
fn test_book_show_unknown_fails() {
    let (_dir, config) = setup_config();

    lend_cmd()
        .arg("-c")
        .arg(&config)
        .args(["book", "show", "b-fffffff"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Book not found"));
}

#[test]
fn test_search_matches_title_and_author() {
    let (_dir, config) = setup_config();

    lend_cmd()
        .arg("-c")
        .arg(&config)
        .args(["search", "orwell"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1984"))
        .stdout(predicate::str::contains("Animal Farm"));

    lend_cmd()
        .arg("-c")
        .arg(&config)
        .args(["search", "tolstoy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No books found for 'tolstoy'"));
}

// =============================================================================
// Loans
// =============================================================================

#[test]
fn test_loan_create_reports_skipped_books() {
    let (_dir, config) = setup_config();

    lend_cmd()
        .arg("-c")
        .arg(&config)
        .args(["loan", "create", "p-0000001", "b-0000001", "b-0000003", "b-fffffff"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created loan"))
        .stdout(predicate::str::contains("b-0000003 skipped: unavailable"))
        .stdout(predicate::str::contains("b-fffffff skipped: not found"));
}

#[test]
fn test_loan_create_with_nothing_lendable_fails() {
    let (_dir, config) = setup_config();

    lend_cmd()
        .arg("-c")
        .arg(&config)
        .args(["loan", "create", "p-0000001", "b-0000003"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could be lent"));
}

#[test]
fn test_loan_create_unknown_patron_fails() {
    let (_dir, config) = setup_config();

    lend_cmd()
        .arg("-c")
        .arg(&config)
        .args(["loan", "create", "p-fffffff", "b-0000001"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Patron not found"));
}

#[test]
fn test_invalid_id_fails() {
    let (_dir, config) = setup_config();

    lend_cmd()
        .arg("-c")
        .arg(&config)
        .args(["loan", "return", "not-an-id"])
        .assert()
        .failure();
}

// =============================================================================
// Report
// =============================================================================

#[test]
fn test_report_on_fresh_library() {
    let (_dir, config) = setup_config();

    lend_cmd()
        .arg("-c")
        .arg(&config)
        .arg("report")
        .assert()
        .success()
        .stdout(predicate::str::contains("LIBRARY REPORT: Biblioteca Central"))
        .stdout(predicate::str::contains("(no loans yet)"));
}

#[test]
fn test_report_json() {
    let (_dir, config) = setup_config();

    let output = lend_cmd()
        .arg("-c")
        .arg(&config)
        .args(["report", "--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["books"], 3);
    assert_eq!(json["patrons"], 2);
    assert_eq!(json["individuals"], 1);
    assert_eq!(json["organizations"], 1);
}

// =============================================================================
// Shell sessions
// =============================================================================

#[test]
fn test_shell_keeps_state_between_commands() {
    let (_dir, config) = setup_config();

    let script = "\
loan create p-0000001 b-0000002
book show b-0000002
patron loans p-0000001
report --top 1
exit
";

    lend_cmd()
        .arg("-c")
        .arg(&config)
        .arg("shell")
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created loan"))
        .stdout(predicate::str::contains("Copies:    0/1 (unavailable)"))
        .stdout(predicate::str::contains("Active loans for p-0000001 (1)"))
        .stdout(predicate::str::contains("1. 1984: 1 loan(s)"));
}

#[test]
fn test_shell_enforces_quota() {
    let (_dir, config) = setup_config();

    let script = "\
loan create p-0000001 b-0000001 b-0000001 b-0000002
patron list
";

    lend_cmd()
        .arg("-c")
        .arg(&config)
        .arg("shell")
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("b-0000002 skipped: quota reached"))
        .stdout(predicate::str::contains("2/2"));
}

#[test]
fn test_shell_continues_after_errors() {
    let (_dir, config) = setup_config();

    let script = "\
book show b-fffffff
book add \"Grande Sertao: Veredas\" \"Guimaraes Rosa\" --copies 2
search sertao
";

    lend_cmd()
        .arg("-c")
        .arg(&config)
        .arg("shell")
        .write_stdin(script)
        .assert()
        .success()
        .stderr(predicate::str::contains("Book not found"))
        .stdout(predicate::str::contains("Cataloged book"))
        .stdout(predicate::str::contains("Grande Sertao: Veredas"));
}

#[test]
fn test_shell_json_loan_create() {
    let (_dir, config) = setup_config();

    let output = lend_cmd()
        .arg("-c")
        .arg(&config)
        .args(["--format", "json", "shell"])
        .write_stdin("loan create p-0000002 b-0000001\n")
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["loan"]["patron_id"], "p-0000002");
    assert_eq!(json["skipped"].as_array().unwrap().len(), 0);
}

#[test]
fn test_shell_patron_lifecycle() {
    let (_dir, config) = setup_config();

    let script = "\
patron add-organization Biblioteca 99.999.999/0001-99 'Biblioteca Comunitaria' 'Carlos Lima'
patron find comunitaria
patron deactivate p-0000001
loan create p-0000001 b-0000001
patron activate p-0000001
patron list
";

    lend_cmd()
        .arg("-c")
        .arg(&config)
        .arg("shell")
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered patron"))
        .stdout(predicate::str::contains("(quota 10)"))
        .stdout(predicate::str::contains("Biblioteca Comunitaria"))
        .stdout(predicate::str::contains("Deactivated patron: p-0000001"))
        .stderr(predicate::str::contains("is inactive"))
        .stdout(predicate::str::contains("Activated patron: p-0000001"));
}
