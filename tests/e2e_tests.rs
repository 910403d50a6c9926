//! End-to-End Tests for the focusplan CLI.
//!
//! These tests run the compiled binary against a temporary data directory:
//! - TC-E-001: Template create / list / show / delete
//! - TC-E-002: Planner and category editing
//! - TC-E-003: Export and import
//! - TC-E-004: Error reporting and exit codes
//! - TC-E-005: Running a short session to completion

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// ============================================================================
// Test Helpers
// ============================================================================

fn focusplan(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("focusplan").unwrap();
    cmd.env_remove("FOCUSPLAN_DATA_DIR")
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

fn create_classic(data_dir: &Path) {
    focusplan(data_dir)
        .args([
            "template",
            "create",
            "Classic",
            "-i",
            "Focus:25m",
            "-i",
            "Break:5m:break",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created template 'Classic'"));
}

// ============================================================================
// TC-E-001: Templates
// ============================================================================

/// TC-E-001: A created template is listed, shown and deleted.
#[test]
fn tc_e_001_template_lifecycle() {
    let dir = TempDir::new().unwrap();
    create_classic(dir.path());

    focusplan(dir.path())
        .args(["template", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Classic"))
        .stdout(predicate::str::contains("2 intervals"))
        .stdout(predicate::str::contains("30m"));

    focusplan(dir.path())
        .args(["template", "show", "classic"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Focus"))
        .stdout(predicate::str::contains("25:00"))
        .stdout(predicate::str::contains("Total: 30m"));

    focusplan(dir.path())
        .args(["template", "delete", "Classic"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted template 'Classic'"));

    focusplan(dir.path())
        .args(["template", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No templates yet"));
}

/// TC-E-001b: Invalid interval specs are rejected by argument parsing.
#[test]
fn tc_e_001b_invalid_interval() {
    let dir = TempDir::new().unwrap();
    focusplan(dir.path())
        .args(["template", "create", "Bad", "-i", "Focus:0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one second"));
}

// ============================================================================
// TC-E-002: Planner
// ============================================================================

/// TC-E-002: Activities can be added, shown and removed with their category.
#[test]
fn tc_e_002_planner_flow() {
    let dir = TempDir::new().unwrap();

    focusplan(dir.path())
        .args([
            "planner", "add", "Deep work", "--day", "mon", "--hour", "9", "--duration", "3",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 'Deep work' on Monday at 9AM for 3h"));

    focusplan(dir.path())
        .args(["planner", "show", "--day", "monday"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deep work"))
        .stdout(predicate::str::contains("[Work]"));

    focusplan(dir.path())
        .args(["planner", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Planned: Work 3h"));

    focusplan(dir.path())
        .args(["category", "remove", "Work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed category 'Work' and 1 activities"));

    focusplan(dir.path())
        .args(["planner", "show", "--day", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing planned"));
}

/// TC-E-002b: Categories can be added and listed.
#[test]
fn tc_e_002b_categories() {
    let dir = TempDir::new().unwrap();

    focusplan(dir.path())
        .args(["category", "add", "Music", "--color", "#a0b0c0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added category 'Music' (#A0B0C0)"));

    focusplan(dir.path())
        .args(["category", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Music"))
        .stdout(predicate::str::contains("Errands"));

    focusplan(dir.path())
        .args(["category", "add", "Bad", "--color", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: color must look like #RRGGBB"));
}

// ============================================================================
// TC-E-003: Backup
// ============================================================================

/// TC-E-003: Export from one directory, import into another.
#[test]
fn tc_e_003_export_import() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let backup = source.path().join("backup.json");
    create_classic(source.path());

    focusplan(source.path())
        .args(["export", "--output"])
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 templates, 0 activities, 6 categories"));

    let text = fs::read_to_string(&backup).unwrap();
    assert!(text.contains("\"version\": \"1.0.0\""));
    assert!(text.contains("\"exportedAt\""));

    focusplan(target.path())
        .arg("import")
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported backup v1.0.0"));

    focusplan(target.path())
        .args(["template", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Classic"));
}

/// TC-E-003b: Without --output the file is named after today's date.
#[test]
fn tc_e_003b_default_export_name() {
    let data = TempDir::new().unwrap();
    let cwd = TempDir::new().unwrap();

    focusplan(data.path())
        .current_dir(cwd.path())
        .arg("export")
        .assert()
        .success()
        .stdout(predicate::str::contains("productivity-backup-"));

    let names: Vec<String> = fs::read_dir(cwd.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(names.len(), 1);
    assert!(names[0].starts_with("productivity-backup-"));
    assert!(names[0].ends_with(".json"));
}

// ============================================================================
// TC-E-004: Errors
// ============================================================================

/// TC-E-004: An invalid backup exits 1 and leaves data untouched.
#[test]
fn tc_e_004_invalid_import() {
    let dir = TempDir::new().unwrap();
    create_classic(dir.path());
    let bad = dir.path().join("bad.json");
    fs::write(&bad, r#"{"version":"1.0.0","templates":[]}"#).unwrap();

    focusplan(dir.path())
        .arg("import")
        .arg(&bad)
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "error: invalid backup file format: missing 'planner'",
        ));

    focusplan(dir.path())
        .args(["template", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Classic"));
}

/// TC-E-004b: Unknown templates and activities are reported.
#[test]
fn tc_e_004b_unknown_references() {
    let dir = TempDir::new().unwrap();

    focusplan(dir.path())
        .args(["run", "Nope", "--no-sound"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no template matches 'Nope'"));

    focusplan(dir.path())
        .args(["planner", "remove", "deadbeef"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no activity matches 'deadbeef'"));
}

/// TC-E-004c: Completions are generated without touching the data dir.
#[test]
fn tc_e_004c_completions() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("never-created");

    focusplan(&data)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("focusplan"));
    assert!(!data.exists());
}

// ============================================================================
// TC-E-005: Session
// ============================================================================

/// TC-E-005: A one-second session plays through and exits on completion.
#[test]
fn tc_e_005_short_session_completes() {
    let dir = TempDir::new().unwrap();
    focusplan(dir.path())
        .args(["template", "create", "Blink", "-i", "Blink:1s"])
        .assert()
        .success();

    focusplan(dir.path())
        .args([
            "run",
            "Blink",
            "--no-sound",
            "--autostart",
            "--exit-on-complete",
            "--tick-ms",
            "20",
        ])
        .timeout(std::time::Duration::from_secs(20))
        .assert()
        .success()
        .stdout(predicate::str::contains("Session complete"));
}
