//! Integration tests for persistence, the planner and backups.
//!
//! These tests verify that the pieces sharing one data directory work
//! together:
//! - TC-I-001: Templates and planner coexist in one store
//! - TC-I-002: Export then import restores state
//! - TC-I-003: Invalid or failed imports leave state untouched
//! - TC-I-004: Stored templates drive the engine

use std::fs;
use std::sync::Arc;

use chrono::Utc;
use tempfile::TempDir;

use focusplan::planner::{ActivityDraft, Planner, PLANNER_KEY};
use focusplan::store::backup::{self, BackupError};
use focusplan::store::{JsonStore, TemplateStore, TEMPLATES_KEY};
use focusplan::timer::{ManualClock, RecordingNotifier, TimerEngine};
use focusplan::types::{IntervalKind, PlannerState};
use focusplan::TemplateBuilder;

// ============================================================================
// Test Helpers
// ============================================================================

struct Workspace {
    _dir: TempDir,
    store: JsonStore,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        Self { _dir: dir, store }
    }

    fn templates(&self) -> TemplateStore {
        TemplateStore::open(self.store.clone()).unwrap()
    }

    fn planner(&self) -> Planner {
        Planner::open(self.store.clone()).unwrap()
    }
}

fn seed(workspace: &Workspace) {
    let mut templates = workspace.templates();
    templates
        .add(
            TemplateBuilder::new("Classic")
                .interval("Focus", 1500, IntervalKind::Work)
                .interval("Break", 300, IntervalKind::Break)
                .build(1_700_000_000_000)
                .unwrap(),
        )
        .unwrap();

    let mut planner = workspace.planner();
    planner
        .add_activity(ActivityDraft {
            title: "Gym".to_string(),
            category_id: "gym".to_string(),
            day_index: 2,
            start_hour: 7,
            duration: 1,
        })
        .unwrap();
    planner.add_category("Music", "#112233").unwrap();
}

// ============================================================================
// TC-I-001: Shared Store
// ============================================================================

/// TC-I-001: Each concern is stored under its own key.
#[test]
fn tc_i_001_templates_and_planner_share_store() {
    let workspace = Workspace::new();
    seed(&workspace);

    assert!(workspace.store.path_for(TEMPLATES_KEY).exists());
    assert!(workspace.store.path_for(PLANNER_KEY).exists());
    assert!(workspace
        .store
        .path_for("timer-templates")
        .ends_with("timer-templates.json"));

    assert_eq!(workspace.templates().len(), 1);
    let planner = workspace.planner();
    assert_eq!(planner.activities().len(), 1);
    assert_eq!(planner.categories().len(), 7);
}

/// TC-I-001b: Stored documents use the camelCase wire format.
#[test]
fn tc_i_001b_wire_format() {
    let workspace = Workspace::new();
    seed(&workspace);

    let templates = fs::read_to_string(workspace.store.path_for(TEMPLATES_KEY)).unwrap();
    assert!(templates.contains("\"createdAt\""));
    assert!(templates.contains("\"type\": \"break\""));

    let planner = fs::read_to_string(workspace.store.path_for(PLANNER_KEY)).unwrap();
    assert!(planner.contains("\"categoryId\""));
    assert!(planner.contains("\"dayIndex\""));
    assert!(planner.contains("\"startHour\""));
}

// ============================================================================
// TC-I-002: Export / Import
// ============================================================================

/// TC-I-002: Importing an export into a fresh directory restores it.
#[test]
fn tc_i_002_export_then_import() {
    let source = Workspace::new();
    seed(&source);

    let data = backup::export(
        source.templates().list(),
        source.planner().state(),
        Utc::now(),
    );
    let json = backup::to_json(&data).unwrap();

    let target = Workspace::new();
    let parsed = backup::parse_backup(&json).unwrap();
    backup::apply_import(parsed, &mut target.templates(), &mut target.planner()).unwrap();

    assert_eq!(target.templates().list(), source.templates().list());
    assert_eq!(target.planner().state(), source.planner().state());
}

/// TC-I-002b: Import replaces state wholesale; empty sections clear it.
#[test]
fn tc_i_002b_import_with_empty_sections_clears_state() {
    let workspace = Workspace::new();
    seed(&workspace);

    let text = r#"{
        "version": "1.0.0",
        "exportedAt": 0,
        "templates": [],
        "planner": { "activities": [], "categories": [] }
    }"#;
    let data = backup::parse_backup(text).unwrap();
    backup::apply_import(data, &mut workspace.templates(), &mut workspace.planner()).unwrap();

    assert!(workspace.templates().is_empty());
    let planner = workspace.planner();
    assert_eq!(planner.state(), &PlannerState {
        activities: Vec::new(),
        categories: Vec::new(),
    });
}

// ============================================================================
// TC-I-003: Invalid Backups
// ============================================================================

/// TC-I-003: A backup missing a section is rejected before anything changes.
#[test]
fn tc_i_003_missing_planner_rejected() {
    let workspace = Workspace::new();
    seed(&workspace);

    let result = backup::parse_backup(r#"{"version":"1.0.0","templates":[]}"#);
    assert!(matches!(result, Err(BackupError::MissingField("planner"))));

    assert_eq!(workspace.templates().len(), 1);
    assert_eq!(workspace.planner().activities().len(), 1);
}

/// TC-I-003b: A corrupt store document surfaces as an error, not defaults.
#[test]
fn tc_i_003b_corrupt_store_document() {
    let workspace = Workspace::new();
    fs::write(workspace.store.path_for(PLANNER_KEY), "[1, 2").unwrap();

    assert!(Planner::open(workspace.store.clone()).is_err());
    // Other keys are unaffected
    assert!(TemplateStore::open(workspace.store.clone()).is_ok());
}

/// TC-I-003c: A planner that cannot be saved rolls the templates back.
#[test]
fn tc_i_003c_failed_import_keeps_previous_templates() {
    let workspace = Workspace::new();
    seed(&workspace);
    let mut templates = workspace.templates();
    let mut planner = workspace.planner();

    // A directory in place of the planner document makes its rename fail
    let planner_path = workspace.store.path_for(PLANNER_KEY);
    fs::remove_file(&planner_path).unwrap();
    fs::create_dir(&planner_path).unwrap();

    let imported = TemplateBuilder::new("Imported")
        .interval("Focus", 600, IntervalKind::Work)
        .build(0)
        .unwrap();
    let data = backup::export(&[imported], &PlannerState::default(), Utc::now());

    let result = backup::apply_import(data, &mut templates, &mut planner);
    assert!(matches!(result, Err(BackupError::Store(_))));

    let names: Vec<String> = templates.list().iter().map(|t| t.name.clone()).collect();
    assert_eq!(names, vec!["Classic"]);
    let reopened = workspace.templates();
    assert_eq!(reopened.len(), 1);
    assert!(reopened.find("Classic").is_some());
    assert!(reopened.find("Imported").is_none());
    assert_eq!(planner.activities().len(), 1);
}

// ============================================================================
// TC-I-004: Stored Templates Drive the Engine
// ============================================================================

/// TC-I-004: A template loaded from disk plays like the original.
#[test]
fn tc_i_004_stored_template_plays() {
    let workspace = Workspace::new();
    seed(&workspace);

    let template = workspace.templates().find("classic").cloned().unwrap();
    let clock = ManualClock::new(0);
    let recorder = RecordingNotifier::new();
    let mut engine = TimerEngine::new(clock.clone(), recorder.clone());
    engine.load_template(Arc::new(template));
    engine.play();

    clock.set(1_500_000);
    engine.tick();
    assert_eq!(engine.state().current_index, 1);
    assert_eq!(engine.snapshot().interval_name.as_deref(), Some("Break"));
    assert_eq!(recorder.advanced_count(), 1);
}
