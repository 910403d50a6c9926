//! Export and import of the whole application state.
//!
//! A backup is a single JSON document holding every template and the
//! planner. Import is all-or-nothing: a document that is missing a
//! required section is rejected before anything is replaced.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::planner::Planner;
use crate::types::{AppData, PlannerState, SessionTemplate, BACKUP_VERSION};

use super::{StoreError, TemplateStore};

/// Sections a backup must contain.
const REQUIRED_FIELDS: [&str; 3] = ["version", "templates", "planner"];

#[derive(Debug, Error)]
pub enum BackupError {
    /// The document is not JSON at all.
    #[error("failed to parse backup file: {0}")]
    Parse(serde_json::Error),

    #[error("invalid backup file format: missing '{0}'")]
    MissingField(&'static str),

    /// Required sections are present but have the wrong shape.
    #[error("invalid backup file format: {0}")]
    Invalid(serde_json::Error),

    #[error("failed to serialize backup: {0}")]
    Serialize(serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Builds a backup document from the current state.
pub fn export(
    templates: &[SessionTemplate],
    planner: &PlannerState,
    exported_at: DateTime<Utc>,
) -> AppData {
    AppData {
        version: BACKUP_VERSION.to_string(),
        exported_at: exported_at.timestamp_millis(),
        templates: templates.to_vec(),
        planner: planner.clone(),
    }
}

/// Pretty-printed JSON text of a backup.
pub fn to_json(data: &AppData) -> Result<String, BackupError> {
    serde_json::to_string_pretty(data).map_err(BackupError::Serialize)
}

/// Parses and checks a backup document.
///
/// `version`, `templates` and `planner` must be present and not null;
/// `version` must also be a non-empty string. Empty lists are valid.
pub fn parse_backup(text: &str) -> Result<AppData, BackupError> {
    let value: Value = serde_json::from_str(text).map_err(BackupError::Parse)?;

    for field in REQUIRED_FIELDS {
        let present = match value.get(field) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        };
        if !present {
            return Err(BackupError::MissingField(field));
        }
    }

    serde_json::from_value(value).map_err(BackupError::Invalid)
}

/// Suggested file name for an export made on `date`.
pub fn default_file_name(date: NaiveDate) -> String {
    format!("productivity-backup-{}.json", date.format("%Y-%m-%d"))
}

/// Replaces the stored templates and planner with the backup's contents.
///
/// If the planner cannot be saved the previous templates are written back,
/// so a failed import leaves both documents as they were.
pub fn apply_import(
    data: AppData,
    templates: &mut TemplateStore,
    planner: &mut Planner,
) -> Result<(), BackupError> {
    info!(
        "Importing backup v{}: {} templates, {} activities, {} categories",
        data.version,
        data.templates.len(),
        data.planner.activities.len(),
        data.planner.categories.len()
    );
    let previous = templates.list().to_vec();
    templates.replace_all(data.templates)?;
    if let Err(e) = planner.replace_state(data.planner) {
        if let Err(restore) = templates.replace_all(previous) {
            warn!("Failed to restore templates after aborted import: {}", restore);
        }
        return Err(e.into());
    }
    Ok(())
}
