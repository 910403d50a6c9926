//! focusplan library
//!
//! This library provides the core functionality for the focusplan CLI.
//! It includes:
//! - Interval timer engine driven by saved session templates
//! - Sound cues for interval changes and session completion
//! - JSON persistence for templates and the planner
//! - Weekly activity planner with categories
//! - Backup export and import
//! - CLI command parsing and display utilities

pub mod cli;
pub mod config;
pub mod planner;
pub mod sound;
pub mod store;
pub mod template;
pub mod timer;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    Activity, AppData, Category, Interval, IntervalKind, PlannerState, SessionTemplate,
    TimerState, TimerStatus,
};

pub use config::{AppConfig, ConfigError};
pub use planner::{ActivityDraft, ActivityUpdate, CategoryUpdate, DropTarget, Planner, PlannerError};
pub use store::backup::BackupError;
pub use store::{JsonStore, StoreError, TemplateStore};
pub use template::{TemplateBuilder, TemplateError};
pub use timer::{Clock, ManualClock, Notifier, SessionCommand, TimerEngine, TimerEvent};

// Re-export sound types
pub use sound::{Cue, MockSoundPlayer, RodioSoundPlayer, SoundError, SoundNotifier, SoundPlayer};
