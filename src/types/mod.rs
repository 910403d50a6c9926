//! Core data types for focusplan.
//!
//! This module defines the data structures used for:
//! - Session templates (ordered work/break intervals)
//! - Timer engine state
//! - Weekly planner activities and categories
//! - The backup document written by export and read by import

use std::sync::Arc;

use serde::{Deserialize, Serialize};

// ============================================================================
// IntervalKind
// ============================================================================

/// Whether an interval is focused work or a break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalKind {
    /// Focused work
    Work,
    /// Rest between work intervals
    Break,
}

impl IntervalKind {
    /// Returns the string representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalKind::Work => "work",
            IntervalKind::Break => "break",
        }
    }
}

impl Default for IntervalKind {
    fn default() -> Self {
        IntervalKind::Work
    }
}

impl std::str::FromStr for IntervalKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "work" | "w" => Ok(IntervalKind::Work),
            "break" | "b" => Ok(IntervalKind::Break),
            other => Err(format!("unknown interval kind '{other}' (expected work or break)")),
        }
    }
}

// ============================================================================
// Interval / SessionTemplate
// ============================================================================

/// One timed segment of a session template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    /// Identifier, unique within its template
    pub id: String,
    /// Display name
    pub name: String,
    /// Length in seconds
    pub duration: u32,
    /// Work or break
    #[serde(rename = "type")]
    pub kind: IntervalKind,
}

impl Interval {
    /// Creates an interval with a freshly generated id.
    pub fn new(name: impl Into<String>, duration: u32, kind: IntervalKind) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            duration,
            kind,
        }
    }
}

/// A named, ordered list of intervals played back by the timer engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTemplate {
    /// Identifier, unique across all templates
    pub id: String,
    /// Display name
    pub name: String,
    /// Intervals in playback order
    pub intervals: Vec<Interval>,
    /// Creation time in epoch milliseconds
    pub created_at: i64,
}

impl SessionTemplate {
    /// Returns the interval at `index`, if any.
    pub fn interval(&self, index: usize) -> Option<&Interval> {
        self.intervals.get(index)
    }

    /// Duration of the first interval, or 0 for an empty template.
    pub fn first_duration(&self) -> u32 {
        self.intervals.first().map_or(0, |i| i.duration)
    }

    /// Sum of all interval durations in seconds.
    pub fn total_seconds(&self) -> u64 {
        self.intervals.iter().map(|i| u64::from(i.duration)).sum()
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

// ============================================================================
// TimerStatus / TimerState
// ============================================================================

/// Coarse state of the timer engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerStatus {
    /// No playable template loaded
    Idle,
    /// Template loaded, not counting down
    Ready,
    /// Counting down
    Running,
}

impl TimerStatus {
    /// Returns the string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerStatus::Idle => "idle",
            TimerStatus::Ready => "ready",
            TimerStatus::Running => "running",
        }
    }
}

impl Default for TimerStatus {
    fn default() -> Self {
        TimerStatus::Idle
    }
}

/// Playback position of the timer engine.
///
/// The template is shared by reference: the engine never mutates it, and
/// `Arc::ptr_eq` tells whether the same template is still loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimerState {
    /// Whether the countdown is active
    pub running: bool,
    /// Position in the template's interval list
    pub current_index: usize,
    /// Seconds left in the current interval
    pub remaining_seconds: u32,
    /// Loaded template, if any
    pub template: Option<Arc<SessionTemplate>>,
}

impl TimerState {
    /// Creates the idle state (nothing loaded).
    pub fn idle() -> Self {
        Self::default()
    }

    /// Creates the ready state for a freshly loaded template.
    pub fn loaded(template: Arc<SessionTemplate>) -> Self {
        Self {
            running: false,
            current_index: 0,
            remaining_seconds: template.first_duration(),
            template: Some(template),
        }
    }

    /// Returns true if a template with at least one interval is loaded.
    pub fn is_playable(&self) -> bool {
        self.template.as_ref().is_some_and(|t| !t.is_empty())
    }

    /// Derives the coarse status from the fields.
    pub fn status(&self) -> TimerStatus {
        if !self.is_playable() {
            TimerStatus::Idle
        } else if self.running {
            TimerStatus::Running
        } else {
            TimerStatus::Ready
        }
    }
}

// ============================================================================
// Planner Types
// ============================================================================

/// A colored label grouping planner activities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// CSS-style hex color, e.g. `#3B82F6`
    pub color: String,
}

impl Category {
    fn preset(id: &str, name: &str, color: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            color: color.to_string(),
        }
    }
}

/// A block of time on the weekly planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub title: String,
    pub category_id: String,
    /// Day of week, 0 = Sunday
    pub day_index: u8,
    /// Hour of day the activity starts (0-23)
    pub start_hour: u8,
    /// Length in whole hours
    pub duration: u8,
}

impl Activity {
    /// Returns true if the activity occupies `hour` on its day.
    pub fn covers_hour(&self, hour: u8) -> bool {
        hour >= self.start_hour && u16::from(hour) < u16::from(self.start_hour) + u16::from(self.duration)
    }
}

/// Everything the planner persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerState {
    pub activities: Vec<Activity>,
    pub categories: Vec<Category>,
}

impl Default for PlannerState {
    fn default() -> Self {
        Self {
            activities: Vec::new(),
            categories: default_categories(),
        }
    }
}

/// Categories every new planner starts with.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::preset("work", "Work", "#3B82F6"),
        Category::preset("gym", "Gym", "#10B981"),
        Category::preset("errands", "Errands", "#F59E0B"),
        Category::preset("study", "Study", "#8B5CF6"),
        Category::preset("personal", "Personal", "#EC4899"),
        Category::preset("rest", "Rest", "#6B7280"),
    ]
}

/// Day names indexed by `Activity::day_index`.
pub const DAYS_OF_WEEK: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Formats an hour of day as a 12-hour label (`12AM`, `9AM`, `3PM`).
pub fn format_hour(hour: u8) -> String {
    let period = if hour >= 12 { "PM" } else { "AM" };
    let display = match hour {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };
    format!("{display}{period}")
}

// ============================================================================
// AppData
// ============================================================================

/// Backup document version written by export.
pub const BACKUP_VERSION: &str = "1.0.0";

/// The export/import document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
    pub version: String,
    /// Export time in epoch milliseconds
    #[serde(default)]
    pub exported_at: i64,
    pub templates: Vec<SessionTemplate>,
    pub planner: PlannerState,
}

/// Generates an opaque identifier.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_template() -> SessionTemplate {
        SessionTemplate {
            id: "t1".to_string(),
            name: "Classic".to_string(),
            intervals: vec![
                Interval::new("Focus", 1500, IntervalKind::Work),
                Interval::new("Break", 300, IntervalKind::Break),
            ],
            created_at: 0,
        }
    }

    mod interval_kind_tests {
        use super::*;

        #[test]
        fn test_serializes_lowercase() {
            assert_eq!(serde_json::to_string(&IntervalKind::Work).unwrap(), "\"work\"");
            assert_eq!(serde_json::to_string(&IntervalKind::Break).unwrap(), "\"break\"");
        }

        #[test]
        fn test_from_str() {
            assert_eq!("work".parse::<IntervalKind>().unwrap(), IntervalKind::Work);
            assert_eq!("Break".parse::<IntervalKind>().unwrap(), IntervalKind::Break);
            assert_eq!("b".parse::<IntervalKind>().unwrap(), IntervalKind::Break);
            assert!("nap".parse::<IntervalKind>().is_err());
        }
    }

    mod template_tests {
        use super::*;

        #[test]
        fn test_interval_kind_field_is_named_type() {
            let interval = Interval {
                id: "a".to_string(),
                name: "Focus".to_string(),
                duration: 60,
                kind: IntervalKind::Work,
            };
            let json = serde_json::to_value(&interval).unwrap();
            assert_eq!(json["type"], "work");
            assert!(json.get("kind").is_none());
        }

        #[test]
        fn test_template_camel_case() {
            let json = serde_json::to_value(sample_template()).unwrap();
            assert!(json.get("createdAt").is_some());
        }

        #[test]
        fn test_totals() {
            let template = sample_template();
            assert_eq!(template.first_duration(), 1500);
            assert_eq!(template.total_seconds(), 1800);
            assert_eq!(template.len(), 2);
        }

        #[test]
        fn test_empty_template_first_duration() {
            let template = SessionTemplate {
                intervals: vec![],
                ..sample_template()
            };
            assert_eq!(template.first_duration(), 0);
            assert!(template.is_empty());
        }

        #[test]
        fn test_generated_ids_are_unique() {
            let a = Interval::new("A", 1, IntervalKind::Work);
            let b = Interval::new("A", 1, IntervalKind::Work);
            assert_ne!(a.id, b.id);
        }
    }

    mod timer_state_tests {
        use super::*;

        #[test]
        fn test_idle() {
            let state = TimerState::idle();
            assert!(!state.running);
            assert_eq!(state.current_index, 0);
            assert_eq!(state.remaining_seconds, 0);
            assert_eq!(state.status(), TimerStatus::Idle);
        }

        #[test]
        fn test_loaded() {
            let state = TimerState::loaded(Arc::new(sample_template()));
            assert_eq!(state.remaining_seconds, 1500);
            assert_eq!(state.status(), TimerStatus::Ready);
        }

        #[test]
        fn test_empty_template_is_idle() {
            let template = SessionTemplate {
                intervals: vec![],
                ..sample_template()
            };
            let state = TimerState::loaded(Arc::new(template));
            assert_eq!(state.status(), TimerStatus::Idle);
            assert!(!state.is_playable());
        }
    }

    mod planner_type_tests {
        use super::*;

        #[test]
        fn test_default_categories() {
            let state = PlannerState::default();
            assert!(state.activities.is_empty());
            let ids: Vec<_> = state.categories.iter().map(|c| c.id.as_str()).collect();
            assert_eq!(ids, ["work", "gym", "errands", "study", "personal", "rest"]);
        }

        #[test]
        fn test_covers_hour() {
            let activity = Activity {
                id: "a".to_string(),
                title: "Deep work".to_string(),
                category_id: "work".to_string(),
                day_index: 1,
                start_hour: 9,
                duration: 3,
            };
            assert!(!activity.covers_hour(8));
            assert!(activity.covers_hour(9));
            assert!(activity.covers_hour(11));
            assert!(!activity.covers_hour(12));
        }

        #[test]
        fn test_activity_camel_case() {
            let json = serde_json::json!({
                "id": "x",
                "title": "Run",
                "categoryId": "gym",
                "dayIndex": 6,
                "startHour": 7,
                "duration": 1
            });
            let activity: Activity = serde_json::from_value(json).unwrap();
            assert_eq!(activity.category_id, "gym");
            assert_eq!(activity.day_index, 6);
        }

        #[test]
        fn test_format_hour() {
            assert_eq!(format_hour(0), "12AM");
            assert_eq!(format_hour(9), "9AM");
            assert_eq!(format_hour(12), "12PM");
            assert_eq!(format_hour(15), "3PM");
            assert_eq!(format_hour(24), "12PM");
        }
    }
}
