//! Presentation values derived from [`TimerState`].
//!
//! Everything here is a pure function of the state; callers recompute on
//! every observation instead of caching.

use serde::Serialize;

use crate::types::{Interval, IntervalKind, TimerState, TimerStatus};

/// The interval at the current position, if a template is loaded.
pub fn current_interval(state: &TimerState) -> Option<&Interval> {
    state
        .template
        .as_ref()
        .and_then(|t| t.interval(state.current_index))
}

/// Completion of the current interval in percent (0-100).
///
/// A zero-length interval counts as complete.
pub fn interval_progress_percent(state: &TimerState) -> f64 {
    let Some(interval) = current_interval(state) else {
        return 0.0;
    };
    if interval.duration == 0 {
        return 100.0;
    }
    let duration = f64::from(interval.duration);
    let elapsed = duration - f64::from(state.remaining_seconds);
    (elapsed / duration * 100.0).clamp(0.0, 100.0)
}

/// Sum of all interval durations of the loaded template.
pub fn total_session_seconds(state: &TimerState) -> u64 {
    state.template.as_ref().map_or(0, |t| t.total_seconds())
}

/// Seconds played so far: every interval before the current one plus the
/// elapsed part of the current one.
pub fn elapsed_session_seconds(state: &TimerState) -> u64 {
    let Some(template) = state.template.as_ref() else {
        return 0;
    };
    let before: u64 = template
        .intervals
        .iter()
        .take(state.current_index)
        .map(|i| u64::from(i.duration))
        .sum();
    let current = current_interval(state)
        .map_or(0, |i| u64::from(i.duration.saturating_sub(state.remaining_seconds)));
    before + current
}

/// Completion of the whole session in percent (0-100).
pub fn session_progress_percent(state: &TimerState) -> f64 {
    let total = total_session_seconds(state);
    if total == 0 {
        return 0.0;
    }
    (elapsed_session_seconds(state) as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}

/// Formats seconds as `MM:SS`, or `HH:MM:SS` from one hour up.
pub fn format_clock(total_seconds: u32) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Formats seconds compactly for listings: `1h 5m`, `25m`, `45s`, `0s`.
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    let mut parts = Vec::with_capacity(3);
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if seconds > 0 {
        parts.push(format!("{seconds}s"));
    }

    if parts.is_empty() {
        "0s".to_string()
    } else {
        parts.join(" ")
    }
}

// ============================================================================
// TimerSnapshot
// ============================================================================

/// Everything a view needs to draw the timer, computed in one go.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub status: TimerStatus,
    pub template_name: Option<String>,
    pub current_index: usize,
    pub interval_count: usize,
    pub interval_name: Option<String>,
    pub interval_kind: Option<IntervalKind>,
    pub remaining_seconds: u32,
    pub formatted_remaining: String,
    pub interval_progress: f64,
    pub elapsed_session_seconds: u64,
    pub total_session_seconds: u64,
    pub session_progress: f64,
}

/// Builds a [`TimerSnapshot`] from the state.
pub fn snapshot(state: &TimerState) -> TimerSnapshot {
    let interval = current_interval(state);
    TimerSnapshot {
        status: state.status(),
        template_name: state.template.as_ref().map(|t| t.name.clone()),
        current_index: state.current_index,
        interval_count: state.template.as_ref().map_or(0, |t| t.len()),
        interval_name: interval.map(|i| i.name.clone()),
        interval_kind: interval.map(|i| i.kind),
        remaining_seconds: state.remaining_seconds,
        formatted_remaining: format_clock(state.remaining_seconds),
        interval_progress: interval_progress_percent(state),
        elapsed_session_seconds: elapsed_session_seconds(state),
        total_session_seconds: total_session_seconds(state),
        session_progress: session_progress_percent(state),
    }
}

// ============================================================================
// Tests
// ============================================================================
