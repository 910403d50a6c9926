//! Timer engine for focusplan.
//!
//! This module provides the interval-sequencing state machine:
//! - Loading a template and rewinding to its first interval
//! - Play / pause / reset / skip
//! - Drift-corrected ticking against an absolute clock anchor
//! - Auto-advance and session wrap-around with boundary notifications

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::types::{SessionTemplate, TimerState, TimerStatus};

use super::clock::{Clock, SystemClock};
use super::metrics::{self, TimerSnapshot};
use super::notifier::{Notifier, TimerEvent};

/// Milliseconds per whole second of countdown.
const MILLIS_PER_SECOND: i64 = 1_000;

// ============================================================================
// TimerEngine
// ============================================================================

/// Plays back a [`SessionTemplate`] one interval at a time.
///
/// Every operation is total: calls that make no sense in the current
/// state (playing with nothing loaded, skipping an empty template) are
/// silently ignored.
///
/// The engine does not schedule itself. A host calls [`TimerEngine::tick`]
/// frequently (e.g. every 100ms); each call converts the real time elapsed
/// since the anchor into whole seconds, so late or coalesced calls never
/// accumulate drift.
pub struct TimerEngine {
    /// Current playback state
    state: TimerState,
    /// Time source for the tick anchor
    clock: Box<dyn Clock>,
    /// Receives boundary events
    notifier: Box<dyn Notifier>,
    /// Epoch millis from which the next whole second is counted.
    /// Present only while running; clearing it cancels ticking.
    anchor: Option<i64>,
}

impl TimerEngine {
    /// Creates an idle engine.
    pub fn new(clock: impl Clock + 'static, notifier: impl Notifier + 'static) -> Self {
        Self {
            state: TimerState::idle(),
            clock: Box::new(clock),
            notifier: Box::new(notifier),
            anchor: None,
        }
    }

    /// Creates an idle engine driven by the wall clock.
    pub fn with_system_clock(notifier: impl Notifier + 'static) -> Self {
        Self::new(SystemClock, notifier)
    }

    /// Loads a template, replacing whatever was loaded before.
    ///
    /// Stops any active countdown and rewinds to the first interval.
    pub fn load_template(&mut self, template: Arc<SessionTemplate>) {
        self.cancel_ticking();
        debug!(
            "Loaded template '{}' ({} intervals)",
            template.name,
            template.len()
        );
        self.state = TimerState::loaded(template);
    }

    /// Starts or resumes the countdown.
    ///
    /// Ignored when nothing playable is loaded or the engine is already
    /// running.
    pub fn play(&mut self) {
        if !self.state.is_playable() {
            debug!("Play ignored: no playable template loaded");
            return;
        }
        if self.state.running {
            return;
        }

        self.state.running = true;
        self.anchor = Some(self.clock.now_millis());
        debug!(
            "Playing interval {} with {}s remaining",
            self.state.current_index, self.state.remaining_seconds
        );
    }

    /// Pauses the countdown. Pausing twice is the same as pausing once.
    pub fn pause(&mut self) {
        if self.state.running {
            debug!(
                "Paused with {}s remaining",
                self.state.remaining_seconds
            );
        }
        self.state.running = false;
        self.cancel_ticking();
    }

    /// Pauses when running, plays otherwise.
    pub fn toggle(&mut self) {
        if self.state.running {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Rewinds to the first interval of the loaded template, paused.
    ///
    /// The template itself stays loaded.
    pub fn reset(&mut self) {
        self.cancel_ticking();
        let remaining = self
            .state
            .template
            .as_ref()
            .map_or(0, |t| t.first_duration());

        self.state.running = false;
        self.state.current_index = 0;
        self.state.remaining_seconds = remaining;
        debug!("Reset to first interval");
    }

    /// Ends the current interval immediately.
    ///
    /// Identical to the interval running out: moves to the next interval
    /// keeping the running flag, or completes the session and rewinds.
    pub fn skip_interval(&mut self) {
        self.advance();
    }

    /// Consumes the whole seconds elapsed since the anchor.
    ///
    /// The sub-second remainder stays on the anchor for the next call. Only
    /// one boundary is crossed per call; seconds elapsed past the end of an
    /// interval are not carried into the next one.
    pub fn tick(&mut self) {
        if !self.state.running {
            return;
        }

        let now = self.clock.now_millis();
        let anchor = *self.anchor.get_or_insert(now);
        let elapsed = now - anchor;

        if elapsed < 0 {
            // Clock went backwards; count from the new "now".
            debug!("Clock moved back {}ms, re-anchoring", -elapsed);
            self.anchor = Some(now);
        } else if elapsed >= MILLIS_PER_SECOND {
            let whole_seconds = elapsed / MILLIS_PER_SECOND;
            self.anchor = Some(anchor + whole_seconds * MILLIS_PER_SECOND);

            let consumed = u32::try_from(whole_seconds).unwrap_or(u32::MAX);
            self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(consumed);
        }

        if self.state.remaining_seconds == 0 {
            self.advance();
        }
    }

    /// Moves to the next interval, or wraps to the start when exhausted.
    fn advance(&mut self) {
        let Some(template) = self.state.template.clone() else {
            return;
        };
        if template.is_empty() {
            return;
        }

        let next = self.state.current_index + 1;
        if let Some(interval) = template.interval(next) {
            self.state.current_index = next;
            self.state.remaining_seconds = interval.duration;
            debug!(
                "Advanced to interval {} '{}' ({}s)",
                next, interval.name, interval.duration
            );
            self.emit(TimerEvent::IntervalAdvanced { index: next });
        } else {
            self.cancel_ticking();
            self.state.running = false;
            self.state.current_index = 0;
            self.state.remaining_seconds = template.first_duration();
            info!("Session '{}' complete", template.name);
            self.emit(TimerEvent::SessionComplete);
        }
    }

    /// Delivers an event, discarding notifier failures.
    fn emit(&self, event: TimerEvent) {
        if let Err(e) = self.notifier.notify(&event) {
            warn!("Notifier failed for {:?}: {}", event, e);
        }
    }

    fn cancel_ticking(&mut self) {
        self.anchor = None;
    }

    /// Returns a reference to the current state.
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Returns the coarse status.
    pub fn status(&self) -> TimerStatus {
        self.state.status()
    }

    /// Computes the presentation values for the current state.
    pub fn snapshot(&self) -> TimerSnapshot {
        metrics::snapshot(&self.state)
    }

    /// Returns true while a tick anchor is installed.
    pub fn is_ticking(&self) -> bool {
        self.anchor.is_some()
    }

    /// Returns a mutable reference to the state (for testing).
    #[cfg(test)]
    pub fn state_mut(&mut self) -> &mut TimerState {
        &mut self.state
    }
}

impl std::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("state", &self.state)
            .field("anchor", &self.anchor)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
