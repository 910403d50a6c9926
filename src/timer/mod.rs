//! Timer module for focusplan.
//!
//! This module contains the interval timer:
//! - `clock`: Time sources (wall clock and a manual clock for simulations)
//! - `notifier`: Boundary events and their receivers
//! - `engine`: The playback state machine
//! - `metrics`: Pure presentation values derived from engine state
//! - `runner`: Async loop driving ticks and user commands

pub mod clock;
pub mod engine;
pub mod metrics;
pub mod notifier;
pub mod runner;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::TimerEngine;
pub use metrics::{format_clock, format_duration, TimerSnapshot};
pub use notifier::{
    ChannelNotifier, Notifier, Notifiers, NotifyError, RecordingNotifier, SilentNotifier,
    TimerEvent,
};
pub use runner::{apply_command, run_session, SessionCommand, DEFAULT_TICK_INTERVAL};
