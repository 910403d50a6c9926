//! Async driver for the timer engine.
//!
//! One task owns the engine and serializes every mutation: scheduled ticks
//! from a tokio interval and user commands from a channel. No locking is
//! needed because nothing else touches the engine while the loop runs.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::debug;

use crate::types::SessionTemplate;

use super::engine::TimerEngine;
use super::metrics::TimerSnapshot;

/// Default period between scheduled tick checks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// User operations delivered to a running session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Play when paused, pause when playing
    Toggle,
    Play,
    Pause,
    Reset,
    Skip,
    /// Replace the loaded template
    Load(Arc<SessionTemplate>),
    /// Leave the loop
    Quit,
}

/// Applies a single command to the engine.
///
/// Returns false for [`SessionCommand::Quit`].
pub fn apply_command(engine: &mut TimerEngine, command: SessionCommand) -> bool {
    match command {
        SessionCommand::Toggle => engine.toggle(),
        SessionCommand::Play => engine.play(),
        SessionCommand::Pause => engine.pause(),
        SessionCommand::Reset => engine.reset(),
        SessionCommand::Skip => engine.skip_interval(),
        SessionCommand::Load(template) => engine.load_template(template),
        SessionCommand::Quit => return false,
    }
    true
}

/// Runs the engine until `Quit` arrives or the command channel closes.
///
/// `observe` receives a fresh snapshot once at startup, after every applied
/// command, and after any tick that changed the snapshot.
pub async fn run_session<F>(
    engine: &mut TimerEngine,
    mut commands: mpsc::UnboundedReceiver<SessionCommand>,
    tick_interval: Duration,
    mut observe: F,
) where
    F: FnMut(&TimerSnapshot),
{
    let mut ticker = interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut last = engine.snapshot();
    observe(&last);

    loop {
        let commanded = tokio::select! {
            _ = ticker.tick() => {
                if !engine.state().running {
                    continue;
                }
                engine.tick();
                false
            }
            command = commands.recv() => {
                let Some(command) = command else {
                    debug!("Command channel closed, ending session");
                    break;
                };
                debug!("Session command: {:?}", command);
                if !apply_command(engine, command) {
                    break;
                }
                true
            }
        };

        let snapshot = engine.snapshot();
        if commanded || snapshot != last {
            observe(&snapshot);
            last = snapshot;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
