//! Sound playback system for focusplan.
//!
//! This module provides the audible side of timer notifications:
//!
//! - Synthesized cues for interval changes and session completion
//! - Non-blocking audio playback
//! - Graceful degradation when audio is unavailable
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   TimerEngine    │
//! └────────┬─────────┘
//!          │ TimerEvent
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │  SoundNotifier   │────▶│       Cue        │
//! └────────┬─────────┘     │ (tone sequence)  │
//!          │               └──────────────────┘
//!          ▼
//! ┌──────────────────┐
//! │   SoundPlayer    │ ← rodio, or a mock in tests
//! └──────────────────┘
//! ```

use std::panic::{self, AssertUnwindSafe};

mod cue;
mod error;
mod player;

pub use cue::{Cue, Tone, Waveform};
pub use error::SoundError;
pub use player::{try_create_player, RodioSoundPlayer};

use crate::timer::{Notifier, NotifyError, TimerEvent};

/// Trait for sound playback implementations.
///
/// This trait abstracts the sound playback functionality, allowing for
/// different implementations (e.g., rodio-based, mock for testing).
pub trait SoundPlayer {
    /// Plays a cue.
    ///
    /// This method should be non-blocking; the sound plays in the background.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails.
    fn play(&self, cue: Cue) -> Result<(), SoundError>;
}

impl SoundPlayer for RodioSoundPlayer {
    fn play(&self, cue: Cue) -> Result<(), SoundError> {
        RodioSoundPlayer::play(self, cue)
    }
}

/// Mock sound player for testing.
#[derive(Debug, Default)]
pub struct MockSoundPlayer {
    play_calls: std::sync::Mutex<Vec<Cue>>,
    should_fail: std::sync::atomic::AtomicBool,
    should_panic: std::sync::atomic::AtomicBool,
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    /// Makes `play` panic, like a crashing audio backend.
    pub fn set_should_panic(&self, should_panic: bool) {
        self.should_panic
            .store(should_panic, std::sync::atomic::Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<Cue> {
        self.play_calls
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, cue: Cue) -> Result<(), SoundError> {
        if self.should_panic.load(std::sync::atomic::Ordering::SeqCst) {
            panic!("mock audio backend crashed");
        }
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        if let Ok(mut calls) = self.play_calls.lock() {
            calls.push(cue);
        }
        Ok(())
    }
}

impl<P: SoundPlayer + ?Sized> SoundPlayer for std::sync::Arc<P> {
    fn play(&self, cue: Cue) -> Result<(), SoundError> {
        (**self).play(cue)
    }
}

// ============================================================================
// SoundNotifier
// ============================================================================

/// Plays a cue for every engine boundary event.
///
/// A player that panics is reported as a failed notification, so the
/// engine's state update is never interrupted by the audio backend.
#[derive(Debug)]
pub struct SoundNotifier<P> {
    player: P,
}

impl<P: SoundPlayer> SoundNotifier<P> {
    pub fn new(player: P) -> Self {
        Self { player }
    }

    pub fn player(&self) -> &P {
        &self.player
    }
}

impl<P: SoundPlayer> Notifier for SoundNotifier<P> {
    fn notify(&self, event: &TimerEvent) -> Result<(), NotifyError> {
        let cue = Cue::for_event(event);
        match panic::catch_unwind(AssertUnwindSafe(|| self.player.play(cue))) {
            Ok(result) => result.map_err(|e| NotifyError::Sound(e.to_string())),
            Err(_) => Err(NotifyError::Sound(format!(
                "audio backend panicked while playing {}",
                cue.name()
            ))),
        }
    }
}
