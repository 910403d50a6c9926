//! Boundary notifications emitted by the timer engine.
//!
//! A notifier is fire-and-forget: the engine calls it once per interval
//! change or session completion, logs any error and carries on.

use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::mpsc;

// ============================================================================
// TimerEvent
// ============================================================================

/// Boundary crossings of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Moved on to the interval at `index`
    IntervalAdvanced {
        /// Index of the interval now playing
        index: usize,
    },
    /// Last interval finished; the engine rewound to the start, paused
    SessionComplete,
}

// ============================================================================
// Notifier
// ============================================================================

/// Errors a notifier may report. The engine never propagates them.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The receiving side of a channel has gone away.
    #[error("event receiver closed")]
    Closed,

    /// Audio cue could not be played.
    #[error("sound cue failed: {0}")]
    Sound(String),
}

/// Receives engine boundary events.
pub trait Notifier {
    fn notify(&self, event: &TimerEvent) -> Result<(), NotifyError>;
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, event: &TimerEvent) -> Result<(), NotifyError> {
        (**self).notify(event)
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&self, event: &TimerEvent) -> Result<(), NotifyError> {
        (**self).notify(event)
    }
}

/// Notifier that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _event: &TimerEvent) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Forwards events into a tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<TimerEvent>,
}

impl ChannelNotifier {
    pub fn new(tx: mpsc::UnboundedSender<TimerEvent>) -> Self {
        Self { tx }
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, event: &TimerEvent) -> Result<(), NotifyError> {
        self.tx.send(*event).map_err(|_| NotifyError::Closed)
    }
}

/// Fans an event out to several notifiers.
///
/// Every notifier is called even if an earlier one fails; the first error
/// is returned.
#[derive(Default)]
pub struct Notifiers {
    inner: Vec<Box<dyn Notifier>>,
}

impl Notifiers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a notifier to the set.
    #[must_use]
    pub fn with(mut self, notifier: impl Notifier + 'static) -> Self {
        self.inner.push(Box::new(notifier));
        self
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Notifier for Notifiers {
    fn notify(&self, event: &TimerEvent) -> Result<(), NotifyError> {
        let mut first_error = None;
        for notifier in &self.inner {
            if let Err(e) = notifier.notify(event) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for Notifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifiers")
            .field("len", &self.inner.len())
            .finish()
    }
}

/// Records every event it receives. Test double.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<TimerEvent>>>,
    should_fail: Arc<std::sync::atomic::AtomicBool>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later `notify` record the event and then fail.
    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    #[must_use]
    pub fn events(&self) -> Vec<TimerEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Number of `IntervalAdvanced` events seen.
    #[must_use]
    pub fn advanced_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, TimerEvent::IntervalAdvanced { .. }))
            .count()
    }

    /// Number of `SessionComplete` events seen.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, TimerEvent::SessionComplete))
            .count()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: &TimerEvent) -> Result<(), NotifyError> {
        if let Ok(mut events) = self.events.lock() {
            events.push(*event);
        }
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(NotifyError::Sound("mock failure".to_string()));
        }
        Ok(())
    }
}
