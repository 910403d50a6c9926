//! Audible cue definitions.
//!
//! Each cue is a fixed set of tones with start offsets. Tones that share an
//! offset sound together as a chord: a triangle lead over a sine harmony.

use std::f32::consts::TAU;
use std::time::Duration;

use crate::timer::TimerEvent;

/// Rise time from silence to full level at the start of every tone.
pub const ATTACK: Duration = Duration::from_millis(20);

/// Length of the fade at the end of every tone.
pub const RELEASE: Duration = Duration::from_millis(100);

/// Level the release fades down to before the tone stops.
const RELEASE_FLOOR: f32 = 0.01;

/// Oscillator shape of a tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
}

impl Waveform {
    /// Sample value in -1.0..=1.0 at `phase` (fraction of a cycle, 0.0..1.0).
    pub fn sample(&self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (TAU * phase).sin(),
            Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
        }
    }
}

/// A single tone of a cue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Pitch in Hz
    pub frequency: f32,
    /// Start time relative to the beginning of the cue, in milliseconds
    pub offset_ms: u64,
    /// Length in milliseconds
    pub length_ms: u64,
    pub waveform: Waveform,
}

impl Tone {
    const fn lead(frequency: f32, offset_ms: u64, length_ms: u64) -> Self {
        Self {
            frequency,
            offset_ms,
            length_ms,
            waveform: Waveform::Triangle,
        }
    }

    const fn harmony(frequency: f32, offset_ms: u64, length_ms: u64) -> Self {
        Self {
            frequency,
            offset_ms,
            length_ms,
            waveform: Waveform::Sine,
        }
    }

    pub fn offset(&self) -> Duration {
        Duration::from_millis(self.offset_ms)
    }

    pub fn length(&self) -> Duration {
        Duration::from_millis(self.length_ms)
    }

    /// Envelope level at `elapsed` seconds into the tone.
    ///
    /// Linear attack, flat sustain, then an exponential release over the
    /// last [`RELEASE`] down to 1% before the tone stops. Zero outside the
    /// tone.
    pub fn gain_at(&self, elapsed: f32) -> f32 {
        let length = self.length().as_secs_f32();
        if elapsed < 0.0 || elapsed >= length {
            return 0.0;
        }

        let attack = ATTACK.as_secs_f32();
        let release_start = (length - RELEASE.as_secs_f32()).max(0.0);
        if elapsed >= release_start {
            let progress = (elapsed - release_start) / (length - release_start);
            RELEASE_FLOOR.powf(progress)
        } else if elapsed < attack {
            elapsed / attack
        } else {
            1.0
        }
    }
}

/// Three-part A5 / C#6 / A5 chime with lower-octave harmony.
const INTERVAL_CHIME: &[Tone] = &[
    Tone::lead(880.0, 0, 250),
    Tone::harmony(440.0, 0, 250),
    Tone::lead(1108.73, 300, 350),
    Tone::harmony(554.37, 300, 350),
    Tone::lead(880.0, 700, 250),
    Tone::harmony(440.0, 700, 250),
];

/// Ascending C major arpeggio (C5 E5 G5 C6) over a bass layer.
const SESSION_FANFARE: &[Tone] = &[
    Tone::lead(523.25, 0, 300),
    Tone::lead(659.25, 250, 300),
    Tone::lead(783.99, 500, 300),
    Tone::lead(1046.50, 750, 500),
    Tone::harmony(261.63, 0, 300),
    Tone::harmony(329.63, 250, 300),
    Tone::harmony(392.00, 500, 300),
    Tone::harmony(523.25, 750, 500),
];

/// The cues the timer can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Played when moving to the next interval
    IntervalChime,
    /// Played when the whole session has finished
    SessionFanfare,
}

impl Cue {
    /// Picks the cue for an engine event.
    pub fn for_event(event: &TimerEvent) -> Self {
        match event {
            TimerEvent::IntervalAdvanced { .. } => Cue::IntervalChime,
            TimerEvent::SessionComplete => Cue::SessionFanfare,
        }
    }

    pub fn tones(&self) -> &'static [Tone] {
        match self {
            Cue::IntervalChime => INTERVAL_CHIME,
            Cue::SessionFanfare => SESSION_FANFARE,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Cue::IntervalChime => "interval-chime",
            Cue::SessionFanfare => "session-fanfare",
        }
    }

    /// Time from the first tone starting to the last tone ending.
    pub fn length(&self) -> Duration {
        let end = self
            .tones()
            .iter()
            .map(|t| t.offset_ms + t.length_ms)
            .max()
            .unwrap_or(0);
        Duration::from_millis(end)
    }
}
