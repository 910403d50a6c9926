//! Sound player implementation using rodio.
//!
//! This module provides the `RodioSoundPlayer` which synthesizes cue tones
//! as rodio sources.

use std::time::Duration;

use rodio::{OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{debug, warn};

use super::cue::{Cue, Tone};
use super::error::SoundError;

/// Gain applied per tone; chords layer two tones on top of each other.
const LAYER_GAIN: f32 = 0.5;

const SAMPLE_RATE: u32 = 48_000;

/// One synthesized tone: an oscillator shaped by the tone's envelope.
#[derive(Debug, Clone)]
struct Voice {
    tone: Tone,
    amplitude: f32,
    sample: u32,
    total_samples: u32,
}

impl Voice {
    fn new(tone: &Tone, amplitude: f32) -> Self {
        let total_samples = (tone.length().as_secs_f32() * SAMPLE_RATE as f32) as u32;
        Self {
            tone: *tone,
            amplitude,
            sample: 0,
            total_samples,
        }
    }
}

impl Iterator for Voice {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.sample >= self.total_samples {
            return None;
        }
        let t = self.sample as f32 / SAMPLE_RATE as f32;
        let phase = (t * self.tone.frequency).fract();
        self.sample += 1;
        Some(self.tone.waveform.sample(phase) * self.tone.gain_at(t) * self.amplitude)
    }
}

impl Source for Voice {
    fn current_frame_len(&self) -> Option<usize> {
        Some((self.total_samples - self.sample) as usize)
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(self.tone.length())
    }
}

/// A sound player that uses rodio for audio playback.
///
/// Playback is non-blocking: each tone goes to its own detached sink and
/// keeps playing after `play` returns.
pub struct RodioSoundPlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
    /// Overall loudness, 0.0-1.0.
    volume: f32,
}

impl RodioSoundPlayer {
    /// Creates a new sound player on the default output device.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new(volume: f32) -> Result<Self, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!("Audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
            volume: volume.clamp(0.0, 1.0),
        })
    }

    /// Plays a cue in the background.
    ///
    /// # Errors
    ///
    /// Returns an error if a sink cannot be created on the output stream.
    pub fn play(&self, cue: Cue) -> Result<(), SoundError> {
        debug!("Playing cue: {}", cue.name());
        for tone in cue.tones() {
            self.play_tone(tone)?;
        }
        Ok(())
    }

    fn play_tone(&self, tone: &Tone) -> Result<(), SoundError> {
        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| SoundError::StreamError(e.to_string()))?;

        let source = Voice::new(tone, self.volume * LAYER_GAIN).delay(tone.offset());

        sink.append(source);
        sink.detach(); // Non-blocking: sound continues after function returns
        Ok(())
    }
}

impl std::fmt::Debug for RodioSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSoundPlayer")
            .field("volume", &self.volume)
            .finish_non_exhaustive()
    }
}

/// Creates a sound player, returning None if audio is unavailable.
///
/// If audio initialization fails, a warning is logged and None is returned.
#[must_use]
pub fn try_create_player(volume: f32) -> Option<RodioSoundPlayer> {
    match RodioSoundPlayer::new(volume) {
        Ok(player) => Some(player),
        Err(e) => {
            warn!("Audio not available, sound disabled: {}", e);
            None
        }
    }
}
