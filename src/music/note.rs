// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! The one note to play, and the limits every field must respect.
//!
//! Flags and config values arrive as plain `u32`s (`RawNote`). They only
//! become a `NoteRequest` after `verify_limits` has checked each field
//! against its MIDI bit width.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Highest MIDI channel (4 bits)
pub const MAX_CHANNEL: u32 = 15;
/// Highest value of a 7-bit MIDI data byte
pub const MAX_DATA: u32 = 127;

/// A value fell outside its allowed range. The max is inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{name}, Current: {current}, Max: {max}")]
pub struct LimitError {
    pub name: String,
    pub current: u32,
    pub max: u32,
}

/// Check a single value against an inclusive maximum.
pub fn verify_limit(current: u32, max: u32, name: &str) -> Result<(), LimitError> {
    if current > max {
        return Err(LimitError {
            name: name.to_string(),
            current,
            max,
        });
    }
    Ok(())
}

/// Unchecked note values, as parsed from flags or config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawNote {
    pub channel: u32,
    pub instrument: u32,
    pub pitch: u32,
    pub velocity: u32,
    pub length_ms: u32,
}

impl Default for RawNote {
    fn default() -> Self {
        let request = NoteRequest::default();
        Self {
            channel: request.channel as u32,
            instrument: request.instrument as u32,
            pitch: request.pitch as u32,
            velocity: request.velocity as u32,
            length_ms: request.length.as_millis() as u32,
        }
    }
}

/// Verify every field of a raw note and narrow it to MIDI widths.
///
/// Fields are checked in flag order (channel, instrument, pitch,
/// velocity) and the first failure is reported under its flag name.
pub fn verify_limits(raw: &RawNote) -> Result<NoteRequest, LimitError> {
    verify_limit(raw.channel, MAX_CHANNEL, "-c")?;
    verify_limit(raw.instrument, MAX_DATA, "-i")?;
    verify_limit(raw.pitch, MAX_DATA, "-p")?;
    verify_limit(raw.velocity, MAX_DATA, "-v")?;

    Ok(NoteRequest {
        channel: raw.channel as u8,
        instrument: raw.instrument as u8,
        pitch: raw.pitch as u8,
        velocity: raw.velocity as u8,
        length: Duration::from_millis(raw.length_ms as u64),
    })
}

/// A validated note: which instrument, on which channel, how loud and how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteRequest {
    /// MIDI channel (0-15)
    pub channel: u8,
    /// General MIDI program (0-127), 0 is Grand Piano
    pub instrument: u8,
    /// Note number (0-127), 60 is Middle C
    pub pitch: u8,
    /// Velocity (0-127)
    pub velocity: u8,
    /// How long the note is held
    pub length: Duration,
}

impl Default for NoteRequest {
    fn default() -> Self {
        Self {
            channel: 0,
            instrument: 0,
            pitch: 60,
            velocity: 90,
            length: Duration::from_millis(3000),
        }
    }
}

impl NoteRequest {
    /// Velocity as a percentage of the loudest possible note
    pub fn loudness_percent(&self) -> f64 {
        self.velocity as f64 / MAX_DATA as f64 * 100.0
    }
}

impl fmt::Display for NoteRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Channel: {}, Instrument: {}, Pitch: {}, Velocity: {}, Length: {}",
            self.channel,
            self.instrument,
            self.pitch,
            self.velocity,
            self.length.as_millis()
        )
    }
}

const PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Name a MIDI note number in scientific pitch notation (60 = C4, 0 = C-1).
pub fn pitch_name(pitch: u8) -> String {
    let octave = (pitch / 12) as i8 - 1;
    format!("{}{}", PITCH_CLASSES[(pitch % 12) as usize], octave)
}
