// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Standard MIDI file export.
//!
//! Writes the note as a Type 0 MIDI file instead of playing it.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use crate::midi::messages;
use crate::music::NoteRequest;

/// Ticks per quarter note
pub const PPQN: u16 = 480;
/// Tempo written into the file
pub const TEMPO_BPM: f64 = 120.0;
/// Largest delta time a variable-length quantity can hold (28 bits)
pub const MAX_DELTA_TICKS: u64 = 0x0FFF_FFFF;

/// MIDI event for export
#[derive(Debug, Clone, PartialEq)]
struct MidiExportEvent {
    /// Absolute tick
    tick: u64,
    /// Event data
    data: Vec<u8>,
}

impl MidiExportEvent {
    fn note_on(tick: u64, channel: u8, note: u8, velocity: u8) -> Self {
        Self {
            tick,
            data: vec![
                messages::NOTE_ON | (channel & 0x0F),
                note & 0x7F,
                velocity & 0x7F,
            ],
        }
    }

    fn note_off(tick: u64, channel: u8, note: u8) -> Self {
        Self {
            tick,
            data: vec![messages::NOTE_OFF | (channel & 0x0F), note & 0x7F, 0],
        }
    }

    fn program_change(tick: u64, channel: u8, program: u8) -> Self {
        Self {
            tick,
            data: vec![messages::PROGRAM_CHANGE | (channel & 0x0F), program & 0x7F],
        }
    }

    fn tempo(tick: u64, bpm: f64) -> Self {
        let microseconds = (60_000_000.0 / bpm) as u32;
        Self {
            tick,
            data: vec![
                0xFF, 0x51, 0x03,
                ((microseconds >> 16) & 0xFF) as u8,
                ((microseconds >> 8) & 0xFF) as u8,
                (microseconds & 0xFF) as u8,
            ],
        }
    }

    fn track_name(tick: u64, name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut data = vec![0xFF, 0x03];
        write_variable_length(&mut data, bytes.len() as u32);
        data.extend_from_slice(bytes);
        Self { tick, data }
    }
}

/// Convert a wall-clock length to ticks at the file's tempo, rounded.
pub fn duration_to_ticks(length: Duration) -> u64 {
    let ticks_per_second = PPQN as f64 * TEMPO_BPM / 60.0;
    (length.as_secs_f64() * ticks_per_second).round() as u64
}

/// Exporter for a single note
#[derive(Debug, Clone)]
pub struct NoteExporter {
    request: NoteRequest,
    name: String,
}

impl NoteExporter {
    pub fn new(request: NoteRequest) -> Self {
        Self {
            request,
            name: "One Note".to_string(),
        }
    }

    /// Set the track name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Export to file. Nothing is created if the note cannot be encoded.
    pub fn export<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut buffer = Vec::new();
        self.write(&mut buffer)?;
        fs::write(path, buffer)
    }

    /// Write MIDI data to writer
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write_header(writer, 0, 1)?;
        write_track(writer, &self.events())
    }

    fn events(&self) -> Vec<MidiExportEvent> {
        let r = &self.request;
        let end = duration_to_ticks(r.length);
        vec![
            MidiExportEvent::tempo(0, TEMPO_BPM),
            MidiExportEvent::track_name(0, &self.name),
            MidiExportEvent::program_change(0, r.channel, r.instrument),
            MidiExportEvent::note_on(0, r.channel, r.pitch, r.velocity),
            MidiExportEvent::note_off(end, r.channel, r.pitch),
        ]
    }
}

/// Write MIDI file header chunk
fn write_header<W: Write>(writer: &mut W, format: u16, num_tracks: u16) -> io::Result<()> {
    writer.write_all(b"MThd")?;
    // Chunk length (always 6)
    writer.write_all(&[0, 0, 0, 6])?;
    writer.write_all(&format.to_be_bytes())?;
    writer.write_all(&num_tracks.to_be_bytes())?;
    writer.write_all(&PPQN.to_be_bytes())?;
    Ok(())
}

/// Write a track chunk. Events must be sorted by tick.
fn write_track<W: Write>(writer: &mut W, events: &[MidiExportEvent]) -> io::Result<()> {
    let mut track_data = Vec::new();
    let mut last_tick = 0u64;

    for event in events {
        let delta = event.tick.saturating_sub(last_tick);
        if delta > MAX_DELTA_TICKS {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "note too long for a MIDI delta time ({} ticks, max {})",
                    delta, MAX_DELTA_TICKS
                ),
            ));
        }
        write_variable_length(&mut track_data, delta as u32);
        track_data.extend_from_slice(&event.data);
        last_tick = event.tick;
    }

    // End of track
    write_variable_length(&mut track_data, 0);
    track_data.extend_from_slice(&[0xFF, 0x2F, 0x00]);

    writer.write_all(b"MTrk")?;
    writer.write_all(&(track_data.len() as u32).to_be_bytes())?;
    writer.write_all(&track_data)?;

    Ok(())
}

/// Append a variable-length quantity
fn write_variable_length(buffer: &mut Vec<u8>, mut value: u32) {
    let mut bytes = vec![(value & 0x7F) as u8];
    value >>= 7;

    while value > 0 {
        bytes.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }

    bytes.reverse();
    buffer.extend_from_slice(&bytes);
}
