// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! MIDI output abstraction layer.
//!
//! This module provides a trait-based abstraction for MIDI output,
//! allowing a live port (midir) or a silent sink to be used
//! interchangeably, and the checked builders for the messages a single
//! note needs.

#[cfg(feature = "live")]
pub mod live;
pub mod null;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[cfg(feature = "live")]
pub use live::LiveOutput;
pub use null::NullOutput;

/// Trait for MIDI output implementations.
pub trait MidiOutput {
    /// Send a MIDI message immediately.
    ///
    /// # Arguments
    /// * `message` - Raw MIDI bytes (e.g., `[0x90, 60, 127]` for Note On)
    fn send(&mut self, message: &[u8]) -> Result<()>;

    /// Human-readable name of where messages go
    fn describe(&self) -> String;
}

/// MIDI message constants
pub mod messages {
    // Channel Voice Messages (upper nibble, lower nibble is channel 0-15)
    pub const NOTE_OFF: u8 = 0x80;
    pub const NOTE_ON: u8 = 0x90;
    pub const PROGRAM_CHANGE: u8 = 0xC0;
}

/// A message field exceeded its bit width.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MidiError {
    #[error("{field} {value} out of range (max {max})")]
    OutOfRange {
        field: &'static str,
        value: u8,
        max: u8,
    },
}

fn check(field: &'static str, value: u8, max: u8) -> Result<u8, MidiError> {
    if value > max {
        return Err(MidiError::OutOfRange { field, value, max });
    }
    Ok(value)
}

/// Select an instrument on a channel: `[0xC0 | channel, program]`
pub fn program_change(channel: u8, program: u8) -> Result<[u8; 2], MidiError> {
    let channel = check("channel", channel, 15)?;
    let program = check("instrument", program, 127)?;
    Ok([messages::PROGRAM_CHANGE | channel, program])
}

/// Start a note: `[0x90 | channel, pitch, velocity]`
///
/// A velocity of 0 stops the note.
pub fn note_on(channel: u8, pitch: u8, velocity: u8) -> Result<[u8; 3], MidiError> {
    let channel = check("channel", channel, 15)?;
    let pitch = check("pitch", pitch, 127)?;
    let velocity = check("velocity", velocity, 127)?;
    Ok([messages::NOTE_ON | channel, pitch, velocity])
}

/// Which output a note is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Live port when one opens, otherwise silent
    #[default]
    Auto,
    /// Live port or fail
    Live,
    /// Silent sink
    Null,
}

impl Backend {
    /// Parse a backend name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "auto" => Some(Backend::Auto),
            "live" => Some(Backend::Live),
            "null" | "none" => Some(Backend::Null),
            _ => None,
        }
    }
}

/// Port selector: an index into the port list, or part of a port name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortSelector {
    Index(usize),
    Name(String),
}

impl PortSelector {
    /// Digits select by index, anything else by name
    pub fn parse(value: &str) -> Self {
        match value.trim().parse::<usize>() {
            Ok(index) => PortSelector::Index(index),
            Err(_) => PortSelector::Name(value.trim().to_string()),
        }
    }
}

impl Default for PortSelector {
    fn default() -> Self {
        PortSelector::Index(0)
    }
}

/// Open the output chosen by `backend`.
pub fn open_output(backend: Backend, port: &PortSelector) -> Result<Box<dyn MidiOutput>> {
    match backend {
        Backend::Null => Ok(Box::new(NullOutput::new())),
        Backend::Live => open_live(port),
        Backend::Auto => match open_live(port) {
            Ok(output) => Ok(output),
            Err(e) => {
                warn!("No MIDI output available ({:#}), playing silently", e);
                Ok(Box::new(NullOutput::new()))
            }
        },
    }
}

#[cfg(feature = "live")]
fn open_live(port: &PortSelector) -> Result<Box<dyn MidiOutput>> {
    let output = LiveOutput::connect(port)?;
    debug!("Connected to {}", output.describe());
    Ok(Box::new(output))
}

#[cfg(not(feature = "live"))]
fn open_live(port: &PortSelector) -> Result<Box<dyn MidiOutput>> {
    debug!("Live output requested for {:?}", port);
    Err(anyhow::anyhow!("built without live MIDI support"))
}

/// List available output ports as (index, name) pairs.
pub fn list_ports() -> Result<Vec<(usize, String)>> {
    #[cfg(feature = "live")]
    {
        live::list_ports()
    }
    #[cfg(not(feature = "live"))]
    {
        Err(anyhow::anyhow!("built without live MIDI support"))
    }
}

/// Print all available MIDI output ports to stdout.
pub fn print_ports() -> Result<()> {
    let ports = list_ports()?;
    if ports.is_empty() {
        println!("No MIDI output ports found.");
    } else {
        println!("Available MIDI output ports:");
        for (i, name) in ports {
            println!("  {}: {}", i, name);
        }
    }
    Ok(())
}
