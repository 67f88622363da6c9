// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Live MIDI output through midir.
//!
//! This module provides a midir implementation of the `MidiOutput` trait,
//! sending to a port of the system MIDI layer (ALSA, Core MIDI, WinMM).

use anyhow::{anyhow, Context, Result};
use midir::{MidiOutput as MidirClient, MidiOutputConnection};

use super::{MidiOutput, PortSelector};

const CLIENT_NAME: &str = "one-note-midi";

/// Live midir output implementation.
pub struct LiveOutput {
    connection: Option<MidiOutputConnection>,
    port_name: String,
}

impl LiveOutput {
    /// Create a new output connected to the selected port.
    ///
    /// # Returns
    /// * `Ok(LiveOutput)` on success
    /// * `Err` if the client cannot be created or no port matches
    pub fn connect(selector: &PortSelector) -> Result<Self> {
        let client = MidirClient::new(CLIENT_NAME)
            .map_err(|e| anyhow!("Failed to create MIDI client: {}", e))?;

        let ports = client.ports();
        if ports.is_empty() {
            return Err(anyhow!("No MIDI output ports found"));
        }

        let names: Vec<String> = ports
            .iter()
            .enumerate()
            .map(|(i, p)| client.port_name(p).unwrap_or_else(|_| format!("Unknown {}", i)))
            .collect();

        let index = match selector {
            PortSelector::Index(index) => {
                if *index >= ports.len() {
                    return Err(anyhow!(
                        "MIDI output port {} not found (only {} available)",
                        index,
                        ports.len()
                    ));
                }
                *index
            }
            PortSelector::Name(name) => find_by_name(&names, name)
                .ok_or_else(|| anyhow!("No MIDI output port matching '{}' found", name))?,
        };

        let connection = client
            .connect(&ports[index], CLIENT_NAME)
            .map_err(|e| anyhow!("Failed to connect to '{}': {}", names[index], e))?;

        Ok(Self {
            connection: Some(connection),
            port_name: names[index].clone(),
        })
    }
}

impl MidiOutput for LiveOutput {
    fn send(&mut self, message: &[u8]) -> Result<()> {
        let connection = self
            .connection
            .as_mut()
            .context("MIDI connection already closed")?;
        connection
            .send(message)
            .map_err(|e| anyhow!("Failed to send MIDI message: {}", e))
    }

    fn describe(&self) -> String {
        format!("MIDI port '{}'", self.port_name)
    }
}

impl Drop for LiveOutput {
    fn drop(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.close();
        }
    }
}

/// Index of the first name containing `fragment`, ignoring case.
fn find_by_name(names: &[String], fragment: &str) -> Option<usize> {
    let fragment = fragment.to_lowercase();
    names
        .iter()
        .position(|name| name.to_lowercase().contains(&fragment))
}

/// List all available MIDI output ports.
///
/// # Returns
/// A vector of (index, name) tuples.
pub fn list_ports() -> Result<Vec<(usize, String)>> {
    let client = MidirClient::new(CLIENT_NAME)
        .map_err(|e| anyhow!("Failed to create MIDI client: {}", e))?;

    let result = client
        .ports()
        .iter()
        .enumerate()
        .map(|(i, port)| {
            let name = client
                .port_name(port)
                .unwrap_or_else(|_| format!("Unknown {}", i));
            (i, name)
        })
        .collect();

    Ok(result)
}
