// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Silent output: accepts every message and keeps it.

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use tracing::debug;

use super::MidiOutput;

/// Output that goes nowhere. Sent messages stay inspectable through
/// the shared log returned by [`NullOutput::sent`].
#[derive(Debug, Clone, Default)]
pub struct NullOutput {
    messages: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl NullOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every message sent so far
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }
}

impl MidiOutput for NullOutput {
    fn send(&mut self, message: &[u8]) -> Result<()> {
        debug!("Silent output: {:02X?}", message);
        self.messages
            .lock()
            .map_err(|_| anyhow!("Silent output log poisoned"))?
            .push(message.to_vec());
        Ok(())
    }

    fn describe(&self) -> String {
        "silent output".to_string()
    }
}
