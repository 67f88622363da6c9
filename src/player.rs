// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Plays one note on an output.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::midi::{self, MidiOutput};
use crate::music::{pitch_name, NoteRequest};

/// Select the instrument, start the note, hold it, stop it.
///
/// `hold` is called once with the note length; the binary passes
/// `std::thread::sleep`. The note is stopped with a velocity-0 Note On.
/// The caller announces the note on stdout before opening the output.
pub fn play_note<F>(output: &mut dyn MidiOutput, request: &NoteRequest, hold: F) -> Result<()>
where
    F: FnOnce(Duration),
{
    info!(
        "Playing {} on {} (instrument {}, channel {})",
        pitch_name(request.pitch),
        output.describe(),
        request.instrument,
        request.channel
    );

    let select = midi::program_change(request.channel, request.instrument)?;
    output.send(&select).context("Failed to select instrument")?;

    let start = midi::note_on(request.channel, request.pitch, request.velocity)?;
    output.send(&start).context("Failed to start note")?;
    debug!("Note On sent, holding for {:?}", request.length);

    hold(request.length);

    let stop = midi::note_on(request.channel, request.pitch, 0)?;
    output.send(&stop).context("Failed to stop note")?;
    debug!("Note stopped");

    Ok(())
}
