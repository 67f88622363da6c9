// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Command-line flags.
//!
//! Short flags take their value from the next argument or attached
//! (`-c 5` and `-c5` are the same). Parsing only checks that values are
//! numbers; ranges are checked later, once config defaults are known.

use std::ffi::OsString;
use std::path::PathBuf;

use thiserror::Error;

use crate::music::{verify_limits, LimitError, NoteRequest, RawNote};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgError {
    #[error("{0} requires a value")]
    MissingValue(String),
    #[error("Could not convert: {flag} = {value}")]
    InvalidValue { flag: String, value: String },
    #[error("The following argument was not expected: {0}")]
    Unexpected(String),
    #[error("{0} given more than once")]
    Repeated(String),
}

/// What the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    ListPorts,
    Play(PlayArgs),
}

/// Flags for playing (or exporting) the note. `None` means "use the default".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayArgs {
    pub channel: Option<u32>,
    pub instrument: Option<u32>,
    pub pitch: Option<u32>,
    pub velocity: Option<u32>,
    pub length_ms: Option<u32>,
    /// `-d`: port index or name fragment
    pub port: Option<String>,
    /// `-o`: write a MIDI file instead of playing
    pub output_file: Option<PathBuf>,
}

impl PlayArgs {
    /// Fill unset flags from `defaults` and check every limit.
    pub fn resolve(&self, defaults: &RawNote) -> Result<NoteRequest, LimitError> {
        let raw = RawNote {
            channel: self.channel.unwrap_or(defaults.channel),
            instrument: self.instrument.unwrap_or(defaults.instrument),
            pitch: self.pitch.unwrap_or(defaults.pitch),
            velocity: self.velocity.unwrap_or(defaults.velocity),
            length_ms: self.length_ms.unwrap_or(defaults.length_ms),
        };
        verify_limits(&raw)
    }
}

/// Convert OS arguments to strings. A non-UTF-8 argument is unexpected.
pub fn utf8_args<I>(args: I) -> Result<Vec<String>, ArgError>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            arg.into_string()
                .map_err(|arg| ArgError::Unexpected(arg.to_string_lossy().into_owned()))
        })
        .collect()
}

fn is_help(arg: &str) -> bool {
    matches!(arg, "-?" | "-h" | "--help")
}

/// Parse arguments (without the program name).
pub fn parse<I, S>(args: I) -> Result<Command, ArgError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();

    if args.iter().any(|a| is_help(a)) {
        return Ok(Command::Help);
    }
    if args.iter().any(|a| a == "--list-midi") {
        return Ok(Command::ListPorts);
    }

    let mut play = PlayArgs::default();
    let mut iter = args.into_iter().peekable();

    while let Some(arg) = iter.next() {
        let mut chars = arg.chars();
        let flag = match (chars.next(), chars.next()) {
            (Some('-'), Some(c)) if c != '-' => c,
            _ => return Err(ArgError::Unexpected(arg)),
        };
        let name = format!("-{}", flag);
        if !"cipvldo".contains(flag) {
            return Err(ArgError::Unexpected(arg));
        }

        let attached: String = chars.collect();
        let value = if !attached.is_empty() {
            attached
        } else {
            let has_value = iter.peek().is_some_and(|next| !looks_like_flag(next));
            if !has_value {
                return Err(ArgError::MissingValue(name));
            }
            iter.next().unwrap_or_default()
        };

        match flag {
            'c' => set_number(&mut play.channel, &name, &value)?,
            'i' => set_number(&mut play.instrument, &name, &value)?,
            'p' => set_number(&mut play.pitch, &name, &value)?,
            'v' => set_number(&mut play.velocity, &name, &value)?,
            'l' => set_number(&mut play.length_ms, &name, &value)?,
            'd' => set_once(&mut play.port, &name, value)?,
            _ => set_once(&mut play.output_file, &name, PathBuf::from(value))?,
        }
    }

    Ok(Command::Play(play))
}

/// A dash followed by something other than a digit
fn looks_like_flag(arg: &str) -> bool {
    let mut chars = arg.chars();
    chars.next() == Some('-') && chars.next().is_some_and(|c| !c.is_ascii_digit())
}

fn set_once<T>(slot: &mut Option<T>, name: &str, value: T) -> Result<(), ArgError> {
    if slot.is_some() {
        return Err(ArgError::Repeated(name.to_string()));
    }
    *slot = Some(value);
    Ok(())
}

fn set_number(slot: &mut Option<u32>, name: &str, value: &str) -> Result<(), ArgError> {
    let number = value.parse::<u32>().map_err(|_| ArgError::InvalidValue {
        flag: name.to_string(),
        value: value.to_string(),
    })?;
    set_once(slot, name, number)
}

/// Usage text shown for `-?` and after flag errors.
pub fn help_text(app_name: &str) -> String {
    let d = NoteRequest::default();
    let mut text = String::new();

    text.push_str("Plays one note through MIDI\n");
    text.push('\n');
    text.push_str(&format!("Usage: {} [FLAGS]\n", app_name));
    text.push('\n');
    text.push_str(&format!("  -c [0-15]            Channel. Default: {}\n", d.channel));
    text.push_str(&format!(
        "  -i [0-127]           Instrument. Default: {} (Grand Piano)\n",
        d.instrument
    ));
    text.push_str(&format!(
        "  -p [0-127]           Pitch (Note). Default: {} (Middle C Note)\n",
        d.pitch
    ));
    text.push_str(&format!(
        "  -v [0-127]           Velocity (Volume). Default: {} ({:.1}% Loud)\n",
        d.velocity,
        d.loudness_percent()
    ));
    text.push_str(&format!(
        "  -l [milliseconds]    Length (Note Length), in Milliseconds. Default: {} milliseconds\n",
        d.length.as_millis()
    ));
    text.push_str("  -d [index|name]      MIDI output port. Default: first port\n");
    text.push_str("  -o [file.mid]        Write a MIDI file instead of playing\n");
    text.push_str("  --list-midi          List available MIDI output ports\n");
    text.push_str("  -?                   Prints this help\n");
    text.push('\n');
    text.push_str("Examples:\n");
    text.push('\n');
    text.push_str(&format!("{} -i 24 -p 80\n", app_name));
    text.push_str("Play Guitar Note\n");
    text.push('\n');
    text.push_str(&format!("{} -c 1 -i 24 -p 81 -v 120 -l 2000\n", app_name));
    text.push_str("Sets Channel 1 to Guitar, Plays A Note, at Volume 120, for 2 seconds\n");

    text
}
