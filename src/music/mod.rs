// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Note requests and their MIDI limits.

pub mod note;

pub use note::{pitch_name, verify_limit, verify_limits, LimitError, NoteRequest, RawNote};
