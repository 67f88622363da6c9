// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Stable exit codes.

/// Note played, file written, ports listed or help printed.
pub const OK: i32 = 0;
/// Bad flag, missing value or value out of limit.
pub const USAGE: i32 = 1;
/// MIDI, file or config failure.
pub const FAILURE: i32 = 2;
