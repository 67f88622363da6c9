// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Exports notes with `-o` and reads the files back with midly.

mod harness;

use std::fs;

use harness::launch_in;
use midly::{Format, MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};

fn export(args: &str) -> Vec<u8> {
    let dir = tempfile::tempdir().unwrap();
    let output = launch_in(dir.path(), &format!("{} -o note.mid", args));
    assert_eq!(
        output.status.code(),
        Some(0),
        "stdout: {}",
        String::from_utf8_lossy(&output.stdout)
    );
    fs::read(dir.path().join("note.mid")).unwrap()
}

#[test]
fn exported_file_is_single_track() {
    let bytes = export("-i 24 -p 80");
    let smf = Smf::parse(&bytes).unwrap();

    assert_eq!(smf.header.format, Format::SingleTrack);
    match smf.header.timing {
        Timing::Metrical(ppqn) => assert_eq!(ppqn.as_int(), 480),
        other => panic!("unexpected timing {:?}", other),
    }
    assert_eq!(smf.tracks.len(), 1);
}

#[test]
fn exported_note_events() {
    let bytes = export("-c 1 -i 24 -p 81 -v 120 -l 2000");
    let smf = Smf::parse(&bytes).unwrap();

    let mut tick = 0u32;
    let mut program = None;
    let mut note_on = None;
    let mut note_off = None;
    let mut tempo = None;

    for event in &smf.tracks[0] {
        tick += event.delta.as_int();
        match &event.kind {
            TrackEventKind::Midi { channel, message } => match message {
                MidiMessage::ProgramChange { program: p } => {
                    program = Some((channel.as_int(), p.as_int()));
                }
                MidiMessage::NoteOn { key, vel } => {
                    note_on = Some((tick, channel.as_int(), key.as_int(), vel.as_int()));
                }
                MidiMessage::NoteOff { key, .. } => {
                    note_off = Some((tick, key.as_int()));
                }
                _ => {}
            },
            TrackEventKind::Meta(MetaMessage::Tempo(t)) => tempo = Some(t.as_int()),
            _ => {}
        }
    }

    assert_eq!(tempo, Some(500_000));
    assert_eq!(program, Some((1, 24)));
    assert_eq!(note_on, Some((0, 1, 81, 120)));
    // 2 seconds at 120 BPM, 480 PPQN
    assert_eq!(note_off, Some((1920, 81)));
}

#[test]
fn export_still_checks_limits() {
    let dir = tempfile::tempdir().unwrap();
    let output = launch_in(dir.path(), "-p 200 -o note.mid");

    assert_eq!(output.status.code(), Some(1));
    assert!(!dir.path().join("note.mid").exists());
}

#[test]
fn export_too_long_for_delta_time_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = launch_in(dir.path(), "-l 4294967295 -o note.mid");

    assert_eq!(output.status.code(), Some(2));
    assert!(!dir.path().join("note.mid").exists());
}
