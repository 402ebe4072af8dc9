//! Integration tests for BMS decoding and MIDI file output
//!
//! These tests decode hand-built opcode tapes and verify the exact MIDI
//! bytes each track accumulates, plus the assembled file produced by
//! MidiWriter.

use bms2mid::midi::MidiWriter;
use bms2mid::{Error, InstrumentMap, Interpreter, Song};
use std::io::Cursor;
use tempfile::tempdir;

/// Decode a tape with no instrument list
fn decode(tape: &[u8]) -> Result<Song, Error> {
    let instruments = InstrumentMap::new();
    Interpreter::new(tape, &instruments).run()
}

/// Decode a tape against an instrument list
fn decode_with_instruments(tape: &[u8], list: &str) -> Result<Song, Error> {
    let instruments = InstrumentMap::from_reader(Cursor::new(list)).unwrap();
    Interpreter::new(tape, &instruments).run()
}

// =============================================================================
// End-to-end scenario
// =============================================================================

#[test]
fn test_single_track_end_to_end() {
    let tape = [
        0xC1, 0x00, 0x00, 0x00, 0x06, // track start -> offset 6
        0xFF, // meta track end (resume position)
        0x3C, 0x01, 0x64, // note on: pitch 60, voice 1, volume 100
        0x80, 0x0A, // delay 10
        0x81, // note off voice 1
        0xFF, // track end
    ];
    let song = decode(&tape).unwrap();

    assert_eq!(song.tracks.len(), 2);
    // meta track: end-of-track marker only
    assert_eq!(song.tracks[0].channel, None);
    assert_eq!(song.tracks[0].bytes(), &[0x00, 0xFF, 0x2F, 0x00]);
    // note track on the first allocated channel
    assert_eq!(song.tracks[1].channel, Some(0));
    assert_eq!(
        song.tracks[1].bytes(),
        &[
            0x00, 0x90, 0x3C, 0x64, // note on, zero delta
            0x0A, 0x80, 0x3C, 0x00, // note off after 10 ticks
            0x00, 0xFF, 0x2F, 0x00, // end of track
        ]
    );
    // resolution never set: defaults to 120
    assert_eq!(song.ticks_per_quarter_note, None);
    assert_eq!(song.division(), 120);
}

#[test]
fn test_written_file_layout() {
    let tape = [
        0xC1, 0x00, 0x00, 0x00, 0x06, //
        0xFF, //
        0x3C, 0x01, 0x64, //
        0x80, 0x0A, //
        0x81, //
        0xFF, //
    ];
    let song = decode(&tape).unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("out.mid");
    let mut writer = MidiWriter::new(&path).unwrap();
    writer.write(&song).unwrap();

    let data = std::fs::read(&path).unwrap();
    let mut expected = Vec::new();
    expected.extend_from_slice(b"MThd");
    expected.extend_from_slice(&[0, 0, 0, 6]); // header length
    expected.extend_from_slice(&[0, 1]); // format 1
    expected.extend_from_slice(&[0, 2]); // two tracks
    expected.extend_from_slice(&[0, 120]); // default resolution
    expected.extend_from_slice(b"MTrk");
    expected.extend_from_slice(&[0, 0, 0, 4]);
    expected.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);
    expected.extend_from_slice(b"MTrk");
    expected.extend_from_slice(&[0, 0, 0, 12]);
    expected.extend_from_slice(&[
        0x00, 0x90, 0x3C, 0x64, 0x0A, 0x80, 0x3C, 0x00, 0x00, 0xFF, 0x2F, 0x00,
    ]);
    assert_eq!(data, expected);
}

#[test]
fn test_two_tracks_get_distinct_channels() {
    let tape = [
        0xC1, 0x00, 0x00, 0x00, 0x0B, // track 1 -> offset 11
        0xC1, 0x00, 0x00, 0x00, 0x10, // track 2 -> offset 16
        0xFF, // meta end
        0x3C, 0x02, 0x64, // track 1 body
        0x82, //
        0xFF, //
        0x40, 0x03, 0x64, // track 2 body
        0x83, //
        0xFF, //
    ];
    let song = decode(&tape).unwrap();
    assert_eq!(song.tracks.len(), 3);
    assert_eq!(song.tracks[1].channel, Some(0));
    assert_eq!(song.tracks[2].channel, Some(1));
    assert_eq!(song.tracks[1].bytes()[1], 0x90);
    assert_eq!(song.tracks[2].bytes()[1], 0x91);
}

// =============================================================================
// Instrument mapping
// =============================================================================

#[test]
fn test_program_change_through_map() {
    let tape = [
        0xC1, 0x00, 0x00, 0x00, 0x06, //
        0xFF, //
        0xA4, 0x21, 0x01, // instrument id 1
        0xFF, //
    ];
    let song = decode_with_instruments(&tape, "Violin\nFlute\n").unwrap();
    // id 1 maps to Flute (program 73)
    assert_eq!(
        song.tracks[1].bytes(),
        &[0x00, 0xC0, 73, 0x00, 0xFF, 0x2F, 0x00]
    );
}

#[test]
fn test_drum_kit_reassigns_to_percussion() {
    let tape = [
        0xC1, 0x00, 0x00, 0x00, 0x06, //
        0xFF, //
        0xA4, 0x21, 0x01, // instrument id 1 -> Drum Kit
        0x3C, 0x01, 0x64, // note on pitch 60
        0x81, //
        0xFF, //
    ];
    let song = decode_with_instruments(&tape, "Acoustic Grand Piano\nDrum Kit\n").unwrap();
    assert_eq!(song.tracks[1].channel, Some(9));
    assert_eq!(
        song.tracks[1].bytes(),
        &[
            0x00, 0xC9, 0x00, // program 0 on channel 9
            0x00, 0x99, 0x3B, 0x64, // percussion pitch is decremented by 1
            0x00, 0x89, 0x3B, 0x00, //
            0x00, 0xFF, 0x2F, 0x00, //
        ]
    );
}

#[test]
fn test_drum_kit_conflict_is_fatal() {
    let tape = [
        0xC1, 0x00, 0x00, 0x00, 0x0B, // track 1 -> offset 11
        0xC1, 0x00, 0x00, 0x00, 0x0F, // track 2 -> offset 15
        0xFF, //
        0xA4, 0x21, 0x00, // track 1 takes the drum kit
        0xFF, //
        0xA4, 0x21, 0x00, // track 2 wants it too
        0xFF, //
    ];
    let result = decode_with_instruments(&tape, "Drum Kit\n");
    assert!(matches!(result, Err(Error::PercussionChannelTaken)));
}

#[test]
fn test_bank_sub_event_is_discarded() {
    let tape = [
        0xC1, 0x00, 0x00, 0x00, 0x06, //
        0xFF, //
        0xA4, 0x20, 0x05, // set bank 5
        0xFF, //
    ];
    let song = decode(&tape).unwrap();
    assert_eq!(song.tracks[1].bytes(), &[0x00, 0xFF, 0x2F, 0x00]);
}

// =============================================================================
// Controller events
// =============================================================================

#[test]
fn test_volume_and_pan_controllers() {
    let tape = [
        0xC1, 0x00, 0x00, 0x00, 0x06, //
        0xFF, //
        0x9C, 0x00, 0x64, 0x00, // volume 100, duration 0
        0x9A, 0x03, 0x40, 0x00, // pan 64, duration 0
        0xFF, //
    ];
    let song = decode(&tape).unwrap();
    assert_eq!(
        song.tracks[1].bytes(),
        &[
            0x00, 0xB0, 0x07, 0x64, //
            0x00, 0xB0, 0x0A, 0x40, //
            0x00, 0xFF, 0x2F, 0x00, //
        ]
    );
}

#[test]
fn test_unrecognized_sub_events_are_skipped() {
    let tape = [
        0xC1, 0x00, 0x00, 0x00, 0x06, //
        0xFF, //
        0x9C, 0x09, 0xAA, 0xBB, // vibrato?: consumed, no output
        0x9C, 0x55, 0xAA, 0xBB, // unknown volume sub-event
        0x9A, 0x55, 0xAA, 0xBB, // unknown pan sub-event
        0xA4, 0x07, 0xAA, // unknown instrument sub-event
        0xFF, //
    ];
    let song = decode(&tape).unwrap();
    assert_eq!(song.tracks[1].bytes(), &[0x00, 0xFF, 0x2F, 0x00]);
}

#[test]
fn test_volume_out_of_range_is_fatal() {
    let tape = [
        0xC1, 0x00, 0x00, 0x00, 0x06, //
        0xFF, //
        0x9C, 0x00, 0x80, 0x00, // volume 128
    ];
    assert!(matches!(
        decode(&tape),
        Err(Error::ControllerOutOfRange { value: 0x80, .. })
    ));
}

// =============================================================================
// Control flow
// =============================================================================

#[test]
fn test_subroutine_shared_by_tracks() {
    // both tracks call the same note subroutine
    let tape = [
        0xC1, 0x00, 0x00, 0x00, 0x0B, // track 1 -> offset 11
        0xC1, 0x00, 0x00, 0x00, 0x11, // track 2 -> offset 17
        0xFF, // meta end
        0xC4, 0x00, 0x00, 0x00, 0x17, // track 1: call 23
        0xFF, //
        0xC4, 0x00, 0x00, 0x00, 0x17, // track 2: call 23
        0xFF, //
        0x3C, 0x01, 0x64, // shared subroutine: note on/off
        0x81, //
        0xC6, // return
    ];
    let song = decode(&tape).unwrap();
    let body = [
        0x00, 0x90, 0x3C, 0x64, 0x00, 0x80, 0x3C, 0x00, 0x00, 0xFF, 0x2F, 0x00,
    ];
    assert_eq!(song.tracks[1].bytes(), &body);
    // same events, different channel nibble
    let body2 = [
        0x00, 0x91, 0x3C, 0x64, 0x00, 0x81, 0x3C, 0x00, 0x00, 0xFF, 0x2F, 0x00,
    ];
    assert_eq!(song.tracks[2].bytes(), &body2);
}

#[test]
fn test_nested_calls_within_limit() {
    // call chains 4 deep, then unwinds
    let tape = [
        0xC4, 0x00, 0x00, 0x00, 0x06, // depth 1
        0xFF, // final end after unwinding
        0xC4, 0x00, 0x00, 0x00, 0x0C, // depth 2
        0xC6, //
        0xC4, 0x00, 0x00, 0x00, 0x12, // depth 3
        0xC6, //
        0xC4, 0x00, 0x00, 0x00, 0x18, // depth 4
        0xC6, //
        0xFE, 0x00, 0x60, // innermost: set resolution 96
        0xC6, //
    ];
    let song = decode(&tape).unwrap();
    assert_eq!(song.division(), 96);
}

#[test]
fn test_truncated_tape_is_fatal() {
    let tape = [0x80]; // delay8 with no operand
    assert!(matches!(decode(&tape), Err(Error::UnexpectedEof { offset: 1 })));
}
