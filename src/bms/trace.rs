//! Serializable decoded-event trace
//!
//! When tracing is enabled the interpreter records every decoded event here.
//! The `bms2json` binary dumps the trace together with a track summary, which
//! is the main way to inspect what a tape actually contains.

use super::interpreter::Song;
use crate::midi::track::MidiTrack;
use serde::Serialize;

/// One decoded BMS event
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    NoteOn {
        offset: usize,
        track: usize,
        pitch: u8,
        voice: u8,
        volume: u8,
    },
    NoteOff {
        offset: usize,
        track: usize,
        voice: u8,
        pitch: u8,
    },
    Delay {
        offset: usize,
        ticks: u32,
    },
    TrackStart {
        offset: usize,
        track: usize,
        channel: u8,
        start: usize,
    },
    Bank {
        offset: usize,
        bank: u8,
    },
    Instrument {
        offset: usize,
        original: u8,
        mapped: u16,
    },
    Tempo {
        offset: usize,
        bpm: u16,
    },
    TicksPerQuarter {
        offset: usize,
        value: u16,
    },
    Volume {
        offset: usize,
        track: usize,
        volume: u8,
        duration: u8,
    },
    Pan {
        offset: usize,
        track: usize,
        pan: u8,
        duration: u8,
    },
    Call {
        offset: usize,
        target: usize,
    },
    Return {
        offset: usize,
        target: usize,
    },
    Goto {
        offset: usize,
    },
    TrackEnd {
        offset: usize,
        track: usize,
    },
    Unknown {
        offset: usize,
        opcode: u8,
        operands: Vec<u8>,
    },
}

/// Top-level JSON structure for a decoded tape
#[derive(Debug, Clone, Serialize)]
pub struct BmsJson {
    /// Resolved MIDI resolution (default applied)
    pub ticks_per_quarter_note: u16,
    /// Track summaries in creation order (meta track first)
    pub tracks: Vec<TrackJson>,
    /// Decoded events in tape-visit order
    pub events: Vec<TraceEvent>,
}

/// JSON summary of one finished track
#[derive(Debug, Clone, Serialize)]
pub struct TrackJson {
    /// Assigned MIDI channel; absent for the meta track
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<u8>,
    /// Byte length of the track buffer
    pub bytes: usize,
}

impl BmsJson {
    /// Create a BmsJson from a decoded song
    pub fn new(song: Song) -> Self {
        Self {
            ticks_per_quarter_note: song.division(),
            tracks: song.tracks.iter().map(TrackJson::from).collect(),
            events: song.trace,
        }
    }
}

impl From<&MidiTrack> for TrackJson {
    fn from(track: &MidiTrack) -> Self {
        Self {
            channel: track.channel,
            bytes: track.len(),
        }
    }
}
