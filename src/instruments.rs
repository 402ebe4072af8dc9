//! Instrument conversion table
//!
//! BMS instrument ids are game-specific, so the converter accepts an optional
//! text file remapping each id to a General MIDI program. One entry per line:
//! a decimal or hex program number, or a case-sensitive name from the
//! catalogue below. The extra `Drum Kit` entry (program id 128) marks a track
//! as percussion rather than selecting a program.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Mapped program id meaning "move this track to the percussion channel"
pub const DRUM_KIT: u16 = 128;

/// General MIDI program names, in program order, plus the drum kit sentinel
pub const INSTRUMENT_NAMES: [&str; 129] = [
    // Piano
    "Acoustic Grand Piano", "Bright Piano", "Electric Grand Piano", "Honky-tonk Piano",
    "Electric Piano 1", "Electric Piano 2", "Harpsichord", "Clavinet",
    // Melodic Percussion
    "Celesta", "Glockenspiel", "Music Box", "Vibraphone",
    "Marimba", "Xylophone", "Tubular Bells", "Dulcimer",
    // Organ
    "Hammond Organ", "Percussive Organ", "Rock Organ", "Church Organ",
    "Reed Organ", "Accordian", "Harmonica", "Tango Accordian",
    // Guitar
    "Nylon String Guitar", "Steel String Guitar", "Jazz Guitar", "Clean Electric Guitar",
    "Muted Guitar", "Overdrive Guitar", "Distortion Guitar", "Guitar Harmonics",
    // Bass
    "Acoustic Bass", "Fingered Bass", "Picked Bass", "Fretless Bass",
    "Slap Bass 1", "Slap Bass 2", "Synth Bass 1", "Synth Bass 2",
    // String
    "Violin", "Viola", "Cello", "Contrabass",
    "Tremolo Strings", "Pizzicato Strings", "Orchestral Harp", "Timpani",
    // Ensemble
    "String Ensemble 1", "String Ensemble 2", "Synth Strings 1", "Synth Strings 2",
    "Choir Ahh", "Choir Oohh", "Synth Voice", "Orchestral Hit",
    // Brass
    "Trumpet", "Trombone", "Tuba", "Muted Trumpet",
    "French Horn", "Brass Section", "Synth Brass 1", "Synth Brass 2",
    // Reed
    "Soprano Sax", "Alto Sax", "Tenor Sax", "Baritone Sax",
    "Oboe", "English Horn", "Bassoon", "Clarinet",
    // Pipe
    "Piccolo", "Flute", "Recorder", "Pan Flute",
    "Blown Bottle", "Shakuhachi", "Whistle", "Ocarina",
    // Synth Lead
    "Square Lead", "Sawtooth Lead", "Calliope Lead", "Chiff Lead",
    "Charang Lead", "Voice Lead", "Fifth Lead", "Bass & Lead",
    // Synth Pad
    "New Age", "Warm", "Polysynth", "Choir",
    "Bowed", "Metallic", "Halo", "Sweep",
    // Synth FX
    "FX Rain", "FX Soundtrack", "FX Crystal", "FX Atmosphere",
    "FX Brightness", "FX Goblins", "FX Echo Drops", "FX Star Theme",
    // Ethnic
    "Sitar", "Banjo", "Shamisen", "Koto",
    "Kalimba", "Bagpipe", "Fiddle", "Shanai",
    // Percussive
    "Tinkle Bell", "Agogo", "Steel Drums", "Woodblock",
    "Taiko Drum", "Melodic Tom", "Synth Drum", "Reverse Cymbal",
    // Sound Effects
    "Guitar Fret Noise", "Breath Noise", "Seashore", "Bird Tweet",
    "Telephone Ring", "Helicopter", "Applause", "Gunshot",
    "Drum Kit",
];

/// BMS id → General MIDI program mapping
///
/// Read-only after construction; ids past the end of the table pass through
/// unchanged.
#[derive(Debug, Clone, Default)]
pub struct InstrumentMap {
    table: Vec<u16>,
}

impl InstrumentMap {
    /// An empty map: every id maps to itself
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an instrument list file
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse an instrument list, one entry per line
    ///
    /// Blank lines are skipped; line N of the remaining lines maps id N.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut table = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let entry = line.trim();
            if entry.is_empty() {
                continue;
            }
            table.push(parse_entry(entry)?);
        }
        Ok(Self { table })
    }

    /// Look up the mapped program for a BMS instrument id
    pub fn lookup(&self, id: u8) -> u16 {
        self.table.get(id as usize).copied().unwrap_or(id as u16)
    }

    /// Number of explicit entries
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Parse a single list entry: a program number or a catalogue name
fn parse_entry(entry: &str) -> Result<u16> {
    let parsed = if let Some(hex) = entry.strip_prefix("0x").or_else(|| entry.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16).ok()
    } else {
        entry.parse::<u16>().ok()
    };
    if let Some(num) = parsed {
        return Ok(num);
    }
    INSTRUMENT_NAMES
        .iter()
        .position(|&name| name == entry)
        .map(|idx| idx as u16)
        .ok_or_else(|| Error::UnknownInstrument(entry.to_string()))
}
