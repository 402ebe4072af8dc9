//! BMS event opcodes
//!
//! The opcode map comes from offline analysis of the format. Several opcodes
//! are only known by their operand length; those are listed with an `UNKNOWN_`
//! prefix and their byte-skip counts must not be changed.

/// Highest note-on opcode (the opcode value is the pitch)
pub const NOTE_ON_MAX: u8 = 0x7F;
/// Add an 8-bit operand to the delay accumulator
pub const DELAY_U8: u8 = 0x80;
/// First note-off opcode (voice index = opcode & 7)
pub const NOTE_OFF_MIN: u8 = 0x81;
/// Last note-off opcode
pub const NOTE_OFF_MAX: u8 = 0x87;
/// Add a 16-bit operand to the delay accumulator
pub const DELAY_U16: u8 = 0x88;
/// Unknown, 2 operand bytes; seems to appear near the beginning of a track
pub const UNKNOWN_98: u8 = 0x98;
/// Pan change (two-byte sub-opcode dispatch)
pub const PAN: u8 = 0x9A;
/// Volume change (two-byte sub-opcode dispatch)
pub const VOLUME: u8 = 0x9C;
/// Pitch bend, probably; 2 operand bytes
pub const PITCH_BEND: u8 = 0x9E;
/// Instrument change (two-byte sub-opcode dispatch)
pub const INSTRUMENT: u8 = 0xA4;
/// Unknown, 3 operand bytes; a zero third byte ends the current track
pub const UNKNOWN_AC: u8 = 0xAC;
/// Unknown, 3 operand bytes
pub const UNKNOWN_AD: u8 = 0xAD;
/// Open a new track at a 24-bit tape offset
pub const TRACK_START: u8 = 0xC1;
/// Call a subroutine at a 32-bit tape offset
pub const CALL: u8 = 0xC4;
/// Return from a subroutine
pub const RETURN: u8 = 0xC6;
/// Goto event for looping; ignored because MIDIs cannot loop
pub const GOTO: u8 = 0xC8;
/// Unknown; 7 bytes seems to do the trick
pub const UNKNOWN_CB: u8 = 0xCB;
/// Unknown, 2 operand bytes; seems to always follow a 0xAC event
pub const UNKNOWN_CC: u8 = 0xCC;
/// Unknown, 1 operand byte
pub const UNKNOWN_D6: u8 = 0xD6;
/// Unknown, 2 operand bytes; seems to appear near the beginning of a track
pub const UNKNOWN_E6: u8 = 0xE6;
/// Unknown, 2 operand bytes
pub const UNKNOWN_E7: u8 = 0xE7;
/// Unknown, 1 operand byte
pub const UNKNOWN_F4: u8 = 0xF4;
/// Set the tempo in beats per minute (meta track only)
pub const TEMPO: u8 = 0xFD;
/// Set the MIDI ticks-per-quarter-note resolution
pub const TICKS_PER_QUARTER: u8 = 0xFE;
/// End of the current track, or of the whole stream when outside a track
pub const TRACK_END: u8 = 0xFF;

/// Sub-opcodes of [`INSTRUMENT`]
pub mod instrument {
    /// Set the instrument bank (currently discarded)
    pub const BANK: u8 = 0x20;
    /// Set the instrument program
    pub const PROGRAM: u8 = 0x21;
}

/// Sub-opcodes of [`VOLUME`]
pub mod volume {
    /// Set the channel volume
    pub const SET: u8 = 0x00;
    /// Vibrato intensity?
    pub const VIBRATO: u8 = 0x09;
}

/// Sub-opcodes of [`PAN`]
pub mod pan {
    /// Set the channel panning
    pub const SET: u8 = 0x03;
}
