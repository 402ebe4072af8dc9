//! MIDI event bytes emitted into track buffers

/// Channel status bytes (channel number is added to the base)
pub mod status {
    /// Note off
    pub const NOTE_OFF: u8 = 0x80;
    /// Note on
    pub const NOTE_ON: u8 = 0x90;
    /// Controller change
    pub const CONTROL_CHANGE: u8 = 0xB0;
    /// Program change
    pub const PROGRAM_CHANGE: u8 = 0xC0;
    /// Meta event prefix
    pub const META: u8 = 0xFF;
}

/// Meta event types
pub mod meta {
    /// Set tempo (microseconds per quarter note, 3 data bytes)
    pub const TEMPO: u8 = 0x51;
    /// End of track (no data bytes)
    pub const END_OF_TRACK: u8 = 0x2F;
}

/// Controller numbers
pub mod controller {
    /// Channel volume
    pub const VOLUME: u8 = 0x07;
    /// Pan
    pub const PAN: u8 = 0x0A;
}
