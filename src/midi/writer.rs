//! Standard MIDI File writer
//!
//! Serializes a decoded [`Song`] as a format 1 SMF: one `MThd` chunk followed
//! by one `MTrk` chunk per track, in creation order (meta track first).

use crate::bms::interpreter::Song;
use crate::error::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// MIDI file writer
pub struct MidiWriter {
    file: File,
}

impl MidiWriter {
    /// Create a new MIDI writer
    pub fn new(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self { file })
    }

    /// Write the header chunk and every track chunk
    pub fn write(&mut self, song: &Song) -> Result<()> {
        self.file.write_all(b"MThd")?;
        self.write_u32(6)?; // chunk length
        self.write_u16(1)?; // format type
        self.write_u16(song.tracks.len() as u16)?;
        self.write_u16(song.division())?;

        for track in &song.tracks {
            self.file.write_all(b"MTrk")?;
            self.write_u32(track.len() as u32)?;
            self.file.write_all(track.bytes())?;
        }

        self.file.flush()?;
        Ok(())
    }

    fn write_u16(&mut self, val: u16) -> Result<()> {
        self.file.write_all(&val.to_be_bytes())?;
        Ok(())
    }

    fn write_u32(&mut self, val: u32) -> Result<()> {
        self.file.write_all(&val.to_be_bytes())?;
        Ok(())
    }
}
