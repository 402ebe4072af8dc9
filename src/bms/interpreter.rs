//! BMS event interpreter
//!
//! A single pass over the opcode tape. The interpreter owns the read cursor
//! and all session state: the track list, the voice table, the pending-delay
//! accumulator, and the subroutine call stack. Track-start, call, return and
//! the conditional end inside the 0xAC event are the only non-sequential
//! cursor moves; everything else consumes a fixed number of operand bytes and
//! appends MIDI bytes to whichever track is current.

use super::opcode;
use super::tape::Tape;
use super::trace::TraceEvent;
use crate::error::{Error, Result};
use crate::instruments::{InstrumentMap, DRUM_KIT};
use crate::midi::channels::{ChannelAllocator, PERCUSSION_CHANNEL};
use crate::midi::event::{controller, meta, status};
use crate::midi::track::MidiTrack;

/// Nested subroutine limit; nothing deeper has been seen in the wild
pub const CALL_STACK_LIMIT: usize = 4;
/// Simultaneously held notes addressable by the note on/off events
pub const MAX_VOICES: usize = 8;
/// MIDI resolution used when the tape never sets one
pub const DEFAULT_TICKS_PER_QUARTER: u16 = 120;

/// The meta track is always created first
const META_TRACK: usize = 0;

/// Decoded song: finished track buffers plus the header resolution
#[derive(Debug, Clone)]
pub struct Song {
    /// Tracks in creation order, meta track first
    pub tracks: Vec<MidiTrack>,
    /// Resolution from the tape, if it ever set one
    pub ticks_per_quarter_note: Option<u16>,
    /// Decoded-event trace (empty unless tracing was enabled)
    pub trace: Vec<TraceEvent>,
}

impl Song {
    /// Resolution to declare in the MIDI header
    pub fn division(&self) -> u16 {
        self.ticks_per_quarter_note
            .unwrap_or(DEFAULT_TICKS_PER_QUARTER)
    }
}

/// BMS decoding session
pub struct Interpreter<'a> {
    tape: Tape<'a>,
    instruments: &'a InstrumentMap,
    tracks: Vec<MidiTrack>,
    channels: ChannelAllocator,
    /// Index of the track receiving events
    current: usize,
    in_track: bool,
    /// Tape offset to resume from after the current track ends
    saved_pos: usize,
    /// Pitch currently sounding on each voice
    voices: [Option<u8>; MAX_VOICES],
    /// Pending MIDI ticks, flushed before the next emitted event
    delay: u32,
    call_stack: Vec<usize>,
    ticks_per_quarter: Option<u16>,
    trace: Vec<TraceEvent>,
    tracing: bool,
}

impl<'a> Interpreter<'a> {
    /// Create a session over raw BMS data; the meta track is created here
    pub fn new(data: &'a [u8], instruments: &'a InstrumentMap) -> Self {
        Self {
            tape: Tape::new(data),
            instruments,
            tracks: vec![MidiTrack::new()],
            channels: ChannelAllocator::new(),
            current: META_TRACK,
            in_track: false,
            saved_pos: 0,
            voices: [None; MAX_VOICES],
            delay: 0,
            call_stack: Vec::with_capacity(CALL_STACK_LIMIT),
            ticks_per_quarter: None,
            trace: Vec::new(),
            tracing: false,
        }
    }

    /// Record a decoded-event trace while running (used by bms2json)
    pub fn with_trace(mut self) -> Self {
        self.tracing = true;
        self
    }

    /// Decode the whole tape, from the top until the meta track ends
    pub fn run(mut self) -> Result<Song> {
        loop {
            let offset = self.tape.position();
            let event = self.tape.read_u8()?;
            match event {
                0x00..=opcode::NOTE_ON_MAX => self.note_on(event, offset)?,
                opcode::DELAY_U8 => self.delay_u8(offset)?,
                opcode::NOTE_OFF_MIN..=opcode::NOTE_OFF_MAX => {
                    self.note_off(event & 7, offset)?
                }
                opcode::DELAY_U16 => self.delay_u16(offset)?,
                opcode::UNKNOWN_98
                | opcode::PITCH_BEND
                | opcode::UNKNOWN_CC
                | opcode::UNKNOWN_E6
                | opcode::UNKNOWN_E7 => self.unknown(event, 2, offset)?,
                opcode::PAN => self.pan(offset)?,
                opcode::VOLUME => self.volume(offset)?,
                opcode::INSTRUMENT => self.instrument(offset)?,
                opcode::UNKNOWN_AC => {
                    if self.conditional_track_end(offset)? {
                        break;
                    }
                }
                opcode::UNKNOWN_AD => self.unknown(event, 3, offset)?,
                opcode::TRACK_START => self.track_start(offset)?,
                opcode::CALL => self.subroutine_call(offset)?,
                opcode::RETURN => self.subroutine_return(offset)?,
                opcode::GOTO => self.goto(offset)?,
                opcode::UNKNOWN_CB => self.unknown(event, 7, offset)?,
                opcode::UNKNOWN_D6 | opcode::UNKNOWN_F4 => self.unknown(event, 1, offset)?,
                opcode::TEMPO => self.tempo(offset)?,
                opcode::TICKS_PER_QUARTER => self.ticks_per_quarter(offset)?,
                opcode::TRACK_END => {
                    if self.track_end(offset) {
                        break;
                    }
                }
                _ => return Err(Error::UnhandledOpcode { opcode: event, offset }),
            }
        }
        Ok(Song {
            tracks: self.tracks,
            ticks_per_quarter_note: self.ticks_per_quarter,
            trace: self.trace,
        })
    }

    fn record(&mut self, event: TraceEvent) {
        if self.tracing {
            self.trace.push(event);
        }
    }

    /// Channel of the current track (0 when no channel is assigned)
    fn channel(&self) -> u8 {
        self.tracks[self.current].channel.unwrap_or(0)
    }

    /// Encode the pending delay as the next event's delta time
    fn flush_delay(&mut self, track: usize) {
        self.tracks[track].write_varlen(self.delay);
        self.delay = 0;
    }

    // 0x00 - 0x7F
    fn note_on(&mut self, mut pitch: u8, offset: usize) -> Result<()> {
        let voice = self.tape.read_u8()?;
        let volume = self.tape.read_u8()?;
        if voice as usize >= MAX_VOICES {
            return Err(Error::VoiceOutOfRange { voice, offset });
        }
        if self.voices[voice as usize].is_some() {
            return Err(Error::VoiceAlreadyActive { voice, offset });
        }
        // simple hack to make the percussion sound reasonably close, though
        // the note numbers do not match up with General MIDI drum kits
        if self.channel() == PERCUSSION_CHANNEL {
            pitch = pitch.wrapping_sub(1);
        }
        let channel = self.channel();
        self.flush_delay(self.current);
        let track = &mut self.tracks[self.current];
        track.write_u8(status::NOTE_ON + channel);
        track.write_u8(pitch);
        track.write_u8(volume);
        self.voices[voice as usize] = Some(pitch);
        self.record(TraceEvent::NoteOn {
            offset,
            track: self.current,
            pitch,
            voice,
            volume,
        });
        Ok(())
    }

    // 0x81 - 0x87
    fn note_off(&mut self, voice: u8, offset: usize) -> Result<()> {
        let pitch = self.voices[voice as usize]
            .take()
            .ok_or(Error::VoiceNotActive { voice, offset })?;
        let channel = self.channel();
        self.flush_delay(self.current);
        let track = &mut self.tracks[self.current];
        track.write_u8(status::NOTE_OFF + channel);
        track.write_u8(pitch);
        track.write_u8(0);
        self.record(TraceEvent::NoteOff {
            offset,
            track: self.current,
            voice,
            pitch,
        });
        Ok(())
    }

    // 0x80
    fn delay_u8(&mut self, offset: usize) -> Result<()> {
        let ticks = self.tape.read_u8()? as u32;
        self.delay += ticks;
        self.record(TraceEvent::Delay { offset, ticks });
        Ok(())
    }

    // 0x88
    fn delay_u16(&mut self, offset: usize) -> Result<()> {
        let ticks = self.tape.read_u16()? as u32;
        self.delay += ticks;
        self.record(TraceEvent::Delay { offset, ticks });
        Ok(())
    }

    // 0xC1
    fn track_start(&mut self, offset: usize) -> Result<()> {
        self.tape.read_u8()?; // unidentified, discarded
        let start = self.tape.read_u24()? as usize;
        self.saved_pos = self.tape.position();
        self.tape.seek(start);
        let channel = self.channels.allocate()?;
        let mut track = MidiTrack::new();
        track.channel = Some(channel);
        self.tracks.push(track);
        self.current = self.tracks.len() - 1;
        self.in_track = true;
        self.record(TraceEvent::TrackStart {
            offset,
            track: self.current,
            channel,
            start,
        });
        Ok(())
    }

    // 0xA4
    fn instrument(&mut self, offset: usize) -> Result<()> {
        let sub = self.tape.read_u8()?;
        match sub {
            opcode::instrument::BANK => {
                let bank = self.tape.read_u8()?;
                self.record(TraceEvent::Bank { offset, bank });
            }
            opcode::instrument::PROGRAM => {
                let original = self.tape.read_u8()?;
                let mapped = self.instruments.lookup(original);
                let program = if mapped == DRUM_KIT {
                    // Drum Kit - move this track to channel 9
                    let current = self.channel();
                    let channel = self.channels.reassign_to_percussion(current)?;
                    self.tracks[self.current].channel = Some(channel);
                    0
                } else {
                    mapped as u8
                };
                let channel = self.channel();
                self.flush_delay(self.current);
                let track = &mut self.tracks[self.current];
                track.write_u8(status::PROGRAM_CHANGE + channel);
                track.write_u8(program);
                self.record(TraceEvent::Instrument {
                    offset,
                    original,
                    mapped,
                });
            }
            _ => {
                // TODO: figure out what sub-event 0x07 is supposed to mean
                eprintln!(
                    "Warning: unrecognized instrument sub-event 0x{:02X} at address 0x{:X}",
                    sub, offset
                );
                self.unknown(opcode::INSTRUMENT, 1, offset)?;
            }
        }
        Ok(())
    }

    // 0x9C
    fn volume(&mut self, offset: usize) -> Result<()> {
        let sub = self.tape.read_u8()?;
        match sub {
            opcode::volume::SET => {
                let volume = self.tape.read_u8()?;
                let duration = self.tape.read_u8()?; // purpose unknown
                if volume > 127 {
                    return Err(Error::ControllerOutOfRange {
                        value: volume,
                        offset,
                    });
                }
                self.control_change(controller::VOLUME, volume);
                self.record(TraceEvent::Volume {
                    offset,
                    track: self.current,
                    volume,
                    duration,
                });
            }
            opcode::volume::VIBRATO => self.unknown(opcode::VOLUME, 2, offset)?,
            _ => {
                eprintln!(
                    "Warning: unrecognized volume sub-event 0x{:02X} at address 0x{:X}",
                    sub, offset
                );
                self.unknown(opcode::VOLUME, 2, offset)?;
            }
        }
        Ok(())
    }

    // 0x9A
    fn pan(&mut self, offset: usize) -> Result<()> {
        let sub = self.tape.read_u8()?;
        match sub {
            opcode::pan::SET => {
                let pan = self.tape.read_u8()?;
                let duration = self.tape.read_u8()?;
                if pan > 127 {
                    return Err(Error::ControllerOutOfRange { value: pan, offset });
                }
                self.control_change(controller::PAN, pan);
                self.record(TraceEvent::Pan {
                    offset,
                    track: self.current,
                    pan,
                    duration,
                });
            }
            _ => {
                eprintln!(
                    "Warning: unrecognized pan sub-event 0x{:02X} at address 0x{:X}",
                    sub, offset
                );
                self.unknown(opcode::PAN, 2, offset)?;
            }
        }
        Ok(())
    }

    fn control_change(&mut self, control: u8, value: u8) {
        let channel = self.channel();
        self.flush_delay(self.current);
        let track = &mut self.tracks[self.current];
        track.write_u8(status::CONTROL_CHANGE + channel);
        track.write_u8(control);
        track.write_u8(value);
    }

    // 0xFD
    fn tempo(&mut self, offset: usize) -> Result<()> {
        let bpm = self.tape.read_u16()?;
        self.record(TraceEvent::Tempo { offset, bpm });
        if self.in_track {
            eprintln!("Warning: setting tempo within a track is not supported");
            return Ok(());
        }
        if bpm == 0 {
            eprintln!("Warning: ignoring tempo of 0 bpm at address 0x{:X}", offset);
            return Ok(());
        }
        let usec_per_quarter = 60_000_000 / bpm as u32;
        self.flush_delay(META_TRACK);
        let track = &mut self.tracks[META_TRACK];
        track.write_u8(status::META);
        track.write_u8(meta::TEMPO);
        track.write_u8(3);
        track.write_u24(usec_per_quarter);
        Ok(())
    }

    // 0xFE
    fn ticks_per_quarter(&mut self, offset: usize) -> Result<()> {
        let value = self.tape.read_u16()?;
        self.record(TraceEvent::TicksPerQuarter { offset, value });
        if self.ticks_per_quarter.is_some() {
            eprintln!("Warning: ticks per quarter note already set, ignoring");
        } else if value != 0 {
            self.ticks_per_quarter = Some(value);
        }
        Ok(())
    }

    // 0xC4
    fn subroutine_call(&mut self, offset: usize) -> Result<()> {
        let target = self.tape.read_u32()? as usize;
        if self.call_stack.len() >= CALL_STACK_LIMIT {
            return Err(Error::CallStackOverflow { offset });
        }
        self.call_stack.push(self.tape.position());
        self.tape.seek(target);
        self.record(TraceEvent::Call { offset, target });
        Ok(())
    }

    // 0xC6
    fn subroutine_return(&mut self, offset: usize) -> Result<()> {
        let target = self
            .call_stack
            .pop()
            .ok_or(Error::CallStackUnderflow { offset })?;
        self.tape.seek(target);
        self.record(TraceEvent::Return { offset, target });
        Ok(())
    }

    // 0xC8: loop marker; MIDIs cannot loop, so only the operands are consumed
    fn goto(&mut self, offset: usize) -> Result<()> {
        self.tape.skip(4)?;
        self.record(TraceEvent::Goto { offset });
        Ok(())
    }

    /// Consume an event whose meaning is unknown beyond its operand length
    fn unknown(&mut self, op: u8, len: usize, offset: usize) -> Result<()> {
        let operands = self.tape.read_bytes(len)?;
        self.record(TraceEvent::Unknown {
            offset,
            opcode: op,
            operands,
        });
        Ok(())
    }

    // 0xAC: unknown, but a zero third byte ends the track like 0xFF does
    fn conditional_track_end(&mut self, offset: usize) -> Result<bool> {
        let operands = self.tape.read_bytes(3)?;
        let ends_track = operands[2] == 0;
        self.record(TraceEvent::Unknown {
            offset,
            opcode: opcode::UNKNOWN_AC,
            operands,
        });
        if ends_track {
            return Ok(self.track_end(offset));
        }
        Ok(false)
    }

    // 0xFF: returns true when the meta track has ended and decoding is done
    fn track_end(&mut self, offset: usize) -> bool {
        self.record(TraceEvent::TrackEnd {
            offset,
            track: self.current,
        });
        if self.in_track {
            end_of_track_marker(&mut self.tracks[self.current]);
            self.tape.seek(self.saved_pos);
            self.delay = 0;
            self.in_track = false;
            self.current = META_TRACK;
            false
        } else {
            end_of_track_marker(&mut self.tracks[META_TRACK]);
            true
        }
    }
}

fn end_of_track_marker(track: &mut MidiTrack) {
    track.write_varlen(0);
    track.write_u8(status::META);
    track.write_u8(meta::END_OF_TRACK);
    track.write_u8(0);
}
