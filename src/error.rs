use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unhandled BMS event 0x{opcode:02X} at address 0x{offset:X}")]
    UnhandledOpcode { opcode: u8, offset: usize },

    #[error("Unexpected end of BMS data at address 0x{offset:X}")]
    UnexpectedEof { offset: usize },

    #[error("Call stack limit reached at address 0x{offset:X}")]
    CallStackOverflow { offset: usize },

    #[error("Attempted to return outside of subroutine at address 0x{offset:X}")]
    CallStackUnderflow { offset: usize },

    #[error("Voice index {voice} out of range at address 0x{offset:X}")]
    VoiceOutOfRange { voice: u8, offset: usize },

    #[error("Voice {voice} is already sounding at address 0x{offset:X}")]
    VoiceAlreadyActive { voice: u8, offset: usize },

    #[error("Voice {voice} is not sounding at address 0x{offset:X}")]
    VoiceNotActive { voice: u8, offset: usize },

    #[error("Controller value {value} out of range at address 0x{offset:X}")]
    ControllerOutOfRange { value: u8, offset: usize },

    #[error("Cannot use more than 16 MIDI channels")]
    ChannelsExhausted,

    #[error("Percussion channel is already in use")]
    PercussionChannelTaken,

    #[error("Unknown instrument '{0}'")]
    UnknownInstrument(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
