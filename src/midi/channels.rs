//! MIDI channel allocation
//!
//! MIDI channels range from 0 to 15, with channel 9 being percussion only.
//! Each non-meta track claims one channel for its whole lifetime; channel 9
//! is handed out last, or claimed explicitly when a track switches to the
//! drum kit.

use crate::error::{Error, Result};

/// Number of MIDI channels
pub const MAX_CHANNELS: u8 = 16;
/// The General MIDI percussion channel
pub const PERCUSSION_CHANNEL: u8 = 9;

/// Tracks which MIDI channels are in use via a 16-bit mask
#[derive(Debug, Clone, Default)]
pub struct ChannelAllocator {
    used: u16,
}

impl ChannelAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a channel is currently assigned
    pub fn is_used(&self, channel: u8) -> bool {
        self.used & (1 << channel) != 0
    }

    /// Claim the lowest free channel
    ///
    /// Channel 9 is skipped until every other channel is taken; when all 16
    /// channels are in use the conversion cannot continue.
    pub fn allocate(&mut self) -> Result<u8> {
        for ch in 0..MAX_CHANNELS {
            if ch != PERCUSSION_CHANNEL && !self.is_used(ch) {
                self.used |= 1 << ch;
                return Ok(ch);
            }
        }
        if !self.is_used(PERCUSSION_CHANNEL) {
            self.used |= 1 << PERCUSSION_CHANNEL;
            return Ok(PERCUSSION_CHANNEL);
        }
        Err(Error::ChannelsExhausted)
    }

    /// Move a track from its current channel to the percussion channel
    ///
    /// Fails if channel 9 is already held by a different track. A track that
    /// already sits on channel 9 stays there.
    pub fn reassign_to_percussion(&mut self, current: u8) -> Result<u8> {
        if current == PERCUSSION_CHANNEL {
            return Ok(PERCUSSION_CHANNEL);
        }
        if self.is_used(PERCUSSION_CHANNEL) {
            return Err(Error::PercussionChannelTaken);
        }
        self.used &= !(1 << current);
        self.used |= 1 << PERCUSSION_CHANNEL;
        Ok(PERCUSSION_CHANNEL)
    }
}
