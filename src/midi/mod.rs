pub mod channels;
pub mod event;
pub mod track;
pub mod writer;

pub use channels::ChannelAllocator;
pub use track::MidiTrack;
pub use writer::MidiWriter;
