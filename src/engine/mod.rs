//! Recording Engine Module
//!
//! Everything between the filesystem and the analysis core:
//! - Channel type holding one immutable recording
//! - Recording discovery and WAV decoding

pub mod channel;
pub mod io;

pub use channel::{channel_name_from_path, Channel, ChannelSource};
pub use io::{
    discover_recordings, load_channel, load_channels, write_channel_wav, Discovery, LoadFailure,
};
