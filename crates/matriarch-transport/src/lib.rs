//! MIDI port abstraction for talking to a single synthesizer.
//!
//! This is the lowest layer of the workspace. It hides the MIDI backend
//! behind three small traits:
//! - [`MidiPort`] — enumerate, open and probe a port
//! - [`InputPort`] — register the inbound-message callback and category filter
//! - [`OutputPort`] — fire-and-forget outbound sends
//!
//! Backends:
//! - `midir` (feature `midir`) — ALSA / CoreMIDI / WinMM via the `midir` crate
//! - `mock` (feature `mock`) — in-memory scripted port pair for tests

pub mod discovery;
pub mod error;
pub mod filter;
pub mod traits;

#[cfg(feature = "midir")]
pub mod midi;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use discovery::{find_port, open_matching};
pub use error::{Result, TransportError};
pub use filter::{MessageCategory, MessageFilter};
pub use traits::{InboundCallback, InputPort, MidiPort, OutputPort, PortInfo};

#[cfg(feature = "midir")]
pub use midi::{MidirInput, MidirOutput, DEFAULT_CLIENT_NAME};
