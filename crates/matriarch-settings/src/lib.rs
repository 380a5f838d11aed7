//! Query and change Moog Matriarch global settings over MIDI sysex.
//!
//! The Matriarch exposes its global settings as numbered 16-bit parameters
//! that can be read and written with short sysex frames. This crate ties
//! the layers together.
//!
//! # Crate Structure
//!
//! - [`transport`] — MIDI port traits, discovery and backends
//! - [`frame`] — Sysex request/response codec
//! - [`session`] — Blocking parameter exchanges, batch updates and queries

/// Re-export transport types.
pub mod transport {
    pub use matriarch_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use matriarch_frame::*;
}

/// Re-export session types.
pub mod session {
    pub use matriarch_session::*;
}
