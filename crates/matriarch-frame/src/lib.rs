//! Sysex codec for Matriarch global parameter exchanges.
//!
//! Every exchange uses a fixed 17-byte system exclusive frame:
//! - a 3-byte header (sysex start, Moog manufacturer ID, Matriarch device ID)
//! - a frame-type byte (read or write)
//! - the parameter ID
//! - a big-endian 16-bit value (writes and responses)
//! - zero padding and the sysex end byte
//!
//! Responses carry no parameter ID. They are matched to requests purely by
//! ordering, so only one request may be outstanding at a time.

pub mod codec;
pub mod error;
pub mod param;

pub use codec::{
    decode_value, Request, Response, FRAME_LEN, FRAME_TYPE_OFFSET, HEADER, PARAM_ID_OFFSET,
    READ_PARAM, SYSEX_END, SYSEX_START, VALUE_OFFSET, WRITE_PARAM,
};
pub use error::{FrameError, Result};
pub use param::{ParamId, MAX_PARAMS};
