use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};
use crate::param::ParamId;

/// Total length of every request and response frame.
pub const FRAME_LEN: usize = 17;

/// System exclusive start byte.
pub const SYSEX_START: u8 = 0xF0;

/// System exclusive end byte.
pub const SYSEX_END: u8 = 0xF7;

/// Sysex start, Moog manufacturer ID, Matriarch device ID.
pub const HEADER: [u8; 3] = [SYSEX_START, 0x04, 0x17];

/// Frame type: read a global parameter.
pub const READ_PARAM: u8 = 0x3E;

/// Frame type: write a global parameter.
pub const WRITE_PARAM: u8 = 0x23;

/// Offset of the frame-type byte.
pub const FRAME_TYPE_OFFSET: usize = 3;

/// Offset of the parameter ID.
pub const PARAM_ID_OFFSET: usize = 4;

/// Offset of the big-endian value (MSB, then LSB).
pub const VALUE_OFFSET: usize = 5;

/// A parameter request sent to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Ask for the current value of a parameter.
    Read(ParamId),
    /// Store a new value for a parameter.
    Write(ParamId, u16),
}

impl Request {
    /// The parameter this request addresses.
    pub fn param(&self) -> ParamId {
        match *self {
            Self::Read(id) | Self::Write(id, _) => id,
        }
    }

    /// The frame-type byte for this request.
    pub fn frame_type(&self) -> u8 {
        match self {
            Self::Read(_) => READ_PARAM,
            Self::Write(..) => WRITE_PARAM,
        }
    }

    /// Append the wire form of this request to `dst`.
    ///
    /// Wire format:
    /// ```text
    /// ┌──────────┬──────┬──────┬───────────┬───────────┬──────────┬──────┐
    /// │ F0 04 17 │ type │  id  │ value MSB │ value LSB │ 00 x 9   │  F7  │
    /// └──────────┴──────┴──────┴───────────┴───────────┴──────────┴──────┘
    /// ```
    /// Reads leave the value bytes zero.
    pub fn encode(&self, dst: &mut BytesMut) {
        let value = match *self {
            Self::Read(_) => 0,
            Self::Write(_, value) => value,
        };
        put_frame(dst, self.frame_type(), self.param().as_byte(), value);
    }

    /// The wire form of this request.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(FRAME_LEN);
        self.encode(&mut buf);
        buf.freeze()
    }

    /// Parse a request frame, as a device would.
    pub fn decode(frame: &[u8]) -> Result<Self> {
        check_frame(frame)?;
        let id = ParamId::new(u16::from(frame[PARAM_ID_OFFSET]))?;
        match frame[FRAME_TYPE_OFFSET] {
            READ_PARAM => Ok(Self::Read(id)),
            WRITE_PARAM => Ok(Self::Write(id, read_value(frame))),
            other => Err(FrameError::UnknownFrameType(other)),
        }
    }
}

/// A parameter report sent by the device in reply to a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response {
    pub value: u16,
}

impl Response {
    /// Append the wire form of this response to `dst`.
    ///
    /// Same shape as a read request, with the value field filled in and the
    /// ID byte left zero.
    pub fn encode(&self, dst: &mut BytesMut) {
        put_frame(dst, READ_PARAM, 0, self.value);
    }

    /// The wire form of this response.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(FRAME_LEN);
        self.encode(&mut buf);
        buf.freeze()
    }

    /// Parse an inbound message into a response.
    pub fn decode(message: &[u8]) -> Result<Self> {
        decode_value(message).map(|value| Self { value })
    }
}

/// Extract the big-endian value field from an inbound sysex message.
///
/// Only the sysex start byte and the presence of the value field are
/// checked; the device is the authority on the rest of the frame.
pub fn decode_value(message: &[u8]) -> Result<u16> {
    match message.first() {
        Some(&SYSEX_START) => {}
        Some(&status) => return Err(FrameError::NotSysex(status)),
        None => {
            return Err(FrameError::TooShort {
                len: 0,
                min: VALUE_OFFSET + 2,
            })
        }
    }
    if message.len() < VALUE_OFFSET + 2 {
        return Err(FrameError::TooShort {
            len: message.len(),
            min: VALUE_OFFSET + 2,
        });
    }
    Ok(read_value(message))
}

fn put_frame(dst: &mut BytesMut, frame_type: u8, id: u8, value: u16) {
    dst.reserve(FRAME_LEN);
    dst.put_slice(&HEADER);
    dst.put_u8(frame_type);
    dst.put_u8(id);
    dst.put_u16(value);
    dst.put_bytes(0, FRAME_LEN - VALUE_OFFSET - 3);
    dst.put_u8(SYSEX_END);
}

fn read_value(frame: &[u8]) -> u16 {
    u16::from_be_bytes([frame[VALUE_OFFSET], frame[VALUE_OFFSET + 1]])
}

fn check_frame(frame: &[u8]) -> Result<()> {
    if frame.len() < FRAME_LEN {
        return Err(FrameError::TooShort {
            len: frame.len(),
            min: FRAME_LEN,
        });
    }
    if frame[0] != SYSEX_START {
        return Err(FrameError::NotSysex(frame[0]));
    }
    if frame[..3] != HEADER {
        return Err(FrameError::BadHeader([frame[0], frame[1], frame[2]]));
    }
    if frame[FRAME_LEN - 1] != SYSEX_END {
        return Err(FrameError::Unterminated);
    }
    Ok(())
}
