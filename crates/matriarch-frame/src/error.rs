/// Errors that can occur while encoding or decoding sysex frames.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// The parameter ID is outside `0..MAX_PARAMS`.
    #[error("parameter {id} out of range (max {max})")]
    OutOfRange { id: u16, max: u16 },

    /// The message is not a system exclusive message.
    #[error("not a sysex message (status byte {0:#04x})")]
    NotSysex(u8),

    /// The message is too short to contain the requested field.
    #[error("frame too short ({len} bytes, need {min})")]
    TooShort { len: usize, min: usize },

    /// The frame does not carry the Matriarch header.
    #[error("unexpected sysex header {0:02x?}")]
    BadHeader([u8; 3]),

    /// The frame-type byte is neither read nor write.
    #[error("unknown frame type {0:#04x}")]
    UnknownFrameType(u8),

    /// The frame is not closed by the sysex end byte.
    #[error("frame not terminated by 0xf7")]
    Unterminated,
}

pub type Result<T> = std::result::Result<T, FrameError>;
