use std::fmt;

use crate::error::{FrameError, Result};

/// Number of global parameters the Matriarch exposes.
pub const MAX_PARAMS: u16 = 75;

/// A range-checked global parameter ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParamId(u8);

impl ParamId {
    /// Validate `id` against [`MAX_PARAMS`].
    pub fn new(id: u16) -> Result<Self> {
        if id >= MAX_PARAMS {
            return Err(FrameError::OutOfRange {
                id,
                max: MAX_PARAMS - 1,
            });
        }
        // MAX_PARAMS < 0x80, so every valid ID is a legal sysex data byte.
        Ok(Self(id as u8))
    }

    /// The raw ID.
    pub const fn get(self) -> u16 {
        self.0 as u16
    }

    /// The ID as it appears on the wire.
    pub const fn as_byte(self) -> u8 {
        self.0
    }

    /// Every valid ID in ascending order.
    pub fn all() -> impl Iterator<Item = ParamId> {
        (0..MAX_PARAMS as u8).map(ParamId)
    }
}

impl TryFrom<u16> for ParamId {
    type Error = FrameError;

    fn try_from(id: u16) -> Result<Self> {
        Self::new(id)
    }
}

impl From<ParamId> for u16 {
    fn from(id: ParamId) -> Self {
        id.get()
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
