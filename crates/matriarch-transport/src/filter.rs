//! Inbound message categories and the filter applied before delivery.

/// Status byte opening a system exclusive message.
pub const SYSEX_START: u8 = 0xF0;
/// MIDI time code quarter frame.
pub const MTC_QUARTER_FRAME: u8 = 0xF1;
/// Timing clock.
pub const TIMING_CLOCK: u8 = 0xF8;
/// Active sensing keep-alive.
pub const ACTIVE_SENSE: u8 = 0xFE;

/// Coarse classification of an inbound message by its status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageCategory {
    SystemExclusive,
    Timing,
    ActiveSense,
    Other,
}

impl MessageCategory {
    /// Classify a complete message.
    pub fn classify(message: &[u8]) -> Self {
        match message.first() {
            Some(&SYSEX_START) => Self::SystemExclusive,
            Some(&(MTC_QUARTER_FRAME | TIMING_CLOCK)) => Self::Timing,
            Some(&ACTIVE_SENSE) => Self::ActiveSense,
            _ => Self::Other,
        }
    }
}

/// Which message categories are passed to the inbound callback.
///
/// Each flag is `true` when that category is delivered. Messages in
/// [`MessageCategory::Other`] are always delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageFilter {
    pub sysex: bool,
    pub timing: bool,
    pub active_sense: bool,
}

impl MessageFilter {
    /// Deliver everything.
    pub const fn all() -> Self {
        Self {
            sysex: true,
            timing: true,
            active_sense: true,
        }
    }

    /// Deliver sysex, drop clock and active-sense chatter.
    pub const fn exchange_only() -> Self {
        Self {
            sysex: true,
            timing: false,
            active_sense: false,
        }
    }

    /// Whether `message` passes this filter.
    pub fn accepts(&self, message: &[u8]) -> bool {
        match MessageCategory::classify(message) {
            MessageCategory::SystemExclusive => self.sysex,
            MessageCategory::Timing => self.timing,
            MessageCategory::ActiveSense => self.active_sense,
            MessageCategory::Other => true,
        }
    }
}

impl Default for MessageFilter {
    fn default() -> Self {
        Self::all()
    }
}
