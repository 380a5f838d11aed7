/// Errors that can occur in MIDI transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The MIDI backend could not be initialised.
    #[error("failed to initialise MIDI backend: {0}")]
    Init(String),

    /// No port name matched the requested device.
    #[error("no MIDI port matching '{needle}'")]
    DeviceNotFound { needle: String },

    /// The port index is not in the current port list.
    #[error("no MIDI port at index {index} ({count} available)")]
    NoSuchPort { index: usize, count: usize },

    /// Failed to connect to the selected port.
    #[error("failed to connect to {port}: {reason}")]
    Connect { port: String, reason: String },

    /// The port is already connected.
    #[error("port already open")]
    AlreadyOpen,

    /// The operation requires an open port.
    #[error("port not open")]
    NotOpen,

    /// The backend rejected an outbound message.
    #[error("failed to send MIDI message: {0}")]
    Send(String),
}

pub type Result<T> = std::result::Result<T, TransportError>;
