use std::time::Duration;

use matriarch_transport::TransportError;

/// Errors that can occur during a parameter exchange.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The parameter ID is not below `MAX_PARAMS`. No I/O was attempted.
    #[error("parameter {id} out of range (must be below {max})")]
    OutOfRange { id: u16, max: u16 },

    /// The device did not answer a read within the response timeout.
    #[error("no response for parameter {id} within {timeout:?}")]
    NoResponse { id: u16, timeout: Duration },

    /// Another exchange is still in flight on this session.
    #[error("another exchange is already in flight")]
    Busy,

    /// A port handed to the session was not connected.
    #[error("{0} port is not open")]
    PortClosed(&'static str),

    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

pub type Result<T> = std::result::Result<T, SessionError>;
