use std::fmt;

use matriarch_session::{BatchError, SessionError};
use matriarch_transport::TransportError;

// Exit code constants aligned with sysexits(3) where one fits.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const VERIFY_WARNING: i32 = 60;
pub const USAGE: i32 = 64;
pub const DEVICE_NOT_FOUND: i32 = 69;
pub const COMMUNICATION: i32 = 74;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn transport_code(err: &TransportError) -> i32 {
    match err {
        TransportError::DeviceNotFound { .. } | TransportError::NoSuchPort { .. } => {
            DEVICE_NOT_FOUND
        }
        TransportError::Init(_) | TransportError::Connect { .. } | TransportError::Send(_) => {
            TRANSPORT_ERROR
        }
        TransportError::AlreadyOpen | TransportError::NotOpen => INTERNAL,
    }
}

pub fn session_code(err: &SessionError) -> i32 {
    match err {
        SessionError::OutOfRange { .. } => USAGE,
        SessionError::NoResponse { .. } => COMMUNICATION,
        SessionError::Transport(err) => transport_code(err),
        SessionError::Busy => FAILURE,
        SessionError::PortClosed(_) => INTERNAL,
    }
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    CliError::new(transport_code(&err), format!("{context}: {err}"))
}

pub fn session_error(context: &str, err: SessionError) -> CliError {
    CliError::new(session_code(&err), format!("{context}: {err}"))
}

pub fn batch_error(context: &str, err: BatchError) -> CliError {
    let code = match &err {
        BatchError::Parse { .. } => USAGE,
        BatchError::ReadFailed { source, .. } | BatchError::WriteFailed { source, .. } => {
            session_code(source)
        }
    };
    CliError::new(code, format!("{context}: {err}"))
}
