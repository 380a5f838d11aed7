use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};
use std::time::Duration;

use matriarch_frame::{decode_value, ParamId, Request, FRAME_LEN, MAX_PARAMS};
use matriarch_transport::{InputPort, MessageFilter, OutputPort};
use tracing::{debug, trace};

use crate::error::{Result, SessionError};
use crate::exchange::ExchangeState;

/// How long a read waits for the device to answer.
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Session behaviour configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Upper bound on the wait for a read response.
    pub response_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
        }
    }
}

/// Read and write access to device parameters.
///
/// [`DeviceSession`] is the real implementation; the batch and query
/// workflows are written against this trait.
pub trait ParamAccess {
    /// Read the current value of parameter `id`.
    fn get_param(&self, id: u16) -> Result<u16>;

    /// Send a new value for parameter `id`.
    fn set_param(&self, id: u16, value: u16) -> Result<()>;
}

/// A connected exchange channel to one device.
///
/// Owns both ports for its whole lifetime. Exchanges are single-flight: the
/// wire protocol does not say which request a response belongs to, so a
/// second exchange started while one is in flight fails with
/// [`SessionError::Busy`].
pub struct DeviceSession<I, O> {
    // Held only so the inbound connection stays alive.
    _input: Mutex<I>,
    output: Mutex<O>,
    exchange: Arc<ExchangeState>,
    config: SessionConfig,
}

impl<I: InputPort, O: OutputPort> DeviceSession<I, O> {
    /// Create a session over two open ports with default configuration.
    pub fn new(input: I, output: O) -> Result<Self> {
        Self::with_config(input, output, SessionConfig::default())
    }

    /// Create a session over two open ports.
    ///
    /// Installs the exchange filter and the inbound callback on `input`.
    pub fn with_config(mut input: I, output: O, config: SessionConfig) -> Result<Self> {
        if !input.is_open() {
            return Err(SessionError::PortClosed("input"));
        }
        if !output.is_open() {
            return Err(SessionError::PortClosed("output"));
        }

        let exchange = Arc::new(ExchangeState::new());
        let sink = Arc::clone(&exchange);

        input.configure_filters(MessageFilter::exchange_only())?;
        input.set_inbound_callback(Box::new(move |message: &[u8]| {
            match decode_value(message) {
                Ok(value) => {
                    if message.len() != FRAME_LEN {
                        debug!(len = message.len(), "response with unexpected length");
                    }
                    sink.deliver(value);
                }
                Err(err) => debug!(%err, "ignoring inbound message"),
            }
        }))?;

        Ok(Self {
            _input: Mutex::new(input),
            output: Mutex::new(output),
            exchange,
            config,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Claim the output for one exchange, or fail if one is in flight.
    fn begin_exchange(&self) -> Result<MutexGuard<'_, O>> {
        match self.output.try_lock() {
            Ok(guard) => Ok(guard),
            Err(TryLockError::WouldBlock) => Err(SessionError::Busy),
            Err(TryLockError::Poisoned(poisoned)) => Ok(PoisonError::into_inner(poisoned)),
        }
    }
}

impl<I: InputPort, O: OutputPort> ParamAccess for DeviceSession<I, O> {
    fn get_param(&self, id: u16) -> Result<u16> {
        let param = check_id(id)?;
        let mut output = self.begin_exchange()?;

        if let Some(stale) = self.exchange.reset() {
            debug!(param = id, stale, "discarded stale response");
        }

        let frame = Request::Read(param).to_bytes();
        trace!(param = id, bytes = ?frame.as_ref(), "read request");
        output.send(&frame)?;

        let timeout = self.config.response_timeout;
        match self.exchange.await_value(timeout) {
            Some(value) => {
                debug!(param = id, value, "read parameter");
                Ok(value)
            }
            None => Err(SessionError::NoResponse { id, timeout }),
        }
    }

    fn set_param(&self, id: u16, value: u16) -> Result<()> {
        let param = check_id(id)?;
        let mut output = self.begin_exchange()?;

        let frame = Request::Write(param, value).to_bytes();
        trace!(param = id, value, bytes = ?frame.as_ref(), "write request");
        output.send(&frame)?;

        // The device sends no acknowledgement for writes; callers verify
        // with a follow-up read.
        Ok(())
    }
}

fn check_id(id: u16) -> Result<ParamId> {
    ParamId::new(id).map_err(|_| SessionError::OutOfRange {
        id,
        max: MAX_PARAMS,
    })
}

#[cfg(test)]
mod tests {
    use matriarch_frame::Response;
    use matriarch_transport::mock::{MockBus, MockInput, MockOutput};
    use matriarch_transport::MidiPort;

    use super::*;

    fn open(bus: &MockBus) -> (MockInput, MockOutput) {
        let mut input = bus.input();
        let mut output = bus.output();
        input.open(0).unwrap();
        output.open(0).unwrap();
        (input, output)
    }

    #[test]
    fn rejects_closed_ports() {
        let bus = MockBus::silent();
        let (input, _) = open(&bus);
        let err = DeviceSession::new(input, bus.output())
            .err()
            .expect("closed output should be rejected");
        assert!(matches!(err, SessionError::PortClosed("output")));

        let err = DeviceSession::new(bus.input(), bus.output())
            .err()
            .expect("closed input should be rejected");
        assert!(matches!(err, SessionError::PortClosed("input")));
    }

    #[test]
    fn get_param_sends_read_frame_and_returns_value() {
        let bus = MockBus::new(|_| Some(Response { value: 513 }.to_bytes().to_vec()));
        let (input, output) = open(&bus);
        let session = DeviceSession::new(input, output).unwrap();

        assert_eq!(session.get_param(9).unwrap(), 513);
        let sent = bus.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].as_ref(), Request::Read(ParamId::new(9).unwrap()).to_bytes().as_ref());
    }

    #[test]
    fn set_param_sends_write_frame_without_waiting() {
        let bus = MockBus::silent();
        let (input, output) = open(&bus);
        let session = DeviceSession::with_config(
            input,
            output,
            SessionConfig {
                response_timeout: Duration::from_secs(30),
            },
        )
        .unwrap();

        session.set_param(25, 0x0102).unwrap();
        let sent = bus.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            Request::decode(&sent[0]),
            Ok(Request::Write(ParamId::new(25).unwrap(), 0x0102))
        );
    }

    #[test]
    fn out_of_range_ids_never_touch_the_port() {
        let bus = MockBus::silent();
        let (input, output) = open(&bus);
        let session = DeviceSession::new(input, output).unwrap();

        assert!(matches!(
            session.get_param(MAX_PARAMS),
            Err(SessionError::OutOfRange { id: 75, .. })
        ));
        assert!(matches!(
            session.set_param(200, 1),
            Err(SessionError::OutOfRange { id: 200, .. })
        ));
        assert_eq!(bus.sent_count(), 0);
    }

    #[test]
    fn undecodable_messages_are_not_delivered() {
        let bus = MockBus::silent();
        let (input, output) = open(&bus);
        let session = DeviceSession::with_config(
            input,
            output,
            SessionConfig {
                response_timeout: Duration::from_millis(50),
            },
        )
        .unwrap();

        bus.inject(&[0x90, 0x40, 0x7F]).join().unwrap();
        bus.inject(&[0xF0, 0x04, 0xF7]).join().unwrap();
        assert!(!session.exchange.has_result());
    }
}
