//! In-memory port pair for tests.
//!
//! A [`MockBus`] connects one [`MockInput`] and one [`MockOutput`]. Every
//! message sent on the output is recorded and handed to a responder
//! closure; a reply, if any, is delivered to the input callback from a
//! freshly spawned thread, the way a real backend delivers from its own
//! thread.

use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use bytes::Bytes;

use crate::error::{Result, TransportError};
use crate::filter::MessageFilter;
use crate::traits::{dispatch_inbound, InboundCallback, InputPort, MidiPort, OutputPort, PortInfo};

/// Decides the reply, if any, to each outbound message.
pub type Responder = Box<dyn FnMut(&[u8]) -> Option<Vec<u8>> + Send>;

/// Port name the mock bus advertises unless overridden.
pub const MOCK_PORT_NAME: &str = "Moog Matriarch (mock)";

struct BusInner {
    ports: Vec<String>,
    responder: Mutex<Responder>,
    filter: Mutex<MessageFilter>,
    callback: Mutex<Option<InboundCallback>>,
    sent: Mutex<Vec<Bytes>>,
    reply_delay: Mutex<Duration>,
}

/// Shared state behind a mock input/output pair.
#[derive(Clone)]
pub struct MockBus {
    inner: Arc<BusInner>,
}

impl MockBus {
    /// Create a bus whose replies come from `responder`.
    pub fn new(responder: impl FnMut(&[u8]) -> Option<Vec<u8>> + Send + 'static) -> Self {
        Self::with_port_names(&[MOCK_PORT_NAME], responder)
    }

    /// Create a bus that never replies.
    pub fn silent() -> Self {
        Self::new(|_| None)
    }

    /// Create a bus advertising explicit port names.
    pub fn with_port_names(
        names: &[&str],
        responder: impl FnMut(&[u8]) -> Option<Vec<u8>> + Send + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(BusInner {
                ports: names.iter().map(|name| name.to_string()).collect(),
                responder: Mutex::new(Box::new(responder)),
                filter: Mutex::new(MessageFilter::default()),
                callback: Mutex::new(None),
                sent: Mutex::new(Vec::new()),
                reply_delay: Mutex::new(Duration::ZERO),
            }),
        }
    }

    /// Unconnected input end of the bus.
    pub fn input(&self) -> MockInput {
        MockInput {
            bus: self.clone(),
            open: false,
        }
    }

    /// Unconnected output end of the bus.
    pub fn output(&self) -> MockOutput {
        MockOutput {
            bus: self.clone(),
            open: false,
        }
    }

    /// Delay applied before each reply is delivered.
    pub fn set_reply_delay(&self, delay: Duration) {
        *self
            .inner
            .reply_delay
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = delay;
    }

    /// Every message sent on the output so far, in order.
    pub fn sent(&self) -> Vec<Bytes> {
        self.inner
            .sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of messages sent on the output so far.
    pub fn sent_count(&self) -> usize {
        self.inner
            .sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Deliver an unsolicited message to the input callback from another thread.
    pub fn inject(&self, message: &[u8]) -> JoinHandle<()> {
        self.deliver_later(message.to_vec(), Duration::ZERO)
    }

    fn deliver_later(&self, message: Vec<u8>, delay: Duration) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        thread::spawn(move || {
            if !delay.is_zero() {
                thread::sleep(delay);
            }
            dispatch_inbound(&inner.filter, &inner.callback, &message);
        })
    }

    fn port_list(&self) -> Vec<PortInfo> {
        self.inner
            .ports
            .iter()
            .enumerate()
            .map(|(index, name)| PortInfo {
                index,
                name: name.clone(),
            })
            .collect()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        let count = self.inner.ports.len();
        if index >= count {
            return Err(TransportError::NoSuchPort { index, count });
        }
        Ok(())
    }
}

/// Input end of a [`MockBus`].
pub struct MockInput {
    bus: MockBus,
    open: bool,
}

impl MidiPort for MockInput {
    fn list_ports(&self) -> Result<Vec<PortInfo>> {
        Ok(self.bus.port_list())
    }

    fn open(&mut self, index: usize) -> Result<()> {
        if self.open {
            return Err(TransportError::AlreadyOpen);
        }
        self.bus.check_index(index)?;
        self.open = true;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

impl InputPort for MockInput {
    fn configure_filters(&mut self, filter: MessageFilter) -> Result<()> {
        *self
            .bus
            .inner
            .filter
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = filter;
        Ok(())
    }

    fn set_inbound_callback(&mut self, callback: InboundCallback) -> Result<()> {
        *self
            .bus
            .inner
            .callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(callback);
        Ok(())
    }
}

/// Output end of a [`MockBus`].
pub struct MockOutput {
    bus: MockBus,
    open: bool,
}

impl MidiPort for MockOutput {
    fn list_ports(&self) -> Result<Vec<PortInfo>> {
        Ok(self.bus.port_list())
    }

    fn open(&mut self, index: usize) -> Result<()> {
        if self.open {
            return Err(TransportError::AlreadyOpen);
        }
        self.bus.check_index(index)?;
        self.open = true;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

impl OutputPort for MockOutput {
    fn send(&mut self, message: &[u8]) -> Result<()> {
        if !self.open {
            return Err(TransportError::NotOpen);
        }
        let inner = &self.bus.inner;
        inner
            .sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Bytes::copy_from_slice(message));

        let reply = {
            let mut responder = inner.responder.lock().unwrap_or_else(PoisonError::into_inner);
            responder(message)
        };
        if let Some(reply) = reply {
            let delay = *inner.reply_delay.lock().unwrap_or_else(PoisonError::into_inner);
            // Detached: the reply thread finishes on its own.
            let _ = self.bus.deliver_later(reply, delay);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    #[test]
    fn reply_reaches_callback_on_another_thread() {
        let bus = MockBus::new(|msg| Some(msg.to_vec()));
        let mut input = bus.input();
        let mut output = bus.output();
        input.open(0).unwrap();
        output.open(0).unwrap();

        let caller = thread::current().id();
        let (tx, rx) = mpsc::channel();
        input
            .set_inbound_callback(Box::new(move |msg: &[u8]| {
                let _ = tx.send((thread::current().id(), msg.to_vec()));
            }))
            .unwrap();

        output.send(&[0xF0, 0x01, 0xF7]).unwrap();
        let (delivered_on, msg) = rx.recv_timeout(Duration::from_secs(2)).unwrap();

        assert_ne!(delivered_on, caller);
        assert_eq!(msg, vec![0xF0, 0x01, 0xF7]);
        assert_eq!(bus.sent_count(), 1);
    }

    #[test]
    fn send_requires_open_port() {
        let bus = MockBus::silent();
        let mut output = bus.output();
        assert!(matches!(
            output.send(&[0xF0, 0xF7]),
            Err(TransportError::NotOpen)
        ));
        assert_eq!(bus.sent_count(), 0);
    }

    #[test]
    fn open_rejects_unknown_index() {
        let bus = MockBus::silent();
        let mut input = bus.input();
        assert!(matches!(
            input.open(3),
            Err(TransportError::NoSuchPort { index: 3, count: 1 })
        ));
        assert!(!input.is_open());
    }

    #[test]
    fn filter_applies_to_injected_messages() {
        let bus = MockBus::silent();
        let mut input = bus.input();
        input.open(0).unwrap();
        input
            .configure_filters(MessageFilter::exchange_only())
            .unwrap();

        let (tx, rx) = mpsc::channel();
        input
            .set_inbound_callback(Box::new(move |msg: &[u8]| {
                let _ = tx.send(msg.to_vec());
            }))
            .unwrap();

        bus.inject(&[0xF8]).join().unwrap();
        bus.inject(&[0xF0, 0x7F, 0xF7]).join().unwrap();

        assert_eq!(rx.try_recv().unwrap(), vec![0xF0, 0x7F, 0xF7]);
        assert!(rx.try_recv().is_err());
    }
}
