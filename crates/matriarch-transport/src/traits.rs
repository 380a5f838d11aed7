use std::sync::{Mutex, PoisonError};

use tracing::trace;

use crate::error::Result;
use crate::filter::MessageFilter;

/// Handler invoked once per inbound message.
///
/// Backends call it from their own delivery thread, never from the thread
/// that registered it.
pub type InboundCallback = Box<dyn FnMut(&[u8]) + Send + 'static>;

/// One entry of a backend's port list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    /// Position in the backend's port list at enumeration time.
    pub index: usize,
    /// Human-readable port name as reported by the backend.
    pub name: String,
}

/// Behaviour shared by input and output ports.
pub trait MidiPort: Send {
    /// Enumerate the ports this backend can currently see.
    fn list_ports(&self) -> Result<Vec<PortInfo>>;

    /// Connect to the port at `index` of [`MidiPort::list_ports`].
    fn open(&mut self, index: usize) -> Result<()>;

    /// Whether a port is connected.
    fn is_open(&self) -> bool;
}

/// An inbound MIDI port.
pub trait InputPort: MidiPort {
    /// Restrict which message categories reach the inbound callback.
    fn configure_filters(&mut self, filter: MessageFilter) -> Result<()>;

    /// Register the single handler for inbound messages, replacing any previous one.
    fn set_inbound_callback(&mut self, callback: InboundCallback) -> Result<()>;
}

/// An outbound MIDI port.
pub trait OutputPort: MidiPort {
    /// Send one complete message. Does not wait for any reply.
    fn send(&mut self, message: &[u8]) -> Result<()>;
}

/// Apply `filter` to `message` and hand it to the registered callback, if any.
///
/// Runs on the backend's delivery thread.
pub(crate) fn dispatch_inbound(
    filter: &Mutex<MessageFilter>,
    callback: &Mutex<Option<InboundCallback>>,
    message: &[u8],
) {
    let accepted = filter
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .accepts(message);
    if !accepted {
        trace!(len = message.len(), "dropping filtered inbound message");
        return;
    }

    trace!(bytes = ?message, "received");
    let mut slot = callback.lock().unwrap_or_else(PoisonError::into_inner);
    match slot.as_mut() {
        Some(handler) => handler(message),
        None => trace!("no inbound callback registered"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn dispatch_skips_filtered_categories() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: Mutex<Option<InboundCallback>> =
            Mutex::new(Some(Box::new(move |msg: &[u8]| {
                sink.lock().unwrap().push(msg.to_vec());
            })));
        let filter = Mutex::new(MessageFilter::exchange_only());

        dispatch_inbound(&filter, &callback, &[0xF8]);
        dispatch_inbound(&filter, &callback, &[0xFE]);
        dispatch_inbound(&filter, &callback, &[0xF0, 0x04, 0xF7]);

        assert_eq!(*seen.lock().unwrap(), vec![vec![0xF0, 0x04, 0xF7]]);
    }

    #[test]
    fn dispatch_without_callback_is_a_no_op() {
        let callback: Mutex<Option<InboundCallback>> = Mutex::new(None);
        let filter = Mutex::new(MessageFilter::all());
        dispatch_inbound(&filter, &callback, &[0xF0, 0xF7]);
    }
}
