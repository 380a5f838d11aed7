//! `midir` backend.
//!
//! `midir` wants the inbound handler at connect time, so the input port
//! connects with a forwarding closure and routes each message through the
//! current [`MessageFilter`] into whatever callback is registered now.

use std::sync::{Arc, Mutex, PoisonError};

use midir::{Ignore, MidiInput, MidiInputConnection, MidiOutput, MidiOutputConnection};
use tracing::{debug, trace};

use crate::error::{Result, TransportError};
use crate::filter::MessageFilter;
use crate::traits::{dispatch_inbound, InboundCallback, InputPort, MidiPort, OutputPort, PortInfo};

/// Client name announced to the MIDI subsystem.
pub const DEFAULT_CLIENT_NAME: &str = "matriarch-settings";

/// Inbound port backed by `midir`.
pub struct MidirInput {
    client_name: String,
    client: Option<MidiInput>,
    connection: Option<MidiInputConnection<()>>,
    filter: Arc<Mutex<MessageFilter>>,
    callback: Arc<Mutex<Option<InboundCallback>>>,
}

impl MidirInput {
    /// Create an unconnected input client.
    pub fn new(client_name: &str) -> Result<Self> {
        let client =
            MidiInput::new(client_name).map_err(|err| TransportError::Init(err.to_string()))?;
        Ok(Self {
            client_name: client_name.to_string(),
            client: Some(client),
            connection: None,
            filter: Arc::new(Mutex::new(MessageFilter::default())),
            callback: Arc::new(Mutex::new(None)),
        })
    }
}

impl MidiPort for MidirInput {
    fn list_ports(&self) -> Result<Vec<PortInfo>> {
        match &self.client {
            Some(client) => Ok(input_ports(client)),
            None => {
                let probe = MidiInput::new(&self.client_name)
                    .map_err(|err| TransportError::Init(err.to_string()))?;
                Ok(input_ports(&probe))
            }
        }
    }

    fn open(&mut self, index: usize) -> Result<()> {
        let Some(mut client) = self.client.take() else {
            return Err(TransportError::AlreadyOpen);
        };

        let ports = client.ports();
        let Some(port) = ports.get(index) else {
            let count = ports.len();
            self.client = Some(client);
            return Err(TransportError::NoSuchPort { index, count });
        };
        let name = client
            .port_name(port)
            .unwrap_or_else(|_| format!("input {index}"));

        let current = *self.filter.lock().unwrap_or_else(PoisonError::into_inner);
        client.ignore(to_ignore(current));

        let filter = Arc::clone(&self.filter);
        let callback = Arc::clone(&self.callback);
        match client.connect(
            port,
            &self.client_name,
            move |_stamp, message, _| dispatch_inbound(&filter, &callback, message),
            (),
        ) {
            Ok(connection) => {
                debug!(port = %name, "connected MIDI input");
                self.connection = Some(connection);
                Ok(())
            }
            Err(err) => {
                let reason = err.to_string();
                self.client = Some(err.into_inner());
                Err(TransportError::Connect { port: name, reason })
            }
        }
    }

    fn is_open(&self) -> bool {
        self.connection.is_some()
    }
}

impl InputPort for MidirInput {
    fn configure_filters(&mut self, filter: MessageFilter) -> Result<()> {
        *self.filter.lock().unwrap_or_else(PoisonError::into_inner) = filter;
        if let Some(client) = self.client.as_mut() {
            client.ignore(to_ignore(filter));
        }
        Ok(())
    }

    fn set_inbound_callback(&mut self, callback: InboundCallback) -> Result<()> {
        *self.callback.lock().unwrap_or_else(PoisonError::into_inner) = Some(callback);
        Ok(())
    }
}

/// Outbound port backed by `midir`.
pub struct MidirOutput {
    client_name: String,
    client: Option<MidiOutput>,
    connection: Option<MidiOutputConnection>,
}

impl MidirOutput {
    /// Create an unconnected output client.
    pub fn new(client_name: &str) -> Result<Self> {
        let client =
            MidiOutput::new(client_name).map_err(|err| TransportError::Init(err.to_string()))?;
        Ok(Self {
            client_name: client_name.to_string(),
            client: Some(client),
            connection: None,
        })
    }
}

impl MidiPort for MidirOutput {
    fn list_ports(&self) -> Result<Vec<PortInfo>> {
        match &self.client {
            Some(client) => Ok(output_ports(client)),
            None => {
                let probe = MidiOutput::new(&self.client_name)
                    .map_err(|err| TransportError::Init(err.to_string()))?;
                Ok(output_ports(&probe))
            }
        }
    }

    fn open(&mut self, index: usize) -> Result<()> {
        let Some(client) = self.client.take() else {
            return Err(TransportError::AlreadyOpen);
        };

        let ports = client.ports();
        let Some(port) = ports.get(index) else {
            let count = ports.len();
            self.client = Some(client);
            return Err(TransportError::NoSuchPort { index, count });
        };
        let name = client
            .port_name(port)
            .unwrap_or_else(|_| format!("output {index}"));

        match client.connect(port, &self.client_name) {
            Ok(connection) => {
                debug!(port = %name, "connected MIDI output");
                self.connection = Some(connection);
                Ok(())
            }
            Err(err) => {
                let reason = err.to_string();
                self.client = Some(err.into_inner());
                Err(TransportError::Connect { port: name, reason })
            }
        }
    }

    fn is_open(&self) -> bool {
        self.connection.is_some()
    }
}

impl OutputPort for MidirOutput {
    fn send(&mut self, message: &[u8]) -> Result<()> {
        let connection = self.connection.as_mut().ok_or(TransportError::NotOpen)?;
        trace!(bytes = ?message, "sending");
        connection
            .send(message)
            .map_err(|err| TransportError::Send(err.to_string()))
    }
}

fn input_ports(client: &MidiInput) -> Vec<PortInfo> {
    client
        .ports()
        .iter()
        .enumerate()
        .map(|(index, port)| PortInfo {
            index,
            name: client
                .port_name(port)
                .unwrap_or_else(|_| format!("input {index}")),
        })
        .collect()
}

fn output_ports(client: &MidiOutput) -> Vec<PortInfo> {
    client
        .ports()
        .iter()
        .enumerate()
        .map(|(index, port)| PortInfo {
            index,
            name: client
                .port_name(port)
                .unwrap_or_else(|_| format!("output {index}")),
        })
        .collect()
}

fn to_ignore(filter: MessageFilter) -> Ignore {
    let mut ignore = Ignore::None;
    if !filter.sysex {
        ignore = ignore | Ignore::Sysex;
    }
    if !filter.timing {
        ignore = ignore | Ignore::Time;
    }
    if !filter.active_sense {
        ignore = ignore | Ignore::ActiveSense;
    }
    ignore
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_maps_to_backend_ignore_flags() {
        assert_eq!(to_ignore(MessageFilter::all()), Ignore::None);
        assert_eq!(
            to_ignore(MessageFilter::exchange_only()),
            Ignore::TimeAndActiveSense
        );
        assert_eq!(
            to_ignore(MessageFilter {
                sysex: false,
                timing: false,
                active_sense: false,
            }),
            Ignore::All
        );
    }
}
