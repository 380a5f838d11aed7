#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use matriarch_frame::{Request, Response};
use matriarch_session::{DeviceSession, SessionConfig};
use matriarch_transport::mock::{MockBus, MockInput, MockOutput};
use matriarch_transport::MidiPort;

pub type MockSession = DeviceSession<MockInput, MockOutput>;

/// Parameter memory of a simulated synth, shared with the responder.
#[derive(Clone, Default)]
pub struct FakeSynth {
    params: Arc<Mutex<HashMap<u16, u16>>>,
}

impl FakeSynth {
    pub fn with_params(values: &[(u16, u16)]) -> Self {
        let synth = Self::default();
        synth.params().extend(values.iter().copied());
        synth
    }

    pub fn get(&self, id: u16) -> Option<u16> {
        self.params().get(&id).copied()
    }

    /// A bus that answers reads from memory and applies writes silently.
    pub fn bus(&self) -> MockBus {
        let synth = self.clone();
        MockBus::new(move |message| match Request::decode(message).ok()? {
            Request::Read(param) => {
                let value = synth.get(param.get()).unwrap_or(0);
                Some(Response { value }.to_bytes().to_vec())
            }
            Request::Write(param, value) => {
                synth.params().insert(param.get(), value);
                None
            }
        })
    }

    fn params(&self) -> std::sync::MutexGuard<'_, HashMap<u16, u16>> {
        self.params.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn open_session(bus: &MockBus, timeout: Duration) -> MockSession {
    let mut input = bus.input();
    let mut output = bus.output();
    input.open(0).expect("mock input should open");
    output.open(0).expect("mock output should open");
    DeviceSession::with_config(
        input,
        output,
        SessionConfig {
            response_timeout: timeout,
        },
    )
    .expect("session should start over open ports")
}
