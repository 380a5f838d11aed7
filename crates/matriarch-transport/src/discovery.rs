use tracing::debug;

use crate::error::{Result, TransportError};
use crate::traits::{MidiPort, PortInfo};

/// Find the port whose name contains `needle`.
///
/// When several ports match, the last one in the backend's list wins.
pub fn find_port<P: MidiPort + ?Sized>(port: &P, needle: &str) -> Result<PortInfo> {
    let mut found = None;
    for info in port.list_ports()? {
        debug!(index = info.index, name = %info.name, "found MIDI port");
        if info.name.contains(needle) {
            found = Some(info);
        }
    }

    found.ok_or_else(|| TransportError::DeviceNotFound {
        needle: needle.to_string(),
    })
}

/// Find the port matching `needle` and open it.
pub fn open_matching<P: MidiPort + ?Sized>(port: &mut P, needle: &str) -> Result<PortInfo> {
    let info = find_port(port, needle)?;
    port.open(info.index)?;
    debug!(index = info.index, name = %info.name, "opened MIDI port");
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubPort {
        names: Vec<&'static str>,
        opened: Option<usize>,
    }

    impl MidiPort for StubPort {
        fn list_ports(&self) -> Result<Vec<PortInfo>> {
            Ok(self
                .names
                .iter()
                .enumerate()
                .map(|(index, name)| PortInfo {
                    index,
                    name: name.to_string(),
                })
                .collect())
        }

        fn open(&mut self, index: usize) -> Result<()> {
            self.opened = Some(index);
            Ok(())
        }

        fn is_open(&self) -> bool {
            self.opened.is_some()
        }
    }

    #[test]
    fn finds_substring_match() {
        let port = StubPort {
            names: vec!["Midi Through:0", "Moog Matriarch:0 20:0"],
            opened: None,
        };
        let info = find_port(&port, "Matriarch").expect("port should match");
        assert_eq!(info.index, 1);
    }

    #[test]
    fn last_match_wins() {
        let port = StubPort {
            names: vec!["Matriarch A", "Other", "Matriarch B"],
            opened: None,
        };
        assert_eq!(find_port(&port, "Matriarch").unwrap().index, 2);
    }

    #[test]
    fn missing_device_is_reported() {
        let port = StubPort {
            names: vec!["Midi Through:0"],
            opened: None,
        };
        let err = find_port(&port, "Matriarch").expect_err("nothing should match");
        assert!(matches!(err, TransportError::DeviceNotFound { ref needle } if needle == "Matriarch"));
    }

    #[test]
    fn open_matching_opens_found_index() {
        let mut port = StubPort {
            names: vec!["a", "Matriarch"],
            opened: None,
        };
        open_matching(&mut port, "Matriarch").expect("open should succeed");
        assert_eq!(port.opened, Some(1));
    }
}
