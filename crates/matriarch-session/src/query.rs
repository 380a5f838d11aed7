use matriarch_frame::ParamId;
use serde::Serialize;
use tracing::debug;

use crate::error::{Result, SessionError};
use crate::session::ParamAccess;

/// One parameter reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParamValue {
    pub id: u16,
    pub value: u16,
}

/// The read that ended a dump early.
#[derive(Debug)]
pub struct DumpFailure {
    pub id: u16,
    pub error: SessionError,
}

/// Result of reading every parameter.
#[derive(Debug, Default)]
pub struct DumpReport {
    /// Values read before any failure, in ascending ID order.
    pub values: Vec<ParamValue>,
    pub failure: Option<DumpFailure>,
}

impl DumpReport {
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }
}

/// Read every parameter from 0 up to `MAX_PARAMS - 1`.
///
/// The first failed read is treated as loss of communication with the
/// device and ends the dump.
pub fn dump_all<S: ParamAccess + ?Sized>(store: &S) -> DumpReport {
    let mut report = DumpReport::default();

    for param in ParamId::all() {
        let id = param.get();
        match store.get_param(id) {
            Ok(value) => report.values.push(ParamValue { id, value }),
            Err(error) => {
                debug!(param = id, read = report.values.len(), "dump stopped");
                report.failure = Some(DumpFailure { id, error });
                break;
            }
        }
    }

    report
}

/// Read each of `ids` independently.
///
/// A failed read does not stop the remaining ones.
pub fn query_params<S: ParamAccess + ?Sized>(store: &S, ids: &[u16]) -> Vec<(u16, Result<u16>)> {
    ids.iter().map(|&id| (id, store.get_param(id))).collect()
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::time::Duration;

    use super::*;
    use crate::MAX_PARAMS;

    struct CountingStore {
        fail_at: Option<u16>,
        reads: Cell<usize>,
    }

    impl ParamAccess for CountingStore {
        fn get_param(&self, id: u16) -> Result<u16> {
            self.reads.set(self.reads.get() + 1);
            if Some(id) == self.fail_at {
                return Err(SessionError::NoResponse {
                    id,
                    timeout: Duration::from_secs(1),
                });
            }
            Ok(id * 2)
        }

        fn set_param(&self, _id: u16, _value: u16) -> Result<()> {
            unreachable!("queries never write")
        }
    }

    #[test]
    fn dump_reads_every_parameter_in_order() {
        let store = CountingStore {
            fail_at: None,
            reads: Cell::new(0),
        };
        let report = dump_all(&store);

        assert!(report.succeeded());
        assert_eq!(report.values.len(), MAX_PARAMS as usize);
        assert!(report
            .values
            .iter()
            .enumerate()
            .all(|(i, pv)| pv.id as usize == i && pv.value == pv.id * 2));
    }

    #[test]
    fn dump_stops_at_first_failure() {
        let store = CountingStore {
            fail_at: Some(5),
            reads: Cell::new(0),
        };
        let report = dump_all(&store);

        assert_eq!(report.values.len(), 5);
        assert_eq!(report.failure.as_ref().map(|f| f.id), Some(5));
        assert_eq!(store.reads.get(), 6);
    }

    #[test]
    fn query_continues_past_failures() {
        let store = CountingStore {
            fail_at: Some(2),
            reads: Cell::new(0),
        };
        let results = query_params(&store, &[1, 2, 3]);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].1.as_ref().ok(), Some(&2));
        assert!(results[1].1.is_err());
        assert_eq!(results[2].1.as_ref().ok(), Some(&6));
    }
}
