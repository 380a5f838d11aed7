mod common;

use std::time::Duration;

use matriarch_frame::{Request, FRAME_TYPE_OFFSET, READ_PARAM, WRITE_PARAM};
use matriarch_session::{BatchError, BatchUpdater, DirectiveOutcome};

use common::{open_session, FakeSynth};

fn frame_types(bus: &matriarch_transport::mock::MockBus) -> Vec<u8> {
    bus.sent()
        .iter()
        .map(|frame| frame[FRAME_TYPE_OFFSET])
        .collect()
}

#[test]
fn applies_then_stops_at_malformed_directive() {
    let synth = FakeSynth::with_params(&[(10, 3)]);
    let bus = synth.bus();
    let session = open_session(&bus, Duration::from_secs(1));

    let report = BatchUpdater::new(&session).apply(&["10=5", "11=bogus", "12=1"]);

    assert_eq!(
        report.outcomes,
        vec![DirectiveOutcome::Applied {
            id: 10,
            previous: 3,
            value: 5
        }]
    );
    assert_eq!(report.failed_at(), Some(1));
    assert!(matches!(
        report.failure.as_ref().map(|f| &f.error),
        Some(BatchError::Parse { .. })
    ));
    assert_eq!(synth.get(10), Some(5));
    assert_eq!(synth.get(12), None);
    assert_eq!(frame_types(&bus), vec![READ_PARAM, WRITE_PARAM, READ_PARAM]);
}

#[test]
fn unchanged_value_sends_only_the_read() {
    let synth = FakeSynth::with_params(&[(10, 3)]);
    let bus = synth.bus();
    let session = open_session(&bus, Duration::from_secs(1));

    let report = BatchUpdater::new(&session).apply(&["10=3"]);

    assert!(report.succeeded());
    assert_eq!(
        report.outcomes,
        vec![DirectiveOutcome::Unchanged { id: 10, value: 3 }]
    );
    let sent = bus.sent();
    assert_eq!(sent.len(), 1);
    assert!(matches!(Request::decode(&sent[0]), Ok(Request::Read(p)) if p.get() == 10));
}

#[test]
fn out_of_range_directive_fails_before_write() {
    let synth = FakeSynth::default();
    let bus = synth.bus();
    let session = open_session(&bus, Duration::from_secs(1));

    let report = BatchUpdater::new(&session).apply(&["80=1"]);

    assert!(matches!(
        report.failure.map(|f| f.error),
        Some(BatchError::ReadFailed { id: 80, .. })
    ));
    assert_eq!(bus.sent_count(), 0);
}
