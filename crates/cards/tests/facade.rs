//! The prelude is enough to drive a stack end to end.

use cards::prelude::*;
use cards_harness::RecordingHost;

#[test]
fn prelude_drives_a_stack() {
    cards_harness::init_test_logging();
    let mut stack = CardStackController::new(RecordingHost::default(), CardStackConfig::default());
    stack.push(ViewId(1), false);
    stack.push(ViewId(2), false);
    assert_eq!(stack.state(), StackState::Idle);
    assert_eq!(stack.top(), Some(ViewId(2)));

    stack.handle_pan(PanEvent::new(PanPhase::Began, 0.0, 0.0));
    let response = stack.handle_pan(PanEvent::new(PanPhase::Ended, 40.0, 120.0));
    assert!(matches!(response, PanResponse::Dismissing(_)));
    for _ in 0..1_000 {
        if stack.is_settled() {
            break;
        }
        stack.tick(std::time::Duration::from_millis(16));
    }
    assert_eq!(stack.contents(), vec![ViewId(1)]);
    assert!(
        stack
            .drain_events()
            .iter()
            .any(|e| matches!(e, StackEvent::Detached(ViewId(2))))
    );
}

#[test]
fn facade_reexports_math() {
    assert_eq!(cards::rubber_band(0.0, 100.0), 0.0);
    assert_eq!(cards::AppearanceConfig::default().scale_at(1), 0.9);
}
