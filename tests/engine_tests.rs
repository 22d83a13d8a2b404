//! Tests for the Action Execution Engine
//!
//! These tests verify the engine's core contract:
//! - One outcome per selected action, in selection order
//! - Failure isolation (a bad action never aborts the batch)
//! - Empty selection as a distinct "nothing to do" outcome
//! - A strict, monotonic, one-event-per-action progress stream

use std::sync::{Arc, Mutex};
use windebloat::{
    run_selection, Action, ActionStatus, CollectingSink, FnSink, NullSink, ProgressEvent,
    Selection,
};

fn ok_action(id: &str) -> Arc<Action> {
    Arc::new(Action::new(id, id.to_uppercase(), false, Box::new(|| Ok(()))))
}

fn failing_action(id: &str, reason: &'static str) -> Arc<Action> {
    Arc::new(Action::new(
        id,
        id.to_uppercase(),
        false,
        Box::new(move || anyhow::bail!(reason)),
    ))
}

// =============================================================================
// Outcome Aggregation Tests
// =============================================================================

#[test]
fn test_total_equals_selection_length() {
    let selection: Selection = vec![ok_action("a"), ok_action("b"), ok_action("c")];
    let result = run_selection(&selection, &NullSink);

    assert_eq!(result.total(), 3, "total should equal selection length");
    assert_eq!(
        result.outcomes.len(),
        3,
        "one outcome per selected action, always"
    );
}

#[test]
fn test_outcome_order_matches_selection_order() {
    let selection: Selection = vec![
        ok_action("third"),
        ok_action("first"),
        ok_action("second"),
    ];
    let result = run_selection(&selection, &NullSink);

    let ids: Vec<&str> = result.outcomes.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["third", "first", "second"],
        "outcomes must preserve selection order, not sort or reorder"
    );
}

#[test]
fn test_empty_selection_is_nothing_to_do() {
    let sink = CollectingSink::new();
    let result = run_selection(&Vec::new(), &sink);

    assert_eq!(result.total(), 0);
    assert!(result.is_empty(), "empty run must be distinguishable");
    assert!(
        sink.events().is_empty(),
        "empty selection must emit zero progress events"
    );

    // Distinct from an all-succeeded run, which is non-empty.
    let all_ok = run_selection(&vec![ok_action("a")], &NullSink);
    assert!(!all_ok.is_empty());
    assert_eq!(all_ok.failed_count(), 0);
}

// =============================================================================
// Failure Isolation Tests
// =============================================================================

#[test]
fn test_failing_action_does_not_stop_batch() {
    let selection: Selection = vec![
        ok_action("a"),
        failing_action("b", "deliberate failure"),
        ok_action("c"),
        ok_action("d"),
    ];
    let result = run_selection(&selection, &NullSink);

    assert_eq!(
        result.completed_count(),
        4,
        "all actions must be attempted even after a failure"
    );
    assert_eq!(result.failed_count(), 1);
    assert_eq!(result.succeeded_count(), 3);
    assert!(result.outcomes[1].status.is_failed());
    assert_eq!(result.outcomes[3].status, ActionStatus::Succeeded);
}

#[test]
fn test_failure_reason_is_captured() {
    let selection: Selection = vec![failing_action("bad", "registry write denied")];
    let result = run_selection(&selection, &NullSink);

    match &result.outcomes[0].status {
        ActionStatus::Failed(reason) => {
            assert!(
                reason.contains("registry write denied"),
                "fault description should be captured, got: {}",
                reason
            );
        }
        ActionStatus::Succeeded => panic!("action should have failed"),
    }
}

#[test]
fn test_all_failing_actions_still_run() {
    let selection: Selection = vec![
        failing_action("a", "one"),
        failing_action("b", "two"),
        failing_action("c", "three"),
    ];
    let result = run_selection(&selection, &NullSink);

    assert_eq!(result.total(), 3);
    assert_eq!(result.failed_count(), 3);
    assert_eq!(result.summary(), "0 of 3 succeeded, 3 failed");
}

// =============================================================================
// Progress Stream Tests
// =============================================================================

#[test]
fn test_one_event_per_action_in_order() {
    let selection: Selection = vec![ok_action("a"), failing_action("b", "x"), ok_action("c")];
    let sink = CollectingSink::new();
    run_selection(&selection, &sink);

    let events = sink.events();
    assert_eq!(events.len(), 3, "exactly one event per action, no batching");
    for (k, event) in events.iter().enumerate() {
        assert_eq!(event.index, k + 1, "k-th event carries index k");
        assert_eq!(event.total, 3);
    }
    assert_eq!(events[0].action_id, "a");
    assert_eq!(events[1].action_id, "b");
    assert_eq!(events[2].action_id, "c");
    assert!(events[1].status.is_failed());
}

#[test]
fn test_event_for_item_delivered_before_next_item_begins() {
    // Interleave markers from operations and the sink into one trace: the
    // event for item i must land between item i and item i+1.
    let trace: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    let mut selection: Selection = Vec::new();
    for id in ["a", "b", "c"] {
        let trace = Arc::clone(&trace);
        selection.push(Arc::new(Action::new(
            id,
            id.to_uppercase(),
            false,
            Box::new(move || {
                trace.lock().unwrap().push(format!("run-{}", id));
                Ok(())
            }),
        )));
    }

    let sink_trace = Arc::clone(&trace);
    let sink = FnSink(move |event: &ProgressEvent| {
        sink_trace
            .lock()
            .unwrap()
            .push(format!("event-{}", event.action_id));
    });
    run_selection(&selection, &sink);

    assert_eq!(
        trace.lock().unwrap().clone(),
        vec!["run-a", "event-a", "run-b", "event-b", "run-c", "event-c"],
        "progress for item i must be delivered before item i+1 begins"
    );
}

#[test]
fn test_final_event_reports_exactly_100_percent() {
    // 7 actions: a fixed 100/7 increment would top out at 98.
    let selection: Selection = (0..7).map(|i| ok_action(&format!("t{}", i))).collect();
    let sink = CollectingSink::new();
    run_selection(&selection, &sink);

    let last = sink.last().expect("events were emitted");
    assert_eq!(last.index, 7);
    assert_eq!(
        last.percentage(),
        100,
        "progress must reach exactly 100 regardless of divisibility"
    );
}

#[test]
fn test_each_action_runs_exactly_once() {
    let counter = Arc::new(Mutex::new(0usize));
    let counter_clone = Arc::clone(&counter);
    let selection: Selection = vec![Arc::new(Action::new(
        "counted",
        "Counted",
        false,
        Box::new(move || {
            *counter_clone.lock().unwrap() += 1;
            Ok(())
        }),
    ))];

    run_selection(&selection, &NullSink);
    assert_eq!(*counter.lock().unwrap(), 1, "no retry, no double dispatch");
}
