//! engine.rs - Executes a selection of actions serially with failure isolation.
//!
//! Two layers:
//!
//! - [`run_selection`] is the synchronous core: iterate the selection in
//!   order, invoke each action exactly once, capture the outcome, emit one
//!   progress event, and keep going even when an action faults. Intended to
//!   be called from a worker context.
//! - [`spawn_engine_thread`] provides that worker context: a dedicated
//!   background thread that listens for [`RunRequest`]s, drives
//!   `run_selection`, and streams [`EngineEvent`]s back to the caller. This
//!   keeps the interactive thread responsive while actions (registry writes,
//!   package installs) block.
//!
//! Execution is strictly serial: the actions mutate shared process-wide
//! configuration state, so exactly one action is in flight at a time and no
//! locking discipline is needed inside the engine.

use crate::action::{ActionOutcome, ActionStatus, RunResult, Selection};
use crate::progress::{FnSink, ProgressEvent, ProgressSink};
use std::sync::mpsc::{Receiver, Sender};
use tracing::{debug, error, info, warn};

/// Unique identifier for each run request/event stream pair.
pub type RunId = u64;

/// A request to execute a selection on the engine thread.
pub struct RunRequest {
    pub id: RunId,
    pub selection: Selection,
}

impl std::fmt::Debug for RunRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunRequest")
            .field("id", &self.id)
            .field("selection", &self.selection.len())
            .finish()
    }
}

/// Events streamed back from the engine thread for one run.
///
/// For a run of N actions the caller receives N `Progress` events followed
/// by exactly one `Finished`, all tagged with the request's [`RunId`].
#[derive(Debug)]
pub enum EngineEvent {
    Progress(RunId, ProgressEvent),
    Finished(RunId, RunResult),
}

/// Execute a selection in order, one action at a time.
///
/// An action whose operation faults is recorded as
/// [`ActionStatus::Failed`] with the rendered fault chain; the fault never
/// escapes this function and never prevents the remaining actions from
/// running. After each action completes, one [`ProgressEvent`] is delivered
/// to `sink` before the next action begins.
///
/// An empty selection returns immediately with `total == 0` and emits no
/// events; callers must treat that as "nothing to do" rather than success.
pub fn run_selection(selection: &Selection, sink: &dyn ProgressSink) -> RunResult {
    let total = selection.len();
    if total == 0 {
        debug!("run_selection called with empty selection, nothing to do");
        return RunResult::default();
    }

    info!("starting run of {} action(s)", total);
    let mut outcomes = Vec::with_capacity(total);

    for (completed, action) in selection.iter().enumerate().map(|(i, a)| (i + 1, a)) {
        debug!(id = %action.id, "executing action");

        let status = match action.invoke() {
            Ok(()) => {
                debug!(id = %action.id, "action succeeded");
                ActionStatus::Succeeded
            }
            Err(e) => {
                // {:#} renders the whole anyhow context chain on one line
                let reason = format!("{:#}", e);
                warn!(id = %action.id, %reason, "action failed, continuing");
                ActionStatus::Failed(reason)
            }
        };

        outcomes.push(ActionOutcome {
            id: action.id.clone(),
            status: status.clone(),
        });

        sink.on_progress(&ProgressEvent {
            index: completed,
            total,
            action_id: action.id.clone(),
            status,
        });
    }

    let result = RunResult { outcomes };
    info!("run complete: {}", result.summary());
    result
}

/// Spawns a dedicated thread to execute action selections.
///
/// The thread continuously listens for [`RunRequest`]s on `request_rx`.
/// For each request it runs the selection via [`run_selection`], forwarding
/// every progress event over `event_tx` as it happens, then sends the final
/// [`EngineEvent::Finished`]. The thread exits when the request sender is
/// dropped, or when the event receiver is gone.
pub fn spawn_engine_thread(
    request_rx: Receiver<RunRequest>,
    event_tx: Sender<EngineEvent>,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        debug!("engine thread started");
        while let Ok(request) = request_rx.recv() {
            debug!("received run request: {:?}", request);
            let run_id = request.id;

            let forward = {
                let event_tx = event_tx.clone();
                FnSink(move |event: &ProgressEvent| {
                    // Send failures mean the caller hung up; the run still
                    // completes so outcomes stay one-per-action.
                    let _ = event_tx.send(EngineEvent::Progress(run_id, event.clone()));
                })
            };

            let result = run_selection(&request.selection, &forward);

            if event_tx.send(EngineEvent::Finished(run_id, result)).is_err() {
                error!("failed to send run result; receiver dropped");
                break;
            }
        }
        debug!("engine thread shut down");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::progress::{CollectingSink, NullSink};
    use std::sync::mpsc;
    use std::sync::Arc;

    fn ok_action(id: &str) -> Arc<Action> {
        Arc::new(Action::new(id, id.to_uppercase(), true, Box::new(|| Ok(()))))
    }

    fn failing_action(id: &str, reason: &'static str) -> Arc<Action> {
        Arc::new(Action::new(
            id,
            id.to_uppercase(),
            true,
            Box::new(move || anyhow::bail!(reason)),
        ))
    }

    #[test]
    fn test_run_empty_selection() {
        let sink = CollectingSink::new();
        let result = run_selection(&vec![], &sink);

        assert!(result.is_empty());
        assert_eq!(result.total(), 0);
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_run_all_succeed() {
        let selection = vec![ok_action("a"), ok_action("b")];
        let result = run_selection(&selection, &NullSink);

        assert_eq!(result.total(), 2);
        assert_eq!(result.failed_count(), 0);
        assert!(result
            .outcomes
            .iter()
            .all(|o| o.status == ActionStatus::Succeeded));
    }

    #[test]
    fn test_failure_does_not_stop_batch() {
        let selection = vec![
            ok_action("a"),
            failing_action("b", "deliberate"),
            ok_action("c"),
        ];
        let result = run_selection(&selection, &NullSink);

        assert_eq!(result.total(), 3);
        assert_eq!(result.completed_count(), 3);
        assert_eq!(result.failed_count(), 1);
        assert_eq!(result.outcomes[1].id, "b");
        assert!(result.outcomes[1].status.is_failed());
        assert_eq!(result.outcomes[2].status, ActionStatus::Succeeded);
    }

    #[test]
    fn test_progress_events_are_monotonic_and_complete() {
        let selection = vec![ok_action("a"), failing_action("b", "x"), ok_action("c")];
        let sink = CollectingSink::new();
        let result = run_selection(&selection, &sink);

        let events = sink.events();
        assert_eq!(events.len(), result.total());
        for (k, event) in events.iter().enumerate() {
            assert_eq!(event.index, k + 1);
            assert_eq!(event.total, 3);
        }
        assert_eq!(events[0].action_id, "a");
        assert_eq!(events[1].action_id, "b");
        assert!(events[1].status.is_failed());
        assert_eq!(events[2].percentage(), 100);
    }

    #[test]
    fn test_progress_delivered_before_next_action_begins() {
        // Each action asserts that the previous action's event has already
        // been delivered at the moment it starts executing.
        let seen = Arc::new(std::sync::Mutex::new(Vec::<usize>::new()));
        let trace = Arc::new(std::sync::Mutex::new(Vec::<String>::new()));

        let mut selection: Selection = Vec::new();
        for i in 0..3usize {
            let trace = trace.clone();
            selection.push(Arc::new(Action::new(
                format!("step{}", i),
                format!("Step {}", i),
                true,
                Box::new(move || {
                    trace.lock().unwrap().push(format!("run{}", i));
                    Ok(())
                }),
            )));
        }

        let trace2 = trace.clone();
        let seen2 = seen.clone();
        let sink = FnSink(move |event: &ProgressEvent| {
            trace2.lock().unwrap().push(format!("event{}", event.index));
            seen2.lock().unwrap().push(event.index);
        });
        run_selection(&selection, &sink);

        let trace = trace.lock().unwrap().clone();
        assert_eq!(
            trace,
            vec!["run0", "event1", "run1", "event2", "run2", "event3"]
        );
        assert_eq!(seen.lock().unwrap().clone(), vec![1, 2, 3]);
    }

    #[test]
    fn test_engine_thread_streams_events_then_result() {
        let (request_tx, request_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let handle = spawn_engine_thread(request_rx, event_tx);

        let selection = vec![ok_action("a"), failing_action("b", "boom")];
        request_tx
            .send(RunRequest { id: 7, selection })
            .expect("engine thread alive");

        let mut progress = Vec::new();
        let result = loop {
            match event_rx.recv().expect("engine thread alive") {
                EngineEvent::Progress(id, event) => {
                    assert_eq!(id, 7);
                    progress.push(event);
                }
                EngineEvent::Finished(id, result) => {
                    assert_eq!(id, 7);
                    break result;
                }
            }
        };

        assert_eq!(progress.len(), 2);
        assert_eq!(progress[0].index, 1);
        assert_eq!(progress[1].index, 2);
        assert_eq!(result.total(), 2);
        assert_eq!(result.failed_count(), 1);

        drop(request_tx);
        handle.join().expect("engine thread exits cleanly");
    }

    #[test]
    fn test_engine_thread_handles_empty_selection() {
        let (request_tx, request_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let handle = spawn_engine_thread(request_rx, event_tx);

        request_tx
            .send(RunRequest {
                id: 1,
                selection: vec![],
            })
            .expect("engine thread alive");

        match event_rx.recv().expect("engine thread alive") {
            EngineEvent::Finished(1, result) => assert!(result.is_empty()),
            other => panic!("expected Finished, got {:?}", other),
        }

        drop(request_tx);
        handle.join().expect("engine thread exits cleanly");
    }
}
