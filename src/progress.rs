//! Progress reporting for action execution
//!
//! The engine emits exactly one [`ProgressEvent`] per completed action,
//! synchronously, before the next action begins. Events are transient:
//! consumed live by a [`ProgressSink`], never stored by the engine.

use crate::action::ActionStatus;
use serde::Serialize;

/// Notification emitted after each action completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    /// 1-based count of actions completed so far (this event is the
    /// `index`-th of `total`).
    pub index: usize,
    /// Total actions in the selection.
    pub total: usize,
    /// Id of the action that just completed.
    pub action_id: String,
    /// How it went.
    pub status: ActionStatus,
}

impl ProgressEvent {
    /// Exact progress percentage, `completed / total` scaled to 0-100.
    ///
    /// Integer division here rounds down per step but always reaches 100
    /// on the final event, unlike accumulating a fixed `100 / total`
    /// increment.
    pub fn percentage(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.index * 100) / self.total) as u8
    }
}

/// Consumer of progress events.
///
/// Only ever called from the thread driving the run, so implementations
/// need no synchronization of their own (the channel-forwarding sink in
/// the engine relies on this: an mpsc `Sender` is not `Sync`).
pub trait ProgressSink {
    /// Receive one event. Called synchronously between action completions.
    fn on_progress(&self, event: &ProgressEvent);
}

/// Adapter turning a closure into a sink.
pub struct FnSink<F>(pub F);

impl<F> ProgressSink for FnSink<F>
where
    F: Fn(&ProgressEvent),
{
    fn on_progress(&self, event: &ProgressEvent) {
        (self.0)(event)
    }
}

/// A sink that discards all events.
#[derive(Debug, Default, Clone)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn on_progress(&self, _event: &ProgressEvent) {
        // Intentionally empty
    }
}

/// A sink that collects all events, for tests and buffered renderers.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: std::sync::Mutex<Vec<ProgressEvent>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<ProgressEvent> {
        self.events.lock().unwrap().last().cloned()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl ProgressSink for CollectingSink {
    fn on_progress(&self, event: &ProgressEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
