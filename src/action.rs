//! Action data model
//!
//! An [`Action`] is one independent unit of configuration or installation
//! work: a stable id, a display label, a "recommended" default-selection
//! hint, and a fallible zero-argument operation. Actions are created once at
//! catalog population time and live for the duration of the process; the
//! engine only ever invokes them, it never constructs them.
//!
//! [`RunResult`] is the aggregate outcome of one run: one
//! [`ActionOutcome`] per selected action, in execution order, regardless of
//! how many of them failed.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A zero-argument, side-effecting procedure that may fail.
///
/// Failure is signalled through the returned `anyhow::Result`; the engine
/// captures it as a per-action outcome and keeps going.
pub type Operation = Box<dyn Fn() -> anyhow::Result<()> + Send + Sync>;

/// One independent unit of configuration or installation work.
pub struct Action {
    /// Stable identifier, unique within its registry.
    pub id: String,
    /// Display name. Not load-bearing for the engine.
    pub label: String,
    /// Default-selection hint.
    pub recommended: bool,
    /// The work itself.
    operation: Operation,
}

impl Action {
    /// Create a new action.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        recommended: bool,
        operation: Operation,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            recommended,
            operation,
        }
    }

    /// Invoke the action's operation.
    pub fn invoke(&self) -> anyhow::Result<()> {
        (self.operation)()
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("recommended", &self.recommended)
            .finish()
    }
}

/// An ordered sequence of actions chosen for one run.
///
/// Rebuilt from user intent before each run; never persisted.
pub type Selection = Vec<Arc<Action>>;

/// Terminal status of one executed action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum ActionStatus {
    /// The operation returned normally.
    Succeeded,
    /// The operation faulted; the payload is the captured fault description.
    Failed(String),
}

impl ActionStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded => write!(f, "ok"),
            Self::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Outcome of one executed action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    /// Id of the action that ran.
    pub id: String,
    #[serde(flatten)]
    pub status: ActionStatus,
}

/// Aggregate outcome of one execution of a selection.
///
/// Invariant: `outcomes.len() == total()` always, even when some actions
/// failed. A failing action is recorded and the run continues.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunResult {
    /// Per-action outcomes, in execution order.
    pub outcomes: Vec<ActionOutcome>,
}

impl RunResult {
    /// Count of actions attempted.
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Count of actions processed to completion (success or failure).
    pub fn completed_count(&self) -> usize {
        self.outcomes.len()
    }

    /// Count of actions whose operation faulted.
    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status.is_failed()).count()
    }

    /// Count of actions whose operation returned normally.
    pub fn succeeded_count(&self) -> usize {
        self.total() - self.failed_count()
    }

    /// True when the run had nothing to do.
    ///
    /// Callers must treat this as a distinct "nothing to do" outcome rather
    /// than success or failure.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Human-readable one-line summary, e.g. `8 of 9 succeeded, 1 failed`.
    pub fn summary(&self) -> String {
        if self.is_empty() {
            return "nothing to do".to_string();
        }
        let mut line = format!("{} of {} succeeded", self.succeeded_count(), self.total());
        if self.failed_count() > 0 {
            line.push_str(&format!(", {} failed", self.failed_count()));
        }
        line
    }
}
