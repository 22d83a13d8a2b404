//! Action registry
//!
//! Holds the process-scoped catalog of available actions and answers the
//! lookup queries the rest of the tool is built on. The registry decouples
//! *what actions exist* from *how they run*; running them is the engine's
//! job (see [`crate::engine`]).
//!
//! Built once at startup, read-only thereafter. Insertion order is stable
//! and is the order selections are produced in.

use crate::action::{Action, Selection};
use crate::error::{DebloatError, Result};
use std::collections::HashSet;
use std::sync::Arc;

/// Ordered catalog of actions with unique ids.
#[derive(Debug, Default)]
pub struct ActionRegistry {
    actions: Vec<Arc<Action>>,
}

impl ActionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an action to the catalog.
    ///
    /// Fails with [`DebloatError::DuplicateId`] if an action with the same
    /// id is already registered; the first registration is retained.
    pub fn register(&mut self, action: Action) -> Result<()> {
        if self.actions.iter().any(|a| a.id == action.id) {
            return Err(DebloatError::duplicate_id(action.id));
        }
        self.actions.push(Arc::new(action));
        Ok(())
    }

    /// The full catalog, in insertion order.
    pub fn all(&self) -> Selection {
        self.actions.clone()
    }

    /// The subsequence of recommended actions, in catalog order.
    pub fn select_recommended(&self) -> Selection {
        self.actions
            .iter()
            .filter(|a| a.recommended)
            .cloned()
            .collect()
    }

    /// Resolve a set of ids to their actions, in catalog order.
    ///
    /// All-or-nothing: fails with [`DebloatError::UnknownId`] for the first
    /// identifier not present rather than silently dropping it.
    pub fn by_ids<I, S>(&self, ids: I) -> Result<Selection>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut wanted = HashSet::new();
        for id in ids {
            let id = id.as_ref();
            if !self.actions.iter().any(|a| a.id == id) {
                return Err(DebloatError::unknown_id(id));
            }
            wanted.insert(id.to_string());
        }
        Ok(self
            .actions
            .iter()
            .filter(|a| wanted.contains(&a.id))
            .cloned()
            .collect())
    }

    /// Look up a single action by id.
    pub fn get(&self, id: &str) -> Option<Arc<Action>> {
        self.actions.iter().find(|a| a.id == id).cloned()
    }

    /// Number of registered actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// True when no actions are registered.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
