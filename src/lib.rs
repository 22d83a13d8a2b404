//! windebloat library
//!
//! Core functionality for the Windows 11 debloat utility: an action
//! registry, a serial execution engine with progress reporting and
//! per-action failure isolation, and the WinGet install pipeline.

pub mod action;
pub mod catalog;
pub mod cli;
pub mod engine;
pub mod error;
pub mod progress;
pub mod registry;
pub mod settings;
pub mod winget;

// Re-export main types for convenience
pub use action::{Action, ActionOutcome, ActionStatus, Operation, RunResult, Selection};
pub use catalog::{app_registry, tweak_registry, Section};
pub use engine::{run_selection, spawn_engine_thread, EngineEvent, RunId, RunRequest};
pub use error::{DebloatError, Result};
pub use progress::{CollectingSink, FnSink, NullSink, ProgressEvent, ProgressSink};
pub use registry::ActionRegistry;
pub use settings::{DryRunStore, Hive, MemoryStore, RegCommand, SettingStore};
pub use winget::{run_installs, InstallReport, PackageTool};
