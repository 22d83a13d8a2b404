//! Configuration-write seam for tweak operations.
//!
//! Tweaks boil down to "set this value under this registry path". The
//! [`SettingStore`] trait is the seam between that intent and the mechanism:
//! the catalog builds tweak operations against the trait, production wires
//! in [`RegCommand`] (shelling out to `reg.exe`), tests wire in
//! [`MemoryStore`], and `--dry-run` wraps either in [`DryRunStore`].

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::process::Command;
use std::sync::Mutex;
use tracing::{debug, info};

/// Registry hive a value lives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hive {
    CurrentUser,
    LocalMachine,
}

impl Hive {
    /// The hive prefix as `reg.exe` expects it.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::CurrentUser => "HKCU",
            Self::LocalMachine => "HKLM",
        }
    }
}

/// Writes configuration values. Implementations signal failure via the
/// returned `Result`; callers never inspect exit codes.
pub trait SettingStore: Send + Sync {
    /// Set a DWORD value under `hive\path`, creating the key if needed.
    fn set_dword(&self, hive: Hive, path: &str, name: &str, value: u32) -> Result<()>;
}

/// Production store: shells out to `reg.exe add`.
///
/// The program name is configurable so tests (and non-Windows smoke runs)
/// can substitute a stub.
#[derive(Debug, Clone)]
pub struct RegCommand {
    program: String,
}

impl Default for RegCommand {
    fn default() -> Self {
        Self {
            program: "reg".to_string(),
        }
    }
}

impl RegCommand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different executable in place of `reg`.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl SettingStore for RegCommand {
    fn set_dword(&self, hive: Hive, path: &str, name: &str, value: u32) -> Result<()> {
        let key = format!("{}\\{}", hive.prefix(), path);
        debug!(%key, %name, value, "writing registry value");

        let value = value.to_string();
        let output = Command::new(&self.program)
            .args([
                "add",
                key.as_str(),
                "/v",
                name,
                "/t",
                "REG_DWORD",
                "/d",
                value.as_str(),
                "/f",
            ])
            .output()
            .with_context(|| format!("failed to run {}", self.program))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "reg add {} /v {} failed (exit code {}): {}",
                key,
                name,
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )
        }
    }
}

/// In-memory store for tests: records every write, keyed by
/// `hive\path\name`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, u32>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, hive: Hive, path: &str, name: &str) -> Option<u32> {
        self.values
            .lock()
            .unwrap()
            .get(&Self::key(hive, path, name))
            .copied()
    }

    pub fn write_count(&self) -> usize {
        self.values.lock().unwrap().len()
    }

    fn key(hive: Hive, path: &str, name: &str) -> String {
        format!("{}\\{}\\{}", hive.prefix(), path, name)
    }
}

impl SettingStore for MemoryStore {
    fn set_dword(&self, hive: Hive, path: &str, name: &str, value: u32) -> Result<()> {
        self.values
            .lock()
            .unwrap()
            .insert(Self::key(hive, path, name), value);
        Ok(())
    }
}

/// Wrapper that logs what would be written without touching the system.
pub struct DryRunStore;

impl SettingStore for DryRunStore {
    fn set_dword(&self, hive: Hive, path: &str, name: &str, value: u32) -> Result<()> {
        info!(
            "[dry-run] would set {}\\{} {} = {}",
            hive.prefix(),
            path,
            name,
            value
        );
        Ok(())
    }
}
