//! WinGet client and the availability-gated install pipeline.
//!
//! Installing an application means invoking the external package manager as
//! a subprocess with a fixed argument shape and waiting for it to exit;
//! nonzero exit is a per-item failure. Before committing to a batch of
//! installs, [`run_installs`] runs a preflight probe: invoke the tool with
//! its version flag under a short capped wait. If the tool is unreachable
//! the whole batch short-circuits with a single [`InstallReport::ToolUnavailable`]
//! and zero install invocations, instead of producing N misleading
//! per-item failures.

use crate::action::{Action, RunResult, Selection};
use crate::engine::run_selection;
use crate::progress::ProgressSink;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How long the availability probe waits for `<tool> --version` to exit.
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Client for the external package-management tool.
///
/// The program name and probe timeout are configurable so tests can
/// substitute stub binaries; production uses the defaults.
#[derive(Debug, Clone)]
pub struct PackageTool {
    program: String,
    probe_timeout: Duration,
    dry_run: bool,
}

impl Default for PackageTool {
    fn default() -> Self {
        Self {
            program: "winget".to_string(),
            probe_timeout: PROBE_TIMEOUT,
            dry_run: false,
        }
    }
}

impl PackageTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different executable in place of `winget`.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    /// Override the probe's capped wait.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Log install commands instead of running them.
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// The fixed argument shape for installing one package.
    pub fn install_args(package_id: &str) -> Vec<String> {
        vec![
            "install".to_string(),
            "--id".to_string(),
            package_id.to_string(),
            "--silent".to_string(),
            "--accept-package-agreements".to_string(),
            "--accept-source-agreements".to_string(),
        ]
    }

    /// Probe whether the tool is reachable.
    ///
    /// Availability = the process starts and exits zero within the capped
    /// wait. A process still running at the deadline is killed and counted
    /// as unavailable.
    pub fn is_available(&self) -> bool {
        debug!(program = %self.program, "probing package tool availability");
        let mut child = match Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                debug!("package tool probe failed to spawn: {}", e);
                return false;
            }
        };

        let deadline = Instant::now() + self.probe_timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return status.success(),
                Ok(None) => {
                    if Instant::now() >= deadline {
                        warn!(
                            "package tool probe still running after {:?}, giving up",
                            self.probe_timeout
                        );
                        let _ = child.kill();
                        let _ = child.wait();
                        return false;
                    }
                    std::thread::sleep(Duration::from_millis(25));
                }
                Err(e) => {
                    debug!("package tool probe wait failed: {}", e);
                    return false;
                }
            }
        }
    }

    /// Install one package, waiting for the tool to exit.
    pub fn install(&self, package_id: &str) -> anyhow::Result<()> {
        if self.dry_run {
            info!(
                "[dry-run] would run: {} {}",
                self.program,
                Self::install_args(package_id).join(" ")
            );
            return Ok(());
        }

        info!(%package_id, "installing package");
        let status = Command::new(&self.program)
            .args(Self::install_args(package_id))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| anyhow::anyhow!("failed to run {}: {}", self.program, e))?;

        if status.success() {
            Ok(())
        } else {
            anyhow::bail!(
                "install of {} failed (exit code {})",
                package_id,
                status.code().unwrap_or(-1)
            )
        }
    }

    /// Build an engine action that installs one named package.
    ///
    /// The package identifier doubles as the action id; it is already
    /// stable and unique within the application catalog.
    pub fn install_action(
        &self,
        label: impl Into<String>,
        package_id: impl Into<String>,
    ) -> Action {
        let package_id = package_id.into();
        let tool = self.clone();
        let id_for_op = package_id.clone();
        Action::new(
            package_id,
            label,
            false,
            Box::new(move || tool.install(&id_for_op)),
        )
    }
}

/// Outcome of one call to [`run_installs`].
#[derive(Debug)]
pub enum InstallReport {
    /// Preflight failed; no installs were attempted.
    ToolUnavailable,
    /// The selection ran; inspect the [`RunResult`] for per-item outcomes.
    Completed(RunResult),
}

/// Run a selection of install actions, gated on tool availability.
///
/// If the preflight probe reports the tool unreachable, returns
/// [`InstallReport::ToolUnavailable`] without dispatching any of the
/// selection. Otherwise the selection runs through the ordinary engine
/// contract: serial, failure-isolated, one progress event per item.
pub fn run_installs(
    tool: &PackageTool,
    selection: &Selection,
    sink: &dyn ProgressSink,
) -> InstallReport {
    if !tool.is_available() {
        warn!("package tool unavailable, skipping {} install(s)", selection.len());
        return InstallReport::ToolUnavailable;
    }
    InstallReport::Completed(run_selection(selection, sink))
}
