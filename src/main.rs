//! windebloat - Main entry point
//!
//! A command-line utility for debloating Windows 11: applies configuration
//! tweaks and installs essential applications, with per-item progress and
//! failure reporting.

use anyhow::Result;
use std::sync::mpsc;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use windebloat::cli::{Cli, Commands, OutputFormat};
use windebloat::{
    catalog, spawn_engine_thread, ActionRegistry, ActionStatus, DryRunStore, EngineEvent,
    PackageTool, RegCommand, RunRequest, RunResult, Selection, SettingStore,
};

/// Initialize the tracing subscriber with appropriate settings
fn init_logging() {
    // RUST_LOG overrides; errors and warnings are always visible
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Main application entry point
fn main() -> Result<()> {
    init_logging();
    info!("windebloat starting up");

    let cli = Cli::parse_args();
    debug!("CLI arguments parsed");

    let store: Arc<dyn SettingStore> = if cli.dry_run {
        Arc::new(DryRunStore)
    } else {
        Arc::new(RegCommand::new())
    };
    let tool = if cli.dry_run {
        Arc::new(PackageTool::new().dry_run())
    } else {
        Arc::new(PackageTool::new())
    };

    let tweaks = catalog::tweak_registry(store)?;
    let apps = catalog::app_registry(Arc::clone(&tool))?;

    match cli.command {
        Some(Commands::List) | None => {
            print_catalog(&tweaks, &apps);
        }
        Some(Commands::Apply {
            recommended,
            all,
            ids,
        }) => {
            let selection = if recommended {
                tweaks.select_recommended()
            } else if all {
                tweaks.all()
            } else {
                match tweaks.by_ids(&ids) {
                    Ok(selection) => selection,
                    Err(e) => {
                        eprintln!("✗ {}", e);
                        std::process::exit(1);
                    }
                }
            };
            let result = execute_selection(selection);
            render_result(&result, cli.format)?;
        }
        Some(Commands::Install { all, ids }) => {
            let selection = if all {
                apps.all()
            } else {
                match apps.by_ids(&ids) {
                    Ok(selection) => selection,
                    Err(e) => {
                        eprintln!("✗ {}", e);
                        std::process::exit(1);
                    }
                }
            };

            if selection.is_empty() {
                println!("No applications selected.");
                return Ok(());
            }

            // Preflight before dispatching anything: one diagnostic when the
            // tool is missing beats N individual install failures.
            if !tool.is_available() {
                eprintln!("✗ WinGet is not available on this system.");
                std::process::exit(1);
            }

            let result = execute_selection(selection);
            render_result(&result, cli.format)?;
        }
    }

    Ok(())
}

/// Print the tweak and application catalogs.
fn print_catalog(tweaks: &ActionRegistry, apps: &ActionRegistry) {
    println!("{}", catalog::Section::Tweaks);
    for action in tweaks.all() {
        let marker = if action.recommended { "*" } else { " " };
        println!("  {} {:<28} {}", marker, action.id, action.label);
    }
    println!();
    println!("{}", catalog::Section::Apps);
    for action in apps.all() {
        println!("    {:<28} {}", action.id, action.label);
    }
    println!();
    println!("* recommended (apply with `windebloat apply --recommended`)");
}

/// Run a selection on the engine thread, printing progress as it streams in.
///
/// The engine thread does the blocking work; this thread only renders
/// events, so it would stay responsive if it were driving a UI instead.
fn execute_selection(selection: Selection) -> RunResult {
    if selection.is_empty() {
        return RunResult::default();
    }

    let (request_tx, request_rx) = mpsc::channel();
    let (event_tx, event_rx) = mpsc::channel();
    let handle = spawn_engine_thread(request_rx, event_tx);

    request_tx
        .send(RunRequest { id: 1, selection })
        .expect("engine thread alive");

    let result = loop {
        match event_rx.recv().expect("engine thread alive") {
            EngineEvent::Progress(_, event) => {
                println!(
                    "[{}/{} {:>3}%] {} ... {}",
                    event.index,
                    event.total,
                    event.percentage(),
                    event.action_id,
                    event.status
                );
            }
            EngineEvent::Finished(_, result) => break result,
        }
    };

    drop(request_tx);
    let _ = handle.join();
    result
}

/// Render the final run result in the requested format.
fn render_result(result: &RunResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
        OutputFormat::Text => {
            if result.is_empty() {
                println!("No actions selected.");
                return Ok(());
            }
            println!("{}", result.summary());
            for outcome in &result.outcomes {
                if let ActionStatus::Failed(reason) = &outcome.status {
                    println!("  {}: {}", outcome.id, reason);
                }
            }
        }
    }
    Ok(())
}
