use clap::{Parser, Subcommand};
use strum::{Display, EnumString};

/// windebloat - a friendly Windows 11 debloat utility
#[derive(Parser)]
#[command(name = "windebloat")]
#[command(about = "Apply Windows 11 configuration tweaks and install essential applications")]
#[command(version)]
pub struct Cli {
    /// Dry-run mode: show what would be executed without making changes.
    ///
    /// Registry writes are logged instead of applied and install commands
    /// are printed instead of run. The package-tool availability probe
    /// still executes so install previews are realistic.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Output format for run results.
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the available tweaks and applications
    List,
    /// Apply system tweaks
    Apply {
        /// Apply the recommended set
        #[arg(long, conflicts_with = "all", conflicts_with = "ids")]
        recommended: bool,

        /// Apply every registered tweak
        #[arg(long, conflicts_with = "ids")]
        all: bool,

        /// Specific tweak ids to apply
        ids: Vec<String>,
    },
    /// Install applications through WinGet
    Install {
        /// Install every application in the catalog
        #[arg(long, conflicts_with = "ids")]
        all: bool,

        /// Specific package ids to install
        ids: Vec<String>,
    },
}

/// How run results are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[derive(Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
