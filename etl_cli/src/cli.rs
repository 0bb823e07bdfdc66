use clap::{Args, Parser, Subcommand};
use std::num::NonZeroU32;

#[derive(Debug, Parser)]
#[command(
    name = "etl",
    version,
    about = "Pull advice, activities and dog images from public APIs into Postgres",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Used when no subcommand is given.
    #[command(flatten)]
    pub run: RunArgs,
}

impl Cli {
    /// The requested command, falling back to `run` with the top-level flags.
    pub fn into_command(self) -> Commands {
        self.command.unwrap_or(Commands::Run(self.run))
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the pipeline (default if no subcommand given).
    Run(RunArgs),

    /// Print current configuration (redacted secrets).
    Config,

    /// Open one database connection and run `SELECT 1`.
    Check,
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Number of extract/transform/load iterations.
    #[arg(long, default_value = "1")]
    pub batch_size: NonZeroU32,

    /// Overrides LOG_LEVEL.
    #[arg(
        long,
        ignore_case = true,
        value_parser = ["debug", "info", "warn", "warning", "error"]
    )]
    pub log_level: Option<String>,
}
