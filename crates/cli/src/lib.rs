use anyhow::Result;

use clap::{Parser, Subcommand};

use crate::commands::{MigrateArgs, MigrateOutcome, handle_migrate};
pub mod commands;
mod finders;
pub mod logging;
pub mod options;

pub use logging::LoggingError;

#[derive(Parser, Debug)]
#[command(
    name = "cpm-migrate",
    author,
    version,
    about = "Migrates a codebase to use NuGet central package management (CPM)",
    help_template = "{name} {version}\n{about}\n\n{usage-heading} {usage}\n\n{all-args}"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Migrate(MigrateArgs),
}

/// Runs the command line and reports how it ended; the caller turns the outcome into the
/// process exit code.
pub async fn main(args: &[String]) -> Result<MigrateOutcome> {
    let cli = Cli::parse_from(args);
    match cli.command {
        Commands::Migrate(args) => handle_migrate(&args).await,
    }
}
