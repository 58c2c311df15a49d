//! DebSource CLI - Debian source package metadata tools
//!
//! Exposes the debsource engine on the command line: deb-version inspection
//! and comparison, and changelog reading. Every diagnostic the engine
//! produces is printed with its stable code, message, and source location;
//! the process exits non-zero only when error-severity diagnostics occurred.

mod commands;
mod error;

use clap::{Parser, Subcommand};
use console::style;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commands::changelog::{self, ChangelogAction};
use commands::version::{self, VersionAction};

#[derive(Debug, Parser)]
#[command(
    name = "debsource",
    version,
    about = "Debian source package metadata tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Inspect and compare deb-version strings
    #[command(subcommand)]
    Version(VersionAction),
    /// Read debian/changelog files
    #[command(subcommand)]
    Changelog(ChangelogAction),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Ctrl-C flips the shared cancellation token; in-flight reads surface it
    // as an "operation canceled" diagnostic instead of dying mid-parse.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        if let Err(error) = ctrlc::set_handler(move || cancel.cancel()) {
            debug!(%error, "could not install Ctrl-C handler");
        }
    }

    let result = match cli.command {
        Command::Version(action) => version::run(action),
        Command::Changelog(action) => changelog::run(action, &cancel),
    };

    if let Err(error) = result {
        if let Some(message) = error.display_message() {
            eprintln!("{}", style(message).red());
        }
        std::process::exit(error.exit_code());
    }
}
