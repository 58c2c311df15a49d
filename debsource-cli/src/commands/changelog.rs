//! Changelog reading CLI commands.

use std::path::PathBuf;

use clap::Subcommand;
use tokio_util::sync::CancellationToken;

use debsource::changelog::{read_first_entry, ChangelogEntry, ChangelogReader};

use crate::error::CliError;

use super::common::{unpack, OutputFormat};

/// Changelog action subcommands.
#[derive(Debug, Subcommand)]
pub enum ChangelogAction {
    /// Show the newest entry of a changelog
    Info {
        /// Path to the changelog file
        path: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// List all entries of a changelog, newest first
    List {
        /// Path to the changelog file
        path: PathBuf,

        /// Stop after this many entries
        #[arg(long)]
        limit: Option<usize>,

        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
}

/// Run a changelog subcommand.
pub fn run(action: ChangelogAction, cancel: &CancellationToken) -> Result<(), CliError> {
    match action {
        ChangelogAction::Info { path, format } => info(&path, format, cancel),
        ChangelogAction::List {
            path,
            limit,
            format,
        } => list(&path, limit, format, cancel),
    }
}

fn info(path: &PathBuf, format: OutputFormat, cancel: &CancellationToken) -> Result<(), CliError> {
    let entry = unpack(read_first_entry(path, cancel))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entry)?),
        OutputFormat::Text => {
            println!("Package:       {}", entry.package_name);
            println!("Version:       {}", entry.version);
            println!("Distributions: {}", render_distributions(&entry));
            if let Some(urgency) = entry.urgency() {
                println!("Urgency:       {}", urgency);
            }
            println!("Maintainer:    {}", entry.maintainer);
            println!("Date:          {}", entry.date.to_rfc2822());
        }
    }
    Ok(())
}

fn list(
    path: &PathBuf,
    limit: Option<usize>,
    format: OutputFormat,
    cancel: &CancellationToken,
) -> Result<(), CliError> {
    let mut reader = unpack(ChangelogReader::open(path))?;

    let mut entries: Vec<ChangelogEntry> = Vec::new();
    while limit.map_or(true, |limit| entries.len() < limit) {
        match unpack(reader.read_entry(cancel))? {
            Some(entry) => entries.push(entry),
            None => break,
        }
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Text => {
            for entry in &entries {
                println!(
                    "{} ({}) {} -- {}, {}",
                    entry.package_name,
                    entry.version,
                    render_distributions(entry),
                    entry.maintainer,
                    entry.date.to_rfc2822()
                );
            }
        }
    }
    Ok(())
}

fn render_distributions(entry: &ChangelogEntry) -> String {
    if entry.distributions.is_empty() {
        return "(none)".to_string();
    }
    entry
        .distributions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
