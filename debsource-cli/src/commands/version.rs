//! Version inspection and comparison CLI commands.

use std::cmp::Ordering;

use clap::Subcommand;

use debsource::version::Version;

use crate::error::CliError;

use super::common::{unpack, OutputFormat};

/// Version action subcommands.
#[derive(Debug, Subcommand)]
pub enum VersionAction {
    /// Parse a deb-version string and print its components
    Inspect {
        /// The version string, e.g. "2:1.0~rc1-1ubuntu2"
        version: String,

        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Compare two versions with the dpkg ordering algorithm
    Compare {
        /// Left-hand version
        left: String,
        /// Right-hand version
        right: String,
    },
}

/// Run a version subcommand.
pub fn run(action: VersionAction) -> Result<(), CliError> {
    match action {
        VersionAction::Inspect { version, format } => inspect(&version, format),
        VersionAction::Compare { left, right } => compare(&left, &right),
    }
}

fn inspect(text: &str, format: OutputFormat) -> Result<(), CliError> {
    let version = unpack(Version::parse(text))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&version)?),
        OutputFormat::Text => {
            println!("Version: {}", version);
            println!("  Epoch:            {}", version.epoch_value);
            println!("  Upstream version: {}", version.upstream_version);
            if let Some(real) = &version.real_upstream_version {
                println!(
                    "  Reverted:         {} (really {})",
                    version
                        .reverted_upstream_version
                        .as_deref()
                        .unwrap_or_default(),
                    real
                );
            }
            match &version.revision {
                Some(revision) => {
                    println!("  Revision:         {}", revision);
                    if let Some(debian) = &version.debian_revision {
                        println!("  Debian revision:  {}", debian);
                    }
                    if let Some(ubuntu) = &version.ubuntu_revision {
                        println!("  Ubuntu revision:  {}", ubuntu);
                    }
                }
                None => println!("  Revision:         (native package)"),
            }
        }
    }
    Ok(())
}

fn compare(left_text: &str, right_text: &str) -> Result<(), CliError> {
    let (left, right) = unpack(
        Version::parse(left_text)
            .and_then(|left| Version::parse(right_text).map(|right| (left, right))),
    )?;

    let relation = match left.compare(&right) {
        Ordering::Less => "<<",
        Ordering::Equal => "==",
        Ordering::Greater => ">>",
    };
    println!("{} {} {}", left, relation, right);
    Ok(())
}
