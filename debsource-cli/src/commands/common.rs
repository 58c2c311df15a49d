//! Common types and utilities shared across CLI commands.

use clap::ValueEnum;
use console::style;

use debsource::diagnostics::{Annotation, Outcome, Severity};

use crate::error::CliError;

/// Output format selection for CLI arguments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
}

/// Print every annotation of an outcome to stderr, then unwrap its value.
///
/// Diagnostics go to stderr so JSON output on stdout stays parseable. The
/// command fails only when the outcome does: at least one `Error`-severity
/// annotation (or no value to continue with).
pub fn unpack<T>(outcome: Outcome<T>) -> Result<T, CliError> {
    for annotation in outcome.annotations() {
        print_annotation(annotation, 0);
    }
    let errors = outcome.errors().count();
    match outcome.into_value() {
        Some(value) if errors == 0 => Ok(value),
        _ => Err(CliError::Diagnostics { errors }),
    }
}

fn print_annotation(annotation: &Annotation, depth: usize) {
    let indent = "  ".repeat(depth);

    let label = match (annotation.severity, annotation.warning_level) {
        (Severity::Error, _) => style("error".to_string()).red().bold(),
        (Severity::Warning, 0) => style("warning".to_string()).yellow().bold(),
        (Severity::Warning, level) => style(format!("warning (level {level})")).yellow().bold(),
        (Severity::Remark, _) => style("remark".to_string()).blue(),
    };
    eprintln!(
        "{indent}{label}: {} [{}]",
        annotation.message,
        style(&annotation.id).dim()
    );

    for location in &annotation.locations {
        eprintln!("{indent}  --> {}", location);
    }
    if let Some(link) = &annotation.help_link {
        eprintln!("{indent}  help: {}", link);
    }
    for inner in &annotation.inner {
        print_annotation(inner, depth + 1);
    }
}
