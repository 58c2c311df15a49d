//! CLI error types.

use std::fmt;

/// Errors that can occur while running a CLI command.
#[derive(Debug)]
pub enum CliError {
    /// The engine reported error diagnostics; they have already been printed.
    Diagnostics { errors: usize },

    /// Failed to serialize output as JSON.
    Json(serde_json::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// Message to print before exiting, when the error was not already
    /// reported through the diagnostics printer.
    pub fn display_message(&self) -> Option<String> {
        match self {
            CliError::Diagnostics { .. } => None,
            CliError::Json(e) => Some(format!("Failed to serialize output: {}", e)),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Diagnostics { errors } => {
                write!(f, "operation failed with {} error(s)", errors)
            }
            CliError::Json(e) => write!(f, "failed to serialize output: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Diagnostics { .. } => None,
            CliError::Json(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_error_has_no_extra_message() {
        let error = CliError::Diagnostics { errors: 2 };
        assert!(error.display_message().is_none());
        assert!(error.to_string().contains("2 error(s)"));
    }
}
