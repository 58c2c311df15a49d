//! Annotation severities.

use std::fmt;

use serde::Serialize;

/// How serious an [`Annotation`](super::Annotation) is.
///
/// Errors abort the parse unit that produced them; warnings and remarks are
/// informational and never abort anything. The ordering puts `Remark` lowest
/// and `Error` highest so `max` yields the most severe of two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational note.
    Remark,
    /// Non-fatal anomaly worth surfacing.
    Warning,
    /// Fatal for the current parse unit.
    Error,
}

impl Severity {
    /// Stable lowercase name, as used in rendered diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Remark => "remark",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Remark < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert_eq!(Severity::Error.max(Severity::Warning), Severity::Error);
    }

    #[test]
    fn test_severity_names() {
        assert_eq!(Severity::Remark.to_string(), "remark");
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert_eq!(Severity::Error.to_string(), "error");
    }
}
