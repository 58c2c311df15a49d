//! Parsed changelog entries.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::location::Location;
use crate::version::Version;

use super::Suite;

/// The maintainer attribution from an entry trailer line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Maintainer {
    pub name: String,
    pub email: String,
}

impl fmt::Display for Maintainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// One versioned, dated, attributed record from a changelog file.
///
/// Entries are produced one at a time by the
/// [`ChangelogReader`](super::ChangelogReader) and are immutable afterwards.
/// `distributions` is empty only for anomalous entries; the reader tolerates
/// that and leaves reporting to the consumer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangelogEntry {
    /// The source package name from the title line.
    pub package_name: String,

    /// The version between parentheses on the title line.
    pub version: Version,

    /// The target suites listed on the title line, in order.
    pub distributions: Vec<Suite>,

    /// The `key=value` metadata after `;` on the title line.
    pub metadata: BTreeMap<String, String>,

    /// Who signed the entry off.
    pub maintainer: Maintainer,

    /// The trailer timestamp, with its original UTC offset.
    pub date: DateTime<FixedOffset>,

    /// Where the entry sits: title line through trailer line, expressed
    /// against the reader's resource.
    pub location: Location,
}

impl ChangelogEntry {
    /// The conventional `urgency` metadata value, when present.
    pub fn urgency(&self) -> Option<&str> {
        self.metadata.get("urgency").map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maintainer_display() {
        let maintainer = Maintainer {
            name: "A B".into(),
            email: "a@b.c".into(),
        };
        assert_eq!(maintainer.to_string(), "A B <a@b.c>");
    }
}
