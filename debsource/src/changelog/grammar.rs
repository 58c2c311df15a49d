//! Title and trailer line grammars.
//!
//! The two fixed line shapes of `deb-changelog(5)`:
//!
//! - title: `NAME (VERSION) DIST... ; KEY=VALUE[,KEY=VALUE]*`
//! - trailer: ` -- NAME <EMAIL>  DATE` (two spaces before DATE)
//!
//! Parsing here is purely lexical; the reader converts these typed errors
//! into diagnostics with locations, and hands the version text to the
//! version engine.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset};
use regex::Regex;
use thiserror::Error;

use super::{Maintainer, Suite};

/// The trailer date format: `Www, dd Mmm yyyy HH:mm:ss +hhmm`.
const DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// A parsed title line, before version-engine validation of the version text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TitleParts {
    pub name: String,
    pub version_text: String,
    /// Character column where the version text starts on the line.
    pub version_column: u32,
    pub distributions: Vec<Suite>,
    pub metadata: BTreeMap<String, String>,
}

/// A parsed trailer line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TrailerParts {
    pub maintainer: Maintainer,
    pub date: DateTime<FixedOffset>,
}

/// Why a candidate title line was rejected.
#[derive(Debug, Error)]
pub(crate) enum TitleError {
    #[error("title does not match 'name (version) distributions; key=value,...'")]
    Pattern,
    #[error("metadata item '{item}' is not a 'key=value' pair")]
    Metadata { item: String },
}

/// Why a candidate trailer line was rejected.
#[derive(Debug, Error)]
pub(crate) enum TrailerError {
    #[error("trailer does not match ' -- name <email>  date'")]
    Pattern,
    #[error("trailer date '{text}' is not in 'Www, dd Mmm yyyy HH:mm:ss +hhmm' format")]
    Date {
        text: String,
        #[source]
        source: chrono::format::ParseError,
    },
}

/// Title line pattern.
///
/// We capture:
/// - `name`: package name, `[a-z0-9][a-z0-9+.-]*`
/// - `version`: everything between the parentheses
/// - `distributions`: zero or more whitespace-separated suite tokens
/// - `metadata`: the raw text after `;`
fn title_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // Pattern breakdown:
        // (?P<name>[a-z0-9][a-z0-9+.-]*)      - package name
        // \(                                   - literal open paren
        // (?P<version>[^()]+)                  - version text
        // \)                                   - literal close paren
        // (?P<distributions>(?:\s+[^\s;]+)*)   - suite tokens
        // \s*;                                 - metadata separator
        // (?P<metadata>.*)                     - raw key=value list
        Regex::new(
            r"^(?P<name>[a-z0-9][a-z0-9+.-]*) \((?P<version>[^()]+)\)(?P<distributions>(?:\s+[^\s;]+)*)\s*;(?P<metadata>.*)$",
        )
        .unwrap()
    })
}

/// Trailer line pattern.
fn trailer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // Pattern breakdown:
        //  --                  - literal space-dash-dash marker
        // (?P<maintainer>.+?)  - maintainer display name
        // <(?P<email>[^<>]*)>  - email between angle brackets
        // two spaces           - fixed separator
        // (?P<date>.+)         - date text, validated via chrono
        Regex::new(r"^ -- (?P<maintainer>.+?) <(?P<email>[^<>]*)>  (?P<date>.+)$").unwrap()
    })
}

/// Parse a candidate title line.
pub(crate) fn parse_title(line: &str) -> Result<TitleParts, TitleError> {
    let captures = title_pattern().captures(line).ok_or(TitleError::Pattern)?;

    let version_match = captures.name("version").ok_or(TitleError::Pattern)?;
    let version_column = line[..version_match.start()].chars().count() as u32;

    let distributions = captures["distributions"]
        .split_whitespace()
        .map(Suite::parse)
        .collect();

    let mut metadata = BTreeMap::new();
    for item in captures["metadata"].split(',') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        let (key, value) = item.split_once('=').ok_or_else(|| TitleError::Metadata {
            item: item.to_string(),
        })?;
        if key.trim().is_empty() {
            return Err(TitleError::Metadata {
                item: item.to_string(),
            });
        }
        metadata.insert(key.trim().to_string(), value.trim().to_string());
    }

    Ok(TitleParts {
        name: captures["name"].to_string(),
        version_text: version_match.as_str().to_string(),
        version_column,
        distributions,
        metadata,
    })
}

/// Parse a candidate trailer line.
pub(crate) fn parse_trailer(line: &str) -> Result<TrailerParts, TrailerError> {
    let captures = trailer_pattern().captures(line).ok_or(TrailerError::Pattern)?;

    let date_text = &captures["date"];
    let date = DateTime::parse_from_str(date_text, DATE_FORMAT).map_err(|source| {
        TrailerError::Date {
            text: date_text.to_string(),
            source,
        }
    })?;

    Ok(TrailerParts {
        maintainer: Maintainer {
            name: captures["maintainer"].to_string(),
            email: captures["email"].to_string(),
        },
        date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changelog::Pocket;

    #[test]
    fn test_parse_title_basic() {
        let parts = parse_title("pkg (1.2-1) noble; urgency=medium").unwrap();
        assert_eq!(parts.name, "pkg");
        assert_eq!(parts.version_text, "1.2-1");
        assert_eq!(parts.version_column, 5);
        assert_eq!(parts.distributions, vec![Suite::parse("noble")]);
        assert_eq!(parts.metadata["urgency"], "medium");
    }

    #[test]
    fn test_parse_title_multiple_distributions_and_metadata() {
        let parts = parse_title(
            "lib-foo2 (2:1.0~rc1-1ubuntu1) noble-updates jammy; urgency=low, binary-only=yes",
        )
        .unwrap();
        assert_eq!(parts.distributions.len(), 2);
        assert_eq!(parts.distributions[0].pocket, Some(Pocket::Updates));
        assert_eq!(parts.metadata["binary-only"], "yes");
    }

    #[test]
    fn test_parse_title_tolerates_empty_distributions() {
        let parts = parse_title("pkg (1.0); urgency=medium").unwrap();
        assert!(parts.distributions.is_empty());
    }

    #[test]
    fn test_parse_title_tolerates_empty_metadata() {
        let parts = parse_title("pkg (1.0) noble;").unwrap();
        assert!(parts.metadata.is_empty());
    }

    #[test]
    fn test_parse_title_rejects_uppercase_name() {
        assert!(matches!(
            parse_title("Pkg (1.0) noble; urgency=medium"),
            Err(TitleError::Pattern)
        ));
    }

    #[test]
    fn test_parse_title_rejects_missing_semicolon() {
        assert!(matches!(
            parse_title("pkg (1.0) noble urgency=medium"),
            Err(TitleError::Pattern)
        ));
    }

    #[test]
    fn test_parse_title_rejects_bad_metadata_item() {
        assert!(matches!(
            parse_title("pkg (1.0) noble; urgency"),
            Err(TitleError::Metadata { .. })
        ));
    }

    #[test]
    fn test_parse_trailer_basic() {
        let parts = parse_trailer(" -- A B <a@b.c>  Mon, 01 Jan 2024 00:00:00 +0000").unwrap();
        assert_eq!(parts.maintainer.name, "A B");
        assert_eq!(parts.maintainer.email, "a@b.c");
        assert_eq!(parts.date.to_rfc2822(), "Mon, 1 Jan 2024 00:00:00 +0000");
    }

    #[test]
    fn test_parse_trailer_keeps_offset() {
        let parts =
            parse_trailer(" -- Jane Doe <jane@example.com>  Tue, 05 Mar 2024 17:30:12 +0530")
                .unwrap();
        assert_eq!(parts.date.offset().local_minus_utc(), 5 * 3600 + 30 * 60);
    }

    #[test]
    fn test_parse_trailer_rejects_single_space_before_date() {
        assert!(matches!(
            parse_trailer(" -- A B <a@b.c> Mon, 01 Jan 2024 00:00:00 +0000"),
            Err(TrailerError::Pattern)
        ));
    }

    #[test]
    fn test_parse_trailer_rejects_bad_date() {
        assert!(matches!(
            parse_trailer(" -- A B <a@b.c>  2024-01-01 00:00:00"),
            Err(TrailerError::Date { .. })
        ));
    }

    #[test]
    fn test_parse_trailer_rejects_inconsistent_weekday() {
        // 1 Jan 2024 was a Monday.
        assert!(matches!(
            parse_trailer(" -- A B <a@b.c>  Tue, 01 Jan 2024 00:00:00 +0000"),
            Err(TrailerError::Date { .. })
        ));
    }
}
