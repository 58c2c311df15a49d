//! Debian version values and ordering.
//!
//! A [`Version`] is the parsed form of a `deb-version(7)` string,
//! `[EPOCH:]UPSTREAM[-REVISION]`, plus the Ubuntu-specific sub-fields the
//! build pipeline cares about: the `ubuntu` suffix within the revision and
//! the `+really` reversion marker within the upstream version.
//!
//! Ordering follows the reference dpkg algorithm exactly - it decides which
//! package wins during distribution, so there is no room for "close enough".
//! Parsing reports malformed input through [`Outcome`] annotations rather
//! than panicking or returning a bare error.

mod ordering;

pub use ordering::compare_version_part;

use std::cmp::Ordering as CmpOrdering;
use std::fmt;

use serde::Serialize;

use crate::diagnostics::{codes, Annotation, Outcome};
use crate::location::{Location, Span};

/// Delimiter splitting a revision into Debian and Ubuntu parts.
const UBUNTU_DELIMITER: &str = "ubuntu";

/// Delimiter marking a reverted upstream version (`2+really1`).
const REALLY_DELIMITER: &str = "+really";

/// Reference documentation attached to malformed-version diagnostics.
const HELP_LINK: &str = "https://manpages.debian.org/deb-version.7";

/// A parsed Debian package version.
///
/// Create one with [`Version::parse`]; values are immutable afterwards.
/// Equality and ordering use the dpkg comparison algorithm, so versions that
/// differ only in digit-run leading zeros compare equal:
///
/// ```
/// let a = debsource::version::Version::parse("1.00").into_value().unwrap();
/// let b = debsource::version::Version::parse("1.0").into_value().unwrap();
/// assert_eq!(a, b);
/// assert_ne!(a.to_string(), b.to_string());
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Version {
    /// Raw epoch text, when the version carries one.
    pub epoch: Option<String>,

    /// Numeric value of the epoch; 0 when absent.
    pub epoch_value: u64,

    /// The upstream version component, as written.
    pub upstream_version: String,

    /// Text before the first `+really`, when present.
    pub reverted_upstream_version: Option<String>,

    /// Text after the first `+really`, when present.
    pub real_upstream_version: Option<String>,

    /// The full revision component, when the package is not native.
    pub revision: Option<String>,

    /// Revision text before the first `ubuntu` delimiter (the whole revision
    /// when the delimiter is absent). Only present when `revision` is.
    pub debian_revision: Option<String>,

    /// Revision text after the first `ubuntu` delimiter. Only present when
    /// the delimiter occurs in `revision`.
    pub ubuntu_revision: Option<String>,
}

impl Version {
    /// Parse a `deb-version(7)` string.
    ///
    /// Malformed input produces a failure [`Outcome`] whose error annotation
    /// names the offending character and its position; duplicate `ubuntu` or
    /// `+really` delimiters produce warnings on an otherwise successful
    /// outcome (only the first occurrence is authoritative).
    ///
    /// # Example
    ///
    /// ```
    /// use debsource::version::Version;
    ///
    /// let outcome = Version::parse("1:2.4~rc1-1ubuntu2");
    /// let version = outcome.value().unwrap();
    ///
    /// assert_eq!(version.epoch_value, 1);
    /// assert_eq!(version.upstream_version, "2.4~rc1");
    /// assert_eq!(version.debian_revision.as_deref(), Some("1"));
    /// assert_eq!(version.ubuntu_revision.as_deref(), Some("2"));
    /// ```
    pub fn parse(text: &str) -> Outcome<Version> {
        if text.is_empty() {
            return malformed(
                codes::VERSION_EMPTY,
                "version string is empty".to_string(),
                Span::on_line(0, 0, 0),
            )
            .into();
        }

        let mut warnings: Vec<Annotation> = Vec::new();

        // Epoch: everything before the first ':', digits only.
        let (epoch, upstream_start) = match text.find(':') {
            Some(colon) => {
                let epoch_text = &text[..colon];
                if epoch_text.is_empty() {
                    return malformed(
                        codes::VERSION_EMPTY_EPOCH,
                        format!("'{text}' has an empty epoch before ':'"),
                        Span::on_line(0, 0, 1),
                    )
                    .into();
                }
                if let Some((pos, ch)) =
                    epoch_text.chars().enumerate().find(|(_, c)| !c.is_ascii_digit())
                {
                    let pos = pos as u32;
                    return malformed(
                        codes::VERSION_EPOCH_NOT_A_NUMBER,
                        format!("epoch of '{text}' contains non-digit character '{ch}'"),
                        Span::on_line(0, pos, pos + 1),
                    )
                    .with_metadata("character", ch.to_string())
                    .into();
                }
                if colon + 1 == text.len() {
                    let end = text.chars().count() as u32;
                    return malformed(
                        codes::VERSION_MISSING_UPSTREAM,
                        format!("'{text}' has no upstream version after the epoch colon"),
                        Span::on_line(0, end, end),
                    )
                    .into();
                }
                (Some(epoch_text.to_string()), colon + 1)
            }
            None => (None, 0),
        };

        let epoch_value = epoch.as_deref().map(epoch_numeric_value).unwrap_or(0);
        let rest = &text[upstream_start..];

        // Revision: everything after the last '-'.
        let (upstream_text, revision) = match rest.rfind('-') {
            Some(dash) => {
                let revision = &rest[dash + 1..];
                if revision.is_empty() {
                    let end = text.chars().count() as u32;
                    return malformed(
                        codes::VERSION_EMPTY_REVISION,
                        format!("'{text}' has an empty revision after the final '-'"),
                        Span::on_line(0, end.saturating_sub(1), end),
                    )
                    .into();
                }
                (&rest[..dash], Some(revision))
            }
            None => (rest, None),
        };

        if upstream_text.is_empty() {
            let column = upstream_start as u32;
            return malformed(
                codes::VERSION_EMPTY_UPSTREAM,
                format!("'{text}' has an empty upstream version"),
                Span::on_line(0, column, column),
            )
            .into();
        }

        // The epoch is all-ASCII digits, so the byte offset of the upstream
        // component equals its character offset.
        let upstream_column = upstream_start as u32;
        for (pos, ch) in upstream_text.chars().enumerate() {
            let valid = ch.is_ascii_alphanumeric() || matches!(ch, '.' | '+' | '-' | ':' | '~');
            if !valid {
                let column = upstream_column + pos as u32;
                return malformed(
                    codes::VERSION_INVALID_CHARACTER,
                    format!(
                        "invalid character '{ch}' at position {column} of '{text}'; \
                         upstream versions may only contain alphanumerics and '.+-:~'"
                    ),
                    Span::on_line(0, column, column + 1),
                )
                .with_metadata("character", ch.to_string())
                .with_metadata("position", column)
                .into();
            }
        }

        // Reverted/real upstream split on the first '+really'.
        let (reverted, real) = match upstream_text.find(REALLY_DELIMITER) {
            Some(idx) => {
                let after = idx + REALLY_DELIMITER.len();
                if let Some(second) = upstream_text[after..].find(REALLY_DELIMITER) {
                    let column = upstream_column + (after + second) as u32;
                    warnings.push(duplicate_delimiter(
                        codes::VERSION_DUPLICATE_REALLY_DELIMITER,
                        REALLY_DELIMITER,
                        text,
                        Span::on_line(0, column, column + REALLY_DELIMITER.len() as u32),
                    ));
                }
                (
                    Some(upstream_text[..idx].to_string()),
                    Some(upstream_text[after..].to_string()),
                )
            }
            None => (None, None),
        };

        // Debian/Ubuntu revision split on the first 'ubuntu'.
        let (debian_revision, ubuntu_revision) = match revision {
            Some(rev) => match rev.find(UBUNTU_DELIMITER) {
                Some(idx) => {
                    let after = idx + UBUNTU_DELIMITER.len();
                    if let Some(second) = rev[after..].find(UBUNTU_DELIMITER) {
                        // The revision is not charset-validated, so count
                        // characters rather than reusing byte offsets.
                        let revision_column =
                            text.chars().count() as u32 - rev.chars().count() as u32;
                        let column = revision_column + rev[..after + second].chars().count() as u32;
                        warnings.push(duplicate_delimiter(
                            codes::VERSION_DUPLICATE_UBUNTU_DELIMITER,
                            UBUNTU_DELIMITER,
                            text,
                            Span::on_line(0, column, column + UBUNTU_DELIMITER.len() as u32),
                        ));
                    }
                    (Some(rev[..idx].to_string()), Some(rev[after..].to_string()))
                }
                None => (Some(rev.to_string()), None),
            },
            None => (None, None),
        };

        let version = Version {
            epoch,
            epoch_value,
            upstream_version: upstream_text.to_string(),
            reverted_upstream_version: reverted,
            real_upstream_version: real,
            revision: revision.map(str::to_string),
            debian_revision,
            ubuntu_revision,
        };

        Outcome::of(version).with_annotations(warnings)
    }

    /// Whether the version carries an explicit epoch.
    pub fn has_epoch(&self) -> bool {
        self.epoch.is_some()
    }

    /// Whether the package is native, i.e. has no revision.
    pub fn is_native(&self) -> bool {
        self.revision.is_none()
    }

    /// Compare two versions with the dpkg algorithm: epoch value first, then
    /// upstream version, then revision (an absent revision compares as the
    /// empty string).
    pub fn compare(&self, other: &Version) -> CmpOrdering {
        self.epoch_value
            .cmp(&other.epoch_value)
            .then_with(|| compare_version_part(&self.upstream_version, &other.upstream_version))
            .then_with(|| {
                compare_version_part(
                    self.revision.as_deref().unwrap_or(""),
                    other.revision.as_deref().unwrap_or(""),
                )
            })
    }
}

impl fmt::Display for Version {
    /// Reconstructs `[EPOCH:]UPSTREAM[-REVISION]`; round-trips exactly for
    /// every string [`Version::parse`] accepts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(epoch) = &self.epoch {
            write!(f, "{}:", epoch)?;
        }
        f.write_str(&self.upstream_version)?;
        if let Some(revision) = &self.revision {
            write!(f, "-{}", revision)?;
        }
        Ok(())
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == CmpOrdering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.compare(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        self.compare(other)
    }
}

/// Accumulate the numeric epoch value, saturating instead of overflowing -
/// epoch magnitude is effectively unbounded in the wild, digits-only is the
/// real validation.
fn epoch_numeric_value(epoch: &str) -> u64 {
    epoch
        .bytes()
        .fold(0u64, |acc, b| acc.saturating_mul(10).saturating_add(u64::from(b - b'0')))
}

fn malformed(id: &str, message: String, span: Span) -> Annotation {
    Annotation::error(id, "Malformed version", message)
        .with_location(Location::for_span(span))
        .with_help_link(HELP_LINK)
}

fn duplicate_delimiter(id: &str, delimiter: &str, text: &str, span: Span) -> Annotation {
    Annotation::warning(
        id,
        "Duplicate delimiter",
        format!("'{text}' contains '{delimiter}' more than once; only the first is used"),
    )
    .with_location(Location::for_span(span))
    .with_warning_level(1)
    .with_help_link(HELP_LINK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;

    fn parse_ok(text: &str) -> Version {
        let outcome = Version::parse(text);
        assert!(outcome.is_success(), "expected '{text}' to parse: {:?}", outcome.annotations());
        outcome.into_value().unwrap()
    }

    #[test]
    fn test_parse_plain_version() {
        let version = parse_ok("1.2.3");
        assert_eq!(version.epoch, None);
        assert_eq!(version.epoch_value, 0);
        assert_eq!(version.upstream_version, "1.2.3");
        assert!(version.is_native());
        assert_eq!(version.debian_revision, None);
    }

    #[test]
    fn test_parse_full_version() {
        let version = parse_ok("3:2.4-1ubuntu2");
        assert_eq!(version.epoch.as_deref(), Some("3"));
        assert_eq!(version.epoch_value, 3);
        assert_eq!(version.upstream_version, "2.4");
        assert_eq!(version.revision.as_deref(), Some("1ubuntu2"));
        assert_eq!(version.debian_revision.as_deref(), Some("1"));
        assert_eq!(version.ubuntu_revision.as_deref(), Some("2"));
    }

    #[test]
    fn test_parse_ubuntu_revision_split() {
        let version = parse_ok("1-1ubuntu1");
        assert_eq!(version.debian_revision.as_deref(), Some("1"));
        assert_eq!(version.ubuntu_revision.as_deref(), Some("1"));
    }

    #[test]
    fn test_revision_without_ubuntu_delimiter() {
        let version = parse_ok("1.0-4");
        assert_eq!(version.debian_revision.as_deref(), Some("4"));
        assert_eq!(version.ubuntu_revision, None);
    }

    #[test]
    fn test_parse_really_split() {
        let version = parse_ok("2+really1-1");
        assert_eq!(version.reverted_upstream_version.as_deref(), Some("2"));
        assert_eq!(version.real_upstream_version.as_deref(), Some("1"));
        assert_eq!(version.upstream_version, "2+really1");
    }

    #[test]
    fn test_inner_hyphens_stay_in_upstream() {
        let version = parse_ok("1.0-rc1-2");
        assert_eq!(version.upstream_version, "1.0-rc1");
        assert_eq!(version.revision.as_deref(), Some("2"));
    }

    #[test]
    fn test_duplicate_ubuntu_delimiter_warns() {
        let outcome = Version::parse("1-1ubuntu2ubuntu3");
        assert!(outcome.is_success());
        let warning = outcome.warnings().next().expect("expected a warning");
        assert_eq!(warning.id, codes::VERSION_DUPLICATE_UBUNTU_DELIMITER);
        assert_eq!(warning.warning_level, 1);
        // Only the first delimiter is authoritative.
        let version = outcome.value().unwrap();
        assert_eq!(version.debian_revision.as_deref(), Some("1"));
        assert_eq!(version.ubuntu_revision.as_deref(), Some("2ubuntu3"));
    }

    #[test]
    fn test_duplicate_really_delimiter_warns() {
        let outcome = Version::parse("1+really2+really3");
        assert!(outcome.is_success());
        let warning = outcome.warnings().next().expect("expected a warning");
        assert_eq!(warning.id, codes::VERSION_DUPLICATE_REALLY_DELIMITER);
        let version = outcome.value().unwrap();
        assert_eq!(version.reverted_upstream_version.as_deref(), Some("1"));
        assert_eq!(version.real_upstream_version.as_deref(), Some("2+really3"));
    }

    #[test]
    fn test_empty_version_is_rejected() {
        let outcome = Version::parse("");
        assert!(outcome.is_failure());
        assert_eq!(outcome.errors().next().unwrap().id, codes::VERSION_EMPTY);
    }

    #[test]
    fn test_non_numeric_epoch_is_rejected() {
        let outcome = Version::parse("a:1");
        assert!(outcome.is_failure());
        let error = outcome.errors().next().unwrap();
        assert_eq!(error.id, codes::VERSION_EPOCH_NOT_A_NUMBER);
        assert_eq!(error.severity, Severity::Error);
        assert!(!error.locations.is_empty());
    }

    #[test]
    fn test_empty_epoch_is_rejected() {
        let outcome = Version::parse(":1.0");
        assert!(outcome.is_failure());
        assert_eq!(outcome.errors().next().unwrap().id, codes::VERSION_EMPTY_EPOCH);
    }

    #[test]
    fn test_missing_upstream_after_colon_is_rejected() {
        let outcome = Version::parse("1:");
        assert!(outcome.is_failure());
        assert_eq!(
            outcome.errors().next().unwrap().id,
            codes::VERSION_MISSING_UPSTREAM
        );
    }

    #[test]
    fn test_trailing_hyphen_is_rejected() {
        let outcome = Version::parse("1.0-");
        assert!(outcome.is_failure());
        assert_eq!(
            outcome.errors().next().unwrap().id,
            codes::VERSION_EMPTY_REVISION
        );
    }

    #[test]
    fn test_invalid_upstream_character_is_rejected() {
        let outcome = Version::parse("1:1_0-1");
        assert!(outcome.is_failure());
        let error = outcome.errors().next().unwrap();
        assert_eq!(error.id, codes::VERSION_INVALID_CHARACTER);
        assert_eq!(error.metadata["character"], serde_json::json!("_"));
        // '_' sits at character 3 of "1:1_0-1".
        let span = error.locations[0].span.unwrap();
        assert_eq!(span.start.character, 3);
    }

    #[test]
    fn test_epoch_value_saturates_instead_of_overflowing() {
        let version = parse_ok("99999999999999999999999999:1");
        assert_eq!(version.epoch_value, u64::MAX);
        assert_eq!(version.epoch.as_deref(), Some("99999999999999999999999999"));
    }

    #[test]
    fn test_display_round_trips() {
        for text in [
            "1.0",
            "1.0-1",
            "2:1.0~rc1-1ubuntu3",
            "1:2+really2.35-5",
            "0.5-1-1",
            "01:1.0-01",
        ] {
            assert_eq!(parse_ok(text).to_string(), text);
        }
    }

    #[test]
    fn test_epoch_dominates_ordering() {
        assert!(parse_ok("1:0") > parse_ok("999999"));
    }

    #[test]
    fn test_tilde_orders_before_release() {
        assert!(parse_ok("1.0~rc1") < parse_ok("1.0"));
        assert!(parse_ok("1.0~~") < parse_ok("1.0~"));
    }

    #[test]
    fn test_leading_zero_digit_runs_compare_equal() {
        assert_eq!(parse_ok("1.00"), parse_ok("1.0"));
        assert_eq!(parse_ok("1.0009"), parse_ok("1.9"));
    }

    #[test]
    fn test_missing_revision_orders_before_any_revision() {
        assert!(parse_ok("1.0") < parse_ok("1.0-1"));
        assert!(parse_ok("1.0-1") < parse_ok("1.0-1ubuntu1"));
    }

    #[test]
    fn test_revision_breaks_upstream_ties() {
        assert!(parse_ok("1.0-1") < parse_ok("1.0-2"));
        assert_eq!(parse_ok("1.0-1"), parse_ok("1.0-1"));
    }
}
