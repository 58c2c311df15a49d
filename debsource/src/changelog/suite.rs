//! Distribution suites and pockets.

use std::fmt;

use serde::Serialize;

/// A sub-channel of a distribution series.
///
/// The release pocket has no suffix, so it is represented by the absence of a
/// pocket on [`Suite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pocket {
    Proposed,
    Updates,
    Security,
    Backports,
}

impl Pocket {
    /// The suffix used after the series name, e.g. `updates` in
    /// `noble-updates`.
    pub fn as_str(self) -> &'static str {
        match self {
            Pocket::Proposed => "proposed",
            Pocket::Updates => "updates",
            Pocket::Security => "security",
            Pocket::Backports => "backports",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "proposed" => Some(Pocket::Proposed),
            "updates" => Some(Pocket::Updates),
            "security" => Some(Pocket::Security),
            "backports" => Some(Pocket::Backports),
            _ => None,
        }
    }
}

impl fmt::Display for Pocket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A distribution series plus an optional pocket, e.g. `noble` or
/// `noble-updates`.
///
/// # Example
///
/// ```
/// use debsource::changelog::{Pocket, Suite};
///
/// let suite = Suite::parse("noble-updates");
/// assert_eq!(suite.series, "noble");
/// assert_eq!(suite.pocket, Some(Pocket::Updates));
/// assert_eq!(suite.to_string(), "noble-updates");
///
/// // Unknown suffixes stay part of the series name.
/// let plain = Suite::parse("noble-custom");
/// assert_eq!(plain.series, "noble-custom");
/// assert_eq!(plain.pocket, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Suite {
    /// The series name, e.g. `noble`.
    pub series: String,

    /// The pocket, when the suite names one; `None` means the release pocket.
    pub pocket: Option<Pocket>,
}

impl Suite {
    /// Parse a suite token from a changelog title line.
    ///
    /// Splits a recognised pocket suffix off the series; any other token is
    /// taken verbatim as a series name.
    pub fn parse(token: &str) -> Self {
        if let Some((series, suffix)) = token.rsplit_once('-') {
            if !series.is_empty() {
                if let Some(pocket) = Pocket::from_suffix(suffix) {
                    return Self {
                        series: series.to_string(),
                        pocket: Some(pocket),
                    };
                }
            }
        }
        Self {
            series: token.to_string(),
            pocket: None,
        }
    }

    /// Whether the suite targets the release pocket.
    pub fn is_release(&self) -> bool {
        self.pocket.is_none()
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pocket {
            Some(pocket) => write!(f, "{}-{}", self.series, pocket),
            None => f.write_str(&self.series),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_series() {
        let suite = Suite::parse("noble");
        assert_eq!(suite.series, "noble");
        assert!(suite.is_release());
    }

    #[test]
    fn test_parse_recognised_pockets() {
        assert_eq!(Suite::parse("noble-proposed").pocket, Some(Pocket::Proposed));
        assert_eq!(Suite::parse("jammy-security").pocket, Some(Pocket::Security));
        assert_eq!(Suite::parse("focal-backports").pocket, Some(Pocket::Backports));
    }

    #[test]
    fn test_unknown_suffix_stays_in_series() {
        let suite = Suite::parse("noble-unicorn");
        assert_eq!(suite.series, "noble-unicorn");
        assert_eq!(suite.pocket, None);
    }

    #[test]
    fn test_bare_pocket_name_is_a_series() {
        // "updates" alone has no series to attach to.
        let suite = Suite::parse("updates");
        assert_eq!(suite.series, "updates");
        assert!(suite.is_release());
    }

    #[test]
    fn test_display_round_trips() {
        for token in ["noble", "noble-updates", "jammy-proposed", "weird-name"] {
            assert_eq!(Suite::parse(token).to_string(), token);
        }
    }
}
