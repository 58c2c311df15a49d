//! Source locations for diagnostics.
//!
//! A [`Location`] pins a diagnostic to a resource (usually a file path) and an
//! optional [`Span`] within it. Locations compose: a parser that works on an
//! excerpt reports positions relative to the excerpt, and the caller uses
//! [`Location::offset`] to re-express them against the enclosing resource.
//!
//! All types here are immutable values; every operation returns a new value.

mod position;

pub use position::{Position, Span};

use std::fmt;

use serde::Serialize;

/// A resource locator plus an optional span within the resource.
///
/// # Example
///
/// ```
/// use debsource::location::{Location, Position, Span};
///
/// // A parser reported a problem at line 0, characters 4..9 of an excerpt...
/// let relative = Location::for_span(Span::on_line(0, 4, 9));
///
/// // ...and the excerpt starts at line 12, character 6 of the changelog.
/// let parent = Location::new(
///     Some("debian/changelog".into()),
///     Some(Span::at(Position::new(12, 6))),
/// );
///
/// let absolute = relative.offset(&parent);
/// assert_eq!(absolute.resource.as_deref(), Some("debian/changelog"));
/// assert_eq!(absolute.span.unwrap().start, Position::new(12, 10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Location {
    /// The resource the span refers to, usually a file path.
    pub resource: Option<String>,

    /// The span within the resource, if known.
    pub span: Option<Span>,
}

impl Location {
    /// Create a location from an optional resource and span.
    pub fn new(resource: Option<String>, span: Option<Span>) -> Self {
        Self { resource, span }
    }

    /// Create a location naming a resource without a span.
    pub fn for_resource(resource: impl Into<String>) -> Self {
        Self {
            resource: Some(resource.into()),
            span: None,
        }
    }

    /// Create a location holding only a span.
    pub fn for_span(span: Span) -> Self {
        Self {
            resource: None,
            span: Some(span),
        }
    }

    /// A location naming neither resource nor span.
    pub fn unspecified() -> Self {
        Self::default()
    }

    /// Whether this location names neither a resource nor a span.
    pub fn is_unspecified(&self) -> bool {
        self.resource.is_none() && self.span.is_none()
    }

    /// Re-express this location against an enclosing `parent` location.
    ///
    /// An unspecified parent leaves the location unchanged. Otherwise the
    /// parent's resource wins when present, and the span is translated by the
    /// parent span's start position; a location without a span inherits the
    /// parent's span wholesale.
    pub fn offset(&self, parent: &Location) -> Location {
        if parent.is_unspecified() {
            return self.clone();
        }

        let resource = parent
            .resource
            .clone()
            .or_else(|| self.resource.clone());

        let span = match (self.span, parent.span) {
            (Some(child), Some(enclosing)) => Some(child.offset_by(enclosing.start)),
            (Some(child), None) => Some(child),
            (None, enclosing) => enclosing,
        };

        Location { resource, span }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.resource, &self.span) {
            (Some(resource), Some(span)) => write!(f, "{}:{}", resource, span),
            (Some(resource), None) => write!(f, "{}", resource),
            (None, Some(span)) => write!(f, "{}", span),
            (None, None) => write!(f, "<unspecified>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_against_unspecified_parent_is_identity() {
        let location = Location::for_span(Span::on_line(3, 1, 4));
        assert_eq!(location.offset(&Location::unspecified()), location);
    }

    #[test]
    fn test_offset_takes_parent_resource() {
        let location = Location::for_resource("inner.txt");
        let parent = Location::for_resource("outer/changelog");
        assert_eq!(
            location.offset(&parent).resource.as_deref(),
            Some("outer/changelog")
        );
    }

    #[test]
    fn test_offset_keeps_own_resource_when_parent_has_none() {
        let location = Location::for_resource("inner.txt");
        let parent = Location::for_span(Span::at(Position::new(2, 0)));
        assert_eq!(location.offset(&parent).resource.as_deref(), Some("inner.txt"));
    }

    #[test]
    fn test_offset_translates_span_by_parent_start() {
        let location = Location::for_span(Span::on_line(0, 2, 5));
        let parent = Location::for_span(Span::at(Position::new(10, 3)));
        let span = location.offset(&parent).span.unwrap();
        assert_eq!(span.start, Position::new(10, 5));
        assert_eq!(span.end, Position::new(10, 8));
    }

    #[test]
    fn test_offset_inherits_parent_span_when_child_has_none() {
        let location = Location::for_resource("x");
        let parent = Location::new(None, Some(Span::on_line(4, 0, 9)));
        assert_eq!(location.offset(&parent).span, parent.span);
    }

    #[test]
    fn test_display_combines_resource_and_span() {
        let location = Location::new(
            Some("debian/changelog".into()),
            Some(Span::at(Position::new(0, 4))),
        );
        assert_eq!(location.to_string(), "debian/changelog:1:5");
    }
}
