//! Structured diagnostic annotations.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::location::Location;

use super::Severity;

/// A structured diagnostic: a stable identifier, display text, a severity,
/// source locations, and optionally nested child annotations and free-form
/// metadata.
///
/// Annotations replace an exception hierarchy: the condition is identified by
/// [`id`](Annotation::id) (one of the constants in [`super::codes`]) rather
/// than by a type, and everything else is data.
///
/// # Example
///
/// ```
/// use debsource::diagnostics::{codes, Annotation, Severity};
/// use debsource::location::{Location, Span};
///
/// let annotation = Annotation::error(
///     codes::VERSION_EMPTY_EPOCH,
///     "Malformed version",
///     "the epoch before ':' is empty",
/// )
/// .with_location(Location::for_span(Span::on_line(0, 0, 1)))
/// .with_metadata("input", "::1.0");
///
/// assert_eq!(annotation.severity, Severity::Error);
/// assert!(annotation.is_error());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    /// Stable identifier for the condition, from [`super::codes`].
    pub id: String,

    /// Short human-readable title.
    pub title: String,

    /// Full message describing this specific occurrence.
    pub message: String,

    /// How serious the condition is.
    pub severity: Severity,

    /// Numeric warning level; 0 for the default tier.
    pub warning_level: u32,

    /// Source locations the annotation refers to.
    pub locations: Vec<Location>,

    /// Optional link to further documentation.
    pub help_link: Option<String>,

    /// Nested child annotations.
    pub inner: Vec<Annotation>,

    /// Free-form structured metadata.
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Annotation {
    /// Create an annotation with the given severity.
    pub fn new(
        severity: Severity,
        id: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            message: message.into(),
            severity,
            warning_level: 0,
            locations: Vec::new(),
            help_link: None,
            inner: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// Create an `Error`-severity annotation.
    pub fn error(
        id: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Error, id, title, message)
    }

    /// Create a `Warning`-severity annotation.
    pub fn warning(
        id: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Warning, id, title, message)
    }

    /// Create a `Remark`-severity annotation.
    pub fn remark(
        id: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Remark, id, title, message)
    }

    /// Append a source location.
    pub fn with_location(mut self, location: Location) -> Self {
        self.locations.push(location);
        self
    }

    /// Set the help link.
    pub fn with_help_link(mut self, link: impl Into<String>) -> Self {
        self.help_link = Some(link.into());
        self
    }

    /// Set the warning level.
    pub fn with_warning_level(mut self, level: u32) -> Self {
        self.warning_level = level;
        self
    }

    /// Append a nested child annotation.
    pub fn with_inner(mut self, annotation: Annotation) -> Self {
        self.inner.push(annotation);
        self
    }

    /// Attach a metadata entry.
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Whether this is an `Error`-severity annotation.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Whether this is a `Warning`-severity annotation.
    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }

    /// Whether this is a `Remark`-severity annotation.
    pub fn is_remark(&self) -> bool {
        self.severity == Severity::Remark
    }

    /// Nested annotations with `Error` severity.
    pub fn inner_errors(&self) -> impl Iterator<Item = &Annotation> {
        self.inner.iter().filter(|a| a.is_error())
    }

    /// Nested annotations with `Warning` severity.
    pub fn inner_warnings(&self) -> impl Iterator<Item = &Annotation> {
        self.inner.iter().filter(|a| a.is_warning())
    }

    /// Nested annotations with `Remark` severity.
    pub fn inner_remarks(&self) -> impl Iterator<Item = &Annotation> {
        self.inner.iter().filter(|a| a.is_remark())
    }

    /// Re-express every location, including those of nested annotations,
    /// against an enclosing `parent` location.
    pub fn offset(mut self, parent: &Location) -> Self {
        if self.locations.is_empty() {
            // An annotation without a location still gains the parent's
            // resource context.
            self.locations.push(parent.clone());
        } else {
            for location in &mut self.locations {
                *location = location.offset(parent);
            }
        }
        self.inner = self
            .inner
            .into_iter()
            .map(|inner| inner.offset(parent))
            .collect();
        self
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} [{}]", self.severity, self.message, self.id)
    }
}
