//! Diagnostic-collecting operation results.

use serde::Serialize;

use crate::location::Location;

use super::{Annotation, Severity};

/// The result of an operation that collects diagnostics instead of throwing.
///
/// An `Outcome` is an ordered sequence of [`Annotation`]s plus an optional
/// value. It is a success when it carries a value and no `Error`-severity
/// annotation; warnings and remarks never fail an outcome. Operations are
/// pure transforms: every combinator consumes the outcome and returns a new
/// one.
///
/// # Example
///
/// ```
/// use debsource::diagnostics::{Annotation, Outcome};
///
/// let outcome = Outcome::of(41)
///     .with_annotation(Annotation::remark("note", "Note", "answer off by one"))
///     .map(|n| n + 1);
///
/// assert!(outcome.is_success());
/// assert_eq!(outcome.value(), Some(&42));
/// assert_eq!(outcome.remarks().count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome<T> {
    annotations: Vec<Annotation>,
    value: Option<T>,
}

impl<T> Outcome<T> {
    /// A successful outcome carrying `value` and no annotations.
    pub fn of(value: T) -> Self {
        Self {
            annotations: Vec::new(),
            value: Some(value),
        }
    }

    /// An outcome seeded with a single annotation and no value.
    ///
    /// With an `Error`-severity annotation this is a failure; with a warning
    /// or remark it is merely a value-less collection of diagnostics,
    /// typically merged into another outcome later.
    pub fn from_annotation(annotation: Annotation) -> Self {
        Self {
            annotations: vec![annotation],
            value: None,
        }
    }

    /// Whether the outcome carries a value and no error.
    pub fn is_success(&self) -> bool {
        self.value.is_some() && self.errors().next().is_none()
    }

    /// Whether at least one `Error`-severity annotation was recorded.
    pub fn is_failure(&self) -> bool {
        self.errors().next().is_some()
    }

    /// The carried value, if any.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Consume the outcome, yielding the carried value.
    pub fn into_value(self) -> Option<T> {
        self.value
    }

    /// Consume the outcome, yielding its annotations.
    pub fn into_annotations(self) -> Vec<Annotation> {
        self.annotations
    }

    /// Consume the outcome, yielding annotations and value together.
    pub fn into_parts(self) -> (Vec<Annotation>, Option<T>) {
        (self.annotations, self.value)
    }

    /// All recorded annotations, in the order they were recorded.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// The `Error`-severity partition of the annotations.
    pub fn errors(&self) -> impl Iterator<Item = &Annotation> {
        self.by_severity(Severity::Error)
    }

    /// The `Warning`-severity partition of the annotations.
    pub fn warnings(&self) -> impl Iterator<Item = &Annotation> {
        self.by_severity(Severity::Warning)
    }

    /// The `Remark`-severity partition of the annotations.
    pub fn remarks(&self) -> impl Iterator<Item = &Annotation> {
        self.by_severity(Severity::Remark)
    }

    fn by_severity(&self, severity: Severity) -> impl Iterator<Item = &Annotation> {
        self.annotations
            .iter()
            .filter(move |a| a.severity == severity)
    }

    /// Attach a value, leaving annotations untouched.
    pub fn with_value(self, value: T) -> Self {
        Self {
            annotations: self.annotations,
            value: Some(value),
        }
    }

    /// Append one annotation.
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Append a sequence of annotations, preserving their order.
    pub fn with_annotations(mut self, annotations: impl IntoIterator<Item = Annotation>) -> Self {
        self.annotations.extend(annotations);
        self
    }

    /// Merge two outcomes: `self`'s annotations first, then `other`'s, and
    /// `other`'s value when it has one.
    ///
    /// When one side carries nothing at all the other is returned unchanged;
    /// callers must not rely on that shortcut for annotation ordering, which
    /// is always `self`'s before `other`'s.
    pub fn merge(mut self, other: Self) -> Self {
        if self.annotations.is_empty() && self.value.is_none() {
            return other;
        }
        if other.annotations.is_empty() && other.value.is_none() {
            return self;
        }
        self.annotations.extend(other.annotations);
        Self {
            annotations: self.annotations,
            value: other.value.or(self.value),
        }
    }

    /// Monadic bind: on failure (or without a value) short-circuit, carrying
    /// the accumulated diagnostics and no value; on success invoke `f` with
    /// the value and append the diagnostics it produces.
    ///
    /// Chained parse steps use this so later steps are skipped once an
    /// unrecoverable error occurs, while warnings and remarks from the steps
    /// that did run are retained.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        let failed = self.is_failure();
        let Outcome { mut annotations, value } = self;
        match value {
            Some(value) if !failed => {
                let next = f(value);
                annotations.extend(next.annotations);
                Outcome {
                    annotations,
                    value: next.value,
                }
            }
            _ => Outcome {
                annotations,
                value: None,
            },
        }
    }

    /// Transform the carried value, keeping annotations as they are.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            annotations: self.annotations,
            value: self.value.map(f),
        }
    }

    /// Propagate the accumulated diagnostics as an outcome of another value
    /// type, dropping any carried value.
    pub fn forward<U>(self) -> Outcome<U> {
        Outcome {
            annotations: self.annotations,
            value: None,
        }
    }

    /// Re-express the locations of every annotation against an enclosing
    /// `parent` location.
    pub fn offset_locations(self, parent: &Location) -> Self {
        Self {
            annotations: self
                .annotations
                .into_iter()
                .map(|a| a.offset(parent))
                .collect(),
            value: self.value,
        }
    }
}

impl Outcome<()> {
    /// An empty outcome: no annotations, unit value, success.
    pub fn empty() -> Self {
        Self::of(())
    }
}

impl<T> From<Annotation> for Outcome<T> {
    fn from(annotation: Annotation) -> Self {
        Self::from_annotation(annotation)
    }
}
