//! Resumable, cancellable changelog reading.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::diagnostics::{codes, Annotation, Outcome};
use crate::location::{Location, Position, Span};
use crate::version::Version;

use super::entry::ChangelogEntry;
use super::grammar::{self, TitleError, TrailerError};
use super::Suite;

/// Reference documentation attached to malformed-entry diagnostics.
const HELP_LINK: &str = "https://manpages.debian.org/deb-changelog.5";

/// A title already parsed while its trailer is still being scanned for,
/// together with the diagnostics accumulated for the entry so far. Buffering
/// this in the reader state is what makes a canceled read resumable: the
/// retry picks up exactly where the scan stopped.
#[derive(Debug)]
struct PendingEntry {
    package_name: String,
    version: Version,
    distributions: Vec<Suite>,
    metadata: BTreeMap<String, String>,
    annotations: Vec<Annotation>,
    title_line: u32,
}

/// Reader cursor state.
///
/// `ScanningTitle -> ScanningTrailer -> (entry | EndOfStream)`, with `Failed`
/// terminal: a fatal error disposes the stream and rejects further calls.
#[derive(Debug)]
enum ReaderState {
    /// Looking for the next entry's title line.
    ScanningTitle,
    /// Title found and buffered; looking for the trailer line.
    ScanningTrailer(PendingEntry),
    /// The stream ended cleanly.
    EndOfStream,
    /// A fatal error occurred; the stream has been dropped.
    Failed,
}

/// Result of one attempted line read.
enum LineRead {
    Line { index: u32, text: String },
    Eof,
    Canceled(Annotation),
    Io(Annotation),
}

/// An incremental `deb-changelog(5)` reader.
///
/// Entries are read one at a time with [`read_entry`](Self::read_entry); the
/// reader keeps its own cursor, so callers can interleave reads with other
/// work, and a read canceled via the [`CancellationToken`] leaves the cursor
/// untouched and can simply be retried.
///
/// # Example
///
/// ```no_run
/// use tokio_util::sync::CancellationToken;
/// use debsource::changelog::ChangelogReader;
///
/// let cancel = CancellationToken::new();
/// let mut reader = ChangelogReader::open("debian/changelog").into_value().unwrap();
/// while let Some(entry) = reader.read_entry(&cancel).into_value().flatten() {
///     println!("{} {}", entry.package_name, entry.version);
/// }
/// ```
#[derive(Debug)]
pub struct ChangelogReader<R> {
    stream: Option<R>,
    location: Location,
    /// Zero-based index of the next line to read.
    next_line_index: u32,
    state: ReaderState,
}

impl ChangelogReader<BufReader<File>> {
    /// Open a changelog file.
    ///
    /// Failure to open is reported as an I/O error annotation carrying the
    /// platform error text, not as a panic or a bare `io::Error`.
    pub fn open(path: impl AsRef<Path>) -> Outcome<Self> {
        let path = path.as_ref();
        let location = Location::for_resource(path.display().to_string());
        match File::open(path) {
            Ok(file) => {
                debug!(path = %path.display(), "opened changelog");
                Outcome::of(Self::new(BufReader::new(file), location))
            }
            Err(error) => Outcome::from_annotation(
                Annotation::error(
                    codes::IO_OPEN_FAILED,
                    "I/O failure",
                    format!("failed to open {}: {}", path.display(), error),
                )
                .with_location(location),
            ),
        }
    }
}

impl<R: BufRead> ChangelogReader<R> {
    /// Wrap an already-open stream, reporting locations against `location`.
    pub fn new(stream: R, location: Location) -> Self {
        Self {
            stream: Some(stream),
            location,
            next_line_index: 0,
            state: ReaderState::ScanningTitle,
        }
    }

    /// The location every entry and diagnostic is expressed against.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Read the next entry.
    ///
    /// Returns a success carrying `None` once the stream is exhausted. Every
    /// line read observes `cancel` first; a canceled read reports
    /// [`codes::OPERATION_CANCELED`] without corrupting the cursor, so the
    /// same logical read can be retried on the same reader.
    pub fn read_entry(&mut self, cancel: &CancellationToken) -> Outcome<Option<ChangelogEntry>> {
        loop {
            match std::mem::replace(&mut self.state, ReaderState::ScanningTitle) {
                ReaderState::Failed => {
                    self.state = ReaderState::Failed;
                    return Outcome::from_annotation(
                        Annotation::error(
                            codes::READER_FAILED,
                            "Reader failed",
                            "an earlier error disposed this reader; open the changelog again",
                        )
                        .with_location(self.location.clone()),
                    );
                }
                ReaderState::EndOfStream => {
                    self.state = ReaderState::EndOfStream;
                    return Outcome::of(None);
                }
                ReaderState::ScanningTitle => {
                    if let Some(outcome) = self.title_step(cancel) {
                        return outcome;
                    }
                }
                ReaderState::ScanningTrailer(pending) => {
                    if let Some(outcome) = self.trailer_step(pending, cancel) {
                        return outcome;
                    }
                }
            }
        }
    }

    /// One step of the title scan. `None` means "keep looping".
    fn title_step(&mut self, cancel: &CancellationToken) -> Option<Outcome<Option<ChangelogEntry>>> {
        let (index, text) = match self.next_line(cancel) {
            LineRead::Line { index, text } => (index, text),
            LineRead::Eof => {
                self.stream = None;
                self.state = ReaderState::EndOfStream;
                return Some(Outcome::of(None));
            }
            LineRead::Canceled(annotation) => return Some(Outcome::from_annotation(annotation)),
            LineRead::Io(annotation) => return Some(self.fail(Vec::new(), annotation)),
        };

        if text.trim().is_empty() {
            return None;
        }

        // Header lines must not be indented; anything else non-blank has to
        // be a title.
        if text.starts_with(|c: char| c.is_whitespace()) {
            let annotation = Annotation::error(
                codes::CHANGELOG_INDENTED_HEADER,
                "Malformed changelog entry",
                "expected an entry title, found an indented line",
            )
            .with_location(self.line_location(index, &text))
            .with_help_link(HELP_LINK);
            return Some(self.fail(Vec::new(), annotation));
        }

        let parts = match grammar::parse_title(&text) {
            Ok(parts) => parts,
            Err(error) => {
                let id = match error {
                    TitleError::Pattern => codes::CHANGELOG_INVALID_TITLE,
                    TitleError::Metadata { .. } => codes::CHANGELOG_INVALID_METADATA,
                };
                let annotation =
                    Annotation::error(id, "Malformed changelog entry", error.to_string())
                        .with_location(self.line_location(index, &text))
                        .with_metadata("line", text.clone())
                        .with_help_link(HELP_LINK);
                return Some(self.fail(Vec::new(), annotation));
            }
        };

        // The version engine validates the version text; its diagnostics get
        // re-expressed against the position of the version on this line.
        let version_parent =
            Location::for_span(Span::at(Position::new(index, parts.version_column)))
                .offset(&self.location);
        let version_outcome =
            Version::parse(&parts.version_text).offset_locations(&version_parent);

        let version = match version_outcome.value().cloned() {
            Some(version) => version,
            None => {
                self.stream = None;
                self.state = ReaderState::Failed;
                return Some(version_outcome.forward());
            }
        };

        debug!(package = %parts.name, version = %version, "changelog title parsed");
        self.state = ReaderState::ScanningTrailer(PendingEntry {
            package_name: parts.name,
            version,
            distributions: parts.distributions,
            metadata: parts.metadata,
            annotations: version_outcome.into_annotations(),
            title_line: index,
        });
        None
    }

    /// One step of the trailer scan. `None` means "keep looping"; the caller
    /// took `pending` out of the state, so every path here must either put it
    /// back, complete it, or fail the reader.
    fn trailer_step(
        &mut self,
        pending: PendingEntry,
        cancel: &CancellationToken,
    ) -> Option<Outcome<Option<ChangelogEntry>>> {
        let (index, text) = match self.next_line(cancel) {
            LineRead::Line { index, text } => (index, text),
            LineRead::Eof => {
                let annotation = Annotation::error(
                    codes::CHANGELOG_MISSING_TRAILER,
                    "Malformed changelog entry",
                    format!(
                        "end of changelog while the entry for '{}' still expects its trailer",
                        pending.package_name
                    ),
                )
                .with_location(self.location.clone())
                .with_help_link(HELP_LINK);
                return Some(self.fail(pending.annotations, annotation));
            }
            LineRead::Canceled(annotation) => {
                self.state = ReaderState::ScanningTrailer(pending);
                return Some(Outcome::from_annotation(annotation));
            }
            LineRead::Io(annotation) => return Some(self.fail(pending.annotations, annotation)),
        };

        // Blank lines and two-space-indented change descriptions belong to
        // the entry body; the first other line must be the trailer.
        if text.trim().is_empty() || text.starts_with("  ") {
            self.state = ReaderState::ScanningTrailer(pending);
            return None;
        }

        let trailer = match grammar::parse_trailer(&text) {
            Ok(trailer) => trailer,
            Err(error) => {
                let id = match error {
                    TrailerError::Pattern => codes::CHANGELOG_INVALID_TRAILER,
                    TrailerError::Date { .. } => codes::CHANGELOG_INVALID_DATE,
                };
                let annotation =
                    Annotation::error(id, "Malformed changelog entry", error.to_string())
                        .with_location(self.line_location(index, &text))
                        .with_metadata("line", text.clone())
                        .with_help_link(HELP_LINK);
                return Some(self.fail(pending.annotations, annotation));
            }
        };

        let span = Span::new(
            Position::new(pending.title_line, 0),
            Position::new(index, text.chars().count() as u32),
        );
        let entry = ChangelogEntry {
            package_name: pending.package_name,
            version: pending.version,
            distributions: pending.distributions,
            metadata: pending.metadata,
            maintainer: trailer.maintainer,
            date: trailer.date,
            location: Location::for_span(span).offset(&self.location),
        };

        debug!(package = %entry.package_name, version = %entry.version, "changelog entry read");
        Some(
            Outcome::empty()
                .with_annotations(pending.annotations)
                .map(|_| Some(entry)),
        )
    }

    /// Read one line, observing the cancellation token first so a canceled
    /// call consumes nothing.
    fn next_line(&mut self, cancel: &CancellationToken) -> LineRead {
        if cancel.is_cancelled() {
            return LineRead::Canceled(
                Annotation::error(
                    codes::OPERATION_CANCELED,
                    "Operation canceled",
                    "the read was canceled before completing; retry to resume",
                )
                .with_location(self.location.clone()),
            );
        }

        let Some(stream) = self.stream.as_mut() else {
            return LineRead::Eof;
        };

        let mut text = String::new();
        match stream.read_line(&mut text) {
            Ok(0) => LineRead::Eof,
            Ok(_) => {
                let index = self.next_line_index;
                self.next_line_index += 1;
                while text.ends_with('\n') || text.ends_with('\r') {
                    text.pop();
                }
                LineRead::Line { index, text }
            }
            Err(error) => LineRead::Io(
                Annotation::error(
                    codes::IO_READ_FAILED,
                    "I/O failure",
                    format!("failed to read line {}: {}", self.next_line_index + 1, error),
                )
                .with_location(self.location.clone()),
            ),
        }
    }

    /// Transition to the terminal failed state, disposing the stream, and
    /// produce the failure outcome: diagnostics accumulated for the aborted
    /// entry first, then the fatal annotation.
    fn fail(
        &mut self,
        earlier: Vec<Annotation>,
        annotation: Annotation,
    ) -> Outcome<Option<ChangelogEntry>> {
        debug!(code = %annotation.id, "changelog reader entering failed state");
        self.stream = None;
        self.state = ReaderState::Failed;
        Outcome::empty()
            .with_annotations(earlier)
            .with_annotation(annotation)
            .forward()
    }

    fn line_location(&self, index: u32, text: &str) -> Location {
        Location::for_span(Span::on_line(index, 0, text.chars().count() as u32))
            .offset(&self.location)
    }
}

/// Open `path` and read its first entry; a changelog without any entry is an
/// error ([`codes::CHANGELOG_EMPTY`]), since an empty changelog defines no
/// package at all.
pub fn read_first_entry(
    path: impl AsRef<Path>,
    cancel: &CancellationToken,
) -> Outcome<ChangelogEntry> {
    ChangelogReader::open(path.as_ref()).and_then(|mut reader| {
        let location = reader.location().clone();
        reader.read_entry(cancel).and_then(|entry| match entry {
            Some(entry) => Outcome::of(entry),
            None => Outcome::from_annotation(
                Annotation::error(
                    codes::CHANGELOG_EMPTY,
                    "Empty changelog",
                    "a changelog must define at least one entry",
                )
                .with_location(location)
                .with_help_link(HELP_LINK),
            ),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SIMPLE: &str = "\
pkg (1.2-1) noble; urgency=medium

  * change

 -- A B <a@b.c>  Mon, 01 Jan 2024 00:00:00 +0000
";

    fn reader(text: &str) -> ChangelogReader<Cursor<&str>> {
        ChangelogReader::new(Cursor::new(text), Location::for_resource("debian/changelog"))
    }

    #[test]
    fn test_read_single_entry() {
        let cancel = CancellationToken::new();
        let outcome = reader(SIMPLE).read_entry(&cancel);
        assert!(outcome.is_success());

        let entry = outcome.into_value().unwrap().unwrap();
        assert_eq!(entry.package_name, "pkg");
        assert_eq!(entry.version.to_string(), "1.2-1");
        assert_eq!(entry.distributions, vec![Suite::parse("noble")]);
        assert_eq!(entry.maintainer.name, "A B");
        assert_eq!(entry.maintainer.email, "a@b.c");
        assert_eq!(entry.urgency(), Some("medium"));
    }

    #[test]
    fn test_entry_location_spans_title_to_trailer() {
        let cancel = CancellationToken::new();
        let entry = reader(SIMPLE)
            .read_entry(&cancel)
            .into_value()
            .unwrap()
            .unwrap();
        let span = entry.location.span.unwrap();
        assert_eq!(span.start, Position::new(0, 0));
        assert_eq!(span.end.line, 4);
        assert_eq!(
            entry.location.resource.as_deref(),
            Some("debian/changelog")
        );
    }

    #[test]
    fn test_end_of_stream_returns_none() {
        let cancel = CancellationToken::new();
        let mut reader = reader(SIMPLE);
        assert!(reader.read_entry(&cancel).into_value().unwrap().is_some());
        assert!(reader.read_entry(&cancel).into_value().unwrap().is_none());
        // Terminal state is stable.
        assert!(reader.read_entry(&cancel).into_value().unwrap().is_none());
    }

    #[test]
    fn test_empty_stream_is_clean_none() {
        let cancel = CancellationToken::new();
        let outcome = reader("").read_entry(&cancel);
        assert!(outcome.is_success());
        assert!(outcome.into_value().unwrap().is_none());
    }

    #[test]
    fn test_indented_line_before_title_fails() {
        let cancel = CancellationToken::new();
        let mut reader = reader("  * stray body line\n");
        let outcome = reader.read_entry(&cancel);
        assert!(outcome.is_failure());
        assert_eq!(
            outcome.errors().next().unwrap().id,
            codes::CHANGELOG_INDENTED_HEADER
        );

        // Further reads are rejected.
        let again = reader.read_entry(&cancel);
        assert_eq!(again.errors().next().unwrap().id, codes::READER_FAILED);
    }

    #[test]
    fn test_missing_trailer_at_eof_fails() {
        let cancel = CancellationToken::new();
        let outcome = reader("pkg (1.0) noble; urgency=low\n\n  * change\n").read_entry(&cancel);
        assert!(outcome.is_failure());
        assert_eq!(
            outcome.errors().next().unwrap().id,
            codes::CHANGELOG_MISSING_TRAILER
        );
    }

    #[test]
    fn test_bad_version_in_title_fails_with_offset_location() {
        let cancel = CancellationToken::new();
        let outcome = reader("pkg (1.0_3) noble; urgency=low\n").read_entry(&cancel);
        assert!(outcome.is_failure());
        let error = outcome.errors().next().unwrap();
        assert_eq!(error.id, crate::diagnostics::codes::VERSION_INVALID_CHARACTER);
        let span = error.locations[0].span.unwrap();
        // '_' sits at character 3 of the version, which starts at column 5.
        assert_eq!(span.start, Position::new(0, 8));
        assert_eq!(
            error.locations[0].resource.as_deref(),
            Some("debian/changelog")
        );
    }

    #[test]
    fn test_non_trailer_line_after_title_fails() {
        let cancel = CancellationToken::new();
        let outcome =
            reader("pkg (1.0) noble; urgency=low\nnext (2.0) noble; urgency=low\n").read_entry(&cancel);
        assert!(outcome.is_failure());
        assert_eq!(
            outcome.errors().next().unwrap().id,
            codes::CHANGELOG_INVALID_TRAILER
        );
    }

    #[test]
    fn test_cancel_before_read_preserves_cursor() {
        let cancel = CancellationToken::new();
        let mut reader = reader(SIMPLE);
        cancel.cancel();

        let canceled = reader.read_entry(&cancel);
        assert!(canceled.is_failure());
        assert_eq!(
            canceled.errors().next().unwrap().id,
            codes::OPERATION_CANCELED
        );

        // Retrying with a fresh token yields the entry as if never canceled.
        let fresh = CancellationToken::new();
        let entry = reader.read_entry(&fresh).into_value().unwrap().unwrap();
        assert_eq!(entry.package_name, "pkg");
    }

    #[test]
    fn test_version_warnings_surface_on_the_entry_outcome() {
        let cancel = CancellationToken::new();
        let text = "\
pkg (1.0-1ubuntu1ubuntu2) noble; urgency=low

 -- A B <a@b.c>  Mon, 01 Jan 2024 00:00:00 +0000
";
        let outcome = reader(text).read_entry(&cancel);
        assert!(outcome.is_success());
        assert_eq!(
            outcome.warnings().next().unwrap().id,
            crate::diagnostics::codes::VERSION_DUPLICATE_UBUNTU_DELIMITER
        );
    }
}
