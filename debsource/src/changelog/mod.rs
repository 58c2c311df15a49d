//! Changelog parsing.
//!
//! This module reads `deb-changelog(5)` files: one or more entries, newest
//! first, each a title line (`pkg (1.2-1) noble; urgency=medium`), an
//! indented free-text body, and a trailer line attributing and dating the
//! change. Entries are the authoritative source of a package's name, version
//! and target series, so malformed input is diagnosed precisely (with
//! locations) rather than best-effort repaired.
//!
//! The [`ChangelogReader`] is incremental and resumable: it holds its own
//! cursor, observes a cooperative cancellation token between line reads, and
//! a canceled read can simply be retried on the same reader.

mod entry;
mod grammar;
mod reader;
mod suite;

pub use entry::{ChangelogEntry, Maintainer};
pub use reader::{read_first_entry, ChangelogReader};
pub use suite::{Pocket, Suite};
