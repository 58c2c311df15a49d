//! Stable diagnostic identifiers.
//!
//! Each distinct error/warning condition carries one of these codes as its
//! [`Annotation`](super::Annotation) id. The CLI prints them and machine
//! consumers match on them, so the strings must never change across releases.

/// Version string is empty.
pub const VERSION_EMPTY: &str = "malformed version: empty version";

/// A `:` is present but no epoch text precedes it.
pub const VERSION_EMPTY_EPOCH: &str = "malformed version: empty epoch";

/// The epoch contains a non-digit character.
pub const VERSION_EPOCH_NOT_A_NUMBER: &str = "malformed version: epoch is not a number";

/// A `:` is present but no upstream version follows it.
pub const VERSION_MISSING_UPSTREAM: &str = "malformed version: nothing after epoch colon";

/// The upstream version component is empty.
pub const VERSION_EMPTY_UPSTREAM: &str = "malformed version: empty upstream version";

/// A `-` is present but no revision follows it.
pub const VERSION_EMPTY_REVISION: &str = "malformed version: empty revision";

/// The upstream version contains a character outside `[A-Za-z0-9.+-:~]`.
pub const VERSION_INVALID_CHARACTER: &str = "malformed version: invalid character in upstream version";

/// The revision contains `ubuntu` more than once; only the first is split on.
pub const VERSION_DUPLICATE_UBUNTU_DELIMITER: &str = "version: duplicate ubuntu delimiter";

/// The upstream version contains `+really` more than once; only the first is
/// split on.
pub const VERSION_DUPLICATE_REALLY_DELIMITER: &str = "version: duplicate really delimiter";

/// A whitespace-indented line appeared before any entry title.
pub const CHANGELOG_INDENTED_HEADER: &str = "malformed changelog entry: indented header line";

/// A candidate title line does not match the title grammar.
pub const CHANGELOG_INVALID_TITLE: &str = "malformed changelog entry: invalid title line";

/// A metadata item in the title is not a `key=value` pair.
pub const CHANGELOG_INVALID_METADATA: &str = "malformed changelog entry: invalid metadata item";

/// A candidate trailer line does not match the trailer grammar.
pub const CHANGELOG_INVALID_TRAILER: &str = "malformed changelog entry: invalid trailer line";

/// The trailer date is not `Www, dd Mmm yyyy HH:mm:ss +hhmm`.
pub const CHANGELOG_INVALID_DATE: &str = "malformed changelog entry: invalid trailer date";

/// End of stream while an entry still expects its trailer.
pub const CHANGELOG_MISSING_TRAILER: &str = "malformed changelog entry: missing trailer";

/// The changelog defines no entries at all.
pub const CHANGELOG_EMPTY: &str = "empty changelog";

/// The reader hit a fatal error earlier and rejects further reads.
pub const READER_FAILED: &str = "changelog reader in failed state";

/// Opening the underlying file failed.
pub const IO_OPEN_FAILED: &str = "io: open failed";

/// Reading from the underlying stream failed.
pub const IO_READ_FAILED: &str = "io: read failed";

/// The operation was canceled via the cooperative cancellation signal.
pub const OPERATION_CANCELED: &str = "operation canceled";
