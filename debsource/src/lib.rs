//! DebSource - Debian source package metadata engine
//!
//! This library provides the core format engine used when packaging source
//! trees into Debian-format source packages:
//!
//! - [`location`] - immutable source positions for diagnostics
//! - [`diagnostics`] - structured annotations and the [`Outcome`] aggregation
//!   model both parsers report through
//! - [`version`] - the `deb-version(7)` value type and the dpkg ordering
//!   algorithm
//! - [`changelog`] - the resumable `deb-changelog(5)` reader
//!
//! Expected failure modes (malformed input, I/O errors, cancellation) never
//! panic and never surface as bare `Err` values; they are collected as
//! [`diagnostics::Annotation`]s so callers can render every problem with its
//! stable code and source location.
//!
//! [`Outcome`]: diagnostics::Outcome

pub mod changelog;
pub mod diagnostics;
pub mod location;
pub mod version;
