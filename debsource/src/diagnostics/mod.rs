//! Structured, non-fatal diagnostics.
//!
//! Parsers in this crate never raise for expected malformed input. Every
//! error, warning, and remark is an [`Annotation`] collected into an
//! [`Outcome`], and callers decide the recovery policy (skip the file, abort
//! the run, ...). Panics are reserved for programming errors.
//!
//! # Overview
//!
//! - [`Severity`] - remark / warning / error
//! - [`Annotation`] - one diagnostic: stable id, message, severity,
//!   locations, nested children, metadata
//! - [`Outcome`] - the annotations collected by an operation plus its
//!   optional value, with merge/bind combinators for chaining parse steps
//! - [`codes`] - the stable identifier strings, kept backward compatible
//!
//! Errors abort the parse unit that produced them and propagate; warnings and
//! remarks always propagate but never abort. Cancellation is reported under
//! its own code ([`codes::OPERATION_CANCELED`]) so callers can tell "user
//! aborted" from "bad data".

pub mod codes;

mod annotation;
mod outcome;
mod severity;

pub use annotation::Annotation;
pub use outcome::Outcome;
pub use severity::Severity;
