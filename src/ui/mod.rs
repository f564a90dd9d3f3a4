//! User-facing presentation layer
//!
//! All narrative output goes through the [`Reporter`] trait, so the install
//! flow can be driven against the terminal or against an in-memory recorder.

pub mod reporter;

pub use reporter::{ConsoleReporter, Level, Reporter};

#[cfg(test)]
pub use reporter::RecordingReporter;
