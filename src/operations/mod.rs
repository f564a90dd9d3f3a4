//! Operations layer
//!
//! The install workflow and its manual fallback, independent of the CLI.

pub mod fallback;
pub mod install;

pub use install::{InstallOperation, InstallOptions, InstallOutcome};
