//! Domain models for dravi-install
//!
//! Transient facts resolved once per run from the [`Environment`](crate::env::Environment).
//! Nothing here touches the filesystem.

pub mod shell;
pub mod target;

pub use shell::ShellContext;
pub use target::{APP_NAME, InstallTarget};
