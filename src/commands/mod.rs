//! Command implementations for the dravi-install CLI

pub mod check;
pub mod completions;
pub mod install;
pub mod uninstall;
pub mod version;
