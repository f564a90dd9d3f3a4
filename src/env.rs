//! Process environment captured once per run
//!
//! The installer never reads `PATH`, `SHELL` or the working directory ad hoc;
//! everything flows from an [`Environment`] value so tests can inject one.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::error::{InstallError, Result};

/// Snapshot of the ambient state the installer depends on
#[derive(Debug, Clone)]
pub struct Environment {
    /// Directory the build runs in and the artifact is resolved against
    pub current_dir: PathBuf,
    /// The user's home directory
    pub home: PathBuf,
    /// Value of `PATH`, if set
    pub path: Option<OsString>,
    /// Value of `SHELL`, if set
    pub shell: Option<String>,
}

impl Environment {
    /// Capture the environment of the running process
    pub fn capture() -> Result<Self> {
        let home = dirs::home_dir().ok_or(InstallError::HomeDirectoryUnknown)?;
        let current_dir = std::env::current_dir()?;
        let env = Self {
            current_dir,
            home,
            path: std::env::var_os("PATH"),
            shell: std::env::var("SHELL").ok(),
        };
        log::debug!("captured environment: {env:?}");
        Ok(env)
    }

    /// Locate an executable on the captured `PATH`
    pub fn find_tool(&self, name: &str) -> Option<PathBuf> {
        let found = which::which_in(name, self.path.as_ref(), &self.current_dir).ok();
        log::debug!("lookup {name}: {found:?}");
        found
    }

    /// Whether `dir` is one of the segments of the captured `PATH`
    pub fn path_contains(&self, dir: &Path) -> bool {
        self.path
            .as_deref()
            .is_some_and(|value| search_path_contains(value, dir))
    }
}

/// Exact segment match of `dir` against a `:` or `;` delimited search path
///
/// `/a/bin` matches `/usr/bin:/a/bin` and `/a/bin/`, never `/a/bin2` or `/x/a/bin`.
pub fn search_path_contains(value: &OsStr, dir: &Path) -> bool {
    value
        .to_string_lossy()
        .split([':', ';'])
        .filter(|segment| !segment.is_empty())
        .any(|segment| Path::new(segment) == dir)
}
