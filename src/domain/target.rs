//! Where the binary comes from and where it goes

use std::path::{Path, PathBuf};

use crate::env::Environment;

/// Name of the application being installed
pub const APP_NAME: &str = "dravi";

/// Build output location, relative to the working directory
const ARTIFACT_DIR: &str = "result/bin";

/// User-local binary directory, relative to the home directory
const BINARY_DIR: &str = ".local/bin";

/// Source and destination of one install
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTarget {
    /// Always `$HOME/.local/bin`
    pub binary_dir: PathBuf,
    pub binary_name: String,
    /// Always `./result/bin/<name>` under the working directory
    pub source_artifact: PathBuf,
}

impl InstallTarget {
    /// Resolve the fixed paths for `dravi` against an environment
    pub fn for_environment(env: &Environment) -> Self {
        Self::new(&env.home, &env.current_dir, APP_NAME)
    }

    pub fn new(home: &Path, working_dir: &Path, binary_name: &str) -> Self {
        Self {
            binary_dir: home.join(BINARY_DIR),
            binary_name: binary_name.to_string(),
            source_artifact: working_dir.join(ARTIFACT_DIR).join(binary_name),
        }
    }

    /// Full path of the installed binary
    pub fn destination(&self) -> PathBuf {
        self.binary_dir.join(&self.binary_name)
    }
}
