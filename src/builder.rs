//! Runs the external build
//!
//! Only the exit status is observed. The build tool streams its own logs to the
//! terminal, so stdout and stderr are inherited.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use crate::error::{InstallError, Result};
use crate::probe::BUILD_TOOL;

/// Arguments passed to the build tool
const BUILD_ARGS: [&str; 1] = ["build"];

/// Invokes `nix build` in the working directory
pub struct Builder {
    program: PathBuf,
    working_dir: PathBuf,
}

impl Builder {
    pub fn new(program: &Path, working_dir: &Path) -> Self {
        Self {
            program: program.to_path_buf(),
            working_dir: working_dir.to_path_buf(),
        }
    }

    /// The command as the user would type it
    pub fn command_line() -> String {
        format!("{BUILD_TOOL} {}", BUILD_ARGS.join(" "))
    }

    /// Run the build to completion
    ///
    /// Any non-zero exit, or failure to start the process, is a
    /// [`InstallError::BuildFailed`]. There is no retry.
    pub fn build(&self) -> Result<()> {
        log::debug!(
            "running {} {:?} in {}",
            self.program.display(),
            BUILD_ARGS,
            self.working_dir.display()
        );

        let status = Command::new(&self.program)
            .args(BUILD_ARGS)
            .current_dir(&self.working_dir)
            .status()
            .map_err(|e| InstallError::BuildFailed {
                command: Self::command_line(),
                status: format!("could not be started: {e}"),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(InstallError::BuildFailed {
                command: Self::command_line(),
                status: describe_status(status),
            })
        }
    }
}

fn describe_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exited with status {code}"),
        None => "was terminated by a signal".to_string(),
    }
}
