//! Literal shell commands for deploy steps
//!
//! The same values are executed under elevation and printed as manual
//! instructions, so what the user is told to run is what the installer ran.

use std::fmt;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

/// Program used to re-run a command with superuser privileges
pub const ELEVATION_PROGRAM: &str = "sudo";

/// A program with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    program: String,
    args: Vec<String>,
}

impl ShellCommand {
    fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(ToString::to_string).collect(),
        }
    }

    /// `mkdir -p <dir>`
    pub fn make_dir(dir: &Path) -> Self {
        Self::new("mkdir", &["-p", &dir.display().to_string()])
    }

    /// `rm -f <path>`
    pub fn remove(path: &Path) -> Self {
        Self::new("rm", &["-f", &path.display().to_string()])
    }

    /// `cp <from> <to>`
    pub fn copy(from: &Path, to: &Path) -> Self {
        Self::new(
            "cp",
            &[&from.display().to_string(), &to.display().to_string()],
        )
    }

    /// `chmod +x <path>`
    pub fn make_executable(path: &Path) -> Self {
        Self::new("chmod", &["+x", &path.display().to_string()])
    }

    /// The same command prefixed with the elevation program
    pub fn elevated(&self) -> Self {
        let mut args = Vec::with_capacity(self.args.len() + 1);
        args.push(self.program.clone());
        args.extend(self.args.iter().cloned());
        Self {
            program: ELEVATION_PROGRAM.to_string(),
            args,
        }
    }

    /// Run to completion, treating a non-zero exit as an error
    ///
    /// stdin stays attached so an elevation prompt can ask for a password.
    pub fn run(&self) -> io::Result<()> {
        log::debug!("running `{self}`");
        let status = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::inherit())
            .status()?;
        if status.success() {
            Ok(())
        } else {
            Err(io::Error::other(format!("`{self}` failed with {status}")))
        }
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

/// Single-quote `word` for a POSIX shell when it contains anything unusual
pub fn quote(word: &str) -> String {
    let plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=+:,@%~".contains(c));
    if plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// `echo '<line>' >> <file>`, the manual form of a profile append
pub fn append_line(line: &str, file: &Path) -> String {
    format!(
        "echo {} >> {}",
        quote(line),
        quote(&file.display().to_string())
    )
}
