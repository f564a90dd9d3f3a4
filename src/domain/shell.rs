//! Shell families and their profile files

use std::fmt;
use std::path::{Path, PathBuf};

use crate::env::Environment;

/// Interactive shell family, selected from `SHELL`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellProfile {
    Bash,
    Zsh,
    Fish,
    /// Anything else, including an unset `SHELL`
    Other,
}

impl ShellProfile {
    /// Classify a `SHELL` value such as `/usr/bin/zsh`
    pub fn from_shell_var(shell: Option<&str>) -> Self {
        let Some(name) = shell
            .map(Path::new)
            .and_then(Path::file_name)
            .and_then(|n| n.to_str())
        else {
            return ShellProfile::Other;
        };

        match name.trim_start_matches('-') {
            "bash" => ShellProfile::Bash,
            "zsh" => ShellProfile::Zsh,
            "fish" => ShellProfile::Fish,
            _ => ShellProfile::Other,
        }
    }

    /// Startup file this shell reads, relative to the home directory
    fn relative_profile(self) -> &'static str {
        match self {
            ShellProfile::Bash => ".bashrc",
            ShellProfile::Zsh => ".zshrc",
            ShellProfile::Fish => ".config/fish/config.fish",
            ShellProfile::Other => ".profile",
        }
    }

    pub fn profile_path(self, home: &Path) -> PathBuf {
        home.join(self.relative_profile())
    }

    /// The statement that puts `dir` in front of the search path
    pub fn append_path_line(self, dir: &Path) -> String {
        match self {
            ShellProfile::Fish => format!("fish_add_path {}", dir.display()),
            ShellProfile::Bash | ShellProfile::Zsh | ShellProfile::Other => {
                format!("export PATH=\"{}:$PATH\"", dir.display())
            }
        }
    }

    /// Whether the profile lives in a directory that may not exist yet
    pub fn needs_parent_dir(self) -> bool {
        matches!(self, ShellProfile::Fish)
    }
}

impl fmt::Display for ShellProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellProfile::Bash => write!(f, "bash"),
            ShellProfile::Zsh => write!(f, "zsh"),
            ShellProfile::Fish => write!(f, "fish"),
            ShellProfile::Other => write!(f, "sh"),
        }
    }
}

/// The user's shell and the profile file it reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellContext {
    pub kind: ShellProfile,
    pub profile_path: PathBuf,
}

impl ShellContext {
    pub fn detect(env: &Environment) -> Self {
        let kind = ShellProfile::from_shell_var(env.shell.as_deref());
        Self {
            kind,
            profile_path: kind.profile_path(&env.home),
        }
    }

    pub fn append_path_line(&self, dir: &Path) -> String {
        self.kind.append_path_line(dir)
    }
}
