//! Puts the binary directory on the user's search path
//!
//! Best-effort: every failure is reported back as an error carrying the exact
//! line to add by hand. The running process cannot change its parent shell, so
//! a successful append only takes effect in a new shell session.
//!
//! By default the only "already registered" check is the inherited `PATH`.
//! Running the installer twice before re-sourcing the profile therefore appends
//! the line twice. `check_profile` adds a scan of the profile content for the
//! directory as an exact path segment.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::{InstallTarget, ShellContext};
use crate::env::Environment;
use crate::error::{InstallError, Result};

/// What the registrar did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// The directory is already a segment of `PATH`; nothing was written
    AlreadyOnPath,
    /// The profile already mentions the directory; nothing was written
    AlreadyInProfile { profile: PathBuf },
    /// The statement was appended
    Appended {
        profile: PathBuf,
        line: String,
        /// The profile file did not exist before
        created: bool,
    },
}

/// Adds the binary directory to a shell profile
pub struct PathRegistrar<'a> {
    env: &'a Environment,
    check_profile: bool,
}

impl<'a> PathRegistrar<'a> {
    pub fn new(env: &'a Environment) -> Self {
        Self {
            env,
            check_profile: false,
        }
    }

    /// Also skip the append when the profile content already names the directory
    pub fn with_profile_check(mut self, check_profile: bool) -> Self {
        self.check_profile = check_profile;
        self
    }

    pub fn register(&self, target: &InstallTarget, ctx: &ShellContext) -> Result<Registration> {
        let dir = &target.binary_dir;
        if self.env.path_contains(dir) {
            log::debug!("{} already on PATH", dir.display());
            return Ok(Registration::AlreadyOnPath);
        }

        let profile = &ctx.profile_path;
        let line = ctx.append_path_line(dir);
        let create_failed = |reason: String| InstallError::ProfileCreateFailed {
            path: profile.display().to_string(),
            reason,
            line: line.clone(),
        };

        if ctx.kind.needs_parent_dir() {
            if let Some(parent) = profile.parent() {
                fs::create_dir_all(parent).map_err(|e| create_failed(e.to_string()))?;
            }
        }

        let created = !profile.exists();
        if created {
            fs::File::create(profile).map_err(|e| create_failed(e.to_string()))?;
            log::debug!("created {}", profile.display());
        }

        let write_failed = |reason: String| InstallError::ProfileWriteFailed {
            path: profile.display().to_string(),
            reason,
            line: line.clone(),
        };

        // Profiles may hold bytes in any encoding; only the path scan needs text
        let existing = fs::read(profile).map_err(|e| write_failed(e.to_string()))?;

        if self.check_profile
            && mentions_path_segment(&String::from_utf8_lossy(&existing), dir)
        {
            log::debug!("{} already mentions {}", profile.display(), dir.display());
            return Ok(Registration::AlreadyInProfile {
                profile: profile.clone(),
            });
        }

        let mut file = OpenOptions::new()
            .append(true)
            .open(profile)
            .map_err(|e| write_failed(e.to_string()))?;
        let text = if existing.last().is_none_or(|&byte| byte == b'\n') {
            format!("{line}\n")
        } else {
            format!("\n{line}\n")
        };
        file.write_all(text.as_bytes())
            .map_err(|e| write_failed(e.to_string()))?;

        log::debug!("appended `{line}` to {}", profile.display());
        Ok(Registration::Appended {
            profile: profile.clone(),
            line,
            created,
        })
    }
}

/// Whether a non-comment line of `content` names `dir` as a whole path segment
///
/// A segment is delimited by the start or end of the line, whitespace, quotes,
/// `=` or `:`. `$HOME`-relative spellings are not recognised.
pub fn mentions_path_segment(content: &str, dir: &Path) -> bool {
    let needle = dir.display().to_string();
    let needle = needle.trim_end_matches('/');
    if needle.is_empty() {
        return false;
    }

    let is_boundary = |c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '=' | ':');

    content
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .any(|line| {
            line.match_indices(needle).any(|(start, _)| {
                let before = line[..start].chars().next_back();
                let mut after = line[start + needle.len()..].chars();
                let next = match after.next() {
                    Some('/') => after.next(),
                    other => other,
                };
                before.is_none_or(is_boundary) && next.is_none_or(is_boundary)
            })
        })
}
