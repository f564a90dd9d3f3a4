//! Try unprivileged first, then retry with elevation
//!
//! Each tier's failure is kept so callers can report the exact operation that
//! could not be completed.

use std::io;

use super::commands::ShellCommand;

/// Which tier completed the operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escalated<T> {
    Direct(T),
    Elevated(T),
}

impl<T> Escalated<T> {
    pub fn was_elevated(&self) -> bool {
        matches!(self, Escalated::Elevated(_))
    }
}

/// Both tiers failed, or the direct failure did not qualify for elevation
#[derive(Debug)]
pub struct EscalationError {
    pub direct: io::Error,
    /// `None` when elevation was not attempted
    pub elevated: Option<io::Error>,
}

impl EscalationError {
    /// One-line reason suitable for an error message
    pub fn reason(&self) -> String {
        match &self.elevated {
            Some(elevated) => format!("{}; with elevation: {elevated}", self.direct),
            None => self.direct.to_string(),
        }
    }
}

/// Run `operation`; if it fails and `should_escalate` accepts the error, run `elevated`
pub fn try_with_escalation<T>(
    operation: impl FnOnce() -> io::Result<T>,
    should_escalate: impl FnOnce(&io::Error) -> bool,
    elevated: impl FnOnce() -> io::Result<T>,
) -> Result<Escalated<T>, EscalationError> {
    let direct = match operation() {
        Ok(value) => return Ok(Escalated::Direct(value)),
        Err(e) => e,
    };

    if !should_escalate(&direct) {
        log::debug!("not escalating: {direct}");
        return Err(EscalationError {
            direct,
            elevated: None,
        });
    }

    log::debug!("retrying with elevation after: {direct}");
    match elevated() {
        Ok(value) => Ok(Escalated::Elevated(value)),
        Err(e) => Err(EscalationError {
            direct,
            elevated: Some(e),
        }),
    }
}

/// Escalate on any failure
pub fn any_error(_: &io::Error) -> bool {
    true
}

/// Escalate only when the direct attempt was refused for lack of permission
pub fn permission_denied(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::PermissionDenied
}

/// Runs commands with superuser privileges
pub trait Elevation {
    fn run(&self, command: &ShellCommand) -> io::Result<()>;
}

/// Elevates through `sudo`, which may prompt for a password
pub struct SudoElevation;

impl Elevation for SudoElevation {
    fn run(&self, command: &ShellCommand) -> io::Result<()> {
        command.elevated().run()
    }
}

/// Refuses every elevation, for `--no-elevate`
pub struct NoElevation;

impl Elevation for NoElevation {
    fn run(&self, command: &ShellCommand) -> io::Result<()> {
        log::debug!("elevation disabled, skipping `{command}`");
        Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "elevation disabled by --no-elevate",
        ))
    }
}
