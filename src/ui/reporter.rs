//! Categorized status messages
//!
//! Four categories exist: info, success, warning and error. Continuation lines
//! (`detail`) belong to the message printed before them and are used for
//! copy-pasteable commands.

use console::Style;

use crate::error::InstallError;

/// Severity of a reported message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Info => "[INFO]",
            Level::Success => "[OK]",
            Level::Warning => "[WARN]",
            Level::Error => "[ERROR]",
        }
    }

    fn style(self) -> Style {
        match self {
            Level::Info => Style::new().blue().bold(),
            Level::Success => Style::new().green().bold(),
            Level::Warning => Style::new().yellow().bold(),
            Level::Error => Style::new().red().bold(),
        }
    }
}

/// Sink for user-facing messages
pub trait Reporter {
    /// Emit one tagged message
    fn emit(&mut self, level: Level, message: &str);

    /// Emit an untagged continuation line (commands, usage)
    fn detail(&mut self, line: &str);

    fn info(&mut self, message: &str) {
        self.emit(Level::Info, message);
    }

    fn success(&mut self, message: &str) {
        self.emit(Level::Success, message);
    }

    fn warning(&mut self, message: &str) {
        self.emit(Level::Warning, message);
    }

    fn error(&mut self, message: &str) {
        self.emit(Level::Error, message);
    }

    /// Report an error together with its remediation
    fn diagnostic(&mut self, level: Level, err: &InstallError) {
        self.emit(level, &describe(err));
    }

    /// Report an error at error level
    fn failure(&mut self, err: &InstallError) {
        self.error(&describe(err));
    }
}

fn describe(err: &InstallError) -> String {
    match err.remedy() {
        Some(remedy) => format!("{err}\n  help: {remedy}"),
        None => err.to_string(),
    }
}

/// Reporter that prints styled lines to the terminal
///
/// Info and success go to stdout, warnings and errors to stderr.
#[derive(Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for ConsoleReporter {
    fn emit(&mut self, level: Level, message: &str) {
        let tag = level.style().apply_to(level.tag());
        match level {
            Level::Info | Level::Success => println!("{tag} {message}"),
            Level::Warning | Level::Error => eprintln!("{tag} {message}"),
        }
    }

    fn detail(&mut self, line: &str) {
        println!("    {}", Style::new().cyan().apply_to(line));
    }
}

/// Reporter that keeps every message in memory
#[cfg(test)]
#[derive(Default)]
pub struct RecordingReporter {
    pub messages: Vec<(Level, String)>,
    pub details: Vec<String>,
}

#[cfg(test)]
impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages of one level
    pub fn at(&self, level: Level) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.as_str())
            .collect()
    }

    /// Whether any message of `level` contains `needle`
    pub fn has(&self, level: Level, needle: &str) -> bool {
        self.at(level).iter().any(|m| m.contains(needle))
    }
}

#[cfg(test)]
impl Reporter for RecordingReporter {
    fn emit(&mut self, level: Level, message: &str) {
        self.messages.push((level, message.to_string()));
    }

    fn detail(&mut self, line: &str) {
        self.details.push(line.to_string());
    }
}
