//! The user's nix configuration file
//!
//! Only ever appended to. A second run finds the setting and leaves the file alone.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{InstallError, Result};

/// Line appended to enable flakes
pub const FLAKES_SETTING: &str = "experimental-features = nix-command flakes";

const SETTING_KEY: &str = "experimental-features";
const REQUIRED_FEATURES: [&str; 2] = ["nix-command", "flakes"];

/// Outcome of [`enable_flakes`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigChange {
    /// The file already enables both features
    AlreadyEnabled,
    /// The file did not exist and was created with the setting
    Created,
    /// The setting was appended to an existing file
    Appended,
}

/// `~/.config/nix/nix.conf`
pub fn user_config_path(home: &Path) -> PathBuf {
    home.join(".config").join("nix").join("nix.conf")
}

/// Whether any non-comment `experimental-features` line enables both features
///
/// Works on `nix show-config` output and on `nix.conf` content alike.
pub fn lists_required_features(content: &str) -> bool {
    content.lines().any(|line| {
        let line = line.split('#').next().unwrap_or_default();
        let Some((key, value)) = line.split_once('=') else {
            return false;
        };
        let key = key.trim();
        if key != SETTING_KEY && key != format!("extra-{SETTING_KEY}") {
            return false;
        }
        let enabled: Vec<&str> = value.split_whitespace().collect();
        REQUIRED_FEATURES
            .iter()
            .all(|feature| enabled.contains(feature))
    })
}

/// Append [`FLAKES_SETTING`] to `path` unless it is already there
pub fn enable_flakes(path: &Path) -> Result<ConfigChange> {
    let failed = |reason: String| InstallError::FeatureConfigFailed {
        path: path.display().to_string(),
        reason,
        line: FLAKES_SETTING.to_string(),
    };

    let existing = match fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(failed(e.to_string())),
    };

    if existing
        .as_deref()
        .is_some_and(|bytes| lists_required_features(&String::from_utf8_lossy(bytes)))
    {
        log::debug!("{} already enables flakes", path.display());
        return Ok(ConfigChange::AlreadyEnabled);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| failed(e.to_string()))?;
    }

    let needs_newline = existing
        .as_deref()
        .and_then(<[u8]>::last)
        .is_some_and(|&byte| byte != b'\n');

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| failed(e.to_string()))?;
    let line = if needs_newline {
        format!("\n{FLAKES_SETTING}\n")
    } else {
        format!("{FLAKES_SETTING}\n")
    };
    file.write_all(line.as_bytes())
        .map_err(|e| failed(e.to_string()))?;

    log::debug!("appended flakes setting to {}", path.display());
    Ok(if existing.is_some() {
        ConfigChange::Appended
    } else {
        ConfigChange::Created
    })
}
