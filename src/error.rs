//! Error types and handling for dravi-install
//!
//! Uses `thiserror` for error definitions and `miette` for diagnostics. Every
//! variant carries exactly one remediation in its `help`, so a failure is never
//! reported without a next step for the user.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for installer operations
#[derive(Error, Diagnostic, Debug)]
pub enum InstallError {
    // Environment errors
    #[error("Required tool '{tool}' was not found on PATH")]
    #[diagnostic(
        code(dravi_install::probe::missing_tool),
        help("Install {tool} from {url}, then run dravi-install again")
    )]
    MissingMandatoryTool { tool: String, url: String },

    #[error("Could not determine your home directory")]
    #[diagnostic(
        code(dravi_install::env::no_home),
        help("Set HOME to your home directory and run dravi-install again")
    )]
    HomeDirectoryUnknown,

    #[error("Failed to enable nix flakes in {path}: {reason}")]
    #[diagnostic(
        code(dravi_install::probe::feature_config_failed),
        help("Add this line to {path} manually: {line}")
    )]
    FeatureConfigFailed {
        path: String,
        reason: String,
        line: String,
    },

    // Build errors
    #[error("Build failed: `{command}` {status}")]
    #[diagnostic(
        code(dravi_install::build::failed),
        help("Fix the errors reported above, then run `{command}` to check the build")
    )]
    BuildFailed { command: String, status: String },

    // Deploy errors
    #[error("Failed to create directory {path}: {reason}")]
    #[diagnostic(
        code(dravi_install::deploy::create_dir_failed),
        help("Create the directory and copy the binary yourself: {remedy}")
    )]
    DirectoryCreateFailed {
        path: String,
        reason: String,
        remedy: String,
    },

    #[error("Failed to remove the previous binary at {path}: {reason}")]
    #[diagnostic(
        code(dravi_install::deploy::remove_failed),
        help("Remove it manually with: {remedy}")
    )]
    OldBinaryRemoveFailed {
        path: String,
        reason: String,
        remedy: String,
    },

    #[error("Failed to copy {from} to {to}: {reason}")]
    #[diagnostic(
        code(dravi_install::deploy::copy_failed),
        help("Copy it manually with: {remedy}")
    )]
    CopyFailed {
        from: String,
        to: String,
        reason: String,
        remedy: String,
    },

    #[error("Failed to mark {path} as executable: {reason}")]
    #[diagnostic(
        code(dravi_install::deploy::chmod_failed),
        help("Set the executable bit manually with: {remedy}")
    )]
    PermissionBitFailed {
        path: String,
        reason: String,
        remedy: String,
    },

    #[error("Build artifact not found at {path}")]
    #[diagnostic(
        code(dravi_install::deploy::artifact_missing),
        help("Confirm that `nix build` completed and produced {path}, then run dravi-install again")
    )]
    ArtifactMissing { path: String },

    // Path registration errors
    #[error("Failed to create shell profile {path}: {reason}")]
    #[diagnostic(
        code(dravi_install::path::profile_create_failed),
        help("Create {path} and add this line to it: {line}")
    )]
    ProfileCreateFailed {
        path: String,
        reason: String,
        line: String,
    },

    #[error("Failed to update shell profile {path}: {reason}")]
    #[diagnostic(
        code(dravi_install::path::profile_write_failed),
        help("Add this line to {path} manually: {line}")
    )]
    ProfileWriteFailed {
        path: String,
        reason: String,
        line: String,
    },

    // Ambient errors
    #[error("Failed to read confirmation: {message}")]
    #[diagnostic(
        code(dravi_install::prompt::failed),
        help("Pass --yes to skip the confirmation prompt")
    )]
    Prompt { message: String },

    #[error("IO error: {message}")]
    #[diagnostic(
        code(dravi_install::io),
        help("Check that the current directory exists and is readable")
    )]
    Io { message: String },
}

impl InstallError {
    /// Whether this error aborts the run instead of falling back to manual steps
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            InstallError::MissingMandatoryTool { .. }
                | InstallError::BuildFailed { .. }
                | InstallError::HomeDirectoryUnknown
                | InstallError::Io { .. }
        )
    }

    /// The single remediation attached to this error
    pub fn remedy(&self) -> Option<String> {
        self.help().map(|help| help.to_string())
    }
}

impl From<std::io::Error> for InstallError {
    fn from(err: std::io::Error) -> Self {
        InstallError::Io {
            message: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for InstallError {
    fn from(err: inquire::InquireError) -> Self {
        InstallError::Prompt {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, InstallError>;
