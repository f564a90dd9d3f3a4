//! Copies the built artifact into the user-local binary directory
//!
//! The steps are:
//! 1. Check that the artifact exists at all
//! 2. Create the binary directory (never elevated)
//! 3. Remove a previous binary, retrying with elevation on any failure
//! 4. Copy the artifact; on permission denial, copy and `chmod +x` elevated
//! 5. After a direct copy, set the executable bit directly (never elevated)
//!
//! Every failure maps to its own [`InstallError`] variant with the command that
//! finishes the job by hand.

pub mod commands;
pub mod escalation;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::domain::InstallTarget;
use crate::error::{InstallError, Result};

pub use commands::ShellCommand;
pub use escalation::{Elevation, NoElevation, SudoElevation};

use escalation::{Escalated, any_error, permission_denied, try_with_escalation};

/// What a successful deploy did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub destination: PathBuf,
    /// A previous binary was removed first
    pub replaced: bool,
    /// Some step needed elevation
    pub elevated: bool,
}

/// Outcome of removing an installed binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    NotPresent,
    Removed { elevated: bool },
}

/// The unelevated file operations of a deploy
pub trait FileOps {
    fn copy(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Add the executable bits to `path`
    fn make_executable(&self, path: &Path) -> io::Result<()>;
}

/// [`FileOps`] on the local filesystem as the invoking user
pub struct LocalFileOps;

impl FileOps for LocalFileOps {
    fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::copy(from, to).map(|_| ())
    }

    #[cfg(unix)]
    fn make_executable(&self, path: &Path) -> io::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let mut permissions = fs::metadata(path)?.permissions();
        permissions.set_mode(permissions.mode() | 0o755);
        fs::set_permissions(path, permissions)
    }

    #[cfg(not(unix))]
    fn make_executable(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}

/// Installs the artifact described by an [`InstallTarget`]
pub struct Deployer<'a> {
    elevation: &'a dyn Elevation,
    file_ops: &'a dyn FileOps,
}

impl<'a> Deployer<'a> {
    pub fn new(elevation: &'a dyn Elevation) -> Self {
        Self::with_file_ops(elevation, &LocalFileOps)
    }

    pub fn with_file_ops(elevation: &'a dyn Elevation, file_ops: &'a dyn FileOps) -> Self {
        Self {
            elevation,
            file_ops,
        }
    }

    pub fn deploy(&self, target: &InstallTarget) -> Result<Deployment> {
        let source = &target.source_artifact;
        let destination = target.destination();

        if !source.is_file() {
            return Err(InstallError::ArtifactMissing {
                path: source.display().to_string(),
            });
        }

        fs::create_dir_all(&target.binary_dir).map_err(|e| {
            InstallError::DirectoryCreateFailed {
                path: target.binary_dir.display().to_string(),
                reason: e.to_string(),
                remedy: format!(
                    "{} && {}",
                    ShellCommand::make_dir(&target.binary_dir),
                    ShellCommand::copy(source, &destination)
                ),
            }
        })?;

        let removal = remove_binary(&destination, self.elevation)?;

        let copied = try_with_escalation(
            || self.file_ops.copy(source, &destination),
            permission_denied,
            || self.copy_elevated(source, &destination),
        )
        .map_err(|e| InstallError::CopyFailed {
            from: source.display().to_string(),
            to: destination.display().to_string(),
            reason: e.reason(),
            remedy: ShellCommand::copy(source, &destination)
                .elevated()
                .to_string(),
        })?;

        if let Escalated::Direct(()) = copied {
            self.file_ops
                .make_executable(&destination)
                .map_err(|e| InstallError::PermissionBitFailed {
                    path: destination.display().to_string(),
                    reason: e.to_string(),
                    remedy: ShellCommand::make_executable(&destination).to_string(),
                })?;
        }

        let replaced = matches!(removal, Removal::Removed { .. });
        let elevated =
            copied.was_elevated() || matches!(removal, Removal::Removed { elevated: true });
        log::debug!(
            "deployed {} (replaced: {replaced}, elevated: {elevated})",
            destination.display()
        );

        Ok(Deployment {
            destination,
            replaced,
            elevated,
        })
    }

    /// Elevated copy; the executable bit is set in the same tier
    fn copy_elevated(&self, source: &Path, destination: &Path) -> io::Result<()> {
        self.elevation.run(&ShellCommand::copy(source, destination))?;
        self.elevation
            .run(&ShellCommand::make_executable(destination))
    }
}

/// Remove an installed binary, retrying with elevation on any failure
pub fn remove_binary(path: &Path, elevation: &dyn Elevation) -> Result<Removal> {
    if fs::symlink_metadata(path).is_err() {
        return Ok(Removal::NotPresent);
    }

    let removed = try_with_escalation(
        || fs::remove_file(path),
        any_error,
        || elevation.run(&ShellCommand::remove(path)),
    )
    .map_err(|e| InstallError::OldBinaryRemoveFailed {
        path: path.display().to_string(),
        reason: e.reason(),
        remedy: ShellCommand::remove(path).elevated().to_string(),
    })?;

    Ok(Removal::Removed {
        elevated: removed.was_elevated(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Records elevated commands and performs them in-process when allowed
    struct StubElevation {
        allow: bool,
        ran: RefCell<Vec<String>>,
    }

    impl StubElevation {
        fn allowing() -> Self {
            Self {
                allow: true,
                ran: RefCell::new(Vec::new()),
            }
        }

        fn refusing() -> Self {
            Self {
                allow: false,
                ran: RefCell::new(Vec::new()),
            }
        }
    }

    impl Elevation for StubElevation {
        fn run(&self, command: &ShellCommand) -> io::Result<()> {
            self.ran.borrow_mut().push(command.to_string());
            if !self.allow {
                return Err(io::Error::other("sudo: a password is required"));
            }
            // Removal is carried out so the deploy can continue; other commands are only recorded
            let text = command.to_string();
            if let Some(path) = text.strip_prefix("rm -f ") {
                let path = Path::new(path);
                if path.is_dir() {
                    fs::remove_dir_all(path)
                } else {
                    fs::remove_file(path)
                }
            } else {
                Ok(())
            }
        }
    }

    /// File operations that fail on demand with a given error kind
    #[derive(Default)]
    struct FailingFileOps {
        copy: Option<io::ErrorKind>,
        chmod: Option<io::ErrorKind>,
    }

    impl FileOps for FailingFileOps {
        fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
            match self.copy {
                Some(kind) => Err(io::Error::new(kind, "copy refused")),
                None => LocalFileOps.copy(from, to),
            }
        }

        fn make_executable(&self, path: &Path) -> io::Result<()> {
            match self.chmod {
                Some(kind) => Err(io::Error::new(kind, "chmod refused")),
                None => LocalFileOps.make_executable(path),
            }
        }
    }

    struct Fixture {
        _temp: TempDir,
        target: InstallTarget,
    }

    fn fixture(with_artifact: bool) -> Fixture {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("home");
        let work = temp.path().join("work");
        fs::create_dir_all(&home).unwrap();
        fs::create_dir_all(&work).unwrap();
        let target = InstallTarget::new(&home, &work, "dravi");
        if with_artifact {
            fs::create_dir_all(target.source_artifact.parent().unwrap()).unwrap();
            fs::write(&target.source_artifact, "#!/bin/sh\necho new\n").unwrap();
        }
        Fixture {
            _temp: temp,
            target,
        }
    }

    #[test]
    fn test_fresh_deploy_creates_directory_and_copies() {
        let fx = fixture(true);
        let elevation = StubElevation::refusing();

        let deployment = Deployer::new(&elevation).deploy(&fx.target).unwrap();

        assert_eq!(deployment.destination, fx.target.destination());
        assert!(!deployment.replaced);
        assert!(!deployment.elevated);
        assert_eq!(
            fs::read_to_string(fx.target.destination()).unwrap(),
            "#!/bin/sh\necho new\n"
        );
        assert!(elevation.ran.borrow().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_deployed_binary_is_executable() {
        use std::os::unix::fs::PermissionsExt;

        let fx = fixture(true);
        Deployer::new(&NoElevation).deploy(&fx.target).unwrap();

        let mode = fs::metadata(fx.target.destination())
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o111, 0o111);
    }

    #[test]
    fn test_existing_binary_is_replaced() {
        let fx = fixture(true);
        fs::create_dir_all(&fx.target.binary_dir).unwrap();
        fs::write(fx.target.destination(), "old").unwrap();

        let deployment = Deployer::new(&NoElevation).deploy(&fx.target).unwrap();

        assert!(deployment.replaced);
        assert!(!deployment.elevated);
        assert_eq!(
            fs::read_to_string(fx.target.destination()).unwrap(),
            "#!/bin/sh\necho new\n"
        );
    }

    #[test]
    fn test_missing_artifact_touches_nothing() {
        let fx = fixture(false);
        let err = Deployer::new(&NoElevation).deploy(&fx.target).unwrap_err();

        assert!(matches!(err, InstallError::ArtifactMissing { .. }));
        assert!(!fx.target.binary_dir.exists());
    }

    #[test]
    fn test_directory_create_failure() {
        let fx = fixture(true);
        // `.local` is a regular file, so `.local/bin` cannot be created
        let local = fx.target.binary_dir.parent().unwrap();
        fs::write(local, "").unwrap();
        let elevation = StubElevation::allowing();

        let err = Deployer::new(&elevation).deploy(&fx.target).unwrap_err();

        match &err {
            InstallError::DirectoryCreateFailed { remedy, .. } => {
                assert!(remedy.starts_with("mkdir -p "));
                assert!(remedy.contains(" && cp "));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(elevation.ran.borrow().is_empty());
    }

    #[test]
    fn test_removal_falls_back_to_elevation() {
        let fx = fixture(true);
        // A directory in the way cannot be removed with remove_file
        fs::create_dir_all(fx.target.destination().join("stale")).unwrap();
        let elevation = StubElevation::allowing();

        let deployment = Deployer::new(&elevation).deploy(&fx.target).unwrap();

        assert!(deployment.replaced);
        assert!(deployment.elevated);
        assert_eq!(elevation.ran.borrow().len(), 1);
        assert!(elevation.ran.borrow()[0].starts_with("rm -f "));
        assert!(fx.target.destination().is_file());
    }

    #[test]
    fn test_removal_failure_names_manual_command() {
        let fx = fixture(true);
        fs::create_dir_all(fx.target.destination().join("stale")).unwrap();
        let elevation = StubElevation::refusing();

        let err = Deployer::new(&elevation).deploy(&fx.target).unwrap_err();

        match err {
            InstallError::OldBinaryRemoveFailed { remedy, reason, .. } => {
                assert!(remedy.starts_with("sudo rm -f "));
                assert!(reason.contains("with elevation"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_directory_at_artifact_path_counts_as_missing() {
        let fx = fixture(false);
        fs::create_dir_all(&fx.target.source_artifact).unwrap();
        let elevation = StubElevation::allowing();

        let err = Deployer::new(&elevation).deploy(&fx.target).unwrap_err();

        assert!(matches!(err, InstallError::ArtifactMissing { .. }));
        assert!(elevation.ran.borrow().is_empty());
    }

    #[test]
    fn test_denied_copy_retries_copy_and_chmod_elevated() {
        let fx = fixture(true);
        let elevation = StubElevation::allowing();
        let file_ops = FailingFileOps {
            copy: Some(io::ErrorKind::PermissionDenied),
            ..Default::default()
        };

        let deployment = Deployer::with_file_ops(&elevation, &file_ops)
            .deploy(&fx.target)
            .unwrap();

        assert!(deployment.elevated);
        let destination = fx.target.destination();
        assert_eq!(
            *elevation.ran.borrow(),
            vec![
                ShellCommand::copy(&fx.target.source_artifact, &destination).to_string(),
                ShellCommand::make_executable(&destination).to_string(),
            ]
        );
        assert!(elevation.ran.borrow()[0].starts_with("cp "));
        assert!(elevation.ran.borrow()[1].starts_with("chmod +x "));
    }

    #[test]
    fn test_denied_copy_failing_elevated_names_sudo_cp() {
        let fx = fixture(true);
        let elevation = StubElevation::refusing();
        let file_ops = FailingFileOps {
            copy: Some(io::ErrorKind::PermissionDenied),
            ..Default::default()
        };

        let err = Deployer::with_file_ops(&elevation, &file_ops)
            .deploy(&fx.target)
            .unwrap_err();

        match err {
            InstallError::CopyFailed { remedy, reason, .. } => {
                assert!(remedy.starts_with("sudo cp "));
                assert!(reason.contains("copy refused"));
                assert!(reason.contains("with elevation"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // The elevated tier stops at the failed copy
        assert_eq!(elevation.ran.borrow().len(), 1);
        assert!(elevation.ran.borrow()[0].starts_with("cp "));
    }

    #[test]
    fn test_copy_failure_other_than_permission_is_not_elevated() {
        let fx = fixture(true);
        let elevation = StubElevation::allowing();
        let file_ops = FailingFileOps {
            copy: Some(io::ErrorKind::StorageFull),
            ..Default::default()
        };

        let err = Deployer::with_file_ops(&elevation, &file_ops)
            .deploy(&fx.target)
            .unwrap_err();

        match err {
            InstallError::CopyFailed { remedy, .. } => assert!(remedy.starts_with("sudo cp ")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(elevation.ran.borrow().is_empty());
    }

    #[test]
    fn test_chmod_failure_after_direct_copy_is_not_elevated() {
        let fx = fixture(true);
        let elevation = StubElevation::allowing();
        let file_ops = FailingFileOps {
            chmod: Some(io::ErrorKind::PermissionDenied),
            ..Default::default()
        };

        let err = Deployer::with_file_ops(&elevation, &file_ops)
            .deploy(&fx.target)
            .unwrap_err();

        match err {
            InstallError::PermissionBitFailed { remedy, .. } => {
                assert_eq!(
                    remedy,
                    ShellCommand::make_executable(&fx.target.destination()).to_string()
                );
                assert!(remedy.starts_with("chmod +x "));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(elevation.ran.borrow().is_empty());
        // The copy itself went through
        assert!(fx.target.destination().is_file());
    }

    #[test]
    fn test_remove_binary_not_present() {
        let temp = TempDir::new().unwrap();
        let removal = remove_binary(&temp.path().join("dravi"), &NoElevation).unwrap();
        assert_eq!(removal, Removal::NotPresent);
    }

    #[test]
    fn test_remove_binary_direct() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("dravi");
        fs::write(&path, "bin").unwrap();

        let removal = remove_binary(&path, &NoElevation).unwrap();
        assert_eq!(removal, Removal::Removed { elevated: false });
        assert!(!path.exists());
    }
}
