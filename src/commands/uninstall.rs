//! Uninstall command
//!
//! Removes the installed binary. The PATH line in the shell profile is left in
//! place because other tools may rely on `~/.local/bin`; the user is told which
//! line to delete.

use std::fs;
use std::path::Path;

use inquire::Confirm;

use crate::cli::UninstallArgs;
use crate::commands::install::elevation_for;
use crate::deploy::{Elevation, Removal, remove_binary};
use crate::domain::{InstallTarget, ShellContext};
use crate::env::Environment;
use crate::error::Result;
use crate::registrar::mentions_path_segment;
use crate::ui::{ConsoleReporter, Reporter};

/// Run uninstall command
pub fn run(args: UninstallArgs) -> Result<()> {
    let env = Environment::capture()?;
    let mut reporter = ConsoleReporter::new();
    let target = InstallTarget::for_environment(&env);

    if !is_installed(&target.destination()) {
        reporter.info(&format!(
            "{} is not installed at {}",
            target.binary_name,
            target.destination().display()
        ));
        return Ok(());
    }

    if !args.yes && !confirm_uninstall(&target)? {
        reporter.info("Uninstall cancelled");
        return Ok(());
    }

    uninstall(&env, &target, &mut reporter, elevation_for(args.no_elevate))
}

/// Whether anything, including a dangling symlink, occupies `path`
fn is_installed(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

fn confirm_uninstall(target: &InstallTarget) -> Result<bool> {
    Ok(Confirm::new(&format!("Remove {}?", target.destination().display()))
        .with_default(true)
        .with_help_message("Press Enter to confirm, or 'n' to cancel")
        .prompt()?)
}

fn uninstall(
    env: &Environment,
    target: &InstallTarget,
    reporter: &mut dyn Reporter,
    elevation: &dyn Elevation,
) -> Result<()> {
    let destination = target.destination();
    match remove_binary(&destination, elevation)? {
        Removal::NotPresent => {
            reporter.info(&format!(
                "{} is not installed at {}",
                target.binary_name,
                destination.display()
            ));
            return Ok(());
        }
        Removal::Removed { elevated } => {
            if elevated {
                log::debug!("removal needed elevation");
            }
            reporter.success(&format!("Removed {}", destination.display()));
        }
    }

    let ctx = ShellContext::detect(env);
    let mentions = fs::read_to_string(&ctx.profile_path)
        .map(|content| mentions_path_segment(&content, &target.binary_dir))
        .unwrap_or(false);
    if mentions {
        reporter.info(&format!(
            "{} still adds {} to PATH. Delete this line if nothing else uses it:",
            ctx.profile_path.display(),
            target.binary_dir.display()
        ));
        reporter.detail(&ctx.append_path_line(&target.binary_dir));
    }
    Ok(())
}
