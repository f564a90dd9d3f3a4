//! Manual recovery instructions
//!
//! Built from the same [`ShellCommand`] values and profile line the deployer
//! and registrar use, so the printed steps match what the installer attempts.

use crate::deploy::ShellCommand;
use crate::deploy::commands::append_line;
use crate::domain::{InstallTarget, ShellContext};
use crate::ui::Reporter;

/// The commands a user runs to finish the install by hand, in order
pub fn manual_steps(target: &InstallTarget, ctx: &ShellContext) -> Vec<String> {
    let destination = target.destination();
    let mut steps = vec![
        ShellCommand::make_dir(&target.binary_dir).to_string(),
        ShellCommand::copy(&target.source_artifact, &destination).to_string(),
        ShellCommand::make_executable(&destination).to_string(),
    ];
    if ctx.kind.needs_parent_dir() {
        if let Some(parent) = ctx.profile_path.parent() {
            steps.push(ShellCommand::make_dir(parent).to_string());
        }
    }
    steps.push(append_line(
        &ctx.append_path_line(&target.binary_dir),
        &ctx.profile_path,
    ));
    steps
}

/// Print the manual fallback block
pub fn report_manual_fallback(
    reporter: &mut dyn Reporter,
    target: &InstallTarget,
    ctx: &ShellContext,
) {
    reporter.warning(&format!(
        "{} could not be installed automatically. Finish the install by hand:",
        target.binary_name
    ));
    for step in manual_steps(target, ctx) {
        reporter.detail(&step);
    }
    reporter.info("Prefix the copy commands with sudo if they are refused. Then open a new shell.");
    reporter.info(&format!(
        "Until then you can run {} directly:",
        target.binary_name
    ));
    reporter.detail(&target.destination().display().to_string());
}
