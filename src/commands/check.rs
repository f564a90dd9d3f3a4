//! Check command: report what the installer would find, without changing anything

use crate::builder::Builder;
use crate::domain::{InstallTarget, ShellContext};
use crate::env::Environment;
use crate::error::Result;
use crate::probe::{OPTIONAL_TOOLS, Prober, nix_conf};
use crate::ui::{ConsoleReporter, Reporter};

/// Probe the environment and print the findings
pub fn run() -> Result<()> {
    let env = Environment::capture()?;
    let mut reporter = ConsoleReporter::new();
    check(&env, &mut reporter)
}

fn check(env: &Environment, reporter: &mut dyn Reporter) -> Result<()> {
    let report = Prober::new(env).probe()?;
    reporter.success(&format!("nix: {}", report.build_tool.display()));

    if report.build_tool_has_feature {
        reporter.success("nix flakes are enabled");
    } else {
        reporter.warning(&format!(
            "nix flakes are not enabled; install will add `{}` to {}",
            nix_conf::FLAKES_SETTING,
            nix_conf::user_config_path(&env.home).display()
        ));
    }

    for tool in &OPTIONAL_TOOLS {
        if report.optional_tools.get(tool.name).copied().unwrap_or(false) {
            reporter.success(&format!("{}: found ({})", tool.name, tool.purpose));
        } else {
            reporter.warning(&format!("{}: not found ({})", tool.name, tool.purpose));
            reporter.detail(&format!("Install it with: {}", tool.install_hint));
        }
    }

    let target = InstallTarget::for_environment(env);
    let ctx = ShellContext::detect(env);
    reporter.info(&format!("Build command: {}", Builder::command_line()));
    reporter.info(&format!(
        "Install location: {}",
        target.destination().display()
    ));
    if env.path_contains(&target.binary_dir) {
        reporter.info(&format!("{} is on PATH", target.binary_dir.display()));
    } else {
        reporter.info(&format!(
            "{} is not on PATH; install will update {} ({} profile)",
            target.binary_dir.display(),
            ctx.profile_path.display(),
            ctx.kind
        ));
    }
    Ok(())
}
