//! Main orchestrator for the install operation
//!
//! `probe -> build -> deploy -> register`. A missing build tool or a failed
//! build aborts the run. Anything that goes wrong after the build is reported
//! and answered with manual instructions instead.

use crate::builder::Builder;
use crate::deploy::{Deployer, Deployment, Elevation};
use crate::domain::{InstallTarget, ShellContext};
use crate::env::Environment;
use crate::error::Result;
use crate::probe::{CapabilityReport, ConfigChange, Prober, nix_conf};
use crate::registrar::{PathRegistrar, Registration};
use crate::ui::{Level, Reporter};

use super::fallback::report_manual_fallback;

/// Options for installation
#[derive(Debug, Clone, Copy, Default)]
pub struct InstallOptions {
    /// Scan the profile content before appending to it
    pub check_profile: bool,
}

/// How a non-fatal run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Binary deployed and discoverable
    Installed,
    /// The user was handed manual instructions
    ManualFallback,
}

/// Sequences prober, builder, deployer and registrar
pub struct InstallOperation<'a> {
    env: &'a Environment,
    reporter: &'a mut dyn Reporter,
    elevation: &'a dyn Elevation,
    options: InstallOptions,
}

impl<'a> InstallOperation<'a> {
    pub fn new(
        env: &'a Environment,
        reporter: &'a mut dyn Reporter,
        elevation: &'a dyn Elevation,
        options: InstallOptions,
    ) -> Self {
        Self {
            env,
            reporter,
            elevation,
            options,
        }
    }

    /// Run the whole install
    ///
    /// Returns `Err` only for fatal errors, which are left for the caller to report.
    pub fn run(&mut self) -> Result<InstallOutcome> {
        let report = self.probe_environment()?;
        self.build(&report)?;

        let target = InstallTarget::for_environment(self.env);
        let ctx = ShellContext::detect(self.env);

        match self.deploy_and_register(&target, &ctx) {
            Ok(()) => {
                self.report_success_and_usage(&target);
                Ok(InstallOutcome::Installed)
            }
            Err(err) if err.is_fatal() => Err(err),
            Err(err) => {
                self.reporter.failure(&err);
                report_manual_fallback(&mut *self.reporter, &target, &ctx);
                Ok(InstallOutcome::ManualFallback)
            }
        }
    }

    fn probe_environment(&mut self) -> Result<CapabilityReport> {
        self.reporter.info("Checking build environment");
        let prober = Prober::new(self.env);
        let report = prober.probe()?;
        self.reporter
            .success(&format!("Found nix at {}", report.build_tool.display()));

        if report.build_tool_has_feature {
            self.reporter.success("nix flakes are enabled");
        } else {
            self.enable_flakes(&prober);
        }

        for tool in report.missing_optional() {
            self.reporter.warning(&format!(
                "{} not found; {} will not be available",
                tool.name, tool.purpose
            ));
            self.reporter
                .detail(&format!("Install it with: {}", tool.install_hint));
        }
        Ok(report)
    }

    fn enable_flakes(&mut self, prober: &Prober<'_>) {
        let config = nix_conf::user_config_path(&self.env.home);
        self.reporter.warning(&format!(
            "nix flakes are not enabled; adding `{}` to {}",
            nix_conf::FLAKES_SETTING,
            config.display()
        ));

        match prober.enable_required_feature() {
            Ok(ConfigChange::Created | ConfigChange::Appended) => {
                self.reporter
                    .success(&format!("Enabled nix flakes in {}", config.display()));
            }
            Ok(ConfigChange::AlreadyEnabled) => {
                self.reporter.info(&format!(
                    "{} already enables flakes; restart the nix daemon if the build still refuses them",
                    config.display()
                ));
            }
            Err(err) => self.reporter.diagnostic(Level::Warning, &err),
        }
    }

    fn build(&mut self, report: &CapabilityReport) -> Result<()> {
        self.reporter
            .info(&format!("Building dravi with `{}`", Builder::command_line()));
        Builder::new(&report.build_tool, &self.env.current_dir).build()?;
        self.reporter.success("Build finished");
        Ok(())
    }

    fn deploy_and_register(&mut self, target: &InstallTarget, ctx: &ShellContext) -> Result<()> {
        let deployment = Deployer::new(self.elevation).deploy(target)?;
        self.report_deployment(&deployment);

        let registration = PathRegistrar::new(self.env)
            .with_profile_check(self.options.check_profile)
            .register(target, ctx)?;
        self.report_registration(target, &registration);
        Ok(())
    }

    fn report_deployment(&mut self, deployment: &Deployment) {
        self.reporter.success(&format!(
            "Installed dravi to {}",
            deployment.destination.display()
        ));
        if deployment.replaced {
            self.reporter.info("Replaced the previously installed binary");
        }
        if deployment.elevated {
            self.reporter.info("Some steps needed elevated privileges");
        }
    }

    fn report_registration(&mut self, target: &InstallTarget, registration: &Registration) {
        let dir = target.binary_dir.display();
        match registration {
            Registration::AlreadyOnPath => {
                self.reporter.info(&format!("{dir} is already on your PATH"));
            }
            Registration::AlreadyInProfile { profile } => {
                self.reporter.info(&format!(
                    "{} already adds {dir} to PATH; open a new shell if dravi is not found",
                    profile.display()
                ));
            }
            Registration::Appended { profile, .. } => {
                self.reporter
                    .success(&format!("Added {dir} to PATH in {}", profile.display()));
                self.reporter.info(&format!(
                    "Open a new shell or run `source {}` for the change to take effect",
                    profile.display()
                ));
            }
        }
    }

    fn report_success_and_usage(&mut self, target: &InstallTarget) {
        self.reporter.success(&format!(
            "{} is installed. Run `{}` to start drawing.",
            target.binary_name, target.binary_name
        ));
        for line in [
            "hjkl move, space draws, ? opens settings, q quits",
            "i places Typst text, s saves drawing.typ",
            "with typst installed, saving also compiles drawing.pdf; r previews it with tdf",
        ] {
            self.reporter.detail(line);
        }
    }
}
