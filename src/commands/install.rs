//! Install command
//!
//! Captures the process environment and hands it to [`InstallOperation`].

use crate::cli::InstallArgs;
use crate::deploy::{Elevation, NoElevation, SudoElevation};
use crate::env::Environment;
use crate::error::Result;
use crate::operations::{InstallOperation, InstallOptions, InstallOutcome};
use crate::ui::ConsoleReporter;

/// Run the install
///
/// A manual fallback still counts as success: the instructions were printed.
pub fn run(args: InstallArgs) -> Result<()> {
    let env = Environment::capture()?;
    let mut reporter = ConsoleReporter::new();
    let elevation = elevation_for(args.no_elevate);
    let options = InstallOptions {
        check_profile: args.check_profile,
    };

    match InstallOperation::new(&env, &mut reporter, elevation, options).run()? {
        InstallOutcome::Installed => log::debug!("install complete"),
        InstallOutcome::ManualFallback => log::debug!("install left to manual steps"),
    }
    Ok(())
}

/// Pick the elevation strategy for commands that may need root
pub fn elevation_for(no_elevate: bool) -> &'static dyn Elevation {
    if no_elevate {
        &NoElevation
    } else {
        &SudoElevation
    }
}
