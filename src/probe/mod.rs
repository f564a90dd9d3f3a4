//! Host toolchain detection
//!
//! The build tool is mandatory: without it the run stops before anything is
//! written. The PDF compiler and viewer are optional and only produce advice.

pub mod nix_conf;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::env::Environment;
use crate::error::{InstallError, Result};

pub use nix_conf::ConfigChange;

/// Mandatory build tool
pub const BUILD_TOOL: &str = "nix";

/// Where to get the build tool
pub const BUILD_TOOL_URL: &str = "https://nixos.org/download/";

/// A tool dravi uses at runtime but the install does not need
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionalTool {
    pub name: &'static str,
    pub purpose: &'static str,
    pub install_hint: &'static str,
}

/// Optional tools, in the order they are checked
pub static OPTIONAL_TOOLS: [OptionalTool; 2] = [
    OptionalTool {
        name: "typst",
        purpose: "compiling drawings to PDF",
        install_hint: "nix profile install nixpkgs#typst",
    },
    OptionalTool {
        name: "tdf",
        purpose: "previewing compiled PDFs",
        install_hint: "nix profile install nixpkgs#tdf",
    },
];

/// What the prober found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityReport {
    /// Resolved location of the build tool
    pub build_tool: PathBuf,
    /// Whether flakes and the nix command are enabled
    pub build_tool_has_feature: bool,
    /// Availability of each optional tool, by name
    pub optional_tools: BTreeMap<&'static str, bool>,
}

impl CapabilityReport {
    /// Optional tools that were not found
    pub fn missing_optional(&self) -> impl Iterator<Item = &'static OptionalTool> + '_ {
        OPTIONAL_TOOLS
            .iter()
            .filter(|tool| !self.optional_tools.get(tool.name).copied().unwrap_or(false))
    }
}

/// Checks the environment for the tools the install depends on
pub struct Prober<'a> {
    env: &'a Environment,
}

impl<'a> Prober<'a> {
    pub fn new(env: &'a Environment) -> Self {
        Self { env }
    }

    /// Probe the build tool, its feature flags and the optional tools
    ///
    /// Fails with [`InstallError::MissingMandatoryTool`] when the build tool is
    /// absent; nothing else is checked in that case.
    pub fn probe(&self) -> Result<CapabilityReport> {
        let build_tool =
            self.env
                .find_tool(BUILD_TOOL)
                .ok_or_else(|| InstallError::MissingMandatoryTool {
                    tool: BUILD_TOOL.to_string(),
                    url: BUILD_TOOL_URL.to_string(),
                })?;

        let build_tool_has_feature = self.has_required_feature(&build_tool);

        let optional_tools = OPTIONAL_TOOLS
            .iter()
            .map(|tool| (tool.name, self.env.find_tool(tool.name).is_some()))
            .collect();

        Ok(CapabilityReport {
            build_tool,
            build_tool_has_feature,
            optional_tools,
        })
    }

    /// Append the flakes setting to the user's nix configuration if it is missing
    pub fn enable_required_feature(&self) -> Result<ConfigChange> {
        nix_conf::enable_flakes(&nix_conf::user_config_path(&self.env.home))
    }

    /// Ask the build tool for its configuration and look for the feature flags
    fn has_required_feature(&self, build_tool: &Path) -> bool {
        log::debug!("running {} show-config", build_tool.display());
        let output = Command::new(build_tool)
            .arg("show-config")
            .current_dir(&self.env.current_dir)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output();

        match output {
            Ok(output) if output.status.success() => {
                nix_conf::lists_required_features(&String::from_utf8_lossy(&output.stdout))
            }
            Ok(output) => {
                log::debug!("show-config exited with {}", output.status);
                false
            }
            Err(e) => {
                log::debug!("show-config could not run: {e}");
                false
            }
        }
    }
}
