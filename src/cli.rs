//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Args, Parser, Subcommand};

/// dravi-install - build and install dravi
///
/// Builds dravi with nix, copies it to ~/.local/bin and adds that directory to your shell's PATH.
#[derive(Parser, Debug)]
#[command(
    name = "dravi-install",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Build dravi with nix and install it to ~/.local/bin",
    long_about = "Checks for nix (enabling flakes if needed), runs `nix build` in the current \
                  directory, copies ./result/bin/dravi to ~/.local/bin and adds that directory \
                  to your shell profile. When a step cannot be completed, the exact commands to \
                  finish by hand are printed instead.",
    args_conflicts_with_subcommands = true,
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  dravi-install\n    \
                  dravi-install --no-elevate\n    \
                  dravi-install check\n    \
                  dravi-install uninstall --yes"
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Options for the default install command
    #[command(flatten)]
    pub install: InstallArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The subcommand to run; a bare invocation installs
    pub fn into_command(self) -> Commands {
        self.command.unwrap_or(Commands::Install(self.install))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build and install dravi (default)
    Install(InstallArgs),

    /// Check for nix, flakes, typst and tdf without changing anything
    Check,

    /// Remove the installed dravi binary
    Uninstall(UninstallArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the install command
#[derive(Args, Debug, Default, Clone)]
pub struct InstallArgs {
    /// Never retry failed steps with sudo
    #[arg(long, env = "DRAVI_INSTALL_NO_ELEVATE")]
    pub no_elevate: bool,

    /// Skip the PATH line when the shell profile already mentions ~/.local/bin
    #[arg(long, env = "DRAVI_INSTALL_CHECK_PROFILE")]
    pub check_profile: bool,
}

/// Arguments for the uninstall command
#[derive(Args, Debug, Default, Clone)]
#[command(after_help = "EXAMPLES:\n  \
                  Uninstall with confirmation:\n    dravi-install uninstall\n\n\
                  Uninstall without confirmation:\n    dravi-install uninstall -y")]
pub struct UninstallArgs {
    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Never retry the removal with sudo
    #[arg(long, env = "DRAVI_INSTALL_NO_ELEVATE")]
    pub no_elevate: bool,
}

/// Arguments for completions command
#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    dravi-install completions --shell bash > ~/.bash_completion.d/dravi-install\n\n\
                  Generate zsh completions:\n    dravi-install completions --shell zsh > ~/.zfunc/_dravi-install\n\n\
                  Generate fish completions:\n    dravi-install completions --shell fish > ~/.config/fish/completions/dravi-install.fish")]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(long, value_enum, ignore_case = true)]
    pub shell: clap_complete::Shell,
}
