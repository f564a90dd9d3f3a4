//! dravi-install - build and install dravi
//!
//! Builds dravi from the current directory with nix, copies the binary to
//! `~/.local/bin` and makes sure that directory is on the user's PATH. Steps that
//! cannot be completed automatically are answered with the commands to run by hand.

use clap::Parser;

mod builder;
mod cli;
mod commands;
mod deploy;
mod domain;
mod env;
mod error;
mod operations;
mod probe;
mod registrar;
mod ui;

use cli::{Cli, Commands};
use ui::{ConsoleReporter, Reporter};

/// Route `log` output to stderr, quiet unless `RUST_LOG` or `--verbose` asks otherwise
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.into_command() {
        Commands::Install(args) => commands::install::run(args),
        Commands::Check => commands::check::run(),
        Commands::Uninstall(args) => commands::uninstall::run(args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        ConsoleReporter::new().failure(&e);
        std::process::exit(1);
    }
}
