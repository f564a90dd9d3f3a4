//! Version command implementation

use crate::builder::Builder;
use crate::domain::APP_NAME;
use crate::error::Result;
use crate::probe::OPTIONAL_TOOLS;

/// Run version command
pub fn run() -> Result<()> {
    println!("dravi-install {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Installs: {APP_NAME}");
    println!("  Build command: {}", Builder::command_line());
    println!("  Optional tools: {}", optional_tool_names());
    println!();
    println!("Build info:");
    println!("  Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    println!("  Profile: {}", build_profile());

    Ok(())
}

fn optional_tool_names() -> String {
    OPTIONAL_TOOLS
        .iter()
        .map(|tool| tool.name)
        .collect::<Vec<_>>()
        .join(", ")
}

fn build_profile() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}
