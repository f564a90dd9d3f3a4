//! Common test utilities for dravi-install integration tests
//!
//! Every test runs the real binary against a throwaway home directory, a
//! throwaway source checkout and a `PATH` that holds only a fake `nix`.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// `show-config` output of a nix with flakes enabled
pub const FLAKES_ENABLED: &str = "experimental-features = nix-command flakes";

/// Build step that produces a runnable artifact, using shell builtins only
pub const BUILD_ARTIFACT: &str = "printf '#!/bin/sh\\necho dravi\\n' > result/bin/dravi";

/// A sandboxed user: home, source checkout and tool directory
pub struct TestHome {
    pub temp: TempDir,
    pub home: PathBuf,
    pub work: PathBuf,
    pub tools: PathBuf,
    shell: String,
    extra_path: Vec<PathBuf>,
}

impl TestHome {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let home = temp.path().join("home");
        let work = temp.path().join("work");
        let tools = temp.path().join("tools");
        for dir in [&home, &work.join("result/bin"), &tools] {
            fs::create_dir_all(dir).expect("Failed to create sandbox directory");
        }
        Self {
            temp,
            home,
            work,
            tools,
            shell: "/bin/bash".to_string(),
            extra_path: Vec::new(),
        }
    }

    /// Sandbox whose nix has flakes enabled and builds successfully
    pub fn with_working_nix() -> Self {
        let home = Self::new();
        home.install_nix(FLAKES_ENABLED, BUILD_ARTIFACT);
        home
    }

    pub fn shell(mut self, shell: &str) -> Self {
        self.shell = shell.to_string();
        self
    }

    /// Put another directory on the child's PATH after the tool directory
    pub fn also_on_path(mut self, dir: PathBuf) -> Self {
        self.extra_path.push(dir);
        self
    }

    /// Write a fake `nix` answering `show-config` with `config` and `build` with `build`
    pub fn install_nix(&self, config: &str, build: &str) {
        self.install_tool(
            "nix",
            &format!(
                "case \"$1\" in\n  show-config) echo '{config}' ;;\n  build) {build} ;;\nesac\n"
            ),
        );
    }

    pub fn install_tool(&self, name: &str, body: &str) {
        use std::os::unix::fs::PermissionsExt;

        let path = self.tools.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}")).expect("Failed to write tool");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("Failed to make tool executable");
    }

    pub fn local_bin(&self) -> PathBuf {
        self.home.join(".local/bin")
    }

    pub fn installed_binary(&self) -> PathBuf {
        self.local_bin().join("dravi")
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.home.join(relative)).expect("Failed to read file")
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.home.join(relative).exists()
    }

    fn search_path(&self) -> String {
        std::iter::once(self.tools.as_path())
            .chain(self.extra_path.iter().map(PathBuf::as_path))
            .map(Path::to_string_lossy)
            .collect::<Vec<_>>()
            .join(":")
    }

    /// The binary, configured to run inside this sandbox
    #[allow(deprecated)]
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("dravi-install").expect("binary is built");
        cmd.current_dir(&self.work)
            .env_clear()
            .env("HOME", &self.home)
            .env("SHELL", &self.shell)
            .env("PATH", self.search_path());
        cmd
    }
}

/// Count lines of `content` containing `needle`
pub fn count_lines(content: &str, needle: &str) -> usize {
    content.lines().filter(|line| line.contains(needle)).count()
}
