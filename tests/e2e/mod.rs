use assert_cmd::Command;
use assert_fs::{prelude::*, TempDir};
use predicates::prelude::*;
use std::path::PathBuf;

pub mod config;
pub mod extensions;
pub mod models;

/// Test context that provides isolated environment for each test
pub struct TestContext {
    pub temp: TempDir,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.child("config").path()).unwrap();
        Self { temp }
    }

    pub fn models_root(&self) -> PathBuf {
        self.temp.child("models").to_path_buf()
    }

    pub fn extensions_root(&self) -> PathBuf {
        self.temp.child("custom_nodes").to_path_buf()
    }

    /// Create a Command for running provision with an isolated environment
    pub fn provision(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("provision").unwrap();
        cmd.current_dir(&self.temp);

        // Keep the dirs crate away from the real config directory
        let config_dir = self.temp.child("config").to_path_buf();
        if cfg!(target_os = "windows") {
            cmd.env("APPDATA", &config_dir);
            cmd.env("USERPROFILE", self.temp.path());
        } else {
            cmd.env("XDG_CONFIG_HOME", &config_dir);
            cmd.env("HOME", self.temp.path());
        }

        cmd.env("PROVISION_MODELS_ROOT", self.models_root());
        cmd.env("PROVISION_EXTENSIONS_ROOT", self.extensions_root());
        cmd.env("HF_ENDPOINT", "http://127.0.0.1:9");
        cmd.env_remove("HF_TOKEN");
        cmd
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let file = self.temp.child(name);
        file.write_str(content).unwrap();
        file.to_path_buf()
    }
}

#[test]
fn help_lists_commands() {
    let ctx = TestContext::new();
    ctx.provision()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("models"))
        .stdout(predicate::str::contains("extensions"));
}
