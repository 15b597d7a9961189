use std::fs;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Runs the floranet binary in an isolated temp directory
pub struct FloranetTest {
    pub temp_dir: TempDir,
}

impl FloranetTest {
    pub fn new() -> Self {
        FloranetTest {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_floranet"))
            .args(args)
            .current_dir(self.temp_dir.path())
            .env_remove("FLORANET_ROOT")
            .env_remove("FLORANET_API_BASE_URL")
            .env_remove("FLORANET_API_TOKEN")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .output()
            .expect("Failed to execute floranet command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn read_config(&self) -> String {
        let path = self.temp_dir.path().join(".floranet").join("config.yaml");
        fs::read_to_string(path).expect("Failed to read config file")
    }
}
