//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - Fixture commands that register people, rooms and groups
//! - Date helpers that stay inside the default reservation policy

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test environment with isolated data directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
    /// Path to the campus data directory
    pub data_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    ///
    /// The data directory is not created; campus creates it on first use.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        let data_dir = temp_path.join("campus-data");

        Self {
            temp_dir,
            temp_path,
            data_dir,
        }
    }

    /// Get a bare command builder without pre-configured flags.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("campus").expect("Failed to find campus binary");
        // Keep the caller's environment from leaking into assertions.
        for var in [
            "CAMPUS_DATA_DIR",
            "CAMPUS_OUTPUT_FORMAT",
            "CAMPUS_NOTIFICATIONS_OUTBOX",
            "CAMPUS_DISABLE_AUTOINIT",
            "CAMPUS_LOG_MODE",
        ] {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Get a command builder with the data directory pre-configured.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Run a command that must succeed and return its trimmed stdout.
    ///
    /// # Panics
    /// Panics if the command exits non-zero.
    pub fn run(&self, args: &[&str]) -> String {
        let output = self
            .command()
            .args(args)
            .output()
            .expect("Failed to run campus");

        assert!(
            output.status.success(),
            "campus {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        String::from_utf8(output.stdout)
            .expect("Invalid UTF-8 in output")
            .trim()
            .to_string()
    }

    /// Register a person and return their id.
    pub fn add_person(&self, first: &str, last: &str, role: &str) -> String {
        let email = format!(
            "{}.{}@example.edu",
            first.to_lowercase(),
            last.to_lowercase()
        );
        self.run(&[
            "person",
            "add",
            "--first-name",
            first,
            "--last-name",
            last,
            "--email",
            &email,
            "--role",
            role,
        ])
    }

    /// Register a classroom and return its id.
    pub fn add_classroom(&self, room: &str, kind: &str, capacity: u32) -> String {
        self.run(&[
            "classroom",
            "add",
            "--room",
            room,
            "--type",
            kind,
            "--capacity",
            &capacity.to_string(),
        ])
    }

    /// Create a group taught by `professor` with the given entries and
    /// return its id.
    pub fn create_group(&self, course_code: &str, professor: Option<&str>, entries: &[&str]) -> String {
        let mut args = vec![
            "group",
            "create",
            "--name",
            "Section A",
            "--course-code",
            course_code,
        ];
        if let Some(professor) = professor {
            args.push("--professor");
            args.push(professor);
        }
        for entry in entries {
            args.push("--entry");
            args.push(entry);
        }
        self.run(&args)
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// A reservation date two days out, inside the default notice and
/// advance windows.
#[allow(dead_code)]
pub fn upcoming_date() -> String {
    (chrono::Local::now().date_naive() + chrono::Duration::days(2))
        .format("%Y-%m-%d")
        .to_string()
}
