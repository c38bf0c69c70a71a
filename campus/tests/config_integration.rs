//! Configuration layering: user file, project file, environment, overrides.

use std::env;
use std::fs;

use campus::config::loader::PROJECT_CONFIG_FILE;
use campus::config::OutputFormat;
use campus::{Config, ConfigBuilder, Error};
use serial_test::serial;
use tempfile::TempDir;

struct EnvGuard(&'static [&'static str]);

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for var in self.0 {
            env::remove_var(var);
        }
    }
}

fn dirs() -> (TempDir, TempDir) {
    (TempDir::new().unwrap(), TempDir::new().unwrap())
}

#[test]
#[serial]
fn test_project_file_beats_user_file_and_env_beats_both() {
    let _guard = EnvGuard(&["CAMPUS_POLICY_MAX_RESERVATIONS_PER_WEEK"]);
    let (data, project) = dirs();
    fs::write(
        data.path().join("config.yaml"),
        "output_format: csv\npolicy:\n  max_reservations_per_week: 3\n  max_days_in_advance: 14\n",
    )
    .unwrap();
    fs::write(
        project.path().join(PROJECT_CONFIG_FILE),
        "policy:\n  max_days_in_advance: 7\n",
    )
    .unwrap();
    env::set_var("CAMPUS_POLICY_MAX_RESERVATIONS_PER_WEEK", "9");

    let config = ConfigBuilder::new()
        .with_working_dir(project.path())
        .with_data_dir(data.path())
        .build()
        .unwrap();

    assert_eq!(config.output_format, Some(OutputFormat::Csv));
    let settings = config.settings();
    assert_eq!(settings.max_days_in_advance, 7);
    assert_eq!(settings.max_reservations_per_week, 9);
    assert_eq!(settings.max_hours_per_reservation, 4);
}

#[test]
#[serial]
fn test_outbox_switch_from_environment() {
    let _guard = EnvGuard(&["CAMPUS_NOTIFICATIONS_OUTBOX"]);
    let (data, project) = dirs();

    let build = || {
        ConfigBuilder::new()
            .with_working_dir(project.path())
            .with_data_dir(data.path())
            .build()
            .unwrap()
    };
    assert!(!build().uses_outbox());

    env::set_var("CAMPUS_NOTIFICATIONS_OUTBOX", "yes");
    assert!(build().uses_outbox());
}

#[test]
#[serial]
fn test_malformed_environment_value_is_rejected() {
    let _guard = EnvGuard(&["CAMPUS_POLICY_STUDENT_REQUIRE_APPROVAL"]);
    env::set_var("CAMPUS_POLICY_STUDENT_REQUIRE_APPROVAL", "sometimes");

    let err = ConfigBuilder::new().skip_files().build().unwrap_err();
    assert!(
        matches!(&err, Error::Validation { field, .. } if field == "CAMPUS_POLICY_STUDENT_REQUIRE_APPROVAL"),
        "unexpected error: {err}"
    );
}

#[test]
#[serial]
fn test_out_of_range_policy_is_rejected() {
    let (data, project) = dirs();
    fs::write(
        data.path().join("config.yaml"),
        "policy:\n  max_days_in_advance: 1000\n",
    )
    .unwrap();

    let err = ConfigBuilder::new()
        .with_working_dir(project.path())
        .with_data_dir(data.path())
        .skip_env()
        .build()
        .unwrap_err();
    assert!(
        matches!(&err, Error::Validation { field, .. } if field == "policy.max_days_in_advance"),
        "unexpected error: {err}"
    );
}

#[test]
#[serial]
fn test_explicit_overrides_apply_last() {
    let (data, project) = dirs();
    fs::write(
        data.path().join("config.yaml"),
        "maximum_lock_wait_seconds: 30\n",
    )
    .unwrap();

    let config = ConfigBuilder::new()
        .with_working_dir(project.path())
        .with_data_dir(data.path())
        .skip_env()
        .with_config(Config {
            maximum_lock_wait_seconds: Some(2),
            ..Config::default()
        })
        .build()
        .unwrap();
    assert_eq!(config.lock_wait_seconds(), 2);
}
