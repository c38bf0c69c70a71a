//! `CAMPUS_*` environment variable overrides.

use std::env;

use crate::config::schema::{Config, NotificationsConfig, OutputFormat};
use crate::error::{Error, Result};

/// Applies environment variable overrides on top of file configuration.
///
/// | Variable | Field |
/// |---|---|
/// | `CAMPUS_MAXIMUM_LOCK_WAIT_SECONDS` | `maximum_lock_wait_seconds` |
/// | `CAMPUS_DISABLE_AUTOINIT` | `disable_autoinit` |
/// | `CAMPUS_OUTPUT_FORMAT` | `output_format` |
/// | `CAMPUS_NOTIFICATIONS_OUTBOX` | `notifications.outbox` |
/// | `CAMPUS_POLICY_<FIELD>` | `policy.<field>` |
///
/// # Examples
///
/// ```no_run
/// use campus::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Applies every `CAMPUS_*` variable that is set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the variable when a value does
    /// not parse.
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Some(seconds) = Self::number("CAMPUS_MAXIMUM_LOCK_WAIT_SECONDS")? {
            config.maximum_lock_wait_seconds = Some(u64::from(seconds));
        }
        if let Some(flag) = Self::flag("CAMPUS_DISABLE_AUTOINIT")? {
            config.disable_autoinit = Some(flag);
        }
        if let Ok(format) = env::var("CAMPUS_OUTPUT_FORMAT") {
            config.output_format =
                Some(format.parse::<OutputFormat>().map_err(|message| Error::Validation {
                    field: "CAMPUS_OUTPUT_FORMAT".into(),
                    message,
                })?);
        }
        if let Some(flag) = Self::flag("CAMPUS_NOTIFICATIONS_OUTBOX")? {
            config
                .notifications
                .get_or_insert_with(NotificationsConfig::default)
                .outbox = Some(flag);
        }
        Self::apply_policy_overrides(config)
    }

    fn apply_policy_overrides(config: &mut Config) -> Result<()> {
        let mut policy = config.policy.clone().unwrap_or_default();
        let before = policy.clone();

        if let Some(v) = Self::number("CAMPUS_POLICY_MAX_DAYS_IN_ADVANCE")? {
            policy.max_days_in_advance = Some(v);
        }
        if let Some(v) = Self::number("CAMPUS_POLICY_MIN_TIME_BEFORE_RESERVATION")? {
            policy.min_time_before_reservation = Some(v);
        }
        if let Some(v) = Self::number("CAMPUS_POLICY_MAX_HOURS_PER_RESERVATION")? {
            policy.max_hours_per_reservation = Some(v);
        }
        if let Some(v) = Self::number("CAMPUS_POLICY_MAX_RESERVATIONS_PER_WEEK")? {
            policy.max_reservations_per_week = Some(v);
        }
        if let Some(v) = Self::flag("CAMPUS_POLICY_STUDENT_REQUIRE_APPROVAL")? {
            policy.student_require_approval = Some(v);
        }
        if let Some(v) = Self::flag("CAMPUS_POLICY_PROFESSOR_REQUIRE_APPROVAL")? {
            policy.professor_require_approval = Some(v);
        }
        if let Some(v) = Self::flag("CAMPUS_POLICY_EMAIL_NOTIFICATIONS")? {
            policy.email_notifications = Some(v);
        }
        if let Some(v) = Self::flag("CAMPUS_POLICY_RESERVATION_CREATED")? {
            policy.reservation_created = Some(v);
        }

        if policy != before {
            config.policy = Some(policy);
        }
        Ok(())
    }

    fn number(var: &str) -> Result<Option<u32>> {
        env::var(var).ok().map_or(Ok(None), |value| {
            value.trim().parse().map(Some).map_err(|_| Error::Validation {
                field: var.into(),
                message: format!("must be a non-negative integer, got '{value}'"),
            })
        })
    }

    fn flag(var: &str) -> Result<Option<bool>> {
        env::var(var)
            .ok()
            .map_or(Ok(None), |value| Self::parse_bool(var, &value).map(Some))
    }

    /// Accepts true/1/yes/on and false/0/no/off, case-insensitively.
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }
}
