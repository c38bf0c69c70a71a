//! Configuration schema definitions.
//!
//! Every field is optional so that a file only needs to name what it
//! changes. Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Default seconds to wait for the database write lock.
pub const DEFAULT_LOCK_WAIT_SECONDS: u64 = 5;

/// Complete configuration structure.
///
/// # Examples
///
/// ```
/// use campus::config::Config;
///
/// let config: Config = serde_yaml::from_str(
///     "policy:\n  max_reservations_per_week: 3\n",
/// )
/// .unwrap();
/// assert_eq!(config.settings().max_reservations_per_week, 3);
/// assert_eq!(config.settings().max_days_in_advance, 30);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Maximum time to wait for the database write lock (seconds).
    pub maximum_lock_wait_seconds: Option<u64>,

    /// Refuse to create the data directory on first use.
    pub disable_autoinit: Option<bool>,

    /// Default output format for listings.
    pub output_format: Option<OutputFormat>,

    /// Reservation policy overrides.
    pub policy: Option<PolicyConfig>,

    /// Admin notification delivery.
    pub notifications: Option<NotificationsConfig>,
}

impl Config {
    /// The reservation policy: defaults overlaid with [`Config::policy`].
    #[must_use]
    pub fn settings(&self) -> Settings {
        self.policy
            .as_ref()
            .map_or_else(Settings::default, |p| p.apply_to(Settings::default()))
    }

    /// Lock wait in seconds, falling back to the default.
    #[must_use]
    pub fn lock_wait_seconds(&self) -> u64 {
        self.maximum_lock_wait_seconds
            .unwrap_or(DEFAULT_LOCK_WAIT_SECONDS)
    }

    /// Whether admin notifications go to the database outbox.
    #[must_use]
    pub fn uses_outbox(&self) -> bool {
        self.notifications
            .as_ref()
            .and_then(|n| n.outbox)
            .unwrap_or(false)
    }
}

/// Partial reservation policy. Unset fields keep their defaults.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    /// Days ahead a reservation may be made.
    pub max_days_in_advance: Option<u32>,
    /// Minimum lead time, in hours.
    pub min_time_before_reservation: Option<u32>,
    /// Longest reservation, in hours.
    pub max_hours_per_reservation: Option<u32>,
    /// Active reservations per person per ISO week.
    pub max_reservations_per_week: Option<u32>,
    /// Student requests need approval.
    pub student_require_approval: Option<bool>,
    /// Professor requests need approval.
    pub professor_require_approval: Option<bool>,
    /// Master switch for email-style notifications.
    pub email_notifications: Option<bool>,
    /// Email on request creation.
    pub reservation_created: Option<bool>,
}

impl PolicyConfig {
    /// Overlays the set fields onto `settings`.
    #[must_use]
    pub fn apply_to(&self, mut settings: Settings) -> Settings {
        if let Some(v) = self.max_days_in_advance {
            settings.max_days_in_advance = v;
        }
        if let Some(v) = self.min_time_before_reservation {
            settings.min_time_before_reservation = v;
        }
        if let Some(v) = self.max_hours_per_reservation {
            settings.max_hours_per_reservation = v;
        }
        if let Some(v) = self.max_reservations_per_week {
            settings.max_reservations_per_week = v;
        }
        if let Some(v) = self.student_require_approval {
            settings.student_require_approval = v;
        }
        if let Some(v) = self.professor_require_approval {
            settings.professor_require_approval = v;
        }
        if let Some(v) = self.email_notifications {
            settings.email_notifications = v;
        }
        if let Some(v) = self.reservation_created {
            settings.reservation_created = v;
        }
        settings
    }
}

/// Notification delivery settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct NotificationsConfig {
    /// Store notifications in the `notifications` table.
    pub outbox: Option<bool>,
}

/// Output format for listings.
///
/// # Examples
///
/// ```
/// use campus::config::OutputFormat;
///
/// let format = OutputFormat::Json;
/// assert_eq!(format.to_string(), "json");
/// ```
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output format.
    Json,
    /// CSV output format.
    Csv,
    /// TSV output format.
    Tsv,
    /// Human-readable table format.
    Table,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
            Self::Tsv => write!(f, "tsv"),
            Self::Table => write!(f, "table"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            "table" => Ok(Self::Table),
            other => Err(format!("unknown output format '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::default();
        assert_eq!(config.settings(), Settings::default());
        assert_eq!(config.lock_wait_seconds(), DEFAULT_LOCK_WAIT_SECONDS);
        assert!(!config.uses_outbox());
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r"
maximum_lock_wait_seconds: 10
disable_autoinit: true
output_format: csv
policy:
  max_days_in_advance: 14
  student_require_approval: false
notifications:
  outbox: true
";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.lock_wait_seconds(), 10);
        assert_eq!(config.disable_autoinit, Some(true));
        assert_eq!(config.output_format, Some(OutputFormat::Csv));
        let settings = config.settings();
        assert_eq!(settings.max_days_in_advance, 14);
        assert!(!settings.student_require_approval);
        assert_eq!(settings.max_hours_per_reservation, 4);
        assert!(config.uses_outbox());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(serde_yaml::from_str::<Config>("room_capacity: 5\n").is_err());
        assert!(serde_yaml::from_str::<Config>("policy:\n  max_days: 5\n").is_err());
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("TSV".parse::<OutputFormat>().unwrap(), OutputFormat::Tsv);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
