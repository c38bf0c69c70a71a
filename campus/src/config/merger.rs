//! Configuration merging and precedence handling.

use crate::config::loader::ConfigSource;
use crate::config::schema::{Config, NotificationsConfig, PolicyConfig};

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use campus::config::{Config, ConfigMerger};
///
/// let low = Config { maximum_lock_wait_seconds: Some(1), ..Default::default() };
/// let high = Config { maximum_lock_wait_seconds: Some(9), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.maximum_lock_wait_seconds, Some(9));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merges sources given lowest precedence first.
    #[must_use]
    pub fn merge(sources: Vec<ConfigSource>) -> Config {
        let mut result = Config::default();
        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }
        result
    }

    /// Merges `source` over `target`.
    ///
    /// Scalars are replaced when set in `source`. `policy` and
    /// `notifications` merge field by field, so a project file can change
    /// one limit without restating the others.
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.maximum_lock_wait_seconds.is_some() {
            target.maximum_lock_wait_seconds = source.maximum_lock_wait_seconds;
        }
        if source.disable_autoinit.is_some() {
            target.disable_autoinit = source.disable_autoinit;
        }
        if source.output_format.is_some() {
            target.output_format = source.output_format;
        }

        if let Some(ref source_policy) = source.policy {
            target.policy = Some(match &target.policy {
                Some(target_policy) => Self::merge_policy(target_policy, source_policy),
                None => source_policy.clone(),
            });
        }

        if let Some(ref source_notifications) = source.notifications {
            target.notifications = Some(match &target.notifications {
                Some(t) => NotificationsConfig {
                    outbox: source_notifications.outbox.or(t.outbox),
                },
                None => source_notifications.clone(),
            });
        }
    }

    fn merge_policy(target: &PolicyConfig, source: &PolicyConfig) -> PolicyConfig {
        PolicyConfig {
            max_days_in_advance: source.max_days_in_advance.or(target.max_days_in_advance),
            min_time_before_reservation: source
                .min_time_before_reservation
                .or(target.min_time_before_reservation),
            max_hours_per_reservation: source
                .max_hours_per_reservation
                .or(target.max_hours_per_reservation),
            max_reservations_per_week: source
                .max_reservations_per_week
                .or(target.max_reservations_per_week),
            student_require_approval: source
                .student_require_approval
                .or(target.student_require_approval),
            professor_require_approval: source
                .professor_require_approval
                .or(target.professor_require_approval),
            email_notifications: source.email_notifications.or(target.email_notifications),
            reservation_created: source.reservation_created.or(target.reservation_created),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use std::path::PathBuf;

    fn source(precedence: u8, config: Config) -> ConfigSource {
        ConfigSource {
            path: PathBuf::from(format!("/config/{precedence}.yaml")),
            precedence,
            config,
        }
    }

    #[test]
    fn test_merge_empty() {
        assert_eq!(ConfigMerger::merge(Vec::new()), Config::default());
    }

    #[test]
    fn test_policy_merges_field_by_field() {
        let user = Config {
            policy: Some(PolicyConfig {
                max_days_in_advance: Some(10),
                max_hours_per_reservation: Some(2),
                ..PolicyConfig::default()
            }),
            ..Config::default()
        };
        let project = Config {
            policy: Some(PolicyConfig {
                max_days_in_advance: Some(60),
                ..PolicyConfig::default()
            }),
            ..Config::default()
        };

        let merged = ConfigMerger::merge(vec![source(1, user), source(2, project)]);
        let settings = merged.settings();
        assert_eq!(settings.max_days_in_advance, 60);
        assert_eq!(settings.max_hours_per_reservation, 2);
    }

    #[test]
    fn test_unset_fields_do_not_clear() {
        let mut target = Config {
            disable_autoinit: Some(true),
            output_format: Some(OutputFormat::Json),
            notifications: Some(NotificationsConfig { outbox: Some(true) }),
            ..Config::default()
        };
        ConfigMerger::merge_into(
            &mut target,
            &Config {
                notifications: Some(NotificationsConfig::default()),
                ..Config::default()
            },
        );
        assert_eq!(target.disable_autoinit, Some(true));
        assert_eq!(target.output_format, Some(OutputFormat::Json));
        assert!(target.uses_outbox());
    }
}
