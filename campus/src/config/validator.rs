//! Configuration validation.

use crate::config::schema::{Config, PolicyConfig};
use crate::error::{Error, Result};
use crate::settings::Settings;

/// Longest lock wait accepted, in seconds.
pub const MAX_LOCK_WAIT_SECONDS: u64 = 300;

/// Validates a merged or single-file configuration.
///
/// # Examples
///
/// ```
/// use campus::config::{Config, ConfigValidator, PolicyConfig};
///
/// ConfigValidator::validate(&Config::default()).unwrap();
///
/// let bad = Config {
///     policy: Some(PolicyConfig { max_hours_per_reservation: Some(0), ..Default::default() }),
///     ..Default::default()
/// };
/// assert!(ConfigValidator::validate(&bad).is_err());
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates every set field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first offending field.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(seconds) = config.maximum_lock_wait_seconds {
            if seconds == 0 || seconds > MAX_LOCK_WAIT_SECONDS {
                return Err(Error::Validation {
                    field: "maximum_lock_wait_seconds".into(),
                    message: format!(
                        "must be between 1 and {MAX_LOCK_WAIT_SECONDS}, got {seconds}"
                    ),
                });
            }
        }
        if let Some(ref policy) = config.policy {
            Self::validate_policy(policy)?;
        }
        Ok(())
    }

    /// Checks the policy as it would apply over the defaults, so field
    /// names in errors carry the `policy.` prefix.
    fn validate_policy(policy: &PolicyConfig) -> Result<()> {
        policy
            .apply_to(Settings::default())
            .validate()
            .map_err(|e| match e {
                Error::Validation { field, message } => Error::Validation {
                    field: format!("policy.{field}"),
                    message,
                },
                other => other,
            })
    }
}
