//! Institution reservation policy and its publish/subscribe hub.
//!
//! [`Settings`] is an immutable snapshot. Operations receive a reference
//! to one at construction time. [`SettingsHub`] owns the current snapshot
//! and pushes every validated replacement to its subscribers.
//!
//! The `campus` binary runs one operation per process and reads its
//! snapshot straight from [`Config::settings`](crate::Config::settings).
//! The hub is for long-running hosts that embed the library and change
//! policy while plans are being built.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::person::Role;

/// Reservation policy read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How far ahead a reservation may be made, in days.
    pub max_days_in_advance: u32,
    /// Minimum lead time before a reservation starts, in hours.
    pub min_time_before_reservation: u32,
    /// Longest allowed reservation, in hours.
    pub max_hours_per_reservation: u32,
    /// Active reservations one person may hold in an ISO week.
    pub max_reservations_per_week: u32,
    /// Student requests wait for an administrator.
    pub student_require_approval: bool,
    /// Professor requests wait for an administrator.
    pub professor_require_approval: bool,
    /// Master switch for email-style notifications.
    pub email_notifications: bool,
    /// Send an email-style notification when a request is created.
    pub reservation_created: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_days_in_advance: 30,
            min_time_before_reservation: 1,
            max_hours_per_reservation: 4,
            max_reservations_per_week: 5,
            student_require_approval: true,
            professor_require_approval: false,
            email_notifications: true,
            reservation_created: true,
        }
    }
}

impl Settings {
    /// Whether a request made by `role` starts out PENDING.
    ///
    /// # Examples
    ///
    /// ```
    /// use campus::{Role, Settings};
    ///
    /// let settings = Settings::default();
    /// assert!(settings.requires_approval(Role::Student));
    /// assert!(!settings.requires_approval(Role::Professor));
    /// assert!(!settings.requires_approval(Role::Admin));
    /// ```
    #[must_use]
    pub const fn requires_approval(&self, role: Role) -> bool {
        match role {
            Role::Admin => false,
            Role::Professor => self.professor_require_approval,
            Role::Student => self.student_require_approval,
        }
    }

    /// Whether new requests should also go out by email.
    #[must_use]
    pub const fn emails_on_create(&self) -> bool {
        self.email_notifications && self.reservation_created
    }

    /// Checks that every limit is usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        let check = |field: &str, value: u32, max: u32| {
            if value == 0 || value > max {
                Err(Error::Validation {
                    field: field.to_string(),
                    message: format!("must be between 1 and {max}, got {value}"),
                })
            } else {
                Ok(())
            }
        };
        check("max_days_in_advance", self.max_days_in_advance, 365)?;
        check("max_hours_per_reservation", self.max_hours_per_reservation, 24)?;
        check("max_reservations_per_week", self.max_reservations_per_week, 100)?;
        if self.min_time_before_reservation > 24 * 7 {
            return Err(Error::Validation {
                field: "min_time_before_reservation".to_string(),
                message: format!(
                    "must be at most {} hours, got {}",
                    24 * 7,
                    self.min_time_before_reservation
                ),
            });
        }
        Ok(())
    }
}

/// Process-wide owner of the current [`Settings`] snapshot.
///
/// # Examples
///
/// ```
/// use campus::{Settings, SettingsHub};
///
/// let hub = SettingsHub::new(Settings::default()).unwrap();
/// let updates = hub.subscribe();
///
/// let stricter = Settings { professor_require_approval: true, ..Settings::default() };
/// hub.publish(stricter).unwrap();
///
/// assert!(updates.try_recv().unwrap().professor_require_approval);
/// assert!(hub.current().professor_require_approval);
/// ```
#[derive(Debug)]
pub struct SettingsHub {
    current: RwLock<Arc<Settings>>,
    subscribers: Mutex<Vec<Sender<Arc<Settings>>>>,
}

impl SettingsHub {
    /// Creates a hub seeded with `initial`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `initial` is invalid.
    pub fn new(initial: Settings) -> Result<Self> {
        initial.validate()?;
        Ok(Self {
            current: RwLock::new(Arc::new(initial)),
            subscribers: Mutex::new(Vec::new()),
        })
    }

    /// The current snapshot.
    #[must_use]
    pub fn current(&self) -> Arc<Settings> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Registers for future updates. Drop the receiver to unsubscribe.
    #[must_use]
    pub fn subscribe(&self) -> Receiver<Arc<Settings>> {
        let (tx, rx) = mpsc::channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    /// Validates and installs `settings`, then notifies subscribers.
    ///
    /// Returns the number of live subscribers reached.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] and leaves the current snapshot in
    /// place if `settings` is invalid.
    pub fn publish(&self, settings: Settings) -> Result<usize> {
        settings.validate()?;
        let snapshot = Arc::new(settings);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&snapshot);

        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| tx.send(Arc::clone(&snapshot)).is_ok());
        log::debug!("published settings to {} subscriber(s)", subscribers.len());
        Ok(subscribers.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.max_days_in_advance, 30);
        assert_eq!(s.min_time_before_reservation, 1);
        assert_eq!(s.max_hours_per_reservation, 4);
        assert_eq!(s.max_reservations_per_week, 5);
        assert!(s.student_require_approval);
        assert!(!s.professor_require_approval);
        assert!(s.emails_on_create());
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let s = Settings {
            max_hours_per_reservation: 0,
            ..Settings::default()
        };
        let err = s.validate().unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "max_hours_per_reservation"));
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let s: Settings = serde_yaml::from_str("professor_require_approval: true\n").unwrap();
        assert!(s.professor_require_approval);
        assert_eq!(s.max_days_in_advance, 30);
    }

    #[test]
    fn test_publish_reaches_live_subscribers_only() {
        let hub = SettingsHub::new(Settings::default()).unwrap();
        let live = hub.subscribe();
        let dropped = hub.subscribe();
        drop(dropped);

        let reached = hub
            .publish(Settings {
                max_days_in_advance: 60,
                ..Settings::default()
            })
            .unwrap();
        assert_eq!(reached, 1);
        assert_eq!(live.try_recv().unwrap().max_days_in_advance, 60);
    }

    #[test]
    fn test_invalid_publish_keeps_snapshot() {
        let hub = SettingsHub::new(Settings::default()).unwrap();
        let updates = hub.subscribe();
        let result = hub.publish(Settings {
            max_reservations_per_week: 0,
            ..Settings::default()
        });
        assert!(result.is_err());
        assert_eq!(hub.current().max_reservations_per_week, 5);
        assert!(updates.try_recv().is_err());
    }

    #[test]
    fn test_subscriber_on_other_thread() {
        let hub = Arc::new(SettingsHub::new(Settings::default()).unwrap());
        let updates = hub.subscribe();
        let handle = std::thread::spawn(move || updates.recv().unwrap().student_require_approval);
        hub.publish(Settings {
            student_require_approval: false,
            ..Settings::default()
        })
        .unwrap();
        assert!(!handle.join().unwrap());
    }
}
