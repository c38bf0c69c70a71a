//! People who take part in scheduling and their roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Database identity of a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub i64);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The closed set of roles a person can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Institution administrator; reviews pending reservations.
    Admin,
    /// Teaches class groups and owns a personal timetable.
    Professor,
    /// Enrolled in class groups.
    Student,
}

impl Role {
    /// Storage and display form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Professor => "PROFESSOR",
            Self::Student => "STUDENT",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Self::Admin),
            "PROFESSOR" => Ok(Self::Professor),
            "STUDENT" => Ok(Self::Student),
            _ => Err(Error::InvalidFormat {
                kind: "role",
                value: s.to_string(),
                expected: "ADMIN, PROFESSOR or STUDENT",
            }),
        }
    }
}

/// The timetable-relevant projection of a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Identity.
    pub id: PersonId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact address used by notification collaborators.
    pub email: String,
    /// Role held at the institution.
    pub role: Role,
}

impl Person {
    /// `First Last`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Verifies the person holds `expected`.
    ///
    /// This is the single place roles are checked when a person is
    /// attached to a class group or acts on a reservation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RoleMismatch`] otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use campus::{Person, PersonId, Role};
    ///
    /// let p = Person {
    ///     id: PersonId(1),
    ///     first_name: "Ada".into(),
    ///     last_name: "Lovelace".into(),
    ///     email: "ada@example.edu".into(),
    ///     role: Role::Professor,
    /// };
    /// assert!(p.require_role(Role::Professor).is_ok());
    /// assert!(p.require_role(Role::Student).is_err());
    /// ```
    pub fn require_role(&self, expected: Role) -> Result<()> {
        if self.role == expected {
            Ok(())
        } else {
            Err(Error::RoleMismatch {
                person: self.id.0,
                expected,
                actual: self.role,
            })
        }
    }
}

/// Input for registering a person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact address.
    pub email: String,
    /// Role.
    pub role: Role,
}
