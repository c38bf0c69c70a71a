//! CLI-specific error types with exit codes.
//!
//! Library errors are wrapped and mapped onto a small set of stable exit
//! codes so scripts can tell a scheduling conflict from a typo.

use campus::Error as LibError;
use std::fmt;

/// CLI-specific error type with exit code mapping.
#[derive(Debug)]
pub enum CliError {
    /// Library error (wrapped).
    Library(LibError),

    /// Invalid command-line arguments.
    InvalidArguments(String),

    /// I/O error.
    Io(std::io::Error),

    /// Timeout waiting for database lock.
    Timeout,

    /// Data directory not found (and auto-init disabled).
    NoDataDirectory,

    /// Configuration error.
    Config(String),

    /// Semantic failure (e.g., conflicts found) - exit code 1.
    SemanticFailure(String),
}

impl CliError {
    /// Get the appropriate exit code for this error.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: Semantic failure (conflict, wrong role, not allowed, not found)
    /// - 2: Invalid arguments, malformed input, or a policy/config violation
    /// - 3: Timeout waiting for database lock
    /// - 4: No data directory found
    /// - 5: Any other error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::SemanticFailure(_) => 1,
            CliError::Library(lib_err) => match lib_err {
                LibError::SlotUnavailable { .. }
                | LibError::RoleMismatch { .. }
                | LibError::Unauthorized { .. }
                | LibError::InvalidTransition { .. }
                | LibError::NotFound { .. } => 1,
                LibError::InvalidFormat { .. }
                | LibError::InvalidTimeRange { .. }
                | LibError::Validation { .. }
                | LibError::Configuration(_) => 2,
                LibError::LockTimeout { .. } => 3,
                LibError::DataDirectoryNotFound { .. } => 4,
                _ => 5,
            },
            CliError::InvalidArguments(_) | CliError::Config(_) => 2,
            CliError::Timeout => 3,
            CliError::NoDataDirectory => 4,
            CliError::Io(_) => 5,
        }
    }

    /// The conflict details to print below the error line, if any: every
    /// conflicting window, then alternatives for each weekly slot.
    pub fn details(&self) -> Option<String> {
        let CliError::Library(e) = self else {
            return None;
        };
        let report = e.conflict_report()?;
        let mut text = campus::report::format_conflicts(report);
        for window in report.windows() {
            let Some(slot) = &window.interval else {
                continue;
            };
            let labels: Vec<String> = campus::report::suggest_alternatives(slot)
                .into_iter()
                .map(|a| a.label)
                .collect();
            if !labels.is_empty() {
                text.push_str(&format!(
                    "Try instead of {}: {}\n",
                    window.label,
                    labels.join(", ")
                ));
            }
        }
        Some(text)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Library(e) => write!(f, "{e}"),
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
            CliError::Timeout => write!(f, "Timeout waiting for database lock"),
            CliError::NoDataDirectory => {
                write!(
                    f,
                    "Data directory not found (run `campus init` or drop --disable-autoinit)"
                )
            }
            CliError::Config(msg) => write!(f, "Configuration error: {msg}"),
            CliError::SemanticFailure(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Library(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for CliError {
    fn from(e: LibError) -> Self {
        match e {
            LibError::LockTimeout { .. } => CliError::Timeout,
            LibError::DataDirectoryNotFound { .. } => CliError::NoDataDirectory,
            LibError::Io(io) => CliError::Io(io),
            other => CliError::Library(other),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}
