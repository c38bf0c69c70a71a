//! Stderr logging for the library and the CLI.
//!
//! Library code reports through the [`log`] macros. [`init_logger`] picks a
//! [`LogLevel`] from CLI flags or `CAMPUS_LOG_MODE` and installs a
//! [`CampusLogger`] as the global sink.

use std::env;
use std::fmt;
use std::io::Write;

use log::{LevelFilter, Metadata, Record};

/// Environment variable consulted when no CLI flag decides the level.
pub const LOG_MODE_ENV: &str = "CAMPUS_LOG_MODE";

/// Verbosity for diagnostic output.
///
/// - `Quiet`: errors only
/// - `Normal`: errors and warnings
/// - `Verbose`: everything down to debug detail
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Errors only.
    Quiet,
    /// Errors and warnings.
    Normal,
    /// All messages.
    Verbose,
}

impl LogLevel {
    /// Parses a level name, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns a message listing the accepted names.
    ///
    /// # Examples
    ///
    /// ```
    /// use campus::LogLevel;
    ///
    /// assert_eq!(LogLevel::parse("VERBOSE").unwrap(), LogLevel::Verbose);
    /// assert!(LogLevel::parse("loud").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "quiet" => Ok(Self::Quiet),
            "normal" => Ok(Self::Normal),
            "verbose" => Ok(Self::Verbose),
            _ => Err(format!(
                "invalid log level '{s}', expected quiet, normal, or verbose"
            )),
        }
    }

    /// The `log` filter this level lets through.
    #[must_use]
    pub const fn filter(self) -> LevelFilter {
        match self {
            Self::Quiet => LevelFilter::Error,
            Self::Normal => LevelFilter::Warn,
            Self::Verbose => LevelFilter::Debug,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quiet => write!(f, "quiet"),
            Self::Normal => write!(f, "normal"),
            Self::Verbose => write!(f, "verbose"),
        }
    }
}

/// A [`log::Log`] sink that writes `LEVEL: message` lines to stderr.
#[derive(Debug, Clone, Copy)]
pub struct CampusLogger {
    level: LogLevel,
}

impl CampusLogger {
    /// Creates a logger filtering at `level`.
    #[must_use]
    pub const fn new(level: LogLevel) -> Self {
        Self { level }
    }

    /// Returns the configured level.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }
}

impl Default for CampusLogger {
    fn default() -> Self {
        Self::new(LogLevel::Normal)
    }
}

impl log::Log for CampusLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level.filter()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut stderr = std::io::stderr().lock();
        // Nothing sensible to do when stderr is gone.
        let _ = writeln!(stderr, "{}: {}", record.level(), record.args());
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Decides the level: `verbose`, then `quiet`, then `CAMPUS_LOG_MODE`, then
/// [`LogLevel::Normal`]. An unparseable environment value is ignored.
#[must_use]
pub fn resolve_level(verbose: bool, quiet: bool) -> LogLevel {
    if verbose {
        return LogLevel::Verbose;
    }
    if quiet {
        return LogLevel::Quiet;
    }
    env::var(LOG_MODE_ENV)
        .ok()
        .and_then(|value| LogLevel::parse(&value).ok())
        .unwrap_or(LogLevel::Normal)
}

/// Installs the global stderr logger and returns the chosen level.
///
/// Only the first call installs a sink; later calls still adjust the
/// maximum level.
///
/// # Examples
///
/// ```
/// use campus::{init_logger, LogLevel};
///
/// let level = init_logger(true, false);
/// assert_eq!(level, LogLevel::Verbose);
/// log::debug!("visible on stderr");
/// ```
pub fn init_logger(verbose: bool, quiet: bool) -> LogLevel {
    let level = resolve_level(verbose, quiet);
    // Already installed by an earlier call; keep that sink.
    let _ = log::set_boxed_logger(Box::new(CampusLogger::new(level)));
    log::set_max_level(level.filter());
    level
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, Log};
    use serial_test::serial;

    struct EnvGuard(Option<String>);

    impl EnvGuard {
        fn set(value: Option<&str>) -> Self {
            let saved = env::var(LOG_MODE_ENV).ok();
            match value {
                Some(v) => env::set_var(LOG_MODE_ENV, v),
                None => env::remove_var(LOG_MODE_ENV),
            }
            Self(saved)
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.0 {
                Some(v) => env::set_var(LOG_MODE_ENV, v),
                None => env::remove_var(LOG_MODE_ENV),
            }
        }
    }

    fn meta(level: Level) -> Metadata<'static> {
        Metadata::builder().level(level).target("campus").build()
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Quiet < LogLevel::Normal);
        assert!(LogLevel::Normal < LogLevel::Verbose);
    }

    #[test]
    fn test_log_level_display_round_trips_through_parse() {
        for level in [LogLevel::Quiet, LogLevel::Normal, LogLevel::Verbose] {
            assert_eq!(LogLevel::parse(&level.to_string()).unwrap(), level);
        }
        assert_eq!(LogLevel::parse("Quiet").unwrap(), LogLevel::Quiet);
        assert!(LogLevel::parse("").is_err());
    }

    #[test]
    fn test_logger_filters_by_level() {
        let quiet = CampusLogger::new(LogLevel::Quiet);
        assert!(quiet.enabled(&meta(Level::Error)));
        assert!(!quiet.enabled(&meta(Level::Warn)));

        let normal = CampusLogger::default();
        assert!(normal.enabled(&meta(Level::Warn)));
        assert!(!normal.enabled(&meta(Level::Info)));

        let verbose = CampusLogger::new(LogLevel::Verbose);
        assert!(verbose.enabled(&meta(Level::Debug)));
        assert!(!verbose.enabled(&meta(Level::Trace)));
    }

    #[test]
    #[serial]
    fn test_flags_beat_environment() {
        let _guard = EnvGuard::set(Some("quiet"));
        assert_eq!(resolve_level(true, false), LogLevel::Verbose);
        assert_eq!(resolve_level(true, true), LogLevel::Verbose);
        assert_eq!(resolve_level(false, false), LogLevel::Quiet);
    }

    #[test]
    #[serial]
    fn test_environment_fallbacks() {
        let _guard = EnvGuard::set(None);
        assert_eq!(resolve_level(false, false), LogLevel::Normal);
        assert_eq!(resolve_level(false, true), LogLevel::Quiet);

        env::set_var(LOG_MODE_ENV, "verbose");
        assert_eq!(resolve_level(false, false), LogLevel::Verbose);

        env::set_var(LOG_MODE_ENV, "chatty");
        assert_eq!(resolve_level(false, false), LogLevel::Normal);
    }

    #[test]
    #[serial]
    fn test_init_logger_sets_max_level() {
        let _guard = EnvGuard::set(None);
        assert_eq!(init_logger(false, true), LogLevel::Quiet);
        assert_eq!(log::max_level(), LevelFilter::Error);
        assert_eq!(init_logger(true, false), LogLevel::Verbose);
        assert_eq!(log::max_level(), LevelFilter::Debug);
    }
}
