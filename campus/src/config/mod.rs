//! Layered configuration.
//!
//! Sources, lowest to highest precedence:
//!
//! 1. Built-in defaults
//! 2. User config (`~/.campus/config.yaml`, or `config.yaml` in the data
//!    directory)
//! 3. Project config (`campus.yaml`, found walking up from the working
//!    directory)
//! 4. Private project config (`campus.local.yaml`)
//! 5. Environment variables (`CAMPUS_*`)
//! 6. Programmatic overrides (via [`ConfigBuilder::with_config`])
//!
//! The `policy` section becomes the [`crate::Settings`] snapshot handed to
//! reservation operations.
//!
//! # Examples
//!
//! ```no_run
//! use campus::config::ConfigBuilder;
//!
//! let config = ConfigBuilder::new().build().unwrap();
//! println!("students need approval: {}", config.settings().student_require_approval);
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::{ConfigLoader, ConfigSource};
pub use merger::ConfigMerger;
pub use schema::{Config, NotificationsConfig, OutputFormat, PolicyConfig};
pub use validator::ConfigValidator;
