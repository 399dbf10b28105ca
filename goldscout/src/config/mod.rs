//! Configuration file support.
//!
//! Settings live in an INI file at `<config_dir>/goldscout/config.ini`:
//!
//! ```ini
//! [grid]
//! height = 3500
//! width = 3500
//! treasures = 490000
//! seed =
//!
//! [search]
//! budget = 600000000
//! plan = 50x20,5x1,1x1
//!
//! [cost]
//! base = 1000
//! step = 500
//! first_bracket = 8
//!
//! [logging]
//! level = info
//! file =
//! ```
//!
//! A missing file yields the defaults, and so does any missing key. Empty
//! `seed` and `file` values mean "not set". Command-line flags override
//! whatever the file says.

mod file;
mod keys;

pub use file::{
    config_file_path, ConfigFile, CostSettings, GridSettings, LoggingSettings, SearchSettings,
    DEFAULT_BUDGET, DEFAULT_LOG_LEVEL,
};
pub use keys::ConfigKey;

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading, writing, or editing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid INI.
    #[error("cannot parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A key holds a value of the wrong shape.
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// No key by that name.
    #[error("unknown configuration key '{0}'")]
    UnknownKey(String),
}
