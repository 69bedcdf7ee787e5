//! Error types for the hwsnap core library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to a hardware source.
#[derive(Error, Debug)]
pub enum Error {
    /// The source was used before `open` or after `close`.
    #[error("Hardware source is not open")]
    NotOpen,

    /// Fixture file could not be read.
    #[error("Failed to read fixture {path}: {source}")]
    FixtureIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Fixture file is not a valid snapshot.
    #[error("Failed to parse fixture {path}: {source}")]
    FixtureParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Invalid report profile name.
    #[error("Invalid report profile: {0}")]
    InvalidProfile(String),
}
