//! # Session Error Types

use std::path::PathBuf;

use geoquest_core::CoreError;
use geoquest_economy::EconomyError;
use thiserror::Error;

/// Errors raised while loading `WorldConfig`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid TOML for this schema.
    #[error("invalid config: {0}")]
    Parse(String),

    /// A value is out of range.
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Offending key.
        field: &'static str,
        /// What is wrong.
        reason: String,
    },

    /// Visibility or squash parameters are out of range.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Errors raised by session operations.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Configuration problem.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A game rule rejected the interaction.
    #[error(transparent)]
    Economy(#[from] EconomyError),

    /// Reference data has not arrived yet.
    #[error("reference data not loaded")]
    ReferenceDataNotLoaded,

    /// Player data has not arrived yet.
    #[error("player data not loaded")]
    PlayerDataNotLoaded,

    /// No spawn location with this id in the current world data.
    #[error("unknown spawn location {0}")]
    UnknownLocation(String),
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
