//! Core error types for focusledger-core.
//!
//! Every failure in the engine is local and recoverable. Persistence errors
//! are absorbed by [`LedgerStore::load`](crate::storage::LedgerStore::load);
//! timer rejections come back as [`TimerError`] with the state untouched.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for focusledger-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Ledger file errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rejected timer operation
    #[error("Timer rejected operation: {0}")]
    Timer(#[from] TimerError),

    /// Invalid ledger edit
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Period navigation refused
    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),
}

/// Ledger file errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading or writing the ledger file failed
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Ledger could not be encoded
    #[error("Failed to encode ledger: {0}")]
    Encode(#[from] serde_json::Error),

    /// No known schema could decode the document
    #[error("No known ledger schema matched {}", .path.display())]
    NoSchemaMatched { path: PathBuf },
}

/// Timer operations refused because their preconditions were not met.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    #[error("timer is already running")]
    AlreadyRunning,

    #[error("timer is not running")]
    NotRunning,

    /// A work session cannot start without a bound category
    #[error("no category bound to the work session")]
    MissingCategory,

    #[error("duration must be greater than zero")]
    InvalidDuration,

    #[error("operation is only allowed in work mode")]
    NotInWorkMode,

    #[error("operation is only allowed during a break")]
    NotOnBreak,

    #[error("category name is empty")]
    EmptyCategory,
}

/// Invalid edits to the ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("daily goal must be greater than zero")]
    InvalidGoal,

    #[error("invalid day key: {0}")]
    InvalidDayKey(String),

    #[error("category name is empty")]
    EmptyCategory,
}

/// Period navigation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// The requested period starts after the one containing now
    #[error("cannot navigate into the future")]
    FuturePeriod,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {}: {message}", .path.display())]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {}: {message}", .path.display())]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
