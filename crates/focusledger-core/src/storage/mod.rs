mod config;
mod ledger_store;
pub mod migrations;

pub use config::{CalendarConfig, Config, LedgerConfig, TimerConfig};
pub use ledger_store::{LedgerStore, LoadSource, LEDGER_FILE_NAME};

use std::path::PathBuf;

use crate::error::StorageError;

/// Overrides the data directory entirely when set.
pub const DATA_DIR_ENV: &str = "FOCUSLEDGER_DATA_DIR";

/// Returns the data directory, creating it if needed.
///
/// `FOCUSLEDGER_DATA_DIR` wins when set. Otherwise this is
/// `~/.config/focusledger/`, or `~/.config/focusledger-dev/` when
/// `FOCUSLEDGER_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os(DATA_DIR_ENV) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("FOCUSLEDGER_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("focusledger-dev")
            } else {
                base_dir.join("focusledger")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
