//! Path management for roomsplit
//!
//! Provides XDG-compliant path resolution for configuration and data.
//!
//! ## Path Resolution Order
//!
//! 1. `ROOMSPLIT_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/roomsplit` or `~/.config/roomsplit`
//! 3. Windows: `%APPDATA%\roomsplit`

use std::path::PathBuf;

use crate::error::SplitError;

/// Manages all paths used by roomsplit
#[derive(Debug, Clone)]
pub struct RoomsplitPaths {
    /// Base directory for all roomsplit data
    base_dir: PathBuf,
}

impl RoomsplitPaths {
    /// Create a new RoomsplitPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, SplitError> {
        let base_dir = if let Ok(custom) = std::env::var("ROOMSPLIT_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create RoomsplitPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/roomsplit/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/roomsplit/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to people.json
    pub fn people_file(&self) -> PathBuf {
        self.data_dir().join("people.json")
    }

    /// Get the path to expenses.json
    pub fn expenses_file(&self) -> PathBuf {
        self.data_dir().join("expenses.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), SplitError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| SplitError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| SplitError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if roomsplit has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, SplitError> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg).join("roomsplit"));
    }

    let base = directories::BaseDirs::new()
        .ok_or_else(|| SplitError::Config("Could not determine home directory".into()))?;
    Ok(base.home_dir().join(".config").join("roomsplit"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, SplitError> {
    let base = directories::BaseDirs::new()
        .ok_or_else(|| SplitError::Config("Could not determine APPDATA directory".into()))?;
    Ok(base.config_dir().join("roomsplit"))
}
