//! Database configuration and connection parameters.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Configuration for database connections.
///
/// # Examples
///
/// ```
/// use moorage::database::DatabaseConfig;
/// use std::time::Duration;
///
/// let config = DatabaseConfig::new("/tmp/moorage.db")
///     .with_busy_timeout(Duration::from_millis(10000));
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to the database file.
    pub path: PathBuf,
    /// Busy timeout for database lock contention.
    pub busy_timeout: Duration,
    /// Whether to automatically create the database if it doesn't exist.
    pub auto_create: bool,
    /// Whether to open the database in read-only mode.
    pub read_only: bool,
}

impl DatabaseConfig {
    /// Creates a new database configuration with default settings.
    ///
    /// Default settings:
    /// - `busy_timeout`: 5000ms
    /// - `auto_create`: true
    /// - `read_only`: false
    ///
    /// # Examples
    ///
    /// ```
    /// use moorage::database::DatabaseConfig;
    ///
    /// let config = DatabaseConfig::new("/tmp/moorage.db");
    /// assert!(config.auto_create);
    /// ```
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            busy_timeout: Duration::from_millis(5000),
            auto_create: true,
            read_only: false,
        }
    }

    /// Sets the busy timeout duration.
    ///
    /// Determines how long a connection waits on a locked database
    /// before returning an error.
    #[must_use]
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Configures the database to be opened in read-only mode.
    ///
    /// When read-only is enabled, `auto_create` is automatically
    /// disabled.
    ///
    /// # Examples
    ///
    /// ```
    /// use moorage::database::DatabaseConfig;
    ///
    /// let config = DatabaseConfig::new("/tmp/moorage.db").read_only();
    /// assert!(config.read_only);
    /// assert!(!config.auto_create);
    /// ```
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self.auto_create = false;
        self
    }
}

/// Returns the default data directory, `~/.moorage`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
///
/// # Examples
///
/// ```no_run
/// use moorage::database::default_data_dir;
///
/// let data_dir = default_data_dir().unwrap();
/// ```
pub fn default_data_dir() -> Result<PathBuf> {
    home::home_dir()
        .map(|home| home.join(".moorage"))
        .ok_or_else(|| Error::Validation {
            field: "home_directory".into(),
            message: "cannot determine home directory".into(),
        })
}

/// Resolves the database path using environment variables or defaults.
///
/// Resolution order:
/// 1. `$MOORAGE_DATA_DIR/moorage.db` if `MOORAGE_DATA_DIR` is set
/// 2. `~/.moorage/moorage.db` otherwise
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined and
/// `MOORAGE_DATA_DIR` is not set.
pub fn resolve_database_path() -> Result<PathBuf> {
    if let Ok(data_dir) = std::env::var("MOORAGE_DATA_DIR") {
        Ok(PathBuf::from(data_dir).join("moorage.db"))
    } else {
        Ok(default_data_dir()?.join("moorage.db"))
    }
}
