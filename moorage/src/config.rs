//! Configuration loading for the moorage library.
//!
//! Configuration is merged from three sources, lowest precedence first:
//! built-in defaults, an optional YAML config file, and `MOORAGE_*`
//! environment variables. Callers may override any field on the builder
//! afterwards.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::auth::TokenService;
use crate::error::{Error, Result};

/// Resolved library configuration.
///
/// # Examples
///
/// ```
/// use moorage::{Config, ConfigBuilder};
///
/// let config = ConfigBuilder::new()
///     .with_token_secret(Some("dev-secret".to_string()))
///     .build()
///     .unwrap();
/// assert_eq!(config.token_secret.as_deref(), Some("dev-secret"));
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Data directory holding the database (default `~/.moorage`).
    pub data_dir: Option<PathBuf>,
    /// Busy timeout for database lock contention.
    pub busy_timeout: Duration,
    /// Shared secret for signing bearer tokens.
    pub token_secret: Option<String>,
    /// Lifetime of issued tokens.
    pub token_ttl: chrono::Duration,
}

impl Config {
    /// Builds the token service from this configuration.
    ///
    /// # Errors
    ///
    /// Returns a validation error if no token secret is configured.
    pub fn token_service(&self) -> Result<TokenService> {
        let secret = self
            .token_secret
            .as_deref()
            .ok_or_else(|| Error::Validation {
                field: "token_secret".into(),
                message: "no token secret configured (set MOORAGE_TOKEN_SECRET or the \
                          token_secret config key)"
                    .into(),
            })?;
        Ok(TokenService::new(secret).with_ttl(self.token_ttl))
    }
}

/// On-disk shape of the optional YAML config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    busy_timeout_ms: Option<u64>,
    token_secret: Option<String>,
    token_ttl_hours: Option<i64>,
}

/// Builder merging configuration sources.
///
/// # Examples
///
/// ```
/// use moorage::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .with_token_secret(Some("dev-secret".to_string()))
///     .build()
///     .unwrap();
/// assert_eq!(config.token_secret.as_deref(), Some("dev-secret"));
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config_file: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    busy_timeout: Option<Duration>,
    token_secret: Option<String>,
    token_ttl: Option<chrono::Duration>,
}

impl ConfigBuilder {
    /// Creates a builder with nothing overridden.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the given YAML config file during `build`.
    ///
    /// Without this, `build` looks for `config.yaml` in the data
    /// directory and silently skips it when absent.
    #[must_use]
    pub fn with_config_file(mut self, path: impl AsRef<Path>) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Overrides the data directory.
    #[must_use]
    pub fn with_data_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.data_dir = dir;
        self
    }

    /// Overrides the busy timeout.
    #[must_use]
    pub const fn with_busy_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Overrides the token secret.
    #[must_use]
    pub fn with_token_secret(mut self, secret: Option<String>) -> Self {
        self.token_secret = secret;
        self
    }

    /// Overrides the token lifetime.
    #[must_use]
    pub const fn with_token_ttl(mut self, ttl: Option<chrono::Duration>) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Merges defaults, file, environment, and builder overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly requested config file cannot be
    /// read, or if any source contains invalid YAML.
    pub fn build(self) -> Result<Config> {
        let mut data_dir: Option<PathBuf> = None;
        let mut busy_timeout = Duration::from_millis(5000);
        let mut token_secret: Option<String> = None;
        let mut token_ttl = chrono::Duration::hours(24);

        // Config file layer
        let explicit_file = self.config_file.is_some();
        let file_path = match &self.config_file {
            Some(path) => Some(path.clone()),
            None => default_config_file(),
        };
        if let Some(path) = file_path {
            if path.exists() || explicit_file {
                let text = fs::read_to_string(&path)?;
                let file: ConfigFile = serde_yaml::from_str(&text)?;
                if let Some(dir) = file.data_dir {
                    data_dir = Some(dir);
                }
                if let Some(ms) = file.busy_timeout_ms {
                    busy_timeout = Duration::from_millis(ms);
                }
                if let Some(secret) = file.token_secret {
                    token_secret = Some(secret);
                }
                if let Some(hours) = file.token_ttl_hours {
                    token_ttl = chrono::Duration::hours(hours);
                }
            }
        }

        // Environment layer
        if let Ok(dir) = env::var("MOORAGE_DATA_DIR") {
            data_dir = Some(PathBuf::from(dir));
        }
        if let Ok(secret) = env::var("MOORAGE_TOKEN_SECRET") {
            token_secret = Some(secret);
        }
        if let Ok(hours) = env::var("MOORAGE_TOKEN_TTL_HOURS") {
            let hours: i64 = hours.parse().map_err(|_| Error::Validation {
                field: "MOORAGE_TOKEN_TTL_HOURS".into(),
                message: format!("'{hours}' is not a whole number of hours"),
            })?;
            token_ttl = chrono::Duration::hours(hours);
        }

        // Builder overrides win
        if let Some(dir) = self.data_dir {
            data_dir = Some(dir);
        }
        if let Some(timeout) = self.busy_timeout {
            busy_timeout = timeout;
        }
        if let Some(secret) = self.token_secret {
            token_secret = Some(secret);
        }
        if let Some(ttl) = self.token_ttl {
            token_ttl = ttl;
        }

        Ok(Config {
            data_dir,
            busy_timeout,
            token_secret,
            token_ttl,
        })
    }
}

// The default config file sits next to the database in the data dir.
fn default_config_file() -> Option<PathBuf> {
    if let Ok(dir) = env::var("MOORAGE_DATA_DIR") {
        return Some(PathBuf::from(dir).join("config.yaml"));
    }
    home::home_dir().map(|home| home.join(".moorage").join("config.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        env::remove_var("MOORAGE_DATA_DIR");
        env::remove_var("MOORAGE_TOKEN_SECRET");
        env::remove_var("MOORAGE_TOKEN_TTL_HOURS");
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = ConfigBuilder::new().build().unwrap();
        assert_eq!(config.busy_timeout, Duration::from_millis(5000));
        assert_eq!(config.token_ttl, chrono::Duration::hours(24));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        env::set_var("MOORAGE_DATA_DIR", "/custom/data");
        env::set_var("MOORAGE_TOKEN_SECRET", "env-secret");
        env::set_var("MOORAGE_TOKEN_TTL_HOURS", "2");

        let config = ConfigBuilder::new().build().unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/custom/data")));
        assert_eq!(config.token_secret.as_deref(), Some("env-secret"));
        assert_eq!(config.token_ttl, chrono::Duration::hours(2));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_ttl_rejected() {
        clear_env();
        env::set_var("MOORAGE_TOKEN_TTL_HOURS", "soon");
        let result = ConfigBuilder::new().build();
        assert!(result.is_err());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_builder_overrides_beat_env() {
        clear_env();
        env::set_var("MOORAGE_TOKEN_SECRET", "env-secret");

        let config = ConfigBuilder::new()
            .with_token_secret(Some("builder-secret".into()))
            .build()
            .unwrap();
        assert_eq!(config.token_secret.as_deref(), Some("builder-secret"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_config_file_layer() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "data_dir: /from/file\nbusy_timeout_ms: 250\ntoken_secret: file-secret\n",
        )
        .unwrap();

        let config = ConfigBuilder::new()
            .with_config_file(&path)
            .build()
            .unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/from/file")));
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
        assert_eq!(config.token_secret.as_deref(), Some("file-secret"));
    }

    #[test]
    #[serial]
    fn test_explicit_missing_config_file_errors() {
        clear_env();
        let result = ConfigBuilder::new()
            .with_config_file("/definitely/not/here.yaml")
            .build();
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_unknown_config_key_rejected() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "databse: typo\n").unwrap();

        let result = ConfigBuilder::new().with_config_file(&path).build();
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_token_service_requires_secret() {
        clear_env();
        let config = ConfigBuilder::new().build().unwrap();
        if config.token_secret.is_none() {
            assert!(config.token_service().is_err());
        }

        let config = ConfigBuilder::new()
            .with_token_secret(Some("s".into()))
            .build()
            .unwrap();
        assert!(config.token_service().is_ok());
    }
}
