//! Desktop session configuration with TOML loading and validation.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default app ids opened when there is no usable stored session.
pub const DEFAULT_LAUNCH_APPS: [&str; 1] = ["welcome"];
/// App id that routes a deep link to the compound project orchestrator.
pub const COMPOUND_PROJECT_APP_ID: &str = "project";

#[derive(Debug, Error)]
/// Configuration loading and validation failures.
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that failed.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// The config text is not valid TOML for [`DesktopConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A field holds a value the runtime cannot work with.
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Tunables for the window manager, session persistence, and launcher.
pub struct DesktopConfig {
    /// Storage key holding the persisted session record.
    pub storage_key: String,
    /// App ids opened on boot when no session can be restored.
    pub default_launch_apps: Vec<String>,
    /// Stacking floor; the first raised window gets `z_index_floor + 1`.
    pub z_index_floor: u32,
    /// Cascade offset applied per open window on both axes.
    pub cascade_step: i32,
    /// Number of windows after which the cascade offset wraps back to zero.
    pub cascade_wrap: usize,
    /// Pause between successive opens of a compound launch, in milliseconds.
    pub launch_delay_ms: u64,
    /// Deep-link target that opens a compound project instead of a single app.
    pub compound_app_id: String,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            storage_key: platform_host::DESKTOP_SESSION_KEY.to_string(),
            default_launch_apps: DEFAULT_LAUNCH_APPS.iter().map(|s| s.to_string()).collect(),
            z_index_floor: 9,
            cascade_step: 25,
            cascade_wrap: 10,
            launch_delay_ms: 300,
            compound_app_id: COMPOUND_PROJECT_APP_ID.to_string(),
        }
    }
}

impl DesktopConfig {
    /// Parses and validates a TOML document. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and [`ConfigError::Invalid`] when
    /// validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise the same errors as
    /// [`DesktopConfig::from_toml_str`].
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Checks invariants the runtime relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_key must not be empty".to_string()));
        }
        if self.cascade_wrap == 0 {
            return Err(ConfigError::Invalid("cascade_wrap must be at least 1".to_string()));
        }
        if self.compound_app_id.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "compound_app_id must not be empty".to_string(),
            ));
        }
        if let Some(bad) = self
            .default_launch_apps
            .iter()
            .find(|id| desktop_app_contract::ApplicationId::new(id.as_str()).is_err())
        {
            return Err(ConfigError::Invalid(format!(
                "default_launch_apps contains invalid app id `{bad}`"
            )));
        }
        Ok(())
    }

    /// Delay awaited between compound launch steps.
    pub fn launch_delay(&self) -> Duration {
        Duration::from_millis(self.launch_delay_ms)
    }
}
