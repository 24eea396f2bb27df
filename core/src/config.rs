//! Configuration loaded from `~/.primer/config.toml`.
//!
//! ```toml
//! [app]
//! theme = "system"        # "dark" | "light" | "system"
//! ascii_only = false
//! high_contrast = false
//! reduced_motion = false
//! loading_delay_ms = 300
//! clipboard = true
//!
//! [storage]
//! state_path = "~/.primer/state.json"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs, io};

use serde::Deserialize;
use thiserror::Error;
use toml::de::Error as TomlError;

use primer_types::{ColorScheme, UiOptions};

use crate::navigation::DEFAULT_LOADING_DELAY;

const CONFIG_DIR: &str = ".primer";
const STATE_FILENAME: &str = "state.json";

#[derive(Debug, Default, Deserialize)]
pub struct PrimerConfig {
    pub app: Option<AppConfig>,
    pub storage: Option<StorageConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: TomlError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

/// Initial theme choice.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeSetting {
    Dark,
    Light,
    /// Follow the host's preferred color scheme.
    #[default]
    System,
}

impl ThemeSetting {
    /// The pinned scheme, or `None` when the host decides.
    #[must_use]
    pub const fn pinned(self) -> Option<ColorScheme> {
        match self {
            Self::Dark => Some(ColorScheme::Dark),
            Self::Light => Some(ColorScheme::Light),
            Self::System => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub theme: ThemeSetting,
    /// Use ASCII-only glyphs for icons and spinners.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
    /// Disable spinner animation.
    #[serde(default)]
    pub reduced_motion: bool,
    /// Length of the loading window when opening a topic.
    pub loading_delay_ms: Option<u64>,
    /// Copy code blocks to the system clipboard. Off for headless sessions.
    pub clipboard: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StorageConfig {
    /// Where the verification flag is kept. `~` expands to the home directory.
    pub state_path: Option<String>,
}

impl PrimerConfig {
    /// Load the user config. `Ok(None)` when there is no home directory or no file.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn theme(&self) -> ThemeSetting {
        self.app.as_ref().map(|app| app.theme).unwrap_or_default()
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.app
            .as_ref()
            .map(|app| UiOptions {
                ascii_only: app.ascii_only,
                high_contrast: app.high_contrast,
                reduced_motion: app.reduced_motion,
            })
            .unwrap_or_default()
    }

    /// Configured loading window (clamped later by the navigator).
    #[must_use]
    pub fn loading_delay(&self) -> Duration {
        self.app
            .as_ref()
            .and_then(|app| app.loading_delay_ms)
            .map_or(DEFAULT_LOADING_DELAY, Duration::from_millis)
    }

    /// Whether `c` reaches the system clipboard. Defaults to on.
    #[must_use]
    pub fn clipboard_enabled(&self) -> bool {
        self.app
            .as_ref()
            .and_then(|app| app.clipboard)
            .unwrap_or(true)
    }

    /// Resolve the state file: `PRIMER_STATE_PATH`, then `[storage] state_path`,
    /// then `~/.primer/state.json`, then `./.primer/state.json`.
    #[must_use]
    pub fn state_path(&self) -> PathBuf {
        if let Ok(raw) = env::var("PRIMER_STATE_PATH")
            && !raw.trim().is_empty()
        {
            return expand_home(raw.trim());
        }
        if let Some(raw) = self
            .storage
            .as_ref()
            .and_then(|storage| storage.state_path.as_deref())
            .filter(|raw| !raw.trim().is_empty())
        {
            return expand_home(raw.trim());
        }
        default_state_path()
    }
}

/// Path to the config file (`~/.primer/config.toml`).
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR).join("config.toml"))
}

/// Directory holding config, state and logs. Falls back to `./.primer`.
#[must_use]
pub fn data_dir() -> PathBuf {
    dirs::home_dir().map_or_else(|| PathBuf::from(CONFIG_DIR), |home| home.join(CONFIG_DIR))
}

fn default_state_path() -> PathBuf {
    data_dir().join(STATE_FILENAME)
}

fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(raw)
}
