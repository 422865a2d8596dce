//! Stored editor settings
//!
//! Settings live in `<config dir>/forma/config.ron`. A replay script may carry
//! its own settings, which then replace the stored ones for that run.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use super::EditorConfig;

/// Settings shared between the binary and the editors it creates
pub type SharedConfig = Arc<RwLock<ConfigManager>>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("cannot encode settings: {0}")]
    Encode(#[from] ron::Error),
}

/// Owns the settings file and the settings loaded from it
#[derive(Debug)]
pub struct ConfigManager {
    config: EditorConfig,
    path: PathBuf,
    dirty: bool,
}

impl ConfigManager {
    /// Open the settings at `path`, or at [`Self::default_path`] when none is
    /// given. A missing or broken file leaves the defaults in place.
    pub fn open(path: Option<PathBuf>) -> Self {
        let path = path.unwrap_or_else(Self::default_path);
        let config = match Self::read(&path) {
            Ok(Some(config)) => {
                tracing::info!("Loaded settings from {:?}", path);
                config
            }
            Ok(None) => {
                tracing::debug!("No settings at {:?}, using defaults", path);
                EditorConfig::new()
            }
            Err(e) => {
                tracing::warn!("Ignoring settings file: {}", e);
                EditorConfig::new()
            }
        };

        Self {
            config,
            path,
            dirty: false,
        }
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("forma")
            .join("config.ron")
    }

    /// Read a settings file. `Ok(None)` if it does not exist.
    pub fn read(path: &Path) -> Result<Option<EditorConfig>, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn parse(content: &str) -> Result<EditorConfig, ConfigError> {
        Ok(ron::from_str(content)?)
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Mutable settings; marks them unsaved.
    pub fn config_mut(&mut self) -> &mut EditorConfig {
        self.dirty = true;
        &mut self.config
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Settings for a new editor. `scripted` replaces the stored settings.
    pub fn resolve(&self, scripted: Option<&EditorConfig>) -> EditorConfig {
        scripted.unwrap_or(&self.config).clone()
    }

    /// Write unsaved settings back to their file.
    pub fn save(&mut self) -> Result<(), ConfigError> {
        if !self.dirty {
            return Ok(());
        }

        let io_error = |source| ConfigError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        let content = ron::ser::to_string_pretty(&self.config, ron::ser::PrettyConfig::default())?;
        std::fs::write(&self.path, content).map_err(io_error)?;

        tracing::info!("Saved settings to {:?}", self.path);
        self.dirty = false;
        Ok(())
    }
}

pub fn create_shared_config(path: Option<PathBuf>) -> SharedConfig {
    Arc::new(RwLock::new(ConfigManager::open(path)))
}
