use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::markup::MarkupTheme;

pub const CONFIG_FILE_NAME: &str = "config-search.toml";
pub const CONFIG_ENV: &str = "CONFIG_SEARCH_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub search: SearchSection,
    pub models: ModelsSection,
    pub theme: MarkupTheme,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchSection {
    pub program: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelsSection {
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub config: AppConfig,
    /// File the configuration came from; `None` when defaults were used.
    pub source: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        error: std::io::Error,
    },
    Parse {
        path: PathBuf,
        error: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read { path, error } => {
                write!(f, "failed to read config {}: {error}", path.display())
            }
            ConfigError::Parse { path, error } => {
                write!(f, "failed to parse config {}: {error}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Loads the configuration from `explicit`, `$CONFIG_SEARCH_CONFIG`, or
/// `config-search.toml` in the current directory, in that order.
///
/// Only the last location may be absent; the other two must exist.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_config_file(path);
    }
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|value| !value.is_empty()) {
        return load_config_file(Path::new(&path));
    }
    let default_path = PathBuf::from(CONFIG_FILE_NAME);
    if default_path.is_file() {
        return load_config_file(&default_path);
    }
    Ok(LoadedConfig {
        config: AppConfig::default(),
        source: None,
    })
}

pub fn load_config_file(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|error| ConfigError::Read {
        path: path.to_path_buf(),
        error,
    })?;
    let mut config = parse_config(&text).map_err(|error| ConfigError::Parse {
        path: path.to_path_buf(),
        error,
    })?;
    if let Some(base) = path.parent() {
        config.resolve_relative_to(base);
    }
    tracing::debug!(path = %path.display(), "loaded configuration");
    Ok(LoadedConfig {
        config,
        source: Some(path.to_path_buf()),
    })
}

pub fn parse_config(text: &str) -> Result<AppConfig, toml::de::Error> {
    toml::from_str(text)
}

impl AppConfig {
    fn resolve_relative_to(&mut self, base: &Path) {
        // A bare program name stays as-is so it is looked up on PATH.
        if let Some(program) = self.search.program.as_mut() {
            if program.is_relative() && program.components().count() > 1 {
                *program = base.join(&*program);
            }
        }
        for path in [&mut self.search.working_dir, &mut self.models.file]
            .into_iter()
            .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}
