//! Configuration loading and discovery for `crayola.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::CrayolaConfig;
use crate::models::ScreenSize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file searched for
pub const CONFIG_FILE: &str = "crayola.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse crayola.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub pixel_size: Option<u32>,
    pub screen_size: Option<ScreenSize>,
    pub viewport: Option<(u32, u32)>,
    pub ticks: Option<u32>,
    pub frame_duration_ms: Option<u32>,
    pub scale: Option<u32>,
    pub strict: Option<bool>,
}

/// Find crayola.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for crayola.toml
/// 2. Check XDG_CONFIG_HOME/crayola/crayola.toml (or ~/.config/crayola/crayola.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find crayola.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("crayola").join(CONFIG_FILE);
    config_path.exists().then_some(config_path)
}

/// Find crayola.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a crayola.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the
/// default configuration.
pub fn load_config(path: Option<&Path>) -> Result<CrayolaConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            log::debug!("loading config from {}", p.display());
            load_config_file(&p)
        }
        None => Ok(CrayolaConfig::default()),
    }
}

fn load_config_file(path: &Path) -> Result<CrayolaConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: CrayolaConfig = toml::from_str(&contents)?;
    validated(config)
}

fn validated(config: CrayolaConfig) -> Result<CrayolaConfig, ConfigError> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }
    Ok(config)
}

/// Merge CLI overrides into a configuration and re-validate it.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(
    mut config: CrayolaConfig,
    overrides: &CliOverrides,
) -> Result<CrayolaConfig, ConfigError> {
    if let Some(pixel_size) = overrides.pixel_size {
        config.scene.pixel_size = pixel_size;
    }
    if let Some(screen) = overrides.screen_size {
        config.scene.width = screen.width;
        config.scene.height = screen.height;
    }
    if let Some((width, height)) = overrides.viewport {
        config.viewport.width = width;
        config.viewport.height = height;
    }
    if let Some(ticks) = overrides.ticks {
        config.render.ticks = ticks;
    }
    if let Some(duration) = overrides.frame_duration_ms {
        config.render.frame_duration_ms = duration;
    }
    if let Some(scale) = overrides.scale {
        config.render.scale = scale;
    }
    if let Some(strict) = overrides.strict {
        config.render.strict = strict;
    }

    validated(config)
}
