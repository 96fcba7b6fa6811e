//! Configuration types for Dotspaces.
//!
//! This module provides the configuration types and loading functionality.
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constants::APP_DIR_NAME;
use crate::indicator::IconSizePolicy;
use crate::settings::SettingKey;

/// Initial values of the settings toggles.
///
/// Unset fields leave the store's current value alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsConfig {
    /// Never mark inactive workspaces as occupied.
    /// Default: false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_inactive_occupied_workspaces: Option<bool>,

    /// Keep the panel's activities button visible.
    /// Default: false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_activities: Option<bool>,

    /// Switch workspaces when scrolling anywhere over the panel, not only over
    /// the dots.
    /// Default: false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panel_scroll: Option<bool>,

    /// Wrap around when scrolling past the first or last workspace.
    /// Default: false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrap_workspaces: Option<bool>,

    /// Hide the dots when there is only one workspace.
    /// Default: false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_dots_on_single: Option<bool>,

    /// Window manager's dynamic workspaces mode.
    /// Default: true
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_workspaces: Option<bool>,
}

impl SettingsConfig {
    /// Every toggle that is set, paired with its key.
    #[must_use]
    pub fn values(&self) -> Vec<(SettingKey, bool)> {
        [
            (SettingKey::IgnoreInactiveOccupiedWorkspaces, self.ignore_inactive_occupied_workspaces),
            (SettingKey::KeepActivities, self.keep_activities),
            (SettingKey::PanelScroll, self.panel_scroll),
            (SettingKey::WrapWorkspaces, self.wrap_workspaces),
            (SettingKey::HideDotsOnSingle, self.hide_dots_on_single),
            (SettingKey::DynamicWorkspaces, self.dynamic_workspaces),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key, value)))
        .collect()
    }
}

/// Root configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct DotspacesConfig {
    /// Initial values of the toggles, applied on startup and on every reload.
    pub settings: SettingsConfig,

    /// Icon sizes of the dots.
    pub indicators: IconSizePolicy,
}

/// Errors that can occur when loading the configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    NotFound,
    /// The configuration file exists but could not be read.
    IoError(std::io::Error),
    /// The configuration file contains invalid JSON.
    ParseError(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(
                f,
                "No configuration file found. Expected at $XDG_CONFIG_HOME/dotspaces/config.jsonc \
                or ~/.config/dotspaces/config.jsonc"
            ),
            Self::IoError(err) => write!(f, "Failed to read configuration file: {err}"),
            Self::ParseError(err) => write!(f, "Failed to parse configuration file: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError(err) => Some(err),
            Self::ParseError(err) => Some(err),
            Self::NotFound => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err) }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self { Self::ParseError(err) }
}

/// Config file names, in priority order.
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Returns the possible configuration file paths in priority order.
///
/// The function checks the following locations (both `.jsonc` and `.json` variants):
/// 1. `$XDG_CONFIG_HOME/dotspaces/`, if the variable is set
/// 2. `~/.config/dotspaces/`
/// 3. The platform config directory reported by `dirs`
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut dirs_to_check = Vec::new();

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        dirs_to_check.push(PathBuf::from(xdg_config).join(APP_DIR_NAME));
    }
    if let Some(home) = dirs::home_dir() {
        dirs_to_check.push(home.join(".config").join(APP_DIR_NAME));
    }
    if let Some(config_dir) = dirs::config_dir() {
        dirs_to_check.push(config_dir.join(APP_DIR_NAME));
    }

    let mut paths = Vec::new();
    for dir in dirs_to_check {
        for filename in CONFIG_FILE_NAMES {
            let path = dir.join(filename);
            // XDG_CONFIG_HOME is often ~/.config itself
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }
    paths
}

/// Parses JSONC configuration text.
///
/// # Errors
///
/// Returns `ConfigError::ParseError` if the text isn't valid JSON once
/// comments are stripped, or doesn't match the configuration shape.
pub fn parse_config(text: &str) -> Result<DotspacesConfig, ConfigError> {
    read_config(text.as_bytes())
}

fn read_config(reader: impl Read) -> Result<DotspacesConfig, ConfigError> {
    let reader = json_comments::StripComments::new(reader);
    Ok(serde_json::from_reader(reader)?)
}

/// Loads the configuration from a specific file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the file doesn't exist,
/// `ConfigError::IoError` if it can't be read and `ConfigError::ParseError`
/// if it isn't valid JSONC.
pub fn load_config_from_path(path: &Path) -> Result<(DotspacesConfig, PathBuf), ConfigError> {
    let config = load_file(path)?;
    Ok((config, path.to_path_buf()))
}

fn load_file(path: &Path) -> Result<DotspacesConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }
    read_config(fs::File::open(path)?)
}

/// Loads the configuration from the first available config file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no configuration file exists in any of the expected locations.
/// Returns `ConfigError::IoError` if a configuration file exists but could not be read.
/// Returns `ConfigError::ParseError` if the configuration file contains invalid JSON.
pub fn load_config() -> Result<(DotspacesConfig, PathBuf), ConfigError> {
    for path in config_paths() {
        if path.exists() {
            let config = load_file(&path)?;
            return Ok((config, path));
        }
    }

    Err(ConfigError::NotFound)
}
