//! Typed boolean settings with change notification.
//!
//! The extension's own toggles and the window manager's `dynamic-workspaces`
//! key live in two different schemas. [`SettingsFacade`] hides that split and
//! hands out a [`Settings`] value per triggering event.

mod memory;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub use memory::MemorySettingsStore;
use serde::Serialize;

use crate::constants::{EXTENSION_SCHEMA_ID, WINDOW_MANAGER_SCHEMA_ID};
use crate::error::DotspacesError;
use crate::events;
use crate::signals::SignalSource;

/// Schema a settings key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SettingsSchema {
    /// The extension's own schema.
    Extension,
    /// The window manager's schema.
    WindowManager,
}

impl SettingsSchema {
    /// Schema identifier in the host configuration system.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Extension => EXTENSION_SCHEMA_ID,
            Self::WindowManager => WINDOW_MANAGER_SCHEMA_ID,
        }
    }
}

/// Every boolean key this crate reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SettingKey {
    IgnoreInactiveOccupiedWorkspaces,
    KeepActivities,
    PanelScroll,
    WrapWorkspaces,
    HideDotsOnSingle,
    DynamicWorkspaces,
}

impl SettingKey {
    /// All keys, extension keys first.
    pub const ALL: [Self; 6] = [
        Self::IgnoreInactiveOccupiedWorkspaces,
        Self::KeepActivities,
        Self::PanelScroll,
        Self::WrapWorkspaces,
        Self::HideDotsOnSingle,
        Self::DynamicWorkspaces,
    ];

    /// Key name in the settings schema.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IgnoreInactiveOccupiedWorkspaces => "ignore-inactive-occupied-workspaces",
            Self::KeepActivities => "keep-activities",
            Self::PanelScroll => "panel-scroll",
            Self::WrapWorkspaces => "wrap-workspaces",
            Self::HideDotsOnSingle => "hide-dots-on-single",
            Self::DynamicWorkspaces => "dynamic-workspaces",
        }
    }

    /// Schema that owns the key.
    #[must_use]
    pub const fn schema(self) -> SettingsSchema {
        match self {
            Self::DynamicWorkspaces => SettingsSchema::WindowManager,
            _ => SettingsSchema::Extension,
        }
    }

    /// Value used when the store has nothing recorded for the key.
    #[must_use]
    pub const fn default_value(self) -> bool { matches!(self, Self::DynamicWorkspaces) }

    /// Keys owned by `schema`.
    pub fn for_schema(schema: SettingsSchema) -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(move |key| key.schema() == schema)
    }

    /// Signal emitted by a store when this key changes.
    #[must_use]
    pub fn changed_signal(self) -> String {
        format!("{}{}", events::settings::CHANGED_PREFIX, self.as_str())
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for SettingKey {
    type Err = DotspacesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| DotspacesError::SettingsError(format!("unknown settings key: {s}")))
    }
}

/// A settings backend for one schema.
///
/// Stores emit `changed::<key>` through their [`SignalSource`] side whenever a
/// key's value changes.
pub trait SettingsStore: SignalSource {
    /// Schema served by this store.
    fn schema(&self) -> SettingsSchema;

    /// Reads a key.
    fn get_bool(&self, key: SettingKey) -> bool;

    /// Writes a key.
    ///
    /// # Errors
    ///
    /// Returns `DotspacesError::SettingsError` if the key doesn't belong to
    /// this store's schema or the backend rejects the write.
    fn set_bool(&self, key: SettingKey, value: bool) -> Result<(), DotspacesError>;
}

/// Point-in-time values of every toggle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub ignore_inactive_occupied_workspaces: bool,
    pub dynamic_workspaces_enabled: bool,
    pub wrap_workspaces: bool,
    pub hide_dots_on_single: bool,
    pub panel_scroll_routing: bool,
    pub keep_activities: bool,
}

/// Single entry point for reading and watching settings across both schemas.
#[derive(Clone)]
pub struct SettingsFacade {
    extension: Arc<dyn SettingsStore>,
    window_manager: Arc<dyn SettingsStore>,
}

impl SettingsFacade {
    /// Combines the extension store and the window manager store.
    #[must_use]
    pub fn new(extension: Arc<dyn SettingsStore>, window_manager: Arc<dyn SettingsStore>) -> Self {
        Self { extension, window_manager }
    }

    /// Store owning `key`.
    #[must_use]
    pub fn store_for(&self, key: SettingKey) -> &Arc<dyn SettingsStore> {
        match key.schema() {
            SettingsSchema::Extension => &self.extension,
            SettingsSchema::WindowManager => &self.window_manager,
        }
    }

    /// Store owning `key`, as a signal source for `changed::<key>`.
    #[must_use]
    pub fn source_for(&self, key: SettingKey) -> Arc<dyn SignalSource> {
        self.store_for(key).clone()
    }

    /// Reads one key.
    #[must_use]
    pub fn get(&self, key: SettingKey) -> bool { self.store_for(key).get_bool(key) }

    /// Writes one key.
    ///
    /// # Errors
    ///
    /// Propagates the owning store's error.
    pub fn set(&self, key: SettingKey, value: bool) -> Result<(), DotspacesError> {
        self.store_for(key).set_bool(key, value)
    }

    /// Reads every toggle.
    #[must_use]
    pub fn snapshot(&self) -> Settings {
        Settings {
            ignore_inactive_occupied_workspaces: self
                .get(SettingKey::IgnoreInactiveOccupiedWorkspaces),
            dynamic_workspaces_enabled: self.get(SettingKey::DynamicWorkspaces),
            wrap_workspaces: self.get(SettingKey::WrapWorkspaces),
            hide_dots_on_single: self.get(SettingKey::HideDotsOnSingle),
            panel_scroll_routing: self.get(SettingKey::PanelScroll),
            keep_activities: self.get(SettingKey::KeepActivities),
        }
    }
}

impl fmt::Debug for SettingsFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsFacade").field("settings", &self.snapshot()).finish()
    }
}
