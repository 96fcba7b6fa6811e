//! Shared constants.

/// Window classes owned by the shell itself.
///
/// Windows of these classes are never counted as pinned, so shell overlays
/// that live on every workspace don't hide real occupancy.
pub const RESERVED_WINDOW_CLASSES: &[&str] = &["Gnome-shell"];

/// Identifier of the indicator row in the panel's status area.
pub const STATUS_ITEM_ID: &str = "dotspaces@dotspaces";

/// Icon size of regular dots, in pixels.
pub const DEFAULT_ICON_SIZE: u32 = 14;

/// Icon size of the dynamic dot while its workspace is active.
pub const DYNAMIC_ICON_SIZE_ACTIVE: u32 = 12;

/// Icon size of the dynamic dot while its workspace is inactive.
pub const DYNAMIC_ICON_SIZE_INACTIVE: u32 = 8;

/// Settings schema of the extension's own toggles.
pub const EXTENSION_SCHEMA_ID: &str = "org.gnome.shell.extensions.dotspaces";

/// Settings schema of the window manager (owns `dynamic-workspaces`).
pub const WINDOW_MANAGER_SCHEMA_ID: &str = "org.gnome.mutter";

/// Application directory name used for configuration lookup.
pub const APP_DIR_NAME: &str = "dotspaces";
