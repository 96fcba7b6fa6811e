//! Configuration template generation.
//!
//! Generates a commented configuration template with all available options.

use std::fs;
use std::path::Path;

/// Generates a configuration template with all options commented out.
#[must_use]
pub fn generate_config_template() -> String {
    r#"// Dotspaces Configuration File
// ============================
// This file uses JSONC format (JSON with comments).
// All options below are commented out and show their default values.
// Uncomment and modify the options you want to configure.
// Changes are picked up while the extension is running.

{
  // ============================================================================
  // Settings
  // ============================================================================
  // Initial values of the extension's toggles. Options left commented out keep
  // whatever value the shell already has.
  // "settings": {
  //   // Never mark inactive workspaces as occupied
  //   "ignoreInactiveOccupiedWorkspaces": false,
  //
  //   // Keep the panel's activities button next to the dots
  //   "keepActivities": false,
  //
  //   // Switch workspaces when scrolling anywhere over the panel
  //   "panelScroll": false,
  //
  //   // Wrap around when scrolling past the first or last workspace
  //   "wrapWorkspaces": false,
  //
  //   // Hide the dots when there is only one workspace
  //   "hideDotsOnSingle": false,
  //
  //   // Window manager's dynamic workspaces mode
  //   "dynamicWorkspaces": true
  // },

  // ============================================================================
  // Indicators
  // ============================================================================
  // "indicators": {
  //   // Size of every regular dot, in pixels
  //   "iconSize": 14,
  //
  //   // Size of the trailing dynamic workspace's dot. Either depends on whether
  //   // it is active:
  //   "dynamicIconSize": { "activityAware": { "active": 12, "inactive": 8 } }
  //   // or is fixed:
  //   // "dynamicIconSize": { "constant": 10 }
  // }
}
"#
    .to_string()
}

/// Creates a configuration file with the template at the specified path.
///
/// Creates parent directories if they don't exist.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn create_config_file(path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, generate_config_template())
}
