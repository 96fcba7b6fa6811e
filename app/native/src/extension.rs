//! Extension lifecycle: what happens when the shell enables or disables us.

use crate::activities::{status_item_position, toggle_activities};
use crate::config::DotspacesConfig;
use crate::constants::STATUS_ITEM_ID;
use crate::container::DotspaceContainer;
use crate::error::DotspacesError;
use crate::host::{Host, PanelSide};
use crate::logging;
use crate::settings::SettingKey;

/// An enabled extension instance.
///
/// Enabling hides the activities button (unless `keep-activities` is set),
/// creates the indicator container and inserts it into the panel's left box.
/// Disabling undoes all of that in reverse order and always shows the
/// activities button again, whatever `keep-activities` was set to meanwhile.
#[derive(Debug)]
pub struct Extension {
    host: Host,
    container: Option<DotspaceContainer>,
}

impl Extension {
    /// Enables the extension against `host`.
    ///
    /// # Errors
    ///
    /// Returns an error if the panel refuses the status item. Nothing is left
    /// behind in that case.
    pub fn enable(host: Host, config: &DotspacesConfig) -> Result<Self, DotspacesError> {
        logging::init();

        let keep_activities = host.settings.get(SettingKey::KeepActivities);
        if !keep_activities {
            toggle_activities(&*host.panel, false);
        }

        let container = DotspaceContainer::new(host.clone(), config.indicators);
        let position = status_item_position(keep_activities);

        if let Err(err) = host.panel.add_status_item(STATUS_ITEM_ID, position, PanelSide::Left) {
            container.destroy();
            toggle_activities(&*host.panel, true);
            return Err(err);
        }

        tracing::info!(position, keep_activities, "dotspaces enabled");
        Ok(Self {
            host,
            container: Some(container),
        })
    }

    /// Tears everything down. Returns `false` if already disabled.
    pub fn disable(&mut self) -> bool {
        let Some(container) = self.container.take() else {
            return false;
        };

        container.destroy();
        if !self.host.panel.remove_status_item(STATUS_ITEM_ID) {
            tracing::debug!("status item was already gone");
        }
        toggle_activities(&*self.host.panel, true);

        tracing::info!("dotspaces disabled");
        true
    }

    /// Whether the extension is enabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool { self.container.is_some() }

    /// The indicator container while enabled.
    #[must_use]
    pub const fn container(&self) -> Option<&DotspaceContainer> { self.container.as_ref() }
}

impl Drop for Extension {
    fn drop(&mut self) { self.disable(); }
}
