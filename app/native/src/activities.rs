//! The panel's activities button.

use crate::host::Panel;

/// Shows or hides the activities button.
///
/// A locked session always hides it. Returns `false` when the panel has no
/// activities button.
pub fn toggle_activities(panel: &dyn Panel, visible: bool) -> bool {
    let Some(button) = panel.activities() else {
        return false;
    };

    let locked = panel.is_session_locked();
    if visible && !locked {
        button.show();
    } else {
        tracing::debug!(requested = visible, locked, "hiding activities");
        button.hide();
    }
    true
}

/// Position of the indicator row in the panel's left box.
///
/// The row takes the activities button's slot when that button is hidden and
/// sits right after it otherwise.
#[must_use]
pub const fn status_item_position(keep_activities: bool) -> usize {
    if keep_activities { 1 } else { 0 }
}
