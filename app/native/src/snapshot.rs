//! Point-in-time view of the window manager's workspaces.

use serde::Serialize;

use crate::constants::RESERVED_WINDOW_CLASSES;
use crate::host::{WindowInfo, WorkspaceManager};

/// Immutable view of the workspaces, captured at the start of every event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSnapshot {
    /// Number of workspaces.
    pub count: usize,
    /// Index of the active workspace.
    pub active_index: usize,
    /// Windows per workspace, pinned windows included. Length is `count`.
    pub window_count_by_index: Vec<usize>,
    /// Windows shown on every workspace, shell-owned ones excluded.
    pub pinned_window_count: usize,
}

impl WorkspaceSnapshot {
    /// Reads the live workspace model.
    ///
    /// Runs in O(windows + workspaces). A workspace the manager can't resolve
    /// counts as empty.
    #[must_use]
    pub fn capture(manager: &dyn WorkspaceManager) -> Self {
        let count = manager.n_workspaces();
        let window_count_by_index = (0..count)
            .map(|index| manager.workspace(index).map_or(0, |ws| ws.window_count()))
            .collect();

        Self {
            count,
            active_index: manager.active_workspace_index(),
            window_count_by_index,
            pinned_window_count: count_pinned_windows(&manager.list_all_windows()),
        }
    }

    /// Windows on `index`, pinned windows included.
    #[must_use]
    pub fn window_count(&self, index: usize) -> usize {
        self.window_count_by_index.get(index).copied().unwrap_or(0)
    }

    /// Whether `index` holds any window of its own.
    #[must_use]
    pub fn has_own_windows(&self, index: usize) -> bool {
        self.window_count(index).saturating_sub(self.pinned_window_count) > 0
    }
}

/// Whether a window counts as pinned for occupancy purposes.
#[must_use]
pub fn is_pinned(window: &WindowInfo) -> bool {
    window.on_all_workspaces
        && !window
            .wm_class
            .as_deref()
            .is_some_and(|class| RESERVED_WINDOW_CLASSES.contains(&class))
}

/// Counts pinned windows, skipping shell-owned classes.
#[must_use]
pub fn count_pinned_windows(windows: &[WindowInfo]) -> usize {
    windows.iter().filter(|w| is_pinned(w)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeWorkspaceManager;

    #[test]
    fn shell_overlays_are_not_pinned() {
        assert!(is_pinned(&WindowInfo::pinned("Firefox")));
        assert!(!is_pinned(&WindowInfo::pinned("Gnome-shell")));
        assert!(!is_pinned(&WindowInfo::regular("Firefox")));
    }

    #[test]
    fn pinned_window_without_class_counts() {
        let window = WindowInfo {
            wm_class: None,
            on_all_workspaces: true,
        };
        assert!(is_pinned(&window));
    }

    #[test]
    fn capture_reads_counts_and_active_index() {
        let manager = FakeWorkspaceManager::new(&[2, 0, 1]);
        manager.set_active(2);
        manager.add_pinned_window("Conky");
        manager.add_pinned_window("Gnome-shell");

        let snapshot = WorkspaceSnapshot::capture(&*manager);

        assert_eq!(snapshot.count, 3);
        assert_eq!(snapshot.active_index, 2);
        // Pinned windows show up in every workspace's own list; the shell's
        // overlay only shows up in the global list.
        assert_eq!(snapshot.window_count_by_index, vec![3, 1, 2]);
        assert_eq!(snapshot.pinned_window_count, 1);
        assert_eq!(snapshot.window_count_by_index.len(), snapshot.count);
    }

    #[test]
    fn own_windows_exclude_pinned() {
        let snapshot = WorkspaceSnapshot {
            count: 3,
            active_index: 0,
            window_count_by_index: vec![1, 2, 0],
            pinned_window_count: 1,
        };
        assert!(!snapshot.has_own_windows(0));
        assert!(snapshot.has_own_windows(1));
        assert!(!snapshot.has_own_windows(2));
        assert!(!snapshot.has_own_windows(9));
    }
}
