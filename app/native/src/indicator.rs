//! Derivation of per-workspace indicator state.
//!
//! [`compute_indicators`] is a pure function of a [`WorkspaceSnapshot`], the
//! current [`Settings`] and the [`IconSizePolicy`]. The reconciler diffs its
//! output against what is on screen.
//!
//! Precedence for the icon: active beats occupied, occupied beats the plain
//! unoccupied dot, and the trailing dynamic workspace overrides all three.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

use crate::constants::{DEFAULT_ICON_SIZE, DYNAMIC_ICON_SIZE_ACTIVE, DYNAMIC_ICON_SIZE_INACTIVE};
use crate::settings::Settings;
use crate::snapshot::WorkspaceSnapshot;

/// Which icon a dot shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconKind {
    Active,
    InactiveOccupied,
    InactiveUnoccupied,
    Dynamic,
}

impl IconKind {
    /// Base name of the icon asset.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::InactiveOccupied => "inactive-occupied",
            Self::InactiveUnoccupied => "inactive-unoccupied",
            Self::Dynamic => "dynamic",
        }
    }

    /// Symbolic icon name, as shipped in the `icons/` directory.
    #[must_use]
    pub fn icon_name(self) -> String { format!("{}-symbolic", self.name()) }
}

/// Style classes applied to a dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StyleClass {
    Indicator,
    Active,
    Occupied,
    Dynamic,
}

impl StyleClass {
    /// CSS class name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Indicator => "dotspaces-indicator",
            Self::Active => "active",
            Self::Occupied => "occupied",
            Self::Dynamic => "dynamic",
        }
    }
}

/// Ordered style classes of one dot. Never more than three.
pub type StyleClasses = SmallVec<[StyleClass; 3]>;

/// Size of the dynamic workspace's dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum DynamicIconSize {
    /// Different sizes depending on whether the dynamic workspace is active.
    ActivityAware { active: u32, inactive: u32 },
    /// One size regardless of state.
    Constant(u32),
}

impl Default for DynamicIconSize {
    fn default() -> Self {
        Self::ActivityAware {
            active: DYNAMIC_ICON_SIZE_ACTIVE,
            inactive: DYNAMIC_ICON_SIZE_INACTIVE,
        }
    }
}

impl DynamicIconSize {
    /// Size for a dynamic dot in the given state.
    #[must_use]
    pub const fn resolve(self, is_active: bool) -> u32 {
        match self {
            Self::ActivityAware { active, inactive } => {
                if is_active {
                    active
                } else {
                    inactive
                }
            }
            Self::Constant(size) => size,
        }
    }
}

/// Icon sizes used by the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct IconSizePolicy {
    /// Size of every non-dynamic dot, in pixels.
    /// Default: 14
    pub icon_size: u32,

    /// Size of the dynamic workspace's dot.
    /// Default: 12 when active, 8 otherwise.
    pub dynamic_icon_size: DynamicIconSize,
}

impl Default for IconSizePolicy {
    fn default() -> Self {
        Self {
            icon_size: DEFAULT_ICON_SIZE,
            dynamic_icon_size: DynamicIconSize::default(),
        }
    }
}

/// Icon of a dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IconSpec {
    pub kind: IconKind,
    pub size: u32,
}

/// What clicking a dot does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "index", rename_all = "camelCase")]
pub enum IndicatorAction {
    /// Show the overview, or hide it if it's already showing.
    ToggleOverview,
    /// Switch to the workspace at this index.
    ActivateWorkspace(usize),
}

/// Render state of one dot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorState {
    pub index: usize,
    pub is_active: bool,
    pub is_occupied: bool,
    pub is_dynamic: bool,
    pub icon: IconSpec,
    pub style_classes: StyleClasses,
    pub on_activate: IndicatorAction,
}

impl IndicatorState {
    /// Shorthand for `self.icon.kind`.
    #[must_use]
    pub const fn icon_kind(&self) -> IconKind { self.icon.kind }

    /// Shorthand for `self.icon.size`.
    #[must_use]
    pub const fn icon_size(&self) -> u32 { self.icon.size }
}

/// Computes the state of the dot at `index`.
#[must_use]
pub fn compute_indicator(
    index: usize,
    snapshot: &WorkspaceSnapshot,
    settings: &Settings,
    policy: &IconSizePolicy,
) -> IndicatorState {
    let is_active = index == snapshot.active_index;
    let is_occupied =
        !settings.ignore_inactive_occupied_workspaces && snapshot.has_own_windows(index);
    let is_dynamic = settings.dynamic_workspaces_enabled && index + 1 == snapshot.count;

    let mut style_classes: StyleClasses = smallvec![StyleClass::Indicator];
    let mut kind = IconKind::InactiveUnoccupied;
    let mut size = policy.icon_size;

    let on_activate = if is_active {
        style_classes.push(StyleClass::Active);
        kind = IconKind::Active;
        IndicatorAction::ToggleOverview
    } else {
        if is_occupied {
            style_classes.push(StyleClass::Occupied);
            kind = IconKind::InactiveOccupied;
        }
        IndicatorAction::ActivateWorkspace(index)
    };

    if is_dynamic {
        style_classes.push(StyleClass::Dynamic);
        kind = IconKind::Dynamic;
        size = policy.dynamic_icon_size.resolve(is_active);
    }

    IndicatorState {
        index,
        is_active,
        is_occupied,
        is_dynamic,
        icon: IconSpec { kind, size },
        style_classes,
        on_activate,
    }
}

/// Computes every dot, in workspace order. Empty when there are no workspaces.
#[must_use]
pub fn compute_indicators(
    snapshot: &WorkspaceSnapshot,
    settings: &Settings,
    policy: &IconSizePolicy,
) -> Vec<IndicatorState> {
    (0..snapshot.count)
        .map(|index| compute_indicator(index, snapshot, settings, policy))
        .collect()
}

/// Whether the row should be shown for `count` workspaces.
///
/// With `hide-dots-on-single`, a lone workspace hides the row. In dynamic mode
/// the trailing empty workspace doesn't count towards that.
#[must_use]
pub const fn row_visible(settings: &Settings, count: usize) -> bool {
    if !settings.hide_dots_on_single {
        return true;
    }
    let threshold = if settings.dynamic_workspaces_enabled { 2 } else { 1 };
    count > threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(counts: &[usize], active_index: usize, pinned: usize) -> WorkspaceSnapshot {
        WorkspaceSnapshot {
            count: counts.len(),
            active_index,
            window_count_by_index: counts.to_vec(),
            pinned_window_count: pinned,
        }
    }

    fn all_settings() -> Vec<Settings> {
        (0..64u8)
            .map(|bits| Settings {
                ignore_inactive_occupied_workspaces: bits & 1 != 0,
                dynamic_workspaces_enabled: bits & 2 != 0,
                wrap_workspaces: bits & 4 != 0,
                hide_dots_on_single: bits & 8 != 0,
                panel_scroll_routing: bits & 16 != 0,
                keep_activities: bits & 32 != 0,
            })
            .collect()
    }

    #[test]
    fn length_matches_count_for_every_settings_combination() {
        let snap = snapshot(&[1, 0, 3, 0, 2], 2, 0);
        for settings in all_settings() {
            let states = compute_indicators(&snap, &settings, &IconSizePolicy::default());
            assert_eq!(states.len(), snap.count);
            assert_eq!(states.iter().filter(|s| s.is_active).count(), 1);
            for state in &states {
                assert_eq!(
                    state.is_dynamic,
                    settings.dynamic_workspaces_enabled && state.index == snap.count - 1
                );
                if settings.ignore_inactive_occupied_workspaces {
                    assert!(!state.is_occupied);
                }
            }
        }
    }

    #[test]
    fn active_wins_over_occupied() {
        let snap = snapshot(&[1, 2, 1], 1, 1);
        let states =
            compute_indicators(&snap, &Settings::default(), &IconSizePolicy::default());

        let active = &states[1];
        assert!(active.is_occupied);
        assert_eq!(active.icon_kind(), IconKind::Active);
        assert_eq!(
            active.style_classes.as_slice(),
            &[StyleClass::Indicator, StyleClass::Active]
        );
        assert_eq!(active.on_activate, IndicatorAction::ToggleOverview);
    }

    #[test]
    fn occupied_inactive_dot() {
        let snap = snapshot(&[0, 3, 0], 0, 1);
        let states =
            compute_indicators(&snap, &Settings::default(), &IconSizePolicy::default());

        assert_eq!(states[1].icon_kind(), IconKind::InactiveOccupied);
        assert_eq!(states[1].on_activate, IndicatorAction::ActivateWorkspace(1));
        assert!(states[1].style_classes.contains(&StyleClass::Occupied));
        assert_eq!(states[2].icon_kind(), IconKind::InactiveUnoccupied);
        assert_eq!(states[2].icon_size(), 14);
    }

    #[test]
    fn pinned_windows_never_occupy() {
        let snap = snapshot(&[2, 2, 2], 0, 2);
        let states =
            compute_indicators(&snap, &Settings::default(), &IconSizePolicy::default());
        assert!(states.iter().all(|s| !s.is_occupied));
    }

    #[test]
    fn dynamic_dot_shrinks_by_activity() {
        let settings = Settings {
            dynamic_workspaces_enabled: true,
            ..Settings::default()
        };
        let policy = IconSizePolicy::default();

        let inactive = compute_indicators(&snapshot(&[1, 0], 0, 0), &settings, &policy);
        assert_eq!(inactive[1].icon, IconSpec { kind: IconKind::Dynamic, size: 8 });
        assert!(inactive[1].style_classes.contains(&StyleClass::Dynamic));

        let active = compute_indicators(&snapshot(&[1, 0], 1, 0), &settings, &policy);
        assert_eq!(active[1].icon, IconSpec { kind: IconKind::Dynamic, size: 12 });
        assert_eq!(
            active[1].style_classes.as_slice(),
            &[StyleClass::Indicator, StyleClass::Active, StyleClass::Dynamic]
        );
        assert_eq!(active[1].on_activate, IndicatorAction::ToggleOverview);
    }

    #[test]
    fn constant_dynamic_size_policy() {
        let settings = Settings {
            dynamic_workspaces_enabled: true,
            ..Settings::default()
        };
        let policy = IconSizePolicy {
            icon_size: 16,
            dynamic_icon_size: DynamicIconSize::Constant(10),
        };

        for active in 0..2 {
            let states = compute_indicators(&snapshot(&[0, 0], active, 0), &settings, &policy);
            assert_eq!(states[1].icon_size(), 10);
            assert_eq!(states[0].icon_size(), 16);
        }
    }

    #[test]
    fn no_workspaces_yields_no_dots() {
        let states = compute_indicators(
            &WorkspaceSnapshot::default(),
            &Settings::default(),
            &IconSizePolicy::default(),
        );
        assert!(states.is_empty());
    }

    #[test]
    fn visibility_respects_dynamic_trailing_workspace() {
        let plain = Settings {
            hide_dots_on_single: true,
            ..Settings::default()
        };
        assert!(!row_visible(&plain, 1));
        assert!(row_visible(&plain, 2));

        let dynamic = Settings {
            hide_dots_on_single: true,
            dynamic_workspaces_enabled: true,
            ..Settings::default()
        };
        assert!(!row_visible(&dynamic, 2));
        assert!(row_visible(&dynamic, 3));

        assert!(row_visible(&Settings::default(), 1));
    }

    #[test]
    fn icon_names_are_symbolic() {
        assert_eq!(IconKind::InactiveOccupied.icon_name(), "inactive-occupied-symbolic");
        assert_eq!(StyleClass::Indicator.as_str(), "dotspaces-indicator");
    }

    #[test]
    fn policy_deserializes_from_camel_case() {
        let policy: IconSizePolicy =
            serde_json::from_str(r#"{ "iconSize": 16, "dynamicIconSize": { "constant": 9 } }"#)
                .unwrap();
        assert_eq!(policy.icon_size, 16);
        assert_eq!(policy.dynamic_icon_size, DynamicIconSize::Constant(9));
    }
}
