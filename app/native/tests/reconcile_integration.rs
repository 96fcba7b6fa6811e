//! Integration tests for the indicator container.
//!
//! These tests drive a full [`Extension`] against the in-memory shell from
//! `dotspaces::testing` and check what ends up on screen.
//!
//! ## Running
//!
//! ```bash
//! cargo test -p dotspaces --test reconcile_integration
//! ```

use dotspaces::config::{DotspacesConfig, SettingsConfig, apply_settings, parse_config};
use dotspaces::indicator::{DynamicIconSize, IconKind, StyleClass};
use dotspaces::scroll::{ScrollDirection, ScrollSource};
use dotspaces::settings::{MemorySettingsStore, SettingKey, SettingsStore};
use dotspaces::testing::FakeShell;
use dotspaces::{DotspaceContainer, Extension};

// ============================================================================
// Helpers
// ============================================================================

fn enable(shell: &FakeShell) -> Extension {
    Extension::enable(shell.host(), &DotspacesConfig::default()).unwrap()
}

fn container(extension: &Extension) -> &DotspaceContainer { extension.container().unwrap() }

fn stores(shell: &FakeShell) -> [&MemorySettingsStore; 2] {
    [&*shell.extension_settings, &*shell.window_manager_settings]
}

fn rendered_kinds(shell: &FakeShell) -> Vec<IconKind> {
    shell.row.rendered().iter().map(|w| w.icon.kind).collect()
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_pinned_windows_do_not_mark_workspaces_occupied() {
    let shell = FakeShell::new(&[0, 1, 0]);
    shell.workspaces.add_pinned_window("Conky");
    shell.workspaces.add_pinned_window("Gnome-shell");
    shell.workspaces.set_active(1);

    let _extension = enable(&shell);

    assert_eq!(rendered_kinds(&shell), vec![
        IconKind::InactiveUnoccupied,
        IconKind::Active,
        IconKind::Dynamic,
    ]);
}

#[test]
fn test_ignore_inactive_occupied_workspaces() {
    let shell = FakeShell::new(&[0, 2, 0]);
    let _extension = enable(&shell);
    assert_eq!(rendered_kinds(&shell)[1], IconKind::InactiveOccupied);

    shell
        .extension_settings
        .set_bool(SettingKey::IgnoreInactiveOccupiedWorkspaces, true)
        .unwrap();

    assert_eq!(rendered_kinds(&shell)[1], IconKind::InactiveUnoccupied);
    let classes = &shell.row.rendered()[1].style_classes;
    assert!(!classes.contains(&StyleClass::Occupied));
}

#[test]
fn test_dynamic_dot_sizes_follow_activity() {
    let shell = FakeShell::new(&[0, 0]);
    let extension = enable(&shell);

    assert_eq!(shell.row.rendered()[1].icon.size, 8);
    shell.workspaces.set_active(1);
    assert_eq!(shell.row.rendered()[1].icon.size, 12);

    container(&extension).set_policy(dotspaces::indicator::IconSizePolicy {
        dynamic_icon_size: DynamicIconSize::Constant(10),
        ..Default::default()
    });
    assert_eq!(shell.row.rendered()[1].icon.size, 10);
}

#[test]
fn test_disabling_dynamic_workspaces_drops_dynamic_dot() {
    let shell = FakeShell::new(&[0, 0, 0]);
    let _extension = enable(&shell);

    shell.window_manager_settings.set_bool(SettingKey::DynamicWorkspaces, false).unwrap();

    assert!(!rendered_kinds(&shell).contains(&IconKind::Dynamic));
}

// ============================================================================
// Reconciliation
// ============================================================================

#[test]
fn test_shrinking_rebuilds_row() {
    let shell = FakeShell::new(&[0, 0, 0, 0, 0]);
    let extension = enable(&shell);

    shell.workspaces.set_workspace_count(3);

    let report = container(&extension).last_report().unwrap();
    assert_eq!(report.destroyed, 5);
    assert_eq!(report.created, 3);
    assert_eq!(shell.row.live_widgets(), 3);
    assert_eq!(shell.row.created(), 8);
}

#[test]
fn test_growing_only_appends() {
    let shell = FakeShell::new(&[0, 0]);
    let extension = enable(&shell);

    shell.workspaces.add_workspace();

    let report = container(&extension).last_report().unwrap();
    assert_eq!(report.created, 1);
    assert_eq!(report.destroyed, 0);
    assert_eq!(shell.row.live_widgets(), 3);
}

#[test]
fn test_widget_count_matches_workspace_count_after_every_event() {
    let shell = FakeShell::new(&[1, 0, 0]);
    let extension = enable(&shell);

    shell.workspaces.add_workspace();
    shell.workspaces.set_active(3);
    shell.workspaces.add_window(2);
    shell.workspaces.remove_workspace();
    shell.workspaces.remove_workspace();
    shell.workspaces.remove_window(0);

    assert_eq!(shell.row.live_widgets(), 2);
    assert_eq!(container(&extension).indicator_count(), 2);
    let active: Vec<_> = container(&extension)
        .indicator_states()
        .iter()
        .map(|s| s.is_active)
        .collect();
    assert_eq!(active, vec![false, true]);
}

// ============================================================================
// Input
// ============================================================================

#[test]
fn test_scroll_cycles_with_wrap() {
    let shell = FakeShell::new(&[0, 0, 0]);
    shell.extension_settings.set_bool(SettingKey::WrapWorkspaces, true).unwrap();
    let _extension = enable(&shell);

    shell.row.scroll(ScrollDirection::Down);
    shell.row.scroll(ScrollDirection::Down);
    shell.row.scroll(ScrollDirection::Down);
    shell.row.scroll(ScrollDirection::Left);

    assert_eq!(shell.workspaces.activations(), vec![1, 2, 0]);
    assert_eq!(rendered_kinds(&shell)[0], IconKind::Active);
}

#[test]
fn test_scroll_clamps_at_last_workspace() {
    let shell = FakeShell::new(&[0, 0, 0]);
    shell.workspaces.set_active(2);
    let _extension = enable(&shell);

    shell.row.scroll(ScrollDirection::Down);

    assert_eq!(shell.workspaces.activations(), vec![2]);
}

#[test]
fn test_panel_scroll_toggle_swaps_source_back_and_forth() {
    let shell = FakeShell::new(&[0, 0, 0]);
    let extension = enable(&shell);

    for panel_scroll in [true, false, true] {
        shell.extension_settings.set_bool(SettingKey::PanelScroll, panel_scroll).unwrap();
        assert_eq!(
            container(&extension).scroll_source(),
            Some(ScrollSource::from_panel_scroll(panel_scroll))
        );
        assert_eq!(container(&extension).subscription_count(), 11);
    }

    shell.panel.scroll(ScrollDirection::Down);
    shell.row.scroll(ScrollDirection::Down);
    assert_eq!(shell.workspaces.activations(), vec![1]);
}

#[test]
fn test_clicking_active_dot_toggles_overview() {
    let shell = FakeShell::new(&[0, 0]);
    let _extension = enable(&shell);

    shell.row.click(0);
    shell.row.click(0);

    assert_eq!(shell.overview.toggles(), 2);
    assert!(shell.workspaces.activations().is_empty());
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_seeds_settings_before_enable() {
    let shell = FakeShell::new(&[0, 0]);
    let config = parse_config(
        r#"{
            // hide lone dots, keep the activities button
            "settings": { "hideDotsOnSingle": true, "keepActivities": true },
            "indicators": { "iconSize": 16 }
        }"#,
    )
    .unwrap();

    apply_settings(&config.settings, &stores(&shell));
    let _extension = Extension::enable(shell.host(), &config).unwrap();

    assert!(!shell.row.is_visible());
    assert!(shell.panel.activities_button().unwrap().is_visible());
    assert_eq!(shell.panel.status_items()[0].position, 1);
    assert_eq!(shell.row.rendered()[0].icon.size, 16);
}

#[test]
fn test_reloaded_settings_reach_the_row() {
    let shell = FakeShell::new(&[0, 0, 0]);
    let _extension = enable(&shell);
    assert!(shell.row.is_visible());

    let reload = SettingsConfig {
        hide_dots_on_single: Some(true),
        dynamic_workspaces: Some(false),
        ..SettingsConfig::default()
    };
    shell.workspaces.set_workspace_count(1);
    apply_settings(&reload, &stores(&shell));

    assert!(!shell.row.is_visible());
    assert!(!shell.window_manager_settings.get_bool(SettingKey::DynamicWorkspaces));
}

// ============================================================================
// Teardown
// ============================================================================

#[test]
fn test_disable_leaves_no_connections_behind() {
    let shell = FakeShell::new(&[0, 1, 0]);
    let mut extension = enable(&shell);
    shell.extension_settings.set_bool(SettingKey::PanelScroll, true).unwrap();

    assert!(extension.disable());

    assert_eq!(shell.workspaces.handler_count(), 0);
    assert_eq!(shell.panel.handler_count(), 0);
    assert_eq!(shell.row.handler_count(), 0);
    assert_eq!(shell.extension_settings.handler_count(), 0);
    assert_eq!(shell.window_manager_settings.handler_count(), 0);
    assert_eq!(shell.row.live_widgets(), 0);

    // Events after teardown touch nothing.
    shell.workspaces.add_workspace();
    shell.row.scroll(ScrollDirection::Down);
    assert_eq!(shell.row.live_widgets(), 0);
    assert!(shell.workspaces.activations().is_empty());
}

#[test]
fn test_enable_disable_cycles() {
    let shell = FakeShell::new(&[0, 0]);

    for _ in 0..3 {
        let mut extension = enable(&shell);
        assert_eq!(shell.row.live_widgets(), 2);
        assert!(extension.disable());
    }

    assert_eq!(shell.row.created(), 6);
    assert_eq!(shell.row.destroyed(), 6);
    assert!(shell.panel.status_items().is_empty());
}
