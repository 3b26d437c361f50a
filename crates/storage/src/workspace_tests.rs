// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Duration;
use rw_core::FixedClock;
use tempfile::tempdir;

fn manager(base: &Path) -> (WorkspaceManager, FixedClock) {
    let clock = FixedClock::at("2026-03-01T09:30:00Z");
    (WorkspaceManager::new(base, Arc::new(clock.clone())), clock)
}

#[test]
fn create_builds_timestamped_dir_with_assets() {
    let dir = tempdir().unwrap();
    let (manager, _) = manager(dir.path());
    let workspace = manager.create().unwrap();

    let name = workspace.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("20260301-093000-"));
    assert!(workspace.join("assets").is_dir());
    assert!(workspace.starts_with(dir.path().join("runs")));
}

#[test]
fn guard_leaves_directory_in_place_after_drop() {
    let dir = tempdir().unwrap();
    let (manager, _) = manager(dir.path());
    let path = {
        let guard = manager.acquire().unwrap();
        guard.path().to_path_buf()
    };
    assert!(path.is_dir(), "workspace must persist for crash recovery");
}

#[test]
fn list_returns_workspaces_in_chronological_order() {
    let dir = tempdir().unwrap();
    let (manager, clock) = manager(dir.path());
    let first = manager.create().unwrap();
    clock.advance(Duration::seconds(2));
    let second = manager.create().unwrap();

    let listed = manager.list().unwrap();
    assert_eq!(listed, vec![first, second]);
}

#[test]
fn list_on_missing_base_is_empty() {
    let dir = tempdir().unwrap();
    let (manager, _) = manager(&dir.path().join("nope"));
    assert!(manager.list().unwrap().is_empty());
}
