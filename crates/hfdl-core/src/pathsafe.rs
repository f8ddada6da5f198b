//! Relative-path validation for manifest entries.
//!
//! A manifest is remote input. An entry like `../../etc/cron.d/job` or an
//! absolute path must never escape the destination root, so every path is
//! checked before any directory is created or byte written.

use std::path::{Component, Path};

/// Returns true if `relative_path` is safe to join under a destination root:
/// non-empty, not absolute, and free of `..` components.
pub fn is_safe_relative_path(relative_path: &str) -> bool {
    if relative_path.is_empty() {
        return false;
    }
    let path = Path::new(relative_path);
    if path.is_absolute() {
        return false;
    }
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
