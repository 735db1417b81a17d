//! Per-menu content adapters.
//!
//! Before every show, the engine asks its [`ContentAdapter`] which items to show,
//! hide, enable or check for the current selection. Adapters return an
//! [`ItemChanges`] list instead of touching the menu, so their decisions can be
//! tested without an engine.

use smallvec::SmallVec;

use crate::models::{CheckState, MenuItem, MenuTree, Point, Target};

/// A single item state change.
#[derive(Debug, Clone)]
pub enum ItemChange {
    /// Include the item in layout.
    Show(String),
    /// Exclude the item from layout.
    Hide(String),
    /// Enable or disable the item.
    Enabled(String, bool),
    /// Set the boolean checked state.
    Checked(String, bool),
    /// Set a tri-state checkbox.
    CheckState(String, CheckState),
    /// Toggle the separator above the item.
    Separator(String, bool),
    /// Toggle the icon highlight.
    Highlighted(String, bool),
    /// Replace the nested list under the item.
    ReplaceSubmenu(String, Vec<MenuItem>),
}

/// Ordered list of item state changes.
#[derive(Debug, Clone, Default)]
pub struct ItemChanges {
    changes: SmallVec<[ItemChange; 16]>,
}

impl ItemChanges {
    /// Create an empty change list.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, change: ItemChange) -> Self {
        self.changes.push(change);
        self
    }

    /// Show `action`.
    pub fn show(self, action: impl Into<String>) -> Self {
        self.push(ItemChange::Show(action.into()))
    }

    /// Hide `action`.
    pub fn hide(self, action: impl Into<String>) -> Self {
        self.push(ItemChange::Hide(action.into()))
    }

    /// Show `action` when `visible`, hide it otherwise.
    pub fn visible(self, action: impl Into<String>, visible: bool) -> Self {
        if visible {
            self.show(action)
        } else {
            self.hide(action)
        }
    }

    /// Enable or disable `action`.
    pub fn enabled(self, action: impl Into<String>, enabled: bool) -> Self {
        self.push(ItemChange::Enabled(action.into(), enabled))
    }

    /// Check or uncheck `action`.
    pub fn checked(self, action: impl Into<String>, checked: bool) -> Self {
        self.push(ItemChange::Checked(action.into(), checked))
    }

    /// Set the checkbox state of `action`.
    pub fn check_state(self, action: impl Into<String>, state: CheckState) -> Self {
        self.push(ItemChange::CheckState(action.into(), state))
    }

    /// Toggle the separator above `action`.
    pub fn separator(self, action: impl Into<String>, separator: bool) -> Self {
        self.push(ItemChange::Separator(action.into(), separator))
    }

    /// Toggle the icon highlight of `action`.
    pub fn highlighted(self, action: impl Into<String>, highlighted: bool) -> Self {
        self.push(ItemChange::Highlighted(action.into(), highlighted))
    }

    /// Replace the nested list under `action`.
    pub fn replace_submenu(self, action: impl Into<String>, items: Vec<MenuItem>) -> Self {
        self.push(ItemChange::ReplaceSubmenu(action.into(), items))
    }

    /// Append every change of `other`.
    pub fn extend(mut self, other: ItemChanges) -> Self {
        self.changes.extend(other.changes);
        self
    }

    /// Whether there is nothing to apply.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of changes.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Iterate over the changes in order.
    pub fn iter(&self) -> impl Iterator<Item = &ItemChange> {
        self.changes.iter()
    }

    /// Final visibility `action` ends up with, if any change touches it.
    pub fn visibility_of(&self, action: &str) -> Option<bool> {
        self.changes.iter().rev().find_map(|change| match change {
            ItemChange::Show(id) if id == action => Some(true),
            ItemChange::Hide(id) if id == action => Some(false),
            _ => None,
        })
    }

    /// Final enabled state `action` ends up with, if any change touches it.
    pub fn enabled_of(&self, action: &str) -> Option<bool> {
        self.changes.iter().rev().find_map(|change| match change {
            ItemChange::Enabled(id, enabled) if id == action => Some(*enabled),
            _ => None,
        })
    }

    /// Final checked state `action` ends up with, if any change touches it.
    pub fn checked_of(&self, action: &str) -> Option<bool> {
        self.changes.iter().rev().find_map(|change| match change {
            ItemChange::Checked(id, checked) if id == action => Some(*checked),
            _ => None,
        })
    }

    /// Final separator flag `action` ends up with, if any change touches it.
    pub fn separator_of(&self, action: &str) -> Option<bool> {
        self.changes.iter().rev().find_map(|change| match change {
            ItemChange::Separator(id, separator) if id == action => Some(*separator),
            _ => None,
        })
    }

    /// Apply every change to `tree` in order. Unknown ids are skipped.
    pub fn apply(self, tree: &mut MenuTree) {
        for change in self.changes {
            match change {
                ItemChange::Show(id) => tree.show_item(&id),
                ItemChange::Hide(id) => tree.hide_item(&id),
                ItemChange::Enabled(id, enabled) => tree.set_enabled(&id, enabled),
                ItemChange::Checked(id, checked) => tree.set_checked(&id, checked),
                ItemChange::CheckState(id, state) => tree.set_check_state(&id, state),
                ItemChange::Separator(id, separator) => tree.set_separator(&id, separator),
                ItemChange::Highlighted(id, highlighted) => tree.set_highlighted(&id, highlighted),
                ItemChange::ReplaceSubmenu(id, items) => tree.replace_submenu(&id, items),
            };
        }
    }
}

/// What an adapter may look at while recomputing.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdapterContext<'a> {
    /// The element the menu was opened on.
    pub element: Option<&'a Target>,
}

/// Recomputes a menu's item states from application state.
pub trait ContentAdapter: Send + Sync {
    /// Item changes for the current selection, applied before every show.
    fn recompute(&self, cx: &AdapterContext<'_>) -> ItemChanges;

    /// Rebuild dynamic submenus from their registries.
    fn rebuild_submenus(&self) -> ItemChanges {
        ItemChanges::new()
    }

    /// Origin of the positioned container the menu lives in.
    fn placement_origin(&self) -> Point {
        Point::default()
    }
}

/// Adapter for menus whose content never changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContent;

impl ContentAdapter for NoContent {
    fn recompute(&self, _cx: &AdapterContext<'_>) -> ItemChanges {
        ItemChanges::new()
    }
}
