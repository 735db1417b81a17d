//! Tracks the menu that was shown last.
//!
//! Every engine sharing a registry obeys one rule: at most one of them is shown.
//! `ContextMenu::show` hides the previous entry before fading itself in.

use std::sync::{Arc, OnceLock, Weak};

use parking_lot::Mutex;

use crate::menu::{ContextMenu, ContextMenuInner};

/// Shared cell holding the last shown menu.
#[derive(Clone, Default)]
pub struct MenuRegistry {
    last_shown: Arc<Mutex<Option<Weak<ContextMenuInner>>>>,
}

impl MenuRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The page-wide registry used when a menu is not given one.
    pub fn global() -> MenuRegistry {
        static GLOBAL: OnceLock<MenuRegistry> = OnceLock::new();
        GLOBAL.get_or_init(MenuRegistry::new).clone()
    }

    /// The menu shown last, if it is still alive.
    pub fn last_shown(&self) -> Option<ContextMenu> {
        self.last_shown.lock().as_ref().and_then(Weak::upgrade).map(ContextMenu::from_inner)
    }

    /// The menu currently on screen or fading in.
    pub fn shown(&self) -> Option<ContextMenu> {
        self.last_shown().filter(ContextMenu::is_shown)
    }

    pub(crate) fn record(&self, menu: &ContextMenu) {
        *self.last_shown.lock() = Some(menu.downgrade());
    }

    /// Click anywhere on the document: dismiss the open menu.
    pub fn document_click(&self) {
        if let Some(menu) = self.last_shown() {
            menu.hide();
        }
    }
}

impl std::fmt::Debug for MenuRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let last = self.last_shown().map(|m| m.id());
        f.debug_struct("MenuRegistry").field("last_shown", &last).finish()
    }
}
