//! Menu markup model and the item state protocol.
//!
//! A [`MenuTree`] is the in-memory form of a menu's markup: an ordered list of
//! [`MenuItem`]s, each of which may carry a nested [`Submenu`]. Items are addressed
//! by their action id, the fragment after `#` in their `href`, so callers keep valid
//! references across submenu rebuilds.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Callback attached directly to a generated menu item.
#[derive(Clone)]
pub struct ItemCallback(Arc<dyn Fn() + Send + Sync + 'static>);

impl ItemCallback {
    /// Wrap a closure as an item callback.
    pub fn new(f: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Invoke the callback.
    pub fn call(&self) {
        (self.0)()
    }
}

impl fmt::Debug for ItemCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ItemCallback(..)")
    }
}

/// State of a tri-state checkbox.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckState {
    /// Not checked.
    #[default]
    Unchecked,
    /// Checked.
    Checked,
    /// Some but not all of the selection matches.
    Indeterminate,
}

impl CheckState {
    /// Map a boolean to `Checked`/`Unchecked`.
    pub fn from_bool(checked: bool) -> Self {
        if checked {
            Self::Checked
        } else {
            Self::Unchecked
        }
    }
}

/// The leading indicator drawn before an item's label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Indicator {
    /// No indicator.
    #[default]
    None,
    /// A check mark that is either drawn or transparent.
    Check { visible: bool },
    /// A tri-state checkbox.
    Checkbox { state: CheckState },
    /// An icon, optionally highlighted.
    Icon {
        name: String,
        #[serde(default)]
        highlighted: bool,
    },
}

/// A nested list rendered under its parent item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Submenu {
    /// Items of the nested list.
    #[serde(default)]
    pub items: Vec<MenuItem>,
    /// Cap the list height and scroll internally.
    #[serde(default)]
    pub scrollable: bool,
}

/// A single line in a menu.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItem {
    /// Link target; the action id is the fragment after `#`.
    #[serde(default)]
    pub href: Option<String>,
    /// Display label.
    pub label: String,
    /// Leading indicator.
    #[serde(default)]
    pub indicator: Indicator,
    /// Excluded from layout when set.
    #[serde(default)]
    pub hidden: bool,
    /// Swallows clicks when set.
    #[serde(default)]
    pub disabled: bool,
    /// Draws a separator line above the item.
    #[serde(default)]
    pub separator: bool,
    /// Nested submenu.
    #[serde(default)]
    pub submenu: Option<Submenu>,
    /// Callback run when the item is clicked, in addition to the menu action.
    #[serde(skip)]
    pub on_activate: Option<ItemCallback>,
}

impl MenuItem {
    /// Create an item whose href is `#<action>`.
    pub fn action(action: impl AsRef<str>, label: impl Into<String>) -> Self {
        Self { href: Some(format!("#{}", action.as_ref())), label: label.into(), ..Default::default() }
    }

    /// Create an item without a link target.
    pub fn plain(label: impl Into<String>) -> Self {
        Self { label: label.into(), ..Default::default() }
    }

    /// Builder: set the leading indicator.
    pub fn indicator(mut self, indicator: Indicator) -> Self {
        self.indicator = indicator;
        self
    }

    /// Builder: set an icon indicator.
    pub fn icon(self, name: impl Into<String>) -> Self {
        self.indicator(Indicator::Icon { name: name.into(), highlighted: false })
    }

    /// Builder: draw a separator above the item.
    pub fn separator(mut self, separator: bool) -> Self {
        self.separator = separator;
        self
    }

    /// Builder: attach a nested submenu.
    pub fn submenu(mut self, items: Vec<MenuItem>, scrollable: bool) -> Self {
        self.submenu = Some(Submenu { items, scrollable });
        self
    }

    /// Builder: attach a click callback.
    pub fn on_activate(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_activate = Some(ItemCallback::new(f));
        self
    }

    /// The action id encoded in the href, if any.
    pub fn action_id(&self) -> Option<&str> {
        self.href.as_deref().and_then(|href| href.split_once('#')).map(|(_, action)| action)
    }

    /// Whether the item takes part in layout.
    pub fn is_visible(&self) -> bool {
        !self.hidden
    }

    /// Whether the leading indicator reads as checked.
    pub fn is_checked(&self) -> bool {
        match &self.indicator {
            Indicator::Check { visible } => *visible,
            Indicator::Checkbox { state } => *state == CheckState::Checked,
            _ => false,
        }
    }

    fn submenu_items(&self) -> &[MenuItem] {
        self.submenu.as_ref().map(|s| s.items.as_slice()).unwrap_or(&[])
    }
}

/// Index path from the root list down to an item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ItemPath(pub SmallVec<[usize; 4]>);

impl ItemPath {
    /// Path of a root-level item.
    pub fn root(index: usize) -> Self {
        Self(SmallVec::from_slice(&[index]))
    }

    /// Path of a child of this item.
    pub fn child(&self, index: usize) -> Self {
        let mut path = self.0.clone();
        path.push(index);
        Self(path)
    }
}

/// The markup of one menu.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuTree {
    /// Element id of the menu root. Filled from the document key when empty.
    #[serde(default)]
    pub id: String,
    /// Root-level items.
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

impl MenuTree {
    /// Create a menu tree.
    pub fn new(id: impl Into<String>, items: Vec<MenuItem>) -> Self {
        Self { id: id.into(), items }
    }

    /// Resolve a path to an item.
    pub fn item(&self, path: &ItemPath) -> Option<&MenuItem> {
        let (first, rest) = path.0.split_first()?;
        let mut item = self.items.get(*first)?;
        for index in rest {
            item = item.submenu_items().get(*index)?;
        }
        Some(item)
    }

    /// Find the path of the item carrying `action`, searching nested submenus.
    pub fn find_path(&self, action: &str) -> Option<ItemPath> {
        fn search(items: &[MenuItem], action: &str, prefix: &ItemPath) -> Option<ItemPath> {
            for (index, item) in items.iter().enumerate() {
                let path = if prefix.0.is_empty() { ItemPath::root(index) } else { prefix.child(index) };
                if item.action_id() == Some(action) {
                    return Some(path);
                }
                if let Some(found) = search(item.submenu_items(), action, &path) {
                    return Some(found);
                }
            }
            None
        }
        search(&self.items, action, &ItemPath::default())
    }

    /// Find the item carrying `action`.
    pub fn find(&self, action: &str) -> Option<&MenuItem> {
        self.find_path(action).and_then(|path| self.item(&path))
    }

    fn find_mut(&mut self, action: &str) -> Option<&mut MenuItem> {
        fn search<'a>(items: &'a mut [MenuItem], action: &str) -> Option<&'a mut MenuItem> {
            for item in items.iter_mut() {
                if item.action_id() == Some(action) {
                    return Some(item);
                }
                if let Some(submenu) = item.submenu.as_mut() {
                    if let Some(found) = search(&mut submenu.items, action) {
                        return Some(found);
                    }
                }
            }
            None
        }
        search(&mut self.items, action)
    }

    /// Apply `f` to the item carrying `action`; logs and returns false when it is missing.
    fn update(&mut self, action: &str, op: &'static str, f: impl FnOnce(&mut MenuItem)) -> bool {
        match self.find_mut(action) {
            Some(item) => {
                f(item);
                true
            }
            None => {
                tracing::warn!(menu = %self.id, action, op, "Menu item not found");
                false
            }
        }
    }

    // ========== Item State Protocol ==========

    /// Include the item in layout.
    pub fn show_item(&mut self, action: &str) -> bool {
        self.update(action, "show", |item| item.hidden = false)
    }

    /// Exclude the item from layout.
    pub fn hide_item(&mut self, action: &str) -> bool {
        self.update(action, "hide", |item| item.hidden = true)
    }

    /// Enable or disable the item.
    pub fn set_enabled(&mut self, action: &str, enabled: bool) -> bool {
        self.update(action, "set_enabled", |item| item.disabled = !enabled)
    }

    /// Set the boolean checked state.
    ///
    /// Checkboxes become `Checked`/`Unchecked` and plain items gain a check mark.
    /// Icon items keep their icon and are left unchanged.
    pub fn set_checked(&mut self, action: &str, checked: bool) -> bool {
        let menu = self.id.clone();
        self.update(action, "set_checked", |item| match &mut item.indicator {
            Indicator::Checkbox { state } => *state = CheckState::from_bool(checked),
            Indicator::Icon { name, .. } => {
                tracing::warn!(menu = %menu, action, icon = %name, "Icon item cannot be checked");
            }
            indicator => *indicator = Indicator::Check { visible: checked },
        })
    }

    /// Read the boolean checked state. Missing items read as unchecked.
    pub fn is_checked(&self, action: &str) -> bool {
        self.find(action).is_some_and(MenuItem::is_checked)
    }

    /// Set a tri-state checkbox state.
    pub fn set_check_state(&mut self, action: &str, state: CheckState) -> bool {
        self.update(action, "set_check_state", |item| {
            item.indicator = Indicator::Checkbox { state };
        })
    }

    /// Read a checkbox state. Check marks map to `Checked`/`Unchecked`.
    pub fn check_state(&self, action: &str) -> Option<CheckState> {
        self.find(action).map(|item| match &item.indicator {
            Indicator::Checkbox { state } => *state,
            _ => CheckState::from_bool(item.is_checked()),
        })
    }

    /// Toggle the separator line above the item.
    pub fn set_separator(&mut self, action: &str, separator: bool) -> bool {
        self.update(action, "set_separator", |item| item.separator = separator)
    }

    /// Toggle the highlight of an icon indicator.
    pub fn set_highlighted(&mut self, action: &str, highlighted: bool) -> bool {
        self.update(action, "set_highlighted", |item| {
            if let Indicator::Icon { highlighted: h, .. } = &mut item.indicator {
                *h = highlighted;
            }
        })
    }

    /// Replace the nested items under `action`, keeping the submenu's scroll flag.
    pub fn replace_submenu(&mut self, action: &str, items: Vec<MenuItem>) -> bool {
        self.update(action, "replace_submenu", |item| match item.submenu.as_mut() {
            Some(submenu) => submenu.items = items,
            None => item.submenu = Some(Submenu { items, scrollable: false }),
        })
    }
}
