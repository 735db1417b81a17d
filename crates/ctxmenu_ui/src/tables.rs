//! Read interfaces of the tables and registries the adapters consult.
//!
//! The control panel owns the real widgets; adapters only see these traits.

use serde::{Deserialize, Serialize};

use crate::torrents::TorrentRow;

/// One entry of a tag or category registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    /// Stable identifier handed back to [`TorrentActions`].
    pub id: String,
    /// Display name, also used in the item href.
    pub name: String,
}

impl RegistryEntry {
    /// Create a new entry.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

/// The transfer list.
pub trait TorrentsTable: Send + Sync {
    /// Selected rows in selection order.
    fn selected_rows(&self) -> Vec<TorrentRow>;

    /// Rows currently rendered.
    fn row_count(&self) -> usize;
}

/// Tag or category registry.
pub trait Registry: Send + Sync {
    /// Entries in registry order.
    fn entries(&self) -> Vec<RegistryEntry>;
}

impl Registry for Vec<RegistryEntry> {
    fn entries(&self) -> Vec<RegistryEntry> {
        self.clone()
    }
}

/// Operations applied to the current transfer list selection.
pub trait TorrentActions: Send + Sync {
    /// Ask for new tags to add.
    fn add_tags(&self);

    /// Remove every tag.
    fn remove_all_tags(&self);

    /// Add or remove one tag.
    fn set_tag(&self, tag_id: &str, add: bool);

    /// Ask for a new category.
    fn new_category(&self);

    /// Move to a category; `None` resets to uncategorized.
    fn set_category(&self, category_id: Option<&str>);
}

/// The search plugins table.
pub trait SearchPluginsTable: Send + Sync {
    /// Header cell texts.
    fn header(&self) -> Vec<String>;

    /// Cell texts of one row.
    fn cells(&self, row_id: &str) -> Vec<String>;
}

/// The RSS feed tree.
pub trait RssFeedTable: Send + Sync {
    /// Selected row ids.
    fn selected_rows(&self) -> Vec<String>;

    /// Data uid of a row; empty for folders.
    fn data_uid(&self, row_id: &str) -> Option<String>;
}

/// The RSS downloader rules list.
pub trait RssRulesTable: Send + Sync {
    /// Selected rule names.
    fn selected_rows(&self) -> Vec<String>;
}

/// Preferences consulted by the filter list menus.
pub trait FilterSettings: Send + Sync {
    /// Whether categories may nest.
    fn use_subcategories(&self) -> bool;
}

impl FilterSettings for bool {
    fn use_subcategories(&self) -> bool {
        *self
    }
}
