//! Side panel filter list menus: statuses, categories, tags and trackers.
//!
//! Every filter menu keeps its bulk torrent actions enabled only while the
//! transfer list has rows. [`RowCountObserver`] follows row mutations between
//! shows.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use ctxmenu_core::{AdapterContext, ContentAdapter, ContextMenu, ItemChanges};

use crate::tables::{FilterSettings, TorrentsTable};

/// Id of the "All" entry of every filter list.
pub const FILTER_ALL: i64 = 1;
/// Id of the "Uncategorized" category entry.
pub const CATEGORIES_UNCATEGORIZED: i64 = 2;
/// Id of the "Untagged" tag entry.
pub const TAGS_UNTAGGED: i64 = 2;
/// Id of the "Trackerless" tracker entry.
pub const TRACKERS_TRACKERLESS: i64 = 2;

/// Which filter list a menu belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Statuses,
    Categories,
    Tags,
    Trackers,
}

impl FilterKind {
    /// Id of the list's second pseudo-entry, if it has one.
    fn sentinel(self) -> Option<i64> {
        match self {
            FilterKind::Statuses => None,
            FilterKind::Categories => Some(CATEGORIES_UNCATEGORIZED),
            FilterKind::Tags => Some(TAGS_UNTAGGED),
            FilterKind::Trackers => Some(TRACKERS_TRACKERLESS),
        }
    }
}

/// Whether an entry id names a pseudo-entry of `kind`.
///
/// Ids that are not numbers are real entries.
pub fn is_pseudo_entry(kind: FilterKind, element_id: &str) -> bool {
    match element_id.trim().parse::<i64>() {
        Ok(id) => id == FILTER_ALL || Some(id) == kind.sentinel(),
        Err(_) => false,
    }
}

/// Bulk actions enabled iff the transfer list has rows.
pub fn torrent_actions(has_rows: bool) -> ItemChanges {
    ItemChanges::new()
        .enabled("startTorrents", has_rows)
        .enabled("stopTorrents", has_rows)
        .enabled("deleteTorrents", has_rows)
}

/// Entry-specific item changes for a click on `element_id`.
pub fn entry_changes(kind: FilterKind, element_id: Option<&str>, use_subcategories: bool) -> ItemChanges {
    let real = element_id.is_some_and(|id| !is_pseudo_entry(kind, id));
    match kind {
        FilterKind::Statuses => ItemChanges::new(),
        FilterKind::Categories => ItemChanges::new()
            .visible("editCategory", real)
            .visible("deleteCategory", real)
            .visible("createSubcategory", real && use_subcategories),
        FilterKind::Tags => ItemChanges::new().visible("deleteTag", real),
        FilterKind::Trackers => ItemChanges::new().visible("deleteTracker", real),
    }
}

/// Content adapter shared by the filter list menus.
pub struct FilterListAdapter {
    kind: FilterKind,
    table: Arc<dyn TorrentsTable>,
    settings: Arc<dyn FilterSettings>,
}

impl FilterListAdapter {
    /// Create a new adapter for the filter list of `kind`.
    pub fn new(kind: FilterKind, table: Arc<dyn TorrentsTable>, settings: Arc<dyn FilterSettings>) -> Self {
        Self { kind, table, settings }
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }
}

impl ContentAdapter for FilterListAdapter {
    fn recompute(&self, cx: &AdapterContext<'_>) -> ItemChanges {
        let element = cx.element.map(|t| t.id.as_str());
        entry_changes(self.kind, element, self.settings.use_subcategories())
            .extend(torrent_actions(self.table.row_count() > 0))
    }
}

// ============================================================================
// Row count observation
// ============================================================================

/// Publisher of transfer list row counts.
///
/// Backed by a `watch` channel: observers only see the latest count, however many
/// mutations happened since they last looked.
#[derive(Debug, Clone)]
pub struct RowCountFeed {
    tx: Arc<watch::Sender<usize>>,
}

impl RowCountFeed {
    /// Create a new feed publishing `rows`.
    pub fn new(rows: usize) -> Self {
        let (tx, _rx) = watch::channel(rows);
        Self { tx: Arc::new(tx) }
    }

    /// Report a mutation of the transfer list body.
    pub fn publish(&self, rows: usize) {
        self.tx.send_replace(rows);
    }

    /// Latest published count.
    pub fn rows(&self) -> usize {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<usize> {
        self.tx.subscribe()
    }
}

impl Default for RowCountFeed {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Keeps a filter menu's bulk actions in sync with the transfer list while started.
#[derive(Debug)]
pub struct RowCountObserver {
    feed: RowCountFeed,
    rx: Mutex<Option<watch::Receiver<usize>>>,
}

impl RowCountObserver {
    /// Create a new observer of `feed`. It is idle until [`start`](Self::start).
    pub fn new(feed: RowCountFeed) -> Self {
        Self { feed, rx: Mutex::new(None) }
    }

    /// Start observing. Mutations published before this call are not reported.
    pub fn start(&self) {
        let mut rx = self.rx.lock();
        if rx.is_none() {
            tracing::debug!("Row count observer started");
            *rx = Some(self.feed.subscribe());
        }
    }

    /// Stop observing and drop the subscription.
    pub fn stop(&self) {
        if self.rx.lock().take().is_some() {
            tracing::debug!("Row count observer stopped");
        }
    }

    pub fn is_observing(&self) -> bool {
        self.rx.lock().is_some()
    }

    /// Apply pending mutations to `menu`.
    ///
    /// Any number of mutations since the last pump cause one update. Returns
    /// whether the menu was updated.
    pub fn pump(&self, menu: &ContextMenu) -> bool {
        let rows = {
            let mut guard = self.rx.lock();
            let Some(rx) = guard.as_mut() else {
                return false;
            };
            if !rx.has_changed().unwrap_or(false) {
                return false;
            }
            let rows = *rx.borrow_and_update();
            rows
        };

        tracing::trace!(rows, "Transfer list mutated");
        menu.apply_changes(torrent_actions(rows > 0));
        true
    }
}
