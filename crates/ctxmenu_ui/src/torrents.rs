//! Transfer list menu.
//!
//! [`summarize`] folds the selected rows into a [`SelectionSummary`];
//! [`summary_changes`] turns the summary into item changes. The adapter adds the
//! tag checkbox and category highlight states on top.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use ctxmenu_core::{AdapterContext, ContentAdapter, ItemChanges};

use crate::filters::RowCountFeed;
use crate::submenu::{
    category_action, category_entries, render_category_submenu, render_tag_submenu, tag_action,
    tag_entries, CATEGORY_ITEM, TAGS_ITEM,
};
use crate::tables::{Registry, TorrentActions, TorrentsTable};

/// Field data of one transfer list row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TorrentRow {
    /// Row id, the torrent's info hash.
    pub hash: String,
    /// Sequential download enabled.
    pub seq_dl: bool,
    /// First and last pieces downloaded first.
    pub f_l_piece_prio: bool,
    /// Fraction downloaded, 1.0 when complete.
    pub progress: f64,
    pub super_seeding: bool,
    /// Server state name such as `stoppedDL` or `metaDL`.
    pub state: String,
    pub force_start: bool,
    /// Automatic torrent management.
    pub auto_tmm: bool,
    /// Empty when the torrent has no v1 hash.
    pub infohash_v1: String,
    /// Empty when the torrent has no v2 hash.
    pub infohash_v2: String,
    /// Comma separated, `", "` delimited.
    pub tags: String,
    /// Category name, empty when uncategorized.
    pub category: String,
    /// -1 while metadata is unknown.
    pub total_size: i64,
}

impl TorrentRow {
    fn is_stopped(&self) -> bool {
        matches!(self.state.as_str(), "stoppedUP" | "stoppedDL")
    }

    fn has_metadata(&self) -> bool {
        !matches!(self.state.as_str(), "metaDL" | "forcedMetaDL") && self.total_size != -1
    }

    /// Tags of the row.
    pub fn tag_list(&self) -> impl Iterator<Item = &str> {
        self.tags.split(", ").filter(|t| !t.is_empty())
    }
}

/// Aggregate of the selected rows.
///
/// `all_*` flags start true and `there_are_*` flags start false, so an empty
/// selection reads as "all" of everything.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSummary {
    /// Number of selected rows.
    pub selected: usize,
    pub all_seq_dl: bool,
    pub there_are_seq_dl: bool,
    pub all_f_l_piece_prio: bool,
    pub there_are_f_l_piece_prio: bool,
    pub all_downloaded: bool,
    /// Among downloaded rows.
    pub all_super_seeding: bool,
    pub all_stopped: bool,
    pub there_are_stopped: bool,
    pub all_force_start: bool,
    pub there_are_force_start: bool,
    pub all_auto_tmm: bool,
    pub there_are_auto_tmm: bool,
    pub there_are_v1_hashes: bool,
    pub there_are_v2_hashes: bool,
    /// Selected rows carrying each tag.
    pub tag_counts: HashMap<String, usize>,
    /// Selected rows in each category, keyed by name.
    pub category_counts: HashMap<String, usize>,
    /// Single row whose metadata has been downloaded.
    pub can_rename: bool,
}

impl Default for SelectionSummary {
    fn default() -> Self {
        Self {
            selected: 0,
            all_seq_dl: true,
            there_are_seq_dl: false,
            all_f_l_piece_prio: true,
            there_are_f_l_piece_prio: false,
            all_downloaded: true,
            all_super_seeding: true,
            all_stopped: true,
            there_are_stopped: false,
            all_force_start: true,
            there_are_force_start: false,
            all_auto_tmm: true,
            there_are_auto_tmm: false,
            there_are_v1_hashes: false,
            there_are_v2_hashes: false,
            tag_counts: HashMap::new(),
            category_counts: HashMap::new(),
            can_rename: false,
        }
    }
}

/// Fold the selected rows into a summary.
pub fn summarize(rows: &[TorrentRow]) -> SelectionSummary {
    let mut s = SelectionSummary { selected: rows.len(), ..Default::default() };

    for row in rows {
        s.all_seq_dl &= row.seq_dl;
        s.there_are_seq_dl |= row.seq_dl;
        s.all_f_l_piece_prio &= row.f_l_piece_prio;
        s.there_are_f_l_piece_prio |= row.f_l_piece_prio;

        if row.progress != 1.0 {
            s.all_downloaded = false;
        } else if !row.super_seeding {
            s.all_super_seeding = false;
        }

        let stopped = row.is_stopped();
        s.all_stopped &= stopped;
        s.there_are_stopped |= stopped;
        s.all_force_start &= row.force_start;
        s.there_are_force_start |= row.force_start;
        s.all_auto_tmm &= row.auto_tmm;
        s.there_are_auto_tmm |= row.auto_tmm;

        s.there_are_v1_hashes |= !row.infohash_v1.is_empty();
        s.there_are_v2_hashes |= !row.infohash_v2.is_empty();

        for tag in row.tag_list() {
            *s.tag_counts.entry(tag.to_string()).or_default() += 1;
        }
        *s.category_counts.entry(row.category.clone()).or_default() += 1;
    }

    s.can_rename = matches!(rows, [row] if row.has_metadata());
    s
}

/// Item changes for a selection summary.
pub fn summary_changes(s: &SelectionSummary) -> ItemChanges {
    let mut changes = ItemChanges::new().visible("renameFiles", s.can_rename);

    if s.all_downloaded {
        changes = changes
            .hide("downloadLimit")
            .separator("uploadLimit", true)
            .hide("sequentialDownload")
            .hide("firstLastPiecePrio")
            .show("superSeeding")
            .checked("superSeeding", s.all_super_seeding);
    } else {
        let show_seq_dl = s.all_seq_dl || !s.there_are_seq_dl;
        let show_f_l_piece_prio = s.all_f_l_piece_prio || !s.there_are_f_l_piece_prio;

        changes = changes
            .separator("firstLastPiecePrio", !show_seq_dl && show_f_l_piece_prio)
            .visible("sequentialDownload", show_seq_dl)
            .visible("firstLastPiecePrio", show_f_l_piece_prio)
            .checked("sequentialDownload", s.all_seq_dl)
            .checked("firstLastPiecePrio", s.all_f_l_piece_prio)
            .show("downloadLimit")
            .separator("uploadLimit", false)
            .hide("superSeeding");
    }

    changes = changes.show("start").show("stop").show("forceStart");
    if s.all_stopped {
        changes = changes.hide("stop");
    } else if s.all_force_start {
        changes = changes.hide("forceStart");
    } else if !s.there_are_stopped && !s.there_are_force_start {
        changes = changes.hide("start");
    }

    if !s.all_auto_tmm && s.there_are_auto_tmm {
        changes = changes.hide("autoTorrentManagement");
    } else {
        changes = changes.show("autoTorrentManagement").checked("autoTorrentManagement", s.all_auto_tmm);
    }

    changes
        .enabled("copyInfohash1", s.there_are_v1_hashes)
        .enabled("copyInfohash2", s.there_are_v2_hashes)
}

/// Content adapter of the transfer list menu.
pub struct TorrentsTableAdapter {
    table: Arc<dyn TorrentsTable>,
    tags: Arc<dyn Registry>,
    categories: Arc<dyn Registry>,
    actions: Arc<dyn TorrentActions>,
}

impl TorrentsTableAdapter {
    /// Create a new adapter over the transfer list and the tag and category registries.
    pub fn new(
        table: Arc<dyn TorrentsTable>,
        tags: Arc<dyn Registry>,
        categories: Arc<dyn Registry>,
        actions: Arc<dyn TorrentActions>,
    ) -> Self {
        Self { table, tags, categories, actions }
    }
}

impl ContentAdapter for TorrentsTableAdapter {
    fn recompute(&self, _cx: &AdapterContext<'_>) -> ItemChanges {
        let summary = summarize(&self.table.selected_rows());
        tracing::debug!(selected = summary.selected, "Recomputing transfer list menu");

        let mut changes = summary_changes(&summary);
        for entry in tag_entries(&self.tags.entries(), &summary.tag_counts, summary.selected) {
            changes = changes.check_state(tag_action(&entry.name), entry.state);
        }
        for entry in category_entries(&self.categories.entries(), &summary.category_counts, summary.selected) {
            changes = changes.highlighted(category_action(&entry.name), entry.highlighted);
        }
        changes
    }

    fn rebuild_submenus(&self) -> ItemChanges {
        let tags = tag_entries(&self.tags.entries(), &HashMap::new(), 0);
        let categories = category_entries(&self.categories.entries(), &HashMap::new(), 0);
        tracing::debug!(tags = tags.len(), categories = categories.len(), "Rebuilding transfer list submenus");

        ItemChanges::new()
            .replace_submenu(TAGS_ITEM, render_tag_submenu(&tags, self.table.clone(), self.actions.clone()))
            .replace_submenu(CATEGORY_ITEM, render_category_submenu(&categories, self.actions.clone()))
    }
}

/// In-memory transfer list, for replays and tests.
#[derive(Default)]
pub struct TorrentList {
    rows: Mutex<Vec<TorrentRow>>,
    selected: Mutex<Vec<String>>,
    feed: RowCountFeed,
}

impl TorrentList {
    /// Create a new list with nothing selected.
    pub fn new(rows: Vec<TorrentRow>) -> Self {
        let list = Self::default();
        list.set_rows(rows);
        list
    }

    /// Replace all rows and publish the new row count.
    pub fn set_rows(&self, rows: Vec<TorrentRow>) {
        let count = rows.len();
        {
            let mut current = self.rows.lock();
            *current = rows;
            self.selected.lock().retain(|hash| current.iter().any(|r| &r.hash == hash));
        }
        self.feed.publish(count);
    }

    /// Select rows by hash, replacing the selection.
    pub fn select<I, S>(&self, hashes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.selected.lock() = hashes.into_iter().map(Into::into).collect();
    }

    /// Feed notified on every row mutation.
    pub fn feed(&self) -> &RowCountFeed {
        &self.feed
    }
}

impl TorrentsTable for TorrentList {
    fn selected_rows(&self) -> Vec<TorrentRow> {
        let rows = self.rows.lock();
        self.selected
            .lock()
            .iter()
            .filter_map(|hash| rows.iter().find(|r| &r.hash == hash).cloned())
            .collect()
    }

    fn row_count(&self) -> usize {
        self.rows.lock().len()
    }
}
