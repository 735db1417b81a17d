//! RSS reader menus: feeds, articles and downloader rules.

use std::sync::Arc;

use ctxmenu_core::{AdapterContext, ContentAdapter, ItemChanges, Point};

use crate::tables::{RssFeedTable, RssRulesTable};

/// Row id of the "Unread" pseudo-feed.
pub const UNREAD_ROW: &str = "0";

/// What is selected in the feed tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSelection {
    Nothing,
    Unread,
    Folder,
    Feed,
    Multiple,
}

impl FeedSelection {
    /// Classify the current selection of `table`.
    pub fn classify(table: &dyn RssFeedTable) -> Self {
        match table.selected_rows().as_slice() {
            [] => FeedSelection::Nothing,
            [row] if row == UNREAD_ROW => FeedSelection::Unread,
            [row] => match table.data_uid(row) {
                Some(uid) if uid.is_empty() => FeedSelection::Folder,
                _ => FeedSelection::Feed,
            },
            _ => FeedSelection::Multiple,
        }
    }
}

const FEED_ITEMS: [&str; 9] = [
    "update",
    "markRead",
    "rename",
    "edit",
    "delete",
    "newSubscription",
    "newFolder",
    "updateAll",
    "copyFeedURL",
];

/// Feed menu items for a selection, in [`FEED_ITEMS`] order.
fn feed_visibility(selection: FeedSelection) -> [bool; 9] {
    match selection {
        FeedSelection::Nothing => [false, false, false, false, false, true, true, true, false],
        FeedSelection::Unread => [true, true, false, false, false, true, false, false, false],
        FeedSelection::Folder => [true, true, true, false, true, true, true, false, false],
        FeedSelection::Feed => [true, true, true, true, true, true, false, false, true],
        FeedSelection::Multiple => [true, true, false, false, true, false, false, false, true],
    }
}

/// Item changes of the feed menu.
///
/// The separator above "newSubscription" is dropped only when nothing is selected.
pub fn feed_changes(selection: FeedSelection) -> ItemChanges {
    let changes = ItemChanges::new().separator("newSubscription", selection != FeedSelection::Nothing);
    FEED_ITEMS
        .iter()
        .zip(feed_visibility(selection))
        .fold(changes, |changes, (item, visible)| changes.visible(*item, visible))
}

/// Adapter of the feed tree menu.
pub struct RssFeedAdapter {
    table: Arc<dyn RssFeedTable>,
}

impl RssFeedAdapter {
    /// Create a new adapter over the feed tree.
    pub fn new(table: Arc<dyn RssFeedTable>) -> Self {
        Self { table }
    }
}

impl ContentAdapter for RssFeedAdapter {
    fn recompute(&self, _cx: &AdapterContext<'_>) -> ItemChanges {
        let selection = FeedSelection::classify(self.table.as_ref());
        tracing::debug!(?selection, "Recomputing feed menu");
        feed_changes(selection)
    }
}

/// Item changes of the downloader rule menu for `selected` rules.
pub fn rule_changes(selected: usize) -> ItemChanges {
    let changes = ItemChanges::new().show("addRule");
    match selected {
        0 => changes.hide("deleteRule").hide("renameRule").hide("clearDownloadedEpisodes"),
        1 => changes.show("deleteRule").show("renameRule").show("clearDownloadedEpisodes"),
        _ => changes.show("deleteRule").hide("renameRule").show("clearDownloadedEpisodes"),
    }
}

/// Adapter of the downloader rule list menu.
///
/// The rule list lives in a positioned dialog, so the menu is placed relative to it.
pub struct RssRuleAdapter {
    table: Arc<dyn RssRulesTable>,
    container: Point,
}

impl RssRuleAdapter {
    /// Create a new adapter for a rule list whose dialog sits at `container`.
    pub fn new(table: Arc<dyn RssRulesTable>, container: Point) -> Self {
        Self { table, container }
    }
}

impl ContentAdapter for RssRuleAdapter {
    fn recompute(&self, _cx: &AdapterContext<'_>) -> ItemChanges {
        rule_changes(self.table.selected_rows().len())
    }

    fn placement_origin(&self) -> Point {
        self.container
    }
}
