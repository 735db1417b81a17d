//! Content adapters for the control panel context menus.

pub mod filters;
pub mod rss;
pub mod search;
pub mod submenu;
pub mod tables;
pub mod torrents;

pub use filters::{FilterKind, FilterListAdapter, RowCountFeed, RowCountObserver};
pub use rss::{FeedSelection, RssFeedAdapter, RssRuleAdapter};
pub use search::SearchPluginsAdapter;
pub use submenu::{natural_cmp, SubmenuEntry};
pub use tables::{
    FilterSettings, Registry, RegistryEntry, RssFeedTable, RssRulesTable, SearchPluginsTable,
    TorrentActions, TorrentsTable,
};
pub use torrents::{summarize, summary_changes, SelectionSummary, TorrentList, TorrentRow, TorrentsTableAdapter};
