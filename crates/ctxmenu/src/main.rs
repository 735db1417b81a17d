//! ctxmenu - replay context menu gestures against a page fixture.
//!
//! Usage: `ctxmenu [page.json]`. Without an argument the bundled fixture is used.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use ctxmenu_core::logging::{init_logging, log_dir, LogConfig};
use ctxmenu_core::{
    Clock, ContextMenu, ManualClock, MenuConfig, MenuDocument, MenuError, MenuEvent, MenuRegistry, OptionsFile, Point,
    PointerEvent, RowMetrics, Size,
};
use ctxmenu_ui::{
    FilterKind, FilterListAdapter, Registry, RegistryEntry, RowCountObserver, TorrentActions, TorrentList,
    TorrentRow, TorrentsTableAdapter,
};

const DEFAULT_PAGE: &str = include_str!("../fixtures/page.json");

/// A page snapshot: menu markup, elements and the data behind the tables.
#[derive(Debug, Deserialize)]
struct Page {
    viewport: Size,
    #[serde(default)]
    options: OptionsFile,
    document: MenuDocument,
    #[serde(default)]
    torrents: Vec<TorrentRow>,
    #[serde(default)]
    selected: Vec<String>,
    #[serde(default)]
    tags: Vec<RegistryEntry>,
    #[serde(default)]
    categories: Vec<RegistryEntry>,
}

/// Logs the operations a real control panel would send to the server.
struct LoggedActions;

impl TorrentActions for LoggedActions {
    fn add_tags(&self) {
        tracing::info!("Add tags requested");
    }

    fn remove_all_tags(&self) {
        tracing::info!("Remove all tags requested");
    }

    fn set_tag(&self, tag_id: &str, add: bool) {
        tracing::info!(tag = tag_id, add, "Set tag requested");
    }

    fn new_category(&self) {
        tracing::info!("New category requested");
    }

    fn set_category(&self, category_id: Option<&str>) {
        tracing::info!(category = ?category_id, "Set category requested");
    }
}

fn main() {
    let log_config = LogConfig::new(log_dir());
    let logging = init_logging(log_config);

    tracing::info!(output = ?logging.output(), filter = ?logging.filter_source(), "Starting ctxmenu replay");

    if let Err(e) = run(std::env::args().nth(1)) {
        tracing::error!(error = %e, category = e.category(), hint = e.hint(), "Replay failed");
        drop(logging);
        std::process::exit(1);
    }
}

impl Page {
    /// Parse a page fixture, resolving menu ids and validating options.
    fn from_json(json: &str) -> Result<Self, MenuError> {
        let mut page: Page = serde_json::from_str(json)?;
        page.document.resolve_ids()?;
        page.options.validate()?;
        Ok(page)
    }
}

fn load_page(path: Option<String>) -> Result<Page, MenuError> {
    match path {
        Some(path) => {
            tracing::info!(path = %path, "Loading page fixture");
            Page::from_json(&std::fs::read_to_string(&path)?)
        }
        None => Page::from_json(DEFAULT_PAGE),
    }
}

fn log_items(menu: &ContextMenu) {
    menu.with_tree(|tree| {
        for item in tree.items.iter() {
            tracing::info!(
                action = item.action_id().unwrap_or("-"),
                label = %item.label,
                visible = item.is_visible(),
                enabled = !item.disabled,
                checked = item.is_checked(),
                separator = item.separator,
                "Item state"
            );
        }
    });
}

fn log_layout(menu: &ContextMenu) {
    match serde_json::to_string(&menu.layout()) {
        Ok(layout) => tracing::info!(menu = %menu.menu_id(), %layout, "Menu layout"),
        Err(e) => tracing::warn!(error = %e, "Failed to serialize layout"),
    }
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn run(path: Option<String>) -> Result<(), MenuError> {
    let page = load_page(path)?;

    let clock = ManualClock::new();
    let registry = MenuRegistry::new();
    let surface = Arc::new(RowMetrics::new(page.viewport));

    let list = Arc::new(TorrentList::new(page.torrents));
    list.select(page.selected);
    let tags: Arc<dyn Registry> = Arc::new(page.tags);
    let categories: Arc<dyn Registry> = Arc::new(page.categories);

    let torrents_adapter = TorrentsTableAdapter::new(list.clone(), tags, categories, Arc::new(LoggedActions));
    let torrents = ContextMenu::new(
        MenuConfig::new("torrentsTableMenu")
            .options(page.options.options_for("torrentsTableMenu"))
            .adapter(torrents_adapter)
            .surface(surface.clone())
            .clock(Arc::new(clock.clone()))
            .registry(registry.clone())
            .action("start", |element, _menu, action| {
                let element = element.map(|t| t.id.as_str()).unwrap_or("-");
                tracing::info!(action, element, "Start selected torrents");
            })
            .action("stop", |_, _, action| tracing::info!(action, "Stop selected torrents"))
            .on_click(|event| {
                if let MenuEvent::Click { label, .. } = event {
                    tracing::info!(label = %label, "Item clicked");
                }
            }),
        &page.document,
    )?;
    torrents.rebuild_submenus();

    let statuses = ContextMenu::new(
        MenuConfig::new("statusesFilterMenu")
            .options(page.options.options_for("statusesFilterMenu"))
            .adapter(FilterListAdapter::new(FilterKind::Statuses, list.clone(), Arc::new(false)))
            .surface(surface)
            .clock(Arc::new(clock.clone()))
            .registry(registry.clone()),
        &page.document,
    )?;
    let observer = RowCountObserver::new(list.feed().clone());
    observer.start();

    // Right click on the transfer list
    let response =
        torrents.dispatch("torrentsTableDiv", PointerEvent::context_menu(Point::new(1180.0, 400.0), clock.now()));
    tracing::info!(
        prevent_default = response.prevent_default,
        stop_propagation = response.stop_propagation,
        "Right click dispatched"
    );
    clock.advance(torrents.options().fade_speed());
    tracing::info!(opacity = torrents.tick(), "Fade in finished");
    log_items(&torrents);
    log_layout(&torrents);

    torrents.click_action("start", PointerEvent::click(Point::new(1100.0, 410.0), clock.now()));
    torrents.click_action("Tag/linux", PointerEvent::click(Point::new(1100.0, 600.0), clock.now()));
    registry.document_click();
    clock.advance(ms(250));
    torrents.tick();

    // Long press on the status filter list
    statuses.dispatch("statusFilterList", PointerEvent::touch_start(Point::new(40.0, 120.0), clock.now()));
    clock.advance(ms(700));
    statuses.dispatch("statusFilterList", PointerEvent::touch_end(Point::new(43.0, 123.0), clock.now()));
    tracing::info!(shown = statuses.is_shown(), "Long press dispatched");
    log_items(&statuses);
    log_layout(&statuses);

    // Transfer list emptied while the filter menu is open
    list.set_rows(Vec::new());
    list.set_rows(Vec::new());
    let updated = observer.pump(&statuses);
    tracing::info!(updated, "Row count observer pumped");
    log_items(&statuses);
    observer.stop();

    let shown = registry.shown().map(|m| m.menu_id());
    tracing::info!(shown = ?shown, "Replay finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_page_loads() {
        let page = Page::from_json(DEFAULT_PAGE).unwrap();
        assert_eq!(page.document.menu("torrentsTableMenu").unwrap().id, "torrentsTableMenu");
        assert!(!page.torrents.is_empty());
    }

    #[test]
    fn test_page_with_invalid_options_is_rejected() {
        let json = r#"{"viewport": {"width": 800, "height": 600},
                       "options": {"statusesFilterMenu": {"touch_timer_ms": 0}},
                       "document": {}}"#;
        let err = Page::from_json(json).unwrap_err();
        assert_eq!(err.category(), "Config");
    }
}
