//! Search plugins table menu.

use std::sync::Arc;

use ctxmenu_core::{AdapterContext, ContentAdapter, ItemChanges};

use crate::tables::SearchPluginsTable;

const ENABLED_COLUMN: &str = "Enabled";

/// Checks "Enabled" for the clicked plugin row.
pub struct SearchPluginsAdapter {
    table: Arc<dyn SearchPluginsTable>,
}

impl SearchPluginsAdapter {
    /// Create a new adapter over the plugin table.
    pub fn new(table: Arc<dyn SearchPluginsTable>) -> Self {
        Self { table }
    }

    /// Whether the plugin in `row_id` is enabled.
    pub fn is_plugin_enabled(&self, row_id: &str) -> bool {
        let Some(column) = self.table.header().iter().position(|h| h == ENABLED_COLUMN) else {
            tracing::warn!("Search plugins table has no Enabled column");
            return false;
        };
        self.table.cells(row_id).get(column).is_some_and(|cell| cell == "Yes")
    }
}

impl ContentAdapter for SearchPluginsAdapter {
    fn recompute(&self, cx: &AdapterContext<'_>) -> ItemChanges {
        let enabled = cx.element.is_some_and(|row| self.is_plugin_enabled(&row.id));
        ItemChanges::new()
            .show("Enabled")
            .checked("Enabled", enabled)
            .show("Uninstall")
    }
}
