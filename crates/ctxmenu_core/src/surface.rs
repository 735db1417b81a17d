//! Measurement of rendered menus.
//!
//! The engine never renders. It asks a [`MenuSurface`] how large a list would be if
//! it were drawn off-screen, and where each row sits inside it.

use parking_lot::Mutex;

use crate::models::{MenuItem, Size};

/// Measures menu lists and reports the viewport.
pub trait MenuSurface: Send + Sync {
    /// Client area of the page.
    fn viewport(&self) -> Size;

    /// Natural size of a list with these items, hidden items excluded.
    fn list_size(&self, items: &[MenuItem]) -> Size;

    /// Vertical offset and height of the row at `index` inside its list.
    ///
    /// Returns `None` for hidden or missing rows.
    fn row_span(&self, items: &[MenuItem], index: usize) -> Option<(f32, f32)>;
}

/// Fixed row metrics, matching the panel's stylesheet.
#[derive(Debug)]
pub struct RowMetrics {
    viewport: Mutex<Size>,
    /// Width of every list.
    pub menu_width: f32,
    /// Height of one row.
    pub row_height: f32,
    /// Extra height of a separator line above a row.
    pub separator_height: f32,
    /// Padding above the first and below the last row.
    pub padding: f32,
}

impl RowMetrics {
    /// Create metrics with the default row geometry.
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport: Mutex::new(viewport),
            menu_width: 200.0,
            row_height: 28.0,
            separator_height: 9.0,
            padding: 4.0,
        }
    }

    /// Update the viewport after a resize.
    pub fn resize(&self, viewport: Size) {
        *self.viewport.lock() = viewport;
    }

    fn row_height(&self, item: &MenuItem) -> f32 {
        if item.separator {
            self.row_height + self.separator_height
        } else {
            self.row_height
        }
    }
}

impl MenuSurface for RowMetrics {
    fn viewport(&self) -> Size {
        *self.viewport.lock()
    }

    fn list_size(&self, items: &[MenuItem]) -> Size {
        let rows: f32 = items.iter().filter(|i| i.is_visible()).map(|i| self.row_height(i)).sum();
        Size::new(self.menu_width, rows + self.padding * 2.0)
    }

    fn row_span(&self, items: &[MenuItem], index: usize) -> Option<(f32, f32)> {
        let item = items.get(index).filter(|i| i.is_visible())?;
        let above: f32 = items[..index]
            .iter()
            .filter(|i| i.is_visible())
            .map(|i| self.row_height(i))
            .sum();
        Some((self.padding + above, self.row_height(item)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_rows_excluded() {
        let metrics = RowMetrics::new(Size::new(1024.0, 768.0));
        let mut hidden = MenuItem::action("stop", "Stop");
        hidden.hidden = true;
        let items = vec![
            MenuItem::action("start", "Start"),
            hidden,
            MenuItem::action("delete", "Delete").separator(true),
        ];

        assert_eq!(metrics.list_size(&items), Size::new(200.0, 4.0 + 28.0 + 37.0 + 4.0));
        assert_eq!(metrics.row_span(&items, 1), None);
        assert_eq!(metrics.row_span(&items, 2), Some((32.0, 37.0)));
    }

    #[test]
    fn test_resize() {
        let metrics = RowMetrics::new(Size::new(800.0, 600.0));
        metrics.resize(Size::new(400.0, 300.0));
        assert_eq!(metrics.viewport(), Size::new(400.0, 300.0));
    }
}
