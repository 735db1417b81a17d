//! Viewport-aware menu and submenu placement.

use serde::Serialize;

use crate::models::{ItemPath, MenuItem, MenuTree, Point, Rect, Size};
use crate::surface::MenuSurface;

/// Where a menu waits while hidden and while being measured.
pub const OFFSCREEN_POSITION: Point = Point::new(-900_000.0, -900_000.0);

/// Stacking order of a positioned menu, above ordinary content.
pub const MENU_Z_INDEX: i32 = 2000;

/// Overlap in pixels between a submenu and its parent row.
pub const SUBMENU_OVERLAP: f32 = 1.0;

/// Fraction of the viewport height a scrollable list may take.
pub const SCROLLABLE_MAX_HEIGHT_RATIO: f32 = 0.75;

/// Final position of one nested list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmenuLayout {
    /// Path of the item owning the list.
    #[serde(skip)]
    pub parent: ItemPath,
    /// Absolute rectangle of the list.
    pub rect: Rect,
    /// Height cap when the list scrolls.
    pub max_height: Option<f32>,
}

/// Final position of a menu and all of its nested lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuLayout {
    /// Absolute rectangle of the root list.
    pub root: Rect,
    /// Height cap when the root list scrolls.
    pub max_height: Option<f32>,
    /// Nested lists, parents before children.
    pub submenus: Vec<SubmenuLayout>,
    /// Stacking order.
    pub z_index: i32,
}

impl MenuLayout {
    /// Layout of a menu parked off-screen.
    pub fn offscreen() -> Self {
        Self {
            root: Rect::new(OFFSCREEN_POSITION, Size::default()),
            max_height: None,
            submenus: Vec::new(),
            z_index: MENU_Z_INDEX,
        }
    }

    /// Layout of the list owned by the item at `parent`.
    pub fn submenu(&self, parent: &ItemPath) -> Option<&SubmenuLayout> {
        self.submenus.iter().find(|s| &s.parent == parent)
    }
}

/// Height cap for scrollable lists.
pub fn scrollable_max_height(viewport: Size) -> f32 {
    viewport.height * SCROLLABLE_MAX_HEIGHT_RATIO
}

/// Position the root list at `anchor + offset`, flipping left on right overflow and
/// clamping on bottom overflow.
pub fn place_menu(anchor: Point, offset: Point, menu: Size, viewport: Size) -> Point {
    let mut x = anchor.x + offset.x;
    let mut y = anchor.y + offset.y;
    if x + menu.width > viewport.width {
        x -= menu.width;
    }
    if y + menu.height > viewport.height {
        y = viewport.height - menu.height;
    }
    Point::new(x.max(0.0), y.max(0.0))
}

/// Position a nested list beside its parent row.
///
/// The list opens to the right, top-aligned with the row; it opens to the left when
/// the right side would overflow.
pub fn place_submenu(parent: Rect, submenu: Size, viewport: Size) -> Point {
    let mut x = parent.right() - SUBMENU_OVERLAP;
    let mut y = parent.top() - SUBMENU_OVERLAP;
    if x + submenu.width > viewport.width {
        x = parent.left() - submenu.width + SUBMENU_OVERLAP;
    }
    if y + submenu.height > viewport.height {
        y = viewport.height - submenu.height;
    }
    Point::new(x.max(0.0), y.max(0.0))
}

fn capped(size: Size, scrollable: bool, viewport: Size) -> (Size, Option<f32>) {
    if !scrollable {
        return (size, None);
    }
    let max = scrollable_max_height(viewport);
    (Size::new(size.width, size.height.min(max)), Some(max))
}

/// Lay out a whole menu for an activation at `anchor`.
///
/// `container` is the origin of the positioned ancestor; page-relative menus pass
/// the zero point.
pub fn layout_menu(
    tree: &MenuTree,
    anchor: Point,
    offset: Point,
    container: Point,
    scrollable: bool,
    surface: &dyn MenuSurface,
) -> MenuLayout {
    let viewport = surface.viewport();
    let (size, max_height) = capped(surface.list_size(&tree.items), scrollable, viewport);
    let origin = place_menu(anchor.relative_to(container), offset, size, viewport);
    let root = Rect::new(origin, size);

    let mut submenus = Vec::new();
    layout_children(&tree.items, root, &ItemPath::default(), surface, viewport, &mut submenus);

    tracing::trace!(menu = %tree.id, x = root.left(), y = root.top(), submenus = submenus.len(), "Menu placed");
    MenuLayout { root, max_height, submenus, z_index: MENU_Z_INDEX }
}

fn layout_children(
    items: &[MenuItem],
    list: Rect,
    prefix: &ItemPath,
    surface: &dyn MenuSurface,
    viewport: Size,
    out: &mut Vec<SubmenuLayout>,
) {
    for (index, item) in items.iter().enumerate() {
        let Some(submenu) = item.submenu.as_ref() else {
            continue;
        };
        let Some((top, height)) = surface.row_span(items, index) else {
            continue;
        };

        let path = if prefix.0.is_empty() { ItemPath::root(index) } else { prefix.child(index) };
        let parent = Rect::new(
            Point::new(list.left(), list.top() + top),
            Size::new(list.size.width, height),
        );
        let (size, max_height) =
            capped(surface.list_size(&submenu.items), submenu.scrollable, viewport);
        let rect = Rect::new(place_submenu(parent, size, viewport), size);

        out.push(SubmenuLayout { parent: path.clone(), rect, max_height });
        layout_children(&submenu.items, rect, &path, surface, viewport, out);
    }
}
