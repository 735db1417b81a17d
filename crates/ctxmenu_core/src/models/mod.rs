//! Data models for the context menu engine.
//!
//! - `geometry` - Point, Size, Rect in page pixels
//! - `item` - MenuTree, MenuItem, indicators and the item state protocol
//! - `document` - Target elements and the MenuDocument they live in

pub mod document;
pub mod geometry;
pub mod item;

pub use document::{MenuDocument, Target};
pub use geometry::{Point, Rect, Size};
pub use item::{CheckState, Indicator, ItemCallback, ItemPath, MenuItem, MenuTree, Submenu};
