//! Core engine for the control panel context menus.
//!
//! This crate provides the headless menu engine used by every table and list of
//! the control panel:
//!
//! - **menu**: `ContextMenu` engine, configuration builder and notifications
//! - **registry**: Single open menu per page
//! - **trigger**: Pointer events, long-press detection, event responses
//! - **placement**: Viewport-aware menu and submenu positioning
//! - **fade**: Opacity tweens for show and hide
//! - **adapter**: Per-menu content adapters and item change lists
//! - **models**: Menu markup, items, targets and geometry
//! - **surface**: Measurement of rendered lists
//! - **clock**: Injectable page time
//! - **config**: Menu options and option files
//! - **error**: Error handling
//! - **logging**: Structured logging setup

pub mod adapter;
pub mod clock;
pub mod config;
pub mod error;
pub mod fade;
pub mod logging;
pub mod menu;
pub mod models;
pub mod placement;
pub mod registry;
pub mod surface;
pub mod trigger;

mod verification_tests;

pub use adapter::{AdapterContext, ContentAdapter, ItemChange, ItemChanges, NoContent};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{MenuOptions, Offsets, OptionsFile};
pub use error::MenuError;
pub use fade::{Fade, Visibility};
pub use menu::{ActionHandler, ContextMenu, MenuConfig, MenuEvent, MenuListener, SubscriptionId};
pub use models::{
    CheckState, Indicator, ItemCallback, ItemPath, MenuDocument, MenuItem, MenuTree, Point, Rect,
    Size, Submenu, Target,
};
pub use placement::{MenuLayout, SubmenuLayout};
pub use registry::MenuRegistry;
pub use surface::{MenuSurface, RowMetrics};
pub use trigger::{EventResponse, GestureKind, GestureTracker, PointerEvent};
