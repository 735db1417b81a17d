//! The context menu engine.
//!
//! This module provides:
//! - `MenuConfig` builder for actions, targets, hooks and collaborators
//! - `ContextMenu`, a cheap-clone handle that binds triggers, shows and hides
//!   the menu, resolves item clicks and exposes the item state protocol
//! - `MenuEvent` notifications delivered to subscribers
//!
//! Locks are never held while handlers or listeners run, so both may call back
//! into any engine.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::adapter::{AdapterContext, ContentAdapter, ItemChanges, NoContent};
use crate::clock::{Clock, SystemClock};
use crate::config::{MenuOptions, Offsets};
use crate::error::MenuError;
use crate::fade::{Fade, Visibility};
use crate::models::{CheckState, ItemPath, MenuDocument, MenuItem, MenuTree, Point, Size, Target};
use crate::placement::{layout_menu, MenuLayout};
use crate::registry::MenuRegistry;
use crate::surface::{MenuSurface, RowMetrics};
use crate::trigger::{EventResponse, GestureKind, GestureTracker, PointerEvent};

// ============================================================================
// MenuEvent
// ============================================================================

/// Notifications emitted by a menu.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuEvent {
    /// The menu started fading in.
    Show,
    /// The menu started fading out.
    Hide,
    /// An enabled item was clicked.
    Click {
        /// Path of the clicked item.
        path: ItemPath,
        /// Action id taken from the item's href.
        action: Option<String>,
        /// Item label.
        label: String,
        /// The originating click.
        event: PointerEvent,
    },
}

/// Handler bound to an action id: `(context element, menu, action id)`.
pub type ActionHandler = Arc<dyn Fn(Option<&Target>, &ContextMenu, &str) + Send + Sync + 'static>;

/// Listener receiving menu notifications.
pub type MenuListener = Arc<dyn Fn(&MenuEvent) + Send + Sync + 'static>;

/// Handle returned by [`ContextMenu::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

// ============================================================================
// MenuConfig
// ============================================================================

enum MenuSource {
    Id(String),
    Tree(MenuTree),
}

/// Everything a menu needs at construction.
pub struct MenuConfig {
    source: MenuSource,
    options: MenuOptions,
    actions: HashMap<String, ActionHandler>,
    targets: Vec<Target>,
    listeners: Vec<MenuListener>,
    adapter: Arc<dyn ContentAdapter>,
    surface: Arc<dyn MenuSurface>,
    clock: Arc<dyn Clock>,
    registry: MenuRegistry,
}

impl MenuConfig {
    /// Configure a menu whose markup is looked up by id in a [`MenuDocument`].
    pub fn new(menu_id: impl Into<String>) -> Self {
        Self::with_source(MenuSource::Id(menu_id.into()))
    }

    /// Configure a menu from markup built in code.
    pub fn from_tree(tree: MenuTree) -> Self {
        Self::with_source(MenuSource::Tree(tree))
    }

    fn with_source(source: MenuSource) -> Self {
        Self {
            source,
            options: MenuOptions::default(),
            actions: HashMap::new(),
            targets: Vec::new(),
            listeners: Vec::new(),
            adapter: Arc::new(NoContent),
            surface: Arc::new(RowMetrics::new(Size::new(1280.0, 720.0))),
            clock: Arc::new(SystemClock::new()),
            registry: MenuRegistry::global(),
        }
    }

    /// Replace all tunable options.
    pub fn options(mut self, options: MenuOptions) -> Self {
        self.options = options;
        self
    }

    /// Pixel bias added to the activation point.
    pub fn offsets(mut self, x: f32, y: f32) -> Self {
        self.options.offsets = Offsets { x, y };
        self
    }

    /// Suppress the platform menu and bubbling on activation.
    pub fn stop_event(mut self, stop: bool) -> Self {
        self.options.stop_event = stop;
        self
    }

    /// Fade duration.
    pub fn fade_speed(mut self, speed: Duration) -> Self {
        self.options.fade_speed_ms = speed.as_millis() as u64;
        self
    }

    /// Long-press threshold.
    pub fn touch_timer(mut self, threshold: Duration) -> Self {
        self.options.touch_timer_ms = threshold.as_millis() as u64;
        self
    }

    /// Cap the root list height and scroll internally.
    pub fn scrollable(mut self, scrollable: bool) -> Self {
        self.options.scrollable = scrollable;
        self
    }

    /// Start with triggers disabled.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.options.disabled = disabled;
        self
    }

    /// Selector resolving the initial targets against the document.
    pub fn target_selector(mut self, selector: impl Into<String>) -> Self {
        self.options.targets = Some(selector.into());
        self
    }

    /// Bind a handler to an action id.
    pub fn action(
        mut self,
        action: impl Into<String>,
        handler: impl Fn(Option<&Target>, &ContextMenu, &str) + Send + Sync + 'static,
    ) -> Self {
        self.actions.insert(action.into(), Arc::new(handler));
        self
    }

    /// Add an initial trigger target.
    pub fn target(mut self, target: Target) -> Self {
        self.targets.push(target);
        self
    }

    /// Add several initial trigger targets.
    pub fn targets(mut self, targets: impl IntoIterator<Item = Target>) -> Self {
        self.targets.extend(targets);
        self
    }

    /// Content adapter run before every show.
    pub fn adapter(mut self, adapter: impl ContentAdapter + 'static) -> Self {
        self.adapter = Arc::new(adapter);
        self
    }

    /// Measurement surface.
    pub fn surface(mut self, surface: Arc<dyn MenuSurface>) -> Self {
        self.surface = surface;
        self
    }

    /// Time source for fades.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Registry enforcing the single open menu.
    pub fn registry(mut self, registry: MenuRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Hook run when the menu starts showing.
    pub fn on_show(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.listeners.push(Arc::new(move |event| {
            if matches!(event, MenuEvent::Show) {
                f();
            }
        }));
        self
    }

    /// Hook run when the menu starts hiding.
    pub fn on_hide(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.listeners.push(Arc::new(move |event| {
            if matches!(event, MenuEvent::Hide) {
                f();
            }
        }));
        self
    }

    /// Hook run when an enabled item is clicked.
    pub fn on_click(mut self, f: impl Fn(&MenuEvent) + Send + Sync + 'static) -> Self {
        self.listeners.push(Arc::new(move |event| {
            if matches!(event, MenuEvent::Click { .. }) {
                f(event);
            }
        }));
        self
    }
}

// ============================================================================
// ContextMenu
// ============================================================================

struct MenuState {
    tree: MenuTree,
    targets: Vec<Target>,
    disabled: bool,
    element: Option<Target>,
    fade: Fade,
    layout: MenuLayout,
    gestures: GestureTracker,
}

pub(crate) struct ContextMenuInner {
    id: Uuid,
    options: MenuOptions,
    actions: HashMap<String, ActionHandler>,
    adapter: Arc<dyn ContentAdapter>,
    surface: Arc<dyn MenuSurface>,
    clock: Arc<dyn Clock>,
    registry: MenuRegistry,
    state: Mutex<MenuState>,
    listeners: Mutex<Vec<(SubscriptionId, MenuListener)>>,
}

/// A context menu bound to a set of trigger targets.
#[derive(Clone)]
pub struct ContextMenu {
    inner: Arc<ContextMenuInner>,
}

impl ContextMenu {
    /// Build a menu, resolving its markup and targets against `document`.
    pub fn new(config: MenuConfig, document: &MenuDocument) -> Result<Self, MenuError> {
        config.options.validate()?;

        let tree = match config.source {
            MenuSource::Id(id) => document.menu(&id)?.clone(),
            MenuSource::Tree(tree) => tree,
        };

        let mut initial = config.targets;
        if let Some(selector) = config.options.targets.as_deref() {
            initial.extend(document.query_all(selector));
        }

        let state = MenuState {
            tree,
            targets: Vec::new(),
            disabled: config.options.disabled,
            element: None,
            fade: Fade::new(config.options.fade_speed()),
            layout: MenuLayout::offscreen(),
            gestures: GestureTracker::new(),
        };

        let mut listeners = Vec::with_capacity(config.listeners.len());
        for listener in config.listeners {
            listeners.push((SubscriptionId(Uuid::new_v4()), listener));
        }

        let menu = Self {
            inner: Arc::new(ContextMenuInner {
                id: Uuid::new_v4(),
                options: config.options,
                actions: config.actions,
                adapter: config.adapter,
                surface: config.surface,
                clock: config.clock,
                registry: config.registry,
                state: Mutex::new(state),
                listeners: Mutex::new(listeners),
            }),
        };

        for target in initial {
            menu.add_target(target);
        }

        let targets = menu.targets().len();
        tracing::debug!(menu = %menu.menu_id(), targets, "Context menu created");
        Ok(menu)
    }

    /// Build a menu from a configuration that carries its own markup.
    pub fn build(config: MenuConfig) -> Result<Self, MenuError> {
        Self::new(config, &MenuDocument::default())
    }

    pub(crate) fn from_inner(inner: Arc<ContextMenuInner>) -> Self {
        Self { inner }
    }

    pub(crate) fn downgrade(&self) -> Weak<ContextMenuInner> {
        Arc::downgrade(&self.inner)
    }

    /// Unique id of this engine instance.
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Element id of the menu root.
    pub fn menu_id(&self) -> String {
        self.inner.state.lock().tree.id.clone()
    }

    /// Options the menu was built with.
    pub fn options(&self) -> &MenuOptions {
        &self.inner.options
    }

    /// The registry this menu reports to.
    pub fn registry(&self) -> &MenuRegistry {
        &self.inner.registry
    }

    // ========== Show / Hide ==========

    /// Fade the menu in, hiding whichever other menu was shown.
    pub fn show(&self) -> &Self {
        if let Some(previous) = self.inner.registry.last_shown() {
            if previous.id() != self.id() {
                previous.hide();
            }
        }

        let now = self.inner.clock.now();
        self.inner.state.lock().fade.start(1.0, now);
        tracing::debug!(menu = %self.menu_id(), "Showing context menu");

        self.emit(&MenuEvent::Show);
        self.inner.registry.record(self);
        self
    }

    /// Fade the menu out. No-op, without notification, when already fully hidden.
    pub fn hide(&self) -> &Self {
        let now = self.inner.clock.now();
        let started = {
            let mut state = self.inner.state.lock();
            state.fade.tick(now);
            if state.fade.is_fully_hidden() {
                false
            } else {
                state.fade.start(0.0, now);
                true
            }
        };

        if started {
            tracing::debug!(menu = %self.menu_id(), "Hiding context menu");
            self.emit(&MenuEvent::Hide);
        }
        self
    }

    /// Advance the fade to the clock's current time and return the opacity.
    pub fn tick(&self) -> f32 {
        let now = self.inner.clock.now();
        self.inner.state.lock().fade.tick(now)
    }

    /// Opacity as of the last tick.
    pub fn opacity(&self) -> f32 {
        self.inner.state.lock().fade.opacity()
    }

    /// Visibility as of the last tick.
    pub fn visibility(&self) -> Visibility {
        self.inner.state.lock().fade.visibility()
    }

    /// Whether the menu is shown or fading in.
    pub fn is_shown(&self) -> bool {
        self.inner.state.lock().fade.target() > 0.0
    }

    // ========== Actions ==========

    /// Run the handler bound to `action`. Unbound actions are ignored.
    pub fn execute(&self, action: &str, element: Option<&Target>) -> &Self {
        match self.inner.actions.get(action).cloned() {
            Some(handler) => {
                tracing::debug!(menu = %self.menu_id(), action, "Executing menu action");
                handler(element, self, action);
            }
            None => {
                tracing::debug!(menu = %self.menu_id(), action, "No handler bound to action");
            }
        }
        self
    }

    /// Let triggers open the menu.
    pub fn enable(&self) -> &Self {
        self.inner.state.lock().disabled = false;
        self
    }

    /// Make triggers ignore activation gestures.
    pub fn disable(&self) -> &Self {
        self.inner.state.lock().disabled = true;
        self
    }

    /// Whether triggers open the menu.
    pub fn is_enabled(&self) -> bool {
        !self.inner.state.lock().disabled
    }

    // ========== Targets ==========

    /// Bind a trigger target. The target is made non-selectable so a long press
    /// does not select its text.
    pub fn add_target(&self, mut target: Target) -> &Self {
        target.selectable = false;
        let mut state = self.inner.state.lock();
        if state.targets.iter().any(|t| t.id == target.id) {
            tracing::trace!(element = %target.id, "Target already bound");
        } else {
            state.targets.push(target);
        }
        self
    }

    /// Bind every element of `document` matching the configured selector.
    pub fn search_and_add_targets(&self, document: &MenuDocument) -> &Self {
        if let Some(selector) = self.inner.options.targets.as_deref() {
            for target in document.query_all(selector) {
                self.add_target(target);
            }
        }
        self
    }

    /// Bound targets.
    pub fn targets(&self) -> Vec<Target> {
        self.inner.state.lock().targets.clone()
    }

    /// The element the menu was last opened on.
    pub fn element(&self) -> Option<Target> {
        self.inner.state.lock().element.clone()
    }

    // ========== Trigger Dispatch ==========

    /// Deliver an input event received by the bound target `target_id`.
    pub fn dispatch(&self, target_id: &str, event: PointerEvent) -> EventResponse {
        if !self.inner.state.lock().targets.iter().any(|t| t.id == target_id) {
            return EventResponse::PASS;
        }

        match event.kind {
            GestureKind::ContextMenu => self.trigger_menu(&event, target_id),
            GestureKind::Click => {
                self.hide();
                self.inner.registry.document_click();
                EventResponse::PASS
            }
            GestureKind::TouchStart => {
                self.hide();
                self.inner.registry.document_click();
                self.inner.state.lock().gestures.touch_start(target_id, event);
                EventResponse::PASS
            }
            GestureKind::TouchEnd => {
                let threshold = self.inner.options.touch_timer();
                let start = self.inner.state.lock().gestures.touch_end(target_id, &event, threshold);
                if let Some(start) = start {
                    tracing::debug!(element = target_id, "Long press detected");
                    self.trigger_menu(&start, target_id);
                }
                EventResponse::PASS
            }
        }
    }

    /// Open the menu for an activation on `target_id` at the event's position.
    pub fn trigger_menu(&self, event: &PointerEvent, target_id: &str) -> EventResponse {
        let target = {
            let state = self.inner.state.lock();
            if state.disabled {
                return EventResponse::PASS;
            }
            state.targets.iter().find(|t| t.id == target_id).cloned()
        };

        self.inner.state.lock().element = target;
        self.adjust_menu_position(event.position);
        self.show();

        if self.inner.options.stop_event {
            EventResponse::SWALLOW
        } else {
            EventResponse::PASS
        }
    }

    /// Recompute item states for the current element, then lay the menu out at `anchor`.
    fn adjust_menu_position(&self, anchor: Point) {
        let element = self.element();
        let changes = self.inner.adapter.recompute(&AdapterContext { element: element.as_ref() });
        let origin = self.inner.adapter.placement_origin();

        let mut state = self.inner.state.lock();
        changes.apply(&mut state.tree);
        state.layout = layout_menu(
            &state.tree,
            anchor,
            self.inner.options.offsets.into(),
            origin,
            self.inner.options.scrollable,
            self.inner.surface.as_ref(),
        );
    }

    /// Current layout of the menu and its submenus.
    pub fn layout(&self) -> MenuLayout {
        self.inner.state.lock().layout.clone()
    }

    // ========== Item Clicks ==========

    /// Handle a click inside the menu.
    ///
    /// `hit` is the list item containing the click target, or `None` when the click
    /// landed outside every item. Disabled items swallow the click.
    pub fn click_item(&self, hit: Option<&ItemPath>, event: PointerEvent) -> EventResponse {
        let Some(path) = hit else {
            return EventResponse::PASS;
        };

        let (item, element) = {
            let state = self.inner.state.lock();
            let Some(item) = state.tree.item(path) else {
                return EventResponse::PASS;
            };
            (item.clone(), state.element.clone())
        };

        if item.disabled {
            tracing::trace!(label = %item.label, "Click on disabled item swallowed");
            return EventResponse::SWALLOW;
        }

        let action = item.action_id().map(str::to_string);
        if let Some(action) = action.as_deref() {
            self.execute(action, element.as_ref());
        }
        if let Some(callback) = item.on_activate.as_ref() {
            callback.call();
        }

        self.emit(&MenuEvent::Click { path: path.clone(), action, label: item.label, event });
        EventResponse::PREVENT
    }

    /// Click the item carrying `action`.
    pub fn click_action(&self, action: &str, event: PointerEvent) -> EventResponse {
        let path = self.inner.state.lock().tree.find_path(action);
        self.click_item(path.as_ref(), event)
    }

    // ========== Item State Protocol ==========

    /// Include an item in layout.
    pub fn show_item(&self, action: &str) -> &Self {
        self.inner.state.lock().tree.show_item(action);
        self
    }

    /// Exclude an item from layout.
    pub fn hide_item(&self, action: &str) -> &Self {
        self.inner.state.lock().tree.hide_item(action);
        self
    }

    /// Enable or disable an item.
    pub fn set_enabled(&self, action: &str, enabled: bool) -> &Self {
        self.inner.state.lock().tree.set_enabled(action, enabled);
        self
    }

    /// Check or uncheck an item.
    pub fn set_checked(&self, action: &str, checked: bool) -> &Self {
        self.inner.state.lock().tree.set_checked(action, checked);
        self
    }

    /// Whether an item reads as checked.
    pub fn is_checked(&self, action: &str) -> bool {
        self.inner.state.lock().tree.is_checked(action)
    }

    /// Set a tri-state checkbox.
    pub fn set_check_state(&self, action: &str, state: CheckState) -> &Self {
        self.inner.state.lock().tree.set_check_state(action, state);
        self
    }

    /// Checkbox state of an item.
    pub fn check_state(&self, action: &str) -> Option<CheckState> {
        self.inner.state.lock().tree.check_state(action)
    }

    /// Toggle an item's icon highlight.
    pub fn set_highlighted(&self, action: &str, highlighted: bool) -> &Self {
        self.inner.state.lock().tree.set_highlighted(action, highlighted);
        self
    }

    /// Toggle the separator above an item.
    pub fn set_separator(&self, action: &str, separator: bool) -> &Self {
        self.inner.state.lock().tree.set_separator(action, separator);
        self
    }

    /// Replace the nested list under an item.
    pub fn replace_submenu(&self, action: &str, items: Vec<MenuItem>) -> &Self {
        self.inner.state.lock().tree.replace_submenu(action, items);
        self
    }

    /// Apply a batch of item changes.
    pub fn apply_changes(&self, changes: ItemChanges) -> &Self {
        changes.apply(&mut self.inner.state.lock().tree);
        self
    }

    /// Ask the adapter to rebuild dynamic submenus.
    pub fn rebuild_submenus(&self) -> &Self {
        let changes = self.inner.adapter.rebuild_submenus();
        self.apply_changes(changes)
    }

    /// Read the menu markup.
    pub fn with_tree<R>(&self, f: impl FnOnce(&MenuTree) -> R) -> R {
        f(&self.inner.state.lock().tree)
    }

    // ========== Notifications ==========

    /// Register a listener for menu notifications.
    pub fn subscribe(&self, listener: impl Fn(&MenuEvent) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(Uuid::new_v4());
        self.inner.listeners.lock().push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns false when it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.inner.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(sub, _)| *sub != id);
        listeners.len() != before
    }

    fn emit(&self, event: &MenuEvent) {
        let listeners: Vec<MenuListener> =
            self.inner.listeners.lock().iter().map(|(_, l)| l.clone()).collect();
        for listener in listeners {
            listener(event);
        }
    }
}

impl std::fmt::Debug for ContextMenu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextMenu")
            .field("id", &self.inner.id)
            .field("menu", &self.menu_id())
            .field("shown", &self.is_shown())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
