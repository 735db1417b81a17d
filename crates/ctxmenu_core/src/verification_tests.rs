//! End-to-end checks of the engine's behavioral guarantees.
//!
//! - Only one menu of a page is shown at a time; the previous one hides before
//!   the next shows
//! - Touching or clicking any bound target dismisses the open menu
//! - Menus stay inside the viewport
//! - Long presses open the menu at the touch-start point
//! - Disabled items never run actions or notify
//! - Hiding a hidden menu does nothing
//! - The latest fade wins
//! - Documents load from JSON markup

#[cfg(test)]
mod tests {
    use crate::clock::ManualClock;
    use crate::menu::{ContextMenu, MenuConfig, MenuEvent};
    use crate::models::{Indicator, MenuDocument, MenuItem, MenuTree, Point, Size, Target};
    use crate::registry::MenuRegistry;
    use crate::surface::RowMetrics;
    use crate::trigger::{EventResponse, PointerEvent};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn menu(id: &str, target: &str, clock: &ManualClock, registry: &MenuRegistry) -> ContextMenu {
        let tree = MenuTree::new(
            id,
            vec![
                MenuItem::action("start", "Start"),
                MenuItem::action("pause", "Pause"),
                MenuItem::action("delete", "Delete").separator(true),
            ],
        );
        ContextMenu::build(
            MenuConfig::from_tree(tree)
                .clock(Arc::new(clock.clone()))
                .registry(registry.clone())
                .target(Target::new(target)),
        )
        .unwrap()
    }

    type Log = Arc<Mutex<Vec<(String, MenuEvent)>>>;

    fn record(log: &Log, name: &str, menu: &ContextMenu) {
        let log = log.clone();
        let name = name.to_string();
        menu.subscribe(move |e| log.lock().push((name.clone(), e.clone())));
    }

    // =========================================================================
    // Single open menu
    // =========================================================================

    #[test]
    fn test_showing_second_menu_hides_first_before_showing() {
        let clock = ManualClock::new();
        let registry = MenuRegistry::new();
        let a = menu("torrentsTableMenu", "row1", &clock, &registry);
        let b = menu("categoriesFilterMenu", "cat1", &clock, &registry);
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        record(&log, "a", &a);
        record(&log, "b", &b);

        a.dispatch("row1", PointerEvent::context_menu(Point::new(10.0, 10.0), ms(0)));
        clock.advance(ms(250));
        b.dispatch("cat1", PointerEvent::context_menu(Point::new(40.0, 40.0), ms(250)));

        let log = log.lock();
        let order: Vec<(&str, &MenuEvent)> = log.iter().map(|(n, e)| (n.as_str(), e)).collect();
        assert_eq!(
            order,
            vec![("a", &MenuEvent::Show), ("a", &MenuEvent::Hide), ("b", &MenuEvent::Show)]
        );
        assert!(!a.is_shown());
        assert!(b.is_shown());
        assert_eq!(registry.shown().map(|m| m.id()), Some(b.id()));
    }

    #[test]
    fn test_at_most_one_menu_shown_over_many_activations() {
        let clock = ManualClock::new();
        let registry = MenuRegistry::new();
        let menus: Vec<_> =
            (0..4).map(|i| menu(&format!("menu{i}"), &format!("t{i}"), &clock, &registry)).collect();

        for step in 0..20usize {
            let i = (step * 7) % menus.len();
            menus[i].dispatch(&format!("t{i}"), PointerEvent::context_menu(Point::new(5.0, 5.0), ms(0)));
            clock.advance(ms(30));
            let shown = menus.iter().filter(|m| m.is_shown()).count();
            assert_eq!(shown, 1, "step {step}");
        }
    }

    #[test]
    fn test_reshowing_same_menu_does_not_hide_it() {
        let clock = ManualClock::new();
        let registry = MenuRegistry::new();
        let a = menu("torrentsTableMenu", "row1", &clock, &registry);
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        record(&log, "a", &a);

        a.show();
        a.show();
        assert!(log.lock().iter().all(|(_, e)| *e == MenuEvent::Show));
    }

    #[test]
    fn test_touch_or_click_on_any_target_hides_other_menu() {
        let clock = ManualClock::new();
        let registry = MenuRegistry::new();
        let a = menu("torrentsTableMenu", "row1", &clock, &registry);
        let b = menu("categoriesFilterMenu", "cat1", &clock, &registry);

        b.dispatch("cat1", PointerEvent::context_menu(Point::new(40.0, 40.0), ms(0)));
        assert!(b.is_shown());
        let response = a.dispatch("row1", PointerEvent::touch_start(Point::new(10.0, 10.0), ms(10)));
        assert_eq!(response, EventResponse::PASS);
        assert!(!b.is_shown());
        assert!(!a.is_shown());

        b.dispatch("cat1", PointerEvent::context_menu(Point::new(40.0, 40.0), ms(20)));
        assert!(b.is_shown());
        a.dispatch("row1", PointerEvent::click(Point::new(10.0, 10.0), ms(30)));
        assert!(!b.is_shown());
        assert!(registry.shown().is_none());
    }

    #[test]
    fn test_document_click_dismisses_open_menu() {
        let clock = ManualClock::new();
        let registry = MenuRegistry::new();
        let a = menu("torrentsTableMenu", "row1", &clock, &registry);
        a.show();
        registry.document_click();
        assert!(!a.is_shown());
        assert!(registry.shown().is_none());
        // already hidden: nothing happens
        registry.document_click();
    }

    // =========================================================================
    // Placement
    // =========================================================================

    #[test]
    fn test_menu_near_bottom_right_stays_on_screen() {
        let clock = ManualClock::new();
        let registry = MenuRegistry::new();
        let tree = MenuTree::new("m", (0..10).map(|i| MenuItem::action(format!("a{i}"), "x")).collect());
        let menu = ContextMenu::build(
            MenuConfig::from_tree(tree)
                .clock(Arc::new(clock))
                .registry(registry)
                .surface(Arc::new(RowMetrics::new(Size::new(800.0, 600.0))))
                .target(Target::new("row")),
        )
        .unwrap();

        menu.dispatch("row", PointerEvent::context_menu(Point::new(780.0, 590.0), ms(0)));
        let root = menu.layout().root;
        // 10 rows of 28 plus 4px padding top and bottom
        assert_eq!(root.size, Size::new(200.0, 288.0));
        assert_eq!(root.origin, Point::new(580.0, 312.0));
    }

    // =========================================================================
    // Gestures
    // =========================================================================

    #[test]
    fn test_long_press_opens_menu_short_tap_does_not() {
        let clock = ManualClock::new();
        let registry = MenuRegistry::new();
        let m = menu("torrentsTableMenu", "row1", &clock, &registry);

        m.dispatch("row1", PointerEvent::touch_start(Point::new(20.0, 20.0), ms(0)));
        m.dispatch("row1", PointerEvent::touch_end(Point::new(20.0, 20.0), ms(400)));
        assert!(!m.is_shown());

        m.dispatch("row1", PointerEvent::touch_start(Point::new(20.0, 20.0), ms(1000)));
        m.dispatch("row1", PointerEvent::touch_end(Point::new(35.0, 20.0), ms(1700)));
        assert!(!m.is_shown());

        m.dispatch("row1", PointerEvent::touch_start(Point::new(20.0, 20.0), ms(2000)));
        let response = m.dispatch("row1", PointerEvent::touch_end(Point::new(23.0, 24.0), ms(2650)));
        assert_eq!(response, EventResponse::PASS);
        assert!(m.is_shown());
        assert_eq!(m.layout().root.origin, Point::new(20.0, 20.0));
    }

    #[test]
    fn test_touch_start_dismisses_open_menu() {
        let clock = ManualClock::new();
        let registry = MenuRegistry::new();
        let m = menu("torrentsTableMenu", "row1", &clock, &registry);
        m.show();
        m.dispatch("row1", PointerEvent::touch_start(Point::new(1.0, 1.0), ms(0)));
        assert!(!m.is_shown());
    }

    // =========================================================================
    // Item clicks
    // =========================================================================

    #[test]
    fn test_disabled_item_click_is_swallowed() {
        let clock = ManualClock::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let m = ContextMenu::build(
            MenuConfig::from_tree(MenuTree::new("m", vec![MenuItem::action("delete", "Delete")]))
                .clock(Arc::new(clock))
                .registry(MenuRegistry::new())
                .action("delete", move |_, _, _| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
        )
        .unwrap();
        let clicks = Arc::new(AtomicUsize::new(0));
        let click_counter = clicks.clone();
        m.subscribe(move |e| {
            if matches!(e, MenuEvent::Click { .. }) {
                click_counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        m.set_enabled("delete", false);
        let response = m.click_action("delete", PointerEvent::click(Point::default(), ms(0)));
        assert_eq!(response, EventResponse::SWALLOW);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(clicks.load(Ordering::SeqCst), 0);

        m.set_enabled("delete", true);
        let response = m.click_action("delete", PointerEvent::click(Point::default(), ms(0)));
        assert_eq!(response, EventResponse::PREVENT);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(clicks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_click_without_handler_still_notifies() {
        let clock = ManualClock::new();
        let registry = MenuRegistry::new();
        let m = menu("torrentsTableMenu", "row1", &clock, &registry);
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        record(&log, "m", &m);
        m.click_action("pause", PointerEvent::click(Point::default(), ms(0)));
        assert!(matches!(&log.lock()[0].1, MenuEvent::Click { label, .. } if label == "Pause"));
    }

    // =========================================================================
    // Fades
    // =========================================================================

    #[test]
    fn test_hide_while_fading_in_wins() {
        let clock = ManualClock::new();
        let registry = MenuRegistry::new();
        let m = menu("torrentsTableMenu", "row1", &clock, &registry);
        m.show();
        clock.advance(ms(100));
        m.hide();
        let at_hide = m.opacity();
        assert!((at_hide - 0.5).abs() < 1e-6);
        clock.advance(ms(100));
        assert!(m.tick() < at_hide);
        clock.advance(ms(200));
        assert_eq!(m.tick(), 0.0);
    }

    #[test]
    fn test_double_hide_notifies_once() {
        let clock = ManualClock::new();
        let registry = MenuRegistry::new();
        let m = menu("torrentsTableMenu", "row1", &clock, &registry);
        let hides = Arc::new(AtomicUsize::new(0));
        let counter = hides.clone();
        m.subscribe(move |e| {
            if *e == MenuEvent::Hide {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        m.show();
        clock.advance(ms(500));
        m.hide();
        clock.advance(ms(500));
        m.hide();
        m.hide();
        assert_eq!(hides.load(Ordering::SeqCst), 1);
    }

    // =========================================================================
    // Markup
    // =========================================================================

    #[test]
    fn test_menu_from_json_document() {
        let json = r##"{
            "menus": {
                "rssFeedMenu": {
                    "items": [
                        { "href": "#update", "label": "Update" },
                        { "href": "#markRead", "label": "Mark items read", "separator": true },
                        { "href": "#subscribe", "label": "Subscribe", "indicator": { "kind": "icon", "name": "list-add" } }
                    ]
                }
            },
            "elements": [
                { "id": "feedList", "classes": ["rssFeedContextMenuTarget"] }
            ]
        }"##;
        let doc = MenuDocument::from_json(json).unwrap();
        let clock = ManualClock::new();
        let m = ContextMenu::new(
            MenuConfig::new("rssFeedMenu")
                .target_selector(".rssFeedContextMenuTarget")
                .clock(Arc::new(clock))
                .registry(MenuRegistry::new()),
            &doc,
        )
        .unwrap();

        assert_eq!(m.menu_id(), "rssFeedMenu");
        assert_eq!(m.targets().len(), 1);
        assert!(m.with_tree(|t| t.find("markRead").unwrap().separator));
        assert!(m.with_tree(|t| matches!(t.find("subscribe").unwrap().indicator, Indicator::Icon { .. })));
    }
}
