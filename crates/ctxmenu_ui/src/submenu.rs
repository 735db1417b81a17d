//! Tag and category submenus of the transfer list menu.
//!
//! Rebuilding is split in two steps. [`tag_entries`] and [`category_entries`]
//! compute sorted entries with their checkbox or highlight state from a registry
//! snapshot; [`render_tag_submenu`] and [`render_category_submenu`] turn entries
//! into menu items wired to [`TorrentActions`].

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use ctxmenu_core::{CheckState, Indicator, MenuItem};

use crate::tables::{RegistryEntry, TorrentActions, TorrentsTable};
use crate::torrents::summarize;

/// Action id of the item owning the tag submenu.
pub const TAGS_ITEM: &str = "tags";

/// Action id of the item owning the category submenu.
pub const CATEGORY_ITEM: &str = "category";

const TAG_PREFIX: &str = "Tag/";
const CATEGORY_PREFIX: &str = "Category/";

/// Action id of a tag entry.
pub fn tag_action(name: &str) -> String {
    format!("{TAG_PREFIX}{name}")
}

/// Action id of a category entry.
pub fn category_action(name: &str) -> String {
    format!("{CATEGORY_PREFIX}{name}")
}

/// One registry entry as shown in a submenu.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmenuEntry {
    pub id: String,
    pub name: String,
    /// Checkbox state for tags.
    pub state: CheckState,
    /// Icon highlight for categories.
    pub highlighted: bool,
    /// Separates the first entry from the fixed leading actions.
    pub separator: bool,
}

/// Checkbox state of an entry held by `count` of `selected` rows.
pub fn selection_state(count: usize, selected: usize) -> CheckState {
    if count == 0 {
        CheckState::Unchecked
    } else if count < selected {
        CheckState::Indeterminate
    } else {
        CheckState::Checked
    }
}

fn sorted(registry: &[RegistryEntry]) -> Vec<&RegistryEntry> {
    let mut entries: Vec<&RegistryEntry> = registry.iter().collect();
    entries.sort_by(|a, b| natural_cmp(&a.name, &b.name));
    entries
}

/// Sorted tag entries with their checkbox state for the current selection.
pub fn tag_entries(
    registry: &[RegistryEntry],
    counts: &HashMap<String, usize>,
    selected: usize,
) -> Vec<SubmenuEntry> {
    sorted(registry)
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let count = counts.get(&entry.name).copied().unwrap_or(0);
            SubmenuEntry {
                id: entry.id.clone(),
                name: entry.name.clone(),
                state: selection_state(count, selected),
                highlighted: false,
                separator: i == 0,
            }
        })
        .collect()
}

/// Sorted category entries, highlighted when the whole selection is in them.
pub fn category_entries(
    registry: &[RegistryEntry],
    counts: &HashMap<String, usize>,
    selected: usize,
) -> Vec<SubmenuEntry> {
    sorted(registry)
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let count = counts.get(&entry.name).copied();
            SubmenuEntry {
                id: entry.id.clone(),
                name: entry.name.clone(),
                state: CheckState::Unchecked,
                highlighted: count == Some(selected),
                separator: i == 0,
            }
        })
        .collect()
}

/// Build the tag submenu: "Add...", "Remove All", then one checkbox per tag.
///
/// Clicking a tag removes it when every selected row has it and adds it otherwise.
pub fn render_tag_submenu(
    entries: &[SubmenuEntry],
    table: Arc<dyn TorrentsTable>,
    actions: Arc<dyn TorrentActions>,
) -> Vec<MenuItem> {
    let mut items = Vec::with_capacity(entries.len() + 2);

    let add = actions.clone();
    items.push(MenuItem::plain("Add...").icon("list-add").on_activate(move || add.add_tags()));
    let clear = actions.clone();
    items.push(MenuItem::plain("Remove All").icon("edit-clear").on_activate(move || clear.remove_all_tags()));

    for entry in entries {
        let (table, actions) = (table.clone(), actions.clone());
        let (id, name) = (entry.id.clone(), entry.name.clone());
        items.push(
            MenuItem::action(tag_action(&entry.name), entry.name.clone())
                .indicator(Indicator::Checkbox { state: entry.state })
                .separator(entry.separator)
                .on_activate(move || {
                    let rows = table.selected_rows();
                    let count = summarize(&rows).tag_counts.get(&name).copied().unwrap_or(0);
                    let checked = selection_state(count, rows.len()) == CheckState::Checked;
                    actions.set_tag(&id, !checked);
                }),
        );
    }
    items
}

/// Build the category submenu: "New...", "Reset", then one item per category.
pub fn render_category_submenu(entries: &[SubmenuEntry], actions: Arc<dyn TorrentActions>) -> Vec<MenuItem> {
    let mut items = Vec::with_capacity(entries.len() + 2);

    let create = actions.clone();
    items.push(MenuItem::plain("New...").icon("list-add").on_activate(move || create.new_category()));
    let reset = actions.clone();
    items.push(MenuItem::plain("Reset").icon("edit-clear").on_activate(move || reset.set_category(None)));

    for entry in entries {
        let actions = actions.clone();
        let id = entry.id.clone();
        items.push(
            MenuItem::action(category_action(&entry.name), entry.name.clone())
                .indicator(Indicator::Icon { name: "view-categories".to_string(), highlighted: entry.highlighted })
                .separator(entry.separator)
                .on_activate(move || actions.set_category(Some(&id))),
        );
    }
    items
}

// ============================================================================
// Natural ordering
// ============================================================================

fn chunks(s: &str) -> impl Iterator<Item = &str> {
    let mut rest = s;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = rest.find(|c: char| c.is_ascii_digit() != digits).unwrap_or(rest.len());
        let (chunk, tail) = rest.split_at(end);
        rest = tail;
        Some(chunk)
    })
}

fn is_number(chunk: &str) -> bool {
    chunk.bytes().next().is_some_and(|b| b.is_ascii_digit())
}

fn cmp_chunk(a: &str, b: &str) -> Ordering {
    if is_number(a) && is_number(b) {
        let a = a.trim_start_matches('0');
        let b = b.trim_start_matches('0');
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    } else {
        a.to_lowercase().cmp(&b.to_lowercase())
    }
}

/// Case-insensitive ordering where digit runs compare by value ("file2" < "file10").
pub fn natural_cmp(left: &str, right: &str) -> Ordering {
    let mut a = chunks(left);
    let mut b = chunks(right);
    loop {
        match (a.next(), b.next()) {
            (None, None) => return left.cmp(right),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => match cmp_chunk(x, y) {
                Ordering::Equal => continue,
                ord => return ord,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::torrents::TorrentRow;
    use parking_lot::Mutex;

    fn registry(names: &[&str]) -> Vec<RegistryEntry> {
        names.iter().enumerate().map(|(i, n)| RegistryEntry::new(format!("id{i}"), *n)).collect()
    }

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<String>>,
    }

    impl TorrentActions for Recorder {
        fn add_tags(&self) {
            self.calls.lock().push("add_tags".into());
        }
        fn remove_all_tags(&self) {
            self.calls.lock().push("remove_all_tags".into());
        }
        fn set_tag(&self, tag_id: &str, add: bool) {
            self.calls.lock().push(format!("set_tag {tag_id} {add}"));
        }
        fn new_category(&self) {
            self.calls.lock().push("new_category".into());
        }
        fn set_category(&self, category_id: Option<&str>) {
            self.calls.lock().push(format!("set_category {category_id:?}"));
        }
    }

    struct Selection(Vec<TorrentRow>);

    impl TorrentsTable for Selection {
        fn selected_rows(&self) -> Vec<TorrentRow> {
            self.0.clone()
        }
        fn row_count(&self) -> usize {
            self.0.len()
        }
    }

    fn tagged(tags: &str) -> TorrentRow {
        TorrentRow { tags: tags.to_string(), ..Default::default() }
    }

    #[test]
    fn test_natural_cmp() {
        assert_eq!(natural_cmp("file2", "file10"), Ordering::Less);
        assert_eq!(natural_cmp("File10", "file9"), Ordering::Greater);
        assert_eq!(natural_cmp("abc", "ABD"), Ordering::Less);
        assert_eq!(natural_cmp("007", "7"), Ordering::Less);
        assert_eq!(natural_cmp("x", "x1"), Ordering::Less);

        let mut names = vec!["Season 10", "season 2", "Season 1", "anime"];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(names, vec!["anime", "Season 1", "season 2", "Season 10"]);
    }

    #[test]
    fn test_tag_tri_state() {
        let counts = HashMap::from([("movies".to_string(), 4), ("hd".to_string(), 2)]);
        let entries = tag_entries(&registry(&["movies", "hd", "4k"]), &counts, 4);
        let state = |name: &str| entries.iter().find(|e| e.name == name).map(|e| e.state);

        assert_eq!(state("movies"), Some(CheckState::Checked));
        assert_eq!(state("hd"), Some(CheckState::Indeterminate));
        assert_eq!(state("4k"), Some(CheckState::Unchecked));
    }

    #[test]
    fn test_entries_sorted_with_leading_separator() {
        let entries = tag_entries(&registry(&["tv10", "tv2", "Anime"]), &HashMap::new(), 0);
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Anime", "tv2", "tv10"]);
        assert!(entries[0].separator);
        assert!(!entries[1].separator && !entries[2].separator);
    }

    #[test]
    fn test_category_highlight_on_exact_match() {
        let counts = HashMap::from([("linux".to_string(), 3), ("iso".to_string(), 1)]);
        let entries = category_entries(&registry(&["linux", "iso", "misc"]), &counts, 3);
        let lit: Vec<_> = entries.iter().filter(|e| e.highlighted).map(|e| e.name.as_str()).collect();
        assert_eq!(lit, vec!["linux"]);
    }

    #[test]
    fn test_render_tag_submenu() {
        let actions = Arc::new(Recorder::default());
        let table = Arc::new(Selection(vec![tagged("hd, movies"), tagged("movies")]));
        let counts = summarize(&table.selected_rows()).tag_counts;
        let entries = tag_entries(&registry(&["movies", "hd"]), &counts, 2);
        let items = render_tag_submenu(&entries, table, actions.clone());

        assert_eq!(items.len(), 4);
        assert_eq!(items[0].label, "Add...");
        assert_eq!(items[1].label, "Remove All");
        assert_eq!(items[2].action_id(), Some("Tag/hd"));
        assert!(items[2].separator);
        assert_eq!(items[2].indicator, Indicator::Checkbox { state: CheckState::Indeterminate });
        assert_eq!(items[3].indicator, Indicator::Checkbox { state: CheckState::Checked });

        for item in &items {
            if let Some(cb) = item.on_activate.as_ref() {
                cb.call();
            }
        }
        assert_eq!(
            *actions.calls.lock(),
            vec!["add_tags", "remove_all_tags", "set_tag id1 true", "set_tag id0 false"]
        );
    }

    #[test]
    fn test_render_category_submenu() {
        let actions = Arc::new(Recorder::default());
        let entries = category_entries(&registry(&["linux"]), &HashMap::new(), 1);
        let items = render_category_submenu(&entries, actions.clone());

        assert_eq!(items[2].action_id(), Some("Category/linux"));
        for item in &items {
            if let Some(cb) = item.on_activate.as_ref() {
                cb.call();
            }
        }
        assert_eq!(
            *actions.calls.lock(),
            vec!["new_category", "set_category None", "set_category Some(\"id0\")"]
        );
    }
}
