//! Page elements and menu markup as seen by the engine.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::MenuError;
use crate::models::item::MenuTree;

/// An element that can open a context menu.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Element id; filter lists encode their entry id here.
    pub id: String,
    /// Class list.
    #[serde(default)]
    pub classes: Vec<String>,
    /// Cleared when bound so a long press does not select text.
    #[serde(default = "default_selectable")]
    pub selectable: bool,
}

fn default_selectable() -> bool {
    true
}

impl Target {
    /// Create a selectable target with no classes.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), classes: Vec::new(), selectable: true }
    }

    /// Builder: add a class.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Match a simple selector: `*`, `#id`, `.class`, or a comma-separated list of them.
    pub fn matches(&self, selector: &str) -> bool {
        selector.split(',').map(str::trim).any(|part| {
            if part == "*" {
                true
            } else if let Some(id) = part.strip_prefix('#') {
                self.id == id
            } else if let Some(class) = part.strip_prefix('.') {
                self.classes.iter().any(|c| c == class)
            } else {
                false
            }
        })
    }
}

/// Menu markup and candidate trigger elements of one page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuDocument {
    /// Menu roots keyed by element id.
    #[serde(default)]
    pub menus: HashMap<String, MenuTree>,
    /// Elements in document order.
    #[serde(default)]
    pub elements: Vec<Target>,
}

impl MenuDocument {
    /// Parse a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, MenuError> {
        let mut document: MenuDocument = serde_json::from_str(json)?;
        document.resolve_ids()?;
        Ok(document)
    }

    /// Give anonymous menu roots their key as id.
    ///
    /// A root declaring an id other than its key is rejected.
    pub fn resolve_ids(&mut self) -> Result<(), MenuError> {
        for (key, tree) in self.menus.iter_mut() {
            if tree.id.is_empty() {
                tree.id = key.clone();
            } else if tree.id != *key {
                return Err(MenuError::markup(format!("menu `{key}` declares id `{}`", tree.id)));
            }
        }
        Ok(())
    }

    /// Add a menu root.
    pub fn insert_menu(&mut self, tree: MenuTree) {
        self.menus.insert(tree.id.clone(), tree);
    }

    /// Add an element.
    pub fn insert_element(&mut self, target: Target) {
        self.elements.push(target);
    }

    /// Look up a menu root by id.
    pub fn menu(&self, id: &str) -> Result<&MenuTree, MenuError> {
        self.menus.get(id).ok_or_else(|| MenuError::menu_not_found(id))
    }

    /// All elements matching `selector`, in document order.
    pub fn query_all(&self, selector: &str) -> Vec<Target> {
        self.elements.iter().filter(|t| t.matches(selector)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_matching() {
        let target = Target::new("12").with_class("categoriesFilterItem");
        assert!(target.matches("#12"));
        assert!(target.matches(".categoriesFilterItem"));
        assert!(target.matches(".tagsFilterItem, .categoriesFilterItem"));
        assert!(target.matches("*"));
        assert!(!target.matches("#13"));
        assert!(!target.matches("li"));
    }

    #[test]
    fn test_query_all_keeps_document_order() {
        let mut doc = MenuDocument::default();
        doc.insert_element(Target::new("b").with_class("row"));
        doc.insert_element(Target::new("x"));
        doc.insert_element(Target::new("a").with_class("row"));
        let ids: Vec<_> = doc.query_all(".row").into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_missing_menu_is_error() {
        let doc = MenuDocument::default();
        assert!(matches!(doc.menu("nope"), Err(MenuError::MenuNotFound { .. })));
    }

    #[test]
    fn test_from_json_fills_menu_ids() {
        let doc = MenuDocument::from_json(
            r##"{"menus": {"rssArticleMenu": {"id": "", "items": [{"href": "#openNews", "label": "Open news URL"}]}},
                 "elements": [{"id": "rssArticleTableFixedHeaderRow"}]}"##,
        )
        .unwrap();
        assert_eq!(doc.menu("rssArticleMenu").unwrap().id, "rssArticleMenu");
        assert!(doc.elements[0].selectable);
    }

    #[test]
    fn test_mismatched_menu_id_is_markup_error() {
        let err = MenuDocument::from_json(r#"{"menus": {"rssFeedMenu": {"id": "rssArticleMenu", "items": []}}}"#)
            .unwrap_err();
        assert!(matches!(err, MenuError::Markup { source: None, .. }));
        assert!(err.to_string().contains("rssFeedMenu"));
    }
}
