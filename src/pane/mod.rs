use crate::form::RowHandle;
use crate::models::PlaceholderDescriptor;
use std::collections::{BTreeMap, BTreeSet};

/// `data-tab-region` of the pane that collects orphaned items.
pub const ORPHANED_REGION: &str = "__orphaned__";

/// A pane container as found on the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaneNode {
    pub node_id: String,

    /// `data-tab-region` attribute.
    pub tab_region: Option<String>,

    /// Id of the `.cp-content` child that holds the item rows.
    pub content_id: Option<String>,

    /// Id of the `.cp-empty` child shown while the pane has no items.
    pub empty_message_id: Option<String>,
}

/// Page-level collaborators of the editor.
pub trait PaneHost {
    /// Pane container by its DOM id.
    fn pane_node(&self, node_id: &str) -> Option<PaneNode>;

    /// The pane whose content area currently contains the row.
    fn pane_node_for_row(&self, row: &RowHandle) -> Option<PaneNode>;

    fn set_body_class(&mut self, class: &str, enabled: bool);
}

/// Rendering handle for a placeholder's visual area.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaceholderPane {
    pub root: String,
    pub content: Option<String>,
    pub empty_message: Option<String>,
    pub placeholder: Option<PlaceholderDescriptor>,
    pub is_orphaned: bool,
}

impl PlaceholderPane {
    pub fn new(node: PaneNode, placeholder: Option<PlaceholderDescriptor>) -> Self {
        let is_orphaned = node.tab_region.as_deref() == Some(ORPHANED_REGION);
        Self {
            root: node.node_id,
            content: node.content_id,
            empty_message: node.empty_message_id,
            placeholder,
            is_orphaned,
        }
    }
}

/// Pane of a placeholder, located by its `domnode`.
pub fn placeholder_pane(
    placeholder: &PlaceholderDescriptor,
    page: &impl PaneHost,
) -> Option<PlaceholderPane> {
    let Some(node) = page.pane_node(&placeholder.domnode) else {
        leptos::logging::warn!("Pane not found: #{}", placeholder.domnode);
        return None;
    };
    Some(PlaceholderPane::new(node, Some(placeholder.clone())))
}

/// Pane that currently displays the given row.
pub fn placeholder_pane_for_item(row: &RowHandle, page: &impl PaneHost) -> Option<PlaceholderPane> {
    let Some(node) = page.pane_node_for_row(row) else {
        leptos::logging::warn!("Pane not found for item: #{}", row);
        return None;
    };
    Some(PlaceholderPane::new(node, None))
}

/// In-memory page, used off-page and in tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryPage {
    panes: BTreeMap<String, PaneNode>,

    /// row -> pane node id
    row_panes: BTreeMap<RowHandle, String>,
    body_classes: BTreeSet<String>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pane with the usual content and empty-message children.
    pub fn add_pane(&mut self, node_id: &str, tab_region: Option<&str>) {
        self.panes.insert(
            node_id.to_string(),
            PaneNode {
                node_id: node_id.to_string(),
                tab_region: tab_region.map(str::to_string),
                content_id: Some(format!("{node_id}-content")),
                empty_message_id: Some(format!("{node_id}-empty")),
            },
        );
    }

    pub fn place_row(&mut self, row: &RowHandle, node_id: &str) {
        self.row_panes.insert(row.clone(), node_id.to_string());
    }

    pub fn has_body_class(&self, class: &str) -> bool {
        self.body_classes.contains(class)
    }
}

impl PaneHost for MemoryPage {
    fn pane_node(&self, node_id: &str) -> Option<PaneNode> {
        self.panes.get(node_id).cloned()
    }

    fn pane_node_for_row(&self, row: &RowHandle) -> Option<PaneNode> {
        self.row_panes
            .get(row)
            .and_then(|node_id| self.panes.get(node_id))
            .cloned()
    }

    fn set_body_class(&mut self, class: &str, enabled: bool) {
        if enabled {
            self.body_classes.insert(class.to_string());
        } else {
            self.body_classes.remove(class);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn main_placeholder() -> PlaceholderDescriptor {
        PlaceholderDescriptor {
            slot: "main".to_string(),
            title: "Main".to_string(),
            role: Some("m".to_string()),
            id: Some(1),
            domnode: "tab-main".to_string(),
        }
    }

    #[test]
    fn test_placeholder_pane_found() {
        let mut page = MemoryPage::new();
        page.add_pane("tab-main", Some("main"));

        let pane = placeholder_pane(&main_placeholder(), &page).expect("pane should exist");
        assert_eq!(pane.root, "tab-main");
        assert_eq!(pane.content.as_deref(), Some("tab-main-content"));
        assert_eq!(pane.empty_message.as_deref(), Some("tab-main-empty"));
        assert_eq!(pane.placeholder.map(|p| p.slot), Some("main".to_string()));
        assert!(!pane.is_orphaned);
    }

    #[test]
    fn test_placeholder_pane_missing_is_soft() {
        let page = MemoryPage::new();
        assert!(placeholder_pane(&main_placeholder(), &page).is_none());
    }

    #[test]
    fn test_pane_for_item_walks_to_container() {
        let mut page = MemoryPage::new();
        page.add_pane("tab-orphaned", Some(ORPHANED_REGION));
        let row = RowHandle::new("contentitems-0");

        assert!(placeholder_pane_for_item(&row, &page).is_none());

        page.place_row(&row, "tab-orphaned");
        let pane = placeholder_pane_for_item(&row, &page).expect("pane should exist");
        assert!(pane.is_orphaned);
        assert!(pane.placeholder.is_none());
    }

    #[test]
    fn test_body_class_toggle() {
        let mut page = MemoryPage::new();
        page.set_body_class("cp-single-placeholder", true);
        assert!(page.has_body_class("cp-single-placeholder"));
        page.set_body_class("cp-single-placeholder", false);
        assert!(!page.has_body_class("cp-single-placeholder"));
    }
}
