use crate::form::{FormStore, RowHandle, RowRef};
use crate::pane::{PaneHost, PaneNode};
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement, HtmlSelectElement};

/// Class names and selectors of the admin page markup.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct DomConfig {
    /// Formset rows, including the empty-form templates.
    pub item_selector: String,

    /// Class every formset row carries, also after it moved into a pane.
    pub row_class: String,
    pub template_class: String,

    /// Child of a pane that holds the item rows.
    pub content_class: String,
    pub empty_message_class: String,
}

impl Default for DomConfig {
    fn default() -> Self {
        Self {
            item_selector: ".inline-contentitem-group > .inline-related".to_string(),
            row_class: "inline-related".to_string(),
            template_class: "empty-form".to_string(),
            content_class: "cp-content".to_string(),
            empty_message_class: "cp-empty".to_string(),
        }
    }
}

impl DomConfig {
    /// Defaults, overridden by `window.CP_CONFIG` when the page defines it.
    pub fn from_window() -> Self {
        let defaults = Self::default();

        let Some(window) = web_sys::window() else {
            return defaults;
        };
        let Some(cfg) = window.get("CP_CONFIG") else {
            return defaults;
        };
        if cfg.is_undefined() || !cfg.is_object() {
            return defaults;
        }

        let read = |key: &str, fallback: String| {
            js_sys::Reflect::get(&cfg, &key.into())
                .ok()
                .and_then(|v| v.as_string())
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(fallback)
        };

        Self {
            item_selector: read("item_selector", defaults.item_selector),
            row_class: read("row_class", defaults.row_class),
            template_class: read("template_class", defaults.template_class),
            content_class: read("content_class", defaults.content_class),
            empty_message_class: read("empty_message_class", defaults.empty_message_class),
        }
    }
}

/// The live admin page.
pub struct BrowserDocument {
    config: DomConfig,
    document: Document,
}

impl BrowserDocument {
    pub fn new(config: DomConfig) -> Option<Self> {
        let document = web_sys::window().and_then(|w| w.document())?;
        Some(Self { config, document })
    }

    fn element(&self, id: &str) -> Option<Element> {
        if id.is_empty() {
            return None;
        }
        self.document.get_element_by_id(id)
    }

    fn child_id(&self, el: &Element, class: &str) -> Option<String> {
        el.query_selector(&format!(":scope > .{class}"))
            .ok()
            .flatten()
            .map(|child| child.id())
            .filter(|id| !id.is_empty())
    }

    fn row_from_element(&self, el: &Element) -> Option<RowRef> {
        let id = el.id();
        if id.is_empty() {
            return None;
        }

        Some(RowRef {
            handle: RowHandle::new(id),
            inline_type: el.get_attribute("data-inline-type"),
            is_template: el.class_list().contains(&self.config.template_class),
        })
    }

    fn pane_from_element(&self, el: &Element) -> PaneNode {
        PaneNode {
            node_id: el.id(),
            tab_region: el.get_attribute("data-tab-region"),
            content_id: self.child_id(el, &self.config.content_class),
            empty_message_id: self.child_id(el, &self.config.empty_message_class),
        }
    }
}

impl FormStore for BrowserDocument {
    fn rows(&self) -> Vec<RowRef> {
        let Ok(nodes) = self.document.query_selector_all(&self.config.item_selector) else {
            return Vec::new();
        };

        let mut out = Vec::with_capacity(nodes.length() as usize);
        for i in 0..nodes.length() {
            if let Some(row) = nodes
                .get(i)
                .and_then(|n| n.dyn_into::<Element>().ok())
                .and_then(|el| self.row_from_element(&el))
            {
                out.push(row);
            }
        }
        out
    }

    /// Rows are looked up by id, since the editor moves them out of the
    /// inline group into their pane.
    fn row(&self, handle: &RowHandle) -> Option<RowRef> {
        let el = self.element(handle.dom_id())?;
        let is_row = el
            .matches(&format!(".{}", self.config.row_class))
            .unwrap_or(false);
        if !is_row {
            return None;
        }
        self.row_from_element(&el)
    }

    fn value(&self, field_id: &str) -> Option<String> {
        let el = self.element(field_id)?;

        // <select> is allowed for the placeholder field while debugging.
        match el.dyn_into::<HtmlInputElement>() {
            Ok(input) if input.type_() == "checkbox" => {
                Some(if input.checked() { "on" } else { "" }.to_string())
            }
            Ok(input) => Some(input.value()),
            Err(el) => el.dyn_into::<HtmlSelectElement>().ok().map(|s| s.value()),
        }
    }

    fn set_value(&mut self, field_id: &str, value: &str) -> bool {
        let Some(el) = self.element(field_id) else {
            return false;
        };

        match el.dyn_into::<HtmlInputElement>() {
            Ok(input) if input.type_() == "checkbox" => {
                input.set_checked(!value.is_empty());
                true
            }
            Ok(input) => {
                input.set_value(value);
                true
            }
            Err(el) => match el.dyn_into::<HtmlSelectElement>() {
                Ok(select) => {
                    select.set_value(value);
                    true
                }
                Err(_) => false,
            },
        }
    }
}

impl PaneHost for BrowserDocument {
    fn pane_node(&self, node_id: &str) -> Option<PaneNode> {
        self.element(node_id).map(|el| self.pane_from_element(&el))
    }

    fn pane_node_for_row(&self, row: &RowHandle) -> Option<PaneNode> {
        let row_el = self.element(row.dom_id())?;
        let content = row_el
            .closest(&format!(".{}", self.config.content_class))
            .ok()
            .flatten()?;
        let pane = content.parent_element()?;
        Some(self.pane_from_element(&pane))
    }

    fn set_body_class(&mut self, class: &str, enabled: bool) {
        let Some(body) = self.document.body() else {
            return;
        };
        let classes = body.class_list();
        let result = if enabled {
            classes.add_1(class)
        } else {
            classes.remove_1(class)
        };
        if let Err(e) = result {
            leptos::logging::warn!("Unable to update body class '{class}': {e:?}");
        }
    }
}


// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use crate::placeholders::{CpData, SINGLE_PLACEHOLDER_CLASS};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const MARKUP: &str = r#"
        <div id="tab-main" data-tab-region="main">
            <div class="cp-content" id="tab-main-content">
                <div class="inline-contentitem-group">
                    <div class="inline-related" id="contentitems-0" data-inline-type="textitem">
                        <input id="id_contentitems-0-id" value="" />
                        <input id="id_contentitems-0-item_uid" value="" />
                        <input id="id_contentitems-0-placeholder" value="1" />
                        <input id="id_contentitems-0-placeholder_slot" value="" />
                        <input id="id_contentitems-0-sort_order" value="" />
                        <input id="id_contentitems-0-DELETE" type="checkbox" />
                    </div>
                    <div class="inline-related empty-form" id="textitem-empty" data-inline-type="textitem"></div>
                </div>
            </div>
            <div class="cp-empty" id="tab-main-empty"></div>
        </div>
    "#;

    fn mount() -> BrowserDocument {
        let doc = BrowserDocument::new(DomConfig::default()).expect("document");
        let body = doc.document.body().expect("body");
        body.set_inner_html(MARKUP);
        doc
    }

    #[wasm_bindgen_test]
    fn test_rows_and_fields() {
        let mut doc = mount();
        let rows = doc.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(doc.content_rows().len(), 1);
        assert_eq!(doc.template_rows()[0].handle.dom_id(), "textitem-empty");

        assert_eq!(doc.value("id_contentitems-0-placeholder").as_deref(), Some("1"));
        assert!(doc.set_value("id_contentitems-0-sort_order", "4"));
        assert_eq!(doc.value("id_contentitems-0-sort_order").as_deref(), Some("4"));
        assert_eq!(doc.value("id_contentitems-0-DELETE").as_deref(), Some(""));
        assert!(!doc.set_value("id_missing", "x"));
    }

    #[wasm_bindgen_test]
    fn test_pane_lookup_and_body_class() {
        let mut doc = mount();
        let pane = doc.pane_node("tab-main").expect("pane");
        assert_eq!(pane.content_id.as_deref(), Some("tab-main-content"));
        assert_eq!(pane.empty_message_id.as_deref(), Some("tab-main-empty"));

        let for_row = doc
            .pane_node_for_row(&RowHandle::new("contentitems-0"))
            .expect("pane for row");
        assert_eq!(for_row.node_id, "tab-main");

        doc.set_body_class(SINGLE_PLACEHOLDER_CLASS, true);
        assert!(doc.document.body().expect("body").class_list().contains(SINGLE_PLACEHOLDER_CLASS));

        // An invalid token is rejected by the DOM and only logged.
        doc.set_body_class("", true);
        assert_eq!(doc.document.body().expect("body").class_list().length(), 1);
    }

    #[wasm_bindgen_test]
    fn test_row_found_after_moving_into_pane() {
        let doc = BrowserDocument::new(DomConfig::default()).expect("document");
        let body = doc.document.body().expect("body");
        body.set_inner_html(
            r#"
            <div id="tab-sidebar" data-tab-region="sidebar">
                <div class="cp-content" id="tab-sidebar-content">
                    <div class="inline-related" id="contentitems-3" data-inline-type="textitem">
                        <input id="id_contentitems-3-item_uid" value="" />
                    </div>
                </div>
            </div>
            <input id="contentitems-notarow" />
            "#,
        );

        let row = doc.row(&RowHandle::new("contentitems-3")).expect("moved row");
        assert_eq!(row.inline_type.as_deref(), Some("textitem"));
        assert!(!row.is_template);
        assert!(doc.row(&RowHandle::new("contentitems-notarow")).is_none());

        let mut data = CpData::new();
        data.set_contentitem_metadata(
            serde_json::from_str(r#"{"auto_id": "id_%s", "prefix": "contentitems"}"#)
                .expect("metadata"),
        );
        let mut form = doc;
        let item = data
            .inline_formset_item_info(&RowHandle::new("contentitems-3"), &form)
            .expect("item info");
        let uid = item.set_uid(&mut form).expect("uid");
        assert_eq!(item.uid(&form), Some(uid));
    }

    #[wasm_bindgen_test]
    fn test_init_against_live_document() {
        let mut doc = mount();
        let mut page = BrowserDocument::new(DomConfig::default()).expect("document");
        let mut data = CpData::new();
        data.set_placeholders(
            serde_json::from_str(r#"[{"id": 1, "slot": "main", "domnode": "tab-main"}]"#)
                .expect("descriptors"),
            &mut page,
        );
        data.set_contentitem_metadata(
            serde_json::from_str(r#"{"auto_id": "id_%s", "prefix": "contentitems", "child_inlines": {"textitem": {"plugin": "TextPlugin"}}}"#)
                .expect("metadata"),
        );

        data.init(&mut doc, &mut page).expect("init");
        let bucket = data.placeholder_info("main").expect("bucket");
        assert_eq!(bucket.items, vec![RowHandle::new("contentitems-0")]);
        assert!(data.single_placeholder_mode());
    }
}
