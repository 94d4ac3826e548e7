use crate::form::RowHandle;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placeholder id used by the host when the page has no real placeholders.
///
/// A list holding only this descriptor turns every by-id / by-slot lookup into
/// "return the single placeholder".
pub const SENTINEL_PLACEHOLDER_ID: i64 = -1;

/// A placeholder region as described by the host page.
///
/// The list order is significant (it follows the template), so descriptors are
/// kept in a `Vec` rather than a map.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PlaceholderDescriptor {
    pub slot: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub role: Option<String>,

    /// Database id; `None` for placeholders that were not saved yet.
    #[serde(default)]
    pub id: Option<i64>,

    /// DOM id of the pane that renders this placeholder.
    #[serde(default)]
    pub domnode: String,
}

impl PlaceholderDescriptor {
    pub(crate) fn is_sentinel(&self) -> bool {
        self.id == Some(SENTINEL_PLACEHOLDER_ID)
    }

    /// Numeric id comparison against a raw form value, so `"3"`, `"03"` and
    /// `"3.0"` all match `3`.
    pub(crate) fn matches_id(&self, raw: &str) -> bool {
        let Ok(value) = raw.trim().parse::<f64>() else {
            return false;
        };
        self.id.is_some_and(|id| id as f64 == value)
    }
}

/// Metadata of one content item type (one polymorphic child inline).
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentItemTypeMetadata {
    #[serde(default)]
    pub plugin: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(rename = "type", default)]
    pub type_name: Option<String>,

    #[serde(default)]
    pub contenttype_id: Option<i64>,

    /// The formset's empty-form row for this type; filled in by `CpData::init`.
    #[serde(skip)]
    pub item_template: Option<RowHandle>,
}

/// Formset-wide metadata supplied once by the host.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ContentItemMetadata {
    /// Django `auto_id` pattern, e.g. `id_%s`.
    pub auto_id: String,

    /// Formset prefix, e.g. `contentitems`.
    pub prefix: String,

    /// type name -> metadata
    #[serde(default)]
    pub child_inlines: BTreeMap<String, ContentItemTypeMetadata>,
}

impl ContentItemMetadata {
    /// Prefix shared by every field id of the formset (`id_contentitems`).
    pub fn group_prefix(&self) -> String {
        self.auto_id.replacen("%s", &self.prefix, 1)
    }

    /// Field name prefix of a single form (`contentitems-3`).
    pub fn field_prefix(&self, index: usize) -> String {
        format!("{}-{}", self.prefix, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_descriptor_contract_deserialize() {
        let json = r#"[
            {"id": 3, "slot": "main", "title": "Main", "role": "m", "domnode": "tab-main"},
            {"slot": "sidebar", "title": "Sidebar", "role": null, "domnode": "tab-sidebar"}
        ]"#;
        let parsed: Vec<PlaceholderDescriptor> =
            serde_json::from_str(json).expect("descriptors should parse");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].id, Some(3));
        assert_eq!(parsed[0].role.as_deref(), Some("m"));
        assert!(parsed[1].id.is_none());
        assert!(parsed[1].role.is_none());
    }

    #[test]
    fn test_matches_id_is_loose() {
        let p = PlaceholderDescriptor {
            slot: "main".to_string(),
            title: String::new(),
            role: None,
            id: Some(12),
            domnode: String::new(),
        };
        assert!(p.matches_id("12"));
        assert!(p.matches_id(" 12 "));
        assert!(p.matches_id("012"));
        assert!(p.matches_id("12.0"));
        assert!(!p.matches_id("1"));
        assert!(!p.matches_id("twelve"));
        assert!(!p.is_sentinel());
    }

    #[test]
    fn test_contentitem_metadata_prefixes() {
        let json = r#"{
            "auto_id": "id_%s",
            "prefix": "contentitems",
            "child_inlines": {
                "textitem": {"plugin": "TextPlugin", "name": "Text", "type": "textitem", "contenttype_id": 14}
            }
        }"#;
        let meta: ContentItemMetadata = serde_json::from_str(json).expect("metadata should parse");
        assert_eq!(meta.group_prefix(), "id_contentitems");
        assert_eq!(meta.field_prefix(4), "contentitems-4");

        let text = &meta.child_inlines["textitem"];
        assert_eq!(text.plugin.as_deref(), Some("TextPlugin"));
        assert_eq!(text.contenttype_id, Some(14));
        assert!(text.item_template.is_none());
    }
}
