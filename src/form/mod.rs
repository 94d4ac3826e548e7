use crate::models::ContentItemMetadata;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{AsRefStr, EnumIter, IntoEnumIterator};

/// Conventional per-row fields of the content item formset.
///
/// Field ids on the page are `"{field_prefix}-{field}"`, e.g.
/// `id_contentitems-3-placeholder_slot`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum FormField {
    Id,
    ItemUid,
    Placeholder,
    PlaceholderSlot,
    ParentItem,
    ParentItemUid,
    SortOrder,
    #[strum(serialize = "DELETE")]
    Delete,
}

pub(crate) fn field_id(field_prefix: &str, field: FormField) -> String {
    format!("{}-{}", field_prefix, field.as_ref())
}

/// Weak reference to a form row: the row's DOM id (`contentitems-3`).
///
/// The form owns the row; a handle may outlive it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowHandle(pub String);

impl RowHandle {
    pub fn new(dom_id: impl Into<String>) -> Self {
        Self(dom_id.into())
    }

    pub fn dom_id(&self) -> &str {
        &self.0
    }

    /// Numeric formset index taken from the id suffix.
    pub fn index(&self) -> Option<usize> {
        let (_, suffix) = self.0.rsplit_once('-')?;
        suffix.parse().ok()
    }
}

impl std::fmt::Display for RowHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A row as reported by the form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowRef {
    pub handle: RowHandle,

    /// `data-inline-type` of the row.
    pub inline_type: Option<String>,

    /// Empty-form rows used to instantiate new items.
    pub is_template: bool,
}

/// Access to the live formset.
///
/// Field values are addressed by field id; a missing field reads as `None`
/// and ignores writes, the same way an empty DOM query does.
pub trait FormStore {
    fn rows(&self) -> Vec<RowRef>;

    fn value(&self, field_id: &str) -> Option<String>;

    /// Returns `false` when the field does not exist.
    fn set_value(&mut self, field_id: &str, value: &str) -> bool;

    fn row(&self, handle: &RowHandle) -> Option<RowRef> {
        self.rows().into_iter().find(|r| &r.handle == handle)
    }

    fn content_rows(&self) -> Vec<RowRef> {
        self.rows().into_iter().filter(|r| !r.is_template).collect()
    }

    fn template_rows(&self) -> Vec<RowRef> {
        self.rows().into_iter().filter(|r| r.is_template).collect()
    }
}

/// In-memory formset, used off-page and in tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryForm {
    rows: Vec<RowRef>,
    values: BTreeMap<String, String>,
}

impl MemoryForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row with every conventional field present and empty.
    pub fn add_content_row(
        &mut self,
        meta: &ContentItemMetadata,
        index: usize,
        inline_type: &str,
    ) -> RowHandle {
        let handle = RowHandle::new(meta.field_prefix(index));
        let prefix = format!("{}-{}", meta.group_prefix(), index);
        for field in FormField::iter() {
            self.values.insert(field_id(&prefix, field), String::new());
        }
        self.rows.push(RowRef {
            handle: handle.clone(),
            inline_type: Some(inline_type.to_string()),
            is_template: false,
        });
        handle
    }

    /// Add an empty-form template row (`contentitems-__prefix__`-style id).
    pub fn add_template_row(&mut self, dom_id: &str, inline_type: Option<&str>) -> RowHandle {
        let handle = RowHandle::new(dom_id);
        self.rows.push(RowRef {
            handle: handle.clone(),
            inline_type: inline_type.map(str::to_string),
            is_template: true,
        });
        handle
    }

    /// Add a content row without any fields.
    pub fn add_bare_row(&mut self, dom_id: &str, inline_type: Option<&str>) -> RowHandle {
        let handle = RowHandle::new(dom_id);
        self.rows.push(RowRef {
            handle: handle.clone(),
            inline_type: inline_type.map(str::to_string),
            is_template: false,
        });
        handle
    }

    pub fn insert_value(&mut self, field_id: &str, value: &str) {
        self.values.insert(field_id.to_string(), value.to_string());
    }

    pub fn remove_row(&mut self, handle: &RowHandle) {
        self.rows.retain(|r| &r.handle != handle);
    }
}

impl FormStore for MemoryForm {
    fn rows(&self) -> Vec<RowRef> {
        self.rows.clone()
    }

    fn value(&self, field_id: &str) -> Option<String> {
        self.values.get(field_id).cloned()
    }

    fn set_value(&mut self, field_id: &str, value: &str) -> bool {
        match self.values.get_mut(field_id) {
            Some(v) => {
                *v = value.to_string();
                true
            }
            None => false,
        }
    }
}
