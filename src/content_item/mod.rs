mod ordering;

pub use ordering::save_order;

use crate::error::{CpError, CpResult};
use crate::form::{field_id, FormField, FormStore, RowHandle, RowRef};
use crate::models::{ContentItemMetadata, PlaceholderDescriptor};
use crate::pane::{PaneHost, PlaceholderPane};
use crate::util::{generate_uid, non_empty};

/// View over one content item row of the formset.
///
/// Instances are cheap and transient; the same row may be wrapped several
/// times. State lives in the form fields only, so every accessor goes through
/// the `FormStore`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentItemInfo {
    pub row: RowHandle,
    pub index: usize,

    /// `data-inline-type` of the row.
    pub inline_type: Option<String>,
    pub field_prefix: String,

    // Merged from the type metadata table; `None` for unknown types.
    pub plugin: Option<String>,
    pub name: Option<String>,
    pub contenttype_id: Option<i64>,
    pub item_template: Option<RowHandle>,
}

impl ContentItemInfo {
    pub fn new(row: &RowRef, metadata: &ContentItemMetadata) -> CpResult<Self> {
        let index = row
            .handle
            .index()
            .ok_or_else(|| CpError::MalformedRowId(row.handle.to_string()))?;

        let mut info = Self {
            row: row.handle.clone(),
            index,
            inline_type: row.inline_type.clone(),
            field_prefix: format!("{}-{}", metadata.group_prefix(), index),
            plugin: None,
            name: None,
            contenttype_id: None,
            item_template: None,
        };

        if let Some(type_meta) = info
            .inline_type
            .as_deref()
            .and_then(|t| metadata.child_inlines.get(t))
        {
            info.plugin = type_meta.plugin.clone();
            info.name = type_meta.name.clone();
            info.contenttype_id = type_meta.contenttype_id;
            info.item_template = type_meta.item_template.clone();
        }

        Ok(info)
    }

    pub fn field_id(&self, field: FormField) -> String {
        field_id(&self.field_prefix, field)
    }

    fn read(&self, form: &impl FormStore, field: FormField) -> Option<String> {
        non_empty(form.value(&self.field_id(field)))
    }

    fn write(&self, form: &mut impl FormStore, field: FormField, value: &str) -> bool {
        form.set_value(&self.field_id(field), value)
    }

    /// Persisted database id; `None` for unsaved items.
    pub fn id(&self, form: &impl FormStore) -> Option<i64> {
        self.read(form, FormField::Id)
            .and_then(|v| v.trim().parse().ok())
    }

    pub fn uid(&self, form: &impl FormStore) -> Option<String> {
        self.read(form, FormField::ItemUid)
    }

    /// Raw value of the placeholder id field.
    pub fn placeholder_id(&self, form: &impl FormStore) -> Option<String> {
        self.read(form, FormField::Placeholder)
    }

    pub fn placeholder_slot(&self, form: &impl FormStore) -> Option<String> {
        self.read(form, FormField::PlaceholderSlot)
    }

    pub fn parent_item(&self, form: &impl FormStore) -> Option<i64> {
        self.read(form, FormField::ParentItem)
            .and_then(|v| v.trim().parse().ok())
    }

    pub fn parent_item_uid(&self, form: &impl FormStore) -> Option<String> {
        self.read(form, FormField::ParentItemUid)
    }

    pub fn sort_order(&self, form: &impl FormStore) -> Option<i32> {
        self.read(form, FormField::SortOrder)
            .and_then(|v| v.trim().parse().ok())
    }

    /// Checkbox values arrive as `on`/`true`/`1`.
    pub fn is_deleted(&self, form: &impl FormStore) -> bool {
        self.read(form, FormField::Delete)
            .is_some_and(|v| matches!(v.as_str(), "on" | "true" | "1" | "checked"))
    }

    pub fn pane(&self, page: &impl PaneHost) -> Option<PlaceholderPane> {
        crate::pane::placeholder_pane_for_item(&self.row, page)
    }

    pub fn set_placeholder(&self, form: &mut impl FormStore, placeholder: &PlaceholderDescriptor) {
        let id = placeholder.id.map(|id| id.to_string()).unwrap_or_default();
        self.write(form, FormField::Placeholder, &id);
        self.write(form, FormField::PlaceholderSlot, &placeholder.slot);
    }

    pub fn clear_placeholder_id(&self, form: &mut impl FormStore) {
        self.write(form, FormField::Placeholder, "");
    }

    /// Give the row a client-side uid unless it already has one.
    pub fn set_uid(&self, form: &mut impl FormStore) -> CpResult<String> {
        if let Some(uid) = self.uid(&*form) {
            return Ok(uid);
        }

        let uid = generate_uid()?;
        if !self.write(form, FormField::ItemUid, &uid) {
            return Err(CpError::MissingField(self.field_id(FormField::ItemUid)));
        }
        Ok(uid)
    }

    /// Link to a parent item.
    ///
    /// A saved parent is referenced by id. An unsaved one is referenced by its
    /// uid, which the server resolves once both rows are stored.
    pub fn set_parent_item(&self, form: &mut impl FormStore, parent: &ContentItemInfo) {
        match parent.id(&*form).filter(|id| *id != 0) {
            Some(id) => {
                self.write(form, FormField::ParentItem, &id.to_string());
                self.write(form, FormField::ParentItemUid, "");
            }
            None => {
                let uid = parent.uid(&*form).unwrap_or_default();
                self.write(form, FormField::ParentItem, "");
                self.write(form, FormField::ParentItemUid, &uid);
            }
        }
    }

    pub fn set_sort_order(&self, form: &mut impl FormStore, sort_order: i32) {
        self.write(form, FormField::SortOrder, &sort_order.to_string());
    }
}
