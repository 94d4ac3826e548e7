use super::{CpData, SINGLE_PLACEHOLDER_CLASS};
use crate::content_item::ContentItemInfo;
use crate::error::CpResult;
use crate::form::{FormField, FormStore, RowHandle};
use crate::models::PlaceholderDescriptor;
use crate::pane::PaneHost;
use std::collections::BTreeMap;

/// Slot of the bucket for items that never had a placeholder.
///
/// Items pointing to a removed placeholder id land in `__orphaned__@<id>`.
pub const ORPHANED_SLOT: &str = "__orphaned__";

/// The items currently assigned to one placeholder, in form order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaceholderInfo {
    pub slot: String,
    pub role: Option<String>,
    pub items: Vec<RowHandle>,

    /// Synthesized bucket for items whose placeholder could not be resolved.
    pub is_fallback: bool,
}

/// Field ids and placeholder assignment of one formset row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormsetDomInfo {
    pub root: RowHandle,

    /// Management form `TOTAL_FORMS` field id.
    pub total_forms: String,
    pub id_field: String,
    pub delete_checkbox: String,
    pub placeholder_id: Option<String>,
    pub placeholder_slot: Option<String>,
}

impl CpData {
    /// Build the placeholder index from the formset.
    ///
    /// Every non-template row ends up in exactly one bucket. Rows whose
    /// placeholder can't be resolved go to a fallback bucket and lose their
    /// stale placeholder id. Also links each item type to its empty-form row.
    pub fn init(&mut self, form: &mut impl FormStore, page: &mut impl PaneHost) -> CpResult<()> {
        let metadata = self.contentitem_metadata()?.clone();
        self.placeholders.clear();

        if let Some(descriptor_count) = self.placeholder_metadata.as_ref().map(Vec::len) {
            for row in form.content_rows() {
                // Without an index the row's fields can't be addressed.
                let item = match ContentItemInfo::new(&row, &metadata) {
                    Ok(item) => item,
                    Err(e) => {
                        leptos::logging::warn!("cp_data.init: {e}");
                        self.get_or_create_placeholder_info(None, None, None)
                            .items
                            .push(row.handle);
                        continue;
                    }
                };

                // The slot is only filled for items created on this page.
                let placeholder_id = item.placeholder_id(&*form);
                let placeholder_slot = item.placeholder_slot(&*form);

                let placeholder = if let Some(id) = placeholder_id.as_deref() {
                    self.placeholder_by_id(id)?.cloned()
                } else if let Some(slot) = placeholder_slot.as_deref() {
                    self.placeholder_by_slot(slot)?.cloned()
                } else {
                    None
                };

                let is_fallback = {
                    let info = self.get_or_create_placeholder_info(
                        placeholder.as_ref(),
                        placeholder_id.as_deref(),
                        placeholder_slot.as_deref(),
                    );
                    info.items.push(item.row.clone());
                    info.is_fallback
                };

                if is_fallback {
                    item.clear_placeholder_id(form);
                }
            }

            if descriptor_count == 1 {
                self.single_placeholder_mode = true;
                page.set_body_class(SINGLE_PLACEHOLDER_CLASS, true);
            }
        }

        let templates: BTreeMap<String, RowHandle> = form
            .template_rows()
            .into_iter()
            .filter_map(|row| row.inline_type.map(|t| (t, row.handle)))
            .collect();

        if let Some(metadata) = self.contentitem_metadata.as_mut() {
            for (type_name, type_meta) in metadata.child_inlines.iter_mut() {
                type_meta.item_template = templates.get(type_name).cloned();
            }
        }

        Ok(())
    }

    /// Bucket for a placeholder, created on first use.
    ///
    /// Without a descriptor the bucket is keyed by the given slot, or by a
    /// synthesized orphan slot so "never assigned" (`__orphaned__`) stays
    /// distinguishable from "assigned to a removed placeholder"
    /// (`__orphaned__@<id>`).
    pub fn get_or_create_placeholder_info(
        &mut self,
        placeholder: Option<&PlaceholderDescriptor>,
        fallback_id: Option<&str>,
        fallback_slot: Option<&str>,
    ) -> &mut PlaceholderInfo {
        let fallback_id = fallback_id.filter(|v| !v.is_empty());
        let fallback_slot = fallback_slot.filter(|v| !v.is_empty());

        let (slot, role, is_fallback) = match placeholder {
            Some(p) => (p.slot.clone(), p.role.clone(), false),
            None => {
                let slot = match (fallback_slot, fallback_id) {
                    (Some(slot), _) => slot.to_string(),
                    (None, None) => ORPHANED_SLOT.to_string(),
                    (None, Some(id)) => format!("{ORPHANED_SLOT}@{id}"),
                };
                (slot, None, fallback_slot.is_none())
            }
        };

        self.placeholders
            .entry(slot.clone())
            .or_insert_with(|| PlaceholderInfo {
                slot,
                role,
                items: Vec::new(),
                is_fallback,
            })
    }

    pub fn placeholder_info(&self, slot: &str) -> Option<&PlaceholderInfo> {
        self.placeholders.get(slot)
    }

    pub fn add_item(&mut self, placeholder: &PlaceholderDescriptor, row: RowHandle) {
        self.get_or_create_placeholder_info(Some(placeholder), None, None)
            .items
            .push(row);
    }

    /// Slot of the bucket that currently holds the row.
    pub fn slot_of_item(&self, row: &RowHandle) -> Option<&str> {
        self.placeholders
            .values()
            .find(|info| info.items.contains(row))
            .map(|info| info.slot.as_str())
    }

    /// Remove a row from a bucket. Returns `true` when the bucket is empty
    /// afterwards, so the caller can show the pane's empty message.
    pub fn remove_item(&mut self, slot: &str, row: &RowHandle) -> bool {
        let Some(info) = self.placeholders.get_mut(slot) else {
            leptos::logging::warn!("cp_data.remove_dom_item: no placeholder for '{slot}'");
            return true;
        };

        if let Some(pos) = info.items.iter().position(|r| r == row) {
            info.items.remove(pos);
        }
        info.items.is_empty()
    }

    /// Move an item to another placeholder: index and form fields together.
    ///
    /// When `from_slot` doesn't hold the row, it is taken from the bucket that
    /// does. Returns whether the bucket it left is now empty.
    pub fn move_item(
        &mut self,
        item: &ContentItemInfo,
        from_slot: &str,
        to: &PlaceholderDescriptor,
        form: &mut impl FormStore,
    ) -> bool {
        let holds_row = self
            .placeholders
            .get(from_slot)
            .is_some_and(|info| info.items.contains(&item.row));

        let now_empty = if holds_row {
            self.remove_item(from_slot, &item.row)
        } else if let Some(actual) = self.slot_of_item(&item.row).map(str::to_string) {
            leptos::logging::warn!(
                "cp_data.move_item: {} is in '{actual}', not '{from_slot}'",
                item.row
            );
            self.remove_item(&actual, &item.row)
        } else {
            self.remove_item(from_slot, &item.row)
        };
        self.add_item(to, item.row.clone());
        item.set_placeholder(form, to);
        now_empty
    }

    /// Drop buckets that no longer hold any item.
    pub fn cleanup_empty_placeholders(&mut self) {
        self.placeholders.retain(|_, info| !info.items.is_empty());
    }

    pub fn formset_dom_info(&self, row: &RowHandle, form: &impl FormStore) -> CpResult<FormsetDomInfo> {
        let item = self.inline_formset_item_info(row, form)?;
        let group_prefix = self.group_prefix()?;

        let placeholder_id = item.placeholder_id(form);
        let mut placeholder_slot = item.placeholder_slot(form);

        // The slot is only filled in when creating items; restore it for saved ones.
        if placeholder_slot.is_none() {
            if let Some(id) = placeholder_id.as_deref() {
                placeholder_slot = self.placeholder_by_id(id)?.map(|p| p.slot.clone());
            }
        }

        Ok(FormsetDomInfo {
            root: item.row.clone(),
            total_forms: format!("{group_prefix}-TOTAL_FORMS"),
            id_field: item.field_id(FormField::Id),
            delete_checkbox: item.field_id(FormField::Delete),
            placeholder_id,
            placeholder_slot,
        })
    }

    /// Value of the management form's `TOTAL_FORMS` field.
    pub fn total_forms(&self, form: &impl FormStore) -> CpResult<Option<usize>> {
        let field = format!("{}-TOTAL_FORMS", self.group_prefix()?);
        Ok(form.value(&field).and_then(|v| v.trim().parse().ok()))
    }
}
