mod index;

pub use index::{FormsetDomInfo, PlaceholderInfo, ORPHANED_SLOT};

use crate::content_item::ContentItemInfo;
use crate::error::{CpError, CpResult, Setup};
use crate::form::{FormStore, RowHandle};
use crate::models::{ContentItemMetadata, ContentItemTypeMetadata, PlaceholderDescriptor};
use crate::pane::{placeholder_pane, PaneHost, PlaceholderPane};
use std::collections::BTreeMap;

/// Body class that hides the "move to placeholder" controls.
pub const SINGLE_PLACEHOLDER_CLASS: &str = "cp-single-placeholder";

/// Editor-wide data: placeholder descriptors, item type metadata and the
/// placeholder index built from the formset.
///
/// The host sets the descriptors and metadata once, then calls `init`.
/// Lookups made before the matching setter fail with `Uninitialized`.
#[derive(Clone, Debug, Default)]
pub struct CpData {
    placeholder_metadata: Option<Vec<PlaceholderDescriptor>>,
    initial_placeholders: Option<Vec<PlaceholderDescriptor>>,
    contentitem_metadata: Option<ContentItemMetadata>,

    /// slot -> bucket
    placeholders: BTreeMap<String, PlaceholderInfo>,
    single_placeholder_mode: bool,
}

impl CpData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the placeholder descriptors.
    ///
    /// The first list is kept as the initial layout. Later calls come from
    /// layout switches and update the single-placeholder body class.
    pub fn set_placeholders(&mut self, data: Vec<PlaceholderDescriptor>, page: &mut impl PaneHost) {
        let is_update = self.initial_placeholders.is_some();
        if !is_update {
            self.initial_placeholders = Some(data.clone());
        }

        let single = data.len() == 1;
        self.placeholder_metadata = Some(data);

        if is_update {
            self.single_placeholder_mode = single;
            page.set_body_class(SINGLE_PLACEHOLDER_CLASS, single);
        }
    }

    pub fn set_contentitem_metadata(&mut self, data: ContentItemMetadata) {
        self.contentitem_metadata = Some(data);
    }

    pub fn placeholder_metadata(&self) -> Option<&[PlaceholderDescriptor]> {
        self.placeholder_metadata.as_deref()
    }

    pub fn initial_placeholders(&self) -> Option<&[PlaceholderDescriptor]> {
        self.initial_placeholders.as_deref()
    }

    pub fn placeholders(&self) -> &BTreeMap<String, PlaceholderInfo> {
        &self.placeholders
    }

    pub fn single_placeholder_mode(&self) -> bool {
        self.single_placeholder_mode
    }

    fn descriptors(&self) -> CpResult<&[PlaceholderDescriptor]> {
        self.placeholder_metadata
            .as_deref()
            .ok_or(CpError::Uninitialized(Setup::Placeholders))
    }

    pub fn contentitem_metadata(&self) -> CpResult<&ContentItemMetadata> {
        self.contentitem_metadata
            .as_ref()
            .ok_or(CpError::Uninitialized(Setup::ContentItemMetadata))
    }

    /// Find the `preferred`-th placeholder with the given role.
    ///
    /// Falls back to the last match when there are fewer matches; `None` or
    /// `Some(0)` asks for the first one.
    pub fn placeholder_for_role(
        &self,
        role: &str,
        preferred: Option<usize>,
    ) -> CpResult<Option<&PlaceholderDescriptor>> {
        let preferred = preferred.filter(|n| *n > 0);
        let mut candidate = None;
        let mut item_nr = 0;

        for placeholder in self.descriptors()? {
            if placeholder.role.as_deref() != Some(role) {
                continue;
            }

            candidate = Some(placeholder);
            item_nr += 1;
            if preferred.map_or(true, |n| n == item_nr) {
                return Ok(candidate);
            }
        }

        Ok(candidate)
    }

    /// The only placeholder of the page, if there is exactly one.
    pub fn single_placeholder(&self) -> CpResult<Option<&PlaceholderDescriptor>> {
        match self.descriptors()? {
            [only] => Ok(Some(only)),
            _ => Ok(None),
        }
    }

    pub fn placeholder_by_id(&self, id: &str) -> CpResult<Option<&PlaceholderDescriptor>> {
        if id.is_empty() {
            return Ok(None);
        }
        self.placeholder_by_property("id", id, |p| p.matches_id(id))
    }

    pub fn placeholder_by_slot(&self, slot: &str) -> CpResult<Option<&PlaceholderDescriptor>> {
        if slot.is_empty() {
            return Err(CpError::EmptySlot);
        }
        self.placeholder_by_property("slot", slot, |p| p.slot == slot)
    }

    fn placeholder_by_property(
        &self,
        prop: &str,
        value: &str,
        matches: impl Fn(&PlaceholderDescriptor) -> bool,
    ) -> CpResult<Option<&PlaceholderDescriptor>> {
        let descriptors = self.descriptors()?;

        // A page without real placeholders answers every query with its only one.
        if let [only] = descriptors {
            if only.is_sentinel() {
                return Ok(Some(only));
            }
        }

        let found = descriptors.iter().find(|p| matches(p));
        if found.is_none() {
            leptos::logging::warn!("cp_data.get_placeholder_by_{prop}: no object for '{value}'");
        }
        Ok(found)
    }

    pub fn contentitem_metadata_by_type(
        &self,
        type_name: &str,
    ) -> CpResult<Option<&ContentItemTypeMetadata>> {
        Ok(self.contentitem_metadata()?.child_inlines.get(type_name))
    }

    pub fn contentitem_metadata_by_plugin(
        &self,
        plugin: &str,
    ) -> CpResult<Option<&ContentItemTypeMetadata>> {
        let metadata = self.contentitem_metadata()?;
        if plugin.is_empty() {
            return Ok(None);
        }
        Ok(metadata
            .child_inlines
            .values()
            .find(|m| m.plugin.as_deref() == Some(plugin)))
    }

    pub fn group_prefix(&self) -> CpResult<String> {
        Ok(self.contentitem_metadata()?.group_prefix())
    }

    pub fn field_prefix(&self, index: usize) -> CpResult<String> {
        Ok(self.contentitem_metadata()?.field_prefix(index))
    }

    /// Wrap a formset row.
    pub fn inline_formset_item_info(
        &self,
        row: &RowHandle,
        form: &impl FormStore,
    ) -> CpResult<ContentItemInfo> {
        let metadata = self.contentitem_metadata()?;
        let row = form
            .row(row)
            .ok_or_else(|| CpError::UnknownRow(row.to_string()))?;
        ContentItemInfo::new(&row, metadata)
    }

    /// Panes of all placeholders, in template order. Missing panes are skipped.
    pub fn placeholder_panes(&self, page: &impl PaneHost) -> CpResult<Vec<PlaceholderPane>> {
        Ok(self
            .descriptors()?
            .iter()
            .filter_map(|p| placeholder_pane(p, page))
            .collect())
    }
}
