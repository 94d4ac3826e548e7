//! JavaScript entry points for the admin page.
//!
//! The page calls `cpSetPlaceholders` and `cpSetContentitemMetadata` with the
//! JSON it renders, then `cpInit` once the formset is in the DOM.

use crate::dom::{BrowserDocument, DomConfig};
use crate::error::CpError;
use crate::form::RowHandle;
use crate::placeholders::CpData;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;

thread_local! {
    static CP_DATA: RefCell<CpData> = RefCell::new(CpData::new());
}

fn js_error(e: CpError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn from_js<T: DeserializeOwned>(value: &JsValue) -> Result<T, JsValue> {
    let json: String = js_sys::JSON::stringify(value)?.into();
    serde_json::from_str(&json).map_err(|e| js_error(e.into()))
}

fn browser_document() -> Result<BrowserDocument, JsValue> {
    BrowserDocument::new(DomConfig::from_window())
        .ok_or_else(|| JsValue::from_str("document is not available"))
}

#[wasm_bindgen(js_name = cpSetPlaceholders)]
pub fn cp_set_placeholders(data: JsValue) -> Result<(), JsValue> {
    let descriptors = from_js(&data)?;
    let mut page = browser_document()?;
    CP_DATA.with(|d| d.borrow_mut().set_placeholders(descriptors, &mut page));
    Ok(())
}

#[wasm_bindgen(js_name = cpSetContentitemMetadata)]
pub fn cp_set_contentitem_metadata(data: JsValue) -> Result<(), JsValue> {
    let metadata = from_js(&data)?;
    CP_DATA.with(|d| d.borrow_mut().set_contentitem_metadata(metadata));
    Ok(())
}

#[wasm_bindgen(js_name = cpInit)]
pub fn cp_init() -> Result<(), JsValue> {
    let mut form = browser_document()?;
    let mut page = browser_document()?;
    CP_DATA.with(|d| d.borrow_mut().init(&mut form, &mut page).map_err(js_error))
}

#[wasm_bindgen(js_name = cpCleanupEmptyPlaceholders)]
pub fn cp_cleanup_empty_placeholders() {
    CP_DATA.with(|d| d.borrow_mut().cleanup_empty_placeholders());
}

/// Returns `true` when the placeholder has no items left.
#[wasm_bindgen(js_name = cpRemoveItem)]
pub fn cp_remove_item(placeholder_slot: &str, row_id: &str) -> bool {
    CP_DATA.with(|d| {
        d.borrow_mut()
            .remove_item(placeholder_slot, &RowHandle::new(row_id))
    })
}

/// Move a row to the placeholder with the given slot.
#[wasm_bindgen(js_name = cpMoveItem)]
pub fn cp_move_item(row_id: &str, from_slot: &str, to_slot: &str) -> Result<bool, JsValue> {
    let mut form = browser_document()?;
    CP_DATA.with(|d| {
        let mut data = d.borrow_mut();
        let item = data
            .inline_formset_item_info(&RowHandle::new(row_id), &form)
            .map_err(js_error)?;
        let Some(to) = data.placeholder_by_slot(to_slot).map_err(js_error)?.cloned() else {
            return Err(JsValue::from_str(&format!("no placeholder for '{to_slot}'")));
        };
        Ok(data.move_item(&item, from_slot, &to, &mut form))
    })
}

#[wasm_bindgen(js_name = cpSetUid)]
pub fn cp_set_uid(row_id: &str) -> Result<String, JsValue> {
    let mut form = browser_document()?;
    CP_DATA.with(|d| {
        let data = d.borrow();
        let item = data
            .inline_formset_item_info(&RowHandle::new(row_id), &form)
            .map_err(js_error)?;
        item.set_uid(&mut form).map_err(js_error)
    })
}

#[wasm_bindgen(js_name = cpSinglePlaceholderSlot)]
pub fn cp_single_placeholder_slot() -> Result<Option<String>, JsValue> {
    CP_DATA.with(|d| {
        d.borrow()
            .single_placeholder()
            .map(|p| p.map(|p| p.slot.clone()))
            .map_err(js_error)
    })
}
