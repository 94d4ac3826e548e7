//! Data layer of the placeholder editor: which content item rows belong to
//! which placeholder of the page, plus lookup helpers for the UI code.

#[cfg(target_arch = "wasm32")]
mod bindings;
mod content_item;
mod dom;
mod error;
mod form;
mod models;
mod pane;
mod placeholders;
mod util;

pub use content_item::{save_order, ContentItemInfo};
pub use dom::{BrowserDocument, DomConfig};
pub use error::{CpError, CpResult, Setup};
pub use form::{FormField, FormStore, MemoryForm, RowHandle, RowRef};
pub use models::{
    ContentItemMetadata, ContentItemTypeMetadata, PlaceholderDescriptor, SENTINEL_PLACEHOLDER_ID,
};
pub use pane::{
    placeholder_pane, placeholder_pane_for_item, MemoryPage, PaneHost, PaneNode, PlaceholderPane,
    ORPHANED_REGION,
};
pub use placeholders::{
    CpData, FormsetDomInfo, PlaceholderInfo, ORPHANED_SLOT, SINGLE_PLACEHOLDER_CLASS,
};

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn start() {
    console_error_panic_hook::set_once();
}
