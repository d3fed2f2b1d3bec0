//! dom_utils.rs - thin helper layer for repetitive DOM operations.

use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

/// Create an element, set its class, and return it.
pub fn create_with_class(document: &Document, tag: &str, class: &str) -> Result<Element, JsValue> {
    let el = document.create_element(tag)?;
    el.set_class_name(class);
    Ok(el)
}

/// Remove the `hidden` class so the element becomes visible.
pub fn show(el: &Element) {
    let _ = el.class_list().remove_1("hidden");
}

/// Hide the element by toggling CSS classes.
pub fn hide(el: &Element) {
    let _ = el.class_list().add_1("hidden");
}

/// Blocking alert dialog, the error surface for execution, pattern and
/// answer failures.
pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

/// `window.confirm` with a false fallback when the dialog cannot be shown.
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}
