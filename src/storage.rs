//! Session persistence. The login page (a separate view, outside this
//! crate) writes `username`, `level` and `permissions` to localStorage;
//! every protected page load reads them back and redirects to the login
//! view when no username is present.

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;
use web_sys::Storage;

use crate::constants::{
    LOGIN_PAGE_URL, STORAGE_KEY_LEVEL, STORAGE_KEY_PERMISSIONS, STORAGE_KEY_USERNAME,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Permission {
    pub number: u32,
    #[serde(default)]
    pub description: String,
}

#[derive(Clone, Debug)]
pub struct Session {
    pub username: String,
    pub level: String,
    pub permissions: Vec<Permission>,
}

fn local_storage() -> Result<Storage, JsValue> {
    web_sys::window()
        .ok_or_else(|| JsValue::from_str("no global window"))?
        .local_storage()?
        .ok_or_else(|| JsValue::from_str("no local storage"))
}

/// Read the persisted session. `None` means nobody is logged in and the
/// caller should redirect to the login view.
pub fn load_session() -> Result<Option<Session>, JsValue> {
    let storage = local_storage()?;

    let username = match storage.get_item(STORAGE_KEY_USERNAME)? {
        Some(name) if !name.trim().is_empty() => name,
        _ => return Ok(None),
    };
    let level = storage.get_item(STORAGE_KEY_LEVEL)?.unwrap_or_default();

    // permissions are optional; a parse failure only loses the listing
    let permissions = storage
        .get_item(STORAGE_KEY_PERMISSIONS)?
        .and_then(|raw| match serde_json::from_str::<Vec<Permission>>(&raw) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                web_sys::console::warn_1(&format!("failed to parse permissions: {}", e).into());
                None
            }
        })
        .unwrap_or_default();

    Ok(Some(Session { username, level, permissions }))
}

/// Drop the stored session and go back to the login view.
pub fn logout() -> Result<(), JsValue> {
    let storage = local_storage()?;
    storage.remove_item(STORAGE_KEY_USERNAME)?;
    storage.remove_item(STORAGE_KEY_LEVEL)?;
    storage.remove_item(STORAGE_KEY_PERMISSIONS)?;
    redirect_to_login()
}

pub fn redirect_to_login() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    window.location().set_href(LOGIN_PAGE_URL)
}
