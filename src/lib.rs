use wasm_bindgen::prelude::*;

pub mod canvas;
pub mod command_builder;
pub mod command_executors;
pub mod components;
pub mod constants;
pub mod dom_utils;
pub mod messages;
pub mod models;
pub mod network;
pub mod scheduling;
pub mod state;
pub mod storage;
pub mod ui;
pub mod update;
pub mod utils;
pub mod workflow;

#[cfg(test)]
mod tests;

use wasm_bindgen::JsCast;

// Main entry point for the WASM application
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Initialize better panic messages
    console_error_panic_hook::set_once();

    let window = web_sys::window().expect("no global `window` exists");
    let document = window.document().expect("should have a document on window");

    // Protected page: without a stored username we bounce to the login view.
    let session = match storage::load_session()? {
        Some(session) => session,
        None => {
            storage::redirect_to_login()?;
            return Ok(());
        }
    };

    ui::setup::create_base_ui(&document, &session)?;
    components::workspace::setup_canvas(&document)?;
    ui::events::setup_ui_event_handlers(&document)?;
    setup_unload_beacon(&session.username)?;

    state::APP_STATE.with(|state| {
        state.borrow_mut().session = Some(session);
    });

    // Load the catalog and environments, open the SSH session.
    state::dispatch_global_message(messages::Message::Bootstrap);

    Ok(())
}

// Server-side user state is ephemeral; drop it when the page goes away.
// `pagehide` also covers tab closes where no unload handler runs reliably.
fn setup_unload_beacon(username: &str) -> Result<(), JsValue> {
    let window = web_sys::window().expect("no global `window` exists");
    let user_id = username.to_string();

    let callback = Closure::wrap(Box::new(move || {
        network::ApiClient::send_delete_user_state_beacon(&user_id);
    }) as Box<dyn FnMut()>);

    window.add_event_listener_with_callback("pagehide", callback.as_ref().unchecked_ref())?;
    callback.forget();

    Ok(())
}
