//! Global toolbar and header event handlers. Block-level handlers are wired
//! in `components::block_factory`.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlInputElement, MouseEvent};

use crate::{dom_utils, messages::Message, state::dispatch_global_message};

/// Entry point, called once after the base UI was rendered.
pub fn setup_ui_event_handlers(document: &Document) -> Result<(), JsValue> {
    setup_run_all_handler(document)?;
    setup_auto_chain_handler(document)?;
    setup_import_pattern_handler(document)?;
    setup_clear_handler(document)?;
    setup_answer_handler(document)?;
    setup_logout_handler(document)?;
    Ok(())
}

fn setup_run_all_handler(document: &Document) -> Result<(), JsValue> {
    if let Some(btn) = document.get_element_by_id("run-all-button") {
        let cb = Closure::<dyn FnMut(_)>::wrap(Box::new(move |_e: MouseEvent| {
            dispatch_global_message(Message::RunAll);
        }));
        btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }
    Ok(())
}

fn setup_auto_chain_handler(document: &Document) -> Result<(), JsValue> {
    if let Some(btn) = document.get_element_by_id("auto-chain-button") {
        let cb = Closure::<dyn FnMut(_)>::wrap(Box::new(move |_e: MouseEvent| {
            dispatch_global_message(Message::AutoChain);
        }));
        btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }
    Ok(())
}

fn setup_import_pattern_handler(document: &Document) -> Result<(), JsValue> {
    if let Some(btn) = document.get_element_by_id("import-pattern-button") {
        let cb = Closure::<dyn FnMut(_)>::wrap(Box::new(move |_e: MouseEvent| {
            dispatch_global_message(Message::ImportPattern);
        }));
        btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }
    Ok(())
}

fn setup_clear_handler(document: &Document) -> Result<(), JsValue> {
    if let Some(btn) = document.get_element_by_id("clear-button") {
        let cb = Closure::<dyn FnMut(_)>::wrap(Box::new(move |_e: MouseEvent| {
            if dom_utils::confirm("Remove all blocks from the canvas? This cannot be undone.") {
                dispatch_global_message(Message::ClearCanvas);
            }
        }));
        btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }
    Ok(())
}

fn setup_answer_handler(document: &Document) -> Result<(), JsValue> {
    if let Some(btn) = document.get_element_by_id("answer-submit") {
        let cb = Closure::<dyn FnMut(_)>::wrap(Box::new(move |_e: MouseEvent| {
            let answer = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id("answer-input"))
                .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
                .map(|input| input.value())
                .unwrap_or_default();
            dispatch_global_message(Message::SubmitAnswer(answer));
        }));
        btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }
    Ok(())
}

fn setup_logout_handler(document: &Document) -> Result<(), JsValue> {
    if let Some(btn) = document.get_element_by_id("logout-button") {
        let cb = Closure::<dyn FnMut(_)>::wrap(Box::new(move |_e: MouseEvent| {
            dispatch_global_message(Message::Logout);
        }));
        btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }
    Ok(())
}
