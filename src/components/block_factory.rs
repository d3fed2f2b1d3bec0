//! Builds the visual representation of a placed block: a positioned card
//! with a draggable header, delete/run controls and one input row per
//! template placeholder occurrence. The block's state lives in
//! `WorkflowCanvas`; this module only projects it into the DOM and wires
//! the handlers that dispatch reducer messages.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, HtmlSelectElement, MouseEvent};

use crate::constants::{BLOCK_WIDTH, BLOCK_Z_INDEX};
use crate::dom_utils::create_with_class;
use crate::messages::Message;
use crate::state::{dispatch_global_message, APP_STATE};
use crate::workflow::{placeholders, Block, BlockId};

pub fn block_dom_id(id: BlockId) -> String {
    format!("block-{}", id)
}

/// Insert the block's element into the canvas container. Logs and gives up
/// on DOM failures; the model block stays valid either way.
pub fn mount_block(block: &Block) {
    let result = (|| -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let container = document
            .get_element_by_id("canvas-container")
            .ok_or_else(|| JsValue::from_str("canvas container missing"))?;
        let element = build_block_element(&document, block)?;
        container.append_child(&element)?;
        Ok(())
    })();

    if let Err(e) = result {
        web_sys::console::error_1(&format!("failed to mount block: {:?}", e).into());
    }
}

pub fn unmount_block(id: BlockId) {
    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
        if let Some(element) = document.get_element_by_id(&block_dom_id(id)) {
            element.remove();
        }
    }
}

pub fn unmount_all() {
    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
        if let Some(container) = document.get_element_by_id("canvas-container") {
            let blocks = container.get_elements_by_class_name("command-block");
            // HtmlCollection is live; remove from the end
            for i in (0..blocks.length()).rev() {
                if let Some(el) = blocks.item(i) {
                    el.remove();
                }
            }
        }
    }
}

pub fn set_block_position(id: BlockId, position: crate::models::Position) {
    if let Some(el) = block_html_element(id) {
        let style = el.style();
        let _ = style.set_property("left", &format!("{}px", position.x));
        let _ = style.set_property("top", &format!("{}px", position.y));
    }
}

pub fn set_block_z_index(id: BlockId, z_index: &str) {
    if let Some(el) = block_html_element(id) {
        let _ = el.style().set_property("z-index", z_index);
    }
}

fn block_html_element(id: BlockId) -> Option<HtmlElement> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(&block_dom_id(id)))
        .and_then(|e| e.dyn_into::<HtmlElement>().ok())
}

fn build_block_element(document: &Document, block: &Block) -> Result<Element, JsValue> {
    let root = create_with_class(document, "div", "command-block")?;
    root.set_id(&block_dom_id(block.id));
    if !block.descriptor.description.is_empty() {
        root.set_attribute("title", &block.descriptor.description)?;
    }

    let root_style = root.dyn_ref::<HtmlElement>().unwrap().style();
    root_style.set_property("left", &format!("{}px", block.position.x))?;
    root_style.set_property("top", &format!("{}px", block.position.y))?;
    root_style.set_property("width", &format!("{}px", BLOCK_WIDTH))?;
    root_style.set_property("z-index", BLOCK_Z_INDEX)?;

    let header = build_header(document, block)?;
    root.append_child(&header)?;
    let params = build_params(document, block)?;
    root.append_child(&params)?;
    Ok(root)
}

fn build_header(document: &Document, block: &Block) -> Result<Element, JsValue> {
    let header = create_with_class(document, "div", "block-header")?;

    let title = create_with_class(document, "span", "block-title")?;
    title.set_text_content(Some(&block.descriptor.command_name));
    header.append_child(&title)?;

    let run = create_with_class(document, "button", "block-run")?;
    run.set_text_content(Some("▶"));
    run.set_attribute("title", "Run this block")?;
    header.append_child(&run)?;

    let delete = create_with_class(document, "button", "block-delete")?;
    delete.set_text_content(Some("×"));
    delete.set_attribute("title", "Delete this block")?;
    header.append_child(&delete)?;

    let block_id = block.id;
    let run_click = Closure::wrap(Box::new(move |event: MouseEvent| {
        event.stop_propagation();
        dispatch_global_message(Message::RunBlock { block_id });
    }) as Box<dyn FnMut(_)>);
    run.add_event_listener_with_callback("click", run_click.as_ref().unchecked_ref())?;
    run_click.forget();

    let delete_click = Closure::wrap(Box::new(move |event: MouseEvent| {
        event.stop_propagation();
        dispatch_global_message(Message::RemoveBlock { block_id });
    }) as Box<dyn FnMut(_)>);
    delete.add_event_listener_with_callback("click", delete_click.as_ref().unchecked_ref())?;
    delete_click.forget();

    // Pointer-down on the header (but not on its controls) starts a drag.
    let mousedown = Closure::wrap(Box::new(move |event: MouseEvent| {
        if event.button() != 0 {
            return;
        }
        let on_control = event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .map(|el| el.tag_name() == "BUTTON")
            .unwrap_or(false);
        if on_control {
            return;
        }
        event.prevent_default();

        let origin = match crate::components::workspace::canvas_origin() {
            Some(origin) => origin,
            None => return,
        };
        let pointer_x = event.client_x() as f64 - origin.0;
        let pointer_y = event.client_y() as f64 - origin.1;

        let position = APP_STATE.with(|state| {
            state.borrow().workflow.get(block_id).map(|b| b.position)
        });
        if let Some(position) = position {
            dispatch_global_message(Message::StartDragging {
                block_id,
                offset_x: pointer_x - position.x,
                offset_y: pointer_y - position.y,
            });
        }
    }) as Box<dyn FnMut(_)>);
    header.add_event_listener_with_callback("mousedown", mousedown.as_ref().unchecked_ref())?;
    mousedown.forget();

    Ok(header)
}

/// One row per placeholder occurrence. A placeholder named exactly
/// `options` with `available_options` on the descriptor becomes a bounded
/// select over the option keys; everything else is a free-text input.
fn build_params(document: &Document, block: &Block) -> Result<Element, JsValue> {
    let params = create_with_class(document, "div", "block-params")?;

    for (index, name) in placeholders(&block.descriptor.command_template).into_iter().enumerate() {
        let row = create_with_class(document, "label", "param-row")?;

        let label = create_with_class(document, "span", "param-name")?;
        label.set_text_content(Some(name));
        row.append_child(&label)?;

        let options = (name == "options")
            .then(|| block.descriptor.available_options.as_ref())
            .flatten();
        match options {
            Some(available) => {
                let select = create_with_class(document, "select", "param-input")?;
                let blank = document.create_element("option")?;
                blank.set_attribute("value", "")?;
                blank.set_text_content(Some("(none)"));
                select.append_child(&blank)?;

                let mut keys: Vec<&String> = available.keys().collect();
                keys.sort();
                for key in keys {
                    let option = document.create_element("option")?;
                    option.set_attribute("value", key)?;
                    option.set_text_content(Some(&format!("{}: {}", key, available[key])));
                    select.append_child(&option)?;
                }

                let block_id = block.id;
                let change = Closure::wrap(Box::new(move |event: web_sys::Event| {
                    if let Some(select) = event
                        .target()
                        .and_then(|t| t.dyn_into::<HtmlSelectElement>().ok())
                    {
                        dispatch_global_message(Message::SetParameterValue {
                            block_id,
                            index,
                            value: select.value(),
                        });
                    }
                }) as Box<dyn FnMut(_)>);
                select.add_event_listener_with_callback("change", change.as_ref().unchecked_ref())?;
                change.forget();

                row.append_child(&select)?;
            }
            None => {
                let input = create_with_class(document, "input", "param-input")?;
                input.set_attribute("type", "text")?;
                input.set_attribute("placeholder", name)?;
                if let Some(value) = block.parameter_values.get(index) {
                    if !value.is_empty() {
                        input.set_attribute("value", value)?;
                    }
                }

                let block_id = block.id;
                let oninput = Closure::wrap(Box::new(move |event: web_sys::Event| {
                    if let Some(input) = event
                        .target()
                        .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                    {
                        dispatch_global_message(Message::SetParameterValue {
                            block_id,
                            index,
                            value: input.value(),
                        });
                    }
                }) as Box<dyn FnMut(_)>);
                input.add_event_listener_with_callback("input", oninput.as_ref().unchecked_ref())?;
                oninput.forget();

                row.append_child(&input)?;
            }
        }

        params.append_child(&row)?;
    }

    Ok(params)
}
