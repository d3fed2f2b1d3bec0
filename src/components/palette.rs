//! Command palette: the catalog listing on the left side of the workspace.
//! Clicking an entry places a block for that command on the canvas.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, MouseEvent};

use crate::dom_utils::create_with_class;
use crate::messages::Message;
use crate::models::CommandDescriptor;
use crate::state::dispatch_global_message;

fn palette_container(document: &Document) -> Option<Element> {
    document.get_element_by_id("command-palette")
}

pub fn render_loading() {
    with_container(|document, container| {
        container.set_inner_html("");
        let loading = create_with_class(document, "div", "palette-loading")?;
        loading.set_text_content(Some("Loading commands..."));
        container.append_child(&loading)?;
        Ok(())
    });
}

pub fn render(catalog: &[CommandDescriptor]) {
    with_container(|document, container| {
        container.set_inner_html("");

        if catalog.is_empty() {
            let empty = create_with_class(document, "div", "palette-empty")?;
            empty.set_text_content(Some("No commands available."));
            container.append_child(&empty)?;
            return Ok(());
        }

        for descriptor in catalog {
            let item = create_with_class(document, "div", "palette-item")?;

            let name = create_with_class(document, "div", "palette-item-name")?;
            name.set_text_content(Some(&descriptor.command_name));
            item.append_child(&name)?;

            let description = create_with_class(document, "div", "palette-item-description")?;
            description.set_text_content(Some(&descriptor.description));
            item.append_child(&description)?;

            let command_name = descriptor.command_name.clone();
            let click = Closure::wrap(Box::new(move |_: MouseEvent| {
                dispatch_global_message(Message::PlaceFromPalette {
                    command_name: command_name.clone(),
                });
            }) as Box<dyn FnMut(_)>);
            item.add_event_listener_with_callback("click", click.as_ref().unchecked_ref())?;
            click.forget();

            container.append_child(&item)?;
        }
        Ok(())
    });
}

/// Inline error block with a manual retry control; there is no automatic
/// retry anywhere.
pub fn render_error(message: &str) {
    let message = message.to_string();
    with_container(move |document, container| {
        container.set_inner_html("");

        let error = create_with_class(document, "div", "palette-error")?;
        let text = create_with_class(document, "p", "palette-error-text")?;
        text.set_text_content(Some(&format!("Could not load commands: {}", message)));
        error.append_child(&text)?;

        let retry = create_with_class(document, "button", "palette-retry")?;
        retry.set_text_content(Some("Retry"));
        let click = Closure::wrap(Box::new(move |_: MouseEvent| {
            dispatch_global_message(Message::ReloadCatalog);
        }) as Box<dyn FnMut(_)>);
        retry.add_event_listener_with_callback("click", click.as_ref().unchecked_ref())?;
        click.forget();
        error.append_child(&retry)?;

        container.append_child(&error)?;
        Ok(())
    });
}

fn with_container<F>(render: F)
where
    F: FnOnce(&Document, &Element) -> Result<(), JsValue>,
{
    let document = match web_sys::window().and_then(|w| w.document()) {
        Some(d) => d,
        None => return,
    };
    let container = match palette_container(&document) {
        Some(c) => c,
        None => return,
    };
    if let Err(e) = render(&document, &container) {
        web_sys::console::error_1(&format!("palette render failed: {:?}", e).into());
    }
}
