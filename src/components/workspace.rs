//! Workspace wiring: the connection underlay canvas and the document-level
//! drag listeners. Pointer-down lives on each block's header
//! (`block_factory`); move and up are handled here on the document so a
//! release outside the canvas still ends the drag.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlCanvasElement, MouseEvent};

use crate::messages::Message;
use crate::state::{dispatch_global_message, APP_STATE};

pub fn setup_canvas(document: &Document) -> Result<(), JsValue> {
    let container = document
        .get_element_by_id("canvas-container")
        .ok_or_else(|| JsValue::from_str("canvas container missing"))?;

    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()?;
    canvas.set_id("connection-canvas");
    container.append_child(&canvas)?;

    resize_canvas(&canvas)?;

    let context = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<web_sys::CanvasRenderingContext2d>()?;

    // initial scale for high-DPI displays; refresh_all resets it per frame
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let dpr = window.device_pixel_ratio();
    let _ = context.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
    let _ = context.scale(dpr, dpr);

    APP_STATE.with(|state| {
        let mut state = state.borrow_mut();
        state.canvas = Some(canvas.clone());
        state.context = Some(context);
    });

    setup_drag_listeners(document)?;
    setup_resize_handler(&canvas)?;

    Ok(())
}

/// Top-left of the connection canvas in viewport coordinates; the origin of
/// canvas-local block positions.
pub fn canvas_origin() -> Option<(f64, f64)> {
    let canvas = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id("connection-canvas"))?;
    let rect = canvas.get_bounding_client_rect();
    Some((rect.left(), rect.top()))
}

pub fn resize_canvas(canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;

    if let Some(container) = document.get_element_by_id("canvas-container") {
        let container_width = container.client_width();
        let container_height = container.client_height();
        let dpr = window.device_pixel_ratio();

        // bitmap size in device pixels, CSS size in layout pixels
        canvas.set_width((container_width as f64 * dpr) as u32);
        canvas.set_height((container_height as f64 * dpr) as u32);
        canvas.style().set_property("width", &format!("{}px", container_width))?;
        canvas.style().set_property("height", &format!("{}px", container_height))?;
    }

    Ok(())
}

fn setup_resize_handler(canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    let canvas_clone = canvas.clone();
    let resize_callback = Closure::wrap(Box::new(move || {
        let _ = resize_canvas(&canvas_clone);
        crate::canvas::renderer::refresh_all();
    }) as Box<dyn FnMut()>);

    web_sys::window()
        .ok_or_else(|| JsValue::from_str("no global window"))?
        .add_event_listener_with_callback("resize", resize_callback.as_ref().unchecked_ref())?;
    resize_callback.forget();

    Ok(())
}

fn setup_drag_listeners(document: &Document) -> Result<(), JsValue> {
    // Mouse move: reposition the dragged block, clamped by the model.
    let mousemove = Closure::wrap(Box::new(move |event: MouseEvent| {
        let drag = APP_STATE.with(|state| {
            let state = state.borrow();
            state
                .dragging
                .map(|id| (id, state.drag_offset_x, state.drag_offset_y))
        });
        let (block_id, offset_x, offset_y) = match drag {
            Some(drag) => drag,
            None => return,
        };
        let origin = match canvas_origin() {
            Some(origin) => origin,
            None => return,
        };

        let pointer_x = event.client_x() as f64 - origin.0;
        let pointer_y = event.client_y() as f64 - origin.1;
        dispatch_global_message(Message::UpdateBlockPosition {
            block_id,
            x: pointer_x - offset_x,
            y: pointer_y - offset_y,
        });
    }) as Box<dyn FnMut(_)>);
    document.add_event_listener_with_callback("mousemove", mousemove.as_ref().unchecked_ref())?;
    mousemove.forget();

    // Mouse up anywhere in the document ends the drag.
    let mouseup = Closure::wrap(Box::new(move |_: MouseEvent| {
        let dragging = APP_STATE.with(|state| state.borrow().dragging.is_some());
        if dragging {
            dispatch_global_message(Message::StopDragging);
        }
    }) as Box<dyn FnMut(_)>);
    document.add_event_listener_with_callback("mouseup", mouseup.as_ref().unchecked_ref())?;
    mouseup.forget();

    Ok(())
}
