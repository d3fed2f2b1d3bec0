//! Connection rendering. Block visuals are plain DOM nodes; only the curves
//! between them are drawn here, on the underlay canvas. Redraws triggered by
//! dragging are rate-limited through `RedrawThrottle`; `flush_redraw` is the
//! drag-end path that always lands the final geometry.

use std::cell::RefCell;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Document;

use super::shapes;
use crate::components::block_factory::block_dom_id;
use crate::constants::{BLOCK_HEADER_HEIGHT, BLOCK_WIDTH, DRAG_REDRAW_INTERVAL_MS};
use crate::models::Position;
use crate::scheduling::{RedrawThrottle, ThrottleAction};
use crate::state::{AppState, APP_STATE};
use crate::utils::now_ms;
use crate::workflow::Connection;

thread_local! {
    static THROTTLE: RefCell<RedrawThrottle> =
        RefCell::new(RedrawThrottle::new(DRAG_REDRAW_INTERVAL_MS));
}

/// Throttled redraw request for pointer-move floods.
pub fn request_redraw() {
    let action = THROTTLE.with(|t| t.borrow_mut().request(now_ms()));
    match action {
        ThrottleAction::FireNow => refresh_all(),
        ThrottleAction::Schedule { delay_ms, epoch } => schedule_trailing_redraw(delay_ms, epoch),
        ThrottleAction::AlreadyScheduled => {}
    }
}

/// Immediate redraw that also cancels any pending trailing redraw. Called
/// on drag end so the final block position is always reflected.
pub fn flush_redraw() {
    THROTTLE.with(|t| t.borrow_mut().flush(now_ms()));
    refresh_all();
}

fn schedule_trailing_redraw(delay_ms: u64, epoch: u32) {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return,
    };
    let cb = Closure::once_into_js(move || {
        let fire = THROTTLE.with(|t| t.borrow_mut().timer_fired(now_ms(), epoch));
        if fire {
            refresh_all();
        }
    });
    let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        cb.as_ref().unchecked_ref(),
        delay_ms as i32,
    );
}

/// Re-derive every connection path from the live DOM. Connections whose
/// endpoint block no longer exists are dropped instead of redrawn.
pub fn refresh_all() {
    APP_STATE.with(|state| {
        let mut state = state.borrow_mut();
        refresh_all_with(&mut state);
    });
}

pub fn refresh_all_with(state: &mut AppState) {
    let stale = state.workflow.prune_stale_connections();
    if !stale.is_empty() {
        web_sys::console::log_1(
            &format!("dropped {} stale connection(s)", stale.len()).into(),
        );
    }

    let (canvas, context) = match (&state.canvas, &state.context) {
        (Some(canvas), Some(context)) => (canvas, context),
        _ => return,
    };
    let window = match web_sys::window() {
        Some(w) => w,
        None => return,
    };
    let document = match window.document() {
        Some(d) => d,
        None => return,
    };
    let dpr = window.device_pixel_ratio();

    context.save();
    // clear in device pixels, then draw in CSS pixels
    let _ = context.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
    context.clear_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
    let _ = context.scale(dpr, dpr);

    let canvas_rect = canvas.get_bounding_client_rect();
    for connection in state.workflow.connections() {
        let (from, to) = anchor_points(&document, (canvas_rect.left(), canvas_rect.top()), connection, state);
        let path = shapes::connection_path(from, to);
        shapes::draw_connection(context, &path);
    }

    context.restore();
}

/// Source right-anchor and target left-anchor in canvas-local coordinates.
/// Prefers the live element rects; falls back to the model position when an
/// element has not been mounted yet.
fn anchor_points(
    document: &Document,
    canvas_origin: (f64, f64),
    connection: &Connection,
    state: &AppState,
) -> (Position, Position) {
    let from = element_anchor(document, canvas_origin, connection.from, true)
        .or_else(|| model_anchor(state, connection.from, true))
        .unwrap_or(Position::new(0.0, 0.0));
    let to = element_anchor(document, canvas_origin, connection.to, false)
        .or_else(|| model_anchor(state, connection.to, false))
        .unwrap_or(Position::new(0.0, 0.0));
    (from, to)
}

fn element_anchor(
    document: &Document,
    canvas_origin: (f64, f64),
    block_id: u64,
    right_edge: bool,
) -> Option<Position> {
    let element = document.get_element_by_id(&block_dom_id(block_id))?;
    let rect = element.get_bounding_client_rect();
    let x = if right_edge { rect.right() } else { rect.left() };
    Some(Position::new(
        x - canvas_origin.0,
        rect.top() + rect.height() / 2.0 - canvas_origin.1,
    ))
}

fn model_anchor(state: &AppState, block_id: u64, right_edge: bool) -> Option<Position> {
    let block = state.workflow.get(block_id)?;
    let x = if right_edge { block.position.x + BLOCK_WIDTH } else { block.position.x };
    Some(Position::new(x, block.position.y + BLOCK_HEADER_HEIGHT))
}
