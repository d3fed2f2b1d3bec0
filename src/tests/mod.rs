mod reducer_flow;

#[cfg(target_arch = "wasm32")]
mod drag_reducer;
