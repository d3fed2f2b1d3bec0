//! Browser-runner test for the drag message sequence a user produces when
//! repositioning a block: mousedown on the header, a mousemove flood, and
//! a document-level mouseup.

use wasm_bindgen_test::*;

use crate::messages::Message;
use crate::models::CommandDescriptor;
use crate::state::AppState;
use crate::update::update;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn drag_ends_with_the_final_pointer_position() {
    let mut state = AppState::new();
    update(
        &mut state,
        Message::PlaceBlock {
            descriptor: CommandDescriptor {
                command_name: "nmap".to_string(),
                description: String::new(),
                command_template: "nmap {target}".to_string(),
                available_options: None,
            },
            x: 120.0,
            y: 80.0,
        },
    );
    let id = state.workflow.ordered_ids()[0];

    update(&mut state, Message::StartDragging { block_id: id, offset_x: 10.0, offset_y: 10.0 });
    for step in 0..20 {
        let x = 120.0 + step as f64 * 7.0;
        update(&mut state, Message::UpdateBlockPosition { block_id: id, x, y: 80.0 });
    }
    update(&mut state, Message::StopDragging);

    let position = state.workflow.get(id).unwrap().position;
    assert_eq!(position.x, 120.0 + 19.0 * 7.0);
    assert_eq!(state.dragging, None);
}
