// src/update.rs
//
// The reducer: applies one message to the state and queues side-effect
// commands. DOM work is confined to `Command::UpdateUI` closures so the
// state transitions themselves stay testable without a browser.

use crate::components::{block_factory, palette, terminal};
use crate::constants::{
    BLOCK_GAP_X, BLOCK_WIDTH, BLOCK_Z_INDEX, DEFAULT_BLOCK_X, DEFAULT_BLOCK_Y, DRAG_Z_INDEX,
    PLACE_CASCADE_STEP,
};
use crate::messages::{Command, Message};
use crate::state::AppState;

pub fn update(state: &mut AppState, msg: Message) -> Vec<Command> {
    let mut commands = Vec::new();

    match msg {
        Message::Bootstrap => {
            commands.push(Command::update_ui(|| palette::render_loading()));
            commands.push(Command::FetchCatalog);
            commands.push(Command::FetchEnvironments);
            if let Some(session) = &state.session {
                commands.push(Command::OpenSshSession { level: session.level.clone() });
            }
        }

        // -------------------------------------------------------------------
        // Catalog / environments
        // -------------------------------------------------------------------
        Message::ReloadCatalog => {
            commands.push(Command::update_ui(|| palette::render_loading()));
            commands.push(Command::FetchCatalog);
        }
        Message::CatalogLoaded(catalog) => {
            state.catalog = catalog.clone();
            commands.push(Command::update_ui(move || palette::render(&catalog)));
        }
        Message::CatalogLoadFailed(error) => {
            commands.push(Command::update_ui(move || palette::render_error(&error)));
        }
        Message::ReloadEnvironments => {
            commands.push(Command::FetchEnvironments);
        }
        Message::EnvironmentsLoaded(environments) => {
            state.environments = environments;
            let goal = state.current_goal().map(str::to_string);
            commands.push(Command::update_ui(move || {
                crate::ui::setup::render_goal(goal.as_deref());
            }));
        }
        Message::EnvironmentsLoadFailed(error) => {
            commands.push(Command::update_ui(move || {
                crate::ui::setup::render_goal_error(&error);
            }));
        }
        Message::SshSessionOpened { level, ok } => {
            commands.push(Command::update_ui(move || {
                if ok {
                    terminal::append_info(&format!("ssh session opened for level {}", level));
                } else {
                    terminal::append_error(&format!("ssh login failed for level {}", level));
                }
            }));
        }

        // -------------------------------------------------------------------
        // Block lifecycle
        // -------------------------------------------------------------------
        Message::PlaceFromPalette { command_name } => {
            if let Some(descriptor) = state.find_descriptor(&command_name).cloned() {
                let cascade = (state.workflow.len() % 8) as f64 * PLACE_CASCADE_STEP;
                commands.push(Command::send(Message::PlaceBlock {
                    descriptor,
                    x: DEFAULT_BLOCK_X + cascade,
                    y: DEFAULT_BLOCK_Y + cascade,
                }));
            }
        }
        Message::PlaceBlock { descriptor, x, y } => {
            let id = state.workflow.place(descriptor, x, y);
            if let Some(block) = state.workflow.get(id).cloned() {
                commands.push(Command::update_ui(move || {
                    block_factory::mount_block(&block);
                }));
            }
        }
        Message::RemoveBlock { block_id } => {
            if state.workflow.remove(block_id) {
                commands.push(Command::update_ui(move || {
                    block_factory::unmount_block(block_id);
                    crate::canvas::renderer::refresh_all();
                }));
                commands.push(Command::ScheduleRechain);
            }
        }
        Message::AutoChain => {
            state.workflow.auto_chain();
            commands.push(Command::update_ui(|| crate::canvas::renderer::refresh_all()));
        }
        Message::ClearCanvas => {
            state.workflow.clear();
            commands.push(Command::update_ui(|| {
                block_factory::unmount_all();
                crate::canvas::renderer::refresh_all();
            }));
            commands.push(Command::DeleteUserState);
        }
        Message::SetParameterValue { block_id, index, value } => {
            state.workflow.set_parameter(block_id, index, value);
        }

        // -------------------------------------------------------------------
        // Dragging
        // -------------------------------------------------------------------
        Message::StartDragging { block_id, offset_x, offset_y } => {
            // pointer ownership is exclusive; a second pointer-down while a
            // drag is live simply re-targets it
            state.dragging = Some(block_id);
            state.drag_offset_x = offset_x;
            state.drag_offset_y = offset_y;
            commands.push(Command::update_ui(move || {
                block_factory::set_block_z_index(block_id, DRAG_Z_INDEX);
            }));
        }
        Message::UpdateBlockPosition { block_id, x, y } => {
            if let Some(position) = state.workflow.update_position(block_id, x, y) {
                commands.push(Command::update_ui(move || {
                    block_factory::set_block_position(block_id, position);
                    crate::canvas::renderer::request_redraw();
                }));
            }
        }
        Message::StopDragging => {
            if let Some(block_id) = state.dragging.take() {
                commands.push(Command::update_ui(move || {
                    block_factory::set_block_z_index(block_id, BLOCK_Z_INDEX);
                    crate::canvas::renderer::flush_redraw();
                }));
            }
        }

        // -------------------------------------------------------------------
        // Execution
        // -------------------------------------------------------------------
        Message::RunBlock { block_id } => match state.workflow.snapshot(block_id) {
            Some(Ok(snapshot)) => commands.push(Command::ExecuteBlock(snapshot)),
            Some(Err(error)) => {
                commands.push(Command::update_ui(move || {
                    web_sys::console::error_1(
                        &format!("cannot materialize block {}: {}", block_id, error).into(),
                    );
                }));
            }
            None => {}
        },
        Message::RunAll => {
            let snapshots = state.workflow.collect_all();
            if snapshots.is_empty() {
                commands.push(Command::update_ui(|| {
                    terminal::append_info("nothing to run: the canvas is empty");
                }));
            } else {
                let count = snapshots.len();
                commands.push(Command::update_ui(move || {
                    terminal::append_info(&format!("executing {} block(s) in chain order", count));
                }));
                commands.push(Command::ExecuteChain(snapshots));
            }
        }
        Message::ExecutionFinished { command_name, command, outcome } => {
            commands.push(Command::update_ui(move || {
                terminal::append_command(&command);
                match outcome {
                    Ok(output) => terminal::append_output(&output),
                    Err(error) => {
                        terminal::append_error(&error);
                        crate::dom_utils::alert(&format!(
                            "Command '{}' failed: {}",
                            command_name, error
                        ));
                    }
                }
            }));
        }

        // -------------------------------------------------------------------
        // Pattern import
        // -------------------------------------------------------------------
        Message::ImportPattern => {
            commands.push(Command::FetchPattern);
        }
        Message::PatternResolved(descriptors) => {
            if descriptors.is_empty() {
                commands.push(Command::update_ui(|| {
                    terminal::append_info("pattern import returned no commands");
                }));
            } else {
                let anchor = state.workflow.rightmost_anchor();
                let start_x = if state.workflow.is_empty() {
                    DEFAULT_BLOCK_X
                } else {
                    anchor.x + BLOCK_GAP_X
                };
                let mut mounted = Vec::with_capacity(descriptors.len());
                for (i, descriptor) in descriptors.into_iter().enumerate() {
                    let x = start_x + i as f64 * (BLOCK_WIDTH + BLOCK_GAP_X);
                    let id = state.workflow.place(descriptor, x, anchor.y);
                    if let Some(block) = state.workflow.get(id).cloned() {
                        mounted.push(block);
                    }
                }
                state.workflow.auto_chain();
                commands.push(Command::update_ui(move || {
                    for block in &mounted {
                        block_factory::mount_block(block);
                    }
                    crate::canvas::renderer::refresh_all();
                }));
            }
        }
        Message::PatternFetchFailed(error) => {
            commands.push(Command::update_ui(move || {
                crate::dom_utils::alert(&format!("Pattern recommendation failed: {}", error));
            }));
        }

        // -------------------------------------------------------------------
        // Answer submission / session
        // -------------------------------------------------------------------
        Message::SubmitAnswer(answer) => {
            let answer = answer.trim().to_string();
            if answer.is_empty() {
                commands.push(Command::update_ui(|| {
                    crate::dom_utils::alert("Please enter an answer first.");
                }));
            } else {
                commands.push(Command::SubmitAnswer(answer));
            }
        }
        Message::AnswerChecked { correct } => {
            commands.push(Command::update_ui(move || {
                if correct {
                    crate::dom_utils::alert("Correct! The level is solved.");
                } else {
                    crate::dom_utils::alert("That answer is not correct.");
                }
            }));
        }
        Message::Logout => {
            commands.push(Command::update_ui(|| {
                if let Err(e) = crate::storage::logout() {
                    web_sys::console::error_1(&format!("logout failed: {:?}", e).into());
                }
            }));
        }
    }

    commands
}
