use std::cell::RefCell;

use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::messages::{Command, Message};
use crate::models::{CommandDescriptor, Environment};
use crate::storage::Session;
use crate::update::update;
use crate::workflow::{BlockId, WorkflowCanvas};

// Store global application state
pub struct AppState {
    /// Pure block/connection collections and their operations.
    pub workflow: WorkflowCanvas,

    /// Command catalog as loaded from the backend ("all" search).
    pub catalog: Vec<CommandDescriptor>,
    pub environments: Vec<Environment>,

    /// Logged-in user info mirrored from localStorage. `None` only during
    /// the redirect to the login page.
    pub session: Option<Session>,

    // Canvas and rendering related
    pub canvas: Option<HtmlCanvasElement>,
    pub context: Option<CanvasRenderingContext2d>,

    // Drag state: at most one block is dragged at a time (pointer ownership
    // is exclusive); the offset is pointer-to-top-left at drag start.
    pub dragging: Option<BlockId>,
    pub drag_offset_x: f64,
    pub drag_offset_y: f64,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            workflow: WorkflowCanvas::new(),
            catalog: Vec::new(),
            environments: Vec::new(),
            session: None,
            canvas: None,
            context: None,
            dragging: None,
            drag_offset_x: 0.0,
            drag_offset_y: 0.0,
        }
    }

    /// Run the reducer for one message and hand back the queued side
    /// effects. Callers must execute them *after* releasing the state
    /// borrow; see `dispatch_global_message`.
    pub fn dispatch(&mut self, msg: Message) -> Vec<Command> {
        update(self, msg)
    }

    pub fn find_descriptor(&self, command_name: &str) -> Option<&CommandDescriptor> {
        self.catalog.iter().find(|d| d.command_name == command_name)
    }

    /// Goal text for the level stored in the session, once environments
    /// have loaded.
    pub fn current_goal(&self) -> Option<&str> {
        let level: u32 = self.session.as_ref()?.level.parse().ok()?;
        self.environments
            .iter()
            .find(|env| env.hack_environment == level)
            .and_then(|env| env.goal_description.as_deref())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

// We use thread_local because WASM runs the app on a single thread
thread_local! {
    pub static APP_STATE: RefCell<AppState> = RefCell::new(AppState::new());
}

/// Dispatch a message and execute the resulting commands once the state
/// borrow has been released. This is the only safe entry point from event
/// handlers; nesting dispatches inside a live borrow would panic the
/// RefCell.
pub fn dispatch_global_message(msg: Message) {
    let commands = APP_STATE.with(|state| {
        let mut state = state.borrow_mut();
        state.dispatch(msg)
    });
    execute_commands(commands);
}

fn execute_commands(commands: Vec<Command>) {
    for command in commands {
        match command {
            Command::SendMessage(msg) => dispatch_global_message(msg),
            Command::UpdateUI(f) => f(),
            Command::NoOp => {}
            other => crate::command_executors::execute(other),
        }
    }
}
