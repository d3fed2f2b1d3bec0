// src/messages.rs
//
// The events that can occur in the UI, plus the side-effect commands the
// reducer may queue in response.

use crate::models::{BlockSnapshot, CommandDescriptor, Environment};
use crate::workflow::BlockId;

#[derive(Debug, Clone)]
pub enum Message {
    /// Kick off the initial loads (catalog, environments, SSH session).
    Bootstrap,

    // Catalog / environment loading
    ReloadCatalog,
    CatalogLoaded(Vec<CommandDescriptor>),
    CatalogLoadFailed(String),
    ReloadEnvironments,
    EnvironmentsLoaded(Vec<Environment>),
    EnvironmentsLoadFailed(String),
    SshSessionOpened { level: String, ok: bool },

    // Block lifecycle
    PlaceBlock {
        descriptor: CommandDescriptor,
        x: f64,
        y: f64,
    },
    /// Palette click: place at the default spawn position (with cascade).
    PlaceFromPalette { command_name: String },
    RemoveBlock { block_id: BlockId },
    AutoChain,
    ClearCanvas,
    SetParameterValue {
        block_id: BlockId,
        index: usize,
        value: String,
    },

    // Dragging state
    StartDragging {
        block_id: BlockId,
        offset_x: f64,
        offset_y: f64,
    },
    UpdateBlockPosition {
        block_id: BlockId,
        x: f64,
        y: f64,
    },
    StopDragging,

    // Execution
    RunBlock { block_id: BlockId },
    RunAll,
    ExecutionFinished {
        command_name: String,
        command: String,
        outcome: Result<String, String>,
    },

    // Pattern import
    ImportPattern,
    PatternResolved(Vec<CommandDescriptor>),
    PatternFetchFailed(String),

    // Answer submission
    SubmitAnswer(String),
    AnswerChecked { correct: bool },

    // Session
    Logout,
}

/// Commands represent side effects to run after the state update: network
/// calls, timers and DOM mutations. Keeping them out of `update` keeps the
/// reducer pure enough to test without a browser.
pub enum Command {
    /// Chain another message through the dispatcher.
    SendMessage(Message),

    /// Execute a UI update closure after the state borrow is released.
    UpdateUI(Box<dyn FnOnce() + 'static>),

    FetchCatalog,
    FetchEnvironments,
    OpenSshSession { level: String },

    /// Execute one materialized block.
    ExecuteBlock(BlockSnapshot),
    /// Execute a whole chain in order, one command at a time.
    ExecuteChain(Vec<BlockSnapshot>),

    FetchPattern,
    SubmitAnswer(String),

    /// Best-effort server-side state reset; failures are swallowed.
    DeleteUserState,

    /// Re-run auto-chain after the post-removal settle delay.
    ScheduleRechain,

    NoOp,
}

impl Command {
    pub fn send(msg: Message) -> Self {
        Command::SendMessage(msg)
    }

    pub fn update_ui<F>(f: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Command::UpdateUI(Box::new(f))
    }
}
