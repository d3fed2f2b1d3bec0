//! Pure workflow state: blocks, connections and the operations the canvas
//! exposes on them. Nothing in this module touches the DOM, so all state
//! transitions are unit-testable natively; rendering side effects live in
//! `canvas::renderer` and `components::*`.

use std::collections::HashMap;

use crate::command_builder::{materialize, MaterializeError};
use crate::constants::{BLOCK_WIDTH, DEFAULT_BLOCK_Y};
use crate::models::{BlockSnapshot, CommandDescriptor, Position};

pub type BlockId = u64;

/// One segment of a command template: literal text or a `{name}` placeholder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

/// Split a template into literal and placeholder segments, left to right.
///
/// A placeholder is a non-empty brace pair without nested braces; anything
/// else (including `{}`) is kept as literal text. Duplicate names are *not*
/// collapsed - each occurrence is its own slot.
pub fn template_segments(template: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let (head, tail) = rest.split_at(open);
        if !head.is_empty() {
            segments.push(Segment::Literal(head));
        }

        // tail starts at '{'; look for the matching '}' before any other '{'
        let body = &tail[1..];
        match body.find(&['{', '}'][..]) {
            Some(end) if body.as_bytes()[end] == b'}' && end > 0 => {
                segments.push(Segment::Placeholder(&body[..end]));
                rest = &body[end + 1..];
            }
            Some(end) if body.as_bytes()[end] == b'}' => {
                // empty "{}" - literal
                segments.push(Segment::Literal(&tail[..2]));
                rest = &body[1..];
            }
            Some(end) => {
                // stray '{' before a close; emit it as literal and rescan
                segments.push(Segment::Literal(&tail[..end + 1]));
                rest = &body[end..];
            }
            None => {
                segments.push(Segment::Literal(tail));
                rest = "";
            }
        }
    }

    if !rest.is_empty() {
        segments.push(Segment::Literal(rest));
    }
    segments
}

/// Placeholder names in occurrence order (duplicates preserved).
pub fn placeholders(template: &str) -> Vec<&str> {
    template_segments(template)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Placeholder(name) => Some(name),
            Segment::Literal(_) => None,
        })
        .collect()
}

/// A placed command block: a descriptor instance with its own position and
/// parameter values. `parameter_values` is index-aligned with the template's
/// placeholder occurrences and always has exactly that length; the empty
/// string is a valid "no value" marker.
#[derive(Clone, Debug)]
pub struct Block {
    pub id: BlockId,
    pub descriptor: CommandDescriptor,
    pub position: Position,
    pub parameter_values: Vec<String>,
}

impl Block {
    pub fn new(id: BlockId, descriptor: CommandDescriptor, x: f64, y: f64) -> Self {
        let slots = placeholders(&descriptor.command_template).len();
        Self {
            id,
            descriptor,
            position: Position::new(x, y),
            parameter_values: vec![String::new(); slots],
        }
    }
}

/// A directed visual link between two blocks. Endpoints are ids, never block
/// references, so a deleted block can simply leave stale entries behind for
/// the renderer to garbage-collect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Connection {
    pub from: BlockId,
    pub to: BlockId,
}

/// Owns the block and connection collections and every canvas-level state
/// transition. Block ids come from a monotonic sequence counter assigned at
/// creation time; that order is also the auto-chain order.
#[derive(Debug, Default)]
pub struct WorkflowCanvas {
    blocks: HashMap<BlockId, Block>,
    connections: Vec<Connection>,
    next_id: BlockId,
}

impl WorkflowCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a block for `descriptor` at `(x, y)` and return its id.
    pub fn place(&mut self, descriptor: CommandDescriptor, x: f64, y: f64) -> BlockId {
        self.next_id += 1;
        let id = self.next_id;
        self.blocks.insert(id, Block::new(id, descriptor, x, y));
        id
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(&id)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn contains_connection(&self, from: BlockId, to: BlockId) -> bool {
        self.connections.iter().any(|c| c.from == from && c.to == to)
    }

    /// Block ids in creation order (ascending id).
    pub fn ordered_ids(&self) -> Vec<BlockId> {
        let mut ids: Vec<BlockId> = self.blocks.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Register a connection from `from` to `to`. At most one connection
    /// exists per ordered pair; both endpoints must be live blocks. Returns
    /// whether a connection was added.
    pub fn connect(&mut self, from: BlockId, to: BlockId) -> bool {
        if !self.blocks.contains_key(&from) || !self.blocks.contains_key(&to) {
            return false;
        }
        if self.contains_connection(from, to) {
            return false;
        }
        self.connections.push(Connection { from, to });
        true
    }

    /// Connect every adjacent pair in creation order that is not already
    /// connected. Safe to call repeatedly; returns how many connections were
    /// actually added.
    pub fn auto_chain(&mut self) -> usize {
        let ids = self.ordered_ids();
        let mut added = 0;
        for pair in ids.windows(2) {
            if self.connect(pair[0], pair[1]) {
                added += 1;
            }
        }
        added
    }

    /// Delete a block and every connection referencing it. Callers re-run
    /// `auto_chain` after a short settle delay to close the gap.
    pub fn remove(&mut self, id: BlockId) -> bool {
        if self.blocks.remove(&id).is_none() {
            return false;
        }
        self.connections.retain(|c| c.from != id && c.to != id);
        true
    }

    /// Drop connections whose endpoints no longer exist and return them so
    /// the renderer can skip redrawing.
    pub fn prune_stale_connections(&mut self) -> Vec<Connection> {
        let mut stale = Vec::new();
        let blocks = &self.blocks;
        self.connections.retain(|c| {
            let live = blocks.contains_key(&c.from) && blocks.contains_key(&c.to);
            if !live {
                stale.push(*c);
            }
            live
        });
        stale
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
        self.connections.clear();
    }

    /// Overwrite one parameter slot. Returns false when the block or slot
    /// does not exist.
    pub fn set_parameter(&mut self, id: BlockId, index: usize, value: String) -> bool {
        match self.blocks.get_mut(&id) {
            Some(block) if index < block.parameter_values.len() => {
                block.parameter_values[index] = value;
                true
            }
            _ => false,
        }
    }

    /// Move a block, clamping both coordinates to non-negative canvas-local
    /// space. Returns the clamped position actually stored.
    pub fn update_position(&mut self, id: BlockId, x: f64, y: f64) -> Option<Position> {
        let block = self.blocks.get_mut(&id)?;
        block.position = Position::new(x.max(0.0), y.max(0.0));
        Some(block.position)
    }

    /// Snapshot a single block, materializing its command.
    pub fn snapshot(&self, id: BlockId) -> Option<Result<BlockSnapshot, MaterializeError>> {
        let block = self.blocks.get(&id)?;
        Some(materialize(block).map(|command| BlockSnapshot {
            id: block.id,
            name: block.descriptor.command_name.clone(),
            template: block.descriptor.command_template.clone(),
            parameter_values: block.parameter_values.clone(),
            command,
            position: block.position,
        }))
    }

    /// Snapshot every block in creation order. A block whose materialization
    /// fails is skipped; the failure only affects that block.
    pub fn collect_all(&self) -> Vec<BlockSnapshot> {
        self.ordered_ids()
            .into_iter()
            .filter_map(|id| self.snapshot(id)?.ok())
            .collect()
    }

    /// Right edge of the rightmost block (by `x + BLOCK_WIDTH`), used to
    /// place a horizontal run of imported blocks without overlap. Empty
    /// canvas answers `(0, DEFAULT_BLOCK_Y)`.
    pub fn rightmost_anchor(&self) -> Position {
        self.blocks
            .values()
            .max_by(|a, b| {
                (a.position.x + BLOCK_WIDTH)
                    .partial_cmp(&(b.position.x + BLOCK_WIDTH))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|block| Position::new(block.position.x + BLOCK_WIDTH, block.position.y))
            .unwrap_or(Position::new(0.0, DEFAULT_BLOCK_Y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(name: &str, template: &str) -> CommandDescriptor {
        CommandDescriptor {
            command_name: name.to_string(),
            description: String::new(),
            command_template: template.to_string(),
            available_options: None,
        }
    }

    #[test]
    fn placeholders_preserve_order_and_duplicates() {
        assert_eq!(placeholders("scan {target} {options}"), vec!["target", "options"]);
        assert_eq!(placeholders("cp {file} {file}"), vec!["file", "file"]);
        assert_eq!(placeholders("pwd"), Vec::<&str>::new());
    }

    #[test]
    fn empty_and_stray_braces_are_literals() {
        assert_eq!(placeholders("echo {}"), Vec::<&str>::new());
        assert_eq!(placeholders("echo {a{b}"), vec!["b"]);
        assert_eq!(placeholders("echo {oops"), Vec::<&str>::new());
    }

    #[test]
    fn placed_block_has_one_value_per_placeholder_occurrence() {
        let mut canvas = WorkflowCanvas::new();
        let id = canvas.place(descriptor("cp", "cp {file} {file}"), 0.0, 0.0);
        let block = canvas.get(id).unwrap();
        assert_eq!(block.parameter_values, vec!["", ""]);
    }

    #[test]
    fn auto_chain_is_idempotent() {
        let mut canvas = WorkflowCanvas::new();
        let a = canvas.place(descriptor("a", "a"), 0.0, 0.0);
        let b = canvas.place(descriptor("b", "b"), 0.0, 0.0);
        let c = canvas.place(descriptor("c", "c"), 0.0, 0.0);

        assert_eq!(canvas.auto_chain(), 2);
        assert_eq!(canvas.auto_chain(), 0);
        assert_eq!(canvas.connections().len(), 2);
        assert!(canvas.contains_connection(a, b));
        assert!(canvas.contains_connection(b, c));
    }

    #[test]
    fn connect_rejects_duplicates_and_dead_endpoints() {
        let mut canvas = WorkflowCanvas::new();
        let a = canvas.place(descriptor("a", "a"), 0.0, 0.0);
        let b = canvas.place(descriptor("b", "b"), 0.0, 0.0);

        assert!(canvas.connect(a, b));
        assert!(!canvas.connect(a, b));
        assert!(!canvas.connect(a, 999));
        assert_eq!(canvas.connections().len(), 1);
    }

    #[test]
    fn remove_drops_block_and_its_connections() {
        let mut canvas = WorkflowCanvas::new();
        let a = canvas.place(descriptor("a", "a"), 0.0, 0.0);
        let b = canvas.place(descriptor("b", "b"), 0.0, 0.0);
        let c = canvas.place(descriptor("c", "c"), 0.0, 0.0);
        canvas.auto_chain();

        assert!(canvas.remove(b));
        assert!(canvas.connections().iter().all(|conn| conn.from != b && conn.to != b));
        assert!(canvas.collect_all().iter().all(|snap| snap.id != b));

        // the re-chain pass closes the gap without resurrecting b
        canvas.auto_chain();
        assert!(canvas.contains_connection(a, c));
        assert_eq!(canvas.connections().len(), 1);
    }

    #[test]
    fn rightmost_anchor_tracks_block_width() {
        let mut canvas = WorkflowCanvas::new();
        assert_eq!(canvas.rightmost_anchor(), Position::new(0.0, DEFAULT_BLOCK_Y));

        canvas.place(descriptor("a", "a"), 50.0, 70.0);
        assert_eq!(canvas.rightmost_anchor(), Position::new(300.0, 70.0));

        canvas.place(descriptor("b", "b"), 10.0, 200.0);
        // still the block at x=50, its right edge is further out
        assert_eq!(canvas.rightmost_anchor(), Position::new(300.0, 70.0));
    }

    #[test]
    fn update_position_clamps_to_non_negative() {
        let mut canvas = WorkflowCanvas::new();
        let id = canvas.place(descriptor("a", "a"), 10.0, 10.0);
        let pos = canvas.update_position(id, -40.0, 25.0).unwrap();
        assert_eq!(pos, Position::new(0.0, 25.0));
        assert_eq!(canvas.get(id).unwrap().position, pos);
    }

    #[test]
    fn clear_removes_everything() {
        let mut canvas = WorkflowCanvas::new();
        canvas.place(descriptor("a", "a"), 0.0, 0.0);
        canvas.place(descriptor("b", "b"), 0.0, 0.0);
        canvas.auto_chain();

        canvas.clear();
        assert!(canvas.is_empty());
        assert!(canvas.connections().is_empty());
        assert!(canvas.collect_all().is_empty());
    }

    #[test]
    fn prune_drops_connections_with_dead_endpoints() {
        let mut canvas = WorkflowCanvas::new();
        let a = canvas.place(descriptor("a", "a"), 0.0, 0.0);
        let b = canvas.place(descriptor("b", "b"), 0.0, 0.0);
        canvas.auto_chain();

        // simulate a stale entry surviving a removal
        canvas.blocks.remove(&b);
        let stale = canvas.prune_stale_connections();
        assert_eq!(stale, vec![Connection { from: a, to: b }]);
        assert!(canvas.connections().is_empty());
    }

    #[test]
    fn ids_are_strictly_increasing() {
        let mut canvas = WorkflowCanvas::new();
        let a = canvas.place(descriptor("a", "a"), 0.0, 0.0);
        let b = canvas.place(descriptor("b", "b"), 0.0, 0.0);
        canvas.remove(a);
        let c = canvas.place(descriptor("c", "c"), 0.0, 0.0);
        assert!(a < b && b < c);
    }
}
