//! Domain types derived from interpreter state.

use serde::{Deserialize, Serialize};

/// The room the player currently occupies.
///
/// Derived transiently from interpreter queries; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Z-machine object number of the room.
    pub num: u16,
    /// Display name of the room.
    pub name: String,
}

/// A single object in the interpreter's world model.
///
/// All world objects together form a containment tree rooted at locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldObject {
    /// Z-machine object number.
    pub num: u16,
    /// Display name.
    pub name: String,
    /// Object number of the container, `0` if detached.
    pub parent: u16,
}

/// Per-step metadata supplied by the interpreter alongside each observation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Current game score.
    pub score: i32,
    /// Number of moves taken so far.
    pub moves: u32,
}

/// The result of feeding one command to the interpreter.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    /// Text the game printed in response to the command.
    pub observation: String,
    /// Score delta produced by this step.
    pub reward: i32,
    /// Whether the episode has terminated.
    pub done: bool,
    /// Interpreter-supplied metadata after the step.
    pub info: StepInfo,
}

/// An opaque serialized capture of the interpreter's complete internal state.
///
/// The bridge never interprets the bytes; they are produced by
/// [`Engine::get_state`](crate::engine::Engine::get_state), transported as
/// base64 text, and handed back verbatim to
/// [`Engine::set_state`](crate::engine::Engine::set_state).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot(pub Vec<u8>);

impl Snapshot {
    /// Returns the raw snapshot bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Snapshot {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}
