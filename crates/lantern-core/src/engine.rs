//! Interpreter capability interface.
//!
//! The bridge owns none of the interpreter's behavior: everything below is a
//! narrow seam over an external Z-machine implementation. Backends that only
//! expose a dumb-terminal interface answer the world-model getters with
//! [`EngineError::Unsupported`]; richer bindings answer them from the live
//! object table.

use std::path::Path;

use crate::error::EngineError;
use crate::types::{Location, Snapshot, StepInfo, StepOutcome, WorldObject};

/// One running, resumable game.
///
/// An engine is constructed by an [`EngineProvider`] from a story file, reset
/// once, and then mutated exclusively through [`step`](Engine::step) and
/// [`set_state`](Engine::set_state). Engines are not safe for concurrent
/// mutation; callers serialize access.
pub trait Engine: Send {
    /// Restarts the game from the beginning of the story file.
    ///
    /// Returns the opening observation and initial metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the interpreter fails to produce its opening text.
    fn reset(&mut self) -> Result<(String, StepInfo), EngineError>;

    /// Feeds one text command to the interpreter.
    ///
    /// # Errors
    ///
    /// Returns an error if the interpreter fails while executing the command.
    fn step(&mut self, command: &str) -> Result<StepOutcome, EngineError>;

    /// Captures the interpreter's complete internal state.
    ///
    /// # Errors
    ///
    /// Returns an error if the interpreter cannot produce a snapshot.
    fn get_state(&mut self) -> Result<Snapshot, EngineError>;

    /// Replaces the interpreter's internal state with a prior snapshot.
    ///
    /// Installing a snapshot taken from a different story file is undefined
    /// behavior at the game level and is not guarded against here.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob cannot be installed.
    fn set_state(&mut self, snapshot: &Snapshot) -> Result<(), EngineError>;

    /// The maximum achievable score for the loaded story.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot answer the query.
    fn max_score(&mut self) -> Result<i32, EngineError>;

    /// The room the player currently occupies, if the query succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot answer the query.
    fn player_location(&mut self) -> Result<Option<Location>, EngineError>;

    /// Objects currently carried by the player.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot answer the query.
    fn inventory(&mut self) -> Result<Vec<WorldObject>, EngineError>;

    /// The full world-object set, containment included.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot answer the query.
    fn world_objects(&mut self) -> Result<Vec<WorldObject>, EngineError>;

    /// The object representing the player themselves.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot answer the query.
    fn player_object(&mut self) -> Result<WorldObject, EngineError>;

    /// Actions the parser would currently accept.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot answer the query.
    fn valid_actions(&mut self) -> Result<Vec<String>, EngineError>;
}

/// Constructs engines from story files.
pub trait EngineProvider: Send + Sync {
    /// Opens a story file and returns a fresh, un-reset engine for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the interpreter cannot be started on the file.
    fn open(&self, story_path: &Path) -> Result<Box<dyn Engine>, EngineError>;

    /// Directory of story files bundled with this provider, if it has one.
    ///
    /// Used by the asset installer to locate ROMs to copy into the local
    /// games directory.
    fn bundled_rom_dir(&self) -> Option<std::path::PathBuf> {
        None
    }
}
