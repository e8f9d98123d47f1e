//! A tiny deterministic world standing in for a real interpreter backend.
//!
//! `ScriptedEngine` implements the full `Engine` capability surface over a
//! fixed two-room world, so unit and integration tests can exercise the
//! session façade without a Z-machine binary. Room names embed the story
//! stem so tests can tell two scripted games apart.

use std::path::Path;

use serde::{Deserialize, Serialize};

use lantern_core::engine::{Engine, EngineProvider};
use lantern_core::error::EngineError;
use lantern_core::types::{Location, Snapshot, StepInfo, StepOutcome, WorldObject};

/// Object number of the player.
pub const PLAYER_NUM: u16 = 4;
/// Object number of the starting room.
pub const ROOM_FIELD_NUM: u16 = 180;
/// Object number of the second room.
pub const ROOM_PORCH_NUM: u16 = 181;
/// Object number of the mailbox in the starting room.
pub const MAILBOX_NUM: u16 = 160;
/// Object number of the leaflet, initially inside the mailbox.
pub const LEAFLET_NUM: u16 = 161;

/// Mutable world state captured by snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorldState {
    score: i32,
    moves: u32,
    player_room: u16,
    leaflet_parent: u16,
    done: bool,
}

impl WorldState {
    fn initial() -> Self {
        Self {
            score: 0,
            moves: 0,
            player_room: ROOM_FIELD_NUM,
            leaflet_parent: MAILBOX_NUM,
            done: false,
        }
    }

    fn info(&self) -> StepInfo {
        StepInfo {
            score: self.score,
            moves: self.moves,
        }
    }
}

/// A scripted in-memory engine over a fixed two-room world.
#[derive(Debug)]
pub struct ScriptedEngine {
    stem: String,
    state: WorldState,
}

impl ScriptedEngine {
    /// Creates a scripted engine for the given story stem.
    #[must_use]
    pub fn new(stem: impl Into<String>) -> Self {
        Self {
            stem: stem.into(),
            state: WorldState::initial(),
        }
    }

    fn room_name(&self, num: u16) -> String {
        match num {
            ROOM_FIELD_NUM => format!("Open Field ({})", self.stem),
            _ => format!("Front Porch ({})", self.stem),
        }
    }

    fn room_description(&self) -> String {
        match self.state.player_room {
            ROOM_FIELD_NUM => format!(
                "{}\nYou are standing in an open field. There is a small mailbox here.",
                self.room_name(ROOM_FIELD_NUM)
            ),
            _ => format!(
                "{}\nYou are on a creaky front porch.",
                self.room_name(ROOM_PORCH_NUM)
            ),
        }
    }

    fn objects(&self) -> Vec<WorldObject> {
        vec![
            WorldObject {
                num: PLAYER_NUM,
                name: "adventurer".to_owned(),
                parent: self.state.player_room,
            },
            WorldObject {
                num: MAILBOX_NUM,
                name: "small mailbox".to_owned(),
                parent: ROOM_FIELD_NUM,
            },
            WorldObject {
                num: LEAFLET_NUM,
                name: "leaflet".to_owned(),
                parent: self.state.leaflet_parent,
            },
        ]
    }
}

impl Engine for ScriptedEngine {
    fn reset(&mut self) -> Result<(String, StepInfo), EngineError> {
        self.state = WorldState::initial();
        let observation = format!("Welcome to {}!\n\n{}", self.stem, self.room_description());
        Ok((observation, self.state.info()))
    }

    fn step(&mut self, command: &str) -> Result<StepOutcome, EngineError> {
        let score_before = self.state.score;
        self.state.moves += 1;
        let observation = match command.trim() {
            "look" => self.room_description(),
            "north" | "go north" if self.state.player_room == ROOM_FIELD_NUM => {
                self.state.player_room = ROOM_PORCH_NUM;
                self.room_description()
            }
            "south" | "go south" if self.state.player_room == ROOM_PORCH_NUM => {
                self.state.player_room = ROOM_FIELD_NUM;
                self.room_description()
            }
            "open mailbox"
                if self.state.player_room == ROOM_FIELD_NUM
                    && self.state.leaflet_parent == MAILBOX_NUM =>
            {
                self.state.leaflet_parent = ROOM_FIELD_NUM;
                "Opening the small mailbox reveals a leaflet.".to_owned()
            }
            "take leaflet" if self.state.leaflet_parent == self.state.player_room => {
                self.state.leaflet_parent = PLAYER_NUM;
                self.state.score += 5;
                "Taken.".to_owned()
            }
            "sleep" => {
                self.state.done = true;
                "You drift off. The game is over.".to_owned()
            }
            _ => "That's not a verb I recognise.".to_owned(),
        };
        Ok(StepOutcome {
            observation,
            reward: self.state.score - score_before,
            done: self.state.done,
            info: self.state.info(),
        })
    }

    fn get_state(&mut self) -> Result<Snapshot, EngineError> {
        let bytes = serde_json::to_vec(&self.state)
            .map_err(|e| EngineError::Snapshot(e.to_string()))?;
        Ok(Snapshot::from(bytes))
    }

    fn set_state(&mut self, snapshot: &Snapshot) -> Result<(), EngineError> {
        self.state = serde_json::from_slice(snapshot.as_bytes())
            .map_err(|e| EngineError::Snapshot(e.to_string()))?;
        Ok(())
    }

    fn max_score(&mut self) -> Result<i32, EngineError> {
        Ok(if self.stem == "zork1" { 350 } else { 100 })
    }

    fn player_location(&mut self) -> Result<Option<Location>, EngineError> {
        Ok(Some(Location {
            num: self.state.player_room,
            name: self.room_name(self.state.player_room),
        }))
    }

    fn inventory(&mut self) -> Result<Vec<WorldObject>, EngineError> {
        Ok(self
            .objects()
            .into_iter()
            .filter(|o| o.parent == PLAYER_NUM)
            .collect())
    }

    fn world_objects(&mut self) -> Result<Vec<WorldObject>, EngineError> {
        Ok(self.objects())
    }

    fn player_object(&mut self) -> Result<WorldObject, EngineError> {
        Ok(WorldObject {
            num: PLAYER_NUM,
            name: "adventurer".to_owned(),
            parent: self.state.player_room,
        })
    }

    fn valid_actions(&mut self) -> Result<Vec<String>, EngineError> {
        let actions = match self.state.player_room {
            ROOM_FIELD_NUM => vec!["look", "north", "open mailbox", "take leaflet"],
            _ => vec!["look", "south"],
        };
        Ok(actions.into_iter().map(str::to_owned).collect())
    }
}

/// A provider that opens any existing path as a fresh scripted world.
#[derive(Debug, Default)]
pub struct ScriptedProvider;

impl EngineProvider for ScriptedProvider {
    fn open(&self, story_path: &Path) -> Result<Box<dyn Engine>, EngineError> {
        let stem = story_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Box::new(ScriptedEngine::new(stem)))
    }
}

/// Wraps a scripted engine but fails every world-model query.
///
/// Used to exercise the façade's suppression policy: derived views must come
/// back empty, never as errors.
#[derive(Debug)]
struct FailingViewsEngine(ScriptedEngine);

impl Engine for FailingViewsEngine {
    fn reset(&mut self) -> Result<(String, StepInfo), EngineError> {
        self.0.reset()
    }

    fn step(&mut self, command: &str) -> Result<StepOutcome, EngineError> {
        self.0.step(command)
    }

    fn get_state(&mut self) -> Result<Snapshot, EngineError> {
        self.0.get_state()
    }

    fn set_state(&mut self, snapshot: &Snapshot) -> Result<(), EngineError> {
        self.0.set_state(snapshot)
    }

    fn max_score(&mut self) -> Result<i32, EngineError> {
        self.0.max_score()
    }

    fn player_location(&mut self) -> Result<Option<Location>, EngineError> {
        Err(EngineError::Unsupported)
    }

    fn inventory(&mut self) -> Result<Vec<WorldObject>, EngineError> {
        Err(EngineError::Unsupported)
    }

    fn world_objects(&mut self) -> Result<Vec<WorldObject>, EngineError> {
        Err(EngineError::Unsupported)
    }

    fn player_object(&mut self) -> Result<WorldObject, EngineError> {
        Err(EngineError::Unsupported)
    }

    fn valid_actions(&mut self) -> Result<Vec<String>, EngineError> {
        Err(EngineError::Unsupported)
    }
}

/// A provider whose engines cannot answer any world-model query.
#[derive(Debug, Default)]
pub struct FailingViewsProvider;

impl EngineProvider for FailingViewsProvider {
    fn open(&self, story_path: &Path) -> Result<Box<dyn Engine>, EngineError> {
        let stem = story_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Box::new(FailingViewsEngine(ScriptedEngine::new(stem))))
    }
}

/// A provider that refuses to open anything. Useful for testing engine
/// construction failures.
#[derive(Debug, Default)]
pub struct RefusingProvider;

impl EngineProvider for RefusingProvider {
    fn open(&self, _story_path: &Path) -> Result<Box<dyn Engine>, EngineError> {
        Err(EngineError::Protocol("interpreter refused to start".into()))
    }
}
