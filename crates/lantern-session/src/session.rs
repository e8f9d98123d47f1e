//! The process-wide game session.

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::debug;

use lantern_core::engine::{Engine, EngineProvider};
use lantern_core::error::{EngineError, SessionError};
use lantern_core::types::{Location, Snapshot, StepInfo, StepOutcome, WorldObject};

use crate::views::DerivedViews;

/// One active, resumable game: a single interpreter engine plus the derived
/// views computed from it.
///
/// At most one `GameSession` exists per process; a new start replaces the
/// previous session silently. The session is not safe for concurrent
/// mutation, so callers serialize access behind a mutex.
pub struct GameSession {
    engine: Box<dyn Engine>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession").finish_non_exhaustive()
    }
}

impl GameSession {
    /// Opens the story `<games_dir>/<game>.z5` and resets a fresh engine on
    /// it, returning the session together with the opening observation and
    /// initial metadata.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::StoryNotFound`] if the story file does not
    /// exist, or the engine's error if construction or reset fails.
    pub fn start(
        provider: &dyn EngineProvider,
        games_dir: &Path,
        game: &str,
    ) -> Result<(Self, String, StepInfo), SessionError> {
        let story_path = games_dir.join(format!("{game}.z5"));
        if !story_path.is_file() {
            return Err(SessionError::StoryNotFound(story_path));
        }
        let mut engine = provider.open(&story_path)?;
        let (observation, info) = engine.reset()?;
        Ok((Self { engine }, observation, info))
    }

    /// Feeds one command to the interpreter.
    ///
    /// # Errors
    ///
    /// Returns the engine's error if the interpreter fails.
    pub fn step(&mut self, command: &str) -> Result<StepOutcome, SessionError> {
        Ok(self.engine.step(command)?)
    }

    /// The maximum achievable score for the loaded story.
    ///
    /// # Errors
    ///
    /// Returns the engine's error if the query fails.
    pub fn max_score(&mut self) -> Result<i32, SessionError> {
        Ok(self.engine.max_score()?)
    }

    /// Captures the interpreter's internal state as transportable text.
    ///
    /// The snapshot bytes are opaque; this only applies the base64 transport
    /// encoding.
    ///
    /// # Errors
    ///
    /// Returns the engine's error if the snapshot cannot be produced.
    pub fn save_state(&mut self) -> Result<String, SessionError> {
        let snapshot = self.engine.get_state()?;
        Ok(BASE64.encode(snapshot.as_bytes()))
    }

    /// Decodes an encoded snapshot and installs it into the current engine,
    /// replacing its world state in place.
    ///
    /// Loading a snapshot taken from a different story than the one currently
    /// running is unspecified and not guarded against.
    ///
    /// # Errors
    ///
    /// Returns a snapshot error if the payload is not valid base64, or the
    /// engine's error if the blob cannot be installed.
    pub fn restore_state(&mut self, encoded: &str) -> Result<(), SessionError> {
        let bytes = BASE64
            .decode(encoded)
            .map_err(|e| EngineError::Snapshot(e.to_string()))?;
        self.engine.set_state(&Snapshot::from(bytes))?;
        Ok(())
    }

    /// Computes all four derived views from current interpreter state.
    pub fn views(&mut self) -> DerivedViews {
        DerivedViews {
            location: self.location(),
            inventory: self.inventory().into_iter().map(Into::into).collect(),
            objects: self.room_objects(),
            valid_actions: self.valid_actions(),
        }
    }

    /// The player's current room, or `None` if the query fails.
    fn location(&mut self) -> Option<Location> {
        match self.engine.player_location() {
            Ok(location) => location,
            Err(e) => {
                debug!(error = %e, "player_location query suppressed");
                None
            }
        }
    }

    /// Objects carried by the player, or empty if the query fails.
    fn inventory(&mut self) -> Vec<WorldObject> {
        match self.engine.inventory() {
            Ok(items) => items,
            Err(e) => {
                debug!(error = %e, "inventory query suppressed");
                Vec::new()
            }
        }
    }

    /// Objects in the player's current room, player excluded; empty if any
    /// part of the derivation fails.
    fn room_objects(&mut self) -> Vec<WorldObject> {
        match self.try_room_objects() {
            Ok(objects) => objects,
            Err(e) => {
                debug!(error = %e, "room object derivation suppressed");
                Vec::new()
            }
        }
    }

    fn try_room_objects(&mut self) -> Result<Vec<WorldObject>, EngineError> {
        let Some(location) = self.engine.player_location()? else {
            return Ok(Vec::new());
        };
        let player = self.engine.player_object()?;
        Ok(self
            .engine
            .world_objects()?
            .into_iter()
            .filter(|o| o.parent == location.num && o.num != player.num)
            .collect())
    }

    /// Actions the parser would currently accept, or empty if the query
    /// fails.
    fn valid_actions(&mut self) -> Vec<String> {
        match self.engine.valid_actions() {
            Ok(actions) => actions,
            Err(e) => {
                debug!(error = %e, "valid_actions query suppressed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use lantern_core::error::SessionError;
    use lantern_test_support::{
        FailingViewsProvider, ScriptedProvider, MAILBOX_NUM, PLAYER_NUM, ROOM_FIELD_NUM,
    };

    use super::GameSession;

    fn games_dir_with(stories: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for story in stories {
            fs::write(dir.path().join(format!("{story}.z5")), b"\x05fake story").unwrap();
        }
        dir
    }

    #[test]
    fn test_start_with_missing_story_returns_story_not_found() {
        // Arrange
        let dir = games_dir_with(&[]);

        // Act
        let result = GameSession::start(&ScriptedProvider, dir.path(), "zork1");

        // Assert
        match result {
            Err(SessionError::StoryNotFound(path)) => {
                assert_eq!(path, dir.path().join("zork1.z5"));
            }
            other => panic!("expected StoryNotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_start_returns_opening_observation_and_info() {
        // Arrange
        let dir = games_dir_with(&["zork1"]);

        // Act
        let (mut session, observation, info) =
            GameSession::start(&ScriptedProvider, dir.path(), "zork1").unwrap();

        // Assert
        assert!(observation.contains("zork1"));
        assert_eq!(info.moves, 0);
        assert_eq!(info.score, 0);
        assert_eq!(session.max_score().unwrap(), 350);
    }

    #[test]
    fn test_room_objects_exclude_the_player() {
        // Arrange
        let dir = games_dir_with(&["zork1"]);
        let (mut session, _, _) =
            GameSession::start(&ScriptedProvider, dir.path(), "zork1").unwrap();

        // Act
        let views = session.views();

        // Assert — the mailbox is in the room; the player object is not.
        let nums: Vec<u16> = views.objects.iter().map(|o| o.num).collect();
        assert!(nums.contains(&MAILBOX_NUM));
        assert!(!nums.contains(&PLAYER_NUM));
        assert_eq!(views.location.unwrap().num, ROOM_FIELD_NUM);
    }

    #[test]
    fn test_step_mutates_state_and_reports_reward() {
        // Arrange
        let dir = games_dir_with(&["zork1"]);
        let (mut session, _, _) =
            GameSession::start(&ScriptedProvider, dir.path(), "zork1").unwrap();

        // Act
        session.step("open mailbox").unwrap();
        let outcome = session.step("take leaflet").unwrap();

        // Assert
        assert_eq!(outcome.reward, 5);
        assert!(!outcome.done);
        assert_eq!(outcome.info.moves, 2);
        let inventory = session.views().inventory;
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory[0].name, "leaflet");
    }

    #[test]
    fn test_save_then_load_round_trips_session_state() {
        // Arrange
        let dir = games_dir_with(&["zork1"]);
        let (mut session, _, _) =
            GameSession::start(&ScriptedProvider, dir.path(), "zork1").unwrap();
        session.step("open mailbox").unwrap();
        session.step("take leaflet").unwrap();
        let before = session.views();

        // Act
        let blob = session.save_state().unwrap();
        session.step("north").unwrap();
        session.restore_state(&blob).unwrap();
        let after = session.views();

        // Assert — identical location, inventory, and room objects.
        assert_eq!(before.location, after.location);
        assert_eq!(before.inventory, after.inventory);
        assert_eq!(before.objects, after.objects);
    }

    #[test]
    fn test_restore_state_rejects_invalid_base64() {
        // Arrange
        let dir = games_dir_with(&["zork1"]);
        let (mut session, _, _) =
            GameSession::start(&ScriptedProvider, dir.path(), "zork1").unwrap();

        // Act
        let result = session.restore_state("not base64!!!");

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_failed_view_queries_are_suppressed_to_empty() {
        // Arrange
        let dir = games_dir_with(&["zork1"]);
        let (mut session, observation, _) =
            GameSession::start(&FailingViewsProvider, dir.path(), "zork1").unwrap();

        // Act
        let views = session.views();

        // Assert — the session works, the views come back empty.
        assert!(!observation.is_empty());
        assert!(views.location.is_none());
        assert!(views.inventory.is_empty());
        assert!(views.objects.is_empty());
        assert!(views.valid_actions.is_empty());
    }

    #[test]
    fn test_story_path_resolution_appends_z5_extension() {
        // Arrange
        let dir = games_dir_with(&[]);

        // Act
        let err = GameSession::start(&ScriptedProvider, dir.path(), "enchanter").unwrap_err();

        // Assert
        let SessionError::StoryNotFound(path) = err else {
            panic!("expected StoryNotFound");
        };
        assert_eq!(path, PathBuf::from(dir.path()).join("enchanter.z5"));
    }
}
