//! Child-process driver for a dumb-terminal interpreter.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use tempfile::TempDir;
use tracing::debug;

use lantern_core::engine::{Engine, EngineProvider};
use lantern_core::error::EngineError;
use lantern_core::types::{Location, Snapshot, StepInfo, StepOutcome, WorldObject};

use crate::output::{clean_transcript, is_game_over, parse_status};

/// How long to wait for the interpreter's first output chunk.
const FIRST_CHUNK_TIMEOUT: Duration = Duration::from_secs(5);
/// Silence interval after which a transcript is considered complete.
const QUIET_INTERVAL: Duration = Duration::from_millis(150);

/// Constructs [`FrotzEngine`]s by spawning an interpreter binary.
#[derive(Debug, Clone)]
pub struct FrotzProvider {
    binary: PathBuf,
    rom_dir: Option<PathBuf>,
}

impl FrotzProvider {
    /// Creates a provider for the given interpreter binary.
    #[must_use]
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            rom_dir: None,
        }
    }

    /// Creates a provider from `FROTZ_BIN` and `FROTZ_ROM_DIR`, defaulting
    /// the binary to `dfrotz` on the `PATH`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            binary: PathBuf::from(
                std::env::var("FROTZ_BIN").unwrap_or_else(|_| "dfrotz".to_string()),
            ),
            rom_dir: std::env::var("FROTZ_ROM_DIR").ok().map(PathBuf::from),
        }
    }
}

impl EngineProvider for FrotzProvider {
    fn open(&self, story_path: &Path) -> Result<Box<dyn Engine>, EngineError> {
        Ok(Box::new(FrotzEngine::launch(&self.binary, story_path)?))
    }

    fn bundled_rom_dir(&self) -> Option<PathBuf> {
        self.rom_dir.clone()
    }
}

/// Stdin/stdout plumbing for one interpreter process.
struct FrotzProcess {
    child: Child,
    stdin: ChildStdin,
    output: Receiver<Vec<u8>>,
}

impl FrotzProcess {
    fn spawn(binary: &Path, story: &Path, save_dir: &Path) -> Result<Self, EngineError> {
        // -m: no MORE prompts, -q: quiet, -w: wide lines so nothing wraps,
        // -R: restrict save/restore files to our scratch directory.
        let mut child = Command::new(binary)
            .arg("-m")
            .arg("-q")
            .arg("-w")
            .arg("500")
            .arg("-R")
            .arg(save_dir)
            .arg(story)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::Protocol("interpreter stdin unavailable".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::Protocol("interpreter stdout unavailable".into()))?;
        Ok(Self {
            child,
            stdin,
            output: spawn_reader(stdout),
        })
    }

    fn send_line(&mut self, line: &str) -> Result<(), EngineError> {
        writeln!(self.stdin, "{line}")?;
        self.stdin.flush()?;
        Ok(())
    }

    /// Collects output until the interpreter goes quiet.
    fn drain(&mut self) -> Result<String, EngineError> {
        let mut buf = match self.output.recv_timeout(FIRST_CHUNK_TIMEOUT) {
            Ok(chunk) => chunk,
            Err(RecvTimeoutError::Timeout) => {
                return Err(EngineError::Protocol(
                    "interpreter produced no output".into(),
                ));
            }
            Err(RecvTimeoutError::Disconnected) => return Err(EngineError::Terminated),
        };
        loop {
            match self.output.recv_timeout(QUIET_INTERVAL) {
                Ok(chunk) => buf.extend(chunk),
                Err(_) => break,
            }
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl Drop for FrotzProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn spawn_reader(mut stdout: ChildStdout) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = [0u8; 4096];
        loop {
            match stdout.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if tx.send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                }
            }
        }
    });
    rx
}

/// One running interpreter process for a single story file.
pub struct FrotzEngine {
    binary: PathBuf,
    story: PathBuf,
    process: FrotzProcess,
    save_dir: TempDir,
    started: bool,
    score: i32,
    moves: u32,
}

impl FrotzEngine {
    /// Spawns the interpreter on the given story file.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or its pipes are
    /// unavailable.
    pub fn launch(binary: &Path, story: &Path) -> Result<Self, EngineError> {
        let save_dir = TempDir::new()?;
        let process = FrotzProcess::spawn(binary, story, save_dir.path())?;
        Ok(Self {
            binary: binary.to_path_buf(),
            story: story.to_path_buf(),
            process,
            save_dir,
            started: false,
            score: 0,
            moves: 0,
        })
    }

    fn save_file(&self) -> PathBuf {
        self.save_dir.path().join("state.qzl")
    }

    /// Reads one transcript and folds any status line into the step counters.
    fn read_transcript(&mut self) -> Result<String, EngineError> {
        let raw = self.process.drain()?;
        if let Some((score, moves)) = parse_status(&raw) {
            self.score = score;
            self.moves = moves;
        }
        Ok(clean_transcript(&raw))
    }

    fn info(&self) -> StepInfo {
        StepInfo {
            score: self.score,
            moves: self.moves,
        }
    }
}

impl Engine for FrotzEngine {
    fn reset(&mut self) -> Result<(String, StepInfo), EngineError> {
        if self.started {
            // Restart semantics via a fresh process: simpler and story-proof
            // compared to negotiating each game's own restart prompt.
            self.process = FrotzProcess::spawn(&self.binary, &self.story, self.save_dir.path())?;
        }
        self.started = true;
        self.score = 0;
        self.moves = 0;
        let observation = self.read_transcript()?;
        debug!(story = %self.story.display(), "interpreter reset");
        Ok((observation, self.info()))
    }

    fn step(&mut self, command: &str) -> Result<StepOutcome, EngineError> {
        let score_before = self.score;
        self.process.send_line(command)?;
        let observation = self.read_transcript()?;
        Ok(StepOutcome {
            done: is_game_over(&observation),
            reward: self.score - score_before,
            observation,
            info: self.info(),
        })
    }

    fn get_state(&mut self) -> Result<Snapshot, EngineError> {
        let path = self.save_file();
        let _ = fs::remove_file(&path);
        self.process.send_line("save")?;
        self.process.drain()?;
        self.process
            .send_line(&path.to_string_lossy())?;
        let reply = self.process.drain()?;
        // Games re-prompt before clobbering an existing save file.
        if reply.contains('?') && reply.to_lowercase().contains("overwrite") {
            self.process.send_line("y")?;
            self.process.drain()?;
        }
        let bytes = fs::read(&path)
            .map_err(|e| EngineError::Snapshot(format!("save file not written: {e}")))?;
        Ok(Snapshot::from(bytes))
    }

    fn set_state(&mut self, snapshot: &Snapshot) -> Result<(), EngineError> {
        let path = self.save_file();
        fs::write(&path, snapshot.as_bytes())
            .map_err(|e| EngineError::Snapshot(e.to_string()))?;
        self.process.send_line("restore")?;
        self.process.drain()?;
        self.process
            .send_line(&path.to_string_lossy())?;
        let reply = self.process.drain()?;
        if reply.to_lowercase().contains("failed") {
            return Err(EngineError::Snapshot("interpreter rejected snapshot".into()));
        }
        // The restore reply carries the refreshed status line; fold it in
        // without spending a game turn on an extra command.
        if let Some((score, moves)) = parse_status(&reply) {
            self.score = score;
            self.moves = moves;
        }
        Ok(())
    }

    fn max_score(&mut self) -> Result<i32, EngineError> {
        // The dumb-terminal interface does not expose the story's score
        // table; report zero, the same answer the richer bindings give for
        // unsupported games.
        Ok(0)
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
