//! Lantern Frotz — the production engine backend.
//!
//! Drives a dumb-terminal Frotz-compatible interpreter (`dfrotz`) as a child
//! process, marshalling commands down its stdin and transcripts back out of
//! its stdout. Snapshots go through the interpreter's own save/restore files.
//!
//! The dumb-terminal interface exposes no world model, so the object-table
//! getters answer `EngineError::Unsupported`; the session façade's
//! suppression policy turns those into empty views.

mod engine;
mod output;

pub use engine::{FrotzEngine, FrotzProvider};
pub use output::{clean_transcript, is_game_over, parse_status};
