//! Lantern Core — shared capability traits and domain types.
//!
//! This crate defines the narrow interface through which the rest of the
//! bridge consumes a Z-machine interpreter, plus the transient world-model
//! types derived from it. It contains no infrastructure code.

pub mod engine;
pub mod error;
pub mod types;
