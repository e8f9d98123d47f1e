//! Lantern API — the HTTP façade over a Z-machine interpreter.
//!
//! Exposes four JSON operations (start, step, save, load) plus a health
//! check, all delegating to the single process-wide game session.

pub mod error;
pub mod routes;
pub mod state;
