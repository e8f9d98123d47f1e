//! Lantern Session — the façade between HTTP handlers and the interpreter.
//!
//! Owns the single in-process game session, the derived-view queries with
//! their fault-swallowing policy, and snapshot transport encoding.

mod session;
mod views;

pub use session::GameSession;
pub use views::{DerivedViews, ItemView};
