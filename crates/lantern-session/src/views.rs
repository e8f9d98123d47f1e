//! Read-only view DTOs derived from interpreter state on demand.

use serde::Serialize;

use lantern_core::types::{Location, WorldObject};

/// An inventory item as returned to callers: object number and name only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemView {
    /// Z-machine object number.
    pub num: u16,
    /// Display name.
    pub name: String,
}

impl From<WorldObject> for ItemView {
    fn from(object: WorldObject) -> Self {
        Self {
            num: object.num,
            name: object.name,
        }
    }
}

/// The four derived views computed after every observable operation.
///
/// Each field is independently fault-tolerant: a failed interpreter query
/// yields `None`/empty rather than an error, so callers cannot distinguish
/// "genuinely empty" from "query failed". That is the intended contract.
#[derive(Debug, Serialize)]
pub struct DerivedViews {
    /// The player's current room, if the query succeeded.
    pub location: Option<Location>,
    /// Objects carried by the player.
    pub inventory: Vec<ItemView>,
    /// Objects in the player's current room, player excluded.
    pub objects: Vec<WorldObject>,
    /// Actions the parser would currently accept.
    pub valid_actions: Vec<String>,
}
